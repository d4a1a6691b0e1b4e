//! Standard-normal samplers.
//!
//! The risk-factor model only ever asks a [`NormalSampler`] for one draw at a
//! time, so the CLT approximation used by default can be swapped for an exact
//! generator without touching any caller.

use crate::rng::Rng;
use rand::RngCore;
use rand_distr::{Distribution, StandardNormal};
use serde::Deserialize;
use std::num::NonZeroUsize;

/// Uniform draws averaged per CLT sample unless configured otherwise.
pub const DEFAULT_CLT_ITERATIONS: NonZeroUsize = match NonZeroUsize::new(12) {
    Some(n) => n,
    None => unreachable!(),
};

pub trait NormalSampler: Send {
    /// One approximately standard-normal draw.
    fn sample(&mut self) -> f64;
}

/// `sqrt(12 / n) * (sum of n uniforms - n / 2)`.
///
/// Each uniform has variance 1/12, so the rescaled sum has mean 0 and
/// variance 1 for every `n`; only the tails depend on `n`.
pub fn clt_normal(rng: &mut dyn Rng, iterations: NonZeroUsize) -> f64 {
    let n = iterations.get();
    let sum: f64 = (0..n).map(|_| rng.uniform()).sum();
    (12.0 / n as f64).sqrt() * (sum - n as f64 / 2.0)
}

pub struct CltSampler<R: Rng> {
    rng: R,
    iterations: NonZeroUsize,
}

impl<R: Rng> CltSampler<R> {
    pub fn new(rng: R, iterations: NonZeroUsize) -> Self {
        Self { rng, iterations }
    }
}

impl<R: Rng> NormalSampler for CltSampler<R> {
    #[inline]
    fn sample(&mut self) -> f64 {
        clt_normal(&mut self.rng, self.iterations)
    }
}

/// Exact standard normal (ziggurat) via `rand_distr`.
pub struct ExactSampler<R: RngCore + Send> {
    rng: R,
}

impl<R: RngCore + Send> ExactSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: RngCore + Send> NormalSampler for ExactSampler<R> {
    #[inline]
    fn sample(&mut self) -> f64 {
        StandardNormal.sample(&mut self.rng)
    }
}

/// One uniform per draw pushed through a rational approximation of the
/// inverse normal CDF. Cheaper than [`CltSampler`], with much better tails.
pub struct InverseCdfSampler<R: Rng> {
    rng: R,
}

impl<R: Rng> InverseCdfSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> NormalSampler for InverseCdfSampler<R> {
    #[inline]
    fn sample(&mut self) -> f64 {
        fast_inverse_normal_cdf(self.rng.uniform())
    }
}

#[inline]
pub fn fast_inverse_normal_cdf(p: f64) -> f64 {
    // Abramowitz & Stegun 26.2.23, |error| < 4.5e-4
    let p = p.clamp(f64::MIN_POSITIVE, 1.0 - f64::EPSILON);
    let t = if p < 0.5 {
        (-2.0 * p.ln()).sqrt()
    } else {
        (-2.0 * (1.0 - p).ln()).sqrt()
    };
    let c0 = 2.515517;
    let c1 = 0.802853;
    let c2 = 0.010328;
    let d1 = 1.432788;
    let d2 = 0.189269;
    let d3 = 0.001308;

    let x = t - ((c2 * t + c1) * t + c0) / (((d3 * t + d2) * t + d1) * t + 1.0);
    if p < 0.5 { -x } else { x }
}

/// Sampler selection as it appears in configuration files.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SamplerKind {
    #[default]
    Clt,
    Exact,
    InverseCdf,
}

/// Concrete sampler owned by one path, chosen at run time without boxing.
pub enum PathSampler<R: Rng + RngCore> {
    Clt(CltSampler<R>),
    Exact(ExactSampler<R>),
    InverseCdf(InverseCdfSampler<R>),
}

impl<R: Rng + RngCore> PathSampler<R> {
    pub fn new(kind: SamplerKind, rng: R, iterations: NonZeroUsize) -> Self {
        match kind {
            SamplerKind::Clt => PathSampler::Clt(CltSampler::new(rng, iterations)),
            SamplerKind::Exact => PathSampler::Exact(ExactSampler::new(rng)),
            SamplerKind::InverseCdf => PathSampler::InverseCdf(InverseCdfSampler::new(rng)),
        }
    }
}

impl<R: Rng + RngCore> NormalSampler for PathSampler<R> {
    #[inline]
    fn sample(&mut self) -> f64 {
        match self {
            PathSampler::Clt(s) => s.sample(),
            PathSampler::Exact(s) => s.sample(),
            PathSampler::InverseCdf(s) => s.sample(),
        }
    }
}
