use crate::error::ModelError;
use crate::sampler::NormalSampler;
use serde::Deserialize;

/// Brownian increment over `dt`: one normal draw scaled by `sqrt(dt)`.
#[inline]
pub fn brownian_increment(sampler: &mut dyn NormalSampler, dt: f64) -> f64 {
    sampler.sample() * dt.sqrt()
}

/// Correlation coefficient between two Brownian drivers, checked to lie in
/// `[-1, 1]` when it is built.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Deserialize)]
#[serde(try_from = "f64")]
pub struct Correlation(f64);

impl Correlation {
    pub fn new(rho: f64) -> Result<Self, ModelError> {
        if rho.is_finite() && (-1.0..=1.0).contains(&rho) {
            Ok(Self(rho))
        } else {
            Err(ModelError::InvalidCorrelation(rho))
        }
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.0
    }

    /// `rho * existing + sqrt(1 - rho^2) * fresh`.
    ///
    /// With `fresh` independent of `existing` and both of variance `dt`, the
    /// result has variance `dt` and correlation `rho` with `existing`.
    #[inline]
    pub fn blend(&self, existing: f64, fresh: f64) -> f64 {
        let rho = self.0;
        rho * existing + (1.0 - rho * rho).sqrt() * fresh
    }
}

impl TryFrom<f64> for Correlation {
    type Error = ModelError;

    fn try_from(rho: f64) -> Result<Self, Self::Error> {
        Correlation::new(rho)
    }
}

/// Increment the next step should use.
///
/// `None` keeps `existing` as is; `Some(rho)` blends it with a fresh draw from
/// `sampler`.
pub fn correlated_increment(
    existing: f64,
    correlation: Option<Correlation>,
    sampler: &mut dyn NormalSampler,
    dt: f64,
) -> f64 {
    match correlation {
        None => existing,
        Some(rho) => {
            let fresh = brownian_increment(sampler, dt);
            rho.blend(existing, fresh)
        }
    }
}
