//! Risk-factor dynamics.
//!
//! A [`RiskFactorModel`] owns the state of one simulated factor on one path:
//! the current volatility, the time increment and the latest Brownian
//! increment. Both transitions share the same preamble, so one instance can
//! drive a rate and an asset jointly:
//!
//! 1. optionally blend the stored increment with a fresh draw under a
//!    correlation coefficient;
//! 2. optionally reset the volatility from the Heston variance process;
//! 3. apply the Vasicek or GBM step.
//!
//! The increment is only replaced by [`RiskFactorModel::draw_increment`] or a
//! correlation blend, never implicitly by a step.

pub mod heston;

use crate::error::ModelError;
use crate::increment::{Correlation, brownian_increment, correlated_increment};
use crate::sampler::NormalSampler;
use heston::{VarianceParams, VarianceProcess};
use serde::Deserialize;
use tracing::{debug, trace};

/// Fixed coefficients of both dynamics and of the variance overlay.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModelParams {
    /// Vasicek mean-reversion speed `a`.
    pub mean_reversion_speed: f64,
    /// Vasicek long-run level `b`.
    pub long_run_rate: f64,
    /// GBM drift `mu`.
    pub drift: f64,
    pub variance: VarianceParams,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            mean_reversion_speed: 0.5,
            long_run_rate: 0.04,
            drift: 0.05,
            variance: VarianceParams::default(),
        }
    }
}

/// Which transition a factor follows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dynamics {
    /// `r_t = r + a (b - r) dt + vol dB`
    #[default]
    MeanReverting,
    /// `S_t = S exp((mu - vol^2 / 2) dt + vol dB)`
    GeometricBrownian,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct RiskFactorState {
    volatility: f64,
    dt: f64,
    increment: f64,
}

pub struct RiskFactorModel<S: NormalSampler> {
    state: RiskFactorState,
    params: ModelParams,
    variance: VarianceProcess,
    sampler: S,
}

impl<S: NormalSampler> RiskFactorModel<S> {
    /// Validates the parameters and draws the first increment, which the next
    /// transition consumes.
    pub fn new(
        volatility: f64,
        dt: f64,
        mut sampler: S,
        params: ModelParams,
    ) -> Result<Self, ModelError> {
        if !volatility.is_finite() || volatility < 0.0 {
            return Err(ModelError::InvalidParameter {
                name: "volatility",
                reason: format!("must be finite and non-negative, got {volatility}"),
            });
        }
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ModelError::InvalidParameter {
                name: "dt",
                reason: format!("must be finite and positive, got {dt}"),
            });
        }
        let variance = VarianceProcess::new(params.variance)?;
        let increment = brownian_increment(&mut sampler, dt);
        debug!(volatility, dt, increment, "risk factor model initialised");
        Ok(Self {
            state: RiskFactorState {
                volatility,
                dt,
                increment,
            },
            params,
            variance,
            sampler,
        })
    }

    pub fn volatility(&self) -> f64 {
        self.state.volatility
    }

    pub fn increment(&self) -> f64 {
        self.state.increment
    }

    /// Overwrites the stored increment, e.g. with another factor's increment
    /// before a correlated step.
    pub fn set_increment(&mut self, increment: f64) {
        self.state.increment = increment;
    }

    /// Replaces the stored increment with a fresh `sample * sqrt(dt)`.
    pub fn draw_increment(&mut self) -> f64 {
        self.state.increment = brownian_increment(&mut self.sampler, self.state.dt);
        self.state.increment
    }

    /// Heston update of `vol^2` over one step, using the stored increment.
    pub fn stochastic_variance(&self) -> f64 {
        self.variance
            .next_variance(self.state.volatility, self.state.dt, self.state.increment)
    }

    pub fn step_geometric_brownian(
        &mut self,
        s_prev: f64,
        reset_volatility: bool,
        correlation: Option<Correlation>,
    ) -> Result<f64, ModelError> {
        self.prepare(reset_volatility, correlation)?;
        let RiskFactorState {
            volatility: vol,
            dt,
            increment: db,
        } = self.state;
        Ok(s_prev * ((self.params.drift - vol * vol / 2.0) * dt + vol * db).exp())
    }

    pub fn step_mean_reverting_rate(
        &mut self,
        r_prev: f64,
        reset_volatility: bool,
        correlation: Option<Correlation>,
    ) -> Result<f64, ModelError> {
        self.prepare(reset_volatility, correlation)?;
        let RiskFactorState {
            volatility: vol,
            dt,
            increment: db,
        } = self.state;
        let ModelParams {
            mean_reversion_speed: a,
            long_run_rate: b,
            ..
        } = self.params;
        Ok(r_prev + a * (b - r_prev) * dt + vol * db)
    }

    pub fn step(
        &mut self,
        dynamics: Dynamics,
        prev: f64,
        reset_volatility: bool,
        correlation: Option<Correlation>,
    ) -> Result<f64, ModelError> {
        match dynamics {
            Dynamics::MeanReverting => {
                self.step_mean_reverting_rate(prev, reset_volatility, correlation)
            }
            Dynamics::GeometricBrownian => {
                self.step_geometric_brownian(prev, reset_volatility, correlation)
            }
        }
    }

    fn prepare(
        &mut self,
        reset_volatility: bool,
        correlation: Option<Correlation>,
    ) -> Result<(), ModelError> {
        self.state.increment = correlated_increment(
            self.state.increment,
            correlation,
            &mut self.sampler,
            self.state.dt,
        );
        if reset_volatility {
            self.reset_volatility()?;
        }
        Ok(())
    }

    fn reset_volatility(&mut self) -> Result<(), ModelError> {
        let variance = self.stochastic_variance();
        // NaN fails this comparison too
        if !(variance >= 0.0) {
            return Err(ModelError::NegativeVariance(variance));
        }
        self.state.volatility = variance.sqrt();
        trace!(variance, volatility = self.state.volatility, "volatility reset");
        Ok(())
    }
}
