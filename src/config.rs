//! Run configuration.
//!
//! Loaded from TOML; every section and field falls back to a default, so an
//! empty file describes a complete run.
//!
//! ```toml
//! [simulation]
//! paths = 1000
//! time_steps = 1250
//! seed = 42
//! correlation = 0.3
//!
//! [discount_rate]
//! initial_value = 0.03
//! volatility = 0.01
//!
//! [floating_index]
//! dynamics = "geometric-brownian"
//! initial_value = 0.035
//!
//! [swap]
//! dcf = 0.25
//! maturity_periods = 20
//! ```

use crate::error::ConfigError;
use crate::increment::Correlation;
use crate::payoff::{SwapParameters, TRADING_DAYS};
use crate::process::heston::VarianceProcess;
use crate::process::{Dynamics, ModelParams};
use crate::sampler::{DEFAULT_CLT_ITERATIONS, SamplerKind};
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::path::Path;

const DT_TOLERANCE: f64 = 1e-9;

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub simulation: SimulationSettings,
    pub model: ModelParams,
    pub discount_rate: FactorConfig,
    pub floating_index: FactorConfig,
    pub swap: SwapParameters,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub paths: usize,
    pub time_steps: usize,
    /// Year fraction of one step. Coupon dates and payment times count
    /// grid steps as trading days, so this must be `1 / TRADING_DAYS`.
    pub dt: f64,
    /// Unset means OS entropy, i.e. a different run every time.
    pub seed: Option<u64>,
    pub sampler: SamplerKind,
    /// Uniforms averaged per draw by the CLT sampler.
    pub sampler_iterations: NonZeroUsize,
    /// Correlation of the floating index driver with the discount rate
    /// driver. Unset means the two are independent.
    pub correlation: Option<Correlation>,
    /// Drive both factors from one model instance, so they share one
    /// volatility regime and one increment stream.
    pub shared_volatility: bool,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            paths: 1000,
            time_steps: 1250,
            dt: 1.0 / TRADING_DAYS,
            seed: None,
            sampler: SamplerKind::Clt,
            sampler_iterations: DEFAULT_CLT_ITERATIONS,
            correlation: None,
            shared_volatility: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct FactorConfig {
    pub dynamics: Dynamics,
    pub initial_value: f64,
    /// Spot volatility at time zero.
    pub volatility: f64,
    /// Redraw the volatility from the variance process on every step.
    pub reset_volatility: bool,
}

impl Default for FactorConfig {
    fn default() -> Self {
        Self {
            dynamics: Dynamics::MeanReverting,
            initial_value: 0.03,
            volatility: 0.01,
            reset_volatility: false,
        }
    }
}

impl SimulationConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let sim = &self.simulation;
        if sim.paths == 0 {
            return Err(ConfigError::Invalid("paths must be at least 1".into()));
        }
        if sim.time_steps == 0 {
            return Err(ConfigError::Invalid("time_steps must be at least 1".into()));
        }
        if !sim.dt.is_finite() || sim.dt <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "dt must be finite and positive, got {}",
                sim.dt
            )));
        }
        if (sim.dt * TRADING_DAYS - 1.0).abs() > DT_TOLERANCE {
            return Err(ConfigError::Invalid(format!(
                "dt must be one trading day (1/{TRADING_DAYS}), got {}",
                sim.dt
            )));
        }
        VarianceProcess::new(self.model.variance)
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        for (name, factor) in [
            ("discount_rate", &self.discount_rate),
            ("floating_index", &self.floating_index),
        ] {
            if !factor.volatility.is_finite() || factor.volatility < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name}.volatility must be finite and non-negative"
                )));
            }
            if !factor.initial_value.is_finite() {
                return Err(ConfigError::Invalid(format!(
                    "{name}.initial_value must be finite"
                )));
            }
        }
        if sim.shared_volatility && self.discount_rate.volatility != self.floating_index.volatility
        {
            return Err(ConfigError::Invalid(
                "shared_volatility needs equal spot volatilities on both factors".into(),
            ));
        }
        self.swap
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        if self.swap.total_time_steps > sim.time_steps {
            return Err(ConfigError::Invalid(format!(
                "swap horizon of {} steps exceeds the simulated {} steps",
                self.swap.total_time_steps, sim.time_steps
            )));
        }
        Ok(())
    }
}
