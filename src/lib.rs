//! Path-wise simulation of interest-rate risk factors and dual-curve
//! valuation of an interest-rate swap's floating leg.
//!
//! Each path owns a [`process::RiskFactorModel`] per factor (Vasicek or GBM
//! with an optional Heston volatility overlay) fed by its own random stream.
//! The generated discount-rate and floating-index grids are then walked by
//! [`payoff::payoff`], which on every coupon date discounts the remaining
//! schedule at the risk-free rate and at the rate plus the funding spread.

pub mod config;
pub mod error;
pub mod grid;
pub mod increment;
pub mod payoff;
pub mod process;
pub mod rng;
pub mod sampler;
pub mod sim;
pub mod valuation;

#[cfg(feature = "python")]
pub mod py_binding;

pub use config::SimulationConfig;
pub use error::{ConfigError, ModelError, PayoffError, SimError, SimResult};
pub use grid::SimulationGrid;
pub use increment::Correlation;
pub use payoff::{CouponEvent, DiscountedCashflows, SwapParameters, payoff};
pub use process::{Dynamics, ModelParams, RiskFactorModel};
pub use sim::{SimulationOutput, simulate};
