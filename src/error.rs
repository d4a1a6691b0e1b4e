use thiserror::Error;

/// Errors raised while building or stepping a risk-factor model.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    /// `2 * theta * w >= eta^2` does not hold for the variance process.
    #[error(
        "Feller condition breached for the variance process: 2 * {theta} * {long_run_variance} < {vol_of_vol}^2"
    )]
    FellerViolation {
        theta: f64,
        long_run_variance: f64,
        vol_of_vol: f64,
    },

    #[error("invalid correlation coefficient {0}: must be finite and within [-1, 1]")]
    InvalidCorrelation(f64),

    /// A volatility reset produced a variance whose square root is not real.
    #[error("variance update produced {0}, cannot take its square root")]
    NegativeVariance(f64),

    #[error("invalid model parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PayoffError {
    #[error("coordinate (time step {time_step}, path {path}) is outside the {rows}x{paths} grid")]
    CoordinateOutOfRange {
        time_step: usize,
        path: usize,
        rows: usize,
        paths: usize,
    },

    #[error("invalid swap parameters: {0}")]
    InvalidSwap(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Anything that can abort a simulation run.
#[derive(Error, Debug)]
pub enum SimError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Payoff(#[from] PayoffError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("path {path} failed: {source}")]
    Path {
        path: usize,
        #[source]
        source: ModelError,
    },

    #[error("dataframe export failed: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

pub type SimResult<T> = Result<T, SimError>;
