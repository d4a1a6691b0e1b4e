use crate::error::ModelError;
use serde::Deserialize;

/// Parameters of the Heston-style variance process
/// `dv = theta * (w - v) dt + eta * sqrt(v) dB`.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct VarianceParams {
    /// Mean-reversion speed of the variance.
    pub theta: f64,
    /// Long-run variance `w`.
    pub long_run_variance: f64,
    /// Vol-of-vol `eta`.
    pub vol_of_vol: f64,
}

impl Default for VarianceParams {
    fn default() -> Self {
        Self {
            theta: 0.5,
            long_run_variance: 0.16,
            vol_of_vol: 0.2,
        }
    }
}

impl VarianceParams {
    pub fn satisfies_feller(&self) -> bool {
        2.0 * self.theta * self.long_run_variance >= self.vol_of_vol * self.vol_of_vol
    }
}

/// Variance process whose parameters passed the Feller check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VarianceProcess {
    params: VarianceParams,
}

impl VarianceProcess {
    pub fn new(params: VarianceParams) -> Result<Self, ModelError> {
        for (name, value) in [
            ("theta", params.theta),
            ("long_run_variance", params.long_run_variance),
            ("vol_of_vol", params.vol_of_vol),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ModelError::InvalidParameter {
                    name,
                    reason: format!("must be finite and non-negative, got {value}"),
                });
            }
        }
        if !params.satisfies_feller() {
            return Err(ModelError::FellerViolation {
                theta: params.theta,
                long_run_variance: params.long_run_variance,
                vol_of_vol: params.vol_of_vol,
            });
        }
        Ok(Self { params })
    }

    pub fn params(&self) -> &VarianceParams {
        &self.params
    }

    /// One Euler step of the variance from `vol^2`, driven by `db`.
    ///
    /// The result is not floored at zero.
    #[inline]
    pub fn next_variance(&self, vol: f64, dt: f64, db: f64) -> f64 {
        let VarianceParams {
            theta,
            long_run_variance: w,
            vol_of_vol: eta,
        } = self.params;
        let variance_prev = vol * vol;
        variance_prev + theta * (w - variance_prev) * dt + eta * variance_prev.sqrt() * db
    }
}
