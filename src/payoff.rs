//! Floating-leg cashflow valuation along a simulated path.
//!
//! At every coupon date the whole remaining schedule is valued with the
//! discount rate and floating index observed on that date. Forward rates for
//! later coupons are not re-sampled.

use crate::error::PayoffError;
use crate::grid::SimulationGrid;
use serde::Deserialize;

/// Grid steps per year; converts a day-count fraction to a step count.
pub const TRADING_DAYS: f64 = 250.0;

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwapParameters {
    /// Day-count fraction of one coupon period.
    pub dcf: f64,
    pub fixed_coupon: f64,
    /// Spread over the floating index.
    pub float_spread: f64,
    /// Funding (FTP) spread added to the discount rate.
    pub funding_spread: f64,
    pub notional: f64,
    /// Horizon of the simulation grid, in steps.
    pub total_time_steps: usize,
    /// Maturity `T` in coupon periods.
    pub maturity_periods: u32,
}

impl Default for SwapParameters {
    fn default() -> Self {
        Self {
            dcf: 0.25,
            fixed_coupon: 0.03,
            float_spread: 0.001,
            funding_spread: 0.005,
            notional: 1_000_000.0,
            total_time_steps: 1250,
            maturity_periods: 20,
        }
    }
}

impl SwapParameters {
    /// Steps between coupon dates, `dcf * 250` truncated.
    pub fn coupon_period(&self) -> Result<usize, PayoffError> {
        if !self.dcf.is_finite() || self.dcf <= 0.0 {
            return Err(PayoffError::InvalidSwap(format!(
                "dcf must be finite and positive, got {}",
                self.dcf
            )));
        }
        let period = (self.dcf * TRADING_DAYS).trunc() as usize;
        if period == 0 {
            return Err(PayoffError::InvalidSwap(format!(
                "dcf {} gives a coupon period shorter than one step",
                self.dcf
            )));
        }
        Ok(period)
    }

    /// Coupon dates are the multiples of the period in `[period, horizon]`.
    pub fn is_coupon_date(&self, time_step: usize) -> Result<bool, PayoffError> {
        let period = self.coupon_period()?;
        Ok(time_step >= period && time_step <= self.total_time_steps && time_step % period == 0)
    }

    pub fn coupon_dates(&self) -> Result<Vec<usize>, PayoffError> {
        let period = self.coupon_period()?;
        Ok((period..=self.total_time_steps).step_by(period).collect())
    }

    pub fn validate(&self) -> Result<(), PayoffError> {
        self.coupon_period()?;
        if self.maturity_periods == 0 {
            return Err(PayoffError::InvalidSwap(
                "maturity must span at least one coupon period".into(),
            ));
        }
        for (name, value) in [
            ("fixed_coupon", self.fixed_coupon),
            ("float_spread", self.float_spread),
            ("funding_spread", self.funding_spread),
            ("notional", self.notional),
        ] {
            if !value.is_finite() {
                return Err(PayoffError::InvalidSwap(format!("{name} must be finite")));
            }
        }
        Ok(())
    }

    /// Net floating-minus-fixed cashflow of one period at `index`.
    #[inline]
    pub fn period_cashflow(&self, index: f64) -> f64 {
        (index + self.float_spread - self.fixed_coupon) * self.dcf * self.notional
    }

    /// Years from `time_step` to the payment date of coupon `j`.
    #[inline]
    pub fn time_to_payment(&self, j: u32, time_step: usize) -> f64 {
        (j as f64 * (TRADING_DAYS * self.dcf) - time_step as f64) / TRADING_DAYS
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiscountedCashflows {
    pub pv_risk_free: f64,
    pub pv_funding: f64,
    /// Coupon counter after this date.
    pub cashflow_nb: u32,
}

impl DiscountedCashflows {
    /// What the funding spread costs on this date's remaining schedule.
    pub fn funding_cost(&self) -> f64 {
        self.pv_funding - self.pv_risk_free
    }
}

/// Outcome of one payoff call. `NoEvent` is not a zero-valued coupon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CouponEvent {
    NoEvent,
    Recognised(DiscountedCashflows),
}

impl CouponEvent {
    pub fn cashflows(&self) -> Option<&DiscountedCashflows> {
        match self {
            CouponEvent::NoEvent => None,
            CouponEvent::Recognised(cf) => Some(cf),
        }
    }
}

/// Values the remaining floating-leg schedule at `(time_step, path)` when
/// that step is a coupon date.
///
/// On a coupon date the counter moves to `cashflow_nb + 1` and coupons
/// `cashflow_nb + 1 ..= T` are discounted at the rate observed now, once at
/// the risk-free rate and once with the funding spread on top. Once the
/// schedule is exhausted (`cashflow_nb >= T`) the counter stays put and both
/// sums are zero.
pub fn payoff(
    time_step: usize,
    path: usize,
    cashflow_nb: u32,
    discount_rate: &SimulationGrid,
    floating_index: &SimulationGrid,
    swap: &SwapParameters,
) -> Result<CouponEvent, PayoffError> {
    if !swap.is_coupon_date(time_step)? {
        return Ok(CouponEvent::NoEvent);
    }
    let rate = discount_rate.value(time_step, path)?;
    let index = floating_index.value(time_step, path)?;

    if cashflow_nb >= swap.maturity_periods {
        return Ok(CouponEvent::Recognised(DiscountedCashflows {
            pv_risk_free: 0.0,
            pv_funding: 0.0,
            cashflow_nb,
        }));
    }

    let cashflow_nb = cashflow_nb + 1;
    let cf_raw = swap.period_cashflow(index);
    let mut pv_risk_free = 0.0;
    let mut pv_funding = 0.0;
    for j in cashflow_nb..=swap.maturity_periods {
        let t = swap.time_to_payment(j, time_step);
        let df = (-rate * t).exp();
        let df_ftp = (-(rate + swap.funding_spread) * t).exp();
        pv_risk_free += cf_raw * df;
        pv_funding += cf_raw * df_ftp;
    }

    Ok(CouponEvent::Recognised(DiscountedCashflows {
        pv_risk_free,
        pv_funding,
        cashflow_nb,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn flat_grid(name: &str, time_steps: usize, paths: usize, value: f64) -> SimulationGrid {
        let columns = vec![vec![value; time_steps + 1]; paths];
        SimulationGrid::from_paths(name, &columns).unwrap()
    }

    fn unit_period_swap(total_time_steps: usize, maturity_periods: u32) -> SwapParameters {
        SwapParameters {
            dcf: 0.004,
            fixed_coupon: 0.03,
            float_spread: 0.001,
            funding_spread: 0.005,
            notional: 1_000_000.0,
            total_time_steps,
            maturity_periods,
        }
    }

    #[test]
    fn coupon_period_truncates_dcf_in_steps() {
        assert_eq!(unit_period_swap(10, 10).coupon_period().unwrap(), 1);
        let quarterly = SwapParameters::default();
        assert_eq!(quarterly.coupon_period().unwrap(), 62);
        let tiny = SwapParameters {
            dcf: 0.001,
            ..SwapParameters::default()
        };
        assert!(matches!(tiny.coupon_period(), Err(PayoffError::InvalidSwap(_))));
    }

    #[test]
    fn coupon_dates_run_from_first_period_to_horizon() {
        let swap = SwapParameters {
            dcf: 0.02,
            total_time_steps: 22,
            ..SwapParameters::default()
        };
        assert_eq!(swap.coupon_dates().unwrap(), vec![5, 10, 15, 20]);
        assert!(!swap.is_coupon_date(0).unwrap());
        assert!(!swap.is_coupon_date(7).unwrap());
        assert!(swap.is_coupon_date(20).unwrap());
        assert!(!swap.is_coupon_date(25).unwrap());
    }

    #[test]
    fn off_boundary_step_is_no_event() {
        let swap = SwapParameters {
            dcf: 0.02,
            total_time_steps: 20,
            maturity_periods: 4,
            ..SwapParameters::default()
        };
        let rates = flat_grid("rate", 20, 1, 0.03);
        let index = flat_grid("index", 20, 1, 0.04);
        for t in [0, 1, 4, 6, 19] {
            assert_eq!(payoff(t, 0, 0, &rates, &index, &swap).unwrap(), CouponEvent::NoEvent);
        }
    }

    #[test]
    fn on_boundary_step_counts_coupon_and_discounts_the_rest() {
        let swap = unit_period_swap(10, 10);
        let rates = flat_grid("rate", 10, 2, 0.03);
        let index = flat_grid("index", 10, 2, 0.04);

        let event = payoff(1, 1, 0, &rates, &index, &swap).unwrap();
        let cf = event.cashflows().copied().unwrap();
        assert_eq!(cf.cashflow_nb, 1);
        assert!(cf.pv_risk_free != 0.0);

        let cf_raw = (0.04 + 0.001 - 0.03) * 0.004 * 1_000_000.0;
        let mut expected = 0.0;
        let mut expected_ftp = 0.0;
        for j in 1..=10u32 {
            let t = (j as f64 * (250.0 * 0.004) - 1.0) / 250.0;
            expected += cf_raw * (-0.03 * t).exp();
            expected_ftp += cf_raw * (-(0.03 + 0.005) * t).exp();
        }
        assert_relative_eq!(cf.pv_risk_free, expected, max_relative = 1e-12);
        assert_relative_eq!(cf.pv_funding, expected_ftp, max_relative = 1e-12);
        // positive cashflows are worth less at the higher funding rate
        assert!(cf.funding_cost() < 0.0);
    }

    #[test]
    fn last_coupon_is_discounted_over_zero_time() {
        let swap = unit_period_swap(10, 3);
        let rates = flat_grid("rate", 10, 1, 0.05);
        let index = flat_grid("index", 10, 1, 0.04);
        let cf = *payoff(3, 0, 2, &rates, &index, &swap)
            .unwrap()
            .cashflows()
            .unwrap();
        assert_eq!(cf.cashflow_nb, 3);
        let cf_raw = (0.04 + 0.001 - 0.03) * 0.004 * 1_000_000.0;
        assert_relative_eq!(cf.pv_risk_free, cf_raw, max_relative = 1e-12);
        assert_relative_eq!(cf.pv_funding, cf_raw, max_relative = 1e-12);
    }

    #[test]
    fn exhausted_schedule_returns_zero_sums_and_capped_counter() {
        let swap = unit_period_swap(10, 3);
        let rates = flat_grid("rate", 10, 1, 0.03);
        let index = flat_grid("index", 10, 1, 0.04);
        let event = payoff(4, 0, 3, &rates, &index, &swap).unwrap();
        assert_eq!(
            event,
            CouponEvent::Recognised(DiscountedCashflows {
                pv_risk_free: 0.0,
                pv_funding: 0.0,
                cashflow_nb: 3,
            })
        );
    }

    #[test]
    fn index_at_break_even_gives_zero_but_still_an_event() {
        let swap = unit_period_swap(10, 5);
        let rates = flat_grid("rate", 10, 1, 0.03);
        // 0.029 + 0.001 - 0.03 == 0
        let index = flat_grid("index", 10, 1, 0.029);
        let event = payoff(2, 0, 1, &rates, &index, &swap).unwrap();
        assert!(matches!(event, CouponEvent::Recognised(_)));
        assert_relative_eq!(event.cashflows().unwrap().pv_risk_free, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn coordinate_outside_grid_is_an_error() {
        let swap = unit_period_swap(10, 5);
        let rates = flat_grid("rate", 5, 1, 0.03);
        let index = flat_grid("index", 5, 1, 0.04);
        assert!(matches!(
            payoff(8, 0, 0, &rates, &index, &swap),
            Err(PayoffError::CoordinateOutOfRange { .. })
        ));
        assert!(matches!(
            payoff(1, 4, 0, &rates, &index, &swap),
            Err(PayoffError::CoordinateOutOfRange { .. })
        ));
    }

    #[test]
    fn validate_rejects_zero_maturity() {
        let swap = SwapParameters {
            maturity_periods: 0,
            ..SwapParameters::default()
        };
        assert!(swap.validate().is_err());
        assert!(SwapParameters::default().validate().is_ok());
    }
}
