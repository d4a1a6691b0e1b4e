use crate::error::PayoffError;
use crate::grid::SimulationGrid;
use crate::payoff::{DiscountedCashflows, SwapParameters, payoff};
use polars::prelude::*;
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CashflowRecord {
    pub path: usize,
    pub time_step: usize,
    pub cashflows: DiscountedCashflows,
}

/// Runs the payoff over the coupon dates of one path, carrying the coupon
/// counter from one date to the next. The counter starts at zero.
pub fn value_path(
    path: usize,
    discount_rate: &SimulationGrid,
    floating_index: &SimulationGrid,
    swap: &SwapParameters,
) -> Result<Vec<CashflowRecord>, PayoffError> {
    let mut cashflow_nb = 0;
    let mut records = Vec::new();
    for time_step in swap.coupon_dates()? {
        let event = payoff(
            time_step,
            path,
            cashflow_nb,
            discount_rate,
            floating_index,
            swap,
        )?;
        if let Some(&cashflows) = event.cashflows() {
            cashflow_nb = cashflows.cashflow_nb;
            records.push(CashflowRecord {
                path,
                time_step,
                cashflows,
            });
        }
    }
    Ok(records)
}

/// Cross-path averages on one coupon date.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CouponSummary {
    pub time_step: usize,
    pub paths: usize,
    pub mean_pv_risk_free: f64,
    pub mean_pv_funding: f64,
}

impl CouponSummary {
    pub fn funding_cost(&self) -> f64 {
        self.mean_pv_funding - self.mean_pv_risk_free
    }
}

pub fn summarise(records: &[CashflowRecord]) -> Vec<CouponSummary> {
    let mut by_date: BTreeMap<usize, (usize, f64, f64)> = BTreeMap::new();
    for record in records {
        let entry = by_date.entry(record.time_step).or_insert((0, 0.0, 0.0));
        entry.0 += 1;
        entry.1 += record.cashflows.pv_risk_free;
        entry.2 += record.cashflows.pv_funding;
    }
    by_date
        .into_iter()
        .map(|(time_step, (paths, rf, ftp))| CouponSummary {
            time_step,
            paths,
            mean_pv_risk_free: rf / paths as f64,
            mean_pv_funding: ftp / paths as f64,
        })
        .collect()
}

pub fn records_to_dataframe(records: &[CashflowRecord]) -> PolarsResult<DataFrame> {
    let path: Vec<u32> = records.iter().map(|r| r.path as u32).collect();
    let time_step: Vec<u32> = records.iter().map(|r| r.time_step as u32).collect();
    let cashflow_nb: Vec<u32> = records.iter().map(|r| r.cashflows.cashflow_nb).collect();
    let pv_risk_free: Vec<f64> = records.iter().map(|r| r.cashflows.pv_risk_free).collect();
    let pv_funding: Vec<f64> = records.iter().map(|r| r.cashflows.pv_funding).collect();
    df![
        "path" => path,
        "time_step" => time_step,
        "cashflow_nb" => cashflow_nb,
        "pv_risk_free" => pv_risk_free,
        "pv_funding" => pv_funding
    ]
}

pub fn summary_to_dataframe(summary: &[CouponSummary]) -> PolarsResult<DataFrame> {
    let time_step: Vec<u32> = summary.iter().map(|s| s.time_step as u32).collect();
    let paths: Vec<u32> = summary.iter().map(|s| s.paths as u32).collect();
    let rf: Vec<f64> = summary.iter().map(|s| s.mean_pv_risk_free).collect();
    let ftp: Vec<f64> = summary.iter().map(|s| s.mean_pv_funding).collect();
    let cost: Vec<f64> = summary.iter().map(|s| s.funding_cost()).collect();
    df![
        "time_step" => time_step,
        "paths" => paths,
        "mean_pv_risk_free" => rf,
        "mean_pv_funding" => ftp,
        "funding_cost" => cost
    ]
}
