use crate::error::PayoffError;
use polars::prelude::*;

/// Dense `(time_steps + 1) x paths` array of simulated values for one risk
/// factor, indexed `[time_step][path]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulationGrid {
    pub name: String,
    time_steps: usize,
    paths: usize,
    values: Vec<f64>,
}

impl SimulationGrid {
    pub fn new(name: impl Into<String>, time_steps: usize, paths: usize) -> Self {
        Self {
            name: name.into(),
            time_steps,
            paths,
            values: vec![0.0; (time_steps + 1) * paths],
        }
    }

    /// Builds a grid from one column per path. Every column must hold the
    /// same number of values (`time_steps + 1`).
    pub fn from_paths(name: impl Into<String>, columns: &[Vec<f64>]) -> Option<Self> {
        let rows = columns.first()?.len();
        if rows == 0 || columns.iter().any(|c| c.len() != rows) {
            return None;
        }
        let mut grid = Self::new(name, rows - 1, columns.len());
        for (p_idx, column) in columns.iter().enumerate() {
            for (t_idx, &val) in column.iter().enumerate() {
                grid.set_raw(t_idx, p_idx, val);
            }
        }
        Some(grid)
    }

    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    pub fn rows(&self) -> usize {
        self.time_steps + 1
    }

    pub fn paths(&self) -> usize {
        self.paths
    }

    #[inline]
    fn offset(&self, t_idx: usize, p_idx: usize) -> usize {
        t_idx * self.paths + p_idx
    }

    /// Unchecked beyond the slice bounds check.
    #[inline]
    pub fn get_raw(&self, t_idx: usize, p_idx: usize) -> f64 {
        self.values[self.offset(t_idx, p_idx)]
    }

    #[inline]
    pub fn set_raw(&mut self, t_idx: usize, p_idx: usize, val: f64) {
        let idx = self.offset(t_idx, p_idx);
        self.values[idx] = val;
    }

    pub fn get(&self, t_idx: usize, p_idx: usize) -> Option<f64> {
        if t_idx < self.rows() && p_idx < self.paths {
            Some(self.get_raw(t_idx, p_idx))
        } else {
            None
        }
    }

    /// Like [`get`](Self::get) but reports the miss as a payoff error.
    pub fn value(&self, t_idx: usize, p_idx: usize) -> Result<f64, PayoffError> {
        self.get(t_idx, p_idx)
            .ok_or(PayoffError::CoordinateOutOfRange {
                time_step: t_idx,
                path: p_idx,
                rows: self.rows(),
                paths: self.paths,
            })
    }

    pub fn row(&self, t_idx: usize) -> &[f64] {
        let start = self.offset(t_idx, 0);
        &self.values[start..start + self.paths]
    }

    /// Long format: one row per (time step, path).
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let row_count = self.values.len();
        let mut time_step = Vec::with_capacity(row_count);
        let mut path = Vec::with_capacity(row_count);
        let mut factor = Vec::with_capacity(row_count);
        let mut value = Vec::with_capacity(row_count);

        for t_idx in 0..self.rows() {
            for p_idx in 0..self.paths {
                time_step.push(t_idx as u32);
                path.push(p_idx as u32);
                factor.push(self.name.clone());
                value.push(self.get_raw(t_idx, p_idx));
            }
        }
        df!["time_step" => time_step, "path" => path, "factor" => factor, "value" => value]
    }
}
