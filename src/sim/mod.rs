pub mod path;

use crate::config::SimulationConfig;
use crate::error::{ConfigError, SimError, SimResult};
use crate::grid::SimulationGrid;
use crate::rng::StreamSeeder;
use crate::valuation::{
    CashflowRecord, CouponSummary, records_to_dataframe, summarise, summary_to_dataframe,
    value_path,
};
use path::{PathFactors, simulate_path};
use polars::prelude::{DataFrame, PolarsResult};
use rayon::prelude::*;
use tracing::{debug, error, info};

pub const DISCOUNT_RATE: &str = "discount_rate";
pub const FLOATING_INDEX: &str = "floating_index";

pub struct SimulationOutput {
    pub discount_rate: SimulationGrid,
    pub floating_index: SimulationGrid,
    pub cashflows: Vec<CashflowRecord>,
}

impl SimulationOutput {
    pub fn summary(&self) -> Vec<CouponSummary> {
        summarise(&self.cashflows)
    }

    /// Both factor grids stacked in long format.
    pub fn paths_dataframe(&self) -> PolarsResult<DataFrame> {
        self.discount_rate
            .to_dataframe()?
            .vstack(&self.floating_index.to_dataframe()?)
    }

    pub fn cashflows_dataframe(&self) -> PolarsResult<DataFrame> {
        records_to_dataframe(&self.cashflows)
    }

    pub fn summary_dataframe(&self) -> PolarsResult<DataFrame> {
        summary_to_dataframe(&self.summary())
    }
}

/// Generates both factor grids, one rayon task per path.
pub fn generate_paths(
    config: &SimulationConfig,
) -> SimResult<(SimulationGrid, SimulationGrid)> {
    let seeder = StreamSeeder::new(config.simulation.seed);
    let factors: Vec<PathFactors> = (0..config.simulation.paths)
        .into_par_iter()
        .map(|path_idx| {
            simulate_path(config, &seeder, path_idx)
                .inspect(|_| debug!(path = path_idx, "path simulated"))
                .map_err(|source| {
                    error!(path = path_idx, %source, "path simulation failed");
                    SimError::Path {
                        path: path_idx,
                        source,
                    }
                })
        })
        .collect::<SimResult<_>>()?;

    let (rates, index): (Vec<Vec<f64>>, Vec<Vec<f64>>) = factors
        .into_iter()
        .map(|f| (f.discount_rate, f.floating_index))
        .unzip();
    let empty = || ConfigError::Invalid("simulation needs at least one path and one step".into());
    let discount_rate = SimulationGrid::from_paths(DISCOUNT_RATE, &rates).ok_or_else(empty)?;
    let floating_index = SimulationGrid::from_paths(FLOATING_INDEX, &index).ok_or_else(empty)?;
    Ok((discount_rate, floating_index))
}

/// Values the swap's floating leg along every path of pre-built grids.
pub fn value_paths(
    config: &SimulationConfig,
    discount_rate: &SimulationGrid,
    floating_index: &SimulationGrid,
) -> SimResult<Vec<CashflowRecord>> {
    let per_path: Vec<Vec<CashflowRecord>> = (0..discount_rate.paths())
        .into_par_iter()
        .map(|path_idx| value_path(path_idx, discount_rate, floating_index, &config.swap))
        .collect::<Result<_, _>>()?;
    Ok(per_path.into_iter().flatten().collect())
}

pub fn simulate(config: &SimulationConfig) -> SimResult<SimulationOutput> {
    config.validate()?;
    let sim = &config.simulation;
    info!(
        paths = sim.paths,
        time_steps = sim.time_steps,
        seed = ?sim.seed,
        sampler = ?sim.sampler,
        "starting simulation"
    );
    let (discount_rate, floating_index) = generate_paths(config)?;
    let cashflows = value_paths(config, &discount_rate, &floating_index)?;
    info!(records = cashflows.len(), "simulation completed");
    Ok(SimulationOutput {
        discount_rate,
        floating_index,
        cashflows,
    })
}
