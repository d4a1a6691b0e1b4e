use clap::Parser;
use irs_path_sim::{SimResult, SimulationConfig, simulate};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Simulate rate paths and value a swap's floating leg on each of them.
#[derive(Parser)]
#[command(name = "irs-path-sim")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the seed from the configuration
    #[arg(short, long)]
    seed: Option<u64>,

    /// Override the number of paths from the configuration
    #[arg(short, long)]
    paths: Option<usize>,

    /// Print only the per-date summary
    #[arg(long)]
    summary_only: bool,
}

fn main() -> SimResult<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_path(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.simulation.seed = Some(seed);
    }
    if let Some(paths) = cli.paths {
        config.simulation.paths = paths;
    }

    let before = Instant::now();
    let output = simulate(&config)?;
    info!(
        seconds = before.elapsed().as_secs_f64(),
        "simulation finished"
    );

    if !cli.summary_only {
        println!("{}", output.cashflows_dataframe()?);
    }
    println!("{}", output.summary_dataframe()?);
    Ok(())
}
