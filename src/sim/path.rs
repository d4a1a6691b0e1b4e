use crate::config::{FactorConfig, SimulationConfig};
use crate::error::ModelError;
use crate::process::RiskFactorModel;
use crate::rng::{PseudoRng, StreamSeeder};
use crate::sampler::PathSampler;

pub type PathModel = RiskFactorModel<PathSampler<PseudoRng>>;

/// Values of both factors along one path, `time_steps + 1` each.
#[derive(Clone, Debug, PartialEq)]
pub struct PathFactors {
    pub discount_rate: Vec<f64>,
    pub floating_index: Vec<f64>,
}

pub fn build_model(
    config: &SimulationConfig,
    factor: &FactorConfig,
    rng: PseudoRng,
) -> Result<PathModel, ModelError> {
    let sim = &config.simulation;
    let sampler = PathSampler::new(sim.sampler, rng, sim.sampler_iterations);
    RiskFactorModel::new(factor.volatility, sim.dt, sampler, config.model)
}

/// Steps both factors of one path across the whole grid.
///
/// Step `t` consumes the increment drawn at construction for `t = 1` and a
/// fresh draw afterwards. The floating index step is correlated with the
/// discount rate step of the same `t` when a correlation is configured.
pub fn simulate_path(
    config: &SimulationConfig,
    seeder: &StreamSeeder,
    path_idx: usize,
) -> Result<PathFactors, ModelError> {
    let sim = &config.simulation;
    let rate_cfg = &config.discount_rate;
    let index_cfg = &config.floating_index;

    let mut discount_rate = Vec::with_capacity(sim.time_steps + 1);
    let mut floating_index = Vec::with_capacity(sim.time_steps + 1);
    discount_rate.push(rate_cfg.initial_value);
    floating_index.push(index_cfg.initial_value);

    let mut rate_model = build_model(config, rate_cfg, seeder.stream(path_idx, 0))?;
    // one instance: shared volatility regime, and the index reuses the rate
    // increment unless a correlation blends in a fresh draw
    let mut index_model = if sim.shared_volatility {
        None
    } else {
        Some(build_model(config, index_cfg, seeder.stream(path_idx, 1))?)
    };

    for t_idx in 1..=sim.time_steps {
        if t_idx > 1 {
            rate_model.draw_increment();
            // a correlated index overwrites its increment with the rate shock
            if let (None, Some(model)) = (sim.correlation, index_model.as_mut()) {
                model.draw_increment();
            }
        }
        let r = rate_model.step(
            rate_cfg.dynamics,
            discount_rate[t_idx - 1],
            rate_cfg.reset_volatility,
            None,
        )?;
        let model = match index_model.as_mut() {
            Some(model) => {
                if sim.correlation.is_some() {
                    model.set_increment(rate_model.increment());
                }
                model
            }
            None => &mut rate_model,
        };
        let x = model.step(
            index_cfg.dynamics,
            floating_index[t_idx - 1],
            index_cfg.reset_volatility,
            sim.correlation,
        )?;
        discount_rate.push(r);
        floating_index.push(x);
    }

    Ok(PathFactors {
        discount_rate,
        floating_index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::increment::Correlation;
    use crate::process::Dynamics;

    fn config(paths: usize, time_steps: usize) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.simulation.paths = paths;
        config.simulation.time_steps = time_steps;
        config.simulation.seed = Some(17);
        config.swap.dcf = 0.004;
        config.swap.total_time_steps = time_steps;
        config.swap.maturity_periods = time_steps as u32;
        config
    }

    #[test]
    fn path_starts_at_initial_values_and_has_full_length() {
        let mut cfg = config(1, 30);
        cfg.floating_index.initial_value = 0.035;
        let path = simulate_path(&cfg, &StreamSeeder::new(cfg.simulation.seed), 0).unwrap();
        assert_eq!(path.discount_rate.len(), 31);
        assert_eq!(path.floating_index.len(), 31);
        assert_eq!(path.discount_rate[0], 0.03);
        assert_eq!(path.floating_index[0], 0.035);
    }

    #[test]
    fn zero_volatility_paths_are_deterministic_vasicek() {
        let mut cfg = config(1, 10);
        cfg.discount_rate.volatility = 0.0;
        cfg.floating_index.volatility = 0.0;
        cfg.discount_rate.initial_value = 0.04;
        let path = simulate_path(&cfg, &StreamSeeder::new(None), 0).unwrap();
        assert!(path.discount_rate.iter().all(|&r| r == 0.04));
    }

    #[test]
    fn seeded_paths_are_reproducible() {
        let cfg = config(1, 50);
        let seeder = StreamSeeder::new(cfg.simulation.seed);
        assert_eq!(
            simulate_path(&cfg, &seeder, 3).unwrap(),
            simulate_path(&cfg, &seeder, 3).unwrap()
        );
        assert_ne!(
            simulate_path(&cfg, &seeder, 3).unwrap(),
            simulate_path(&cfg, &seeder, 4).unwrap()
        );
    }

    #[test]
    fn shared_model_without_correlation_moves_factors_in_lockstep() {
        let mut cfg = config(1, 20);
        cfg.simulation.shared_volatility = true;
        let path = simulate_path(&cfg, &StreamSeeder::new(cfg.simulation.seed), 0).unwrap();
        assert_eq!(path.discount_rate, path.floating_index);
    }

    #[test]
    fn unit_correlation_across_models_copies_the_rate_shock() {
        let mut cfg = config(1, 20);
        cfg.simulation.correlation = Some(Correlation::new(1.0).unwrap());
        let path = simulate_path(&cfg, &StreamSeeder::new(cfg.simulation.seed), 0).unwrap();
        assert_eq!(path.discount_rate, path.floating_index);
    }

    #[test]
    fn correlated_index_draws_only_blend_shocks_from_its_stream() {
        let mut cfg = config(1, 25);
        let rho = Correlation::new(0.0).unwrap();
        cfg.simulation.correlation = Some(rho);
        let seeder = StreamSeeder::new(cfg.simulation.seed);
        let path = simulate_path(&cfg, &seeder, 0).unwrap();

        let mut rate = build_model(&cfg, &cfg.discount_rate, seeder.stream(0, 0)).unwrap();
        let mut index = build_model(&cfg, &cfg.floating_index, seeder.stream(0, 1)).unwrap();
        let (mut r, mut x) = (cfg.discount_rate.initial_value, cfg.floating_index.initial_value);
        for t in 1..=25 {
            if t > 1 {
                rate.draw_increment();
            }
            r = rate.step(Dynamics::MeanReverting, r, false, None).unwrap();
            index.set_increment(rate.increment());
            x = index.step(Dynamics::MeanReverting, x, false, Some(rho)).unwrap();
            assert_eq!(path.discount_rate[t], r);
            assert_eq!(path.floating_index[t], x);
        }
    }

    #[test]
    fn geometric_index_stays_positive() {
        let mut cfg = config(1, 200);
        cfg.floating_index.dynamics = Dynamics::GeometricBrownian;
        cfg.floating_index.volatility = 0.3;
        let path = simulate_path(&cfg, &StreamSeeder::new(cfg.simulation.seed), 0).unwrap();
        assert!(path.floating_index.iter().all(|&x| x > 0.0));
    }
}
