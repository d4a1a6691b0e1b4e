use approx::assert_abs_diff_eq;
use irs_path_sim::process::heston::VarianceParams;
use irs_path_sim::rng::PseudoRng;
use irs_path_sim::sampler::{CltSampler, DEFAULT_CLT_ITERATIONS, NormalSampler};
use irs_path_sim::{Correlation, ModelError, ModelParams, RiskFactorModel};

struct Constant(f64);

impl NormalSampler for Constant {
    fn sample(&mut self) -> f64 {
        self.0
    }
}

#[test]
fn constant_sampler_step_is_bit_exact() {
    let mut model = RiskFactorModel::new(0.2, 1.0, Constant(0.1), ModelParams::default()).unwrap();
    let r = model.step_mean_reverting_rate(0.03, false, None).unwrap();
    let expected = 0.03 + 0.5 * (0.04 - 0.03) * 1.0 + 0.2 * (0.1 * 1.0_f64.sqrt());
    assert_eq!(r.to_bits(), expected.to_bits());
}

#[test]
fn long_run_level_without_volatility_is_a_fixed_point() {
    let params = ModelParams::default();
    let mut model = RiskFactorModel::new(0.0, 0.5, Constant(0.7), params).unwrap();
    let b = params.long_run_rate;
    assert_eq!(model.step_mean_reverting_rate(b, false, None).unwrap(), b);
}

#[test]
fn feller_condition_gates_model_construction() {
    let violating = ModelParams {
        variance: VarianceParams {
            theta: 0.5,
            long_run_variance: 0.16,
            vol_of_vol: 0.9,
        },
        ..ModelParams::default()
    };
    let ok = ModelParams {
        variance: VarianceParams {
            vol_of_vol: 0.2,
            ..violating.variance
        },
        ..violating
    };
    assert!(matches!(
        RiskFactorModel::new(0.2, 0.004, Constant(0.0), violating),
        Err(ModelError::FellerViolation { .. })
    ));
    assert!(RiskFactorModel::new(0.2, 0.004, Constant(0.0), ok).is_ok());
}

#[test]
fn jointly_driven_factors_pick_up_requested_correlation() {
    let dt = 1.0 / 250.0;
    let rho = Correlation::new(0.7).unwrap();
    let sampler = CltSampler::new(PseudoRng::from_seed(123), DEFAULT_CLT_ITERATIONS);
    let mut model = RiskFactorModel::new(0.01, dt, sampler, ModelParams::default()).unwrap();

    let n = 40_000;
    let mut rate_shocks = Vec::with_capacity(n);
    let mut asset_shocks = Vec::with_capacity(n);
    for _ in 0..n {
        model.draw_increment();
        model.step_mean_reverting_rate(0.03, false, None).unwrap();
        rate_shocks.push(model.increment());
        model.step_geometric_brownian(100.0, false, Some(rho)).unwrap();
        asset_shocks.push(model.increment());
    }

    let mean = |xs: &[f64]| xs.iter().sum::<f64>() / xs.len() as f64;
    let (mx, my) = (mean(&rate_shocks), mean(&asset_shocks));
    let cov: f64 = rate_shocks
        .iter()
        .zip(&asset_shocks)
        .map(|(x, y)| (x - mx) * (y - my))
        .sum();
    let vx: f64 = rate_shocks.iter().map(|x| (x - mx).powi(2)).sum();
    let vy: f64 = asset_shocks.iter().map(|y| (y - my).powi(2)).sum();
    assert_abs_diff_eq!(cov / (vx * vy).sqrt(), 0.7, epsilon = 0.03);
}

#[test]
fn invalid_correlation_never_reaches_a_model() {
    assert!(matches!(
        Correlation::new(9.99),
        Err(ModelError::InvalidCorrelation(_))
    ));
}
