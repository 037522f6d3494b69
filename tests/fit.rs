use rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

use mixfit::dist::{Gaussian, Mixture};
use mixfit::em::{Em, MixtureParams, Normalization};
use mixfit::traits::*;

fn draw_bimodal(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = Xoshiro256Plus::seed_from_u64(seed);
    let truth = Mixture::new(
        vec![0.3, 0.7],
        vec![
            Gaussian::new(2.0, 0.5).unwrap(),
            Gaussian::new(5.0, 0.7).unwrap(),
        ],
    )
    .unwrap();
    truth.sample(n, &mut rng)
}

#[test]
fn recovers_bimodal_parameters_with_per_observation_norm() {
    let xs = draw_bimodal(5_000, 0x1337);
    let guess =
        MixtureParams::new(vec![0.5, 0.5], vec![1.5, 4.5], vec![1.0, 1.0])
            .unwrap();

    let est = Em::new(100)
        .with_normalization(Normalization::PerObservation)
        .fit_from(&xs, guess)
        .unwrap();

    // Component order follows the guess: low cluster first
    approx::assert_abs_diff_eq!(est.mus()[0], 2.0, epsilon = 0.2);
    approx::assert_abs_diff_eq!(est.mus()[1], 5.0, epsilon = 0.2);
    approx::assert_abs_diff_eq!(est.sigmas()[0], 0.5, epsilon = 0.2);
    approx::assert_abs_diff_eq!(est.sigmas()[1], 0.7, epsilon = 0.2);
    approx::assert_abs_diff_eq!(est.weights()[0], 0.3, epsilon = 0.1);
    approx::assert_abs_diff_eq!(est.weights()[1], 0.7, epsilon = 0.1);

    approx::assert_abs_diff_eq!(
        est.weights().iter().sum::<f64>(),
        1.0,
        epsilon = 1E-6
    );
}

#[test]
fn joint_norm_returns_finite_positive_estimates() {
    let xs = draw_bimodal(5_000, 0x1337);
    let guess =
        MixtureParams::new(vec![0.5, 0.5], vec![1.5, 4.5], vec![1.0, 1.0])
            .unwrap();

    let est = Em::new(100).fit_from(&xs, guess).unwrap();

    assert!(est.weights().iter().all(|&w| w > 0.0 && w.is_finite()));
    assert!(est.mus().iter().all(|m| m.is_finite()));
    assert!(est.sigmas().iter().all(|&s| s > 0.0 && s.is_finite()));

    // Joint responsibilities still carry unit total mass
    approx::assert_abs_diff_eq!(
        est.weights().iter().sum::<f64>(),
        1.0,
        epsilon = 1E-6
    );
}

#[test]
fn fit_is_deterministic_for_a_fixed_sample() {
    let xs = draw_bimodal(1_000, 0xBEEF);
    let guess =
        MixtureParams::new(vec![0.5, 0.5], vec![1.5, 4.5], vec![1.0, 1.0])
            .unwrap();

    let a = Em::new(50).fit_from(&xs, guess.clone()).unwrap();
    let b = Em::new(50).fit_from(&xs, guess).unwrap();

    assert_eq!(a, b);
}

#[test]
fn sample_stream_feeds_the_estimator() {
    let mut rng = Xoshiro256Plus::seed_from_u64(0xFEED);
    let truth = Mixture::uniform(vec![
        Gaussian::new(-3.0, 1.0).unwrap(),
        Gaussian::new(3.0, 1.0).unwrap(),
    ])
    .unwrap();

    let xs: Vec<f64> = truth.sample_stream(&mut rng).take(2_000).collect();

    let guess =
        MixtureParams::new(vec![0.5, 0.5], vec![-1.0, 1.0], vec![2.0, 2.0])
            .unwrap();
    let est = Em::new(60)
        .with_normalization(Normalization::PerObservation)
        .fit_from(&xs, guess)
        .unwrap();

    approx::assert_abs_diff_eq!(est.mus()[0], -3.0, epsilon = 0.3);
    approx::assert_abs_diff_eq!(est.mus()[1], 3.0, epsilon = 0.3);
}
