//! Property-based tests for the variance model and noise formulas.

use proptest::prelude::*;

use campaign_sim::{
    beta_shape_params, beta_variance, decrease_variance, default_variance,
    generate_conversion_counts, increase_variance, laplace_cdf, laplace_ppf,
};

/// Strategy: a mean safely inside (0, 1).
fn mean_strategy() -> impl Strategy<Value = f64> {
    0.001..0.999f64
}

/// Strategy: (mean, variance) with variance strictly inside (0, mean*(1-mean)).
fn mean_variance_strategy() -> impl Strategy<Value = (f64, f64)> {
    (mean_strategy(), 0.01..0.95f64)
        .prop_map(|(mean, frac)| (mean, mean * (1.0 - mean) * frac))
}

proptest! {
    // 1. Valid (mean, variance) always yields positive shape parameters.
    #[test]
    fn shape_params_positive((mean, variance) in mean_variance_strategy()) {
        let (alpha, beta) = beta_shape_params(mean, variance).unwrap();
        prop_assert!(alpha > 0.0, "alpha={alpha}");
        prop_assert!(beta > 0.0, "beta={beta}");
    }

    // 2. Moment matching round-trips: variance of the derived shape pair is
    //    the requested variance.
    #[test]
    fn shape_params_round_trip((mean, variance) in mean_variance_strategy()) {
        let (alpha, beta) = beta_shape_params(mean, variance).unwrap();
        let back = beta_variance(alpha, beta);
        prop_assert!((back - variance).abs() / variance < 1e-9,
            "variance {variance} -> {back}");
    }

    // 3. Variance at or above the Bernoulli bound is rejected.
    #[test]
    fn shape_params_reject_bound(mean in mean_strategy(), extra in 1.0..3.0f64) {
        let variance = mean * (1.0 - mean) * extra;
        prop_assert!(beta_shape_params(mean, variance).is_err());
    }

    // 4. The default variance always pins the smaller shape parameter to 2.
    #[test]
    fn default_variance_min_shape_is_two(mean in mean_strategy()) {
        let v = default_variance(mean).unwrap();
        let (alpha, beta) = beta_shape_params(mean, v).unwrap();
        let smaller = alpha.min(beta);
        prop_assert!((smaller - 2.0).abs() < 1e-6,
            "mean {mean}: min shape {smaller}");
    }

    // 5. increase/decrease variance are near-inverses and keep the smaller
    //    shape parameter above 1.
    #[test]
    fn variance_ladder_round_trip(mean in mean_strategy()) {
        let v0 = default_variance(mean).unwrap();
        let up = increase_variance(mean, v0).unwrap();
        prop_assert!(up > v0);
        let back = decrease_variance(mean, up).unwrap();
        prop_assert!((back - v0).abs() / v0 < 1e-9, "{v0} -> {up} -> {back}");
        let (alpha, beta) = beta_shape_params(mean, up).unwrap();
        prop_assert!(alpha.min(beta) > 1.0);
    }

    // 6. Laplace quantile function is antisymmetric around the median.
    #[test]
    fn laplace_ppf_symmetry(p in 0.001..0.5f64, epsilon in 0.01..10.0f64) {
        let lo = laplace_ppf(p, 1.0, epsilon).unwrap();
        let hi = laplace_ppf(1.0 - p, 1.0, epsilon).unwrap();
        prop_assert!((lo + hi).abs() < 1e-9 * (1.0 + hi.abs()));
        prop_assert!(lo <= 0.0);
    }

    // 7. Laplace CDF inverts the quantile function.
    #[test]
    fn laplace_cdf_inverts_ppf(p in 0.001..0.999f64, epsilon in 0.01..10.0f64) {
        let scale = 1.0 / epsilon;
        let x = laplace_ppf(p, 1.0, epsilon).unwrap();
        let back = laplace_cdf(x, 0.0, scale).unwrap();
        prop_assert!((back - p).abs() < 1e-9, "p {p} -> x {x} -> {back}");
    }

    // 8. Simulated counts never leave [0, impressions], for any seed.
    #[test]
    fn counts_stay_in_range(seed in any::<u64>(), mean in 0.01..0.5f64) {
        let variance = default_variance(mean).unwrap();
        let impressions = 10_000u64;
        let counts =
            generate_conversion_counts(impressions, mean, variance, 50, Some(seed)).unwrap();
        for c in counts {
            prop_assert!(c <= impressions);
        }
    }
}
