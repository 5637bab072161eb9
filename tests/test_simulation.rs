//! End-to-end simulation tests: reproducibility under fixed seeds and
//! statistical convergence of the percentile and noise paths.

use campaign_sim::constants::DEFAULT_SEED;
use campaign_sim::{
    decision_agreement, default_variance, estimated_percentiles, generate_conversion_counts,
    generate_questions, laplace_noise, laplace_ppf, summarize_campaign, SimError, ThresholdRule,
    VariateSource,
};

#[test]
fn test_reference_scenario_reproducible() {
    // impressions 1M, mean 0.01, default variance, 100k samples, fixed seed:
    // two runs must agree exactly.
    let variance = default_variance(0.01).unwrap();
    let a = estimated_percentiles(
        1_000_000,
        0.01,
        variance,
        100_000,
        Some(DEFAULT_SEED),
        &[0.5],
        |_| true,
    )
    .unwrap();
    let b = estimated_percentiles(
        1_000_000,
        0.01,
        variance,
        100_000,
        Some(DEFAULT_SEED),
        &[0.5],
        |_| true,
    )
    .unwrap();
    assert_eq!(a[0].to_bits(), b[0].to_bits());
}

#[test]
fn test_median_tracks_configured_mean() {
    let mean = 0.05;
    let impressions = 1_000_000u64;
    // A narrow prior keeps the Beta median close to its mean; the digest's
    // median estimate should land within a few percent.
    let variance = mean * (1.0 - mean) / 1000.0;
    let out = estimated_percentiles(
        impressions,
        mean,
        variance,
        100_000,
        Some(DEFAULT_SEED),
        &[0.5],
        |_| true,
    )
    .unwrap();
    let implied_rate = out[0] / impressions as f64;
    assert!(
        (implied_rate - mean).abs() / mean < 0.1,
        "median-implied rate {implied_rate} vs mean {mean}"
    );
}

#[test]
fn test_percentile_spread_widens_with_variance() {
    let mean = 0.05;
    let impressions = 100_000u64;
    let narrow = mean * (1.0 - mean) / 2000.0;
    let wide = default_variance(mean).unwrap();
    let spread = |variance: f64| {
        let out = estimated_percentiles(
            impressions,
            mean,
            variance,
            50_000,
            Some(7),
            &[0.1, 0.9],
            |_| true,
        )
        .unwrap();
        out[1] - out[0]
    };
    assert!(spread(wide) > spread(narrow));
}

#[test]
fn test_counts_deterministic_and_seed_sensitive() {
    let variance = default_variance(0.03).unwrap();
    let run = |seed: u64| -> Vec<u64> {
        generate_conversion_counts(250_000, 0.03, variance, 100, Some(seed))
            .unwrap()
            .collect()
    };
    assert_eq!(run(1), run(1));
    assert_ne!(run(1), run(2));
}

#[test]
fn test_noise_converges_to_value() {
    let mut source = VariateSource::seeded(DEFAULT_SEED);
    let n = 200_000;
    let value = 452.0;
    let sum: f64 = (0..n)
        .map(|_| laplace_noise(value, 1.0, 1.0, &mut source).unwrap())
        .sum();
    let mean = sum / n as f64;
    assert!((mean - value).abs() < 0.02, "noised mean {mean}");
}

#[test]
fn test_confidence_band_covers_95_percent() {
    let mut source = VariateSource::seeded(5);
    let epsilon = 0.5;
    let hi = laplace_ppf(0.975, 1.0, epsilon).unwrap();
    let lo = laplace_ppf(0.025, 1.0, epsilon).unwrap();
    let n = 100_000;
    let inside = (0..n)
        .filter(|_| {
            let x = laplace_noise(0.0, 1.0, epsilon, &mut source).unwrap();
            x >= lo && x <= hi
        })
        .count();
    let coverage = inside as f64 / n as f64;
    assert!(
        (coverage - 0.95).abs() < 0.005,
        "95% band covered {coverage}"
    );
}

#[test]
fn test_cancelled_run_reports_cancelled() {
    let variance = default_variance(0.05).unwrap();
    let result = estimated_percentiles(
        1_000_000,
        0.05,
        variance,
        100_000,
        Some(1),
        &[0.5],
        |pct| pct < 50,
    );
    assert!(matches!(result, Err(SimError::Cancelled)));
}

#[test]
fn test_summary_round_trips_through_json() {
    let variance = default_variance(0.05).unwrap();
    let summary =
        summarize_campaign(10_000, 0.05, variance, 10_000, Some(3), |_| true).unwrap();
    let json = serde_json::to_string(&summary).unwrap();
    assert!(json.contains("\"very bad\""));
    assert!(json.contains("\"impressions\":10000"));
}

#[test]
fn test_agreement_degrades_as_epsilon_shrinks() {
    let mean = 0.05;
    let impressions = 10_000u64;
    let variance = default_variance(mean).unwrap();
    let median = (impressions as f64) * mean;
    let rule = ThresholdRule { threshold: median };

    let agreement_at = |epsilon: f64| {
        let questions = generate_questions(
            impressions,
            mean,
            variance,
            1.0,
            epsilon,
            2_000,
            Some(DEFAULT_SEED),
        )
        .unwrap();
        let bound = laplace_ppf(0.975, 1.0, epsilon).unwrap();
        decision_agreement(&rule, &questions, bound)
    };

    // Generous noise (tiny epsilon) should flip far more decisions than
    // near-zero noise.
    let noisy = agreement_at(0.001);
    let quiet = agreement_at(100.0);
    assert!(quiet > 0.99, "quiet agreement {quiet}");
    assert!(noisy < quiet, "noisy {noisy} !< quiet {quiet}");
}
