//! Shared constants for the campaign simulator.

/// Reference Beta fit for conversion-rate variability, estimated offline from
/// real campaign data. Treated as configuration, never re-derived at runtime.
pub const ALPHA_FIT: f64 = 1.2695280130777336;
/// Reference Beta fit, second shape parameter. See [`ALPHA_FIT`].
pub const BETA_FIT: f64 = 26.876825491735;

/// Default seed used by reproducibility scenarios and the CLI.
pub const DEFAULT_SEED: u64 = 1613149041;

/// Percentile set reported by default: very bad / bad / median / good / very good.
pub const DEFAULT_PERCENTILES: [f64; 5] = [0.01, 0.1, 0.5, 0.9, 0.99];

/// Sensitivity of a conversion count to one individual: one conversion.
pub const DEFAULT_SENSITIVITY: f64 = 1.0;

/// t-digest compression factor. Bounds the centroid count (and therefore memory)
/// independent of stream length; larger values trade memory for tail accuracy.
pub const DIGEST_COMPRESSION: f64 = 100.0;

/// Unmerged values buffered in the digest before an automatic merge pass.
pub const DIGEST_BUFFER_CAP: usize = 4096;

/// Progress callback cadence for percentile estimation: once per percent.
pub const PROGRESS_STEPS: usize = 100;
