//! Campaign-outcome percentile estimation.
//!
//! Streams simulated conversion counts through the quantile digest to answer
//! "what does a bad / median / good campaign look like" for a configuration.
//! Counts are normalized by the impression count before entering the digest
//! (keeping its internal scale stable regardless of campaign size) and scaled
//! back when queried.
//!
//! The ingest loop is cooperatively interruptible: once per percent of
//! progress it merges the digest and invokes the caller's progress callback.
//! Returning `false` from the callback aborts the run with
//! [`SimError::Cancelled`]; no external state is held, so an abort discards
//! only local memory. Progress plumbing never changes the computed numbers.

use serde::Serialize;

use crate::constants::{DEFAULT_PERCENTILES, PROGRESS_STEPS};
use crate::digest::QuantileDigest;
use crate::error::{Result, SimError};
use crate::simulate::generate_conversion_counts;

/// Estimated conversion-count percentiles for a campaign configuration.
///
/// Streams `num_samples` simulated counts into a quantile digest and returns
/// one estimate per entry of `percentiles` (each in [0, 1]), in order.
///
/// `on_progress` is called with the integer percent complete roughly once per
/// percent; return `false` to abort. Pass `|_| true` when progress reporting
/// is not needed.
///
/// Means extremely close to 0 or 1 skew nearly the whole stream onto one
/// digest flank; callers can compensate with a reduced `num_samples`.
pub fn estimated_percentiles(
    impressions: u64,
    mean: f64,
    variance: f64,
    num_samples: usize,
    seed: Option<u64>,
    percentiles: &[f64],
    mut on_progress: impl FnMut(u8) -> bool,
) -> Result<Vec<f64>> {
    if num_samples == 0 {
        return Err(SimError::invalid("num_samples", 0.0, "must be > 0"));
    }
    for &p in percentiles {
        if !(0.0..=1.0).contains(&p) {
            return Err(SimError::invalid("percentile", p, "must lie in [0, 1]"));
        }
    }

    let counts = generate_conversion_counts(impressions, mean, variance, num_samples, seed)?;
    let scale = impressions as f64;
    let chunk = (num_samples / PROGRESS_STEPS).max(1);

    let mut digest = QuantileDigest::default();
    for (i, count) in counts.enumerate() {
        digest.push(count as f64 / scale);
        if (i + 1) % chunk == 0 {
            digest.compress();
            let percent = (((i + 1) * 100) / num_samples).min(100) as u8;
            if !on_progress(percent) {
                return Err(SimError::Cancelled);
            }
        }
    }
    digest.compress();

    percentiles
        .iter()
        .map(|&p| digest.percentile(p).map(|v| v * scale))
        .collect()
}

// ── Summary report ──────────────────────────────────────────────────

/// One reported percentile with its UI label.
#[derive(Debug, Serialize)]
pub struct PercentileEntry {
    pub percentile: f64,
    pub label: &'static str,
    pub conversions: f64,
    pub conversion_rate: f64,
}

/// Serializable summary over the default percentile set.
#[derive(Debug, Serialize)]
pub struct PercentileSummary {
    pub impressions: u64,
    pub mean: f64,
    pub variance: f64,
    pub num_samples: usize,
    pub seed: Option<u64>,
    pub entries: Vec<PercentileEntry>,
}

impl PercentileSummary {
    /// The entry for a given percentile, if it was requested.
    /// Keeps callers independent of the ordering of the default set.
    pub fn entry_at(&self, percentile: f64) -> Option<&PercentileEntry> {
        self.entries
            .iter()
            .find(|e| (e.percentile - percentile).abs() < 1e-12)
    }
}

fn label_for(p: f64) -> &'static str {
    match p {
        p if p <= 0.01 => "very bad",
        p if p <= 0.1 => "bad",
        p if p <= 0.5 => "median",
        p if p <= 0.9 => "good",
        _ => "very good",
    }
}

/// Run [`estimated_percentiles`] over [`DEFAULT_PERCENTILES`] and package the
/// result for display or JSON output.
pub fn summarize_campaign(
    impressions: u64,
    mean: f64,
    variance: f64,
    num_samples: usize,
    seed: Option<u64>,
    on_progress: impl FnMut(u8) -> bool,
) -> Result<PercentileSummary> {
    let values = estimated_percentiles(
        impressions,
        mean,
        variance,
        num_samples,
        seed,
        &DEFAULT_PERCENTILES,
        on_progress,
    )?;
    let entries = DEFAULT_PERCENTILES
        .iter()
        .zip(values)
        .map(|(&p, v)| PercentileEntry {
            percentile: p,
            label: label_for(p),
            conversions: v,
            conversion_rate: v / impressions as f64,
        })
        .collect();
    Ok(PercentileSummary {
        impressions,
        mean,
        variance,
        num_samples,
        seed,
        entries,
    })
}
