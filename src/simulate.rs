//! Conversion-outcome simulation — the compound Beta–Binomial model.
//!
//! A campaign's conversion rate is itself uncertain: it varies campaign to
//! campaign around the configured mean. Each simulated outcome therefore
//! draws a rate p from Beta(alpha, beta) (matched to the configured mean and
//! variance), then a conversion count from Binomial(impressions, p). The rate
//! draw and the count draw consume the same variate stream, so a fixed seed
//! reproduces the full pair of sequences.

use rand_distr::{Beta, Binomial};

use crate::error::{Result, SimError};
use crate::rng::VariateSource;
use crate::variance::beta_shape_params;

/// Lazy, finite sequence of conversion-rate draws from Beta(alpha, beta).
pub struct ConversionRates {
    dist: Beta<f64>,
    source: VariateSource,
    remaining: usize,
}

impl Iterator for ConversionRates {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.source.sample(&self.dist))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ConversionRates {}

/// Lazy, finite sequence of simulated conversion counts in [0, impressions].
///
/// Invariant: `dist` is a validated Beta distribution, so every rate it
/// yields is a probability in [0, 1] and the per-item Binomial construction
/// cannot fail. That is what lets [`Iterator::next`] stay infallible.
pub struct ConversionCounts {
    impressions: u64,
    dist: Beta<f64>,
    source: VariateSource,
    remaining: usize,
}

impl Iterator for ConversionCounts {
    type Item = u64;

    fn next(&mut self) -> Option<u64> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let p = self.source.sample(&self.dist);
        // Infallible per the struct invariant: p is a valid probability.
        let binomial =
            Binomial::new(self.impressions, p).expect("Beta draw is a valid probability");
        Some(self.source.sample(&binomial))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for ConversionCounts {}

fn beta_dist(mean: f64, variance: f64) -> Result<Beta<f64>> {
    let (alpha, beta) = beta_shape_params(mean, variance)?;
    Beta::new(alpha, beta).map_err(|e| {
        SimError::NumericDegeneracy(format!("Beta({alpha}, {beta}) is not samplable: {e}"))
    })
}

/// `count` conversion-rate draws for the given mean and variance.
/// Restartable only by re-invocation.
pub fn generate_conversion_rates(
    mean: f64,
    variance: f64,
    count: usize,
    seed: Option<u64>,
) -> Result<ConversionRates> {
    Ok(ConversionRates {
        dist: beta_dist(mean, variance)?,
        source: VariateSource::new(seed),
        remaining: count,
    })
}

/// `count` simulated conversion counts for a campaign of `impressions`
/// impressions. One rate draw and one count draw per item, from one stream.
pub fn generate_conversion_counts(
    impressions: u64,
    mean: f64,
    variance: f64,
    count: usize,
    seed: Option<u64>,
) -> Result<ConversionCounts> {
    if impressions == 0 {
        return Err(SimError::invalid("impressions", 0.0, "must be > 0"));
    }
    Ok(ConversionCounts {
        impressions,
        dist: beta_dist(mean, variance)?,
        source: VariateSource::new(seed),
        remaining: count,
    })
}
