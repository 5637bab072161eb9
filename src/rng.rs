//! Seedable random variate source.
//!
//! Wraps a `SmallRng` and produces the three variate families the simulator
//! needs: Beta (conversion-rate draws), Binomial (per-campaign conversion
//! counts), and Laplace (privacy noise). A seeded source replays the exact
//! same variate sequence on every run, which is what makes simulation results
//! reproducible and lets one logical round hand out identical noised/unnoised
//! question pairs. An unseeded source pulls entropy from the OS.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Beta, Binomial, Distribution};

use crate::error::{Result, SimError};

/// A single stream of pseudo-random variates.
///
/// Generators that must be sequence-coupled (e.g. rate draws and the count
/// draws derived from them) should share one source; independent runs should
/// each construct their own.
pub struct VariateSource {
    rng: SmallRng,
}

impl VariateSource {
    /// Seeded when `seed` is `Some`, OS-entropy otherwise.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self::seeded(s),
            None => Self::from_entropy(),
        }
    }

    /// Deterministic source: the same seed always yields the same sequence.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Non-deterministic source backed by OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_os_rng(),
        }
    }

    /// Draw from a pre-validated distribution. Lets hot loops construct the
    /// distribution once and sample it repeatedly from this stream.
    #[inline]
    pub fn sample<T, D: Distribution<T>>(&mut self, dist: &D) -> T {
        dist.sample(&mut self.rng)
    }

    /// One Beta(alpha, beta) variate in (0, 1).
    ///
    /// Non-finite or non-positive shape parameters are degenerate: the
    /// distribution constructor only rejects the non-positive case, so the
    /// finiteness check here keeps infinities from sampling garbage.
    pub fn beta(&mut self, alpha: f64, beta: f64) -> Result<f64> {
        if !(alpha.is_finite() && beta.is_finite()) {
            return Err(SimError::NumericDegeneracy(format!(
                "Beta({alpha}, {beta}) has non-finite shape"
            )));
        }
        let dist = Beta::new(alpha, beta).map_err(|e| {
            SimError::NumericDegeneracy(format!("Beta({alpha}, {beta}) is not samplable: {e}"))
        })?;
        Ok(dist.sample(&mut self.rng))
    }

    /// One Binomial(n, p) variate in [0, n].
    pub fn binomial(&mut self, n: u64, p: f64) -> Result<u64> {
        let dist = Binomial::new(n, p).map_err(|e| {
            SimError::NumericDegeneracy(format!("Binomial({n}, {p}) is not samplable: {e}"))
        })?;
        Ok(dist.sample(&mut self.rng))
    }

    /// One Laplace(location, scale) variate, sampled by inverse CDF:
    /// for U ~ Uniform(-1/2, 1/2), X = location - scale * sgn(U) * ln(1 - 2|U|).
    pub fn laplace(&mut self, location: f64, scale: f64) -> Result<f64> {
        if scale <= 0.0 || !scale.is_finite() {
            return Err(SimError::invalid("scale", scale, "must be finite and > 0"));
        }
        // random::<f64>() covers [0, 1); reject the single point u = -1/2
        // where the inverse CDF blows up.
        let u = loop {
            let u = self.rng.random::<f64>() - 0.5;
            if u > -0.5 {
                break u;
            }
        };
        Ok(location - scale * u.signum() * (1.0 - 2.0 * u.abs()).ln())
    }

    /// Uniform index in [0, n). Used by the question-order shuffle.
    #[inline]
    pub fn index(&mut self, n: usize) -> usize {
        self.rng.random_range(0..n)
    }
}
