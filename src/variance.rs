//! Beta-prior variance model for conversion rates.
//!
//! Conversion rates are modeled as Beta-distributed around a configured mean.
//! This module solves the moment-matching equations between (mean, variance)
//! and the Beta shape parameters (alpha, beta), derives a sound default
//! variance for any mean, and implements the increase/decrease variance
//! ladder used by the validation step.
//!
//! The default variance starts from a reference fit ([`ALPHA_FIT`],
//! [`BETA_FIT`]) and rescales the derived shape pair so that
//! `min(alpha, beta) == 2`. Keeping both shape parameters at 2 or above keeps
//! the rate distribution unimodal with no mass piling up at 0 or 1, no matter
//! how skewed the configured mean is.

use crate::constants::{ALPHA_FIT, BETA_FIT};
use crate::error::{Result, SimError};

/// Reject means outside the open interval (0, 1).
fn validate_mean(mean: f64) -> Result<()> {
    if !(mean > 0.0 && mean < 1.0) {
        return Err(SimError::invalid("mean", mean, "must lie in (0, 1)"));
    }
    Ok(())
}

/// Solve the Beta moment-matching equations for (mean, variance):
///
/// ```text
/// alpha = mean^2 * ((1 - mean)/variance - 1/mean)
/// beta  = alpha * (1/mean - 1)
/// ```
///
/// The variance of a Bernoulli process with rate `mean` is `mean*(1-mean)`;
/// any requested variance at or above that bound has no Beta solution and is
/// rejected. Shape parameters that come out non-finite or non-positive (a
/// variance pushed right up against the bound can do this in floating point)
/// surface as [`SimError::NumericDegeneracy`].
pub fn beta_shape_params(mean: f64, variance: f64) -> Result<(f64, f64)> {
    validate_mean(mean)?;
    let bound = mean * (1.0 - mean);
    if !(variance > 0.0 && variance < bound) {
        return Err(SimError::invalid(
            "variance",
            variance,
            "must lie in (0, mean*(1-mean))",
        ));
    }

    let alpha = mean * mean * ((1.0 - mean) / variance - 1.0 / mean);
    let beta = alpha * (1.0 / mean - 1.0);

    if !(alpha.is_finite() && beta.is_finite() && alpha > 0.0 && beta > 0.0) {
        return Err(SimError::NumericDegeneracy(format!(
            "mean {mean} and variance {variance} produced shape ({alpha}, {beta})"
        )));
    }
    Ok((alpha, beta))
}

/// Variance of Beta(alpha, beta):
/// `alpha*beta / ((alpha+beta)^2 * (alpha+beta+1))`.
pub fn beta_variance(alpha: f64, beta: f64) -> f64 {
    let s = alpha + beta;
    (alpha * beta) / (s * s * (s + 1.0))
}

/// Default conversion-rate variance for a given mean.
///
/// Starts from the reference fit's variance, clamps it below the Bernoulli
/// bound (the clamp is deliberate policy, not error recovery), derives the
/// shape pair for this mean, then rescales both parameters by a common factor
/// so the smaller one lands exactly on 2. Rescaling both by the same factor
/// leaves the mean untouched.
pub fn default_variance(mean: f64) -> Result<f64> {
    validate_mean(mean)?;
    let fit_variance = beta_variance(ALPHA_FIT, BETA_FIT);
    let clamped = (mean * (1.0 - mean) * 0.999).min(fit_variance);
    let (alpha, beta) = beta_shape_params(mean, clamped)?;
    let k = 2.0 / alpha.min(beta);
    Ok(beta_variance(k * alpha, k * beta))
}

/// One step up the variance ladder: moves the smaller shape parameter halfway
/// toward 1 (smaller shape parameters mean a wider Beta), preserving the mean.
/// Inverse of [`decrease_variance`] up to floating-point error.
pub fn increase_variance(mean: f64, variance: f64) -> Result<f64> {
    let (alpha, beta) = beta_shape_params(mean, variance)?;
    let s = alpha.min(beta);
    let k = ((s - 1.0) / 2.0 + 1.0) / s;
    Ok(beta_variance(k * alpha, k * beta))
}

/// One step down the variance ladder: doubles the smaller shape parameter's
/// distance from 1, preserving the mean.
pub fn decrease_variance(mean: f64, variance: f64) -> Result<f64> {
    let (alpha, beta) = beta_shape_params(mean, variance)?;
    let s = alpha.min(beta);
    let k = ((s - 1.0) * 2.0 + 1.0) / s;
    Ok(beta_variance(k * alpha, k * beta))
}
