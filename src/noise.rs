//! Laplace mechanism for differential privacy.
//!
//! Perturbs a numeric query result with zero-centered Laplace noise of scale
//! sensitivity/epsilon, which makes the released value (epsilon, 0)-
//! differentially private. The quantile function (inverse CDF) and CDF are
//! closed-form, so confidence bands and threshold probabilities come straight
//! from formulas rather than extra random draws.

use crate::error::{Result, SimError};
use crate::rng::VariateSource;

/// Noise scale for the Laplace mechanism: sensitivity / epsilon.
/// Epsilon at or below zero means unbounded privacy loss and is rejected.
pub fn noise_scale(sensitivity: f64, epsilon: f64) -> Result<f64> {
    if !(sensitivity > 0.0 && sensitivity.is_finite()) {
        return Err(SimError::invalid(
            "sensitivity",
            sensitivity,
            "must be finite and > 0",
        ));
    }
    if !(epsilon > 0.0 && epsilon.is_finite()) {
        return Err(SimError::invalid(
            "epsilon",
            epsilon,
            "must be finite and > 0",
        ));
    }
    Ok(sensitivity / epsilon)
}

/// `value` plus one Laplace(0, sensitivity/epsilon) draw from `source`.
pub fn laplace_noise(
    value: f64,
    sensitivity: f64,
    epsilon: f64,
    source: &mut VariateSource,
) -> Result<f64> {
    let scale = noise_scale(sensitivity, epsilon)?;
    Ok(value + source.laplace(0.0, scale)?)
}

/// Quantile function (inverse CDF) of Laplace(0, sensitivity/epsilon):
/// `scale * ln(2p)` for p <= 1/2, `-scale * ln(2(1-p))` above.
///
/// A symmetric confidence band needs only two evaluations, e.g. p = 0.025
/// and p = 0.975 for 95%.
pub fn laplace_ppf(p: f64, sensitivity: f64, epsilon: f64) -> Result<f64> {
    let scale = noise_scale(sensitivity, epsilon)?;
    if !(p > 0.0 && p < 1.0) {
        return Err(SimError::invalid("p", p, "must lie in (0, 1)"));
    }
    if p <= 0.5 {
        Ok(scale * (2.0 * p).ln())
    } else {
        Ok(-scale * (2.0 * (1.0 - p)).ln())
    }
}

/// CDF of Laplace(mean, scale) at `x`.
pub fn laplace_cdf(x: f64, mean: f64, scale: f64) -> Result<f64> {
    if !(scale > 0.0 && scale.is_finite()) {
        return Err(SimError::invalid("scale", scale, "must be finite and > 0"));
    }
    let z = (x - mean) / scale;
    if z < 0.0 {
        Ok(0.5 * z.exp())
    } else {
        Ok(1.0 - 0.5 * (-z).exp())
    }
}
