//! Error taxonomy for the simulation core.
//!
//! All errors are local to a single call; computations are pure aside from the
//! advancing random source, so there is no cross-call recovery.

use thiserror::Error;

/// Errors produced by the simulation core.
#[derive(Debug, Error)]
pub enum SimError {
    /// A precondition on an input parameter was violated.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Valid-looking inputs produced non-finite or non-positive shape
    /// parameters (e.g. variance too close to the Bernoulli bound).
    #[error("numeric degeneracy: {0}")]
    NumericDegeneracy(String),

    /// A percentile was queried from a digest with no merged samples.
    #[error("incomplete state: {0}")]
    IncompleteState(&'static str),

    /// The progress callback requested an early abort.
    #[error("estimation cancelled by caller")]
    Cancelled,
}

impl SimError {
    pub(crate) fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        SimError::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
