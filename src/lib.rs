//! # campaign-sim — conversion outcomes under differential-privacy noise
//!
//! Models an advertising campaign's conversion count as a compound
//! Beta–Binomial process and quantifies how Laplace-mechanism noise changes
//! what a decision-maker can read off the released numbers.
//!
//! Pipeline:
//!
//! 1. [`variance`] turns a configured mean conversion rate into a sound Beta
//!    prior (and supports an increase/decrease variance ladder).
//! 2. [`simulate`] streams lazy Beta-then-Binomial draws from one seeded
//!    [`rng::VariateSource`].
//! 3. [`percentiles`] pushes millions of normalized counts through the
//!    bounded-memory [`digest::QuantileDigest`] to summarize the outcome
//!    distribution, yielding to the caller once per percent of progress.
//! 4. [`noise`] applies the Laplace mechanism (scale = sensitivity/epsilon)
//!    and provides its closed-form quantile function and CDF.
//! 5. [`questions`] and [`decision`] build the guessing-game inputs: paired
//!    true/noised observations and the agreement rate between the decisions
//!    they induce.
//!
//! Everything is synchronous, allocation-light, and deterministic under a
//! fixed seed; the only mutable state is the advancing PRNG.

pub mod constants;
pub mod decision;
pub mod digest;
pub mod error;
pub mod noise;
pub mod percentiles;
pub mod questions;
pub mod rng;
pub mod simulate;
pub mod variance;

// Re-export the function-level API consumed by UI/game-loop callers.
pub use decision::{decision_agreement, BandRule, Decision, DecisionRule, ThresholdRule};
pub use digest::QuantileDigest;
pub use error::{Result, SimError};
pub use noise::{laplace_cdf, laplace_noise, laplace_ppf, noise_scale};
pub use percentiles::{estimated_percentiles, summarize_campaign, PercentileSummary};
pub use questions::{generate_questions, random_index_order, Question};
pub use rng::VariateSource;
pub use simulate::{generate_conversion_counts, generate_conversion_rates};
pub use variance::{
    beta_shape_params, beta_variance, decrease_variance, default_variance, increase_variance,
};
