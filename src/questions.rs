//! Question generation for the guessing game.
//!
//! Each question pairs one simulated conversion count with one pre-drawn
//! Laplace noise value. The game loop shows the same campaign twice — once
//! raw, once noised — so both draws happen up front from a single variate
//! stream, and a seeded stream hands out the identical pair set across
//! re-renders within one logical round.

use serde::Serialize;

use crate::error::{Result, SimError};
use crate::noise::laplace_noise;
use crate::rng::VariateSource;
use crate::variance::beta_shape_params;

/// One game question: a true simulated count and its privacy noise.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Question {
    pub conversions: u64,
    pub noise: f64,
}

impl Question {
    /// The count as released under the Laplace mechanism.
    pub fn noised_observation(&self) -> f64 {
        self.conversions as f64 + self.noise
    }
}

/// Generate `num_questions` questions for one game round.
///
/// Per question: one Beta rate draw, one Binomial count draw, one Laplace
/// noise draw, all from the same source in a fixed order.
pub fn generate_questions(
    impressions: u64,
    conversion_rate: f64,
    variance: f64,
    sensitivity: f64,
    epsilon: f64,
    num_questions: usize,
    seed: Option<u64>,
) -> Result<Vec<Question>> {
    // Validate configuration up front so a bad campaign or epsilon fails
    // before any simulation work.
    if impressions == 0 {
        return Err(SimError::invalid("impressions", 0.0, "must be > 0"));
    }
    let (alpha, beta) = beta_shape_params(conversion_rate, variance)?;
    let mut source = VariateSource::new(seed);

    let mut questions = Vec::with_capacity(num_questions);
    for _ in 0..num_questions {
        let p = source.beta(alpha, beta)?;
        let conversions = source.binomial(impressions, p)?;
        let noise = laplace_noise(0.0, sensitivity, epsilon, &mut source)?;
        questions.push(Question { conversions, noise });
    }
    Ok(questions)
}

/// Fisher–Yates shuffle of `0..n`, used to present questions in independent
/// random orders for the noised and unnoised passes.
pub fn random_index_order(n: usize, source: &mut VariateSource) -> Vec<usize> {
    let mut order: Vec<usize> = (0..n).collect();
    for i in (1..n).rev() {
        let j = source.index(i + 1);
        order.swap(i, j);
    }
    order
}
