//! Spend-decision rules and noised-decision agreement.
//!
//! A decision-maker reads a campaign's conversion count and decides whether
//! to change spend. Privacy noise can flip that decision; the interesting
//! quantity is how often the noised observation leads to the same call as the
//! true count. Rules see the observation plus a confidence band around it
//! (for a true count the band collapses to the point itself).

use serde::Serialize;

use crate::questions::Question;

/// A spend decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    IncreaseSpend,
    MaintainSpend,
    DecreaseSpend,
}

/// Maps an observation (with its confidence band) to a decision.
pub trait DecisionRule {
    fn decide(&self, observed: f64, lower: f64, upper: f64) -> Decision;
}

/// Binary rule: increase spend above a fixed count threshold, otherwise
/// decrease. Ignores the confidence band.
#[derive(Debug, Clone, Copy)]
pub struct ThresholdRule {
    pub threshold: f64,
}

impl DecisionRule for ThresholdRule {
    fn decide(&self, observed: f64, _lower: f64, _upper: f64) -> Decision {
        if observed > self.threshold {
            Decision::IncreaseSpend
        } else {
            Decision::DecreaseSpend
        }
    }
}

/// Band rule: act only when the observation's confidence band clears the
/// target band entirely; maintain otherwise.
#[derive(Debug, Clone, Copy)]
pub struct BandRule {
    pub lower: f64,
    pub upper: f64,
}

impl DecisionRule for BandRule {
    fn decide(&self, _observed: f64, lower: f64, upper: f64) -> Decision {
        if lower > self.upper {
            Decision::IncreaseSpend
        } else if upper < self.lower {
            Decision::DecreaseSpend
        } else {
            Decision::MaintainSpend
        }
    }
}

/// Fraction of questions where the noised observation leads to the same
/// decision as the true count.
///
/// `noise_bound` is the half-width of the noise confidence band (typically
/// `laplace_ppf(0.975, sensitivity, epsilon)`); the true count is judged with
/// a collapsed band.
pub fn decision_agreement(
    rule: &dyn DecisionRule,
    questions: &[Question],
    noise_bound: f64,
) -> f64 {
    if questions.is_empty() {
        return 1.0;
    }
    let agreed = questions
        .iter()
        .filter(|q| {
            let truth = q.conversions as f64;
            let noised = q.noised_observation();
            rule.decide(truth, truth, truth)
                == rule.decide(noised, noised - noise_bound, noised + noise_bound)
        })
        .count();
    agreed as f64 / questions.len() as f64
}
