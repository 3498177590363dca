// gov-circuit-core/src/core/prediction.rs
// ============================================================================
// Module: Prediction
// Description: Monte-Carlo simulation output for a single threshold event.
// Purpose: Canonical, hash-bound representation of simulated outcomes.
// Dependencies: crate::core::hashing, serde
// ============================================================================

//! ## Overview
//! A [`Prediction`] binds to the [`crate::core::threshold::ThresholdEvent`]
//! that triggered it via `event_hash` and carries one [`Outcome`] per
//! candidate scenario. Outcome probabilities sum to 1.0 within 1e-6 and are
//! sorted descending by probability.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Deserialize;
use serde::Serialize;

use crate::core::hashing::HashError;
use crate::core::hashing::SHORT_HASH_LEN;
use crate::core::hashing::hash_prefix;

// ============================================================================
// SECTION: Scenario
// ============================================================================

/// Candidate action the simulator evaluates for a threshold event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scenario {
    /// Fully reorganize the subject.
    Reorganize,
    /// Reorganize only the affected portion of the subject.
    PartialReorganize,
    /// Take no action now; re-evaluate later.
    Defer,
    /// Undo a previously applied mutation.
    Rollback,
    /// Apply the mutation in small, independently reversible steps.
    Incremental,
}

impl Scenario {
    /// Every candidate scenario the simulator evaluates.
    pub const ALL: [Self; 5] =
        [Self::Reorganize, Self::PartialReorganize, Self::Defer, Self::Rollback, Self::Incremental];

    /// Stable lexicographic name, used as the final outcome sort tie-break.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Reorganize => "reorganize",
            Self::PartialReorganize => "partial-reorganize",
            Self::Defer => "defer",
            Self::Rollback => "rollback",
            Self::Incremental => "incremental",
        }
    }
}

// ============================================================================
// SECTION: Confidence Interval
// ============================================================================

/// 5th/95th percentile bounds of a sampled reversibility distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    /// 5th percentile reversibility.
    pub p05: f64,
    /// 95th percentile reversibility.
    pub p95: f64,
}

// ============================================================================
// SECTION: Outcome
// ============================================================================

/// One simulated outcome for a candidate scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// Candidate scenario this outcome describes.
    pub scenario: Scenario,
    /// Fraction of Monte-Carlo runs that selected this scenario as best.
    pub probability: f64,
    /// Mean reversibility of this scenario across runs, in `[0, 1]`.
    pub reversibility: f64,
    /// Tags describing side effects observed for this scenario.
    pub side_effects: BTreeSet<String>,
    /// Hash of the structural state this outcome was evaluated against.
    pub state_hash: String,
    /// 5th/95th percentile reversibility bounds.
    pub confidence_interval: ConfidenceInterval,
    /// Sample variance of reversibility across runs.
    pub variance: f64,
}

// ============================================================================
// SECTION: Prediction
// ============================================================================

/// Output of simulation for one [`crate::core::threshold::ThresholdEvent`].
///
/// # Invariants
/// - `outcomes` is sorted descending by probability, ties broken by
///   descending reversibility then ascending scenario name.
/// - `sum(outcomes[i].probability)` is within `1e-6` of `1.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// Hash of the triggering threshold event.
    pub event_hash: String,
    /// Seed consumed by the Monte-Carlo generator.
    pub seed: u64,
    /// Number of Monte-Carlo runs performed.
    pub monte_carlo_runs: u32,
    /// Outcomes, one per evaluated scenario, sorted per invariant above.
    pub outcomes: Vec<Outcome>,
    /// Sixteen-hex-char SHA-256 prefix over the fields above.
    pub prediction_hash: String,
}

/// Fields hashed to produce [`Prediction::prediction_hash`].
#[derive(Serialize)]
struct HashedFields<'a> {
    event_hash: &'a str,
    seed: u64,
    monte_carlo_runs: u32,
    outcomes: &'a [Outcome],
}

impl Prediction {
    /// Builds a [`Prediction`], computing `prediction_hash` from the other
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when canonicalization fails.
    pub fn with_hash(
        event_hash: String,
        seed: u64,
        monte_carlo_runs: u32,
        outcomes: Vec<Outcome>,
    ) -> Result<Self, HashError> {
        let hashed = HashedFields {
            event_hash: &event_hash,
            seed,
            monte_carlo_runs,
            outcomes: &outcomes,
        };
        let prediction_hash = hash_prefix(&hashed, SHORT_HASH_LEN)?;
        Ok(Self {
            event_hash,
            seed,
            monte_carlo_runs,
            outcomes,
            prediction_hash,
        })
    }

    /// Returns the outcome with the highest probability, if any were
    /// produced.
    #[must_use]
    pub fn best_outcome(&self) -> Option<&Outcome> {
        self.outcomes.first()
    }

    /// Returns true when outcome probabilities sum to `1.0` within `1e-6`.
    #[must_use]
    pub fn probabilities_sum_to_one(&self) -> bool {
        let total: f64 = self.outcomes.iter().map(|o| o.probability).sum();
        (total - 1.0).abs() <= 1e-6
    }

    /// Returns true when `outcomes` is sorted descending by probability,
    /// then descending by reversibility, then ascending by scenario name.
    #[must_use]
    pub fn outcomes_are_sorted(&self) -> bool {
        self.outcomes.windows(2).all(|pair| {
            let [a, b] = pair else { return true };
            outcome_order(a, b).is_le()
        })
    }
}

/// Compares two outcomes using the canonical prediction sort order.
pub(crate) fn outcome_order(a: &Outcome, b: &Outcome) -> std::cmp::Ordering {
    b.probability
        .partial_cmp(&a.probability)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then_with(|| b.reversibility.partial_cmp(&a.reversibility).unwrap_or(std::cmp::Ordering::Equal))
        .then_with(|| a.scenario.name().cmp(b.scenario.name()))
}
