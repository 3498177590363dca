// gov-circuit-core/src/runtime/simulator.rs
// ============================================================================
// Module: Simulator
// Description: Monte-Carlo scenario prediction for one ThresholdEvent.
// Purpose: Deterministic, reproducible prediction given (event, seed, runs).
// Dependencies: crate::core, rand
// ============================================================================

//! ## Overview
//! The Simulator draws `N` randomized variants of the triggering event from
//! a single seeded generator, scores every candidate [`Scenario`] against
//! each variant, and aggregates across runs into a [`Prediction`]
//!. Given identical `(event, seed, runs, model)` the output
//! is byte-identical; sub-generators for parallel evaluation are derived
//! from `(seed, run index)` through a fixed mixing function, never by
//! cloning or advancing a shared generator, so results stay
//! order-independent.

// ============================================================================
// SECTION: Imports
// ============================================================================

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::core::ConfidenceInterval;
use crate::core::GovernanceError;
use crate::core::Outcome;
use crate::core::Prediction;
use crate::core::Scenario;
use crate::core::Severity;
use crate::core::ThresholdEvent;
use crate::core::hashing::SHORT_HASH_LEN;
use crate::core::hashing::hash_prefix;

// ============================================================================
// SECTION: Scenario Profile
// ============================================================================

/// Fixed, per-scenario heuristic weights. Values are hand-tuned constants,
/// not learned.
struct ScenarioProfile {
    scenario: Scenario,
    base_reversibility: f64,
    score_bias: f64,
    side_effects: &'static [&'static str],
}

/// The five candidate scenarios' fixed heuristic profiles, in [`Scenario::ALL`] order.
const PROFILES: [ScenarioProfile; 5] = [
    ScenarioProfile {
        scenario: Scenario::Reorganize,
        base_reversibility: 0.30,
        score_bias: 0.55,
        side_effects: &["full-rewrite", "history-disruption"],
    },
    ScenarioProfile {
        scenario: Scenario::PartialReorganize,
        base_reversibility: 0.55,
        score_bias: 0.45,
        side_effects: &["partial-rewrite"],
    },
    ScenarioProfile {
        scenario: Scenario::Defer,
        base_reversibility: 0.95,
        score_bias: 0.10,
        side_effects: &["unresolved-condition"],
    },
    ScenarioProfile {
        scenario: Scenario::Rollback,
        base_reversibility: 0.85,
        score_bias: 0.35,
        side_effects: &["data-loss-since-checkpoint"],
    },
    ScenarioProfile {
        scenario: Scenario::Incremental,
        base_reversibility: 0.75,
        score_bias: 0.50,
        side_effects: &[],
    },
];

/// `score_bias` weight applied per step of [`Severity`] above `Info`; more
/// severe events favor decisive scenarios (`Reorganize`, `Incremental`) over
/// `Defer`.
const fn severity_weight(severity: Severity) -> f64 {
    match severity {
        Severity::Info => 0.0,
        Severity::Warning => 0.15,
        Severity::Critical => 0.35,
        Severity::Emergency => 0.60,
    }
}

/// `Defer` loses its bias advantage as severity increases; every other
/// scenario gains proportionally instead.
const fn severity_adjusted_bias(profile: &ScenarioProfile, severity: Severity) -> f64 {
    let weight = severity_weight(severity);
    if matches!(profile.scenario, Scenario::Defer) {
        profile.score_bias - weight
    } else {
        profile.score_bias + weight * 0.4
    }
}

// ============================================================================
// SECTION: Seed Derivation
// ============================================================================

/// Derives an order-independent sub-seed for run `index` from `seed`, using
/// a splitmix64-style mixing step.
fn derive_seed(seed: u64, index: u64) -> u64 {
    let mut z = seed.wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Derives a deterministic seed from an event hash when the caller does not
/// supply one.
#[must_use]
pub fn derive_seed_from_event_hash(event_hash: &str) -> u64 {
    let mut seed: u64 = 0xCBF2_9CE4_8422_2325;
    for byte in event_hash.as_bytes() {
        seed ^= u64::from(*byte);
        seed = seed.wrapping_mul(0x0000_0100_0000_01B3);
    }
    seed
}

// ============================================================================
// SECTION: Simulator
// ============================================================================

/// Monte-Carlo simulator over the five candidate [`Scenario`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct Simulator;

impl Simulator {
    /// Builds a simulator. Stateless; a unit struct to match the other
    /// stages' `new()` convention.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Runs `monte_carlo_runs` Monte-Carlo evaluations of `event` and
    /// aggregates the result into a [`Prediction`]. `seed` defaults to
    /// [`derive_seed_from_event_hash`] when `None`.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::InvalidArgument`] when `monte_carlo_runs`
    /// is zero, [`GovernanceError::SimulationInstability`] when more than
    /// half of the runs fail to score any scenario, and
    /// [`GovernanceError::Hashing`] when the prediction cannot be hashed.
    pub fn simulate(
        &self,
        event: &ThresholdEvent,
        seed: Option<u64>,
        monte_carlo_runs: u32,
    ) -> Result<Prediction, GovernanceError> {
        if monte_carlo_runs == 0 {
            return Err(GovernanceError::InvalidArgument("monte_carlo_runs must be positive".to_string()));
        }
        let seed = seed.unwrap_or_else(|| derive_seed_from_event_hash(&event.event_hash));
        let runs = u64::from(monte_carlo_runs);

        let mut counts = [0u32; PROFILES.len()];
        let mut samples: [Vec<f64>; PROFILES.len()] = Default::default();
        let mut failed_runs = 0u64;

        for index in 0..runs {
            let mut rng = StdRng::seed_from_u64(derive_seed(seed, index));
            match score_run(event, &mut rng) {
                Some((winner, reversibility_by_scenario)) => {
                    counts[winner] += 1;
                    for (slot, value) in samples.iter_mut().zip(reversibility_by_scenario) {
                        slot.push(value);
                    }
                }
                None => failed_runs += 1,
            }
        }

        if failed_runs * 2 > runs {
            return Err(GovernanceError::SimulationInstability(format!(
                "{failed_runs} of {runs} runs failed to score a scenario"
            )));
        }

        let successful_runs = runs - failed_runs;
        let mut outcomes: Vec<Outcome> = Vec::with_capacity(PROFILES.len());
        for (profile_index, profile) in PROFILES.iter().enumerate() {
            #[allow(clippy::cast_precision_loss, reason = "run counts fit comfortably in f64")]
            let probability = f64::from(counts[profile_index]) / successful_runs.max(1) as f64;
            let state_hash = hash_prefix(
                &(&event.event_hash, profile.scenario.name(), seed, monte_carlo_runs),
                SHORT_HASH_LEN,
            )?;
            let (reversibility, variance, confidence_interval) = summarize(&samples[profile_index], profile.base_reversibility);
            outcomes.push(Outcome {
                scenario: profile.scenario,
                probability,
                reversibility,
                side_effects: profile.side_effects.iter().map(|tag| (*tag).to_string()).collect(),
                state_hash,
                confidence_interval,
                variance,
            });
        }

        normalize_probabilities(&mut outcomes);
        outcomes.sort_by(crate::core::prediction::outcome_order);

        Prediction::with_hash(event.event_hash.clone(), seed, monte_carlo_runs, outcomes)
            .map_err(GovernanceError::from)
    }
}

/// Scores every scenario for one perturbed run, returning the winning
/// scenario's index and the per-scenario reversibility sample, or `None` if
/// scoring could not be completed for this run.
fn score_run(event: &ThresholdEvent, rng: &mut StdRng) -> Option<(usize, [f64; PROFILES.len()])> {
    let mut scores = [0.0_f64; PROFILES.len()];
    let mut reversibility = [0.0_f64; PROFILES.len()];

    for (index, profile) in PROFILES.iter().enumerate() {
        let jitter: f64 = rng.gen_range(-0.05..0.05);
        let noise: f64 = rng.gen_range(-0.08..0.08);
        let sampled_reversibility = (profile.base_reversibility + noise).clamp(0.0, 1.0);
        reversibility[index] = sampled_reversibility;
        #[allow(clippy::cast_precision_loss, reason = "side_effects tag counts never exceed a handful")]
        let side_effect_penalty = profile.side_effects.len() as f64 * 0.05;
        scores[index] = severity_adjusted_bias(profile, event.severity) + sampled_reversibility * 0.3 + jitter
            - side_effect_penalty;
    }

    // NaN can only reach a score through a corrupt event value; a run that
    // produces one contributes no scenario and counts toward instability.
    if scores.iter().any(|s| s.is_nan()) {
        return None;
    }

    let winner = scores
        .iter()
        .enumerate()
        .max_by(|(a_idx, a), (b_idx, b)| {
            a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal).then_with(|| b_idx.cmp(a_idx).reverse())
        })
        .map(|(index, _)| index)?;
    Some((winner, reversibility))
}

/// Computes mean, sample variance, and 5th/95th percentile bounds of
/// `samples`, falling back to `base` with zero spread when no runs
/// contributed a sample for this scenario.
fn summarize(samples: &[f64], base: f64) -> (f64, f64, ConfidenceInterval) {
    if samples.is_empty() {
        return (base, 0.0, ConfidenceInterval { p05: base, p95: base });
    }
    #[allow(clippy::cast_precision_loss, reason = "Monte-Carlo run counts fit comfortably in f64")]
    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let variance = if samples.len() > 1 {
        samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0)
    } else {
        0.0
    };
    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let p05 = percentile(&sorted, 0.05);
    let p95 = percentile(&sorted, 0.95);
    (mean, variance, ConfidenceInterval { p05, p95 })
}

/// Nearest-rank percentile of a pre-sorted slice.
fn percentile(sorted: &[f64], fraction: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss, reason = "sample counts fit comfortably in f64")]
    let rank_f64 = (sorted.len() - 1) as f64 * fraction;
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "rank_f64 is a non-negative round()ed index bounded by sorted.len()"
    )]
    let rank = rank_f64.round() as usize;
    sorted[rank.min(sorted.len() - 1)]
}

/// Normalizes `outcomes` so probabilities sum exactly to `1.0`, crediting
/// any rounding residual to the highest-probability outcome.
fn normalize_probabilities(outcomes: &mut [Outcome]) {
    let total: f64 = outcomes.iter().map(|o| o.probability).sum();
    if total <= 0.0 {
        #[allow(clippy::cast_precision_loss, reason = "scenario counts fit comfortably in f64")]
        let share = 1.0 / outcomes.len() as f64;
        for outcome in outcomes.iter_mut() {
            outcome.probability = share;
        }
        return;
    }
    for outcome in outcomes.iter_mut() {
        outcome.probability /= total;
    }
    let residual = 1.0 - outcomes.iter().map(|o| o.probability).sum::<f64>();
    if let Some(highest) =
        outcomes.iter_mut().max_by(|a, b| a.probability.partial_cmp(&b.probability).unwrap_or(std::cmp::Ordering::Equal))
    {
        highest.probability += residual;
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only panics are permitted.")]

    use std::collections::BTreeMap;

    use time::macros::datetime;

    use super::Simulator;
    use crate::core::MetricKind;
    use crate::core::Severity;
    use crate::core::TargetId;
    use crate::core::ThresholdEvent;
    use crate::core::Timestamp;

    fn event(severity_value: f64) -> ThresholdEvent {
        ThresholdEvent::with_hash(
            MetricKind::FileCount,
            severity_value,
            100.0,
            Severity::classify(severity_value, 100.0).unwrap(),
            Timestamp::new(datetime!(2026-01-01 00:00:00 UTC)),
            TargetId::new("/repo"),
            BTreeMap::new(),
        )
        .unwrap()
    }

    #[test]
    fn same_seed_and_event_produce_byte_identical_predictions() {
        let simulator = Simulator::new();
        let event = event(160.0);
        let a = simulator.simulate(&event, Some(42), 100).unwrap();
        let b = simulator.simulate(&event, Some(42), 100).unwrap();
        assert_eq!(a.prediction_hash, b.prediction_hash);
    }

    #[test]
    fn probabilities_sum_to_one_within_tolerance() {
        let simulator = Simulator::new();
        let prediction = simulator.simulate(&event(160.0), Some(7), 200).unwrap();
        assert!(prediction.probabilities_sum_to_one());
    }

    #[test]
    fn outcomes_are_sorted_per_invariant() {
        let simulator = Simulator::new();
        let prediction = simulator.simulate(&event(160.0), Some(7), 200).unwrap();
        assert!(prediction.outcomes_are_sorted());
    }

    #[test]
    fn zero_runs_is_an_invalid_argument() {
        let simulator = Simulator::new();
        assert!(simulator.simulate(&event(160.0), Some(1), 0).is_err());
    }

    #[test]
    fn omitted_seed_is_derived_from_event_hash_deterministically() {
        let simulator = Simulator::new();
        let event = event(160.0);
        let a = simulator.simulate(&event, None, 50).unwrap();
        let b = simulator.simulate(&event, None, 50).unwrap();
        assert_eq!(a.seed, b.seed);
        assert_eq!(a.prediction_hash, b.prediction_hash);
    }

    #[test]
    fn higher_severity_favors_decisive_scenarios_over_defer() {
        let simulator = Simulator::new();
        let emergency = simulator.simulate(&event(200.0), Some(3), 300).unwrap();
        let defer_probability = emergency
            .outcomes
            .iter()
            .find(|o| o.scenario == crate::core::Scenario::Defer)
            .map(|o| o.probability)
            .unwrap_or(0.0);
        assert!(defer_probability < 0.3);
    }
}
