// gov-circuit-core/src/runtime/deliberator.rs
// ============================================================================
// Module: Deliberator
// Description: Collects stakeholder votes and aggregates to a decision.
// Purpose: Implements the priority-ordered aggregation rules.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The Deliberator elicits one vote per registered [`VoteProvider`], then
//! aggregates by a fixed priority order: a `physiological` veto of `Pause`
//! overrides everything, then a confident `Reject`, then a `Pause`
//! majority, then `Conditional`, then `Proceed`, falling back to `Defer`
//!. A provider that times out or errors abstains rather than
//! failing the session; fewer than two votes cast in total is itself
//! `Defer` with a fixed rationale.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use crate::core::DeliberationResult;
use crate::core::DissentRecord;
use crate::core::GovernanceError;
use crate::core::Prediction;
use crate::core::SessionId;
use crate::core::StakeholderType;
use crate::core::StakeholderVote;
use crate::core::ThresholdEvent;
use crate::core::Timestamp;
use crate::core::VoteDecision;
use crate::interfaces::VoteProvider;
use crate::interfaces::VoteProviderError;

/// Minimum confidence for a `Reject` vote to force the aggregated result
/// to `Reject` regardless of other votes.
const REJECT_CONFIDENCE_THRESHOLD: f64 = 0.8;

/// Weight of a `human-operator` vote in the aggregation comparisons.
const HUMAN_OPERATOR_WEIGHT: u32 = 2;

/// Weight of every other stakeholder type.
const DEFAULT_WEIGHT: u32 = 1;

// ============================================================================
// SECTION: Deliberator
// ============================================================================

/// Collects votes and aggregates them into a [`DeliberationResult`].
#[derive(Debug, Default, Clone, Copy)]
pub struct Deliberator;

impl Deliberator {
    /// Builds a deliberator. Stateless.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Elicits a vote from each of `providers` and aggregates the result.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::InvalidArgument`] when a provider casts a
    /// vote that violates [`StakeholderVote::validate`], and
    /// [`GovernanceError::Hashing`] when the result cannot be hashed.
    pub fn deliberate(
        &self,
        session_id: SessionId,
        event: &ThresholdEvent,
        prediction: &Prediction,
        providers: &[&dyn VoteProvider],
        at: Timestamp,
    ) -> Result<DeliberationResult, GovernanceError> {
        let mut votes = Vec::with_capacity(providers.len());
        for provider in providers {
            match provider.cast_vote(event, prediction, at) {
                Ok(vote) => {
                    vote.validate().map_err(|err| GovernanceError::InvalidArgument(err.to_string()))?;
                    votes.push(vote);
                }
                Err(VoteProviderError::Timeout | VoteProviderError::Provider(_)) => {
                    // Abstention: neither a failure nor a counted vote. A provider
                    // error is treated the same as a timeout here even though only
                    // the timeout case is named explicitly.
                }
            }
        }

        if votes.len() < 2 {
            return DeliberationResult::with_hash(
                session_id,
                VoteDecision::Defer,
                "insufficient participation".to_string(),
                votes,
                Vec::new(),
                Vec::new(),
            )
            .map_err(GovernanceError::from);
        }

        let decision = aggregate(&votes);
        let winning: Vec<&StakeholderVote> = votes.iter().filter(|v| v.decision == decision).collect();
        let rationale = if winning.is_empty() {
            "no stakeholder vote matched the aggregated decision directly".to_string()
        } else {
            winning.iter().map(|v| v.rationale.as_str()).collect::<Vec<_>>().join("; ")
        };

        let conditions: BTreeSet<String> = votes
            .iter()
            .filter(|v| matches!(v.decision, VoteDecision::Conditional | VoteDecision::Proceed))
            .flat_map(|v| v.conditions.iter().cloned())
            .collect();

        let dissenting_views: Vec<DissentRecord> = votes
            .iter()
            .filter(|v| v.decision != decision)
            .map(|v| DissentRecord {
                stakeholder_id: v.stakeholder_id.clone(),
                majority_decision: decision,
                dissenting_decision: v.decision,
                rationale: v.rationale.clone(),
                concerns: v.concerns.clone(),
            })
            .collect();

        DeliberationResult::with_hash(
            session_id,
            decision,
            rationale,
            votes,
            dissenting_views,
            conditions.into_iter().collect(),
        )
        .map_err(GovernanceError::from)
    }
}

/// Weight of a single vote's stakeholder type in the aggregation
/// comparisons.
const fn weight(stakeholder_type: StakeholderType) -> u32 {
    match stakeholder_type {
        StakeholderType::HumanOperator => HUMAN_OPERATOR_WEIGHT,
        _ => DEFAULT_WEIGHT,
    }
}

/// Applies the priority-ordered aggregation rules to a non-empty,
/// already-validated set of votes.
fn aggregate(votes: &[StakeholderVote]) -> VoteDecision {
    let physiological_veto = votes
        .iter()
        .any(|v| v.stakeholder_type == StakeholderType::Physiological && v.decision == VoteDecision::Pause);
    if physiological_veto {
        return VoteDecision::Pause;
    }

    let confident_reject =
        votes.iter().any(|v| v.decision == VoteDecision::Reject && v.confidence >= REJECT_CONFIDENCE_THRESHOLD);
    if confident_reject {
        return VoteDecision::Reject;
    }

    let weighted = |decision: VoteDecision| -> u32 {
        votes.iter().filter(|v| v.decision == decision).map(|v| weight(v.stakeholder_type)).sum()
    };
    let pause_weight = weighted(VoteDecision::Pause);
    let proceed_weight = weighted(VoteDecision::Proceed);
    let conditional_weight = weighted(VoteDecision::Conditional);

    if pause_weight > proceed_weight + conditional_weight {
        return VoteDecision::Pause;
    }
    if votes.iter().any(|v| v.decision == VoteDecision::Conditional) {
        return VoteDecision::Conditional;
    }
    if proceed_weight > pause_weight {
        return VoteDecision::Proceed;
    }
    VoteDecision::Defer
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only panics are permitted.")]

    use time::macros::datetime;

    use super::Deliberator;
    use crate::core::MetricKind;
    use crate::core::Prediction;
    use crate::core::SessionId;
    use crate::core::Severity;
    use crate::core::StakeholderId;
    use crate::core::StakeholderType;
    use crate::core::StakeholderVote;
    use crate::core::TargetId;
    use crate::core::ThresholdEvent;
    use crate::core::Timestamp;
    use crate::core::VoteDecision;
    use crate::interfaces::VoteProvider;
    use crate::interfaces::VoteProviderError;

    fn at() -> Timestamp {
        Timestamp::new(datetime!(2026-01-01 00:00:00 UTC))
    }

    fn event() -> ThresholdEvent {
        ThresholdEvent::with_hash(
            MetricKind::FileCount,
            120.0,
            100.0,
            Severity::classify(120.0, 100.0).unwrap(),
            at(),
            TargetId::new("/repo"),
            Default::default(),
        )
        .unwrap()
    }

    fn prediction() -> Prediction {
        Prediction::with_hash("abc".to_string(), 1, 10, vec![]).unwrap()
    }

    struct FixedProvider {
        id: &'static str,
        stakeholder_type: StakeholderType,
        decision: VoteDecision,
        confidence: f64,
        conditions: Vec<String>,
    }
    impl VoteProvider for FixedProvider {
        fn stakeholder_id(&self) -> StakeholderId {
            StakeholderId::new(self.id)
        }
        fn stakeholder_type(&self) -> StakeholderType {
            self.stakeholder_type
        }
        fn cast_vote(
            &self,
            _event: &ThresholdEvent,
            _prediction: &Prediction,
            at: Timestamp,
        ) -> Result<StakeholderVote, VoteProviderError> {
            Ok(StakeholderVote {
                stakeholder_id: self.stakeholder_id(),
                stakeholder_type: self.stakeholder_type,
                decision: self.decision,
                rationale: format!("{} votes {:?}", self.id, self.decision),
                confidence: self.confidence,
                concerns: vec![],
                conditions: self.conditions.clone(),
                timestamp: at,
            })
        }
    }

    struct TimingOutProvider;
    impl VoteProvider for TimingOutProvider {
        fn stakeholder_id(&self) -> StakeholderId {
            StakeholderId::new("slow")
        }
        fn stakeholder_type(&self) -> StakeholderType {
            StakeholderType::Domain
        }
        fn cast_vote(
            &self,
            _event: &ThresholdEvent,
            _prediction: &Prediction,
            _at: Timestamp,
        ) -> Result<StakeholderVote, VoteProviderError> {
            Err(VoteProviderError::Timeout)
        }
    }

    fn proceed(id: &'static str, stakeholder_type: StakeholderType) -> FixedProvider {
        FixedProvider { id, stakeholder_type, decision: VoteDecision::Proceed, confidence: 0.9, conditions: vec![] }
    }

    fn pause(id: &'static str, stakeholder_type: StakeholderType) -> FixedProvider {
        FixedProvider { id, stakeholder_type, decision: VoteDecision::Pause, confidence: 0.7, conditions: vec![] }
    }

    #[test]
    fn fewer_than_two_votes_defers_with_fixed_rationale() {
        let solo = proceed("technical-1", StakeholderType::Technical);
        let providers: Vec<&dyn VoteProvider> = vec![&solo];
        let result =
            Deliberator::new().deliberate(SessionId::new("s1"), &event(), &prediction(), &providers, at()).unwrap();
        assert_eq!(result.decision, VoteDecision::Defer);
        assert_eq!(result.rationale, "insufficient participation");
    }

    #[test]
    fn timed_out_provider_is_an_abstention_not_a_failure() {
        let a = proceed("technical-1", StakeholderType::Technical);
        let b = proceed("domain-1", StakeholderType::Domain);
        let slow = TimingOutProvider;
        let providers: Vec<&dyn VoteProvider> = vec![&a, &b, &slow];
        let result =
            Deliberator::new().deliberate(SessionId::new("s1"), &event(), &prediction(), &providers, at()).unwrap();
        assert_eq!(result.votes.len(), 2);
        assert_eq!(result.decision, VoteDecision::Proceed);
    }

    #[test]
    fn confident_reject_wins_regardless_of_other_votes() {
        let a = proceed("technical-1", StakeholderType::Technical);
        let b = proceed("domain-1", StakeholderType::Domain);
        let reject =
            FixedProvider { id: "ethical-1", stakeholder_type: StakeholderType::Ethical, decision: VoteDecision::Reject, confidence: 0.95, conditions: vec![] };
        let providers: Vec<&dyn VoteProvider> = vec![&a, &b, &reject];
        let result =
            Deliberator::new().deliberate(SessionId::new("s1"), &event(), &prediction(), &providers, at()).unwrap();
        assert_eq!(result.decision, VoteDecision::Reject);
    }

    #[test]
    fn physiological_pause_overrides_a_confident_reject() {
        let reject =
            FixedProvider { id: "ethical-1", stakeholder_type: StakeholderType::Ethical, decision: VoteDecision::Reject, confidence: 0.95, conditions: vec![] };
        let veto = pause("physio-1", StakeholderType::Physiological);
        let providers: Vec<&dyn VoteProvider> = vec![&reject, &veto];
        let result =
            Deliberator::new().deliberate(SessionId::new("s1"), &event(), &prediction(), &providers, at()).unwrap();
        assert_eq!(result.decision, VoteDecision::Pause);
    }

    #[test]
    fn human_operator_votes_count_double_in_the_pause_comparison() {
        let operator = pause("operator-1", StakeholderType::HumanOperator);
        let a = proceed("technical-1", StakeholderType::Technical);
        let b = proceed("domain-1", StakeholderType::Domain);
        let providers: Vec<&dyn VoteProvider> = vec![&operator, &a, &b];
        let result =
            Deliberator::new().deliberate(SessionId::new("s1"), &event(), &prediction(), &providers, at()).unwrap();
        // operator weight 2 vs. two weight-1 proceeds: 2 is not > 2, so Defer.
        assert_eq!(result.decision, VoteDecision::Defer);
    }

    #[test]
    fn conditional_votes_union_their_conditions() {
        let conditional = FixedProvider {
            id: "technical-1",
            stakeholder_type: StakeholderType::Technical,
            decision: VoteDecision::Conditional,
            confidence: 0.6,
            conditions: vec!["add tests".to_string()],
        };
        let proceed_with_condition = FixedProvider {
            id: "domain-1",
            stakeholder_type: StakeholderType::Domain,
            decision: VoteDecision::Proceed,
            confidence: 0.8,
            conditions: vec!["notify on-call".to_string()],
        };
        let providers: Vec<&dyn VoteProvider> = vec![&conditional, &proceed_with_condition];
        let result =
            Deliberator::new().deliberate(SessionId::new("s1"), &event(), &prediction(), &providers, at()).unwrap();
        assert_eq!(result.decision, VoteDecision::Conditional);
        assert!(result.conditions.contains(&"add tests".to_string()));
        assert!(result.conditions.contains(&"notify on-call".to_string()));
    }

    #[test]
    fn dissent_is_recorded_for_every_vote_disagreeing_with_the_outcome() {
        let a = proceed("technical-1", StakeholderType::Technical);
        let b = proceed("domain-1", StakeholderType::Domain);
        let dissenter = pause("ethical-1", StakeholderType::Ethical);
        let providers: Vec<&dyn VoteProvider> = vec![&a, &b, &dissenter];
        let result =
            Deliberator::new().deliberate(SessionId::new("s1"), &event(), &prediction(), &providers, at()).unwrap();
        assert_eq!(result.decision, VoteDecision::Proceed);
        assert!(result.dissent_is_consistent());
        assert_eq!(result.dissenting_views.len(), 1);
    }
}
