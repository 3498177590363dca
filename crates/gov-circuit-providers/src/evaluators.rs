// gov-circuit-providers/src/evaluators.rs
// ============================================================================
// Module: Automated Evaluators
// Description: Built-in VoteProvider implementations for the four automated
//              stakeholder roles.
// Purpose: Derive a vote from event severity and prediction shape without
//          requiring the host to implement its own evaluator first.
// Dependencies: gov-circuit-core
// ============================================================================

//! ## Overview
//! Every evaluator reads the same three inputs — severity, best-outcome
//! reversibility, and side-effect tags — and weighs them differently for
//! its role. None of them read wall-clock time or external state; given
//! the same event and prediction, a vote is always the same vote.

// ============================================================================
// SECTION: Imports
// ============================================================================

use gov_circuit_core::Prediction;
use gov_circuit_core::Severity;
use gov_circuit_core::StakeholderId;
use gov_circuit_core::StakeholderType;
use gov_circuit_core::StakeholderVote;
use gov_circuit_core::ThresholdEvent;
use gov_circuit_core::Timestamp;
use gov_circuit_core::VoteDecision;
use gov_circuit_core::VoteProvider;
use gov_circuit_core::VoteProviderError;

// ============================================================================
// SECTION: Shared Heuristics
// ============================================================================

/// Maps a severity classification onto `[0, 1]`, low to high.
const fn severity_weight(severity: Severity) -> f64 {
    match severity {
        Severity::Info => 0.25,
        Severity::Warning => 0.5,
        Severity::Critical => 0.75,
        Severity::Emergency => 1.0,
    }
}

/// Reversibility and side-effect tags of the prediction's most likely
/// outcome, or maximally cautious defaults when the prediction has no
/// outcomes at all.
fn best_outcome_shape(prediction: &Prediction) -> (f64, usize) {
    prediction
        .best_outcome()
        .map_or((0.0, 0), |outcome| (outcome.reversibility, outcome.side_effects.len()))
}

// ============================================================================
// SECTION: Technical Evaluator
// ============================================================================

/// Evaluates technical feasibility: weighs the best outcome's reversibility
/// most heavily, since an irreversible action is a technical risk
/// regardless of its ethical standing.
#[derive(Debug, Clone)]
pub struct TechnicalEvaluator {
    stakeholder_id: StakeholderId,
}

impl TechnicalEvaluator {
    /// Builds a technical evaluator casting votes under `stakeholder_id`.
    #[must_use]
    pub fn new(stakeholder_id: impl Into<String>) -> Self {
        Self { stakeholder_id: StakeholderId::new(stakeholder_id.into()) }
    }
}

impl Default for TechnicalEvaluator {
    fn default() -> Self {
        Self::new("technical-evaluator")
    }
}

impl VoteProvider for TechnicalEvaluator {
    fn stakeholder_id(&self) -> StakeholderId {
        self.stakeholder_id.clone()
    }

    fn stakeholder_type(&self) -> StakeholderType {
        StakeholderType::Technical
    }

    fn cast_vote(
        &self,
        event: &ThresholdEvent,
        prediction: &Prediction,
        at: Timestamp,
    ) -> Result<StakeholderVote, VoteProviderError> {
        let (reversibility, side_effect_count) = best_outcome_shape(prediction);
        let (decision, rationale, conditions) = if reversibility >= 0.7 {
            (VoteDecision::Proceed, "best-outcome reversibility is high enough to proceed directly".to_string(), vec![])
        } else if reversibility >= 0.4 {
            (
                VoteDecision::Conditional,
                format!(
                    "best-outcome reversibility {reversibility:.2} warrants incremental application with {side_effect_count} side-effect tag(s) observed"
                ),
                vec!["apply-in-reversible-increments".to_string()],
            )
        } else {
            (
                VoteDecision::Pause,
                format!("best-outcome reversibility {reversibility:.2} is too low to proceed without further review"),
                vec![],
            )
        };
        Ok(StakeholderVote {
            stakeholder_id: self.stakeholder_id(),
            stakeholder_type: StakeholderType::Technical,
            decision,
            rationale,
            confidence: severity_weight(event.severity),
            concerns: vec![],
            conditions,
            timestamp: at,
        })
    }
}

// ============================================================================
// SECTION: Ethical Evaluator
// ============================================================================

/// Evaluates ethical implications: weighs severity and the presence of any
/// side-effect tags most heavily.
#[derive(Debug, Clone)]
pub struct EthicalEvaluator {
    stakeholder_id: StakeholderId,
}

impl EthicalEvaluator {
    /// Builds an ethical evaluator casting votes under `stakeholder_id`.
    #[must_use]
    pub fn new(stakeholder_id: impl Into<String>) -> Self {
        Self { stakeholder_id: StakeholderId::new(stakeholder_id.into()) }
    }
}

impl Default for EthicalEvaluator {
    fn default() -> Self {
        Self::new("ethical-evaluator")
    }
}

impl VoteProvider for EthicalEvaluator {
    fn stakeholder_id(&self) -> StakeholderId {
        self.stakeholder_id.clone()
    }

    fn stakeholder_type(&self) -> StakeholderType {
        StakeholderType::Ethical
    }

    fn cast_vote(
        &self,
        event: &ThresholdEvent,
        prediction: &Prediction,
        at: Timestamp,
    ) -> Result<StakeholderVote, VoteProviderError> {
        let (_, side_effect_count) = best_outcome_shape(prediction);
        let has_side_effects = side_effect_count > 0;
        let (decision, rationale, confidence, conditions) = if event.severity == Severity::Emergency && has_side_effects {
            (
                VoteDecision::Reject,
                format!("emergency-severity crossing with {side_effect_count} side-effect tag(s) on the best outcome"),
                0.9,
                vec![],
            )
        } else if event.severity == Severity::Critical || has_side_effects {
            (
                VoteDecision::Conditional,
                "the crossing's severity or side effects warrant an explicit condition before proceeding".to_string(),
                severity_weight(event.severity),
                vec!["document-side-effects-before-applying".to_string()],
            )
        } else {
            (
                VoteDecision::Proceed,
                "no side effects observed and severity does not warrant a condition".to_string(),
                severity_weight(event.severity),
                vec![],
            )
        };
        Ok(StakeholderVote {
            stakeholder_id: self.stakeholder_id(),
            stakeholder_type: StakeholderType::Ethical,
            decision,
            rationale,
            confidence,
            concerns: vec![],
            conditions,
            timestamp: at,
        })
    }
}

// ============================================================================
// SECTION: Domain Evaluator
// ============================================================================

/// Evaluates domain-specific correctness: defers when the prediction's best
/// outcome carries high variance (the simulator itself is unsure), and
/// otherwise follows severity.
#[derive(Debug, Clone)]
pub struct DomainEvaluator {
    stakeholder_id: StakeholderId,
    /// Variance above which the best outcome is treated as too uncertain to
    /// judge.
    variance_defer_threshold: f64,
}

impl DomainEvaluator {
    /// Builds a domain evaluator casting votes under `stakeholder_id`, with
    /// the default variance-defer threshold of `0.1`.
    #[must_use]
    pub fn new(stakeholder_id: impl Into<String>) -> Self {
        Self { stakeholder_id: StakeholderId::new(stakeholder_id.into()), variance_defer_threshold: 0.1 }
    }

    /// Overrides the variance-defer threshold.
    #[must_use]
    pub const fn with_variance_defer_threshold(mut self, threshold: f64) -> Self {
        self.variance_defer_threshold = threshold;
        self
    }
}

impl Default for DomainEvaluator {
    fn default() -> Self {
        Self::new("domain-evaluator")
    }
}

impl VoteProvider for DomainEvaluator {
    fn stakeholder_id(&self) -> StakeholderId {
        self.stakeholder_id.clone()
    }

    fn stakeholder_type(&self) -> StakeholderType {
        StakeholderType::Domain
    }

    fn cast_vote(
        &self,
        event: &ThresholdEvent,
        prediction: &Prediction,
        at: Timestamp,
    ) -> Result<StakeholderVote, VoteProviderError> {
        let variance = prediction.best_outcome().map_or(1.0, |outcome| outcome.variance);
        let (decision, rationale, conditions) = if variance > self.variance_defer_threshold {
            (
                VoteDecision::Defer,
                format!("best-outcome variance {variance:.3} exceeds the defer threshold {:.3}", self.variance_defer_threshold),
                vec![],
            )
        } else if event.severity == Severity::Critical || event.severity == Severity::Emergency {
            (
                VoteDecision::Conditional,
                "severity is high enough to require a domain-specific condition".to_string(),
                vec!["confirm-domain-invariants-hold".to_string()],
            )
        } else {
            (VoteDecision::Proceed, "domain invariants are not threatened at this severity".to_string(), vec![])
        };
        Ok(StakeholderVote {
            stakeholder_id: self.stakeholder_id(),
            stakeholder_type: StakeholderType::Domain,
            decision,
            rationale,
            confidence: severity_weight(event.severity),
            concerns: vec![],
            conditions,
            timestamp: at,
        })
    }
}

// ============================================================================
// SECTION: Physiological Evaluator
// ============================================================================

/// Holds the universal `Pause` veto; votes `Pause` on an emergency-severity
/// crossing and `Proceed` otherwise. Registering this evaluator is what
/// activates the veto, per the host's opt-in stakeholder set.
#[derive(Debug, Clone)]
pub struct PhysiologicalEvaluator {
    stakeholder_id: StakeholderId,
}

impl PhysiologicalEvaluator {
    /// Builds a physiological evaluator casting votes under `stakeholder_id`.
    #[must_use]
    pub fn new(stakeholder_id: impl Into<String>) -> Self {
        Self { stakeholder_id: StakeholderId::new(stakeholder_id.into()) }
    }
}

impl Default for PhysiologicalEvaluator {
    fn default() -> Self {
        Self::new("physiological-evaluator")
    }
}

impl VoteProvider for PhysiologicalEvaluator {
    fn stakeholder_id(&self) -> StakeholderId {
        self.stakeholder_id.clone()
    }

    fn stakeholder_type(&self) -> StakeholderType {
        StakeholderType::Physiological
    }

    fn cast_vote(
        &self,
        event: &ThresholdEvent,
        _prediction: &Prediction,
        at: Timestamp,
    ) -> Result<StakeholderVote, VoteProviderError> {
        let (decision, rationale) = if event.severity == Severity::Emergency {
            (VoteDecision::Pause, "emergency-severity crossing triggers the physiological pause veto".to_string())
        } else {
            (VoteDecision::Proceed, "severity has not reached the emergency tier".to_string())
        };
        Ok(StakeholderVote {
            stakeholder_id: self.stakeholder_id(),
            stakeholder_type: StakeholderType::Physiological,
            decision,
            rationale,
            confidence: severity_weight(event.severity),
            concerns: vec![],
            conditions: vec![],
            timestamp: at,
        })
    }
}
