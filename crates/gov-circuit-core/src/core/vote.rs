// gov-circuit-core/src/core/vote.rs
// ============================================================================
// Module: Stakeholder Votes
// Description: One participant's position in a deliberation session.
// Purpose: Canonical representation of cast votes, consumed by aggregation.
// Dependencies: crate::core::{identifiers, time}, serde
// ============================================================================

//! ## Overview
//! A [`StakeholderVote`] records one stakeholder's decision, rationale, and
//! any conditions attached to a `Conditional` decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::StakeholderId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Stakeholder Type
// ============================================================================

/// Category of stakeholder casting a vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StakeholderType {
    /// Evaluates technical feasibility and reversibility.
    Technical,
    /// Evaluates ethical implications of the proposed action.
    Ethical,
    /// Evaluates domain-specific correctness.
    Domain,
    /// Holds a universal veto on `Pause`.
    Physiological,
    /// A human operator; counted with double weight in aggregation.
    HumanOperator,
}

// ============================================================================
// SECTION: Vote Decision
// ============================================================================

/// A stakeholder's position on the proposed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteDecision {
    /// Proceed with the action.
    Proceed,
    /// Pause pending further information or resolution.
    Pause,
    /// Reject the action outright.
    Reject,
    /// Defer the decision to a later deliberation.
    Defer,
    /// Proceed only if the attached conditions are satisfied.
    Conditional,
}

// ============================================================================
// SECTION: Stakeholder Vote
// ============================================================================

/// One stakeholder's cast vote.
///
/// # Invariants
/// - `rationale` is non-empty.
/// - `conditions` is non-empty whenever `decision == Conditional`; a
///   `Proceed` vote may optionally attach conditions of its own (both are
///   merged into the aggregated `DeliberationResult.conditions`); every
///   other decision carries no conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakeholderVote {
    /// Identifier of the casting stakeholder.
    pub stakeholder_id: StakeholderId,
    /// Category of the casting stakeholder.
    pub stakeholder_type: StakeholderType,
    /// The stakeholder's decision.
    pub decision: VoteDecision,
    /// Non-empty rationale for the decision.
    pub rationale: String,
    /// Confidence in the decision, in `[0, 1]`.
    pub confidence: f64,
    /// Concerns raised alongside the decision.
    #[serde(default)]
    pub concerns: Vec<String>,
    /// Conditions attached to a `Conditional` decision.
    #[serde(default)]
    pub conditions: Vec<String>,
    /// UTC timestamp the vote was cast at.
    pub timestamp: Timestamp,
}

/// Errors describing why a constructed [`StakeholderVote`] violates an
/// invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VoteValidationError {
    /// `rationale` was empty.
    #[error("vote rationale must not be empty")]
    EmptyRationale,
    /// `conditions` was empty on a `Conditional` vote, or non-empty on a
    /// vote that is neither `Conditional` nor `Proceed`.
    #[error("conditions must be non-empty for Conditional, empty outside Conditional/Proceed")]
    ConditionsMismatch,
}

impl StakeholderVote {
    /// Validates the non-empty-rationale and conditions-placement
    /// invariants.
    ///
    /// # Errors
    ///
    /// Returns [`VoteValidationError`] when an invariant is violated.
    pub fn validate(&self) -> Result<(), VoteValidationError> {
        if self.rationale.trim().is_empty() {
            return Err(VoteValidationError::EmptyRationale);
        }
        let has_conditions = !self.conditions.is_empty();
        match self.decision {
            VoteDecision::Conditional if !has_conditions => Err(VoteValidationError::ConditionsMismatch),
            VoteDecision::Conditional | VoteDecision::Proceed => Ok(()),
            _ if has_conditions => Err(VoteValidationError::ConditionsMismatch),
            _ => Ok(()),
        }
    }
}
