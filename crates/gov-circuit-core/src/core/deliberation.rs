// gov-circuit-core/src/core/deliberation.rs
// ============================================================================
// Module: Deliberation Result
// Description: Aggregated outcome of a deliberation session, with dissent.
// Purpose: Canonical, hash-bound output of the Deliberator.
// Dependencies: crate::core::{hashing, identifiers, vote}, serde
// ============================================================================

//! ## Overview
//! A [`DeliberationResult`] carries the aggregated decision, every vote cast,
//! and every dissenting minority position.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::hashing::HashError;
use crate::core::hashing::SHORT_HASH_LEN;
use crate::core::hashing::hash_prefix;
use crate::core::identifiers::SessionId;
use crate::core::identifiers::StakeholderId;
use crate::core::vote::StakeholderVote;
use crate::core::vote::VoteDecision;

// ============================================================================
// SECTION: Dissent
// ============================================================================

/// A minority vote preserved verbatim alongside the aggregated result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DissentRecord {
    /// Dissenting stakeholder.
    pub stakeholder_id: StakeholderId,
    /// The aggregated (majority) decision.
    pub majority_decision: VoteDecision,
    /// The dissenter's own preferred decision.
    pub dissenting_decision: VoteDecision,
    /// The dissenter's rationale.
    pub rationale: String,
    /// The dissenter's concerns.
    pub concerns: Vec<String>,
}

// ============================================================================
// SECTION: Deliberation Result
// ============================================================================

/// Aggregated outcome of a deliberation session.
///
/// # Invariants
/// - Every vote whose decision differs from `decision` appears exactly once
///   in `dissenting_views`.
/// - `dissenting_views` is `[]`, never absent, when there is no dissent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationResult {
    /// Unique identifier for this deliberation session.
    pub session_id: SessionId,
    /// The aggregated decision.
    pub decision: VoteDecision,
    /// Concatenation of the winning votes' rationales.
    pub rationale: String,
    /// Every vote cast in this session.
    pub votes: Vec<StakeholderVote>,
    /// Preserved minority positions.
    pub dissenting_views: Vec<DissentRecord>,
    /// Union of conditions from `Conditional`/`Proceed` votes.
    pub conditions: Vec<String>,
    /// Sixteen-hex-char SHA-256 prefix over the fields above.
    pub audit_hash: String,
}

/// Fields hashed to produce [`DeliberationResult::audit_hash`].
#[derive(Serialize)]
struct HashedFields<'a> {
    session_id: &'a SessionId,
    decision: VoteDecision,
    rationale: &'a str,
    votes: &'a [StakeholderVote],
    dissenting_views: &'a [DissentRecord],
    conditions: &'a [String],
}

impl DeliberationResult {
    /// Builds a [`DeliberationResult`], computing `audit_hash` from the
    /// other fields.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when canonicalization fails.
    #[allow(clippy::too_many_arguments, reason = "Mirrors DeliberationResult's flat field layout.")]
    pub fn with_hash(
        session_id: SessionId,
        decision: VoteDecision,
        rationale: String,
        votes: Vec<StakeholderVote>,
        dissenting_views: Vec<DissentRecord>,
        conditions: Vec<String>,
    ) -> Result<Self, HashError> {
        let hashed = HashedFields {
            session_id: &session_id,
            decision,
            rationale: &rationale,
            votes: &votes,
            dissenting_views: &dissenting_views,
            conditions: &conditions,
        };
        let audit_hash = hash_prefix(&hashed, SHORT_HASH_LEN)?;
        Ok(Self {
            session_id,
            decision,
            rationale,
            votes,
            dissenting_views,
            conditions,
            audit_hash,
        })
    }

    /// Returns true when every vote disagreeing with `decision` appears
    /// exactly once in `dissenting_views`, and no agreeing vote appears.
    #[must_use]
    pub fn dissent_is_consistent(&self) -> bool {
        let disagreeing: Vec<&StakeholderVote> =
            self.votes.iter().filter(|v| v.decision != self.decision).collect();
        if disagreeing.len() != self.dissenting_views.len() {
            return false;
        }
        disagreeing.iter().all(|vote| {
            self.dissenting_views
                .iter()
                .filter(|d| d.stakeholder_id == vote.stakeholder_id)
                .count()
                == 1
        })
    }
}
