// gov-circuit-core/src/core/enforcement.rs
// ============================================================================
// Module: Enforcement Result
// Description: Gate outcomes and the audit-chained result of intervention.
// Purpose: Canonical, hash-bound output of the Intervenor.
// Dependencies: crate::core::{audit, hashing}, serde
// ============================================================================

//! ## Overview
//! An [`EnforcementResult`] records every gate the Intervenor walked and the
//! hash-chained audit trail produced along the way.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::audit::AuditEntry;
use crate::core::hashing::HashError;
use crate::core::hashing::SHORT_HASH_LEN;
use crate::core::hashing::hash_prefix;

// ============================================================================
// SECTION: Gate Status
// ============================================================================

/// Outcome of processing a single gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateStatus {
    /// The gate was satisfied.
    Approved,
    /// The gate was explicitly refused.
    Rejected,
    /// The gate's deadline elapsed before it resolved.
    Timeout,
    /// The gate is still awaiting an external signal (`Pause`).
    Pending,
}

impl GateStatus {
    /// Returns true for [`GateStatus::Approved`].
    #[must_use]
    pub const fn is_approved(self) -> bool {
        matches!(self, Self::Approved)
    }
}

// ============================================================================
// SECTION: Gate Result
// ============================================================================

/// Result of processing one gate in the ordered gate sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateResult {
    /// Stable label for the gate (matches the `Gate` variant processed).
    pub gate_label: String,
    /// Outcome of processing the gate.
    pub status: GateStatus,
    /// Approver identifiers recorded while processing the gate (non-empty
    /// only for `MultiApprove`).
    #[serde(default)]
    pub approvers: Vec<String>,
    /// Free-form details (e.g. the predicate that failed a `ConditionCheck`).
    #[serde(default)]
    pub details: serde_json::Value,
}

// ============================================================================
// SECTION: Enforcement Result
// ============================================================================

/// Output of the Intervenor for one deliberation decision.
///
/// # Invariants
/// - `audit_trail` is non-empty and forms a valid hash chain.
/// - `gate_log.len() <= ` the number of gates configured for this run.
/// - `applied` implies every entry in `gate_log` has `status == Approved`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnforcementResult {
    /// Hash of the deliberation result this enforcement acted on.
    pub decision_hash: String,
    /// Whether the action was applied.
    pub applied: bool,
    /// Whether a rollback was attempted and succeeded.
    pub rolled_back: bool,
    /// Ordered results of every gate that was processed.
    pub gate_log: Vec<GateResult>,
    /// Hash-chained audit trail beginning at `"genesis"`.
    pub audit_trail: Vec<AuditEntry>,
    /// Sixteen-hex-char SHA-256 prefix over the fields above.
    pub result_hash: String,
}

/// Fields hashed to produce [`EnforcementResult::result_hash`].
#[derive(Serialize)]
struct HashedFields<'a> {
    decision_hash: &'a str,
    applied: bool,
    rolled_back: bool,
    gate_log: &'a [GateResult],
    audit_trail: &'a [AuditEntry],
}

impl EnforcementResult {
    /// Builds an [`EnforcementResult`], computing `result_hash` from the
    /// other fields.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when canonicalization fails.
    pub fn with_hash(
        decision_hash: String,
        applied: bool,
        rolled_back: bool,
        gate_log: Vec<GateResult>,
        audit_trail: Vec<AuditEntry>,
    ) -> Result<Self, HashError> {
        let hashed = HashedFields {
            decision_hash: &decision_hash,
            applied,
            rolled_back,
            gate_log: &gate_log,
            audit_trail: &audit_trail,
        };
        let result_hash = hash_prefix(&hashed, SHORT_HASH_LEN)?;
        Ok(Self { decision_hash, applied, rolled_back, gate_log, audit_trail, result_hash })
    }

    /// Returns true when `applied` implies every gate in `gate_log`
    /// approved.
    #[must_use]
    pub fn applied_implies_all_approved(&self) -> bool {
        !self.applied || self.gate_log.iter().all(|g| g.status.is_approved())
    }

    /// Returns whether the enforced action was applied.
    #[must_use]
    pub const fn applied(&self) -> bool {
        self.applied
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only panics are permitted.")]

    use serde_json::json;
    use time::macros::datetime;

    use super::EnforcementResult;
    use super::GateResult;
    use super::GateStatus;
    use crate::core::audit::first;
    use crate::core::time::Timestamp;

    fn at() -> Timestamp {
        Timestamp::new(datetime!(2026-01-01 00:00:00 UTC))
    }

    #[test]
    fn applied_with_all_approved_satisfies_invariant() {
        let audit = vec![first("enforcement_start", "intervenor", json!({}), at()).unwrap()];
        let gates = vec![GateResult {
            gate_label: "ConditionCheck".to_string(),
            status: GateStatus::Approved,
            approvers: vec![],
            details: json!({}),
        }];
        let result = EnforcementResult::with_hash("hash".to_string(), true, false, gates, audit).unwrap();
        assert!(result.applied_implies_all_approved());
    }

    #[test]
    fn applied_with_a_rejected_gate_violates_invariant() {
        let audit = vec![first("enforcement_start", "intervenor", json!({}), at()).unwrap()];
        let gates = vec![GateResult {
            gate_label: "HumanApproval".to_string(),
            status: GateStatus::Rejected,
            approvers: vec![],
            details: json!({}),
        }];
        let result = EnforcementResult::with_hash("hash".to_string(), true, false, gates, audit).unwrap();
        assert!(!result.applied_implies_all_approved());
    }
}
