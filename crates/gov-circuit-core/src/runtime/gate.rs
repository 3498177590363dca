// gov-circuit-core/src/runtime/gate.rs
// ============================================================================
// Module: Gates
// Description: Enforcement checkpoints walked by the Intervenor.
// Purpose: Configuration for each gate variant.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! A [`Gate`] is a checkpoint that must resolve to
//! [`crate::core::GateStatus::Approved`] for enforcement to continue. Gates
//! carry their own deadline (the host supplies concrete instants; the
//! circuit never reads the wall clock) and, where relevant, the
//! [`crate::interfaces::ApprovalChannel`] they poll.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::ApproverId;
use crate::core::Timestamp;
use crate::interfaces::ApprovalChannel;

// ============================================================================
// SECTION: Gate
// ============================================================================

/// An enforcement checkpoint.
pub enum Gate {
    /// Requests approval through a single channel; blocks until response or
    /// timeout.
    HumanApproval {
        /// Transport the approval request is sent through.
        channel: Box<dyn ApprovalChannel>,
        /// Deadline after which the gate resolves to `Timeout`.
        deadline: Timestamp,
    },
    /// Yields `Rejected` if still pending at `deadline`; bounds total
    /// enforcement latency without itself requesting approval.
    Timeout {
        /// Deadline at which this gate resolves.
        deadline: Timestamp,
    },
    /// Requires `required` distinct approvers out of `population`.
    MultiApprove {
        /// Number of distinct approvals required.
        required: usize,
        /// Eligible approver population.
        population: Vec<ApproverId>,
        /// Transport polled for approver responses.
        channel: Box<dyn ApprovalChannel>,
        /// Deadline after which the gate resolves to `Timeout`.
        deadline: Timestamp,
    },
    /// Evaluates named predicates against the current environment;
    /// `Approved` iff all pass.
    ConditionCheck {
        /// Names of predicates to evaluate, drawn from a
        /// [`crate::interfaces::PredicateRegistry`].
        predicates: Vec<String>,
    },
    /// Yields `Pending`; the gate sequence halts until an external signal
    /// satisfies `condition`.
    Pause {
        /// Human-readable description of the resume condition.
        condition: String,
    },
}

impl Gate {
    /// Stable label recorded in [`crate::core::GateResult::gate_label`].
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::HumanApproval { .. } => "HumanApproval",
            Self::Timeout { .. } => "Timeout",
            Self::MultiApprove { .. } => "MultiApprove",
            Self::ConditionCheck { .. } => "ConditionCheck",
            Self::Pause { .. } => "Pause",
        }
    }
}
