// gov-circuit-core/src/core/errors.rs
// ============================================================================
// Module: Error Taxonomy
// Description: The circuit's top-level error classification.
// Purpose: Surface a stable taxonomy tag and offending stage to the host.
// Dependencies: thiserror, crate::core::hashing
// ============================================================================

//! ## Overview
//! Every error the circuit can surface narrows to [`GovernanceError`] at the
//! stage boundary. `Timeout` never escapes its originating stage (it is
//! absorbed as an abstention in the Deliberator or a `Timeout` `GateResult`
//! in the Intervenor); every other variant propagates to the Circuit, which
//! records a terminal audit entry and returns.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::hashing::HashError;

// ============================================================================
// SECTION: Stage Tag
// ============================================================================

/// Stage a [`GovernanceError`] originated in, recorded alongside the error
/// for `CircuitResult` diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// The Detector.
    Detection,
    /// The Simulator.
    Simulation,
    /// The Deliberator.
    Deliberation,
    /// The Intervenor.
    Intervention,
}

// ============================================================================
// SECTION: Error Taxonomy
// ============================================================================

/// Top-level error taxonomy for the circuit.
#[derive(Debug, Error)]
pub enum GovernanceError {
    /// A caller supplied a malformed event, a non-positive run count, or
    /// weights that do not sum to 1. Surfaced directly; no audit entry.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A majority of Monte-Carlo runs failed; no prediction was emitted.
    #[error("simulation instability: {0}")]
    SimulationInstability(String),

    /// A bounded wait exceeded its deadline. Handled locally by the
    /// originating stage; this variant should never cross a stage
    /// boundary.
    #[error("timeout waiting on {0}")]
    Timeout(String),

    /// An attempt to bypass `HumanApproval` or mutate an immutable
    /// artifact. Fatal to the circuit.
    #[error("policy violation: {0}")]
    PolicyViolation(String),

    /// A hash mismatch on verification, or chain-linkage failure. Fatal.
    #[error("integrity error: {0}")]
    IntegrityError(String),

    /// Cooperative cancellation. Not an error to the host; produces a
    /// truncated [`crate::core::circuit_result::CircuitResult`] instead.
    #[error("cancelled")]
    Cancelled,

    /// Canonical hashing failed while building or verifying an artifact.
    #[error(transparent)]
    Hashing(#[from] HashError),
}

impl GovernanceError {
    /// Returns the stable audit action label recorded for this error class,
    /// or `None` for classes that never produce an audit entry
    /// (`InvalidArgument`, `Timeout`, `Cancelled`).
    #[must_use]
    pub const fn audit_action(&self) -> Option<&'static str> {
        match self {
            Self::SimulationInstability(_) => Some("simulation_failed"),
            Self::PolicyViolation(_) => Some("policy_violation"),
            Self::IntegrityError(_) | Self::Hashing(_) => Some("integrity_error"),
            Self::InvalidArgument(_) | Self::Timeout(_) | Self::Cancelled => None,
        }
    }

    /// Returns the process exit code for this error class.
    ///
    /// Every variant that reaches a host as a live `GovernanceError` (rather
    /// than being absorbed within its originating stage) is, by
    /// definition, an internal error the circuit could not recover from —
    /// so this is always `4`. The decision-driven codes `0`-`3` belong to
    /// [`crate::core::circuit_result::CircuitResult::exit_code`], which
    /// only exists once a run completes normally.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        4
    }
}

#[cfg(test)]
mod tests {
    use super::GovernanceError;

    #[test]
    fn audit_action_is_stable_per_variant() {
        assert_eq!(
            GovernanceError::PolicyViolation("x".to_string()).audit_action(),
            Some("policy_violation")
        );
        assert_eq!(GovernanceError::InvalidArgument("x".to_string()).audit_action(), None);
        assert_eq!(GovernanceError::Timeout("x".to_string()).audit_action(), None);
    }
}
