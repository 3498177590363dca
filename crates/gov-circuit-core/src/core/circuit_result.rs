// gov-circuit-core/src/core/circuit_result.rs
// ============================================================================
// Module: Circuit Result
// Description: Top-level artifact for one proposed action.
// Purpose: Tie the four stage artifacts together with timing and cancellation.
// Dependencies: crate::core::{deliberation, enforcement, prediction, threshold}, serde
// ============================================================================

//! ## Overview
//! A [`CircuitResult`] is the artifact a host receives after running one
//! proposed action through the circuit.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::deliberation::DeliberationResult;
use crate::core::enforcement::EnforcementResult;
use crate::core::prediction::Prediction;
use crate::core::threshold::ThresholdEvent;
use crate::core::vote::VoteDecision;

// ============================================================================
// SECTION: Circuit Result
// ============================================================================

/// Top-level artifact produced for one proposed action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitResult {
    /// The triggering threshold event, if any event of severity at least
    /// `Warning` was detected.
    pub event: Option<ThresholdEvent>,
    /// Simulation output, present whenever `event` is present.
    pub prediction: Option<Prediction>,
    /// Deliberation output, present whenever `prediction` is present.
    pub deliberation: Option<DeliberationResult>,
    /// Enforcement output; always present once the circuit reaches
    /// intervention (short-circuit paths still produce a minimal one).
    pub enforcement: Option<EnforcementResult>,
    /// Wall-clock duration of the circuit run, in milliseconds.
    pub duration_ms: u64,
    /// True when the host cancelled the run before it completed a stage.
    #[serde(default)]
    pub cancelled: bool,
}

impl CircuitResult {
    /// Returns true when the circuit applied the proposed action.
    #[must_use]
    pub fn applied(&self) -> bool {
        self.enforcement.as_ref().is_some_and(|e| e.applied)
    }

    /// Returns the process exit code a host driving the circuit should use
    /// for this result, as a function of the deliberation decision rather
    /// than any error taxonomy:
    ///
    /// - `0`: no qualifying event, or `Proceed` applied.
    /// - `1`: `Reject` or `Pause` (no mutation occurred).
    /// - `2`: `Defer`.
    /// - `3`: `Conditional` still awaiting external action.
    ///
    /// A fatal [`crate::core::errors::GovernanceError`] that aborts the
    /// circuit before a `CircuitResult` exists is reported separately via
    /// [`crate::core::errors::GovernanceError::exit_code`], which always
    /// yields `4`.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        let Some(deliberation) = &self.deliberation else {
            return 0;
        };
        match deliberation.decision {
            VoteDecision::Reject | VoteDecision::Pause => 1,
            VoteDecision::Defer => 2,
            VoteDecision::Conditional if !self.applied() => 3,
            VoteDecision::Conditional | VoteDecision::Proceed => 0,
        }
    }
}
