// gov-circuit-broker/src/callback_approval.rs
// ============================================================================
// Module: Callback Approval Channel
// Description: Closure-backed ApprovalChannel transport.
// Purpose: Let a host resolve approval requests synchronously from its own
//          logic (a test double, an in-process rule, a thin adapter over an
//          external approval service it already owns).
// Dependencies: gov-circuit-core, std
// ============================================================================

//! ## Overview
//! [`CallbackApprovalChannel`] invokes a user-supplied closure on every poll
//! and returns whatever [`Suspend<ApprovalOutcome>`] it produces. The
//! closure, not this type, decides when a request resolves.

// ============================================================================
// SECTION: Imports
// ============================================================================

use gov_circuit_core::ApprovalChannel;
use gov_circuit_core::ApprovalChannelError;
use gov_circuit_core::ApprovalOutcome;
use gov_circuit_core::ApprovalRequest;
use gov_circuit_core::ResumeToken;
use gov_circuit_core::Suspend;

// ============================================================================
// SECTION: Callback Approval Channel
// ============================================================================

/// Signature a [`CallbackApprovalChannel`] invokes on every poll.
type CallbackHandler = dyn FnMut(&ApprovalRequest, Option<&ResumeToken>) -> Result<Suspend<ApprovalOutcome>, ApprovalChannelError>
    + Send;

/// Approval channel that delegates every poll to a user-supplied closure.
pub struct CallbackApprovalChannel {
    /// Handler invoked with the request and any prior resume token.
    handler: Box<CallbackHandler>,
}

impl CallbackApprovalChannel {
    /// Creates a callback approval transport from a handler closure.
    pub fn new<F>(handler: F) -> Self
    where
        F: FnMut(&ApprovalRequest, Option<&ResumeToken>) -> Result<Suspend<ApprovalOutcome>, ApprovalChannelError>
            + Send
            + 'static,
    {
        Self { handler: Box::new(handler) }
    }
}

impl ApprovalChannel for CallbackApprovalChannel {
    fn poll(
        &mut self,
        request: &ApprovalRequest,
        resume: Option<&ResumeToken>,
    ) -> Result<Suspend<ApprovalOutcome>, ApprovalChannelError> {
        (self.handler)(request, resume)
    }
}
