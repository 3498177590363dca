// gov-circuit-broker/src/channel_approval.rs
// ============================================================================
// Module: Channel Approval Channel
// Description: mpsc-backed ApprovalChannel transport.
// Purpose: Let an external process (a human-facing frontend, a bot, a test
//          harness) deliver approval outcomes over a plain std channel.
// Dependencies: gov-circuit-core, std::sync::mpsc
// ============================================================================

//! ## Overview
//! [`ChannelApprovalChannel`] polls a [`std::sync::mpsc::Receiver`] for the
//! next [`ApprovalOutcome`]. It never blocks: an empty channel resolves to
//! `Suspend::Pending` so the circuit can suspend and retry on a later poll.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::mpsc::Receiver;
use std::sync::mpsc::TryRecvError;

use gov_circuit_core::ApprovalChannel;
use gov_circuit_core::ApprovalChannelError;
use gov_circuit_core::ApprovalOutcome;
use gov_circuit_core::ApprovalRequest;
use gov_circuit_core::ResumeToken;
use gov_circuit_core::Suspend;

// ============================================================================
// SECTION: Channel Approval Channel
// ============================================================================

/// Approval channel backed by an [`std::sync::mpsc::Receiver`].
///
/// The paired [`std::sync::mpsc::Sender`] is held by whatever surfaces the
/// request to a human or automated approver; this type only ever reads.
pub struct ChannelApprovalChannel {
    /// Receiving half of the approval-outcome channel.
    receiver: Receiver<ApprovalOutcome>,
}

impl ChannelApprovalChannel {
    /// Creates a channel approval transport from the receiving half of an
    /// `mpsc` channel.
    #[must_use]
    pub fn new(receiver: Receiver<ApprovalOutcome>) -> Self {
        Self { receiver }
    }
}

impl ApprovalChannel for ChannelApprovalChannel {
    fn poll(
        &mut self,
        request: &ApprovalRequest,
        _resume: Option<&ResumeToken>,
    ) -> Result<Suspend<ApprovalOutcome>, ApprovalChannelError> {
        match self.receiver.try_recv() {
            Ok(outcome) => Ok(Suspend::Ready(outcome)),
            Err(TryRecvError::Empty) => {
                Ok(Suspend::Pending(ResumeToken::new(format!("channel:{}", request.gate_label))))
            }
            Err(TryRecvError::Disconnected) => {
                Err(ApprovalChannelError::Channel("approval channel sender was dropped".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only panics are permitted.")]

    use std::sync::mpsc::channel;

    use gov_circuit_core::ApproverId;
    use gov_circuit_core::Suspend;
    use gov_circuit_core::Timestamp;
    use time::macros::datetime;

    use super::ApprovalChannel;
    use super::ApprovalOutcome;
    use super::ApprovalRequest;
    use super::ChannelApprovalChannel;

    fn request() -> ApprovalRequest {
        ApprovalRequest {
            gate_label: "HumanApproval".to_string(),
            decision_hash: "deadbeef".to_string(),
            population: Vec::new(),
            deadline: Timestamp::new(datetime!(2026-01-01 01:00:00 UTC)),
        }
    }

    #[test]
    fn empty_channel_is_pending() {
        let (_sender, receiver) = channel();
        let mut transport = ChannelApprovalChannel::new(receiver);
        assert!(matches!(transport.poll(&request(), None).unwrap(), Suspend::Pending(_)));
    }

    #[test]
    fn sent_outcome_resolves_ready() {
        let (sender, receiver) = channel();
        let mut transport = ChannelApprovalChannel::new(receiver);
        sender.send(ApprovalOutcome::Approved { approver: ApproverId::new("op-1") }).unwrap();
        let outcome = transport.poll(&request(), None).unwrap();
        assert_eq!(outcome, Suspend::Ready(ApprovalOutcome::Approved { approver: ApproverId::new("op-1") }));
    }

    #[test]
    fn dropped_sender_is_a_transport_error() {
        let (sender, receiver) = channel::<ApprovalOutcome>();
        let mut transport = ChannelApprovalChannel::new(receiver);
        drop(sender);
        assert!(transport.poll(&request(), None).is_err());
    }
}
