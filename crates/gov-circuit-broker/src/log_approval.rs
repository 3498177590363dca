// gov-circuit-broker/src/log_approval.rs
// ============================================================================
// Module: Log Approval Channel
// Description: Audit-logging wrapper around another ApprovalChannel.
// Purpose: Record a structured line for every poll and resolution without
//          changing which outcome is returned.
// Dependencies: gov-circuit-core, serde_json, std
// ============================================================================

//! ## Overview
//! [`LogApprovalChannel`] wraps an inner [`ApprovalChannel`] and writes one
//! JSON record per poll to a caller-supplied writer. It never resolves a
//! request itself; the inner channel's outcome (or pending token) passes
//! through unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;

use gov_circuit_core::ApprovalChannel;
use gov_circuit_core::ApprovalChannelError;
use gov_circuit_core::ApprovalOutcome;
use gov_circuit_core::ApprovalRequest;
use gov_circuit_core::ResumeToken;
use gov_circuit_core::Suspend;
use serde_json::json;

// ============================================================================
// SECTION: Log Approval Channel
// ============================================================================

/// Approval channel that logs every poll of an inner channel.
pub struct LogApprovalChannel<W: Write + Send> {
    /// Channel whose polls are being logged.
    inner: Box<dyn ApprovalChannel + Send>,
    /// Output writer for log records.
    writer: W,
}

impl<W: Write + Send> LogApprovalChannel<W> {
    /// Wraps `inner`, writing one JSON record per poll to `writer`.
    pub fn new(inner: Box<dyn ApprovalChannel + Send>, writer: W) -> Self {
        Self { inner, writer }
    }

    fn write_record(&mut self, request: &ApprovalRequest, outcome: &Suspend<ApprovalOutcome>) -> Result<(), ApprovalChannelError> {
        let status = match outcome {
            Suspend::Pending(token) => json!({ "status": "pending", "resume_token": token.as_str() }),
            Suspend::Ready(ApprovalOutcome::Approved { approver }) => {
                json!({ "status": "approved", "approver": approver.to_string() })
            }
            Suspend::Ready(ApprovalOutcome::Rejected { approver }) => {
                json!({ "status": "rejected", "approver": approver.as_ref().map(ToString::to_string) })
            }
        };
        let record = json!({
            "gate_label": request.gate_label,
            "decision_hash": request.decision_hash,
            "outcome": status,
        });
        serde_json::to_writer(&mut self.writer, &record)
            .map_err(|err| ApprovalChannelError::Channel(format!("log write failed: {err}")))?;
        self.writer
            .write_all(b"\n")
            .map_err(|err| ApprovalChannelError::Channel(format!("log write failed: {err}")))
    }
}

impl<W: Write + Send> ApprovalChannel for LogApprovalChannel<W> {
    fn poll(
        &mut self,
        request: &ApprovalRequest,
        resume: Option<&ResumeToken>,
    ) -> Result<Suspend<ApprovalOutcome>, ApprovalChannelError> {
        let outcome = self.inner.poll(request, resume)?;
        self.write_record(request, &outcome)?;
        Ok(outcome)
    }
}
