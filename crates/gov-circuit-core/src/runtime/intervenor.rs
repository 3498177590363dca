// gov-circuit-core/src/runtime/intervenor.rs
// ============================================================================
// Module: Intervenor
// Description: Walks ordered gates to an EnforcementResult.
// Purpose: Cooperative, suspendable gate walk with a hash-chained audit trail.
// Dependencies: crate::{core, interfaces, runtime::gate}, serde_json
// ============================================================================

//! ## Overview
//! [`GateWalk`] processes a [`Gate`] sequence strictly in order. Any
//! `HumanApproval`/`MultiApprove` gate that has not yet resolved suspends the
//! walk by returning [`Suspend::Pending`]; the host resumes it later with
//! [`GateWalk::resume`]. No gate can auto-grant `HumanApproval` — a channel
//! that resolves without recording an external signal is impossible to
//! express through this API, and a `ConditionCheck`/`Pause` gate can never
//! produce an `Approved` `HumanApproval`-equivalent outcome on its own.
//!
//! Ratified action application happens out of band, in the host. Once the
//! walk reaches [`Suspend::Ready`] with `applied = true`, the host calls
//! [`GateWalk::report_rollback`] if that application failed, extending the
//! same audit chain with `rollback_start`/`rollback_complete`/
//! `rollback_failed` entries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde_json::json;

use crate::core::ApproverId;
use crate::core::AuditEntry;
use crate::core::EnforcementResult;
use crate::core::GateResult;
use crate::core::GateStatus;
use crate::core::GovernanceError;
use crate::core::ResumeToken;
use crate::core::Suspend;
use crate::core::Timestamp;
use crate::core::audit;
use crate::interfaces::ApprovalOutcome;
use crate::interfaces::ApprovalRequest;
use crate::interfaces::PredicateRegistry;
use crate::runtime::gate::Gate;

const ACTOR: &str = "intervenor";

// ============================================================================
// SECTION: Multi-Approve Progress
// ============================================================================

/// Accumulated responses for the `MultiApprove` gate currently being walked.
/// Reset whenever the walk advances past its gate.
#[derive(Debug, Default)]
struct MultiApproveProgress {
    approved: BTreeSet<ApproverId>,
    rejected: bool,
}

// ============================================================================
// SECTION: Gate Outcome
// ============================================================================

/// Result of attempting to advance the current gate by one poll.
enum GateOutcome {
    Resolved { status: GateStatus, approvers: Vec<String>, details: serde_json::Value },
    Pending(ResumeToken),
}

// ============================================================================
// SECTION: Gate Walk
// ============================================================================

/// Cooperative state machine walking an ordered [`Gate`] sequence.
pub struct GateWalk {
    decision_hash: String,
    gates: Vec<Gate>,
    index: usize,
    gate_started: bool,
    multi_progress: MultiApproveProgress,
    audit: Vec<AuditEntry>,
    gate_log: Vec<GateResult>,
    result: Option<EnforcementResult>,
}

impl GateWalk {
    /// Starts a new gate walk for `decision_hash`, appending the
    /// `"enforcement_start"` entry.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError`] when the first audit entry cannot be
    /// hashed.
    pub fn new(decision_hash: String, gates: Vec<Gate>, at: Timestamp) -> Result<Self, GovernanceError> {
        let start = audit::first(
            "enforcement_start",
            ACTOR,
            json!({ "decision_hash": decision_hash, "gate_count": gates.len() }),
            at,
        )?;
        Ok(Self {
            decision_hash,
            gates,
            index: 0,
            gate_started: false,
            multi_progress: MultiApproveProgress::default(),
            audit: vec![start],
            gate_log: Vec::new(),
            result: None,
        })
    }

    /// Returns the audit trail built so far, in order.
    #[must_use]
    pub fn audit_trail(&self) -> &[AuditEntry] {
        &self.audit
    }

    fn append(&mut self, action: &str, details: serde_json::Value, at: Timestamp) -> Result<(), GovernanceError> {
        let previous = self
            .audit
            .last()
            .ok_or_else(|| GovernanceError::IntegrityError("audit trail is unexpectedly empty".to_string()))?;
        let entry = audit::append(previous, action, ACTOR, details, at)?;
        self.audit.push(entry);
        Ok(())
    }

    /// Advances the walk by one poll. `pause_signal` is consumed only when
    /// the current gate is `Pause`, and tells the walk the external
    /// condition it is waiting on has been satisfied.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::PolicyViolation`] when a `ConditionCheck`
    /// predicate is unregistered or fails to evaluate, or
    /// [`GovernanceError::Hashing`] when an audit entry cannot be hashed.
    pub fn resume(
        &mut self,
        registry: &dyn PredicateRegistry,
        channel_resume: Option<&ResumeToken>,
        pause_signal: bool,
        at: Timestamp,
    ) -> Result<Suspend<EnforcementResult>, GovernanceError> {
        if let Some(result) = &self.result {
            return Ok(Suspend::Ready(result.clone()));
        }

        loop {
            if self.index >= self.gates.len() {
                let result = self.finish(true, "enforcement_applied", at)?;
                return Ok(Suspend::Ready(result));
            }

            if !self.gate_started {
                let label = self.gates[self.index].label();
                self.append("gate_start", json!({ "gate": label, "index": self.index }), at)?;
                self.gate_started = true;
            }

            let outcome = self.poll_current_gate(registry, channel_resume, pause_signal, at)?;
            match outcome {
                GateOutcome::Pending(token) => return Ok(Suspend::Pending(token)),
                GateOutcome::Resolved { status, approvers, details } => {
                    let gate_result = GateResult {
                        gate_label: self.gates[self.index].label().to_string(),
                        status,
                        approvers,
                        details,
                    };
                    self.append(
                        "gate_check",
                        json!({
                            "gate": gate_result.gate_label,
                            "status": status_label(status),
                            "approvers": gate_result.approvers,
                        }),
                        at,
                    )?;
                    self.gate_log.push(gate_result);

                    if !status.is_approved() {
                        let result = self.finish(false, "enforcement_blocked", at)?;
                        return Ok(Suspend::Ready(result));
                    }

                    self.index += 1;
                    self.gate_started = false;
                    self.multi_progress = MultiApproveProgress::default();
                }
            }
        }
    }

    fn poll_current_gate(
        &mut self,
        registry: &dyn PredicateRegistry,
        channel_resume: Option<&ResumeToken>,
        pause_signal: bool,
        at: Timestamp,
    ) -> Result<GateOutcome, GovernanceError> {
        let index = self.index;
        match &mut self.gates[index] {
            Gate::HumanApproval { channel, deadline } => {
                if at >= *deadline {
                    return Ok(GateOutcome::Resolved {
                        status: GateStatus::Timeout,
                        approvers: Vec::new(),
                        details: json!({}),
                    });
                }
                let request = ApprovalRequest {
                    gate_label: "HumanApproval".to_string(),
                    decision_hash: self.decision_hash.clone(),
                    population: Vec::new(),
                    deadline: *deadline,
                };
                match channel
                    .poll(&request, channel_resume)
                    .map_err(|err| GovernanceError::PolicyViolation(err.to_string()))?
                {
                    Suspend::Pending(token) => Ok(GateOutcome::Pending(token)),
                    Suspend::Ready(ApprovalOutcome::Approved { approver }) => Ok(GateOutcome::Resolved {
                        status: GateStatus::Approved,
                        approvers: vec![approver.to_string()],
                        details: json!({}),
                    }),
                    Suspend::Ready(ApprovalOutcome::Rejected { approver }) => Ok(GateOutcome::Resolved {
                        status: GateStatus::Rejected,
                        approvers: approver.map(|a| vec![a.to_string()]).unwrap_or_default(),
                        details: json!({}),
                    }),
                }
            }
            Gate::Timeout { deadline } => {
                if at >= *deadline {
                    Ok(GateOutcome::Resolved {
                        status: GateStatus::Rejected,
                        approvers: Vec::new(),
                        details: json!({ "reason": "deadline elapsed" }),
                    })
                } else {
                    Ok(GateOutcome::Pending(ResumeToken::new(format!("timeout:{index}"))))
                }
            }
            Gate::MultiApprove { required, population, channel, deadline } => {
                if *required > population.len() {
                    return Err(GovernanceError::InvalidArgument(format!(
                        "MultiApprove requires {required} of a population of {}",
                        population.len()
                    )));
                }
                if at >= *deadline {
                    return Ok(GateOutcome::Resolved {
                        status: GateStatus::Timeout,
                        approvers: self.multi_progress.approved.iter().map(ApproverId::to_string).collect(),
                        details: json!({}),
                    });
                }
                let request = ApprovalRequest {
                    gate_label: "MultiApprove".to_string(),
                    decision_hash: self.decision_hash.clone(),
                    population: population.clone(),
                    deadline: *deadline,
                };
                match channel
                    .poll(&request, channel_resume)
                    .map_err(|err| GovernanceError::PolicyViolation(err.to_string()))?
                {
                    Suspend::Pending(token) => Ok(GateOutcome::Pending(token)),
                    Suspend::Ready(outcome) => {
                        Ok(multi_approve_step(outcome, *required, &population[..], &mut self.multi_progress))
                    }
                }
            }
            Gate::ConditionCheck { predicates } => {
                for name in predicates.iter() {
                    let passed = registry
                        .evaluate(name)
                        .map_err(|err| GovernanceError::PolicyViolation(format!("predicate {name:?}: {err}")))?;
                    if !passed {
                        return Ok(GateOutcome::Resolved {
                            status: GateStatus::Rejected,
                            approvers: Vec::new(),
                            details: json!({ "failed_predicate": name }),
                        });
                    }
                }
                Ok(GateOutcome::Resolved { status: GateStatus::Approved, approvers: Vec::new(), details: json!({}) })
            }
            Gate::Pause { condition } => {
                if pause_signal {
                    Ok(GateOutcome::Resolved {
                        status: GateStatus::Approved,
                        approvers: Vec::new(),
                        details: json!({ "condition": condition }),
                    })
                } else {
                    Ok(GateOutcome::Pending(ResumeToken::new(format!("pause:{index}"))))
                }
            }
        }
    }

    fn finish(
        &mut self,
        applied: bool,
        action: &str,
        at: Timestamp,
    ) -> Result<EnforcementResult, GovernanceError> {
        self.append(action, json!({ "applied": applied }), at)?;
        let result = EnforcementResult::with_hash(
            self.decision_hash.clone(),
            applied,
            false,
            self.gate_log.clone(),
            self.audit.clone(),
        )?;
        self.result = Some(result.clone());
        Ok(result)
    }

    /// Reports that the host's out-of-band application of the ratified
    /// action failed, extending the audit chain with rollback entries
    ///. Must only be called after `resume` returned
    /// `Ready` with `applied == true`.
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::PolicyViolation`] if called before the
    /// walk reached an applied result, or a hashing error while extending
    /// the chain.
    pub fn report_rollback(&mut self, rollback_succeeded: bool, at: Timestamp) -> Result<EnforcementResult, GovernanceError> {
        let Some(applied_result) = self.result.take() else {
            return Err(GovernanceError::PolicyViolation(
                "report_rollback called before enforcement was applied".to_string(),
            ));
        };
        if !applied_result.applied {
            self.result = Some(applied_result);
            return Err(GovernanceError::PolicyViolation(
                "report_rollback called on a blocked enforcement result".to_string(),
            ));
        }
        self.append("rollback_start", json!({}), at)?;
        self.append(
            if rollback_succeeded { "rollback_complete" } else { "rollback_failed" },
            json!({}),
            at,
        )?;
        let result = EnforcementResult::with_hash(
            applied_result.decision_hash,
            true,
            rollback_succeeded,
            applied_result.gate_log,
            self.audit.clone(),
        )?;
        self.result = Some(result.clone());
        Ok(result)
    }
}

const fn status_label(status: GateStatus) -> &'static str {
    match status {
        GateStatus::Approved => "approved",
        GateStatus::Rejected => "rejected",
        GateStatus::Timeout => "timeout",
        GateStatus::Pending => "pending",
    }
}

fn multi_approve_step(
    outcome: ApprovalOutcome,
    required: usize,
    population: &[ApproverId],
    progress: &mut MultiApproveProgress,
) -> GateOutcome {
    match outcome {
        ApprovalOutcome::Approved { approver } => {
            progress.approved.insert(approver);
        }
        ApprovalOutcome::Rejected { .. } => {
            progress.rejected = true;
        }
    }

    let approvers: Vec<String> = progress.approved.iter().map(ApproverId::to_string).collect();
    if progress.approved.len() >= required {
        return GateOutcome::Resolved { status: GateStatus::Approved, approvers, details: json!({}) };
    }
    if progress.rejected {
        return GateOutcome::Resolved { status: GateStatus::Rejected, approvers, details: json!({}) };
    }
    if population.len() - progress.approved.len() < required {
        return GateOutcome::Resolved {
            status: GateStatus::Rejected,
            approvers,
            details: json!({ "reason": "insufficient remaining population" }),
        };
    }
    GateOutcome::Pending(ResumeToken::new("multi-approve"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only panics are permitted.")]

    use std::cell::RefCell;

    use time::macros::datetime;

    use super::Gate;
    use super::GateWalk;
    use crate::core::ApproverId;
    use crate::core::GateStatus;
    use crate::core::ResumeToken;
    use crate::core::Suspend;
    use crate::core::Timestamp;
    use crate::interfaces::ApprovalChannel;
    use crate::interfaces::ApprovalChannelError;
    use crate::interfaces::ApprovalOutcome;
    use crate::interfaces::ApprovalRequest;
    use crate::interfaces::PredicateError;
    use crate::interfaces::PredicateRegistry;

    fn at() -> Timestamp {
        Timestamp::new(datetime!(2026-01-01 00:00:00 UTC))
    }

    fn later() -> Timestamp {
        Timestamp::new(datetime!(2026-01-01 01:00:00 UTC))
    }

    struct AlwaysApprove;
    impl ApprovalChannel for AlwaysApprove {
        fn poll(
            &mut self,
            _request: &ApprovalRequest,
            _resume: Option<&ResumeToken>,
        ) -> Result<Suspend<ApprovalOutcome>, ApprovalChannelError> {
            Ok(Suspend::Ready(ApprovalOutcome::Approved { approver: ApproverId::new("op-1") }))
        }
    }

    struct AlwaysReject;
    impl ApprovalChannel for AlwaysReject {
        fn poll(
            &mut self,
            _request: &ApprovalRequest,
            _resume: Option<&ResumeToken>,
        ) -> Result<Suspend<ApprovalOutcome>, ApprovalChannelError> {
            Ok(Suspend::Ready(ApprovalOutcome::Rejected { approver: Some(ApproverId::new("op-1")) }))
        }
    }

    struct NeverResolves;
    impl ApprovalChannel for NeverResolves {
        fn poll(
            &mut self,
            _request: &ApprovalRequest,
            _resume: Option<&ResumeToken>,
        ) -> Result<Suspend<ApprovalOutcome>, ApprovalChannelError> {
            Ok(Suspend::Pending(ResumeToken::new("still-waiting")))
        }
    }

    struct QueuedChannel {
        responses: RefCell<Vec<ApprovalOutcome>>,
    }
    impl QueuedChannel {
        fn new(responses: Vec<ApprovalOutcome>) -> Self {
            let mut responses = responses;
            responses.reverse();
            Self { responses: RefCell::new(responses) }
        }
    }
    impl ApprovalChannel for QueuedChannel {
        fn poll(
            &mut self,
            _request: &ApprovalRequest,
            _resume: Option<&ResumeToken>,
        ) -> Result<Suspend<ApprovalOutcome>, ApprovalChannelError> {
            match self.responses.borrow_mut().pop() {
                Some(outcome) => Ok(Suspend::Ready(outcome)),
                None => Ok(Suspend::Pending(ResumeToken::new("queue-empty"))),
            }
        }
    }

    struct AllowAll;
    impl PredicateRegistry for AllowAll {
        fn evaluate(&self, _name: &str) -> Result<bool, PredicateError> {
            Ok(true)
        }
    }

    struct DenyNamed(&'static str);
    impl PredicateRegistry for DenyNamed {
        fn evaluate(&self, name: &str) -> Result<bool, PredicateError> {
            Ok(name != self.0)
        }
    }

    #[test]
    fn single_approved_gate_applies() {
        let gates = vec![Gate::HumanApproval { channel: Box::new(AlwaysApprove), deadline: later() }];
        let mut walk = GateWalk::new("decision-hash".to_string(), gates, at()).unwrap();
        let result = walk.resume(&AllowAll, None, false, at()).unwrap().ready().unwrap();
        assert!(result.applied());
        assert_eq!(result.gate_log[0].status, GateStatus::Approved);
    }

    #[test]
    fn rejected_gate_blocks_remaining_gates() {
        let gates = vec![
            Gate::HumanApproval { channel: Box::new(AlwaysReject), deadline: later() },
            Gate::ConditionCheck { predicates: vec!["should-not-run".to_string()] },
        ];
        let mut walk = GateWalk::new("decision-hash".to_string(), gates, at()).unwrap();
        let result = walk.resume(&AllowAll, None, false, at()).unwrap().ready().unwrap();
        assert!(!result.applied());
        assert_eq!(result.gate_log.len(), 1);
    }

    #[test]
    fn condition_check_rejects_on_first_failing_predicate() {
        let gates = vec![Gate::ConditionCheck { predicates: vec!["clean-worktree".to_string()] }];
        let mut walk = GateWalk::new("decision-hash".to_string(), gates, at()).unwrap();
        let result = walk.resume(&DenyNamed("clean-worktree"), None, false, at()).unwrap().ready().unwrap();
        assert!(!result.applied());
        assert_eq!(result.gate_log[0].status, GateStatus::Rejected);
    }

    #[test]
    fn pending_channel_suspends_the_walk() {
        let gates = vec![Gate::HumanApproval { channel: Box::new(NeverResolves), deadline: later() }];
        let mut walk = GateWalk::new("decision-hash".to_string(), gates, at()).unwrap();
        let outcome = walk.resume(&AllowAll, None, false, at()).unwrap();
        assert!(!outcome.is_ready());
    }

    #[test]
    fn expired_deadline_times_out_pending_human_approval() {
        let gates = vec![Gate::HumanApproval { channel: Box::new(NeverResolves), deadline: at() }];
        let mut walk = GateWalk::new("decision-hash".to_string(), gates, at()).unwrap();
        let result = walk.resume(&AllowAll, None, false, later()).unwrap().ready().unwrap();
        assert!(!result.applied());
        assert_eq!(result.gate_log[0].status, GateStatus::Timeout);
    }

    #[test]
    fn multi_approve_succeeds_once_required_count_reached() {
        let population = vec![ApproverId::new("a"), ApproverId::new("b"), ApproverId::new("c")];
        let channel = QueuedChannel::new(vec![
            ApprovalOutcome::Approved { approver: ApproverId::new("a") },
            ApprovalOutcome::Approved { approver: ApproverId::new("b") },
        ]);
        let gates = vec![Gate::MultiApprove {
            required: 2,
            population,
            channel: Box::new(channel),
            deadline: later(),
        }];
        let mut walk = GateWalk::new("decision-hash".to_string(), gates, at()).unwrap();
        let first = walk.resume(&AllowAll, None, false, at()).unwrap();
        assert!(!first.is_ready());
        let second = walk.resume(&AllowAll, None, false, at()).unwrap().ready().unwrap();
        assert!(second.applied());
        assert_eq!(second.gate_log[0].approvers.len(), 2);
    }

    #[test]
    fn multi_approve_rejects_on_any_rejection() {
        let population = vec![ApproverId::new("a"), ApproverId::new("b"), ApproverId::new("c")];
        let channel = QueuedChannel::new(vec![ApprovalOutcome::Rejected { approver: Some(ApproverId::new("b")) }]);
        let gates = vec![Gate::MultiApprove {
            required: 2,
            population,
            channel: Box::new(channel),
            deadline: later(),
        }];
        let mut walk = GateWalk::new("decision-hash".to_string(), gates, at()).unwrap();
        let result = walk.resume(&AllowAll, None, false, at()).unwrap().ready().unwrap();
        assert!(!result.applied());
        assert_eq!(result.gate_log[0].status, GateStatus::Rejected);
    }

    #[test]
    fn pause_gate_halts_until_external_signal() {
        let gates = vec![Gate::Pause { condition: "maintenance window closed".to_string() }];
        let mut walk = GateWalk::new("decision-hash".to_string(), gates, at()).unwrap();
        let waiting = walk.resume(&AllowAll, None, false, at()).unwrap();
        assert!(!waiting.is_ready());
        let resolved = walk.resume(&AllowAll, None, true, at()).unwrap().ready().unwrap();
        assert!(resolved.applied());
    }

    #[test]
    fn report_rollback_extends_the_chain_and_sets_rolled_back() {
        let gates = vec![Gate::HumanApproval { channel: Box::new(AlwaysApprove), deadline: later() }];
        let mut walk = GateWalk::new("decision-hash".to_string(), gates, at()).unwrap();
        let applied = walk.resume(&AllowAll, None, false, at()).unwrap().ready().unwrap();
        assert!(applied.applied());
        assert!(!applied.rolled_back);
        let rolled_back = walk.report_rollback(true, later()).unwrap();
        assert!(rolled_back.applied);
        assert!(rolled_back.rolled_back);
        assert!(rolled_back.audit_trail.len() > applied.audit_trail.len());
    }

    #[test]
    fn audit_trail_begins_with_enforcement_start() {
        let gates = vec![Gate::ConditionCheck { predicates: vec![] }];
        let walk = GateWalk::new("decision-hash".to_string(), gates, at()).unwrap();
        assert_eq!(walk.audit_trail()[0].action, "enforcement_start");
        assert_eq!(walk.audit_trail()[0].previous_hash, "genesis");
    }
}
