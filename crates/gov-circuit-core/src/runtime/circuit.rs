// gov-circuit-core/src/runtime/circuit.rs
// ============================================================================
// Module: Circuit
// Description: Orchestrates Detector -> Simulator -> Deliberator -> Intervenor.
// Purpose: Assemble one proposed action's CircuitResult.
// Dependencies: crate::{core, interfaces, runtime::{detector, simulator,
//               deliberator, intervenor, gate}}
// ============================================================================

//! ## Overview
//! [`Circuit::run`] drives one proposed action through the four stages.
//! Detection, simulation, and deliberation are synchronous; only
//! enforcement can suspend, because only [`crate::interfaces::ApprovalChannel`]
//! polling yields [`Suspend::Pending`]. `run` therefore returns a
//! [`CircuitOutcome`] that is either already [`Suspend::Ready`]-equivalent
//! (`Resolved`) or a [`CircuitRun`] the host drives to completion with
//! repeated [`CircuitRun::resume`] calls, mirroring [`crate::runtime::GateWalk`]'s
//! own cooperative suspension.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Value;
use serde_json::json;

use crate::core::CircuitResult;
use crate::core::DeliberationResult;
use crate::core::EnforcementResult;
use crate::core::GovernanceError;
use crate::core::MetricKind;
use crate::core::Prediction;
use crate::core::ResumeToken;
use crate::core::SessionId;
use crate::core::Suspend;
use crate::core::TargetId;
use crate::core::ThresholdEvent;
use crate::core::Timestamp;
use crate::core::VoteDecision;
use crate::core::audit;
use crate::interfaces::ApprovalChannel;
use crate::interfaces::MetricSource;
use crate::interfaces::PredicateRegistry;
use crate::interfaces::PriorObservation;
use crate::interfaces::VoteProvider;
use crate::runtime::deliberator::Deliberator;
use crate::runtime::detector::Detector;
use crate::runtime::gate::Gate;
use crate::runtime::intervenor::GateWalk;
use crate::runtime::simulator::Simulator;

const ACTOR: &str = "circuit";

// ============================================================================
// SECTION: Config
// ============================================================================

/// Tunables that stay constant across many [`Circuit::run`] calls.
#[derive(Debug, Clone, Copy)]
pub struct CircuitConfig {
    /// Number of Monte Carlo runs the Simulator performs per event.
    pub monte_carlo_runs: u32,
    /// Fixed simulation seed; `None` derives one from the event hash.
    pub seed: Option<u64>,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self { monte_carlo_runs: 500, seed: None }
    }
}

// ============================================================================
// SECTION: Detection Input
// ============================================================================

/// One metric/target pair the Detector evaluates on a `Circuit::run` call.
pub struct DetectionCandidate<'a> {
    /// Source the Detector measures `metric` through.
    pub source: &'a dyn MetricSource,
    /// Metric being evaluated.
    pub metric: MetricKind,
    /// Subject of the measurement.
    pub target: TargetId,
    /// Configured limit for `metric`.
    pub threshold: f64,
    /// Prior observation, for growth-rate-style metrics.
    pub prior: Option<PriorObservation>,
    /// Additional context recorded on the resulting event.
    pub details: BTreeMap<String, Value>,
}

/// Inputs needed to build the `HumanApproval` gate appended to a
/// `Conditional` decision's gate composition.
pub struct ConditionalApproval {
    /// Channel the generated `HumanApproval` gate polls.
    pub channel: Box<dyn ApprovalChannel>,
    /// Deadline for that gate.
    pub deadline: Timestamp,
}

// ============================================================================
// SECTION: Circuit
// ============================================================================

/// Runs proposed actions through Detection, Simulation, Deliberation, and
/// Intervention.
#[derive(Debug, Clone, Copy)]
pub struct Circuit {
    config: CircuitConfig,
}

/// Either a fully resolved result, or an in-progress enforcement walk the
/// host must drive to completion.
pub enum CircuitOutcome {
    /// The circuit reached a terminal [`CircuitResult`] without suspending.
    Resolved(Box<CircuitResult>),
    /// Enforcement gates are still pending; see [`CircuitRun::resume`].
    Pending(Box<CircuitRun>),
}

impl Circuit {
    /// Builds a circuit with `config`.
    #[must_use]
    pub const fn new(config: CircuitConfig) -> Self {
        Self { config }
    }

    /// Runs one proposed action through the full circuit.
    ///
    /// `candidates` is every metric/target pair to detect against; the
    /// highest-severity resulting event is carried forward (ties broken by
    /// most recent timestamp). If none of them classify at least
    /// `Warning`, the run short-circuits immediately.
    ///
    /// # Errors
    ///
    /// Propagates [`Detector::evaluate`], [`Simulator::simulate`], and
    /// [`Deliberator::deliberate`] errors unchanged.
    pub fn run(
        &self,
        candidates: &[DetectionCandidate<'_>],
        providers: &[&dyn VoteProvider],
        session_id: SessionId,
        approval: Option<ConditionalApproval>,
        registry: &dyn PredicateRegistry,
        start: Timestamp,
    ) -> Result<CircuitOutcome, GovernanceError> {
        let Some(event) = self.detect_highest_severity(candidates, start)? else {
            return Ok(CircuitOutcome::Resolved(Box::new(no_threshold_result(start)?)));
        };

        let simulator = Simulator::new();
        let prediction = simulator.simulate(&event, self.config.seed, self.config.monte_carlo_runs)?;

        let deliberator = Deliberator::new();
        let deliberation = deliberator.deliberate(session_id, &event, &prediction, providers, start)?;

        match deliberation.decision {
            VoteDecision::Reject => Ok(CircuitOutcome::Resolved(Box::new(short_circuited(
                event,
                prediction,
                deliberation,
                "enforcement_blocked_by_deliberation",
                start,
            )?))),
            VoteDecision::Defer => Ok(CircuitOutcome::Resolved(Box::new(short_circuited(
                event,
                prediction,
                deliberation,
                "enforcement_deferred",
                start,
            )?))),
            VoteDecision::Proceed | VoteDecision::Pause | VoteDecision::Conditional => {
                let gates = gates_for(&deliberation, approval)?;
                let decision_hash = deliberation.audit_hash.clone();
                let mut gate_walk = GateWalk::new(decision_hash, gates, start)?;
                match gate_walk.resume(registry, None, false, start)? {
                    Suspend::Ready(enforcement) => Ok(CircuitOutcome::Resolved(Box::new(assemble(
                        event,
                        prediction,
                        deliberation,
                        enforcement,
                        start,
                        start,
                    )))),
                    Suspend::Pending(token) => Ok(CircuitOutcome::Pending(Box::new(CircuitRun {
                        event,
                        prediction,
                        deliberation,
                        start,
                        gate_walk,
                        last_token: Some(token),
                    }))),
                }
            }
        }
    }

    fn detect_highest_severity(
        &self,
        candidates: &[DetectionCandidate<'_>],
        at: Timestamp,
    ) -> Result<Option<ThresholdEvent>, GovernanceError> {
        let mut best: Option<ThresholdEvent> = None;
        for candidate in candidates {
            let detector = Detector::new(candidate.source);
            let Some(event) = detector.evaluate(
                candidate.metric.clone(),
                candidate.target.clone(),
                candidate.threshold,
                candidate.prior.as_ref(),
                candidate.details.clone(),
                at,
            )?
            else {
                continue;
            };
            if !event.severity.at_least_warning() {
                continue;
            }
            best = Some(match best {
                Some(current) if current.severity > event.severity => current,
                Some(current) if current.severity == event.severity && current.timestamp >= event.timestamp => {
                    current
                }
                _ => event,
            });
        }
        Ok(best)
    }
}

// ============================================================================
// SECTION: In-Progress Run
// ============================================================================

/// An enforcement walk still awaiting a gate resolution.
pub struct CircuitRun {
    event: ThresholdEvent,
    prediction: Prediction,
    deliberation: DeliberationResult,
    start: Timestamp,
    gate_walk: GateWalk,
    last_token: Option<ResumeToken>,
}

impl CircuitRun {
    /// The token returned by the most recent `Suspend::Pending`, for hosts
    /// that persist it across process boundaries.
    #[must_use]
    pub const fn resume_token(&self) -> Option<&ResumeToken> {
        self.last_token.as_ref()
    }

    /// Resumes the underlying gate walk.
    ///
    /// # Errors
    ///
    /// Propagates [`GateWalk::resume`]'s errors unchanged.
    pub fn resume(
        &mut self,
        registry: &dyn PredicateRegistry,
        channel_resume: Option<&ResumeToken>,
        pause_signal: bool,
        at: Timestamp,
    ) -> Result<Suspend<CircuitResult>, GovernanceError> {
        match self.gate_walk.resume(registry, channel_resume, pause_signal, at)? {
            Suspend::Pending(token) => {
                self.last_token = Some(token.clone());
                Ok(Suspend::Pending(token))
            }
            Suspend::Ready(enforcement) => Ok(Suspend::Ready(assemble(
                self.event.clone(),
                self.prediction.clone(),
                self.deliberation.clone(),
                enforcement,
                self.start,
                at,
            ))),
        }
    }

    /// Reports that applying the ratified action failed or succeeded,
    /// after [`Self::resume`] returned an applied [`CircuitResult`].
    ///
    /// # Errors
    ///
    /// Propagates [`GateWalk::report_rollback`]'s errors unchanged.
    pub fn report_rollback(&mut self, rollback_succeeded: bool, at: Timestamp) -> Result<EnforcementResult, GovernanceError> {
        self.gate_walk.report_rollback(rollback_succeeded, at)
    }

    /// Truncates this run into a cancelled [`CircuitResult`].
    #[must_use]
    pub fn cancel(&self, at: Timestamp) -> CircuitResult {
        CircuitResult {
            event: Some(self.event.clone()),
            prediction: Some(self.prediction.clone()),
            deliberation: Some(self.deliberation.clone()),
            enforcement: None,
            duration_ms: duration_ms(self.start, at),
            cancelled: true,
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn gates_for(deliberation: &DeliberationResult, approval: Option<ConditionalApproval>) -> Result<Vec<Gate>, GovernanceError> {
    match deliberation.decision {
        VoteDecision::Proceed => Ok(Vec::new()),
        VoteDecision::Conditional => {
            let ConditionalApproval { channel, deadline } = approval.ok_or_else(|| {
                GovernanceError::InvalidArgument("Conditional decision requires a ConditionalApproval".to_string())
            })?;
            Ok(vec![Gate::ConditionCheck { predicates: deliberation.conditions.clone() }, Gate::HumanApproval { channel, deadline }])
        }
        VoteDecision::Pause => Ok(vec![Gate::Pause { condition: "manual-resume".to_string() }]),
        VoteDecision::Reject | VoteDecision::Defer => {
            Err(GovernanceError::InvalidArgument("Reject/Defer decisions never reach gate construction".to_string()))
        }
    }
}

fn no_threshold_result(at: Timestamp) -> Result<CircuitResult, GovernanceError> {
    let entry = audit::first("no_threshold", ACTOR, json!({}), at)?;
    let enforcement = EnforcementResult::with_hash(String::new(), true, false, Vec::new(), vec![entry])?;
    Ok(CircuitResult { event: None, prediction: None, deliberation: None, enforcement: Some(enforcement), duration_ms: 0, cancelled: false })
}

fn short_circuited(
    event: ThresholdEvent,
    prediction: Prediction,
    deliberation: DeliberationResult,
    action: &str,
    at: Timestamp,
) -> Result<CircuitResult, GovernanceError> {
    let start = audit::first(
        "enforcement_start",
        ACTOR,
        json!({ "decision_hash": deliberation.audit_hash, "gate_count": 0 }),
        at,
    )?;
    let blocked = audit::append(&start, action, ACTOR, json!({ "decision_hash": deliberation.audit_hash }), at)?;
    let enforcement = EnforcementResult::with_hash(
        deliberation.audit_hash.clone(),
        false,
        false,
        Vec::new(),
        vec![start, blocked],
    )?;
    Ok(CircuitResult {
        event: Some(event),
        prediction: Some(prediction),
        deliberation: Some(deliberation),
        enforcement: Some(enforcement),
        duration_ms: duration_ms(at, at),
        cancelled: false,
    })
}

fn assemble(
    event: ThresholdEvent,
    prediction: Prediction,
    deliberation: DeliberationResult,
    enforcement: EnforcementResult,
    start: Timestamp,
    at: Timestamp,
) -> CircuitResult {
    CircuitResult {
        event: Some(event),
        prediction: Some(prediction),
        deliberation: Some(deliberation),
        enforcement: Some(enforcement),
        duration_ms: duration_ms(start, at),
        cancelled: false,
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, reason = "Wall durations fit comfortably in u64 milliseconds.")]
fn duration_ms(start: Timestamp, at: Timestamp) -> u64 {
    let nanos = (at.as_offset_date_time() - start.as_offset_date_time()).whole_milliseconds();
    if nanos <= 0 { 0 } else { nanos as u64 }
}
