// gov-circuit-core/src/interfaces/mod.rs
// ============================================================================
// Module: Circuit Interfaces
// Description: Backend-agnostic contracts for metrics, votes, and approvals.
// Purpose: Define the seams the runtime calls through without embedding a
//          concrete metric source, vote source, or approval transport.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The circuit never scans a filesystem, never renders an approval UI, and
//! never owns a predicate's implementation. It calls through three traits —
//! [`MetricSource`], [`VoteProvider`], [`ApprovalChannel`] — plus a
//! [`PredicateRegistry`] for `ConditionCheck` gates. Implementations must be
//! deterministic for a fixed input and fail closed on missing or invalid
//! data; they consume inputs the host's own collaborators produced, which
//! this crate treats as untrusted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::ApproverId;
use crate::core::MetricKind;
use crate::core::Prediction;
use crate::core::ResumeToken;
use crate::core::StakeholderId;
use crate::core::StakeholderType;
use crate::core::StakeholderVote;
use crate::core::Suspend;
use crate::core::TargetId;
use crate::core::ThresholdEvent;
use crate::core::Timestamp;

// ============================================================================
// SECTION: Metric Source
// ============================================================================

/// A single prior measurement of a metric, supplied by the host so the
/// Detector can compute growth-rate momentum without reading persisted
/// state itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorObservation {
    /// The previously measured value.
    pub value: f64,
    /// When that value was measured.
    pub timestamp: Timestamp,
}

/// Errors raised while measuring a metric.
#[derive(Debug, Error)]
pub enum MetricSourceError {
    /// The source could not produce a value for this metric/target pair.
    #[error("metric source error: {0}")]
    Unavailable(String),
}

/// Abstracted source of metric measurements; filesystem scanning utilities
/// feeding Detection are an external collaborator, not owned here.
pub trait MetricSource {
    /// Measures `metric` for `target` as of `at`, given an optional prior
    /// observation for growth-rate-style metrics.
    ///
    /// # Errors
    ///
    /// Returns [`MetricSourceError`] when the metric cannot be measured.
    fn measure(
        &self,
        metric: &MetricKind,
        target: &TargetId,
        prior: Option<&PriorObservation>,
        at: Timestamp,
    ) -> Result<f64, MetricSourceError>;
}

// ============================================================================
// SECTION: Vote Provider
// ============================================================================

/// Errors raised while eliciting a vote.
#[derive(Debug, Error)]
pub enum VoteProviderError {
    /// The provider did not respond within its configured deadline; the
    /// Deliberator records this as an abstention rather than a failure.
    #[error("vote provider timed out")]
    Timeout,
    /// The provider reported an internal error.
    #[error("vote provider error: {0}")]
    Provider(String),
}

/// A source of one stakeholder's vote: a built-in automated evaluator, or an
/// externally registered human vote source.
pub trait VoteProvider {
    /// Identifier of the stakeholder this provider casts votes for.
    fn stakeholder_id(&self) -> StakeholderId;

    /// Category of the stakeholder this provider casts votes for.
    fn stakeholder_type(&self) -> StakeholderType;

    /// Casts a vote given the triggering event and its prediction.
    ///
    /// # Errors
    ///
    /// Returns [`VoteProviderError`] when the provider fails or times out.
    fn cast_vote(
        &self,
        event: &ThresholdEvent,
        prediction: &Prediction,
        at: Timestamp,
    ) -> Result<StakeholderVote, VoteProviderError>;
}

// ============================================================================
// SECTION: Approval Channel
// ============================================================================

/// A request for approval addressed to a `HumanApproval` or `MultiApprove`
/// gate's channel(s).
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalRequest {
    /// Stable label of the gate issuing this request.
    pub gate_label: String,
    /// Hash of the deliberation decision being enforced.
    pub decision_hash: String,
    /// Population eligible to respond (empty for a single-approver
    /// `HumanApproval`; the configured approver set for `MultiApprove`).
    pub population: Vec<ApproverId>,
    /// Deadline after which the gate resolves to `Timeout`.
    pub deadline: Timestamp,
}

/// A single approver's response to an [`ApprovalRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalOutcome {
    /// `approver` approved the request.
    Approved {
        /// Identifier of the responding approver.
        approver: ApproverId,
    },
    /// `approver` rejected the request.
    Rejected {
        /// Identifier of the responding approver, when known.
        approver: Option<ApproverId>,
    },
}

/// Errors raised by an approval channel transport.
#[derive(Debug, Error)]
pub enum ApprovalChannelError {
    /// The channel reported a transport-level error.
    #[error("approval channel error: {0}")]
    Channel(String),
}

/// Abstract transport for human approval; human interaction surfaces are
/// modeled as an abstract channel, never implemented here.
///
/// A channel must never auto-approve; the Intervenor treats an
/// `ApprovalChannel` that resolves without an external signal as a policy
/// violation.
pub trait ApprovalChannel {
    /// Polls for the next response to `request`. `resume` is the token
    /// returned by a prior `Suspend::Pending`, or `None` on the first poll.
    ///
    /// # Errors
    ///
    /// Returns [`ApprovalChannelError`] on a transport failure.
    fn poll(
        &mut self,
        request: &ApprovalRequest,
        resume: Option<&ResumeToken>,
    ) -> Result<Suspend<ApprovalOutcome>, ApprovalChannelError>;
}

// ============================================================================
// SECTION: Predicate Registry
// ============================================================================

/// Errors raised while evaluating a named predicate.
#[derive(Debug, Error)]
pub enum PredicateError {
    /// No predicate is registered under this name.
    #[error("no predicate registered for {0:?}")]
    Unknown(String),
    /// The predicate's evaluation failed.
    #[error("predicate evaluation error: {0}")]
    Evaluation(String),
}

/// Registry of named boolean predicates evaluated by `ConditionCheck` gates.
pub trait PredicateRegistry {
    /// Evaluates the predicate registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`PredicateError::Unknown`] when `name` is not registered, or
    /// [`PredicateError::Evaluation`] when evaluation itself fails.
    fn evaluate(&self, name: &str) -> Result<bool, PredicateError>;
}
