// gov-circuit-core/src/lib.rs
// ============================================================================
// Module: Governance Circuit Core Library
// Description: Public API surface for the governance circuit.
// Purpose: Expose core types, interfaces, the event bus, and the runtime.
// Dependencies: crate::{core, interfaces, bus, runtime}
// ============================================================================

//! ## Overview
//! Governance circuit core gates a proposed, state-mutating action through
//! four sequential stages — Detection, Simulation, Deliberation, and
//! Intervention — each producing a hash-chained, auditable artifact. It is
//! backend-agnostic: the proposer agent, filesystem scanning, human
//! approval surfaces, and configuration loading are external collaborators
//! this crate integrates through explicit interfaces rather than owning.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod bus;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use bus::DispatchFailure;
pub use bus::Event;
pub use bus::EventBus;
pub use bus::SubscriberError;
pub use bus::SubscriptionId;
pub use interfaces::ApprovalChannel;
pub use interfaces::ApprovalChannelError;
pub use interfaces::ApprovalOutcome;
pub use interfaces::ApprovalRequest;
pub use interfaces::MetricSource;
pub use interfaces::MetricSourceError;
pub use interfaces::PredicateError;
pub use interfaces::PredicateRegistry;
pub use interfaces::PriorObservation;
pub use interfaces::VoteProvider;
pub use interfaces::VoteProviderError;
pub use runtime::Circuit;
pub use runtime::CircuitConfig;
pub use runtime::CircuitOutcome;
pub use runtime::ConditionalApproval;
pub use runtime::CircuitRun;
pub use runtime::DeliberationTemplate;
pub use runtime::Deliberator;
pub use runtime::Detector;
pub use runtime::DetectionCandidate;
pub use runtime::Gate;
pub use runtime::GateWalk;
pub use runtime::SelfMonitor;
pub use runtime::Simulator;
pub use runtime::TemplateDimension;
pub use runtime::TemplateError;
pub use runtime::self_monitor_metrics;
