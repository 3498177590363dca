// gov-circuit-providers/src/lib.rs
// ============================================================================
// Module: Governance Circuit Providers
// Description: Built-in automated VoteProvider evaluators and their registry.
// Purpose: Ship zero-config stakeholders so a host need not implement every
//          VoteProvider itself before wiring a Deliberator.
// Dependencies: gov-circuit-core
// ============================================================================

//! ## Overview
//! Four automated evaluators — technical, ethical, domain, and
//! physiological — derive a vote from a threshold event's severity and its
//! prediction's best-outcome reversibility and side-effect tags, each
//! weighing those inputs differently for its role. A human-operator vote
//! has no bundled implementation; the host wires one in through the same
//! `VoteProvider` trait.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod evaluators;
pub mod registry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use evaluators::DomainEvaluator;
pub use evaluators::EthicalEvaluator;
pub use evaluators::PhysiologicalEvaluator;
pub use evaluators::TechnicalEvaluator;
pub use registry::VoteProviderRegistry;
