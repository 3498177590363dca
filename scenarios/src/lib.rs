// scenarios/src/lib.rs
// ============================================================================
// Module: Governance Circuit Scenarios
// Description: Placeholder library crate; the literal end-to-end scenarios
//              live under tests/ as integration tests.
// Purpose: Give the scenarios crate a lib target so `tests/` can depend on
//          it as dev-dependencies depend on a normal crate.
// Dependencies: (none)
// ============================================================================

//! ## Overview
//! This crate carries no runtime code. It exists to host the literal
//! end-to-end scenarios in `tests/end_to_end_scenarios.rs`, each driving a
//! [`gov_circuit_core::Circuit`] through one deliberation-decision branch
//! with in-memory fixtures for every external collaborator.
