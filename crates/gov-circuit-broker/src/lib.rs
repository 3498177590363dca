// gov-circuit-broker/src/lib.rs
// ============================================================================
// Module: Governance Circuit Broker
// Description: Concrete ApprovalChannel transports for the Intervention stage.
// Purpose: Ship ready-made channel, callback, and log-only transports so a
//          host need not implement ApprovalChannel from scratch.
// Dependencies: gov-circuit-core, serde_json
// ============================================================================

//! ## Overview
//! `ApprovalChannel` is deliberately abstract: the governance circuit never
//! assumes how a human approval surfaces. This crate supplies three concrete
//! transports — [`ChannelApprovalChannel`] over `std::sync::mpsc`,
//! [`CallbackApprovalChannel`] over a user closure, and
//! [`LogApprovalChannel`], which wraps any of the above to record a JSON
//! line per poll.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod callback_approval;
pub mod channel_approval;
pub mod log_approval;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use callback_approval::CallbackApprovalChannel;
pub use channel_approval::ChannelApprovalChannel;
pub use log_approval::LogApprovalChannel;
