// gov-circuit-config/src/lib.rs
// ============================================================================
// Module: Governance Circuit Config Library
// Description: Threshold and deliberation-template document parsing.
// Purpose: Parse and validate in-memory config documents; never loads a
//          file, a socket, or an environment variable itself.
// Dependencies: gov-circuit-core, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! Two document kinds: threshold configuration (`metrics:` entries mapped
//! to [`gov_circuit_core::MetricKind`]) and deliberation templates
//! (weighted dimensions). Both validate at parse time; a malformed or
//! invalid document never reaches the runtime.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub(crate) mod schema;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::ConfigError;
pub use config::MetricThreshold;
pub use config::ThresholdConfig;
pub use config::parse_template;
