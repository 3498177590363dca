// gov-circuit-core/src/core/mod.rs
// ============================================================================
// Module: Core
// Description: Data model and pure functions shared by every circuit stage.
// Purpose: Aggregate the core submodules and re-export their public items.
// Dependencies: (none beyond the submodules themselves)
// ============================================================================

pub mod audit;
pub mod deliberation;
pub mod enforcement;
pub mod errors;
pub mod hashing;
pub mod identifiers;
pub mod prediction;
pub mod suspend;
pub mod threshold;
pub mod time;
pub mod vote;

mod circuit_result;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::AuditEntry;
pub use audit::GENESIS;
pub use audit::VerifyResult;
pub use circuit_result::CircuitResult;
pub use deliberation::DeliberationResult;
pub use deliberation::DissentRecord;
pub use enforcement::EnforcementResult;
pub use enforcement::GateResult;
pub use enforcement::GateStatus;
pub use errors::GovernanceError;
pub use errors::Stage;
pub use hashing::HashError;
pub use identifiers::ApproverId;
pub use identifiers::SessionId;
pub use identifiers::StakeholderId;
pub use identifiers::TargetId;
pub use prediction::ConfidenceInterval;
pub use prediction::Outcome;
pub use prediction::Prediction;
pub use prediction::Scenario;
pub use suspend::ResumeToken;
pub use suspend::Suspend;
pub use threshold::MetricKind;
pub use threshold::Severity;
pub use threshold::ThresholdEvent;
pub use time::Timestamp;
pub use vote::StakeholderType;
pub use vote::StakeholderVote;
pub use vote::VoteDecision;
pub use vote::VoteValidationError;
