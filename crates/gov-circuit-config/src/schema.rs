// gov-circuit-config/src/schema.rs
// ============================================================================
// Module: Threshold Document Schema
// Description: Raw, pre-validation shape of a threshold configuration
//              document.
// Purpose: Separate "what serde_yaml can deserialize" from "what
//          gov-circuit-core's MetricKind actually recognizes".
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`RawThresholdDocument`] mirrors the on-disk YAML shape verbatim; it
//! accepts any metric name. [`crate::config::ThresholdConfig::from_yaml`]
//! resolves each entry's name against the recognized set and rejects
//! anything it can't place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;

// ============================================================================
// SECTION: Raw Shapes
// ============================================================================

/// One metric entry as written in a threshold document, before its `name`
/// is resolved to a [`gov_circuit_core::MetricKind`].
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawMetricEntry {
    /// Metric name as written in the document, e.g. `"file_count"`.
    pub name: String,
    /// Configured limit the metric is compared against.
    pub threshold: f64,
    /// Whether the detector should evaluate this metric at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

const fn default_enabled() -> bool {
    true
}

/// Top-level shape of a threshold configuration document.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RawThresholdDocument {
    /// Metric entries, in document order.
    pub metrics: Vec<RawMetricEntry>,
}
