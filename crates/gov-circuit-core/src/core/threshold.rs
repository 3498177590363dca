// gov-circuit-core/src/core/threshold.rs
// ============================================================================
// Module: Threshold Events
// Description: Detected threshold crossings and their severity classification.
// Purpose: Canonical representation of a Detector finding.
// Dependencies: crate::core::{hashing, identifiers, time}, serde
// ============================================================================

//! ## Overview
//! A [`ThresholdEvent`] is produced once a measured metric crosses a
//! configured limit. Severity is a pure function of `value / threshold`
//!; `event_hash` is a 16-hex prefix of the SHA-256 digest over
//! the canonical JSON of every other field, so identical field contents
//! always hash identically.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::core::hashing::HashError;
use crate::core::hashing::SHORT_HASH_LEN;
use crate::core::hashing::hash_prefix;
use crate::core::identifiers::TargetId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Metric Kind
// ============================================================================

/// Metric names recognized by the detector.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    /// Count of files under an observed subject.
    FileCount,
    /// Maximum directory nesting depth.
    DirectoryDepth,
    /// Shannon entropy of filenames under the observed subject.
    FilenameEntropy,
    /// Degree to which the subject references itself.
    SelfReference,
    /// Rate of growth of the observed subject over time.
    GrowthRate,
    /// Recurrence of a previously flagged reflex pattern.
    ReflexPattern,
    /// Host-registered metric name outside the built-in set.
    Custom(String),
}

// ============================================================================
// SECTION: Severity
// ============================================================================

/// Severity classification of a threshold crossing.
///
/// # Invariants
/// - Computed solely from `value / threshold`; see [`Severity::classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// `value` in `[0.64 * threshold, 0.80 * threshold)`.
    Info,
    /// `value` in `[0.80 * threshold, 1.00 * threshold)`.
    Warning,
    /// `value` in `[1.00 * threshold, 1.50 * threshold)`.
    Critical,
    /// `value >= 1.50 * threshold`.
    Emergency,
}

impl Severity {
    /// Classifies a measured value against a threshold.
    ///
    /// Boundaries are inclusive on the lower edge: a value
    /// exactly at `0.80 * threshold` is `Warning`, exactly at `1.00 *
    /// threshold` is `Critical`, and exactly at `1.50 * threshold` is
    /// `Emergency`. Values below `0.64 * threshold` do not classify (the
    /// detector does not emit an event for them at all).
    #[must_use]
    pub fn classify(value: f64, threshold: f64) -> Option<Self> {
        if threshold <= 0.0 {
            return None;
        }
        let ratio = value / threshold;
        if ratio >= 1.50 {
            Some(Self::Emergency)
        } else if ratio >= 1.00 {
            Some(Self::Critical)
        } else if ratio >= 0.80 {
            Some(Self::Warning)
        } else if ratio >= 0.64 {
            Some(Self::Info)
        } else {
            None
        }
    }

    /// Returns true when this severity meets or exceeds `Warning`.
    #[must_use]
    pub const fn at_least_warning(self) -> bool {
        matches!(self, Self::Warning | Self::Critical | Self::Emergency)
    }
}

// ============================================================================
// SECTION: Threshold Event
// ============================================================================

/// A detected threshold crossing.
///
/// # Invariants
/// - `event_hash` is a 16-hex prefix of SHA-256 over the canonical JSON of
///   every other field; see [`ThresholdEvent::with_hash`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdEvent {
    /// Metric that crossed its threshold.
    pub metric: MetricKind,
    /// Measured numeric value.
    pub value: f64,
    /// Configured limit the value was compared against.
    pub threshold: f64,
    /// Severity classification of the crossing.
    pub severity: Severity,
    /// UTC timestamp the crossing was observed at.
    pub timestamp: Timestamp,
    /// Opaque identifier of the observed subject.
    pub target: TargetId,
    /// Free-form key/value metadata.
    #[serde(default)]
    pub details: BTreeMap<String, Value>,
    /// Sixteen-hex-char SHA-256 prefix over the fields above.
    pub event_hash: String,
}

/// Fields hashed to produce [`ThresholdEvent::event_hash`].
#[derive(Serialize)]
struct HashedFields<'a> {
    metric: &'a MetricKind,
    value: f64,
    threshold: f64,
    severity: Severity,
    timestamp: Timestamp,
    target: &'a TargetId,
    details: &'a BTreeMap<String, Value>,
}

impl ThresholdEvent {
    /// Builds a [`ThresholdEvent`], computing `event_hash` from the other
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when canonicalization fails.
    pub fn with_hash(
        metric: MetricKind,
        value: f64,
        threshold: f64,
        severity: Severity,
        timestamp: Timestamp,
        target: TargetId,
        details: BTreeMap<String, Value>,
    ) -> Result<Self, HashError> {
        let hashed = HashedFields {
            metric: &metric,
            value,
            threshold,
            severity,
            timestamp,
            target: &target,
            details: &details,
        };
        let event_hash = hash_prefix(&hashed, SHORT_HASH_LEN)?;
        Ok(Self {
            metric,
            value,
            threshold,
            severity,
            timestamp,
            target,
            details,
            event_hash,
        })
    }

    /// Recomputes `event_hash` from the event's other fields.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when canonicalization fails.
    pub fn recompute_hash(&self) -> Result<String, HashError> {
        let hashed = HashedFields {
            metric: &self.metric,
            value: self.value,
            threshold: self.threshold,
            severity: self.severity,
            timestamp: self.timestamp,
            target: &self.target,
            details: &self.details,
        };
        hash_prefix(&hashed, SHORT_HASH_LEN)
    }

    /// Returns true when `recompute_hash` matches the stored `event_hash`.
    ///
    /// # Errors
    ///
    /// Returns [`HashError`] when canonicalization fails.
    pub fn verify_hash(&self) -> Result<bool, HashError> {
        Ok(self.recompute_hash()? == self.event_hash)
    }
}
