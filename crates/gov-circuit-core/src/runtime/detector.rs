// gov-circuit-core/src/runtime/detector.rs
// ============================================================================
// Module: Detector
// Description: Measures metrics and emits ThresholdEvents.
// Purpose: Bridge a host-supplied MetricSource to classified ThresholdEvents.
// Dependencies: crate::{core, interfaces}
// ============================================================================

//! ## Overview
//! The Detector never scans a filesystem or owns a metric's measurement
//! logic; it calls through a [`MetricSource`] and classifies the result
//!. An event is emitted for every classifiable severity,
//! including `Info` — callers that only care about actionable crossings
//! filter on [`Severity::at_least_warning`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde_json::Value;

use crate::core::GovernanceError;
use crate::core::MetricKind;
use crate::core::Severity;
use crate::core::TargetId;
use crate::core::ThresholdEvent;
use crate::core::Timestamp;
use crate::interfaces::MetricSource;
use crate::interfaces::PriorObservation;

// ============================================================================
// SECTION: Detector
// ============================================================================

/// Evaluates configured metric/threshold pairs against a [`MetricSource`].
pub struct Detector<'a> {
    source: &'a dyn MetricSource,
}

impl<'a> Detector<'a> {
    /// Builds a detector over `source`.
    #[must_use]
    pub const fn new(source: &'a dyn MetricSource) -> Self {
        Self { source }
    }

    /// Measures `metric` for `target` against `threshold` and, if the
    /// measured value classifies into a [`Severity`], returns the resulting
    /// [`ThresholdEvent`].
    ///
    /// # Errors
    ///
    /// Returns [`GovernanceError::InvalidArgument`] when `threshold` is not
    /// strictly positive, propagates [`crate::interfaces::MetricSourceError`]
    /// wrapped as [`GovernanceError::InvalidArgument`] when the source
    /// cannot produce a value, and [`GovernanceError::Hashing`] when the
    /// event cannot be hashed.
    pub fn evaluate(
        &self,
        metric: MetricKind,
        target: TargetId,
        threshold: f64,
        prior: Option<&PriorObservation>,
        details: BTreeMap<String, Value>,
        at: Timestamp,
    ) -> Result<Option<ThresholdEvent>, GovernanceError> {
        if threshold <= 0.0 {
            return Err(GovernanceError::InvalidArgument(format!(
                "threshold must be positive, got {threshold}"
            )));
        }
        let value = self
            .source
            .measure(&metric, &target, prior, at)
            .map_err(|err| GovernanceError::InvalidArgument(err.to_string()))?;
        let Some(severity) = Severity::classify(value, threshold) else {
            return Ok(None);
        };
        let event = ThresholdEvent::with_hash(metric, value, threshold, severity, at, target, details)?;
        Ok(Some(event))
    }
}
