// gov-circuit-core/src/runtime/self_monitor.rs
// ============================================================================
// Module: Self-Monitor
// Description: Detector wrapper over the circuit's own health metrics.
// Purpose: Name the metrics the circuit watches about itself.
// Dependencies: crate::{core, interfaces, runtime::detector}
// ============================================================================

//! ## Overview
//! [`SelfMonitor`] is a thin wrapper around [`Detector`] constructed with a
//! host-supplied [`MetricSource`]; it does not scan the filesystem or read
//! its own source tree. It only fixes the names this workspace expects a
//! self-monitoring `MetricSource` to answer for.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::GovernanceError;
use crate::core::MetricKind;
use crate::core::TargetId;
use crate::core::ThresholdEvent;
use crate::core::Timestamp;
use crate::interfaces::MetricSource;
use crate::interfaces::PriorObservation;
use crate::runtime::detector::Detector;

/// Metric names a self-monitoring [`MetricSource`] is expected to answer
/// for, in no particular priority order.
pub const SELF_MONITOR_METRICS: [&str; 6] = [
    "lines_per_module",
    "untested_function_ratio",
    "doc_impl_drift",
    "dependency_additions",
    "self_modification_rate",
    "gate_bypass_attempts",
];

/// Returns [`SELF_MONITOR_METRICS`] as owned strings, for hosts assembling
/// a configuration document.
#[must_use]
pub fn self_monitor_metrics() -> Vec<String> {
    SELF_MONITOR_METRICS.iter().map(|name| (*name).to_string()).collect()
}

/// Watches the circuit's own implementation for drift, using the same
/// [`Detector`] the circuit uses for externally observed targets.
pub struct SelfMonitor<'a> {
    detector: Detector<'a>,
}

impl<'a> SelfMonitor<'a> {
    /// Builds a self-monitor over `source`.
    #[must_use]
    pub const fn new(source: &'a dyn MetricSource) -> Self {
        Self { detector: Detector::new(source) }
    }

    /// Evaluates `metric` against `threshold` for the circuit's own
    /// codebase, identified by `target` (e.g. a module path or crate name).
    ///
    /// # Errors
    ///
    /// Propagates [`Detector::evaluate`]'s errors unchanged.
    pub fn evaluate(
        &self,
        metric: MetricKind,
        target: TargetId,
        threshold: f64,
        prior: Option<&PriorObservation>,
        at: Timestamp,
    ) -> Result<Option<ThresholdEvent>, GovernanceError> {
        self.detector.evaluate(metric, target, threshold, prior, std::collections::BTreeMap::new(), at)
    }
}
