// gov-circuit-config/src/config.rs
// ============================================================================
// Module: Threshold & Template Configuration
// Description: Parses and validates threshold and deliberation-template
//              documents from in-memory YAML.
// Purpose: Fail-closed config loading: an unrecognized metric name or an
//          out-of-tolerance weight sum is a load-time error, not a runtime
//          surprise.
// Dependencies: gov-circuit-core, serde_yaml, thiserror
// ============================================================================

//! ## Overview
//! [`ThresholdConfig::from_yaml`] and [`parse_template`] each take an
//! in-memory document and either a validated value or a [`ConfigError`].
//! Neither reads a file, a socket, or an environment variable; the host
//! decides where the document text comes from.

// ============================================================================
// SECTION: Imports
// ============================================================================

use gov_circuit_core::DeliberationTemplate;
use gov_circuit_core::MetricKind;
use gov_circuit_core::TemplateError;
use thiserror::Error;

use crate::schema::RawThresholdDocument;

// ============================================================================
// SECTION: Config Error
// ============================================================================

/// Reasons loading a threshold or template document fails.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document is not well-formed YAML, or its shape doesn't match
    /// what's expected.
    #[error("failed to parse config document: {0}")]
    Malformed(String),
    /// A metric entry's `name` is neither one of the six built-in names nor
    /// in the caller-supplied custom-metric set.
    #[error("unrecognized metric name {0:?}")]
    UnknownMetric(String),
    /// The parsed deliberation template failed its own invariants.
    #[error("deliberation template is invalid: {0}")]
    Template(#[from] TemplateError),
}

// ============================================================================
// SECTION: Metric Threshold
// ============================================================================

/// One metric's configured threshold, resolved to a concrete
/// [`MetricKind`].
#[derive(Debug, Clone, PartialEq)]
pub struct MetricThreshold {
    /// Which metric this threshold applies to.
    pub metric: MetricKind,
    /// Configured limit.
    pub threshold: f64,
    /// Whether the detector should evaluate this metric.
    pub enabled: bool,
}

// ============================================================================
// SECTION: Threshold Config
// ============================================================================

/// A validated threshold configuration: one [`MetricThreshold`] per entry
/// in the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdConfig {
    /// Configured metric thresholds, in document order.
    pub metrics: Vec<MetricThreshold>,
}

impl ThresholdConfig {
    /// Parses and validates a threshold configuration document.
    ///
    /// `known_custom_metrics` names any host-registered metrics beyond the
    /// six built in to [`MetricKind`]; an entry whose name matches neither
    /// set is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Malformed`] when the document isn't
    /// well-formed YAML of the expected shape, or
    /// [`ConfigError::UnknownMetric`] when an entry's name isn't
    /// recognized.
    pub fn from_yaml(document: &str, known_custom_metrics: &[&str]) -> Result<Self, ConfigError> {
        let raw: RawThresholdDocument =
            serde_yaml::from_str(document).map_err(|err| ConfigError::Malformed(err.to_string()))?;
        let metrics = raw
            .metrics
            .into_iter()
            .map(|entry| {
                let metric = resolve_metric_kind(&entry.name, known_custom_metrics)?;
                Ok(MetricThreshold { metric, threshold: entry.threshold, enabled: entry.enabled })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self { metrics })
    }
}

/// Resolves a document-supplied metric name to a [`MetricKind`], or fails
/// when it matches neither the built-in names nor `known_custom_metrics`.
fn resolve_metric_kind(name: &str, known_custom_metrics: &[&str]) -> Result<MetricKind, ConfigError> {
    match name {
        "file_count" => Ok(MetricKind::FileCount),
        "directory_depth" => Ok(MetricKind::DirectoryDepth),
        "filename_entropy" => Ok(MetricKind::FilenameEntropy),
        "self_reference" => Ok(MetricKind::SelfReference),
        "growth_rate" => Ok(MetricKind::GrowthRate),
        "reflex_pattern" => Ok(MetricKind::ReflexPattern),
        other if known_custom_metrics.contains(&other) => Ok(MetricKind::Custom(other.to_string())),
        other => Err(ConfigError::UnknownMetric(other.to_string())),
    }
}

// ============================================================================
// SECTION: Deliberation Template
// ============================================================================

/// Parses and validates a deliberation template document.
///
/// [`DeliberationTemplate`] already derives [`serde::Deserialize`] in the
/// document's exact shape, so this only adds YAML parsing and the
/// weight-sum/non-empty invariant check.
///
/// # Errors
///
/// Returns [`ConfigError::Malformed`] when the document isn't well-formed
/// YAML of the expected shape, or [`ConfigError::Template`] when the
/// parsed template fails its own invariants.
pub fn parse_template(document: &str) -> Result<DeliberationTemplate, ConfigError> {
    let template: DeliberationTemplate =
        serde_yaml::from_str(document).map_err(|err| ConfigError::Malformed(err.to_string()))?;
    template.validate()?;
    Ok(template)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only panics are permitted.")]

    use gov_circuit_core::MetricKind;

    use super::ConfigError;
    use super::ThresholdConfig;
    use super::parse_template;

    const METRICS_DOCUMENT: &str = "
metrics:
  - name: file_count
    threshold: 100
    enabled: true
  - name: filename_entropy
    threshold: 0.85
";

    #[test]
    fn recognized_metric_names_parse() {
        let config = ThresholdConfig::from_yaml(METRICS_DOCUMENT, &[]).unwrap();
        assert_eq!(config.metrics.len(), 2);
        assert_eq!(config.metrics[0].metric, MetricKind::FileCount);
        assert_eq!(config.metrics[1].metric, MetricKind::FilenameEntropy);
        assert!(config.metrics[1].enabled, "enabled defaults to true when omitted");
    }

    #[test]
    fn unknown_metric_name_is_rejected() {
        let document = "
metrics:
  - name: cosmic_ray_flux
    threshold: 1.0
";
        let err = ThresholdConfig::from_yaml(document, &[]).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownMetric(name) if name == "cosmic_ray_flux"));
    }

    #[test]
    fn host_registered_custom_metric_is_accepted() {
        let document = "
metrics:
  - name: cosmic_ray_flux
    threshold: 1.0
";
        let config = ThresholdConfig::from_yaml(document, &["cosmic_ray_flux"]).unwrap();
        assert_eq!(config.metrics[0].metric, MetricKind::Custom("cosmic_ray_flux".to_string()));
    }

    #[test]
    fn malformed_document_is_rejected() {
        assert!(matches!(ThresholdConfig::from_yaml("not: [valid", &[]), Err(ConfigError::Malformed(_))));
    }

    const TEMPLATE_DOCUMENT: &str = "
name: btb_dimensions
dimensions:
  - name: reversibility
    question: \"How reversible is the proposed action?\"
    weight: 0.5
  - name: auditability
    question: \"Does the action leave a verifiable trail?\"
    weight: 0.5
";

    #[test]
    fn well_formed_template_parses_and_validates() {
        let template = parse_template(TEMPLATE_DOCUMENT).unwrap();
        assert_eq!(template.name, "btb_dimensions");
        assert_eq!(template.dimensions.len(), 2);
    }

    #[test]
    fn template_with_bad_weight_sum_is_rejected() {
        let document = "
name: broken
dimensions:
  - name: only
    question: \"?\"
    weight: 0.4
";
        assert!(matches!(parse_template(document), Err(ConfigError::Template(_))));
    }
}
