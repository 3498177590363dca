// gov-circuit-core/src/runtime/templates.rs
// ============================================================================
// Module: Deliberation Templates
// Description: Named, weighted evaluation dimensions for a deliberation.
// Purpose: Built-in templates plus the weight-sum invariant.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`DeliberationTemplate`] names a set of weighted [`TemplateDimension`]s
//! that automated [`crate::interfaces::VoteProvider`] evaluators weigh when
//! forming their rationale. The Deliberator's aggregation rules do not
//! consume templates directly; a template shapes how an individual provider
//! scores a decision, not how provider votes are combined.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Acceptable drift from a weight sum of `1.0`.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

// ============================================================================
// SECTION: Template Dimension
// ============================================================================

/// One weighted axis of evaluation within a [`DeliberationTemplate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDimension {
    /// Short identifier, e.g. `"reversibility"`.
    pub name: String,
    /// Relative weight within the template's dimension set.
    pub weight: f64,
    /// The question a vote provider answers for this dimension.
    pub question: String,
}

impl TemplateDimension {
    /// Builds a dimension.
    #[must_use]
    pub fn new(name: impl Into<String>, weight: f64, question: impl Into<String>) -> Self {
        Self { name: name.into(), weight, question: question.into() }
    }
}

// ============================================================================
// SECTION: Deliberation Template
// ============================================================================

/// A named set of weighted dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliberationTemplate {
    /// Template name, e.g. `"btb_dimensions"`.
    pub name: String,
    /// The weighted dimensions, summing to `1.0` within tolerance.
    pub dimensions: Vec<TemplateDimension>,
}

/// Reasons a [`DeliberationTemplate`] fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TemplateError {
    /// `dimensions` was empty.
    #[error("template has no dimensions")]
    NoDimensions,
    /// The dimension weights did not sum to `1.0` within tolerance.
    #[error("dimension weights sum to {0}, expected 1.0")]
    WeightSum(f64),
}

impl DeliberationTemplate {
    /// Validates the non-empty and weight-sum invariants.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError`] when either invariant is violated.
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.dimensions.is_empty() {
            return Err(TemplateError::NoDimensions);
        }
        let sum: f64 = self.dimensions.iter().map(|d| d.weight).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(TemplateError::WeightSum(sum));
        }
        Ok(())
    }

    /// The five-dimension built-in template.
    #[must_use]
    pub fn btb_dimensions() -> Self {
        Self {
            name: "btb_dimensions".to_string(),
            dimensions: vec![
                TemplateDimension::new("legibility", 0.2, "Can a reviewer understand what this action does and why?"),
                TemplateDimension::new("reversibility", 0.2, "How costly is it to undo this action once applied?"),
                TemplateDimension::new("auditability", 0.2, "Does the action leave a verifiable trail of what changed?"),
                TemplateDimension::new("governance", 0.2, "Does the action respect the gates configured for its scope?"),
                TemplateDimension::new(
                    "paradigm-safety",
                    0.2,
                    "Does the action preserve the agent's operating boundaries?",
                ),
            ],
        }
    }

    /// The four-dimension built-in template for agent self-modification
    /// proposals.
    #[must_use]
    pub fn self_modification() -> Self {
        Self {
            name: "self_modification".to_string(),
            dimensions: vec![
                TemplateDimension::new("scope-limitation", 0.25, "Is the change bounded to the stated target?"),
                TemplateDimension::new("human-veto", 0.25, "Can a human operator still block this change?"),
                TemplateDimension::new("rollback-capability", 0.25, "Can this change be reverted cleanly?"),
                TemplateDimension::new("transparency", 0.25, "Is the change visible to its intended reviewers?"),
            ],
        }
    }

    /// The two-dimension built-in template for low-overhead deliberations.
    #[must_use]
    pub fn minimal() -> Self {
        Self {
            name: "minimal".to_string(),
            dimensions: vec![
                TemplateDimension::new("risk-level", 0.5, "How severe is the underlying threshold crossing?"),
                TemplateDimension::new("reversibility", 0.5, "How costly is it to undo this action once applied?"),
            ],
        }
    }
}
