// gov-circuit-providers/src/registry.rs
// ============================================================================
// Module: Vote Provider Registry
// Description: Ordered collection of VoteProvider trait objects.
// Purpose: Let a host assemble the built-in evaluators plus its own
//          externally registered providers into the slice the Deliberator
//          expects.
// Dependencies: gov-circuit-core
// ============================================================================

//! ## Overview
//! A [`VoteProviderRegistry`] owns a set of boxed [`VoteProvider`]s and
//! hands the Deliberator the `&[&dyn VoteProvider]` slice it needs. It does
//! not itself decide stakeholder weighting or aggregation; that remains the
//! Deliberator's responsibility.

// ============================================================================
// SECTION: Imports
// ============================================================================

use gov_circuit_core::VoteProvider;

use crate::evaluators::DomainEvaluator;
use crate::evaluators::EthicalEvaluator;
use crate::evaluators::PhysiologicalEvaluator;
use crate::evaluators::TechnicalEvaluator;

// ============================================================================
// SECTION: Vote Provider Registry
// ============================================================================

/// Ordered collection of automated and externally registered
/// [`VoteProvider`]s.
#[derive(Default)]
pub struct VoteProviderRegistry {
    providers: Vec<Box<dyn VoteProvider>>,
}

impl VoteProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { providers: Vec::new() }
    }

    /// Creates a registry with the technical, ethical, and domain
    /// evaluators registered under their default stakeholder ids. The
    /// physiological veto is opt-in; call
    /// [`VoteProviderRegistry::register_physiological_veto`] to add it.
    #[must_use]
    pub fn with_builtin_evaluators() -> Self {
        let mut registry = Self::new();
        registry.register(TechnicalEvaluator::default());
        registry.register(EthicalEvaluator::default());
        registry.register(DomainEvaluator::default());
        registry
    }

    /// Registers a provider, automated or externally supplied.
    pub fn register(&mut self, provider: impl VoteProvider + 'static) {
        self.providers.push(Box::new(provider));
    }

    /// Registers the physiological veto under its default stakeholder id.
    pub fn register_physiological_veto(&mut self) {
        self.register(PhysiologicalEvaluator::default());
    }

    /// Returns the registered providers as the slice a Deliberator expects.
    #[must_use]
    pub fn providers(&self) -> Vec<&dyn VoteProvider> {
        self.providers.iter().map(Box::as_ref).collect()
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true when no providers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
