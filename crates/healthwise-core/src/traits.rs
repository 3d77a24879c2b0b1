//! Core trait definitions.
//!
//! - `UrgencyAssessor`  — classifies vitals into an urgency assessment
//! - `TextGenerator`    — the external text-generation service (untrusted)
//! - `ResponseVerifier` — checks a generated payload against its contract
//!
//! `StructuredFlow` wires the last two together. Nothing a `TextGenerator`
//! returns reaches a caller until a `ResponseVerifier` has accepted it.

use healthwise_contracts::{
    assessment::UrgencyAssessment,
    contract::{ConformanceReport, ResponseContract},
    error::HealthwiseResult,
    generation::GenerationRequest,
    vitals::VitalSigns,
};

/// Anything that can turn vitals into an urgency assessment.
///
/// Implemented by the rule-based triage engine and by the generative urgency
/// flow. Identical input must always yield identical output for rule-based
/// implementations.
pub trait UrgencyAssessor: Send + Sync {
    /// Assess `vitals`.
    ///
    /// The returned `next_steps` always ends with the disclaimer.
    fn assess(&self, vitals: &VitalSigns) -> HealthwiseResult<UrgencyAssessment>;
}

/// A hosted language model, seen as an opaque prompt-in, text-out service.
///
/// Implementations should return the raw reply text. They must not retry;
/// retry policy belongs to the caller of the flow.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, request: &GenerationRequest) -> HealthwiseResult<String>;
}

/// Checks a generated JSON payload against a declarative `ResponseContract`.
pub trait ResponseVerifier: Send + Sync {
    /// Return a report with `passed = true` if every rule holds, otherwise
    /// `passed = false` and the full list of violations.
    fn verify(
        &self,
        payload: &serde_json::Value,
        contract: &ResponseContract,
    ) -> HealthwiseResult<ConformanceReport>;
}
