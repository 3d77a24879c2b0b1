//! Error types shared by every HealthWise crate.
//!
//! All fallible operations return `HealthwiseResult<T>`. Variants carry a
//! human-readable reason so callers can surface them directly in a retry-capable
//! error state.

use thiserror::Error;

/// The unified error type for HealthWise flows.
#[derive(Debug, Error)]
pub enum HealthwiseError {
    /// The text-generation service returned nothing usable: no output, output
    /// that is not JSON, or JSON that breaks the flow's response contract.
    ///
    /// Never converted into a default result. The caller decides whether to
    /// invoke the flow again.
    #[error("generation failed: {reason}")]
    GenerationFailure { reason: String },

    /// The caller supplied input outside the domain a flow accepts.
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A triage table, prompt template, or other configuration is missing or malformed.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },
}

impl HealthwiseError {
    pub fn generation(reason: impl Into<String>) -> Self {
        Self::GenerationFailure { reason: reason.into() }
    }

    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput { reason: reason.into() }
    }

    pub fn config(reason: impl Into<String>) -> Self {
        Self::ConfigError { reason: reason.into() }
    }
}

/// Convenience alias used throughout the HealthWise crates.
pub type HealthwiseResult<T> = Result<T, HealthwiseError>;
