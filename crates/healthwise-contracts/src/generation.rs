//! Requests sent to the external text-generation service.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for one generation request.
///
/// Appears in every tracing event emitted while the request is in flight so
/// a failed reply can be correlated with the prompt that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub uuid::Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Everything a `TextGenerator` receives for one call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub request_id: RequestId,
    /// Name of the flow issuing the request (e.g. "assessUrgencyFlow").
    pub flow: String,
    /// The fully rendered prompt.
    pub prompt: String,
    /// Contract the reply will be checked against.
    pub contract_id: String,
    /// The contract's JSON Schema, for services that accept an output schema.
    pub response_schema: serde_json::Value,
}
