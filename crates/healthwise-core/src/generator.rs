//! A `TextGenerator` that replays a fixed reply.
//!
//! Used for offline runs, where a reply captured from a hosted model is
//! checked against a flow's contract, and by tests across the workspace.
//! Every request it receives is recorded for later inspection.

use std::sync::Mutex;

use tracing::debug;

use healthwise_contracts::{
    error::{HealthwiseError, HealthwiseResult},
    generation::GenerationRequest,
};

use crate::traits::TextGenerator;

pub struct CannedGenerator {
    reply: String,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl CannedGenerator {
    /// Always answer with `reply`.
    pub fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with the JSON encoding of `reply`.
    pub fn json(reply: &serde_json::Value) -> Self {
        Self::new(reply.to_string())
    }

    /// A generator that returns no output at all.
    pub fn silent() -> Self {
        Self::new(String::new())
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests
            .lock()
            .expect("canned generator lock poisoned")
            .clone()
    }
}

impl TextGenerator for CannedGenerator {
    fn generate(&self, request: &GenerationRequest) -> HealthwiseResult<String> {
        debug!(
            request_id = %request.request_id,
            flow = %request.flow,
            "replaying canned reply"
        );
        self.requests
            .lock()
            .map_err(|e| HealthwiseError::generation(format!("generator lock poisoned: {e}")))?
            .push(request.clone());
        Ok(self.reply.clone())
    }
}
