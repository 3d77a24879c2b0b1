//! The structured-generation runner.
//!
//! Every generative flow follows the same pipeline:
//!
//!   Input → Render prompt → [TextGenerator::generate] → Parse JSON → Verify → Deserialize
//!
//! A reply is never handed to the caller unless it parses and conforms to
//! the flow's `ResponseContract`. Any failure after the generator call is a
//! `GenerationFailure`; nothing is retried and nothing is defaulted.

use std::marker::PhantomData;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use healthwise_contracts::{
    contract::ResponseContract,
    error::{HealthwiseError, HealthwiseResult},
    generation::{GenerationRequest, RequestId},
};

use crate::{
    prompt::PromptTemplate,
    traits::{ResponseVerifier, TextGenerator},
};

/// One generative flow: a name, a fixed prompt, and the contract its replies
/// must satisfy. `T` is the typed reply.
///
/// Build one per flow at startup and reuse it; running a flow never mutates it.
pub struct StructuredFlow<T> {
    name: String,
    template: PromptTemplate,
    contract: ResponseContract,
    _reply: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> StructuredFlow<T> {
    pub fn new(name: impl Into<String>, template: PromptTemplate, contract: ResponseContract) -> Self {
        Self {
            name: name.into(),
            template,
            contract,
            _reply: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn contract(&self) -> &ResponseContract {
        &self.contract
    }

    /// Render the prompt that `run` would send for `input`.
    pub fn render_prompt<I: Serialize>(&self, input: &I) -> HealthwiseResult<String> {
        self.template.render(input)
    }

    /// Run the flow once.
    ///
    /// # Pipeline
    ///
    /// 1. Render the prompt from `input` (`ConfigError` on a template mismatch)
    /// 2. Call `generator.generate()`; its errors propagate unchanged
    /// 3. Parse, verify and deserialize the reply via `accept_reply`
    pub fn run<I: Serialize>(
        &self,
        input: &I,
        generator: &dyn TextGenerator,
        verifier: &dyn ResponseVerifier,
    ) -> HealthwiseResult<T> {
        let prompt = self.render_prompt(input)?;
        let request = GenerationRequest {
            request_id: RequestId::new(),
            flow: self.name.clone(),
            prompt,
            contract_id: self.contract.contract_id.clone(),
            response_schema: self.contract.json_schema.clone(),
        };

        debug!(
            request_id = %request.request_id,
            flow = %self.name,
            prompt_len = request.prompt.len(),
            "sending prompt to generator"
        );
        let reply = generator.generate(&request)?;

        self.accept_reply(&request.request_id, &reply, verifier)
    }

    /// Parse `reply` as JSON, verify it against the contract and deserialize it.
    ///
    /// A reply wrapped in a markdown code fence is unwrapped first.
    pub fn accept_reply(
        &self,
        request_id: &RequestId,
        reply: &str,
        verifier: &dyn ResponseVerifier,
    ) -> HealthwiseResult<T> {
        let body = strip_code_fence(reply);
        if body.is_empty() {
            warn!(request_id = %request_id, flow = %self.name, "generator returned no output");
            return Err(HealthwiseError::generation(format!(
                "{} did not return any output",
                self.name
            )));
        }

        let payload: serde_json::Value = serde_json::from_str(body).map_err(|e| {
            warn!(request_id = %request_id, flow = %self.name, error = %e, "reply is not JSON");
            HealthwiseError::generation(format!("{} returned a reply that is not JSON: {e}", self.name))
        })?;

        let report = verifier.verify(&payload, &self.contract)?;
        if !report.passed {
            let summary = report.summary();
            warn!(
                request_id = %request_id,
                flow = %self.name,
                contract_id = %self.contract.contract_id,
                violations = %summary,
                "reply violates response contract"
            );
            return Err(HealthwiseError::generation(format!(
                "{} returned an invalid response: {summary}",
                self.name
            )));
        }

        let typed = serde_json::from_value(payload).map_err(|e| {
            HealthwiseError::generation(format!(
                "{} returned a response that does not fit its output type: {e}",
                self.name
            ))
        })?;

        info!(
            request_id = %request_id,
            flow = %self.name,
            contract_id = %self.contract.contract_id,
            "reply accepted"
        );
        Ok(typed)
    }
}

/// Remove a surrounding ```` ``` ```` or ```` ```json ```` fence, if any.
fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_suffix("```").unwrap_or(inner);
    // Drop the info string ("json") on the opening line.
    match inner.find('\n') {
        Some(newline) if !inner[..newline].trim_start().starts_with('{') => inner[newline + 1..].trim(),
        _ => inner.trim(),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
