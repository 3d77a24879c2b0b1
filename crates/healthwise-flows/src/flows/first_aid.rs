//! First-aid instruction generation.

use serde::{Deserialize, Serialize};
use serde_json::json;

use healthwise_contracts::{
    contract::{ContractRule, ContractRuleType, ResponseContract},
    error::{HealthwiseError, HealthwiseResult},
};
use healthwise_core::{
    traits::{ResponseVerifier, TextGenerator},
    PromptTemplate, StructuredFlow,
};

pub const FLOW_NAME: &str = "firstAidFlow";

const PROMPT: &str = r####"Generate a detailed, step-by-step first aid guide for the following medical problem: "{{{problem}}}".
Structure the instructions with markdown, using "###" for main headings (like "Assess the Scene", "For a [Problem]", "When to Call for Help") and "- " for list items under each heading.
Also provide a clear and prominent disclaimer stating that this is a first aid guide and not a substitute for professional medical evaluation, and to call a local emergency number for any serious injury.

Respond with a JSON object with the keys "instructions" and "disclaimer"."####;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirstAidRequest {
    /// The medical problem or emergency, e.g. "minor burn".
    pub problem: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirstAidGuide {
    /// Markdown with `###` headings and `- ` list items.
    pub instructions: String,
    pub disclaimer: String,
}

pub fn contract() -> ResponseContract {
    ResponseContract {
        contract_id: "first-aid-v1".to_string(),
        json_schema: json!({
            "type": "object",
            "properties": {
                "instructions": { "type": "string" },
                "disclaimer": { "type": "string" }
            },
            "required": ["instructions", "disclaimer"]
        }),
        rules: vec![
            ContractRule {
                rule_id: "instructions-present".to_string(),
                description: "Instructions must not be blank".to_string(),
                rule_type: ContractRuleType::RequiredField {
                    field_path: "instructions".to_string(),
                },
            },
            ContractRule {
                rule_id: "disclaimer-present".to_string(),
                description: "A disclaimer must accompany first-aid instructions".to_string(),
                rule_type: ContractRuleType::RequiredField {
                    field_path: "disclaimer".to_string(),
                },
            },
        ],
    }
}

pub fn flow() -> StructuredFlow<FirstAidGuide> {
    StructuredFlow::new(FLOW_NAME, PromptTemplate::new(PROMPT), contract())
}

/// Generate first-aid instructions for `request.problem`.
///
/// A blank problem is `InvalidInput` and never reaches the generator.
pub fn generate_first_aid(
    request: &FirstAidRequest,
    generator: &dyn TextGenerator,
    verifier: &dyn ResponseVerifier,
) -> HealthwiseResult<FirstAidGuide> {
    let problem = request.problem.trim();
    if problem.is_empty() {
        return Err(HealthwiseError::invalid_input("describe the problem that needs first aid"));
    }
    let request = FirstAidRequest { problem: problem.to_string() };
    flow().run(&request, generator, verifier)
}
