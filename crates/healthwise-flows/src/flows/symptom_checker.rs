//! Possible conditions for a list of symptoms.

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

pub const FLOW_NAME: &str = "symptomCheckerFlow";

const PROMPT: &str = r#"You are a medical expert. Given the following symptoms, suggest potential diseases or conditions that could be causing them, and provide recommendations on what the user should do next.

Symptoms: {{{symptoms}}}

Respond in a clear and concise manner, as a JSON object with the keys "suggestedConditions" and "recommendations"."#;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymptomCheckRequest {
    /// Comma-separated symptoms, e.g. "fever, cough, sore throat".
    pub symptoms: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomSuggestions {
    pub suggested_conditions: String,
    pub recommendations: String,
}

pub fn contract() -> ResponseContract {
    ResponseContract {
        contract_id: "symptom-suggestions-v1".to_string(),
        json_schema: json!({
            "type": "object",
            "properties": {
                "suggestedConditions": { "type": "string" },
                "recommendations": { "type": "string" }
            },
            "required": ["suggestedConditions", "recommendations"]
        }),
        rules: vec![ContractRule {
            rule_id: "conditions-present".to_string(),
            description: "At least one condition must be suggested".to_string(),
            rule_type: ContractRuleType::RequiredField {
                field_path: "suggestedConditions".to_string(),
            },
        }],
    }
}

pub fn flow() -> StructuredFlow<SymptomSuggestions> {
    StructuredFlow::new(FLOW_NAME, PromptTemplate::new(PROMPT), contract())
}

/// Suggest conditions for the symptoms in `request`.
///
/// The symptom list is normalized to `a, b, c` before it is sent; a list
/// with no non-blank symptom is `InvalidInput`.
pub fn suggest_conditions(
    request: &SymptomCheckRequest,
    generator: &dyn TextGenerator,
    verifier: &dyn ResponseVerifier,
) -> HealthwiseResult<SymptomSuggestions> {
    let symptoms: Vec<&str> = request
        .symptoms
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if symptoms.is_empty() {
        return Err(HealthwiseError::invalid_input("list at least one symptom"));
    }

    let request = SymptomCheckRequest { symptoms: symptoms.join(", ") };
    flow().run(&request, generator, verifier)
}
