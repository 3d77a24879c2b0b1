//! Model-backed urgency assessment.
//!
//! The same contract as the rule-based triage engine, answered by a hosted
//! model. The reply must carry one of the three levels; the disclaimer is
//! appended to whatever next steps the model proposes.

use std::sync::Arc;

use serde_json::json;
use tracing::info;

use healthwise_contracts::{
    assessment::{with_disclaimer, UrgencyAssessment},
    contract::{ContractRule, ContractRuleType, ResponseContract},
    error::HealthwiseResult,
    vitals::VitalSigns,
};
use healthwise_core::{
    traits::{ResponseVerifier, TextGenerator, UrgencyAssessor},
    PromptTemplate, StructuredFlow,
};

pub const FLOW_NAME: &str = "assessUrgencyFlow";

const PROMPT: &str = r#"You are an expert medical triage AI. Your role is to assess the urgency of a patient's situation based on their vital signs and symptoms.

Analyze the following data:
- Heart Rate: {{{heartRate}}} BPM
- Blood Pressure: {{{bloodPressureSystolic}}}/{{{bloodPressureDiastolic}}} mmHg
- Oxygen Saturation: {{{oxygenSaturation}}}%
- Symptoms: "{{{symptoms}}}"

Based on this information, determine the urgency level (High, Medium, or Low). Provide a clear explanation for your assessment, referencing the specific data points that led to your conclusion. Finally, give specific, actionable next steps for the user.

High Urgency examples: chest pain, difficulty breathing, fainting, very high/low vitals.
Medium Urgency examples: severe headache, dizziness, abdominal pain, moderately abnormal vitals.
Low Urgency examples: stable vitals with mild or non-acute symptoms.

Always include a disclaimer that this is not a substitute for professional medical advice.

Respond with a JSON object with the keys "urgencyLevel", "explanation" and "nextSteps"."#;

pub fn contract() -> ResponseContract {
    ResponseContract {
        contract_id: "urgency-assessment-v1".to_string(),
        json_schema: json!({
            "type": "object",
            "properties": {
                "urgencyLevel": { "type": "string", "enum": ["High", "Medium", "Low"] },
                "explanation": { "type": "string" },
                "nextSteps": { "type": "string" }
            },
            "required": ["urgencyLevel", "explanation", "nextSteps"]
        }),
        rules: vec![
            ContractRule {
                rule_id: "explanation-present".to_string(),
                description: "The assessment must explain its level".to_string(),
                rule_type: ContractRuleType::RequiredField {
                    field_path: "explanation".to_string(),
                },
            },
            ContractRule {
                rule_id: "next-steps-present".to_string(),
                description: "The assessment must give next steps".to_string(),
                rule_type: ContractRuleType::RequiredField {
                    field_path: "nextSteps".to_string(),
                },
            },
        ],
    }
}

pub fn flow() -> StructuredFlow<UrgencyAssessment> {
    StructuredFlow::new(FLOW_NAME, PromptTemplate::new(PROMPT), contract())
}

/// Append the fixed disclaimer to an accepted model assessment.
pub(crate) fn finalize(mut assessment: UrgencyAssessment) -> UrgencyAssessment {
    assessment.next_steps = with_disclaimer(&assessment.next_steps);
    assessment
}

/// An `UrgencyAssessor` that delegates to a hosted model.
///
/// A reply that is missing, malformed, or off-contract is returned as
/// `GenerationFailure`; it is never replaced by a default level.
pub struct GenerativeUrgencyAssessor {
    flow: StructuredFlow<UrgencyAssessment>,
    generator: Arc<dyn TextGenerator>,
    verifier: Arc<dyn ResponseVerifier>,
}

impl GenerativeUrgencyAssessor {
    pub fn new(generator: Arc<dyn TextGenerator>, verifier: Arc<dyn ResponseVerifier>) -> Self {
        Self {
            flow: flow(),
            generator,
            verifier,
        }
    }
}

impl UrgencyAssessor for GenerativeUrgencyAssessor {
    fn assess(&self, vitals: &VitalSigns) -> HealthwiseResult<UrgencyAssessment> {
        vitals.ensure_finite()?;

        let assessment = finalize(self.flow.run(
            vitals,
            self.generator.as_ref(),
            self.verifier.as_ref(),
        )?);

        info!(urgency = %assessment.urgency_level, flow = FLOW_NAME, "urgency assessed by model");
        Ok(assessment)
    }
}
