//! Risk prediction explanation.
//!
//! The score itself comes from the caller; this module turns a profile into
//! the factor list the model sees and explains the result.

use std::fmt;
use std::str::FromStr;

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

pub const FLOW_NAME: &str = "riskPredictionExplanationFlow";

const PROMPT: &str = r#"You are a medical expert providing a risk assessment. The user has a simulated risk score for a specific condition.
Your task is to provide a clear, empathetic explanation of the risk score and give specific, actionable recommendations.

Do not state that this is a simulation. Be direct and helpful.

Condition: {{{condition}}}
Simulated Risk Score: {{{riskScore}}}%
Contributing Factors: {{{factors}}}

Based on this information, generate:
1.  An 'explanation' that details what the risk score means and how the contributing factors (like age, BMI, smoking) influence the risk for the specified condition.
2.  A set of 'recommendations' that are tailored to the user's situation. Be specific. For example, instead of "eat healthy," suggest "incorporate leafy greens like spinach and kale into your diet, and reduce red meat consumption." If the user is a smoker, a key recommendation should be about quitting smoking. Provide at least 3-5 distinct recommendations. Format them as a markdown list.

Respond with a JSON object with the keys "explanation" and "recommendations"."#;

const MIN_AGE: u32 = 18;
const MAX_AGE: u32 = 120;
const MIN_BMI: f64 = 10.0;
const MAX_BMI: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskCondition {
    #[serde(rename = "Heart Disease")]
    HeartDisease,
    Diabetes,
    Stroke,
}

impl fmt::Display for RiskCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HeartDisease => write!(f, "Heart Disease"),
            Self::Diabetes => write!(f, "Diabetes"),
            Self::Stroke => write!(f, "Stroke"),
        }
    }
}

impl FromStr for RiskCondition {
    type Err = HealthwiseError;

    /// Accepts the display name or a kebab/snake form, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();
        match key.as_str() {
            "heartdisease" | "heart" => Ok(Self::HeartDisease),
            "diabetes" => Ok(Self::Diabetes),
            "stroke" => Ok(Self::Stroke),
            _ => Err(HealthwiseError::invalid_input(format!(
                "unknown condition '{s}' (expected Heart Disease, Diabetes or Stroke)"
            ))),
        }
    }
}

/// What the user reports about themselves on the risk form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskProfile {
    pub condition: RiskCondition,
    pub age: u32,
    pub bmi: f64,
    #[serde(default)]
    pub is_smoker: bool,
    #[serde(default)]
    pub has_family_history: bool,
}

impl RiskProfile {
    pub fn validate(&self) -> HealthwiseResult<()> {
        if !(MIN_AGE..=MAX_AGE).contains(&self.age) {
            return Err(HealthwiseError::invalid_input(format!(
                "age must be between {MIN_AGE} and {MAX_AGE}, got {}",
                self.age
            )));
        }
        if !self.bmi.is_finite() || !(MIN_BMI..=MAX_BMI).contains(&self.bmi) {
            return Err(HealthwiseError::invalid_input(format!(
                "BMI must be between {MIN_BMI} and {MAX_BMI}, got {}",
                self.bmi
            )));
        }
        Ok(())
    }

    /// The comma-separated factor list, e.g.
    /// `"Age: 45, BMI: 25, Smoker, Family history of condition"`.
    pub fn factors(&self) -> String {
        let mut factors = vec![format!("Age: {}", self.age), format!("BMI: {}", self.bmi)];
        if self.is_smoker {
            factors.push("Smoker".to_string());
        }
        if self.has_family_history {
            factors.push("Family history of condition".to_string());
        }
        factors.join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    pub fn from_score(score: f64) -> Self {
        if score > 70.0 {
            Self::High
        } else if score > 40.0 {
            Self::Moderate
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for RiskBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Moderate => write!(f, "Moderate"),
            Self::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskExplanationRequest {
    pub condition: RiskCondition,
    /// Percentage in `[0, 100]`.
    pub risk_score: f64,
    pub factors: String,
}

impl RiskExplanationRequest {
    /// Build a request from a validated profile and a score in `[0, 100]`.
    pub fn from_profile(profile: &RiskProfile, risk_score: f64) -> HealthwiseResult<Self> {
        profile.validate()?;
        let request = Self {
            condition: profile.condition,
            risk_score,
            factors: profile.factors(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn band(&self) -> RiskBand {
        RiskBand::from_score(self.risk_score)
    }

    fn validate(&self) -> HealthwiseResult<()> {
        if !self.risk_score.is_finite() || !(0.0..=100.0).contains(&self.risk_score) {
            return Err(HealthwiseError::invalid_input(format!(
                "risk score must be between 0 and 100, got {}",
                self.risk_score
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskExplanation {
    pub explanation: String,
    /// Markdown list.
    pub recommendations: String,
}

pub fn contract() -> ResponseContract {
    ResponseContract {
        contract_id: "risk-explanation-v1".to_string(),
        json_schema: json!({
            "type": "object",
            "properties": {
                "explanation": { "type": "string" },
                "recommendations": { "type": "string" }
            },
            "required": ["explanation", "recommendations"]
        }),
        rules: vec![
            ContractRule {
                rule_id: "explanation-present".to_string(),
                description: "The risk score must be explained".to_string(),
                rule_type: ContractRuleType::RequiredField {
                    field_path: "explanation".to_string(),
                },
            },
            ContractRule {
                rule_id: "recommendations-present".to_string(),
                description: "Recommendations must not be blank".to_string(),
                rule_type: ContractRuleType::RequiredField {
                    field_path: "recommendations".to_string(),
                },
            },
            ContractRule {
                rule_id: "no-simulation-mention".to_string(),
                description: "The explanation must not call the score a simulation".to_string(),
                rule_type: ContractRuleType::ForbiddenPattern {
                    field_path: "explanation".to_string(),
                    pattern: "simulation".to_string(),
                },
            },
        ],
    }
}

pub fn flow() -> StructuredFlow<RiskExplanation> {
    StructuredFlow::new(FLOW_NAME, PromptTemplate::new(PROMPT), contract())
}

pub fn explain_risk(
    request: &RiskExplanationRequest,
    generator: &dyn TextGenerator,
    verifier: &dyn ResponseVerifier,
) -> HealthwiseResult<RiskExplanation> {
    request.validate()?;
    flow().run(request, generator, verifier)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use healthwise_contracts::error::HealthwiseError;
    use healthwise_core::CannedGenerator;
    use healthwise_verify::ContractVerifier;

    use super::{explain_risk, RiskBand, RiskCondition, RiskExplanationRequest, RiskProfile};

    fn profile() -> RiskProfile {
        RiskProfile {
            condition: RiskCondition::HeartDisease,
            age: 45,
            bmi: 25.0,
            is_smoker: false,
            has_family_history: false,
        }
    }

    // ── Profile ─────────────────────────────────────────────────────

    #[test]
    fn test_factors_for_default_profile() {
        assert_eq!(profile().factors(), "Age: 45, BMI: 25");
    }

    #[test]
    fn test_factors_include_flags() {
        let p = RiskProfile { is_smoker: true, has_family_history: true, bmi: 27.5, ..profile() };
        assert_eq!(p.factors(), "Age: 45, BMI: 27.5, Smoker, Family history of condition");
    }

    #[test]
    fn test_profile_bounds() {
        assert!(profile().validate().is_ok());
        assert!(RiskProfile { age: 17, ..profile() }.validate().is_err());
        assert!(RiskProfile { age: 120, ..profile() }.validate().is_ok());
        assert!(RiskProfile { bmi: 60.5, ..profile() }.validate().is_err());
        assert!(RiskProfile { bmi: f64::NAN, ..profile() }.validate().is_err());
    }

    #[test]
    fn test_condition_wire_names() {
        let json = serde_json::to_value(RiskCondition::HeartDisease).unwrap();
        assert_eq!(json, "Heart Disease");
        assert_eq!("heart-disease".parse::<RiskCondition>().unwrap(), RiskCondition::HeartDisease);
        assert_eq!("Stroke".parse::<RiskCondition>().unwrap(), RiskCondition::Stroke);
        assert!("asthma".parse::<RiskCondition>().is_err());
    }

    // ── Bands ───────────────────────────────────────────────────────

    #[test]
    fn test_band_edges() {
        assert_eq!(RiskBand::from_score(40.0), RiskBand::Low);
        assert_eq!(RiskBand::from_score(40.5), RiskBand::Moderate);
        assert_eq!(RiskBand::from_score(70.0), RiskBand::Moderate);
        assert_eq!(RiskBand::from_score(71.0), RiskBand::High);
    }

    // ── Explanation flow ────────────────────────────────────────────

    #[test]
    fn test_explanation_prompt_and_reply() {
        let generator = CannedGenerator::json(&json!({
            "explanation": "A score of 62% places you at moderate risk.",
            "recommendations": "- Walk 30 minutes a day\n- Cut back on salt\n- Book a lipid panel"
        }));
        let request = RiskExplanationRequest::from_profile(&profile(), 62.0).unwrap();
        assert_eq!(request.band(), RiskBand::Moderate);

        let explanation = explain_risk(&request, &generator, &ContractVerifier::new()).unwrap();
        assert!(explanation.recommendations.starts_with("- Walk"));

        let prompt = &generator.requests()[0].prompt;
        assert!(prompt.contains("Condition: Heart Disease"), "prompt: {prompt}");
        assert!(prompt.contains("Simulated Risk Score: 62%"), "prompt: {prompt}");
        assert!(prompt.contains("Contributing Factors: Age: 45, BMI: 25"), "prompt: {prompt}");
    }

    #[test]
    fn test_simulation_mention_is_rejected() {
        let generator = CannedGenerator::json(&json!({
            "explanation": "This Simulation suggests a high risk.",
            "recommendations": "- Quit smoking"
        }));
        let request = RiskExplanationRequest::from_profile(&profile(), 80.0).unwrap();
        match explain_risk(&request, &generator, &ContractVerifier::new()) {
            Err(HealthwiseError::GenerationFailure { reason }) => {
                assert!(reason.contains("no-simulation-mention"), "unexpected reason: {reason}");
            }
            other => panic!("expected GenerationFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_score_out_of_range_is_invalid() {
        assert!(matches!(
            RiskExplanationRequest::from_profile(&profile(), 101.0),
            Err(HealthwiseError::InvalidInput { .. })
        ));
        let request = RiskExplanationRequest {
            condition: RiskCondition::Diabetes,
            risk_score: -1.0,
            factors: String::new(),
        };
        let generator = CannedGenerator::silent();
        let result = explain_risk(&request, &generator, &ContractVerifier::new());
        assert!(matches!(result, Err(HealthwiseError::InvalidInput { .. })));
        assert!(generator.requests().is_empty());
    }
}
