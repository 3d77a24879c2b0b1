//! Lookup of the generative flows by name.
//!
//! Lets operators render a flow's prompt or check a saved model reply
//! without writing Rust for each flow.

use std::fmt;
use std::str::FromStr;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use healthwise_contracts::{
    error::{HealthwiseError, HealthwiseResult},
    generation::RequestId,
    vitals::VitalSigns,
};
use healthwise_core::{traits::ResponseVerifier, StructuredFlow};
use healthwise_verify::ContractVerifier;

use crate::flows::{diet_plan, first_aid, risk, symptom_checker, urgency};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKind {
    Urgency,
    FirstAid,
    SymptomChecker,
    DietPlan,
    RiskExplanation,
}

impl FlowKind {
    pub const ALL: [FlowKind; 5] = [
        FlowKind::Urgency,
        FlowKind::FirstAid,
        FlowKind::SymptomChecker,
        FlowKind::DietPlan,
        FlowKind::RiskExplanation,
    ];

    /// The short name used on the command line.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Urgency => "urgency",
            Self::FirstAid => "first-aid",
            Self::SymptomChecker => "symptom-checker",
            Self::DietPlan => "diet-plan",
            Self::RiskExplanation => "risk",
        }
    }

    /// The flow name sent with each generation request.
    pub fn flow_name(&self) -> &'static str {
        match self {
            Self::Urgency => urgency::FLOW_NAME,
            Self::FirstAid => first_aid::FLOW_NAME,
            Self::SymptomChecker => symptom_checker::FLOW_NAME,
            Self::DietPlan => diet_plan::FLOW_NAME,
            Self::RiskExplanation => risk::FLOW_NAME,
        }
    }

    /// Render the prompt for `input`, which must deserialize into the
    /// flow's request type.
    pub fn render_prompt(&self, input: &Value) -> HealthwiseResult<String> {
        match self {
            Self::Urgency => render::<VitalSigns, _>(&urgency::flow(), input),
            Self::FirstAid => render::<first_aid::FirstAidRequest, _>(&first_aid::flow(), input),
            Self::SymptomChecker => {
                render::<symptom_checker::SymptomCheckRequest, _>(&symptom_checker::flow(), input)
            }
            Self::DietPlan => render::<diet_plan::DietPlanRequest, _>(&diet_plan::flow(), input),
            Self::RiskExplanation => {
                render::<risk::RiskExplanationRequest, _>(&risk::flow(), input)
            }
        }
    }

    /// Check a raw model reply against the flow's contract and output type.
    ///
    /// Returns the reply as JSON when it is accepted.
    pub fn check_reply(&self, reply: &str, verifier: &dyn ResponseVerifier) -> HealthwiseResult<Value> {
        match self {
            Self::Urgency => {
                let flow = urgency::flow();
                let assessment = flow.accept_reply(&RequestId::new(), reply, verifier)?;
                to_json(flow.name(), &urgency::finalize(assessment))
            }
            Self::FirstAid => check(&first_aid::flow(), reply, verifier),
            Self::SymptomChecker => check(&symptom_checker::flow(), reply, verifier),
            Self::DietPlan => check(&diet_plan::flow(), reply, verifier),
            Self::RiskExplanation => check(&risk::flow(), reply, verifier),
        }
    }
}

fn render<I: DeserializeOwned + Serialize, T: DeserializeOwned>(
    flow: &StructuredFlow<T>,
    input: &Value,
) -> HealthwiseResult<String> {
    let typed: I = serde_json::from_value(input.clone()).map_err(|e| {
        HealthwiseError::invalid_input(format!("input does not fit {}: {e}", flow.name()))
    })?;
    flow.render_prompt(&typed)
}

fn check<T: DeserializeOwned + Serialize>(
    flow: &StructuredFlow<T>,
    reply: &str,
    verifier: &dyn ResponseVerifier,
) -> HealthwiseResult<Value> {
    let accepted = flow.accept_reply(&RequestId::new(), reply, verifier)?;
    to_json(flow.name(), &accepted)
}

fn to_json<T: Serialize>(flow_name: &str, accepted: &T) -> HealthwiseResult<Value> {
    serde_json::to_value(accepted)
        .map_err(|e| HealthwiseError::generation(format!("{flow_name}: {e}")))
}

impl fmt::Display for FlowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FlowKind {
    type Err = HealthwiseError;

    /// Accepts the short key or the flow name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        FlowKind::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(s) || kind.flow_name() == s)
            .ok_or_else(|| {
                let known: Vec<&str> = FlowKind::ALL.iter().map(FlowKind::key).collect();
                HealthwiseError::invalid_input(format!(
                    "unknown flow '{s}' (expected one of: {})",
                    known.join(", ")
                ))
            })
    }
}

/// A verifier with every check the flow contracts reference.
pub fn contract_verifier() -> ContractVerifier {
    let mut verifier = ContractVerifier::new();
    verifier.register_check(diet_plan::CALORIES_ADD_UP, Box::new(diet_plan::calories_add_up));
    verifier
}
