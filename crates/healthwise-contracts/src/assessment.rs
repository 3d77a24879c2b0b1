//! Urgency assessment output types.
//!
//! Every assessor, rule-based or generative, returns an `UrgencyAssessment`
//! whose `next_steps` ends with [`DISCLAIMER`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fixed text appended to every set of next steps.
pub const DISCLAIMER: &str = "This is a simulation and not a substitute for professional medical advice. Always consult a healthcare provider for an accurate diagnosis and treatment plan.";

/// Severity classification, ordered `Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

impl UrgencyLevel {
    /// The fixed guidance for this level, without the disclaimer.
    pub fn guidance(self) -> &'static str {
        match self {
            UrgencyLevel::High => {
                "Call emergency services (e.g., 911) immediately or go to the nearest emergency room."
            }
            UrgencyLevel::Medium => {
                "You should contact your doctor promptly or consider visiting an urgent care center today. Do not delay seeking medical advice."
            }
            UrgencyLevel::Low => {
                "Monitor your symptoms at home. If they persist or worsen, schedule an appointment with your primary care physician for a follow-up."
            }
        }
    }

    /// The level's guidance followed by the disclaimer.
    pub fn next_steps(self) -> String {
        with_disclaimer(self.guidance())
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UrgencyLevel::High => "High",
            UrgencyLevel::Medium => "Medium",
            UrgencyLevel::Low => "Low",
        };
        f.write_str(name)
    }
}

/// Append the disclaimer paragraph to `steps`.
pub fn with_disclaimer(steps: &str) -> String {
    format!("{}\n\nDisclaimer: {}", steps.trim_end(), DISCLAIMER)
}

/// The result of one urgency assessment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrgencyAssessment {
    pub urgency_level: UrgencyLevel,
    /// Why the level was assigned, citing the triggering readings or symptoms.
    pub explanation: String,
    /// What the user should do next. Always ends with [`DISCLAIMER`].
    pub next_steps: String,
}
