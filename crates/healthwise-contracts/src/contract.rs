//! Response contracts for generative flows.
//!
//! A model reply is only accepted once it conforms to the flow's
//! `ResponseContract`: a JSON Schema for its shape plus semantic rules the
//! schema cannot express.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The shape and rules a generated response must satisfy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseContract {
    /// Unique identifier (e.g. "urgency-assessment-v1").
    pub contract_id: String,
    /// JSON Schema document for structural validation. `Null` disables it.
    pub json_schema: Value,
    /// Semantic rules evaluated after structural validation.
    pub rules: Vec<ContractRule>,
}

/// A single semantic rule in a `ResponseContract`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractRule {
    /// Referenced in violation reports.
    pub rule_id: String,
    pub description: String,
    pub rule_type: ContractRuleType,
}

/// Semantic checks the verifier understands.
///
/// Field paths are dot-separated object keys, e.g. `"result.severity"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ContractRuleType {
    /// The field must be present and non-null.
    RequiredField { field_path: String },

    /// The field must equal one of `allowed`.
    AllowedValues { field_path: String, allowed: Vec<Value> },

    /// The field, when it is a string, must not contain `pattern`
    /// (case-insensitive substring).
    ForbiddenPattern { field_path: String, pattern: String },

    /// Delegate to a check registered on the verifier under `function_name`.
    Custom { function_name: String },
}

/// Outcome of checking one payload against a contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConformanceReport {
    /// True only if no rule was violated.
    pub passed: bool,
    pub violations: Vec<ContractViolation>,
}

impl ConformanceReport {
    /// Join every violation into one `[rule] message; ...` line.
    pub fn summary(&self) -> String {
        self.violations
            .iter()
            .map(|v| format!("[{}] {}", v.rule_id, v.message))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A single violated rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractViolation {
    pub rule_id: String,
    pub message: String,
}
