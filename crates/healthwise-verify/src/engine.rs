//! Contract verifier for generated responses.
//!
//! Verification runs in two phases. The JSON Schema document is applied
//! first, then every semantic rule. All violations are collected before
//! returning so a rejected reply reports everything wrong with it at once.
//!
//! Flow-specific checks are registered by name with `register_check` and
//! referenced from contracts via `ContractRuleType::Custom`.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use healthwise_contracts::{
    contract::{ConformanceReport, ContractRuleType, ContractViolation, ResponseContract},
    error::HealthwiseResult,
};
use healthwise_core::traits::ResponseVerifier;

/// A named, flow-specific check.
///
/// Receives the whole payload. Returns `Some(message)` when the check fails,
/// `None` when it passes.
pub type ContractCheckFn = Box<dyn Fn(&Value) -> Option<String> + Send + Sync>;

/// Checks generated payloads against `ResponseContract`s.
pub struct ContractVerifier {
    checks: HashMap<String, ContractCheckFn>,
}

impl ContractVerifier {
    /// A verifier with no named checks registered.
    pub fn new() -> Self {
        Self {
            checks: HashMap::new(),
        }
    }

    /// Register `check` under `name`, replacing any previous check of that name.
    pub fn register_check(&mut self, name: impl Into<String>, check: ContractCheckFn) {
        self.checks.insert(name.into(), check);
    }

    pub fn has_check(&self, name: &str) -> bool {
        self.checks.contains_key(name)
    }

    /// Resolve a dotted path (e.g. `"result.severity"`). `None` when a
    /// segment is missing or the value is JSON `null`.
    fn resolve_path<'v>(value: &'v Value, path: &str) -> Option<&'v Value> {
        let mut current = value;
        for segment in path.split('.') {
            match current.get(segment) {
                Some(v) if !v.is_null() => current = v,
                _ => return None,
            }
        }
        Some(current)
    }

    fn check_schema(&self, payload: &Value, contract: &ResponseContract, violations: &mut Vec<ContractViolation>) {
        // Null means the contract has no structural constraint.
        if contract.json_schema.is_null() {
            return;
        }

        match jsonschema::validator_for(&contract.json_schema) {
            Ok(validator) => {
                for error in validator.iter_errors(payload) {
                    let message = format!("JSON Schema violation at '{}': {}", error.instance_path, error);
                    warn!(contract_id = %contract.contract_id, %message, "structural violation");
                    violations.push(ContractViolation {
                        rule_id: "json-schema".to_string(),
                        message,
                    });
                }
            }
            Err(e) => {
                // A broken schema rejects every reply rather than letting one through unchecked.
                let message = format!("invalid JSON Schema document: {e}");
                warn!(contract_id = %contract.contract_id, %message, "schema compilation failure");
                violations.push(ContractViolation {
                    rule_id: "json-schema".to_string(),
                    message,
                });
            }
        }
    }

    fn check_rule(&self, payload: &Value, rule_type: &ContractRuleType) -> Option<String> {
        match rule_type {
            ContractRuleType::RequiredField { field_path } => {
                match Self::resolve_path(payload, field_path) {
                    None => Some(format!("required field '{field_path}' is missing or null")),
                    Some(Value::String(s)) if s.trim().is_empty() => {
                        Some(format!("required field '{field_path}' is blank"))
                    }
                    Some(_) => None,
                }
            }

            ContractRuleType::AllowedValues { field_path, allowed } => {
                match Self::resolve_path(payload, field_path) {
                    None => Some(format!("field '{field_path}' is missing; cannot check allowed values")),
                    Some(actual) if allowed.contains(actual) => None,
                    Some(actual) => Some(format!(
                        "field '{field_path}' has value {actual} which is not in the allowed set"
                    )),
                }
            }

            // Only string values are inspected; absent or non-string fields pass.
            ContractRuleType::ForbiddenPattern { field_path, pattern } => {
                let text = Self::resolve_path(payload, field_path).and_then(Value::as_str)?;
                if text.to_lowercase().contains(&pattern.to_lowercase()) {
                    Some(format!("field '{field_path}' contains forbidden pattern '{pattern}'"))
                } else {
                    None
                }
            }

            // An unregistered name fails so a misconfigured contract surfaces immediately.
            ContractRuleType::Custom { function_name } => match self.checks.get(function_name.as_str()) {
                Some(check) => check(payload),
                None => Some(format!("no check registered under the name '{function_name}'")),
            },
        }
    }
}

impl Default for ContractVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseVerifier for ContractVerifier {
    fn verify(&self, payload: &Value, contract: &ResponseContract) -> HealthwiseResult<ConformanceReport> {
        let mut violations = Vec::new();

        self.check_schema(payload, contract, &mut violations);

        for rule in &contract.rules {
            debug!(rule_id = %rule.rule_id, description = %rule.description, "evaluating contract rule");
            if let Some(message) = self.check_rule(payload, &rule.rule_type) {
                warn!(rule_id = %rule.rule_id, %message, "contract rule violated");
                violations.push(ContractViolation {
                    rule_id: rule.rule_id.clone(),
                    message,
                });
            }
        }

        let passed = violations.is_empty();
        debug!(
            contract_id = %contract.contract_id,
            passed,
            violation_count = violations.len(),
            "verification complete"
        );

        Ok(ConformanceReport { passed, violations })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
