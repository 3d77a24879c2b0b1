//! Triage table types and configuration schema.
//!
//! A `TriageTable` is deserialized from TOML and holds the threshold and
//! symptom rules for the High and Medium levels, plus the text used when no
//! rule fires.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use healthwise_contracts::{
    assessment::UrgencyLevel,
    error::{HealthwiseError, HealthwiseResult},
    vitals::{Vital, VitalSigns},
};

/// The embedded canonical table.
pub const CANONICAL_TABLE: &str = include_str!("../policies/triage.toml");

/// Placeholders an explanation or advisory note may use.
pub const PLACEHOLDERS: [&str; 5] = [
    "heart_rate",
    "systolic",
    "diastolic",
    "oxygen_saturation",
    "symptoms",
];

/// The level a rule assigns when it fires.
///
/// Low is what remains when nothing fires, so a rule cannot assign it.
///
/// ```toml
/// urgency = "high"
/// urgency = "medium"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleUrgency {
    High,
    Medium,
}

impl From<RuleUrgency> for UrgencyLevel {
    fn from(urgency: RuleUrgency) -> Self {
        match urgency {
            RuleUrgency::High => UrgencyLevel::High,
            RuleUrgency::Medium => UrgencyLevel::Medium,
        }
    }
}

/// A numeric condition on one vital. Every bound that is set must hold.
///
/// ```toml
/// { vital = "heart-rate", above = 100.0, at_most = 130.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VitalTrigger {
    pub vital: Vital,
    pub above: Option<f64>,
    pub at_least: Option<f64>,
    pub below: Option<f64>,
    pub at_most: Option<f64>,
}

impl VitalTrigger {
    pub fn matches(&self, vitals: &VitalSigns) -> bool {
        let value = vitals.reading(self.vital);
        self.above.map_or(true, |bound| value > bound)
            && self.at_least.map_or(true, |bound| value >= bound)
            && self.below.map_or(true, |bound| value < bound)
            && self.at_most.map_or(true, |bound| value <= bound)
    }

    fn has_bound(&self) -> bool {
        self.above.is_some() || self.at_least.is_some() || self.below.is_some() || self.at_most.is_some()
    }
}

/// A single triage rule loaded from TOML.
///
/// The rule fires when any trigger matches or any symptom keyword is found
/// in a reported symptom.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageRule {
    /// Stable identifier used in tracing events and error messages.
    pub id: String,

    #[serde(default)]
    pub description: String,

    pub urgency: RuleUrgency,

    /// Explanation template cited when the rule fires.
    pub explanation: String,

    #[serde(default)]
    pub triggers: Vec<VitalTrigger>,

    /// Keywords matched against each reported symptom fragment.
    #[serde(default)]
    pub symptoms: Vec<String>,
}

/// A note added to a Low assessment when any of its triggers matches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advisory {
    pub id: String,
    pub note: String,
    pub triggers: Vec<VitalTrigger>,
}

/// What a Low assessment says.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StableGuidance {
    pub explanation: String,
    #[serde(default)]
    pub advisories: Vec<Advisory>,
}

/// The top-level structure deserialized from a TOML triage table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageTable {
    pub rules: Vec<TriageRule>,
    pub stable: StableGuidance,
}

impl TriageTable {
    /// Parse `s` as TOML and validate the result.
    ///
    /// Returns `ConfigError` if the TOML is malformed, does not match the
    /// schema, or fails `validate`.
    pub fn from_toml_str(s: &str) -> HealthwiseResult<Self> {
        let table: TriageTable = toml::from_str(s).map_err(|e| {
            HealthwiseError::config(format!("failed to parse triage table TOML: {}", e))
        })?;
        table.validate()?;
        Ok(table)
    }

    /// Read the file at `path` and parse it as a triage table.
    pub fn from_file(path: &std::path::Path) -> HealthwiseResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            HealthwiseError::config(format!(
                "failed to read triage table '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&contents)
    }

    /// The embedded table shipped with the crate.
    pub fn canonical() -> HealthwiseResult<Self> {
        Self::from_toml_str(CANONICAL_TABLE)
    }

    /// Check invariants TOML deserialization cannot express.
    ///
    /// - rule and advisory ids are unique
    /// - every rule has at least one trigger or symptom keyword
    /// - every trigger sets at least one bound
    /// - templates only use known placeholders
    pub fn validate(&self) -> HealthwiseResult<()> {
        let mut seen = HashSet::new();

        for rule in &self.rules {
            if !seen.insert(rule.id.as_str()) {
                return Err(HealthwiseError::config(format!("duplicate triage rule id '{}'", rule.id)));
            }
            if rule.triggers.is_empty() && rule.symptoms.iter().all(|s| s.trim().is_empty()) {
                return Err(HealthwiseError::config(format!(
                    "triage rule '{}' has no triggers and no symptom keywords",
                    rule.id
                )));
            }
            check_triggers(&rule.id, &rule.triggers)?;
            check_template(&rule.id, &rule.explanation)?;
        }

        for advisory in &self.stable.advisories {
            if !seen.insert(advisory.id.as_str()) {
                return Err(HealthwiseError::config(format!("duplicate advisory id '{}'", advisory.id)));
            }
            if advisory.triggers.is_empty() {
                return Err(HealthwiseError::config(format!(
                    "advisory '{}' has no triggers",
                    advisory.id
                )));
            }
            check_triggers(&advisory.id, &advisory.triggers)?;
            check_template(&advisory.id, &advisory.note)?;
        }

        check_template("stable", &self.stable.explanation)
    }
}

fn check_triggers(id: &str, triggers: &[VitalTrigger]) -> HealthwiseResult<()> {
    match triggers.iter().position(|t| !t.has_bound()) {
        Some(index) => Err(HealthwiseError::config(format!(
            "trigger {} of '{}' sets no bound",
            index, id
        ))),
        None => Ok(()),
    }
}

fn check_template(id: &str, template: &str) -> HealthwiseResult<()> {
    if template.trim().is_empty() {
        return Err(HealthwiseError::config(format!("'{}' has an empty explanation", id)));
    }
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let after = &rest[start + 1..];
        let end = after.find('}').ok_or_else(|| {
            HealthwiseError::config(format!("'{}' has an unterminated placeholder", id))
        })?;
        let name = &after[..end];
        if !PLACEHOLDERS.contains(&name) {
            return Err(HealthwiseError::config(format!(
                "'{}' uses unknown placeholder '{{{}}}'",
                id, name
            )));
        }
        rest = &after[end + 1..];
    }
    Ok(())
}

/// Fill `{placeholder}`s in a validated template.
pub(crate) fn fill(template: &str, vitals: &VitalSigns, symptoms: &[String]) -> String {
    template
        .replace("{heart_rate}", &format_reading(vitals.heart_rate))
        .replace("{systolic}", &format_reading(vitals.blood_pressure_systolic))
        .replace("{diastolic}", &format_reading(vitals.blood_pressure_diastolic))
        .replace("{oxygen_saturation}", &format_reading(vitals.oxygen_saturation))
        .replace("{symptoms}", &symptoms.join(", "))
}

/// Whole readings print without a decimal point.
fn format_reading(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}
