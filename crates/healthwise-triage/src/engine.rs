//! Rule-based urgency assessor.
//!
//! `TriageEngine` compiles a `TriageTable` and implements `UrgencyAssessor`.
//!
//! Evaluation algorithm:
//!
//! 1. Reject non-finite readings (`InvalidInput`).
//! 2. Split the symptom text into normalized fragments.
//! 3. Evaluate every `high` rule. If any fires, the level is High.
//! 4. Otherwise evaluate every `medium` rule. If any fires, the level is Medium.
//! 5. Otherwise the level is Low and the stable explanation is used, followed
//!    by the note of every advisory whose trigger matches.
//!
//! Every rule that fires at the assigned level is cited in the explanation,
//! in table order, so the same input always yields the same text.

use tracing::{debug, info};

use healthwise_contracts::{
    assessment::{UrgencyAssessment, UrgencyLevel},
    error::HealthwiseResult,
    vitals::VitalSigns,
};
use healthwise_core::traits::UrgencyAssessor;

use crate::{
    keywords::{symptom_fragments, SymptomMatcher},
    rule::{fill, RuleUrgency, TriageRule, TriageTable},
};

/// A rule together with its compiled keyword matcher.
#[derive(Debug)]
struct CompiledRule {
    rule: TriageRule,
    matcher: SymptomMatcher,
}

impl CompiledRule {
    /// Return the filled explanation if the rule fires.
    fn evaluate(&self, vitals: &VitalSigns, fragments: &[String]) -> Option<String> {
        let matched = self.matcher.matched(fragments);
        let triggered = self.rule.triggers.iter().any(|t| t.matches(vitals));
        if !triggered && matched.is_empty() {
            return None;
        }

        debug!(
            rule_id = %self.rule.id,
            triggered,
            matched_symptoms = matched.len(),
            "triage rule fired"
        );
        Some(fill(&self.rule.explanation, vitals, &matched))
    }
}

/// An `UrgencyAssessor` driven by a TOML triage table.
///
/// ```rust,ignore
/// use healthwise_triage::TriageEngine;
///
/// let engine = TriageEngine::canonical()?;
/// let assessment = engine.assess(&vitals)?;
/// ```
#[derive(Debug)]
pub struct TriageEngine {
    high: Vec<CompiledRule>,
    medium: Vec<CompiledRule>,
    table: TriageTable,
}

impl TriageEngine {
    pub fn new(table: TriageTable) -> Self {
        let mut high = Vec::new();
        let mut medium = Vec::new();
        for rule in &table.rules {
            let compiled = CompiledRule {
                matcher: SymptomMatcher::new(&rule.symptoms),
                rule: rule.clone(),
            };
            match rule.urgency {
                RuleUrgency::High => high.push(compiled),
                RuleUrgency::Medium => medium.push(compiled),
            }
        }
        Self { high, medium, table }
    }

    /// Engine over the embedded canonical table.
    pub fn canonical() -> HealthwiseResult<Self> {
        Ok(Self::new(TriageTable::canonical()?))
    }

    pub fn from_toml_str(s: &str) -> HealthwiseResult<Self> {
        Ok(Self::new(TriageTable::from_toml_str(s)?))
    }

    pub fn from_file(path: &std::path::Path) -> HealthwiseResult<Self> {
        Ok(Self::new(TriageTable::from_file(path)?))
    }

    pub fn table(&self) -> &TriageTable {
        &self.table
    }

    /// Classify `vitals` without building the guidance text.
    pub fn classify(&self, vitals: &VitalSigns) -> HealthwiseResult<UrgencyLevel> {
        Ok(self.assess(vitals)?.urgency_level)
    }

    fn stable_explanation(&self, vitals: &VitalSigns) -> String {
        let stable = &self.table.stable;
        let mut parts = vec![fill(&stable.explanation, vitals, &[])];
        for advisory in &stable.advisories {
            if advisory.triggers.iter().any(|t| t.matches(vitals)) {
                debug!(advisory_id = %advisory.id, "stable advisory applies");
                parts.push(fill(&advisory.note, vitals, &[]));
            }
        }
        parts.join(" ")
    }
}

impl UrgencyAssessor for TriageEngine {
    fn assess(&self, vitals: &VitalSigns) -> HealthwiseResult<UrgencyAssessment> {
        vitals.ensure_finite()?;
        let fragments = symptom_fragments(&vitals.symptoms);

        debug!(
            heart_rate = vitals.heart_rate,
            systolic = vitals.blood_pressure_systolic,
            diastolic = vitals.blood_pressure_diastolic,
            oxygen_saturation = vitals.oxygen_saturation,
            symptom_count = fragments.len(),
            "evaluating triage table"
        );

        let tiers = [(UrgencyLevel::High, &self.high), (UrgencyLevel::Medium, &self.medium)];
        for (level, rules) in tiers {
            let reasons: Vec<String> = rules
                .iter()
                .filter_map(|rule| rule.evaluate(vitals, &fragments))
                .collect();
            if !reasons.is_empty() {
                info!(urgency = %level, fired = reasons.len(), "urgency assessed");
                return Ok(UrgencyAssessment {
                    urgency_level: level,
                    explanation: reasons.join(" "),
                    next_steps: level.next_steps(),
                });
            }
        }

        info!(urgency = %UrgencyLevel::Low, "urgency assessed");
        Ok(UrgencyAssessment {
            urgency_level: UrgencyLevel::Low,
            explanation: self.stable_explanation(vitals),
            next_steps: UrgencyLevel::Low.next_steps(),
        })
    }
}
