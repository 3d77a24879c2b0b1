//! # healthwise-triage
//!
//! A TOML-driven, rule-based urgency triage classifier.
//!
//! ## Overview
//!
//! This crate provides [`TriageEngine`], which implements the
//! [`UrgencyAssessor`](healthwise_core::traits::UrgencyAssessor) trait. The
//! thresholds and symptom keywords live in a TOML table; the canonical one
//! ships embedded in the crate.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use healthwise_triage::TriageEngine;
//!
//! let engine = TriageEngine::canonical()?;
//! let assessment = engine.assess(&vitals)?;
//! ```
//!
//! ## Priority
//!
//! High rules are always evaluated before Medium rules, and a level is never
//! downgraded once a rule at that level fires. Anything that fires no rule is
//! Low.

pub mod engine;
pub mod keywords;
pub mod rule;

pub use engine::TriageEngine;
pub use keywords::{symptom_fragments, SymptomMatcher};
pub use rule::{RuleUrgency, TriageRule, TriageTable, VitalTrigger};

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use healthwise_contracts::{
        assessment::{UrgencyLevel, DISCLAIMER},
        error::HealthwiseError,
        vitals::VitalSigns,
    };
    use healthwise_core::traits::UrgencyAssessor;

    use crate::{TriageEngine, TriageTable};

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn vitals(heart_rate: f64, systolic: f64, diastolic: f64, oxygen: f64, symptoms: &str) -> VitalSigns {
        VitalSigns {
            heart_rate,
            blood_pressure_systolic: systolic,
            blood_pressure_diastolic: diastolic,
            oxygen_saturation: oxygen,
            symptoms: symptoms.to_string(),
        }
    }

    fn engine() -> TriageEngine {
        TriageEngine::canonical().unwrap()
    }

    fn level(v: &VitalSigns) -> UrgencyLevel {
        engine().assess(v).unwrap().urgency_level
    }

    // ── 1. canonical scenarios ────────────────────────────────────────────────

    #[test]
    fn test_normal_vitals_mild_symptom_is_low() {
        let assessment = engine().assess(&vitals(80.0, 120.0, 80.0, 98.0, "mild fatigue")).unwrap();
        assert_eq!(assessment.urgency_level, UrgencyLevel::Low);
        assert!(assessment.explanation.contains("stable"));
        assert!(
            !assessment.explanation.contains("mildly elevated"),
            "120/80 must not carry the blood pressure note: {}",
            assessment.explanation
        );
    }

    #[test]
    fn test_chest_pain_overrides_normal_vitals() {
        let assessment = engine().assess(&vitals(80.0, 120.0, 80.0, 98.0, "chest pain")).unwrap();
        assert_eq!(assessment.urgency_level, UrgencyLevel::High);
        assert!(
            assessment.explanation.contains("chest pain"),
            "explanation should cite the symptom: {}",
            assessment.explanation
        );
        assert!(assessment.next_steps.starts_with(UrgencyLevel::High.guidance()));
    }

    #[test]
    fn test_tachycardia_with_dizziness_is_medium() {
        let assessment = engine().assess(&vitals(110.0, 150.0, 95.0, 96.0, "dizziness")).unwrap();
        assert_eq!(assessment.urgency_level, UrgencyLevel::Medium);
        assert!(assessment.explanation.contains("110 BPM"), "{}", assessment.explanation);
        assert!(assessment.explanation.contains("dizziness"), "{}", assessment.explanation);
    }

    // ── 2. high-urgency thresholds ────────────────────────────────────────────

    #[test]
    fn test_low_oxygen_is_always_high() {
        for oxygen in [70.0, 85.0, 89.0, 89.9] {
            for heart_rate in [45.0, 80.0, 120.0] {
                for (systolic, diastolic) in [(120.0, 80.0), (165.0, 105.0), (135.0, 88.0)] {
                    let v = vitals(heart_rate, systolic, diastolic, oxygen, "mild fatigue");
                    assert_eq!(level(&v), UrgencyLevel::High, "oxygen {oxygen} must be High");
                }
            }
        }
    }

    #[test]
    fn test_hypertensive_crisis_is_always_high() {
        for (systolic, diastolic) in [(180.0, 80.0), (240.0, 100.0), (150.0, 120.0), (120.0, 140.0)] {
            for oxygen in [92.0, 98.0] {
                let v = vitals(80.0, systolic, diastolic, oxygen, "");
                assert_eq!(level(&v), UrgencyLevel::High, "{systolic}/{diastolic} must be High");
            }
        }
        let assessment = engine().assess(&vitals(80.0, 185.0, 90.0, 98.0, "")).unwrap();
        assert!(assessment.explanation.contains("Hypertensive crisis"));
        assert!(assessment.explanation.contains("185/90 mmHg"));
    }

    #[test]
    fn test_shock_and_heart_rate_extremes_are_high() {
        assert_eq!(level(&vitals(80.0, 85.0, 70.0, 98.0, "")), UrgencyLevel::High);
        assert_eq!(level(&vitals(80.0, 110.0, 55.0, 98.0, "")), UrgencyLevel::High);
        assert_eq!(level(&vitals(131.0, 120.0, 80.0, 98.0, "")), UrgencyLevel::High);
        assert_eq!(level(&vitals(39.0, 120.0, 80.0, 98.0, "")), UrgencyLevel::High);
    }

    #[test]
    fn test_every_high_keyword_is_high() {
        for symptom in [
            "chest pain",
            "difficulty breathing",
            "fainting",
            "loss of consciousness",
            "uncontrolled bleeding",
            "seizure",
            "sudden numbness in left arm",
            "sudden weakness",
            "trouble speaking",
            "vision loss",
        ] {
            let v = vitals(80.0, 120.0, 80.0, 98.0, symptom);
            assert_eq!(level(&v), UrgencyLevel::High, "'{symptom}' must be High");
        }
    }

    // ── 3. medium-urgency bands and boundaries ────────────────────────────────

    #[test]
    fn test_medium_bands() {
        assert_eq!(level(&vitals(80.0, 160.0, 80.0, 98.0, "")), UrgencyLevel::Medium);
        assert_eq!(level(&vitals(80.0, 179.0, 80.0, 98.0, "")), UrgencyLevel::Medium);
        assert_eq!(level(&vitals(80.0, 120.0, 100.0, 98.0, "")), UrgencyLevel::Medium);
        assert_eq!(level(&vitals(80.0, 120.0, 119.0, 98.0, "")), UrgencyLevel::Medium);
        assert_eq!(level(&vitals(130.0, 120.0, 80.0, 98.0, "")), UrgencyLevel::Medium);
        assert_eq!(level(&vitals(101.0, 120.0, 80.0, 98.0, "")), UrgencyLevel::Medium);
        assert_eq!(level(&vitals(40.0, 120.0, 80.0, 98.0, "")), UrgencyLevel::Medium);
        assert_eq!(level(&vitals(49.0, 120.0, 80.0, 98.0, "")), UrgencyLevel::Medium);
        assert_eq!(level(&vitals(80.0, 120.0, 80.0, 90.0, "")), UrgencyLevel::Medium);
        assert_eq!(level(&vitals(80.0, 120.0, 80.0, 93.0, "")), UrgencyLevel::Medium);
    }

    #[test]
    fn test_band_edges_that_stay_low() {
        assert_eq!(level(&vitals(100.0, 120.0, 80.0, 98.0, "")), UrgencyLevel::Low);
        assert_eq!(level(&vitals(50.0, 120.0, 80.0, 98.0, "")), UrgencyLevel::Low);
        assert_eq!(level(&vitals(80.0, 159.0, 99.0, 94.0, "")), UrgencyLevel::Low);
        assert_eq!(level(&vitals(80.0, 90.0, 60.0, 98.0, "")), UrgencyLevel::Low);
    }

    #[test]
    fn test_every_medium_keyword_is_medium() {
        for symptom in [
            "severe headache",
            "dizziness",
            "abdominal pain",
            "high fever",
            "persistent vomiting",
            "persistent diarrhea",
            "confusion",
        ] {
            let v = vitals(80.0, 120.0, 80.0, 98.0, symptom);
            assert_eq!(level(&v), UrgencyLevel::Medium, "'{symptom}' must be Medium");
        }
    }

    #[test]
    fn test_high_is_never_downgraded_by_medium_findings() {
        let assessment = engine()
            .assess(&vitals(120.0, 170.0, 110.0, 92.0, "dizziness, Chest Pain"))
            .unwrap();
        assert_eq!(assessment.urgency_level, UrgencyLevel::High);
        assert!(
            !assessment.explanation.contains("dizziness"),
            "only High findings are cited: {}",
            assessment.explanation
        );
    }

    // ── 4. low-urgency explanation ────────────────────────────────────────────

    #[test]
    fn test_mildly_elevated_blood_pressure_note() {
        let assessment = engine().assess(&vitals(75.0, 135.0, 82.0, 97.0, "")).unwrap();
        assert_eq!(assessment.urgency_level, UrgencyLevel::Low);
        assert!(
            assessment.explanation.contains("135/82 mmHg") && assessment.explanation.contains("mildly elevated"),
            "unexpected explanation: {}",
            assessment.explanation
        );

        let assessment = engine().assess(&vitals(75.0, 125.0, 86.0, 97.0, "")).unwrap();
        assert!(assessment.explanation.contains("mildly elevated"));
    }

    // ── 5. invariants ─────────────────────────────────────────────────────────

    #[test]
    fn test_disclaimer_on_every_level() {
        for v in [
            vitals(80.0, 120.0, 80.0, 98.0, ""),
            vitals(110.0, 150.0, 95.0, 96.0, ""),
            vitals(80.0, 120.0, 80.0, 85.0, ""),
        ] {
            let assessment = engine().assess(&v).unwrap();
            assert!(assessment.next_steps.contains("not a substitute for professional medical advice"));
            assert!(assessment.next_steps.ends_with(DISCLAIMER));
        }
    }

    #[test]
    fn test_blank_symptoms_do_not_fail() {
        for symptoms in ["", "   ", ",,, ,", "\n\t"] {
            let assessment = engine().assess(&vitals(80.0, 120.0, 80.0, 98.0, symptoms)).unwrap();
            assert_eq!(assessment.urgency_level, UrgencyLevel::Low);
        }
    }

    #[test]
    fn test_same_input_same_output() {
        let engine = engine();
        let v = vitals(140.0, 200.0, 50.0, 80.0, "seizure, chest pain");
        let first = engine.assess(&v).unwrap();
        for _ in 0..10 {
            assert_eq!(engine.assess(&v).unwrap(), first);
        }
    }

    #[test]
    fn test_level_independent_of_rule_order() {
        let mut table = TriageTable::canonical().unwrap();
        table.rules.reverse();
        let reversed = TriageEngine::new(table);
        let canonical = engine();

        for v in [
            vitals(140.0, 200.0, 50.0, 80.0, "seizure"),
            vitals(110.0, 150.0, 95.0, 96.0, "dizziness"),
            vitals(80.0, 120.0, 80.0, 98.0, "mild fatigue"),
            vitals(45.0, 165.0, 80.0, 91.0, ""),
        ] {
            assert_eq!(
                canonical.classify(&v).unwrap(),
                reversed.classify(&v).unwrap(),
                "level must not depend on rule order for {:?}",
                v
            );
        }
    }

    #[test]
    fn test_non_finite_reading_is_invalid_input() {
        match engine().assess(&vitals(f64::NAN, 120.0, 80.0, 98.0, "")) {
            Err(HealthwiseError::InvalidInput { reason }) => {
                assert!(reason.contains("heart rate"), "unexpected reason: {reason}");
            }
            other => panic!("expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_values_are_best_effort() {
        assert_eq!(level(&vitals(0.0, 0.0, 0.0, 0.0, "")), UrgencyLevel::High);
        assert_eq!(level(&vitals(80.0, 120.0, 80.0, 120.0, "")), UrgencyLevel::Low);
    }

    // ── 6. table loading ──────────────────────────────────────────────────────

    #[test]
    fn test_canonical_table_order() {
        let engine = engine();
        let ids: Vec<&str> = engine.table().rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "hypertensive-crisis",
                "possible-shock",
                "critical-heart-rate",
                "severe-hypoxia",
                "high-urgency-symptoms",
                "elevated-blood-pressure",
                "abnormal-heart-rate",
                "low-oxygen",
                "medium-urgency-symptoms",
            ]
        );
        assert_eq!(engine.table().stable.advisories.len(), 1);
    }

    #[test]
    fn test_custom_table() {
        let toml = r#"
            [[rules]]
            id = "fever"
            urgency = "medium"
            explanation = "Fever reported: {symptoms}."
            symptoms = ["fever"]

            [stable]
            explanation = "Nothing of note."
        "#;

        let engine = TriageEngine::from_toml_str(toml).unwrap();
        let assessment = engine.assess(&vitals(80.0, 120.0, 80.0, 98.0, "Mild fever")).unwrap();
        assert_eq!(assessment.urgency_level, UrgencyLevel::Medium);
        assert_eq!(assessment.explanation, "Fever reported: fever.");
    }

    #[test]
    fn test_low_urgency_rule_rejected() {
        let toml = r#"
            [[rules]]
            id = "calm"
            urgency = "low"
            explanation = "calm"
            symptoms = ["calm"]

            [stable]
            explanation = "stable"
        "#;

        assert!(matches!(
            TriageTable::from_toml_str(toml),
            Err(HealthwiseError::ConfigError { .. })
        ));
    }

    #[test]
    fn test_malformed_table_is_config_error() {
        match TriageTable::from_toml_str("this is not valid toml ][[[") {
            Err(HealthwiseError::ConfigError { reason }) => {
                assert!(reason.contains("failed to parse triage table TOML"), "got: {reason}");
            }
            other => panic!("expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_validation_errors() {
        let unbounded = r#"
            [[rules]]
            id = "empty-trigger"
            urgency = "high"
            explanation = "x"
            triggers = [{ vital = "heart-rate" }]

            [stable]
            explanation = "stable"
        "#;
        let unknown_placeholder = r#"
            [[rules]]
            id = "bad-template"
            urgency = "high"
            explanation = "Temperature {temperature}"
            triggers = [{ vital = "heart-rate", above = 150.0 }]

            [stable]
            explanation = "stable"
        "#;
        let duplicate = r#"
            [[rules]]
            id = "dup"
            urgency = "high"
            explanation = "a"
            symptoms = ["a"]

            [[rules]]
            id = "dup"
            urgency = "medium"
            explanation = "b"
            symptoms = ["b"]

            [stable]
            explanation = "stable"
        "#;
        let no_conditions = r#"
            [[rules]]
            id = "nothing"
            urgency = "medium"
            explanation = "never fires"

            [stable]
            explanation = "stable"
        "#;

        for (toml, expected) in [
            (unbounded, "sets no bound"),
            (unknown_placeholder, "unknown placeholder '{temperature}'"),
            (duplicate, "duplicate triage rule id 'dup'"),
            (no_conditions, "no triggers and no symptom keywords"),
        ] {
            match TriageTable::from_toml_str(toml) {
                Err(HealthwiseError::ConfigError { reason }) => {
                    assert!(reason.contains(expected), "expected '{expected}' in: {reason}");
                }
                other => panic!("expected ConfigError, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_missing_table_file_is_config_error() {
        let result = TriageEngine::from_file(std::path::Path::new("/nonexistent/triage.toml"));
        assert!(matches!(result, Err(HealthwiseError::ConfigError { .. })));
    }
}
