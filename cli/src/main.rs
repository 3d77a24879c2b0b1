//! HealthWise Hub operator CLI.
//!
//! Usage:
//!   healthwise assess --heart-rate 88 --systolic 150 --diastolic 95 --oxygen 97 --symptoms "headache"
//!   healthwise risk --condition diabetes --age 52 --bmi 31 --smoker --score 64
//!   healthwise attenders "Chennai, TN"
//!   healthwise prompt diet-plan --input request.json
//!   healthwise check-response urgency --response reply.json

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use healthwise_contracts::{
    assessment::UrgencyAssessment,
    error::{HealthwiseError, HealthwiseResult},
    vitals::VitalSigns,
};
use healthwise_core::traits::UrgencyAssessor;
use healthwise_flows::{
    contract_verifier,
    flows::{
        attenders::{find_medical_attenders, AttenderSearch, InMemoryAttenderDirectory},
        risk::{RiskCondition, RiskExplanationRequest, RiskProfile},
    },
    FlowKind,
};
use healthwise_triage::TriageEngine;

// ── CLI definition ────────────────────────────────────────────────────────────

/// HealthWise Hub — rule-based triage and flow tooling.
#[derive(Parser)]
#[command(
    name = "healthwise",
    about = "HealthWise Hub operator CLI",
    long_about = "Classifies vital signs with the rule-based triage table, searches the\n\
                  medical-attender directory, and renders or checks the prompts and\n\
                  responses of the model-backed flows."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify vital signs and symptoms into High / Medium / Low urgency.
    Assess {
        /// Heart rate in beats per minute.
        #[arg(long)]
        heart_rate: f64,
        /// Systolic blood pressure in mmHg.
        #[arg(long)]
        systolic: f64,
        /// Diastolic blood pressure in mmHg.
        #[arg(long)]
        diastolic: f64,
        /// Oxygen saturation in percent.
        #[arg(long)]
        oxygen: f64,
        /// Comma-separated symptoms.
        #[arg(long, default_value = "")]
        symptoms: String,
        /// Triage table to use instead of the built-in one.
        #[arg(long, value_name = "FILE")]
        table: Option<PathBuf>,
        /// Print the assessment as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Show the risk band and factors for a profile, and the explanation prompt.
    Risk {
        /// Heart Disease, Diabetes or Stroke.
        #[arg(long)]
        condition: RiskCondition,
        #[arg(long)]
        age: u32,
        #[arg(long)]
        bmi: f64,
        #[arg(long)]
        smoker: bool,
        #[arg(long)]
        family_history: bool,
        /// Risk score in percent (0-100).
        #[arg(long)]
        score: f64,
    },
    /// Search the sample medical-attender directory.
    Attenders {
        /// City and state, e.g. "Chennai, TN".
        location: String,
    },
    /// Render a flow's prompt from a JSON input file.
    Prompt {
        /// urgency, first-aid, symptom-checker, diet-plan or risk.
        flow: FlowKind,
        #[arg(long, value_name = "FILE")]
        input: PathBuf,
    },
    /// Check a saved model response against a flow's contract.
    CheckResponse {
        flow: FlowKind,
        #[arg(long, value_name = "FILE")]
        response: PathBuf,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Set RUST_LOG=debug for per-rule triage output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Command) -> HealthwiseResult<()> {
    match command {
        Command::Assess { heart_rate, systolic, diastolic, oxygen, symptoms, table, json } => {
            let vitals = VitalSigns {
                heart_rate,
                blood_pressure_systolic: systolic,
                blood_pressure_diastolic: diastolic,
                oxygen_saturation: oxygen,
                symptoms,
            };
            run_assess(&vitals, table.as_deref(), json)
        }
        Command::Risk { condition, age, bmi, smoker, family_history, score } => {
            let profile = RiskProfile {
                condition,
                age,
                bmi,
                is_smoker: smoker,
                has_family_history: family_history,
            };
            run_risk(&profile, score)
        }
        Command::Attenders { location } => run_attenders(location),
        Command::Prompt { flow, input } => run_prompt(flow, &input),
        Command::CheckResponse { flow, response } => run_check_response(flow, &response),
    }
}

// ── Subcommands ───────────────────────────────────────────────────────────────

fn run_assess(vitals: &VitalSigns, table: Option<&Path>, json: bool) -> HealthwiseResult<()> {
    let engine = match table {
        Some(path) => TriageEngine::from_file(path)?,
        None => TriageEngine::canonical()?,
    };
    debug!(
        rules = engine.table().rules.len(),
        custom = table.is_some(),
        "triage table loaded"
    );
    let assessment = engine.assess(vitals)?;

    if json {
        println!("{}", to_pretty_json(&assessment)?);
    } else {
        print_assessment(&assessment);
    }
    Ok(())
}

fn run_risk(profile: &RiskProfile, score: f64) -> HealthwiseResult<()> {
    let request = RiskExplanationRequest::from_profile(profile, score)?;
    let prompt = FlowKind::RiskExplanation.render_prompt(&to_value(&request)?)?;

    println!("Condition: {}", request.condition);
    println!("Risk:      {}% ({})", request.risk_score, request.band());
    println!("Factors:   {}", request.factors);
    println!();
    println!("Explanation prompt");
    println!("------------------");
    println!("{prompt}");
    Ok(())
}

fn run_attenders(location: String) -> HealthwiseResult<()> {
    let directory = InMemoryAttenderDirectory::with_sample_data();
    let result = find_medical_attenders(&directory, &AttenderSearch { location })?;

    println!("{}", result.response);
    for attender in &result.attenders {
        println!();
        println!("  {}", attender.name);
        println!("    Address:  {}", attender.address);
        println!("    Contact:  {}", attender.contact);
        println!("    Services: {}", attender.services.join(", "));
    }
    Ok(())
}

fn run_prompt(flow: FlowKind, input: &Path) -> HealthwiseResult<()> {
    let raw = read_file(input)?;
    let value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
        HealthwiseError::invalid_input(format!("{} is not valid JSON: {e}", input.display()))
    })?;
    println!("{}", flow.render_prompt(&value)?);
    Ok(())
}

fn run_check_response(flow: FlowKind, response: &Path) -> HealthwiseResult<()> {
    let reply = read_file(response)?;
    let accepted = flow.check_reply(&reply, &contract_verifier())?;
    debug!(flow = %flow, "response accepted");

    println!("Response conforms to the {} contract.", flow.flow_name());
    println!("{}", to_pretty_json(&accepted)?);
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn print_assessment(assessment: &UrgencyAssessment) {
    println!("Urgency:     {}", assessment.urgency_level);
    println!("Explanation: {}", assessment.explanation);
    println!();
    println!("Next steps:");
    println!("{}", assessment.next_steps);
}

fn read_file(path: &Path) -> HealthwiseResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        HealthwiseError::invalid_input(format!("failed to read {}: {e}", path.display()))
    })
}

fn to_value<T: serde::Serialize>(value: &T) -> HealthwiseResult<serde_json::Value> {
    serde_json::to_value(value)
        .map_err(|e| HealthwiseError::invalid_input(format!("failed to serialize input: {e}")))
}

fn to_pretty_json<T: serde::Serialize>(value: &T) -> HealthwiseResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| HealthwiseError::invalid_input(format!("failed to serialize output: {e}")))
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use healthwise_flows::{flows::risk::RiskCondition, FlowKind};

    use super::{Cli, Command};

    #[test]
    fn test_assess_arguments() {
        let cli = Cli::try_parse_from([
            "healthwise", "assess", "--heart-rate", "72", "--systolic", "118", "--diastolic", "76",
            "--oxygen", "98", "--json",
        ])
        .unwrap();
        match cli.command {
            Command::Assess { heart_rate, symptoms, table, json, .. } => {
                assert_eq!(heart_rate, 72.0);
                assert!(symptoms.is_empty());
                assert!(table.is_none());
                assert!(json);
            }
            _ => panic!("expected assess"),
        }
    }

    #[test]
    fn test_risk_condition_parses() {
        let cli = Cli::try_parse_from([
            "healthwise", "risk", "--condition", "heart-disease", "--age", "60", "--bmi", "29",
            "--smoker", "--score", "75",
        ])
        .unwrap();
        match cli.command {
            Command::Risk { condition, smoker, family_history, .. } => {
                assert_eq!(condition, RiskCondition::HeartDisease);
                assert!(smoker);
                assert!(!family_history);
            }
            _ => panic!("expected risk"),
        }
    }

    #[test]
    fn test_unknown_flow_is_rejected() {
        assert!(Cli::try_parse_from(["healthwise", "prompt", "triage", "--input", "x.json"]).is_err());
        let cli = Cli::try_parse_from(["healthwise", "prompt", "diet-plan", "--input", "x.json"]).unwrap();
        assert!(matches!(cli.command, Command::Prompt { flow: FlowKind::DietPlan, .. }));
    }
}
