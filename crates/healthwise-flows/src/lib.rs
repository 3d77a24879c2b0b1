//! # healthwise-flows
//!
//! The flows behind the HealthWise Hub pages.
//!
//! Generative flows pair a fixed prompt with a response contract and run
//! through [`healthwise_core::StructuredFlow`]:
//!
//! 1. **Urgency assessment** — a model-backed `UrgencyAssessor`.
//! 2. **First aid** — step-by-step instructions for a stated problem.
//! 3. **Symptom checker** — possible conditions for a list of symptoms.
//! 4. **Diet plan** — meals and a shopping list for conditions and calories.
//! 5. **Risk explanation** — what a risk score means and how to lower it.
//!
//! The **medical-attender finder** is a lookup over an injected, read-only
//! directory; the sample directory holds fictional entries.

pub mod catalog;
pub mod flows;
pub mod mock_data;

pub use catalog::{contract_verifier, FlowKind};
