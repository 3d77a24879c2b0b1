//! # healthwise-core
//!
//! The seams every HealthWise flow is built on.
//!
//! This crate provides:
//! - The three core traits (`UrgencyAssessor`, `TextGenerator`, `ResponseVerifier`)
//! - `PromptTemplate`, which fills a flow's fixed prompt from its input
//! - `StructuredFlow`, which runs render → generate → verify → deserialize
//!
//! ## Usage
//!
//! ```rust,ignore
//! use healthwise_core::{StructuredFlow, traits::{TextGenerator, ResponseVerifier}};
//! ```

pub mod generator;
pub mod prompt;
pub mod runner;
pub mod traits;

pub use generator::CannedGenerator;
pub use prompt::PromptTemplate;
pub use runner::StructuredFlow;
