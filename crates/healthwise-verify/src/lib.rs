//! # healthwise-verify
//!
//! Response contract verification for HealthWise generative flows.
//!
//! This crate provides [`engine::ContractVerifier`], which implements the
//! [`healthwise_core::traits::ResponseVerifier`] trait. A model reply is
//! checked in two phases:
//!
//! 1. **Structural** — JSON Schema validation via the `jsonschema` crate.
//! 2. **Semantic** — contract rules (`RequiredField`, `AllowedValues`,
//!    `ForbiddenPattern`, `Custom`) evaluated against the payload.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use healthwise_verify::engine::ContractVerifier;
//!
//! let mut verifier = ContractVerifier::new();
//! verifier.register_check("calories-add-up", Box::new(|payload| {
//!     // return Some(message) on failure
//!     None
//! }));
//! ```

pub mod engine;

pub use engine::{ContractCheckFn, ContractVerifier};
