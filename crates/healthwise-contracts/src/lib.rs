//! # healthwise-contracts
//!
//! Shared types, response contracts, and errors for the HealthWise Hub flows.
//!
//! Every crate in the workspace imports from here. No business logic lives in
//! this crate, only data definitions and the error type.

pub mod assessment;
pub mod contract;
pub mod error;
pub mod generation;
pub mod vitals;
