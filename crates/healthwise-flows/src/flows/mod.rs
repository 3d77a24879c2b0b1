//! One module per application flow.

pub mod attenders;
pub mod diet_plan;
pub mod first_aid;
pub mod risk;
pub mod symptom_checker;
pub mod urgency;
