//! Medical-attender search.
//!
//! Lookup is exact on the normalized location ("Chennai, TN" and
//! "  chennai,  tn " are the same key). Directories are read-only once
//! built.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use healthwise_contracts::error::{HealthwiseError, HealthwiseResult};

use crate::mock_data;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attender {
    /// Agency or individual name.
    pub name: String,
    pub address: String,
    /// Phone number or email.
    pub contact: String,
    /// e.g. "In-home care", "24/7 support".
    pub services: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttenderSearch {
    /// City and state, e.g. "Chennai, TN".
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttenderSearchResult {
    pub attenders: Vec<Attender>,
    /// Summary of the results, or a hint when nothing was found.
    pub response: String,
}

/// Read-only source of attenders by location.
pub trait AttenderDirectory: Send + Sync {
    /// Attenders serving `location`; empty when none are known.
    fn find(&self, location: &str) -> Vec<Attender>;
}

/// A directory held in memory, keyed by normalized location.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAttenderDirectory {
    entries: HashMap<String, Vec<Attender>>,
}

impl InMemoryAttenderDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fictional sample entries for Chennai and Coimbatore.
    pub fn with_sample_data() -> Self {
        let mut directory = Self::new();
        for (location, attenders) in mock_data::sample_attenders() {
            for attender in attenders {
                directory.insert(location, attender);
            }
        }
        directory
    }

    pub fn insert(&mut self, location: &str, attender: Attender) {
        self.entries
            .entry(normalize_location(location))
            .or_default()
            .push(attender);
    }

    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl AttenderDirectory for InMemoryAttenderDirectory {
    fn find(&self, location: &str) -> Vec<Attender> {
        self.entries
            .get(&normalize_location(location))
            .cloned()
            .unwrap_or_default()
    }
}

/// Lowercase, trim, and collapse whitespace runs (including around commas).
pub fn normalize_location(location: &str) -> String {
    location
        .split(',')
        .map(|part| part.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(", ")
        .to_lowercase()
}

/// Search `directory` for attenders near `search.location`.
///
/// A blank location is `InvalidInput`. An unknown location is not an error:
/// the result is empty and the message suggests a nearby city.
pub fn find_medical_attenders(
    directory: &dyn AttenderDirectory,
    search: &AttenderSearch,
) -> HealthwiseResult<AttenderSearchResult> {
    let location = search.location.trim();
    if location.is_empty() {
        return Err(HealthwiseError::invalid_input("enter a city and state to search"));
    }

    let attenders = directory.find(location);
    info!(location, found = attenders.len(), "medical attender search");

    let response = if attenders.is_empty() {
        format!("No medical attenders were found for {location}. Try searching a nearby city.")
    } else {
        let noun = if attenders.len() == 1 { "attender" } else { "attenders" };
        format!("Found {} medical {noun} in {location}.", attenders.len())
    };

    Ok(AttenderSearchResult { attenders, response })
}
