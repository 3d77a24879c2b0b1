//! Fictional sample entries for the attender directory.

use crate::flows::attenders::Attender;

fn attender(name: &str, address: &str, contact: &str, services: &[&str]) -> Attender {
    Attender {
        name: name.to_string(),
        address: address.to_string(),
        contact: contact.to_string(),
        services: services.iter().map(|s| s.to_string()).collect(),
    }
}

/// `(location, attenders)` pairs.
pub fn sample_attenders() -> Vec<(&'static str, Vec<Attender>)> {
    vec![
        (
            "Chennai, TN",
            vec![
                attender(
                    "Chennai Senior Care",
                    "123 Anna Salai, Chennai, TN",
                    "044-12345678",
                    &["In-home care", "Meal prep"],
                ),
                attender(
                    "Marina Home Health",
                    "456 Beach Rd, Chennai, TN",
                    "044-87654321",
                    &["24/7 support", "Medical reminders"],
                ),
            ],
        ),
        (
            "Coimbatore, TN",
            vec![attender(
                "Kovai Elder Services",
                "789 Race Course Rd, Coimbatore, TN",
                "0422-98765432",
                &["Companionship", "Personal care"],
            )],
        ),
    ]
}
