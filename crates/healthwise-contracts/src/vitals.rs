//! Vital-sign input types.
//!
//! A `VitalSigns` value is built fresh for every assessment request and
//! discarded once the assessment is returned. Field names serialize in
//! camelCase to match the form payloads the application submits.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{HealthwiseError, HealthwiseResult};

/// The measured and reported inputs to one urgency assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    /// Heart rate in beats per minute. Forms constrain this to [30, 220].
    pub heart_rate: f64,
    /// Systolic blood pressure in mmHg. Forms constrain this to [50, 250].
    pub blood_pressure_systolic: f64,
    /// Diastolic blood pressure in mmHg. Forms constrain this to [30, 150].
    pub blood_pressure_diastolic: f64,
    /// Peripheral oxygen saturation in percent. Forms constrain this to [70, 100].
    pub oxygen_saturation: f64,
    /// Free-text, comma-separated list of symptom phrases. Required on the
    /// wire, but may be the empty string.
    pub symptoms: String,
}

impl VitalSigns {
    /// Return the reading for a single numeric vital.
    pub fn reading(&self, vital: Vital) -> f64 {
        match vital {
            Vital::HeartRate => self.heart_rate,
            Vital::Systolic => self.blood_pressure_systolic,
            Vital::Diastolic => self.blood_pressure_diastolic,
            Vital::OxygenSaturation => self.oxygen_saturation,
        }
    }

    /// Reject readings that are NaN or infinite.
    ///
    /// Finite values outside the form ranges are accepted; classifiers treat
    /// them on a best-effort basis.
    pub fn ensure_finite(&self) -> HealthwiseResult<()> {
        for vital in Vital::ALL {
            let value = self.reading(vital);
            if !value.is_finite() {
                return Err(HealthwiseError::invalid_input(format!(
                    "{vital} must be a finite number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// The numeric vitals a triage rule can test.
///
/// Written in kebab-case in triage tables:
/// ```toml
/// vital = "heart-rate"
/// vital = "oxygen-saturation"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Vital {
    HeartRate,
    Systolic,
    Diastolic,
    OxygenSaturation,
}

impl Vital {
    pub const ALL: [Vital; 4] = [
        Vital::HeartRate,
        Vital::Systolic,
        Vital::Diastolic,
        Vital::OxygenSaturation,
    ];
}

impl fmt::Display for Vital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Vital::HeartRate => "heart rate",
            Vital::Systolic => "systolic blood pressure",
            Vital::Diastolic => "diastolic blood pressure",
            Vital::OxygenSaturation => "oxygen saturation",
        };
        f.write_str(name)
    }
}
