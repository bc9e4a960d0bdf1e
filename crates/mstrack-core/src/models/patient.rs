use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;
use crate::validation;

/// Clinical course of Multiple Sclerosis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum MsType {
    /// RRMS.
    RelapsingRemitting,
    /// SPMS.
    SecondaryProgressive,
    /// PPMS.
    PrimaryProgressive,
}

impl MsType {
    pub fn abbreviation(&self) -> &'static str {
        match self {
            MsType::RelapsingRemitting => "RRMS",
            MsType::SecondaryProgressive => "SPMS",
            MsType::PrimaryProgressive => "PPMS",
        }
    }
}

impl fmt::Display for MsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

impl FromStr for MsType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rrms" | "relapsing_remitting" => Ok(MsType::RelapsingRemitting),
            "spms" | "secondary_progressive" => Ok(MsType::SecondaryProgressive),
            "ppms" | "primary_progressive" => Ok(MsType::PrimaryProgressive),
            _ => Err(CoreError::UnknownMsType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Patient {
    pub id: Uuid,
    pub full_name: String,
    pub age: u32,
    pub gender: String,
    pub ms_type: MsType,
    /// Baseline EDSS, 0.0–10.0 in 0.5 steps.
    pub baseline_edss: f64,
    pub current_treatment: Option<String>,
    pub diagnosis_date: jiff::civil::Date,
    pub active: bool,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Patient {
    /// The read-only view the indicator engine needs.
    pub fn snapshot(&self) -> PatientSnapshot {
        PatientSnapshot {
            baseline_edss: self.baseline_edss,
            diagnosis_date: self.diagnosis_date,
        }
    }

    /// Check the registration fields. `today` bounds the diagnosis date.
    pub fn validate(&self, today: jiff::civil::Date) -> Result<(), CoreError> {
        if self.full_name.trim().is_empty() {
            return Err(CoreError::invalid("full_name", "must not be empty"));
        }
        if self.full_name.chars().count() > 255 {
            return Err(CoreError::invalid("full_name", "must be at most 255 characters"));
        }
        validation::validate_age(self.age)?;
        validation::validate_edss("baseline_edss", self.baseline_edss)?;
        validation::validate_diagnosis_date(self.diagnosis_date, today)?;
        Ok(())
    }
}

/// Patient reference values consumed by the indicator engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatientSnapshot {
    pub baseline_edss: f64,
    pub diagnosis_date: jiff::civil::Date,
}
