use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;
use crate::validation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum VisitStatus {
    Pending,
    Completed,
    Cancelled,
}

/// A scheduled or completed clinical visit.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Visit {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub visit_date: jiff::Timestamp,
    /// 1-based, assigned by the store on creation.
    pub visit_number: u32,
    pub status: VisitStatus,
    pub notes: Option<String>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Visit {
    /// A pending visit. The visit number is left at 0 until the store assigns it.
    pub fn scheduled(patient_id: Uuid, visit_date: jiff::Timestamp, now: jiff::Timestamp) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_id,
            visit_date,
            visit_number: 0,
            status: VisitStatus::Pending,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Visit reference values consumed by the indicator engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VisitSnapshot {
    pub visit_date: jiff::Timestamp,
    /// T2 lesion count recorded at the prior visit, if any.
    pub previous_t2_lesions: Option<u32>,
}

/// Raw clinical entries for one visit, as collected from the clinician.
///
/// Counts are signed so that out-of-domain input survives deserialization
/// and is rejected by [`VisitMeasurements::validate`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VisitMeasurements {
    pub relapse_count: i64,
    pub t1_gd_lesions: i64,
    pub t2_lesions: i64,
    pub current_edss: f64,
}

/// Measurements that passed boundary validation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidMeasurements {
    pub relapse_count: u32,
    pub t1_gd_lesions: u32,
    pub t2_lesions: u32,
    pub current_edss: f64,
}

impl VisitMeasurements {
    pub fn validate(&self) -> Result<ValidMeasurements, CoreError> {
        Ok(ValidMeasurements {
            relapse_count: validation::validate_count("relapse_count", self.relapse_count)?,
            t1_gd_lesions: validation::validate_count("t1_gd_lesions", self.t1_gd_lesions)?,
            t2_lesions: validation::validate_count("t2_lesions", self.t2_lesions)?,
            current_edss: validation::validate_edss("current_edss", self.current_edss)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurements() -> VisitMeasurements {
        VisitMeasurements {
            relapse_count: 1,
            t1_gd_lesions: 0,
            t2_lesions: 12,
            current_edss: 3.5,
        }
    }

    #[test]
    fn valid_measurements_convert() {
        let valid = measurements().validate().unwrap();
        assert_eq!(valid.relapse_count, 1);
        assert_eq!(valid.t2_lesions, 12);
        assert_eq!(valid.current_edss, 3.5);
    }

    #[test]
    fn negative_count_is_rejected() {
        let mut m = measurements();
        m.t1_gd_lesions = -1;
        let err = m.validate().unwrap_err();
        assert!(
            matches!(err, CoreError::InvalidInput { ref field, .. } if field == "t1_gd_lesions")
        );
    }

    #[test]
    fn out_of_scale_edss_is_rejected() {
        let mut m = measurements();
        m.current_edss = 10.5;
        assert!(m.validate().is_err());
    }

    #[test]
    fn scheduled_visit_starts_pending() {
        let now = jiff::Timestamp::UNIX_EPOCH;
        let visit = Visit::scheduled(Uuid::new_v4(), now, now);
        assert_eq!(visit.status, VisitStatus::Pending);
        assert_eq!(visit.visit_number, 0);
    }
}
