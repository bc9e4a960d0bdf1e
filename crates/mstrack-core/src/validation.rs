//! Boundary validation for clinical input.
//!
//! The indicator engine is only defined on valid input, so every entry point
//! that accepts user data runs these checks first. Nothing here clamps: an
//! out-of-domain value is always an [`CoreError::InvalidInput`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Inclusive numeric scale with an optional step.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScaleRange {
    pub min: f64,
    pub max: f64,
    pub step: Option<f64>,
}

impl ScaleRange {
    pub fn contains(&self, value: f64) -> bool {
        if !value.is_finite() || value < self.min || value > self.max {
            return false;
        }
        if let Some(step) = self.step {
            let offset = value - self.min;
            let remainder = offset % step;
            // Allow floating point tolerance
            remainder < 1e-9 || (step - remainder) < 1e-9
        } else {
            true
        }
    }
}

/// Expanded Disability Status Scale: 0.0–10.0 in 0.5 steps.
pub const EDSS_SCALE: ScaleRange = ScaleRange {
    min: 0.0,
    max: 10.0,
    step: Some(0.5),
};

pub fn validate_edss(field: &str, value: f64) -> Result<f64, CoreError> {
    if EDSS_SCALE.contains(value) {
        Ok(value)
    } else {
        Err(CoreError::invalid(
            field,
            format!(
                "EDSS {value} must be within [{}, {}] in steps of 0.5",
                EDSS_SCALE.min, EDSS_SCALE.max
            ),
        ))
    }
}

/// Model confidence: 0–10, any finite value.
pub const CONFIDENCE_SCALE: ScaleRange = ScaleRange {
    min: 0.0,
    max: 10.0,
    step: None,
};

pub fn validate_confidence(field: &str, value: f64) -> Result<f64, CoreError> {
    if CONFIDENCE_SCALE.contains(value) {
        Ok(value)
    } else {
        Err(CoreError::invalid(
            field,
            format!(
                "confidence {value} must be within [{}, {}]",
                CONFIDENCE_SCALE.min, CONFIDENCE_SCALE.max
            ),
        ))
    }
}

pub fn validate_count(field: &str, value: i64) -> Result<u32, CoreError> {
    if value < 0 {
        return Err(CoreError::invalid(field, format!("count {value} must not be negative")));
    }
    u32::try_from(value)
        .map_err(|_| CoreError::invalid(field, format!("count {value} is out of range")))
}

/// An observation period must not run backwards. Zero length is allowed.
pub fn validate_period(start: jiff::Timestamp, end: jiff::Timestamp) -> Result<(), CoreError> {
    if end < start {
        return Err(CoreError::invalid(
            "period_end",
            format!("period end {end} precedes period start {start}"),
        ));
    }
    Ok(())
}

pub fn validate_age(age: u32) -> Result<u32, CoreError> {
    if age == 0 || age >= 120 {
        return Err(CoreError::invalid("age", format!("age {age} must be between 1 and 119")));
    }
    Ok(age)
}

pub fn validate_diagnosis_date(
    date: jiff::civil::Date,
    today: jiff::civil::Date,
) -> Result<(), CoreError> {
    if date > today {
        return Err(CoreError::invalid(
            "diagnosis_date",
            format!("diagnosis date {date} is in the future"),
        ));
    }
    Ok(())
}

/// Midnight UTC on the diagnosis date, the start of the ARR observation period.
pub fn diagnosis_start(date: jiff::civil::Date) -> Result<jiff::Timestamp, CoreError> {
    Ok(date.to_zoned(jiff::tz::TimeZone::UTC)?.timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edss_accepts_half_steps() {
        for v in [0.0, 0.5, 5.5, 6.0, 9.5, 10.0] {
            assert_eq!(validate_edss("edss", v).unwrap(), v);
        }
    }

    #[test]
    fn edss_rejects_out_of_domain() {
        for v in [-0.5, 7.3, 10.5, f64::NAN, f64::INFINITY] {
            assert!(validate_edss("edss", v).is_err(), "{v} should be rejected");
        }
    }

    #[test]
    fn confidence_is_continuous_on_zero_to_ten() {
        for v in [0.0, 3.7, 10.0] {
            assert_eq!(validate_confidence("confidence", v).unwrap(), v);
        }
        for v in [-0.01, 10.01, f64::NAN, f64::NEG_INFINITY] {
            assert!(validate_confidence("confidence", v).is_err(), "{v} should be rejected");
        }
    }

    #[test]
    fn counts_reject_negatives() {
        assert_eq!(validate_count("relapses", 0).unwrap(), 0);
        assert_eq!(validate_count("relapses", 4).unwrap(), 4);
        assert!(validate_count("relapses", -1).is_err());
        assert!(validate_count("relapses", i64::MAX).is_err());
    }

    #[test]
    fn period_may_be_empty_but_not_reversed() {
        let t = jiff::Timestamp::from_second(1_700_000_000).unwrap();
        let earlier = jiff::Timestamp::from_second(1_600_000_000).unwrap();
        assert!(validate_period(t, t).is_ok());
        assert!(validate_period(earlier, t).is_ok());
        assert!(validate_period(t, earlier).is_err());
    }

    #[test]
    fn age_bounds() {
        assert!(validate_age(0).is_err());
        assert!(validate_age(1).is_ok());
        assert!(validate_age(119).is_ok());
        assert!(validate_age(120).is_err());
    }

    #[test]
    fn diagnosis_starts_at_utc_midnight() {
        let start = diagnosis_start(jiff::civil::date(1970, 1, 2)).unwrap();
        assert_eq!(start.as_second(), 86_400);
    }
}
