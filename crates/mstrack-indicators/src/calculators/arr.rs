use serde::Serialize;
use tracing::info;

use mstrack_core::models::indicator::Tier;

use crate::classify::classify;
use crate::justification;
use crate::ranges;

/// Seconds in a Julian year (365.25 days).
pub const SECONDS_PER_YEAR: f64 = 365.25 * 86_400.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrOutcome {
    /// Relapses per patient-year, rounded to two decimals.
    pub value: f64,
    /// Patient-years actually divided by (1.0 for an empty period).
    pub patient_years: f64,
    pub tier: Tier,
    pub justification: String,
}

/// Annualized relapse rate over `[period_start, period_end]`.
///
/// A zero-length period is treated as one patient-year. The caller is
/// responsible for `period_end >= period_start`.
pub fn calculate_arr(
    relapse_count: u32,
    period_start: jiff::Timestamp,
    period_end: jiff::Timestamp,
) -> ArrOutcome {
    let nanos = period_end.as_nanosecond() - period_start.as_nanosecond();
    let mut patient_years = nanos as f64 / 1e9 / SECONDS_PER_YEAR;

    if patient_years == 0.0 {
        tracing::debug!("empty observation period, using 1.0 patient-years");
        patient_years = 1.0;
    }

    let value = round2(f64::from(relapse_count) / patient_years);
    let tier = classify(value, &ranges::ARR);
    let justification = justification::arr(tier, value);

    info!(relapse_count, patient_years, value, %tier, "ARR calculated");

    ArrOutcome {
        value,
        patient_years,
        tier,
        justification,
    }
}

/// Round to two decimal places, half to even, on the shortest decimal
/// representation of `value`.
///
/// Rounding the printed form rather than the binary value means 0.125 goes
/// to 0.12 and 0.135 to 0.14, which is what a clinician reading the
/// unrounded rate would expect.
fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    round_decimal_str(&value.to_string()).unwrap_or(value)
}

fn round_decimal_str(text: &str) -> Option<f64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if fraction.len() <= 2 {
        return text.parse().ok();
    }

    let (kept, dropped) = fraction.split_at(2);
    let mut hundredths = whole.parse::<u128>().ok()? * 100 + kept.parse::<u128>().ok()?;

    let mut dropped = dropped.bytes();
    let first = dropped.next()?;
    let tail_nonzero = dropped.any(|b| b != b'0');
    let round_up = match first {
        b'6'..=b'9' => true,
        b'5' => tail_nonzero || hundredths % 2 == 1,
        _ => false,
    };
    if round_up {
        hundredths += 1;
    }

    let rounded = hundredths as f64 / 100.0;
    Some(if negative { -rounded } else { rounded })
}
