//! mstrack-indicators
//!
//! The clinical indicator engine. Pure, synchronous functions that turn raw
//! clinical observations into classified, explained indicator values.
//! No storage and no network: every call completes without awaiting I/O.

pub mod calculators;
pub mod classify;
pub mod error;
pub mod justification;
pub mod ranges;

pub use calculators::arr::{ArrOutcome, calculate_arr};
pub use calculators::cdp12::{Cdp12Outcome, evaluate_cdp12};
pub use calculators::neda3::{Neda3Criteria, Neda3Outcome, evaluate_neda3};
pub use calculators::t1_gd::{T1GdOutcome, classify_t1_gd};
pub use calculators::t2::{T2Outcome, calculate_t2_difference};
pub use classify::{Classification, classify, classify_detailed};

use error::IndicatorError;
use mstrack_core::models::indicator::IndicatorKind;
use ranges::RangeTable;

/// Return every range table the engine classifies against.
pub fn all_range_tables() -> [&'static RangeTable; 3] {
    [&ranges::ARR, &ranges::T1_GD, &ranges::T2_NEW]
}

/// Look up the range table for an indicator kind.
///
/// CDP-12 and NEDA-3 are decided by explicit rules, not a table.
pub fn range_table(kind: IndicatorKind) -> Result<&'static RangeTable, IndicatorError> {
    all_range_tables()
        .into_iter()
        .find(|t| t.kind == kind)
        .ok_or(IndicatorError::NoRangeTable(kind))
}

/// Look up a range table by indicator code (e.g. `"ARR"`).
pub fn range_table_for_code(code: &str) -> Result<&'static RangeTable, IndicatorError> {
    let kind = IndicatorKind::from_code(code)
        .ok_or_else(|| IndicatorError::UnknownIndicator(code.to_string()))?;
    range_table(kind)
}
