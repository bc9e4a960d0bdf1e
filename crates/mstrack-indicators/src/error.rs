use thiserror::Error;

use mstrack_core::models::indicator::IndicatorKind;

use crate::ranges::RangeViolation;

#[derive(Debug, Error)]
pub enum IndicatorError {
    #[error("unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("indicator {0} is not classified by a range table")]
    NoRangeTable(IndicatorKind),

    #[error("range table for {kind} is malformed: {violations:?}")]
    MalformedTable {
        kind: IndicatorKind,
        violations: Vec<RangeViolation>,
    },
}
