use mstrack_core::models::indicator::Tier;

use crate::ranges::RangeTable;

/// How a value was assigned its tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The value lies inside the tier's interval.
    Matched(Tier),
    /// No interval contains the value (negative, in a table gap, or NaN).
    /// Resolves to Critical.
    Fallthrough,
}

impl Classification {
    pub fn tier(&self) -> Tier {
        match self {
            Classification::Matched(tier) => *tier,
            Classification::Fallthrough => Tier::Critical,
        }
    }

    pub fn is_fallthrough(&self) -> bool {
        matches!(self, Classification::Fallthrough)
    }
}

/// Classify `value` against `table`, reporting whether the tier came from an
/// explicit interval or from the default-to-Critical fallthrough.
///
/// Normal is checked first, then Alert, then Critical.
pub fn classify_detailed(value: f64, table: &RangeTable) -> Classification {
    if table.normal.contains(value) {
        Classification::Matched(Tier::Normal)
    } else if table.alert.contains(value) {
        Classification::Matched(Tier::Alert)
    } else if table.critical.contains(value) {
        Classification::Matched(Tier::Critical)
    } else {
        tracing::debug!(
            value,
            kind = %table.kind,
            "value matched no interval, defaulting to critical"
        );
        Classification::Fallthrough
    }
}

/// Map a value to a tier. Anything outside Normal and Alert is Critical.
pub fn classify(value: f64, table: &RangeTable) -> Tier {
    classify_detailed(value, table).tier()
}
