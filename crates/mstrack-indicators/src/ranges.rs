use serde::{Deserialize, Serialize};
use ts_rs::TS;

use mstrack_core::models::indicator::{IndicatorKind, Tier};

use crate::error::IndicatorError;

/// Inclusive interval `[low, high]`. `high: None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Interval {
    pub low: f64,
    pub high: Option<f64>,
}

impl Interval {
    pub const fn bounded(low: f64, high: f64) -> Self {
        Self {
            low,
            high: Some(high),
        }
    }

    pub const fn at_least(low: f64) -> Self {
        Self { low, high: None }
    }

    pub fn contains(&self, value: f64) -> bool {
        match self.high {
            Some(high) => self.low <= value && value <= high,
            None => self.low <= value,
        }
    }
}

/// Tier intervals for one indicator, ordered Normal → Alert → Critical by
/// increasing value.
///
/// Bounds are written at two-decimal precision, so adjacent intervals leave
/// a gap of at most `resolution` between them. Values that land in such a
/// gap are not matched by any interval and fall through to Critical.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RangeTable {
    pub kind: IndicatorKind,
    pub resolution: f64,
    pub normal: Interval,
    pub alert: Interval,
    pub critical: Interval,
}

/// A structural problem found by [`RangeTable::violations`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "type", rename_all = "snake_case")]
#[ts(export)]
pub enum RangeViolation {
    /// Normal does not start at zero.
    DoesNotStartAtZero { low: f64 },
    /// An interval's low bound exceeds its high bound.
    Inverted { tier: Tier },
    /// Two adjacent intervals share values.
    Overlap { lower: Tier, upper: Tier },
    /// Two adjacent intervals leave a gap wider than the table resolution.
    Gap { lower: Tier, upper: Tier, width: f64 },
    /// Only Critical may be unbounded, and it must be.
    Unbounded { tier: Tier },
    NotUnbounded,
}

impl RangeTable {
    pub fn interval(&self, tier: Tier) -> Interval {
        match tier {
            Tier::Normal => self.normal,
            Tier::Alert => self.alert,
            Tier::Critical => self.critical,
        }
    }

    pub fn violations(&self) -> Vec<RangeViolation> {
        let mut out = Vec::new();

        if self.normal.low != 0.0 {
            out.push(RangeViolation::DoesNotStartAtZero {
                low: self.normal.low,
            });
        }
        if self.critical.high.is_some() {
            out.push(RangeViolation::NotUnbounded);
        }

        for tier in Tier::ALL {
            let interval = self.interval(tier);
            if let Some(high) = interval.high
                && interval.low > high
            {
                out.push(RangeViolation::Inverted { tier });
            }
        }

        for (lower, upper) in [(Tier::Normal, Tier::Alert), (Tier::Alert, Tier::Critical)] {
            let Some(high) = self.interval(lower).high else {
                out.push(RangeViolation::Unbounded { tier: lower });
                continue;
            };
            let width = self.interval(upper).low - high;
            if width <= 0.0 {
                out.push(RangeViolation::Overlap { lower, upper });
            } else if width > self.resolution + 1e-9 {
                out.push(RangeViolation::Gap {
                    lower,
                    upper,
                    width,
                });
            }
        }

        out
    }

    pub fn ensure_well_formed(&self) -> Result<(), IndicatorError> {
        let violations = self.violations();
        if violations.is_empty() {
            Ok(())
        } else {
            Err(IndicatorError::MalformedTable {
                kind: self.kind,
                violations,
            })
        }
    }
}

/// Annualized relapse rate, relapses per patient-year.
pub static ARR: RangeTable = RangeTable {
    kind: IndicatorKind::AnnualizedRelapseRate,
    resolution: 0.01,
    normal: Interval::bounded(0.00, 0.09),
    alert: Interval::bounded(0.10, 0.19),
    critical: Interval::at_least(0.20),
};

/// T1 Gd+ lesions. The bounds are fractional although counts are integers:
/// 0 is Normal, any positive count is Critical, and Alert is unreachable
/// for integer input.
pub static T1_GD: RangeTable = RangeTable {
    kind: IndicatorKind::T1GdLesions,
    resolution: 0.01,
    normal: Interval::bounded(0.0, 0.02),
    alert: Interval::bounded(0.03, 0.49),
    critical: Interval::at_least(0.50),
};

/// New T2 lesions (delta over the previous scan). For integer deltas:
/// 0 is Normal, 1–2 Alert, 3+ Critical.
pub static T2_NEW: RangeTable = RangeTable {
    kind: IndicatorKind::NewT2Lesions,
    resolution: 0.01,
    normal: Interval::bounded(0.0, 0.30),
    alert: Interval::bounded(0.31, 2.80),
    critical: Interval::at_least(2.81),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_bounds_are_inclusive() {
        let i = Interval::bounded(0.10, 0.19);
        assert!(i.contains(0.10));
        assert!(i.contains(0.19));
        assert!(!i.contains(0.095));
        assert!(!i.contains(0.20));
        assert!(Interval::at_least(0.2).contains(1e12));
    }

    #[test]
    fn shipped_tables_are_well_formed() {
        for table in [&ARR, &T1_GD, &T2_NEW] {
            assert_eq!(table.violations(), vec![], "{:?}", table.kind);
            assert!(table.ensure_well_formed().is_ok());
        }
    }

    #[test]
    fn detects_overlap_and_gap() {
        let overlapping = RangeTable {
            alert: Interval::bounded(0.05, 0.19),
            ..ARR
        };
        assert!(overlapping.violations().contains(&RangeViolation::Overlap {
            lower: Tier::Normal,
            upper: Tier::Alert,
        }));

        let gapped = RangeTable {
            critical: Interval::at_least(0.5),
            ..ARR
        };
        assert!(matches!(
            gapped.violations().as_slice(),
            [RangeViolation::Gap {
                lower: Tier::Alert,
                upper: Tier::Critical,
                ..
            }]
        ));
        assert!(gapped.ensure_well_formed().is_err());
    }

    #[test]
    fn detects_bounded_critical_and_offset_start() {
        let table = RangeTable {
            normal: Interval::bounded(0.01, 0.09),
            critical: Interval::bounded(0.20, 5.0),
            ..ARR
        };
        let violations = table.violations();
        assert!(violations.contains(&RangeViolation::NotUnbounded));
        assert!(violations.contains(&RangeViolation::DoesNotStartAtZero { low: 0.01 }));
    }
}
