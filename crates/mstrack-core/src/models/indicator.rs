use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;

/// The five clinical indicators computed for every visit.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum IndicatorKind {
    /// Relapses per patient-year since diagnosis.
    AnnualizedRelapseRate,
    /// Gadolinium-enhancing T1 lesion count.
    T1GdLesions,
    /// Increase in T2 lesion count over the previous scan.
    NewT2Lesions,
    /// CDP-12, evaluated as a single-visit EDSS delta.
    ConfirmedDisabilityProgression,
    /// NEDA-3 composite.
    DiseaseActivityFreedom,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 5] = [
        IndicatorKind::AnnualizedRelapseRate,
        IndicatorKind::T1GdLesions,
        IndicatorKind::NewT2Lesions,
        IndicatorKind::ConfirmedDisabilityProgression,
        IndicatorKind::DiseaseActivityFreedom,
    ];

    /// Stable short code, used in storage keys and summaries.
    pub fn code(&self) -> &'static str {
        match self {
            IndicatorKind::AnnualizedRelapseRate => "ARR",
            IndicatorKind::T1GdLesions => "T1_Gd",
            IndicatorKind::NewT2Lesions => "T2_new",
            IndicatorKind::ConfirmedDisabilityProgression => "CDP12",
            IndicatorKind::DiseaseActivityFreedom => "NEDA3",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            IndicatorKind::AnnualizedRelapseRate => "Annualized Relapse Rate",
            IndicatorKind::T1GdLesions => "T1 Gd+ Lesions",
            IndicatorKind::NewT2Lesions => "New T2 Lesions",
            IndicatorKind::ConfirmedDisabilityProgression => {
                "Confirmed Disability Progression (12 weeks)"
            }
            IndicatorKind::DiseaseActivityFreedom => "No Evidence of Disease Activity (NEDA-3)",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.code().eq_ignore_ascii_case(code))
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for IndicatorKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| CoreError::UnknownIndicator(s.to_string()))
    }
}

/// Classification tier. Variant order is severity order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum Tier {
    Normal,
    Alert,
    Critical,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Normal, Tier::Alert, Tier::Critical];

    /// Upper-case label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Normal => "NORMAL",
            Tier::Alert => "ALERT",
            Tier::Critical => "CRITICAL",
        }
    }

    pub fn is_critical(&self) -> bool {
        matches!(self, Tier::Critical)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Normal => "normal",
            Tier::Alert => "alert",
            Tier::Critical => "critical",
        };
        f.write_str(s)
    }
}

/// A computed, classified and explained indicator value.
///
/// Produced fresh by each evaluation and never mutated afterwards; the
/// builder-style [`IndicatorResult::with_input`] is only used while the
/// result is being assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IndicatorResult {
    pub kind: IndicatorKind,
    pub value: f64,
    pub tier: Tier,
    pub justification: String,
    /// Input variables used, kept for audit and display.
    #[serde(default)]
    pub inputs: BTreeMap<String, serde_json::Value>,
}

impl IndicatorResult {
    pub fn new(
        kind: IndicatorKind,
        value: f64,
        tier: Tier,
        justification: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            value,
            tier,
            justification: justification.into(),
            inputs: BTreeMap::new(),
        }
    }

    pub fn with_input(
        mut self,
        name: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.inputs.insert(name.into(), value.into());
        self
    }

    pub fn input(&self, name: &str) -> Option<&serde_json::Value> {
        self.inputs.get(name)
    }
}

/// A persisted indicator result, keyed by (visit, kind).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct IndicatorRecord {
    pub visit_id: Uuid,
    pub patient_id: Uuid,
    pub visit_date: jiff::Timestamp,
    pub result: IndicatorResult,
    pub recorded_at: jiff::Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_order_by_severity() {
        assert!(Tier::Normal < Tier::Alert);
        assert!(Tier::Alert < Tier::Critical);
        assert_eq!(Tier::ALL.iter().max(), Some(&Tier::Critical));
    }

    #[test]
    fn codes_round_trip_through_from_str() {
        for kind in IndicatorKind::ALL {
            assert_eq!(kind.code().parse::<IndicatorKind>().unwrap(), kind);
        }
        assert_eq!(
            "neda3".parse::<IndicatorKind>().unwrap(),
            IndicatorKind::DiseaseActivityFreedom
        );
        assert!(matches!(
            "EDSS".parse::<IndicatorKind>(),
            Err(CoreError::UnknownIndicator(_))
        ));
    }

    #[test]
    fn serializes_tier_in_snake_case() {
        assert_eq!(serde_json::to_string(&Tier::Critical).unwrap(), "\"critical\"");
        assert_eq!(
            serde_json::to_string(&IndicatorKind::NewT2Lesions).unwrap(),
            "\"new_t2_lesions\""
        );
    }

    #[test]
    fn with_input_records_variables() {
        let result = IndicatorResult::new(IndicatorKind::T1GdLesions, 2.0, Tier::Critical, "x")
            .with_input("t1_gd_lesions", 2);
        assert_eq!(result.input("t1_gd_lesions"), Some(&serde_json::json!(2)));
        assert_eq!(result.input("missing"), None);
    }
}
