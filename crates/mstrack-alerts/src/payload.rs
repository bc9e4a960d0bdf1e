use serde::Serialize;

use mstrack_core::models::indicator::{IndicatorResult, Tier};

/// JSON body delivered to the alert channel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalAlert {
    pub indicator: AlertIndicator,
    pub patient: AlertPatient,
    pub visit: AlertVisit,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertIndicator {
    /// Indicator code, e.g. `"ARR"`.
    pub code: String,
    pub value: f64,
    pub tier: Tier,
    pub justification: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertPatient {
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertVisit {
    pub visit_number: u32,
}

impl CriticalAlert {
    /// Build an alert for `result`, or `None` if it is not critical.
    pub fn for_result(
        result: &IndicatorResult,
        patient_name: &str,
        visit_number: u32,
    ) -> Option<Self> {
        if !result.tier.is_critical() {
            return None;
        }
        Some(Self {
            indicator: AlertIndicator {
                code: result.kind.code().to_string(),
                value: result.value,
                tier: result.tier,
                justification: result.justification.clone(),
            },
            patient: AlertPatient {
                full_name: patient_name.to_string(),
            },
            visit: AlertVisit { visit_number },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mstrack_core::models::indicator::IndicatorKind;

    #[test]
    fn only_critical_results_produce_alerts() {
        let normal = IndicatorResult::new(IndicatorKind::T1GdLesions, 0.0, Tier::Normal, "ok");
        assert!(CriticalAlert::for_result(&normal, "A", 1).is_none());

        let alert = IndicatorResult::new(IndicatorKind::NewT2Lesions, 1.0, Tier::Alert, "watch");
        assert!(CriticalAlert::for_result(&alert, "A", 1).is_none());
    }

    #[test]
    fn payload_shape() {
        let result = IndicatorResult::new(
            IndicatorKind::AnnualizedRelapseRate,
            0.75,
            Tier::Critical,
            "CRITICAL: ARR of 0.75",
        );
        let alert = CriticalAlert::for_result(&result, "Ana Torres", 4).unwrap();
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "indicator": {
                    "code": "ARR",
                    "value": 0.75,
                    "tier": "critical",
                    "justification": "CRITICAL: ARR of 0.75"
                },
                "patient": { "full_name": "Ana Torres" },
                "visit": { "visit_number": 4 }
            })
        );
    }
}
