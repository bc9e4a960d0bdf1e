use serde::Serialize;

use mstrack_core::models::indicator::{IndicatorKind, IndicatorResult};
use mstrack_core::models::patient::PatientSnapshot;
use mstrack_core::models::visit::{VisitMeasurements, VisitSnapshot};
use mstrack_core::validation;
use mstrack_indicators::{
    calculate_arr, calculate_t2_difference, classify_t1_gd, evaluate_cdp12, evaluate_neda3,
};

use crate::error::VisitError;

/// The five indicator results of one visit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitIndicators {
    pub arr: IndicatorResult,
    pub t1_gd: IndicatorResult,
    pub new_t2: IndicatorResult,
    pub cdp12: IndicatorResult,
    pub neda3: IndicatorResult,
}

impl VisitIndicators {
    /// Results in [`IndicatorKind`] order.
    pub fn iter(&self) -> impl Iterator<Item = &IndicatorResult> {
        [&self.arr, &self.t1_gd, &self.new_t2, &self.cdp12, &self.neda3].into_iter()
    }

    pub fn get(&self, kind: IndicatorKind) -> &IndicatorResult {
        match kind {
            IndicatorKind::AnnualizedRelapseRate => &self.arr,
            IndicatorKind::T1GdLesions => &self.t1_gd,
            IndicatorKind::NewT2Lesions => &self.new_t2,
            IndicatorKind::ConfirmedDisabilityProgression => &self.cdp12,
            IndicatorKind::DiseaseActivityFreedom => &self.neda3,
        }
    }

    pub fn criticals(&self) -> impl Iterator<Item = &IndicatorResult> {
        self.iter().filter(|r| r.tier.is_critical())
    }
}

/// Validate a visit's measurements and compute all five indicators.
///
/// The ARR period runs from midnight UTC on the diagnosis date to the visit
/// date. Without a previous T2 count every current T2 lesion counts as new.
pub fn evaluate_visit(
    patient: &PatientSnapshot,
    visit: &VisitSnapshot,
    measurements: &VisitMeasurements,
) -> Result<VisitIndicators, VisitError> {
    let m = measurements.validate()?;
    let baseline_edss = validation::validate_edss("baseline_edss", patient.baseline_edss)?;
    let period_start = validation::diagnosis_start(patient.diagnosis_date)?;
    validation::validate_period(period_start, visit.visit_date)?;
    let previous_t2 = visit.previous_t2_lesions.unwrap_or(0);

    let arr = calculate_arr(m.relapse_count, period_start, visit.visit_date);
    let arr = IndicatorResult::new(
        IndicatorKind::AnnualizedRelapseRate,
        arr.value,
        arr.tier,
        arr.justification,
    )
    .with_input("relapses", m.relapse_count);

    let t1 = classify_t1_gd(m.t1_gd_lesions);
    let t1_gd = IndicatorResult::new(
        IndicatorKind::T1GdLesions,
        f64::from(t1.count),
        t1.tier,
        t1.justification,
    )
    .with_input("t1_gd_lesions", m.t1_gd_lesions);

    let t2 = calculate_t2_difference(m.t2_lesions, previous_t2);
    let t2_delta = t2.delta;
    let new_t2 = IndicatorResult::new(
        IndicatorKind::NewT2Lesions,
        t2.delta as f64,
        t2.tier,
        t2.justification,
    )
    .with_input("t2_lesions_current", m.t2_lesions)
    .with_input("t2_lesions_previous", previous_t2);

    let cdp = evaluate_cdp12(baseline_edss, m.current_edss);
    let progression_confirmed = cdp.progression_confirmed;
    let cdp12 = IndicatorResult::new(
        IndicatorKind::ConfirmedDisabilityProgression,
        cdp.delta,
        cdp.tier,
        cdp.justification,
    )
    .with_input("edss_baseline", baseline_edss)
    .with_input("edss_current", m.current_edss)
    .with_input("progression_confirmed", cdp.progression_confirmed)
    .with_input("threshold", cdp.threshold);

    let neda = evaluate_neda3(
        m.relapse_count == 0,
        m.t1_gd_lesions == 0 && t2_delta <= 0,
        !progression_confirmed,
    );
    let neda3 = IndicatorResult::new(
        IndicatorKind::DiseaseActivityFreedom,
        if neda.criteria_met { 1.0 } else { 0.0 },
        neda.tier,
        neda.justification,
    )
    .with_input("no_relapses", neda.criteria.no_relapses)
    .with_input("no_new_mri_lesions", neda.criteria.no_new_mri_lesions)
    .with_input("no_edss_progression", neda.criteria.no_edss_progression);

    Ok(VisitIndicators {
        arr,
        t1_gd,
        new_t2,
        cdp12,
        neda3,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mstrack_core::error::CoreError;
    use mstrack_core::models::indicator::Tier;

    fn patient() -> PatientSnapshot {
        PatientSnapshot {
            baseline_edss: 2.0,
            diagnosis_date: jiff::civil::date(2020, 1, 1),
        }
    }

    fn visit(previous_t2_lesions: Option<u32>) -> VisitSnapshot {
        VisitSnapshot {
            visit_date: "2024-01-01T00:00:00Z".parse().unwrap(),
            previous_t2_lesions,
        }
    }

    fn quiet() -> VisitMeasurements {
        VisitMeasurements {
            relapse_count: 0,
            t1_gd_lesions: 0,
            t2_lesions: 10,
            current_edss: 2.0,
        }
    }

    #[test]
    fn quiet_visit_meets_neda3() {
        let out = evaluate_visit(&patient(), &visit(Some(10)), &quiet()).unwrap();
        assert!(out.iter().all(|r| r.tier == Tier::Normal));
        assert_eq!(out.neda3.value, 1.0);
        assert_eq!(out.criticals().count(), 0);
    }

    #[test]
    fn results_come_in_kind_order_with_inputs() {
        let out = evaluate_visit(&patient(), &visit(Some(8)), &quiet()).unwrap();
        let kinds: Vec<_> = out.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, IndicatorKind::ALL.to_vec());

        assert_eq!(out.new_t2.value, 2.0);
        assert_eq!(out.new_t2.input("t2_lesions_previous"), Some(&serde_json::json!(8)));
        assert_eq!(out.cdp12.input("threshold"), Some(&serde_json::json!(1.0)));
        assert_eq!(out.get(IndicatorKind::NewT2Lesions).tier, Tier::Alert);
    }

    #[test]
    fn new_t2_lesions_fail_the_mri_criterion() {
        let out = evaluate_visit(&patient(), &visit(Some(8)), &quiet()).unwrap();
        assert_eq!(out.neda3.tier, Tier::Critical);
        assert_eq!(out.neda3.input("no_new_mri_lesions"), Some(&serde_json::json!(false)));
        assert!(out.neda3.justification.contains("(2) new MRI lesions"));
        assert!(!out.neda3.justification.contains("(1)"));
    }

    #[test]
    fn first_visit_counts_all_t2_lesions_as_new() {
        let out = evaluate_visit(&patient(), &visit(None), &quiet()).unwrap();
        assert_eq!(out.new_t2.value, 10.0);
        assert_eq!(out.new_t2.tier, Tier::Critical);
    }

    #[test]
    fn arr_uses_diagnosis_to_visit_period() {
        let mut m = quiet();
        m.relapse_count = 1;
        // 2020-01-01 .. 2024-01-01 is 1461 days = 4 Julian years
        let out = evaluate_visit(&patient(), &visit(Some(10)), &m).unwrap();
        assert_eq!(out.arr.value, 0.25);
        assert_eq!(out.arr.tier, Tier::Critical);
        assert_eq!(out.neda3.input("no_relapses"), Some(&serde_json::json!(false)));
    }

    #[test]
    fn confirmed_progression_fails_edss_criterion() {
        let mut m = quiet();
        m.current_edss = 3.0;
        let out = evaluate_visit(&patient(), &visit(Some(10)), &m).unwrap();
        assert_eq!(out.cdp12.tier, Tier::Critical);
        assert_eq!(out.neda3.input("no_edss_progression"), Some(&serde_json::json!(false)));
    }

    #[test]
    fn invalid_input_is_rejected_before_computation() {
        let mut m = quiet();
        m.current_edss = 7.3;
        assert!(matches!(
            evaluate_visit(&patient(), &visit(None), &m),
            Err(VisitError::Invalid(CoreError::InvalidInput { .. }))
        ));

        let mut m = quiet();
        m.relapse_count = -2;
        assert!(evaluate_visit(&patient(), &visit(None), &m).is_err());
    }

    #[test]
    fn visit_before_diagnosis_is_rejected() {
        let early = VisitSnapshot {
            visit_date: "2019-06-01T00:00:00Z".parse().unwrap(),
            previous_t2_lesions: None,
        };
        let err = evaluate_visit(&patient(), &early, &quiet()).unwrap_err();
        assert!(matches!(
            err,
            VisitError::Invalid(CoreError::InvalidInput { ref field, .. }) if field == "period_end"
        ));
    }

    #[test]
    fn evaluation_is_idempotent() {
        let a = evaluate_visit(&patient(), &visit(Some(3)), &quiet()).unwrap();
        let b = evaluate_visit(&patient(), &visit(Some(3)), &quiet()).unwrap();
        assert_eq!(a, b);
    }
}
