use mstrack_core::models::indicator::{IndicatorKind, Tier};
use mstrack_indicators::error::IndicatorError;
use mstrack_indicators::{
    Classification, all_range_tables, calculate_arr, calculate_t2_difference, classify_detailed,
    classify_t1_gd, evaluate_cdp12, evaluate_neda3, range_table, range_table_for_code,
};

fn ts(seconds: i64) -> jiff::Timestamp {
    jiff::Timestamp::from_second(seconds).unwrap()
}

#[test]
fn every_table_is_contiguous_and_classifies_its_lower_bounds() {
    for table in all_range_tables() {
        assert!(table.violations().is_empty(), "{}", table.kind);
        for tier in Tier::ALL {
            let low = table.interval(tier).low;
            assert_eq!(classify_detailed(low, table), Classification::Matched(tier));
        }
    }
}

#[test]
fn range_tables_cover_only_table_driven_indicators() {
    assert_eq!(
        range_table(IndicatorKind::AnnualizedRelapseRate).unwrap().kind,
        IndicatorKind::AnnualizedRelapseRate
    );
    assert!(matches!(
        range_table(IndicatorKind::ConfirmedDisabilityProgression),
        Err(IndicatorError::NoRangeTable(IndicatorKind::ConfirmedDisabilityProgression))
    ));
    assert!(matches!(
        range_table(IndicatorKind::DiseaseActivityFreedom),
        Err(IndicatorError::NoRangeTable(_))
    ));
    assert_eq!(range_table_for_code("t2_new").unwrap().kind, IndicatorKind::NewT2Lesions);
    assert!(matches!(
        range_table_for_code("EDSS"),
        Err(IndicatorError::UnknownIndicator(_))
    ));
}

#[test]
fn documented_examples_hold() {
    let year = 31_557_600;

    let arr = calculate_arr(0, ts(1_000), ts(1_000 + year));
    assert_eq!((arr.value, arr.tier), (0.0, Tier::Normal));

    let arr = calculate_arr(2, ts(1_000), ts(1_000 + year));
    assert_eq!((arr.value, arr.tier), (2.0, Tier::Critical));

    assert_eq!(classify_t1_gd(0).tier, Tier::Normal);
    assert_eq!(classify_t1_gd(1).tier, Tier::Critical);

    let t2 = calculate_t2_difference(5, 5);
    assert_eq!((t2.delta, t2.tier), (0, Tier::Normal));
    let t2 = calculate_t2_difference(8, 5);
    assert_eq!((t2.delta, t2.tier), (3, Tier::Critical));
    let t2 = calculate_t2_difference(6, 5);
    assert_eq!((t2.delta, t2.tier), (1, Tier::Alert));

    let cdp = evaluate_cdp12(4.0, 5.0);
    assert_eq!((cdp.delta, cdp.progression_confirmed, cdp.tier), (1.0, true, Tier::Critical));
    let cdp = evaluate_cdp12(6.0, 6.5);
    assert_eq!((cdp.delta, cdp.progression_confirmed, cdp.tier), (0.5, true, Tier::Critical));
    let cdp = evaluate_cdp12(6.0, 6.0);
    assert_eq!((cdp.delta, cdp.tier), (0.0, Tier::Normal));

    let neda = evaluate_neda3(true, true, true);
    assert_eq!((neda.criteria_met, neda.tier), (true, Tier::Normal));
}

#[test]
fn neda3_single_failures_name_exactly_one_criterion() {
    let cases = [
        ((false, true, true), "(1) relapses present"),
        ((true, false, true), "(2) new MRI lesions"),
        ((true, true, false), "(3) EDSS progression"),
    ];
    for ((r, m, e), expected) in cases {
        let out = evaluate_neda3(r, m, e);
        assert!(!out.criteria_met);
        assert_eq!(out.tier, Tier::Critical);
        assert_eq!(out.criteria.failed(), vec![expected]);
        assert!(out.justification.contains(expected));
    }
}

#[test]
fn repeated_evaluation_is_identical() {
    let start = ts(1_500_000_000);
    let end = ts(1_700_000_000);
    assert_eq!(calculate_arr(3, start, end), calculate_arr(3, start, end));
    assert_eq!(classify_t1_gd(2), classify_t1_gd(2));
    assert_eq!(calculate_t2_difference(9, 4), calculate_t2_difference(9, 4));
    assert_eq!(evaluate_cdp12(2.5, 4.0), evaluate_cdp12(2.5, 4.0));
    assert_eq!(evaluate_neda3(false, true, false), evaluate_neda3(false, true, false));
}

#[test]
fn outcomes_serialize_for_display() {
    let json = serde_json::to_value(evaluate_cdp12(6.0, 6.5)).unwrap();
    assert_eq!(json["tier"], "critical");
    assert_eq!(json["progression_confirmed"], true);
    assert_eq!(json["threshold"], 0.5);
}
