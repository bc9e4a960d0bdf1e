use serde::Serialize;
use tracing::info;

use mstrack_core::models::indicator::Tier;

use crate::justification;

/// Baselines at or below this EDSS use [`THRESHOLD_LOW_BASELINE`].
pub const BASELINE_CUTOFF: f64 = 5.5;

/// Required EDSS increase when baseline <= 5.5.
pub const THRESHOLD_LOW_BASELINE: f64 = 1.0;

/// Required EDSS increase when baseline > 5.5.
pub const THRESHOLD_HIGH_BASELINE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cdp12Outcome {
    pub delta: f64,
    pub threshold: f64,
    pub progression_confirmed: bool,
    pub tier: Tier,
    pub justification: String,
}

/// Progression threshold for a baseline EDSS.
pub fn threshold_for(baseline_edss: f64) -> f64 {
    if baseline_edss <= BASELINE_CUTOFF {
        THRESHOLD_LOW_BASELINE
    } else {
        THRESHOLD_HIGH_BASELINE
    }
}

/// Confirmed disability progression at 12 weeks, evaluated as a single-visit
/// EDSS delta against a baseline-dependent threshold.
pub fn evaluate_cdp12(baseline_edss: f64, current_edss: f64) -> Cdp12Outcome {
    let delta = current_edss - baseline_edss;
    let threshold = threshold_for(baseline_edss);
    let progression_confirmed = delta >= threshold;

    let tier = if progression_confirmed {
        Tier::Critical
    } else if delta > 0.0 {
        Tier::Alert
    } else {
        Tier::Normal
    };
    let justification = justification::cdp12(tier, delta, threshold, baseline_edss);

    info!(delta, threshold, progression_confirmed, %tier, "CDP-12 evaluated");

    Cdp12Outcome {
        delta,
        threshold,
        progression_confirmed,
        tier,
        justification,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_point_rise_from_low_baseline_is_confirmed() {
        let out = evaluate_cdp12(4.0, 5.0);
        assert_eq!(out.delta, 1.0);
        assert_eq!(out.threshold, 1.0);
        assert!(out.progression_confirmed);
        assert_eq!(out.tier, Tier::Critical);
    }

    #[test]
    fn half_point_rise_from_high_baseline_is_confirmed() {
        let out = evaluate_cdp12(6.0, 6.5);
        assert_eq!(out.delta, 0.5);
        assert_eq!(out.threshold, 0.5);
        assert!(out.progression_confirmed);
        assert_eq!(out.tier, Tier::Critical);
    }

    #[test]
    fn stable_edss_is_normal() {
        let out = evaluate_cdp12(6.0, 6.0);
        assert_eq!(out.delta, 0.0);
        assert!(!out.progression_confirmed);
        assert_eq!(out.tier, Tier::Normal);
    }

    #[test]
    fn improvement_is_normal() {
        let out = evaluate_cdp12(3.0, 2.0);
        assert_eq!(out.delta, -1.0);
        assert_eq!(out.tier, Tier::Normal);
    }

    #[test]
    fn sub_threshold_rise_is_alert() {
        let out = evaluate_cdp12(5.5, 6.0);
        assert_eq!(out.threshold, 1.0);
        assert!(!out.progression_confirmed);
        assert_eq!(out.tier, Tier::Alert);
        assert!(out.justification.contains("(1.0)"));
    }

    #[test]
    fn cutoff_is_inclusive_of_five_and_a_half() {
        assert_eq!(threshold_for(5.5), THRESHOLD_LOW_BASELINE);
        assert_eq!(threshold_for(6.0), THRESHOLD_HIGH_BASELINE);
    }

    #[test]
    fn critical_justification_names_baseline() {
        let out = evaluate_cdp12(6.0, 7.0);
        assert!(out.justification.contains("baseline EDSS 6.0"));
    }
}
