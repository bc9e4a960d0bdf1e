//! Justification templates, one per indicator and tier.
//!
//! Every template embeds the value it explains, so a stored justification
//! always matches the stored value it sits next to.

use mstrack_core::models::indicator::Tier;

pub fn arr(tier: Tier, value: f64) -> String {
    match tier {
        Tier::Normal => format!(
            "NORMAL: ARR of {value:.2} is within the optimal range (<0.10). \
             The current treatment shows good relapse control."
        ),
        Tier::Alert => format!(
            "ALERT: ARR of {value:.2} is in the alert range (0.10-0.19). \
             Requires close monitoring and a review of current treatment efficacy."
        ),
        Tier::Critical => format!(
            "CRITICAL: ARR of {value:.2} exceeds the 0.20 threshold, indicating treatment failure. \
             Consider a DMT switch or therapeutic escalation."
        ),
    }
}

pub fn t1_gd(tier: Tier, count: u32) -> String {
    match tier {
        Tier::Normal => format!(
            "NORMAL: {count} T1 Gd+ lesions detected (<0.03). \
             No significant evidence of active inflammation."
        ),
        Tier::Alert => format!(
            "ALERT: {count} T1 Gd+ lesions detected (0.03-0.49). \
             Inflammatory activity that requires close monitoring."
        ),
        Tier::Critical => format!(
            "CRITICAL: {count} T1 Gd+ lesions detected (>=0.50). \
             Severe active CNS inflammation. Requires immediate intervention."
        ),
    }
}

pub fn t2_new(tier: Tier, delta: i64) -> String {
    match tier {
        Tier::Normal => format!("NORMAL: {delta} new T2 lesions (<=0.30). Stable lesion burden."),
        Tier::Alert => format!(
            "ALERT: {delta} new T2 lesions detected (0.31-2.80). \
             Treatment efficacy should be evaluated."
        ),
        Tier::Critical => format!(
            "CRITICAL: {delta} new T2 lesions detected (>2.80). \
             Significant progression of lesion burden. Consider a change of treatment."
        ),
    }
}

pub fn cdp12(tier: Tier, delta: f64, threshold: f64, baseline: f64) -> String {
    match tier {
        Tier::Normal => format!(
            "NORMAL: EDSS delta = {delta:.1}. No disability progression; EDSS stable or improved."
        ),
        Tier::Alert => format!(
            "ALERT: EDSS delta = {delta:.1} is positive but below the CDP-12 \
             threshold ({threshold:.1}). Monitor over the next visits."
        ),
        Tier::Critical => format!(
            "CRITICAL: CDP-12 confirmed. EDSS delta = {delta:.1} \
             (threshold {threshold:.1} for baseline EDSS {baseline:.1}). \
             Confirmed disability progression; the treatment plan needs urgent review."
        ),
    }
}

pub const NEDA3_MET: &str = "NEDA-3 MET: no evidence of disease activity. All 3 criteria hold: \
     (1) no relapses, (2) no new MRI lesions, (3) no EDSS progression. \
     Excellent response to treatment.";

pub fn neda3_not_met(failed: &[&str]) -> String {
    format!(
        "NEDA-3 NOT MET: disease activity detected: {}. Treatment efficacy should be evaluated.",
        failed.join(", ")
    )
}
