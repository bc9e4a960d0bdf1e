use serde::{Deserialize, Serialize};
use tracing::info;
use ts_rs::TS;

use mstrack_core::models::indicator::Tier;

use crate::justification;

/// The three NEDA-3 domains. Each flag is `true` when the domain shows no
/// disease activity.
///
/// The caller derives them from the other indicators of the same visit:
/// `no_relapses` is a zero relapse count, `no_new_mri_lesions` is
/// `t1_gd == 0 && t2_delta <= 0`, and `no_edss_progression` is the negation
/// of CDP-12 `progression_confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Neda3Criteria {
    pub no_relapses: bool,
    pub no_new_mri_lesions: bool,
    pub no_edss_progression: bool,
}

impl Neda3Criteria {
    pub fn all_met(&self) -> bool {
        self.no_relapses && self.no_new_mri_lesions && self.no_edss_progression
    }

    /// Failed criteria, always in the order relapses, MRI lesions, EDSS.
    pub fn failed(&self) -> Vec<&'static str> {
        let mut failed = Vec::new();
        if !self.no_relapses {
            failed.push("(1) relapses present");
        }
        if !self.no_new_mri_lesions {
            failed.push("(2) new MRI lesions");
        }
        if !self.no_edss_progression {
            failed.push("(3) EDSS progression");
        }
        failed
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Neda3Outcome {
    pub criteria_met: bool,
    pub tier: Tier,
    pub justification: String,
    pub criteria: Neda3Criteria,
}

/// No Evidence of Disease Activity. Binary: Normal when all three criteria
/// hold, Critical otherwise.
pub fn evaluate_neda3(
    no_relapses: bool,
    no_new_mri_lesions: bool,
    no_edss_progression: bool,
) -> Neda3Outcome {
    let criteria = Neda3Criteria {
        no_relapses,
        no_new_mri_lesions,
        no_edss_progression,
    };
    let criteria_met = criteria.all_met();

    let (tier, justification) = if criteria_met {
        (Tier::Normal, justification::NEDA3_MET.to_string())
    } else {
        (Tier::Critical, justification::neda3_not_met(&criteria.failed()))
    };

    info!(criteria_met, "NEDA-3 evaluated");

    Neda3Outcome {
        criteria_met,
        tier,
        justification,
        criteria,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_criteria_met_is_normal() {
        let out = evaluate_neda3(true, true, true);
        assert!(out.criteria_met);
        assert_eq!(out.tier, Tier::Normal);
        assert!(out.justification.starts_with("NEDA-3 MET"));
    }

    #[test]
    fn single_failure_names_only_that_criterion() {
        let out = evaluate_neda3(true, false, true);
        assert!(!out.criteria_met);
        assert_eq!(out.tier, Tier::Critical);
        assert!(out.justification.contains("(2) new MRI lesions"));
        assert!(!out.justification.contains("(1)"));
        assert!(!out.justification.contains("(3)"));
    }

    #[test]
    fn failures_are_listed_in_fixed_order() {
        let out = evaluate_neda3(false, false, false);
        assert!(out.justification.contains(
            "(1) relapses present, (2) new MRI lesions, (3) EDSS progression"
        ));
    }

    #[test]
    fn detail_flags_echo_inputs() {
        let out = evaluate_neda3(false, true, false);
        assert_eq!(
            out.criteria,
            Neda3Criteria {
                no_relapses: false,
                no_new_mri_lesions: true,
                no_edss_progression: false,
            }
        );
        assert_eq!(out.criteria.failed(), vec!["(1) relapses present", "(3) EDSS progression"]);
    }
}
