use serde::Serialize;
use tracing::info;

use mstrack_core::models::indicator::Tier;

use crate::classify::classify;
use crate::justification;
use crate::ranges;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct T1GdOutcome {
    pub count: u32,
    pub tier: Tier,
    pub justification: String,
}

/// Classify a T1 gadolinium-enhancing lesion count.
///
/// The range table is expressed in fractional units, so for integer counts
/// 0 is Normal and anything positive is Critical.
pub fn classify_t1_gd(lesion_count: u32) -> T1GdOutcome {
    let tier = classify(f64::from(lesion_count), &ranges::T1_GD);
    let justification = justification::t1_gd(tier, lesion_count);

    info!(lesion_count, %tier, "T1 Gd+ classified");

    T1GdOutcome {
        count: lesion_count,
        tier,
        justification,
    }
}
