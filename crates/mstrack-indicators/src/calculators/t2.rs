use serde::Serialize;
use tracing::info;

use mstrack_core::models::indicator::Tier;

use crate::classify::classify;
use crate::justification;
use crate::ranges;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct T2Outcome {
    /// `current - previous`; negative when lesions resolved.
    pub delta: i64,
    pub tier: Tier,
    pub justification: String,
}

/// New T2 lesions since the previous scan.
///
/// A negative delta means no new lesions and is classified as zero; the
/// reported delta keeps its sign.
pub fn calculate_t2_difference(current_count: u32, previous_count: u32) -> T2Outcome {
    let delta = i64::from(current_count) - i64::from(previous_count);
    let new_lesions = delta.max(0);
    let tier = classify(new_lesions as f64, &ranges::T2_NEW);
    let justification = justification::t2_new(tier, delta);

    info!(current_count, previous_count, delta, %tier, "T2 difference calculated");

    T2Outcome {
        delta,
        tier,
        justification,
    }
}
