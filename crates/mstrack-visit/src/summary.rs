use std::fmt::Write;

use mstrack_core::models::indicator::IndicatorResult;

use crate::history::VisitWithIndicators;

/// Number of prior visits shown by [`evolution_history`] by default.
pub const DEFAULT_HISTORY_LIMIT: usize = 3;

/// One line per indicator: `- {code}: {value} - {TIER}`.
pub fn indicator_summary(results: &[IndicatorResult]) -> String {
    if results.is_empty() {
        return "No indicators recorded".to_string();
    }
    results
        .iter()
        .map(|r| format!("- {}: {:.2} - {}", r.kind.code(), r.value, r.tier.label()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The `limit` most recent visits of `history` with their indicators.
///
/// `history` is expected most recent first, as returned by
/// [`crate::history::visit_history`].
pub fn evolution_history(history: &[VisitWithIndicators], limit: usize) -> String {
    if history.is_empty() || limit == 0 {
        return "No prior history available (first visit)".to_string();
    }

    let mut out = String::new();
    for (i, entry) in history.iter().take(limit).enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let date = entry.visit.visit_date.to_zoned(jiff::tz::TimeZone::UTC).date();
        let _ = write!(out, "Visit #{} ({date}):", entry.visit.visit_number);
        for r in &entry.indicators {
            let _ = write!(out, "\n  - {}: {:.2} ({})", r.kind.code(), r.value, r.tier);
        }
    }
    out
}
