use serde_json::json;
use tracing::info;

use mstrack_audit::AuditEvent;
use mstrack_audit::events::{action, resource};
use mstrack_core::error::CoreError;
use mstrack_core::models::diagnostic::{AiDiagnostic, AiSelectionMetrics, DiagnosisSource};
use mstrack_core::models::visit::VisitStatus;
use mstrack_storage::ClinicalStore;

use crate::error::VisitError;

/// Validate and store the AI diagnostic of a visit, replacing any earlier one.
pub fn record_diagnosis<S: ClinicalStore>(
    store: &mut S,
    diagnostic: &AiDiagnostic,
    actor: &str,
) -> Result<(), VisitError> {
    diagnostic.validate()?;
    let visit = store.get_visit(diagnostic.visit_id)?;
    if visit.status == VisitStatus::Cancelled {
        return Err(VisitError::Cancelled(visit.id));
    }

    store.put_diagnostic(diagnostic)?;
    AuditEvent::new(action::DIAGNOSIS_RECORD, resource::DIAGNOSIS, visit.id.to_string(), actor)
        .with_details(json!({
            "selected": diagnostic.selected,
            "override": diagnostic.selected == DiagnosisSource::Physician,
        }))
        .emit();

    info!(
        visit_id = %visit.id,
        selected = %diagnostic.selected,
        "AI diagnostic recorded"
    );
    Ok(())
}

/// Selection counts over diagnostics created between `from` and `to`.
///
/// Both bounds are inclusive calendar days in UTC; `None` leaves that side
/// open.
pub fn diagnosis_metrics<S: ClinicalStore>(
    store: &S,
    from: Option<jiff::civil::Date>,
    to: Option<jiff::civil::Date>,
) -> Result<AiSelectionMetrics, VisitError> {
    if let (Some(from), Some(to)) = (from, to)
        && to < from
    {
        return Err(CoreError::invalid("to", format!("{to} precedes {from}")).into());
    }

    let diagnostics = store.list_diagnostics()?;
    let in_range = diagnostics.iter().filter(|d| {
        let day = d.created_at.to_zoned(jiff::tz::TimeZone::UTC).date();
        from.is_none_or(|f| day >= f) && to.is_none_or(|t| day <= t)
    });
    Ok(AiSelectionMetrics::from_diagnostics(in_range))
}
