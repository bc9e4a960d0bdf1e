use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use mstrack_alerts::{AlertSink, CriticalAlert};
use mstrack_audit::AuditEvent;
use mstrack_audit::events::{action, resource};
use mstrack_core::models::indicator::IndicatorRecord;
use mstrack_core::models::visit::{Visit, VisitMeasurements, VisitSnapshot, VisitStatus};
use mstrack_storage::ClinicalStore;

use crate::error::VisitError;
use crate::evaluate::{VisitIndicators, evaluate_visit};
use crate::history::previous_t2_lesions;

/// Outcome of recording a visit's measurements.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedVisit {
    pub visit: Visit,
    pub indicators: VisitIndicators,
    pub alerts_sent: usize,
    pub alerts_failed: usize,
}

/// Evaluate a visit, persist its five results and mark it completed.
///
/// Re-recording a visit overwrites its previous results. Critical results
/// are forwarded to `alerts`; delivery failures are logged, never returned.
pub fn record_visit<S: ClinicalStore>(
    store: &mut S,
    alerts: &dyn AlertSink,
    visit_id: Uuid,
    measurements: &VisitMeasurements,
    actor: &str,
    now: jiff::Timestamp,
) -> Result<RecordedVisit, VisitError> {
    let mut visit = store.get_visit(visit_id)?;
    if visit.status == VisitStatus::Cancelled {
        return Err(VisitError::Cancelled(visit_id));
    }
    let patient = store.get_patient(visit.patient_id)?;

    let snapshot = VisitSnapshot {
        visit_date: visit.visit_date,
        previous_t2_lesions: previous_t2_lesions(&*store, &visit)?,
    };
    let indicators = evaluate_visit(&patient.snapshot(), &snapshot, measurements)?;

    for result in indicators.iter() {
        let record = IndicatorRecord {
            visit_id: visit.id,
            patient_id: visit.patient_id,
            visit_date: visit.visit_date,
            result: result.clone(),
            recorded_at: now,
        };
        store.upsert_indicator(&record)?;
        AuditEvent::new(
            action::INDICATOR_UPSERT,
            resource::INDICATOR,
            format!("{}/{}", visit.id, result.kind.code()),
            actor,
        )
        .with_details(json!({ "value": result.value, "tier": result.tier }))
        .emit();
    }

    visit.status = VisitStatus::Completed;
    visit.updated_at = now;
    store.put_visit(&visit)?;
    AuditEvent::new(action::VISIT_COMPLETE, resource::VISIT, visit.id.to_string(), actor)
        .with_details(json!({ "visit_number": visit.visit_number }))
        .emit();

    let mut alerts_sent = 0;
    let mut alerts_failed = 0;
    for result in indicators.criticals() {
        let Some(alert) = CriticalAlert::for_result(result, &patient.full_name, visit.visit_number)
        else {
            continue;
        };
        match alerts.send(&alert) {
            Ok(()) => {
                alerts_sent += 1;
                AuditEvent::new(
                    action::ALERT_FORWARD,
                    resource::INDICATOR,
                    format!("{}/{}", visit.id, result.kind.code()),
                    actor,
                )
                .emit();
            }
            Err(e) => {
                alerts_failed += 1;
                warn!(
                    visit_id = %visit.id,
                    kind = %result.kind,
                    error = %e,
                    "failed to forward critical alert"
                );
            }
        }
    }

    info!(
        visit_id = %visit.id,
        visit_number = visit.visit_number,
        criticals = alerts_sent + alerts_failed,
        alerts_failed,
        "visit recorded"
    );

    Ok(RecordedVisit {
        visit,
        indicators,
        alerts_sent,
        alerts_failed,
    })
}

/// Drop every result stored for a visit so the next evaluation starts clean.
/// Returns the number of results removed.
pub fn clear_visit_results<S: ClinicalStore>(
    store: &mut S,
    visit_id: Uuid,
    actor: &str,
) -> Result<usize, VisitError> {
    let visit = store.get_visit(visit_id)?;
    let removed = store.delete_visit_indicators(visit.id)?;
    AuditEvent::new(action::INDICATOR_RESET, resource::VISIT, visit.id.to_string(), actor)
        .with_details(json!({ "removed": removed }))
        .emit();
    info!(visit_id = %visit.id, removed, "visit results cleared");
    Ok(removed)
}
