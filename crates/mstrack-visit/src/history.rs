use serde::Serialize;
use uuid::Uuid;

use mstrack_core::models::indicator::{IndicatorKind, IndicatorResult};
use mstrack_core::models::visit::Visit;
use mstrack_storage::ClinicalStore;

use crate::error::VisitError;

/// A past visit with the indicator results stored for it.
#[derive(Debug, Clone, Serialize)]
pub struct VisitWithIndicators {
    pub visit: Visit,
    pub indicators: Vec<IndicatorResult>,
}

/// T2 lesion count carried forward from the patient's previous evaluated visit.
///
/// Walks earlier visits (lower visit number) from the latest back and returns
/// the first positive current T2 count recorded with a new-T2 result. A
/// stored count of zero does not stop the search.
pub fn previous_t2_lesions<S: ClinicalStore>(
    store: &S,
    visit: &Visit,
) -> Result<Option<u32>, VisitError> {
    let mut earlier: Vec<Visit> = store
        .list_patient_visits(visit.patient_id)?
        .into_iter()
        .filter(|v| v.visit_number < visit.visit_number)
        .collect();
    earlier.sort_by(|a, b| b.visit_number.cmp(&a.visit_number));

    for prior in earlier {
        let records = store.visit_indicators(prior.id)?;
        let t2 = records
            .iter()
            .find(|r| r.result.kind == IndicatorKind::NewT2Lesions)
            .and_then(|r| r.result.input("t2_lesions_current"))
            .and_then(|v| v.as_u64())
            .and_then(|v| u32::try_from(v).ok());
        if let Some(count) = t2
            && count > 0
        {
            tracing::debug!(
                visit_id = %visit.id,
                prior = prior.visit_number,
                count,
                "previous T2 count found"
            );
            return Ok(Some(count));
        }
    }
    Ok(None)
}

/// A patient's visits before `before` (by visit number), most recent first,
/// each with its stored indicator results. Visits without results are skipped.
pub fn visit_history<S: ClinicalStore>(
    store: &S,
    patient_id: Uuid,
    before: Option<u32>,
) -> Result<Vec<VisitWithIndicators>, VisitError> {
    let mut visits = store.list_patient_visits(patient_id)?;
    if let Some(number) = before {
        visits.retain(|v| v.visit_number < number);
    }

    let mut history = Vec::with_capacity(visits.len());
    for visit in visits {
        let indicators: Vec<IndicatorResult> = store
            .visit_indicators(visit.id)?
            .into_iter()
            .map(|r| r.result)
            .collect();
        if indicators.is_empty() {
            continue;
        }
        history.push(VisitWithIndicators { visit, indicators });
    }
    Ok(history)
}
