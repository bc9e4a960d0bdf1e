//! Storage key conventions.
//!
//! Pure string functions. These define the canonical layout of objects in
//! any key-value backend that holds mstrack data.

use uuid::Uuid;

use crate::models::indicator::IndicatorKind;

pub const PATIENTS_PREFIX: &str = "patients/";

pub const VISITS_PREFIX: &str = "visits/";

pub const INDICATORS_PREFIX: &str = "indicators/";

pub const DIAGNOSTICS_PREFIX: &str = "diagnostics/";

pub fn patient(id: Uuid) -> String {
    format!("patients/{id}.json")
}

pub fn visit(id: Uuid) -> String {
    format!("visits/{id}.json")
}

pub fn visit_indicators_prefix(visit_id: Uuid) -> String {
    format!("indicators/{visit_id}/")
}

/// One object per (visit, indicator kind). Writing the same key again is an
/// overwrite, which gives indicator persistence its upsert semantics.
pub fn indicator(visit_id: Uuid, kind: IndicatorKind) -> String {
    format!("indicators/{visit_id}/{}.json", kind.code())
}

/// One AI diagnostic per visit.
pub fn diagnostic(visit_id: Uuid) -> String {
    format!("diagnostics/{visit_id}.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_keys_live_under_visit_prefix() {
        let visit_id = Uuid::new_v4();
        for kind in IndicatorKind::ALL {
            let key = indicator(visit_id, kind);
            assert!(key.starts_with(&visit_indicators_prefix(visit_id)));
            assert!(key.starts_with(INDICATORS_PREFIX));
            assert!(key.ends_with(&format!("{}.json", kind.code())));
        }
    }

    #[test]
    fn patient_and_visit_keys_use_their_prefixes() {
        let id = Uuid::new_v4();
        assert!(patient(id).starts_with(PATIENTS_PREFIX));
        assert!(visit(id).starts_with(VISITS_PREFIX));
        assert!(diagnostic(id).starts_with(DIAGNOSTICS_PREFIX));
    }
}
