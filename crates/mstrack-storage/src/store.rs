use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use mstrack_core::models::diagnostic::AiDiagnostic;
use mstrack_core::models::indicator::{IndicatorKind, IndicatorRecord};
use mstrack_core::models::patient::Patient;
use mstrack_core::models::visit::{Visit, VisitStatus};
use mstrack_core::store_keys;

use crate::error::StorageError;
use crate::file;
use crate::objects::ObjectMap;
use crate::state::{load_all, load_state, save_state};

/// Storage capability for patients, visits, indicator results and AI
/// diagnostics.
///
/// The indicator engine never sees this trait; only the visit workflow
/// does. Writes take `&mut self`, so a store has exactly one writer.
pub trait ClinicalStore {
    fn get_patient(&self, id: Uuid) -> Result<Patient, StorageError>;

    fn put_patient(&mut self, patient: &Patient) -> Result<(), StorageError>;

    /// Patients ordered by full name.
    fn list_patients(&self, active_only: bool) -> Result<Vec<Patient>, StorageError>;

    /// Store a new visit, assigning the patient's next visit number.
    fn create_visit(&mut self, visit: Visit) -> Result<Visit, StorageError>;

    fn get_visit(&self, id: Uuid) -> Result<Visit, StorageError>;

    fn put_visit(&mut self, visit: &Visit) -> Result<(), StorageError>;

    /// A patient's visits, most recent visit date first.
    fn list_patient_visits(&self, patient_id: Uuid) -> Result<Vec<Visit>, StorageError>;

    /// Pending visits scheduled at or before `cutoff`, soonest first.
    fn pending_visits_before(&self, cutoff: jiff::Timestamp) -> Result<Vec<Visit>, StorageError>;

    /// Insert or overwrite the result stored for (visit, kind).
    fn upsert_indicator(&mut self, record: &IndicatorRecord) -> Result<(), StorageError>;

    /// Indicators of one visit, in [`IndicatorKind`] order.
    fn visit_indicators(&self, visit_id: Uuid) -> Result<Vec<IndicatorRecord>, StorageError>;

    /// Remove every indicator of a visit. Returns the number removed.
    fn delete_visit_indicators(&mut self, visit_id: Uuid) -> Result<usize, StorageError>;

    /// A patient's indicators across visits, oldest visit first, optionally
    /// restricted to one kind.
    fn indicator_history(
        &self,
        patient_id: Uuid,
        kind: Option<IndicatorKind>,
    ) -> Result<Vec<IndicatorRecord>, StorageError>;

    /// Insert or overwrite the AI diagnostic of a visit.
    fn put_diagnostic(&mut self, diagnostic: &AiDiagnostic) -> Result<(), StorageError>;

    fn get_diagnostic(&self, visit_id: Uuid) -> Result<AiDiagnostic, StorageError>;

    /// Every stored AI diagnostic, oldest first.
    fn list_diagnostics(&self) -> Result<Vec<AiDiagnostic>, StorageError>;
}

/// [`ClinicalStore`] over an [`ObjectMap`], optionally backed by a JSON file.
///
/// With a backing file, every write is flushed before returning.
#[derive(Debug, Default)]
pub struct ObjectStore {
    objects: ObjectMap,
    path: Option<PathBuf>,
}

impl ObjectStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open (or start) a JSON data file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let objects = file::read_objects(&path)?;
        debug!(path = %path.display(), objects = objects.len(), "store opened");
        Ok(Self {
            objects,
            path: Some(path),
        })
    }

    fn commit(&self) -> Result<(), StorageError> {
        match &self.path {
            Some(path) => file::write_objects(path, &self.objects),
            None => Ok(()),
        }
    }
}

impl ClinicalStore for ObjectStore {
    fn get_patient(&self, id: Uuid) -> Result<Patient, StorageError> {
        load_state(&self.objects, &store_keys::patient(id))
    }

    fn put_patient(&mut self, patient: &Patient) -> Result<(), StorageError> {
        save_state(&mut self.objects, store_keys::patient(patient.id), patient)?;
        debug!(patient_id = %patient.id, "patient stored");
        self.commit()
    }

    fn list_patients(&self, active_only: bool) -> Result<Vec<Patient>, StorageError> {
        let mut patients: Vec<Patient> = load_all(&self.objects, store_keys::PATIENTS_PREFIX)?;
        if active_only {
            patients.retain(|p| p.active);
        }
        patients.sort_by(|a, b| a.full_name.cmp(&b.full_name));
        Ok(patients)
    }

    fn create_visit(&mut self, mut visit: Visit) -> Result<Visit, StorageError> {
        // The patient must exist before a visit can reference it.
        self.get_patient(visit.patient_id)?;

        let last = self
            .list_patient_visits(visit.patient_id)?
            .iter()
            .map(|v| v.visit_number)
            .max()
            .unwrap_or(0);
        visit.visit_number = last + 1;

        save_state(&mut self.objects, store_keys::visit(visit.id), &visit)?;
        debug!(
            visit_id = %visit.id,
            patient_id = %visit.patient_id,
            visit_number = visit.visit_number,
            "visit created"
        );
        self.commit()?;
        Ok(visit)
    }

    fn get_visit(&self, id: Uuid) -> Result<Visit, StorageError> {
        load_state(&self.objects, &store_keys::visit(id))
    }

    fn put_visit(&mut self, visit: &Visit) -> Result<(), StorageError> {
        save_state(&mut self.objects, store_keys::visit(visit.id), visit)?;
        self.commit()
    }

    fn list_patient_visits(&self, patient_id: Uuid) -> Result<Vec<Visit>, StorageError> {
        let mut visits: Vec<Visit> = load_all(&self.objects, store_keys::VISITS_PREFIX)?;
        visits.retain(|v| v.patient_id == patient_id);
        visits.sort_by(|a, b| {
            b.visit_date
                .cmp(&a.visit_date)
                .then(b.visit_number.cmp(&a.visit_number))
        });
        Ok(visits)
    }

    fn pending_visits_before(&self, cutoff: jiff::Timestamp) -> Result<Vec<Visit>, StorageError> {
        let mut visits: Vec<Visit> = load_all(&self.objects, store_keys::VISITS_PREFIX)?;
        visits.retain(|v| v.status == VisitStatus::Pending && v.visit_date <= cutoff);
        visits.sort_by_key(|v| v.visit_date);
        Ok(visits)
    }

    fn upsert_indicator(&mut self, record: &IndicatorRecord) -> Result<(), StorageError> {
        let key = store_keys::indicator(record.visit_id, record.result.kind);
        let replaced = save_state(&mut self.objects, key, record)?;
        debug!(
            visit_id = %record.visit_id,
            kind = %record.result.kind,
            replaced,
            "indicator stored"
        );
        self.commit()
    }

    fn visit_indicators(&self, visit_id: Uuid) -> Result<Vec<IndicatorRecord>, StorageError> {
        let prefix = store_keys::visit_indicators_prefix(visit_id);
        let mut records: Vec<IndicatorRecord> = load_all(&self.objects, &prefix)?;
        records.sort_by_key(|r| r.result.kind);
        Ok(records)
    }

    fn delete_visit_indicators(&mut self, visit_id: Uuid) -> Result<usize, StorageError> {
        let prefix = store_keys::visit_indicators_prefix(visit_id);
        let removed = self.objects.delete_objects_by_prefix(&prefix);
        debug!(%visit_id, removed, "visit indicators deleted");
        self.commit()?;
        Ok(removed)
    }

    fn indicator_history(
        &self,
        patient_id: Uuid,
        kind: Option<IndicatorKind>,
    ) -> Result<Vec<IndicatorRecord>, StorageError> {
        let mut records: Vec<IndicatorRecord> =
            load_all(&self.objects, store_keys::INDICATORS_PREFIX)?;
        records.retain(|r| r.patient_id == patient_id && kind.is_none_or(|k| r.result.kind == k));
        records.sort_by(|a, b| {
            a.visit_date
                .cmp(&b.visit_date)
                .then(a.result.kind.cmp(&b.result.kind))
        });
        Ok(records)
    }

    fn put_diagnostic(&mut self, diagnostic: &AiDiagnostic) -> Result<(), StorageError> {
        // A diagnostic belongs to an existing visit.
        self.get_visit(diagnostic.visit_id)?;

        let key = store_keys::diagnostic(diagnostic.visit_id);
        let replaced = save_state(&mut self.objects, key, diagnostic)?;
        debug!(
            visit_id = %diagnostic.visit_id,
            selected = %diagnostic.selected,
            replaced,
            "diagnostic stored"
        );
        self.commit()
    }

    fn get_diagnostic(&self, visit_id: Uuid) -> Result<AiDiagnostic, StorageError> {
        load_state(&self.objects, &store_keys::diagnostic(visit_id))
    }

    fn list_diagnostics(&self) -> Result<Vec<AiDiagnostic>, StorageError> {
        let mut diagnostics: Vec<AiDiagnostic> =
            load_all(&self.objects, store_keys::DIAGNOSTICS_PREFIX)?;
        diagnostics.sort_by_key(|d| d.created_at);
        Ok(diagnostics)
    }
}
