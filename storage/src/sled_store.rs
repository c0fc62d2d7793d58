// storage/src/sled_store.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sled::{Db, Tree};
use uuid::Uuid;

use crate::errors::{StoreError, StoreResult};
use crate::stores::{AppointmentStore, AuditStore, ClinicalNoteStore, ClinicianStore, PatientStore};
use models::{Appointment, AuditRecord, AuditResource, ClinicalNote, Clinician, Patient};

/// Embedded sled-backed implementation of every store trait. One tree per
/// entity keyed by UUID bytes, with secondary-index trees for unique fields
/// and owner scans. Values are serde_json documents.
pub struct SledStore {
    patients: Tree,
    patients_by_email: Tree,
    clinicians: Tree,
    clinicians_by_email: Tree,
    clinicians_by_license: Tree,
    appointments: Tree,
    appointments_by_patient: Tree,
    notes: Tree,
    notes_by_appointment: Tree,
    audit: Tree,
}

impl SledStore {
    pub fn open(path: impl AsRef<std::path::Path>) -> StoreResult<Self> {
        let db = sled::open(path)?;
        Self::from_db(&db)
    }

    pub fn from_db(db: &Db) -> StoreResult<Self> {
        Ok(SledStore {
            patients: db.open_tree("patients")?,
            patients_by_email: db.open_tree("patients_by_email")?,
            clinicians: db.open_tree("clinicians")?,
            clinicians_by_email: db.open_tree("clinicians_by_email")?,
            clinicians_by_license: db.open_tree("clinicians_by_license")?,
            appointments: db.open_tree("appointments")?,
            appointments_by_patient: db.open_tree("appointments_by_patient")?,
            notes: db.open_tree("clinical_notes")?,
            notes_by_appointment: db.open_tree("notes_by_appointment")?,
            audit: db.open_tree("audit_records")?,
        })
    }
}

/// Owner-scan index key: owner UUID, then big-endian timestamp so a prefix
/// scan walks one owner's rows in chronological order, then the row UUID to
/// keep keys unique.
fn owner_time_key(owner: &Uuid, at: DateTime<Utc>, row: &Uuid) -> Vec<u8> {
    let mut key = Vec::with_capacity(16 + 8 + 16);
    key.extend_from_slice(owner.as_bytes());
    key.extend_from_slice(&at.timestamp_micros().to_be_bytes());
    key.extend_from_slice(row.as_bytes());
    key
}

fn decode<T: serde::de::DeserializeOwned>(tree: &'static str, bytes: &[u8]) -> StoreResult<T> {
    serde_json::from_slice(bytes)
        .map_err(|e| StoreError::Corrupt { tree, detail: e.to_string() })
}

#[async_trait]
impl PatientStore for SledStore {
    async fn create_patient(&self, patient: &Patient) -> StoreResult<()> {
        let bytes = serde_json::to_vec(patient)?;
        self.patients.insert(patient.id.as_bytes(), bytes)?;
        self.patients_by_email
            .insert(patient.email.as_bytes(), patient.id.as_bytes().to_vec())?;
        Ok(())
    }

    async fn patient_by_id(&self, id: &Uuid) -> StoreResult<Option<Patient>> {
        match self.patients.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(decode("patients", &bytes)?)),
            None => Ok(None),
        }
    }

    async fn patient_by_email(&self, email: &str) -> StoreResult<Option<Patient>> {
        match self.patients_by_email.get(email.as_bytes())? {
            Some(id_bytes) => match self.patients.get(&id_bytes)? {
                Some(bytes) => Ok(Some(decode("patients", &bytes)?)),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    async fn update_patient(&self, patient: &Patient) -> StoreResult<()> {
        let bytes = serde_json::to_vec(patient)?;
        self.patients.insert(patient.id.as_bytes(), bytes)?;
        Ok(())
    }
}

#[async_trait]
impl ClinicianStore for SledStore {
    async fn create_clinician(&self, clinician: &Clinician) -> StoreResult<()> {
        let bytes = serde_json::to_vec(clinician)?;
        self.clinicians.insert(clinician.id.as_bytes(), bytes)?;
        self.clinicians_by_email
            .insert(clinician.email.as_bytes(), clinician.id.as_bytes().to_vec())?;
        self.clinicians_by_license
            .insert(clinician.license_number.as_bytes(), clinician.id.as_bytes().to_vec())?;
        Ok(())
    }

    async fn clinician_by_id(&self, id: &Uuid) -> StoreResult<Option<Clinician>> {
        match self.clinicians.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(decode("clinicians", &bytes)?)),
            None => Ok(None),
        }
    }

    async fn clinician_by_email(&self, email: &str) -> StoreResult<Option<Clinician>> {
        match self.clinicians_by_email.get(email.as_bytes())? {
            Some(id_bytes) => match self.clinicians.get(&id_bytes)? {
                Some(bytes) => Ok(Some(decode("clinicians", &bytes)?)),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    async fn clinician_by_license(&self, license_number: &str) -> StoreResult<Option<Clinician>> {
        match self.clinicians_by_license.get(license_number.as_bytes())? {
            Some(id_bytes) => match self.clinicians.get(&id_bytes)? {
                Some(bytes) => Ok(Some(decode("clinicians", &bytes)?)),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    async fn clinicians_by_specialization(
        &self,
        specialization: &str,
    ) -> StoreResult<Vec<Clinician>> {
        // Full scan; the clinician directory is small and unindexed.
        let mut matches = Vec::new();
        for item in self.clinicians.iter() {
            let (_key, bytes) = item?;
            let clinician: Clinician = decode("clinicians", &bytes)?;
            if clinician.specialization.eq_ignore_ascii_case(specialization) {
                matches.push(clinician);
            }
        }
        Ok(matches)
    }
}

#[async_trait]
impl AppointmentStore for SledStore {
    async fn create_appointment(&self, appointment: &Appointment) -> StoreResult<()> {
        let bytes = serde_json::to_vec(appointment)?;
        self.appointments.insert(appointment.id.as_bytes(), bytes)?;
        let index_key =
            owner_time_key(&appointment.patient_id, appointment.scheduled_at, &appointment.id);
        self.appointments_by_patient
            .insert(index_key, appointment.id.as_bytes().to_vec())?;
        Ok(())
    }

    async fn appointment_by_id(&self, id: &Uuid) -> StoreResult<Option<Appointment>> {
        match self.appointments.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(decode("appointments", &bytes)?)),
            None => Ok(None),
        }
    }

    async fn update_appointment(&self, appointment: &Appointment) -> StoreResult<()> {
        // scheduled_at never changes after creation, so the owner index
        // entry stays valid.
        let bytes = serde_json::to_vec(appointment)?;
        self.appointments.insert(appointment.id.as_bytes(), bytes)?;
        Ok(())
    }

    async fn upcoming_for_patient(
        &self,
        patient_id: &Uuid,
        after: DateTime<Utc>,
        limit: usize,
    ) -> StoreResult<Vec<Appointment>> {
        let mut upcoming = Vec::new();
        for item in self.appointments_by_patient.scan_prefix(patient_id.as_bytes()) {
            let (_key, id_bytes) = item?;
            if let Some(bytes) = self.appointments.get(&id_bytes)? {
                let appointment: Appointment = decode("appointments", &bytes)?;
                if appointment.scheduled_at > after {
                    upcoming.push(appointment);
                    if upcoming.len() == limit {
                        break;
                    }
                }
            }
        }
        Ok(upcoming)
    }
}

#[async_trait]
impl ClinicalNoteStore for SledStore {
    async fn create_note(&self, note: &ClinicalNote) -> StoreResult<()> {
        let bytes = serde_json::to_vec(note)?;
        self.notes.insert(note.id.as_bytes(), bytes)?;
        self.notes_by_appointment
            .insert(note.appointment_id.as_bytes(), note.id.as_bytes().to_vec())?;
        Ok(())
    }

    async fn note_by_id(&self, id: &Uuid) -> StoreResult<Option<ClinicalNote>> {
        match self.notes.get(id.as_bytes())? {
            Some(bytes) => Ok(Some(decode("clinical_notes", &bytes)?)),
            None => Ok(None),
        }
    }

    async fn note_by_appointment(
        &self,
        appointment_id: &Uuid,
    ) -> StoreResult<Option<ClinicalNote>> {
        match self.notes_by_appointment.get(appointment_id.as_bytes())? {
            Some(id_bytes) => match self.notes.get(&id_bytes)? {
                Some(bytes) => Ok(Some(decode("clinical_notes", &bytes)?)),
                None => Ok(None),
            },
            None => Ok(None),
        }
    }

    async fn update_note(&self, note: &ClinicalNote) -> StoreResult<()> {
        let bytes = serde_json::to_vec(note)?;
        self.notes.insert(note.id.as_bytes(), bytes)?;
        Ok(())
    }
}

#[async_trait]
impl AuditStore for SledStore {
    async fn append(&self, record: &AuditRecord) -> StoreResult<()> {
        // Keyed by creation time so a reverse scan yields newest-first.
        let mut key = Vec::with_capacity(8 + 16);
        key.extend_from_slice(&record.created_at.timestamp_micros().to_be_bytes());
        key.extend_from_slice(record.id.as_bytes());
        let bytes = serde_json::to_vec(record)?;
        self.audit.insert(key, bytes)?;
        Ok(())
    }

    async fn recent_by_actor(&self, actor_id: &str, limit: usize)
        -> StoreResult<Vec<AuditRecord>> {
        let mut records = Vec::new();
        for item in self.audit.iter().rev() {
            let (_key, bytes) = item?;
            let record: AuditRecord = decode("audit_records", &bytes)?;
            if record.actor_id == actor_id {
                records.push(record);
                if records.len() == limit {
                    break;
                }
            }
        }
        Ok(records)
    }

    async fn recent_by_resource(
        &self,
        resource_type: AuditResource,
        limit: usize,
    ) -> StoreResult<Vec<AuditRecord>> {
        let mut records = Vec::new();
        for item in self.audit.iter().rev() {
            let (_key, bytes) = item?;
            let record: AuditRecord = decode("audit_records", &bytes)?;
            if record.resource_type == resource_type {
                records.push(record);
                if records.len() == limit {
                    break;
                }
            }
        }
        Ok(records)
    }
}
