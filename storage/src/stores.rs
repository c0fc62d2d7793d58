// storage/src/stores.rs
//
// Row-oriented persistence contracts the orchestrators consume. One trait
// per entity table so test doubles and embedded engines can mix freely.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::StoreResult;
use models::{Appointment, AuditRecord, AuditResource, ClinicalNote, Clinician, Patient};

#[async_trait]
pub trait PatientStore: Send + Sync + 'static {
    async fn create_patient(&self, patient: &Patient) -> StoreResult<()>;
    async fn patient_by_id(&self, id: &Uuid) -> StoreResult<Option<Patient>>;
    async fn patient_by_email(&self, email: &str) -> StoreResult<Option<Patient>>;
    async fn update_patient(&self, patient: &Patient) -> StoreResult<()>;
}

#[async_trait]
pub trait ClinicianStore: Send + Sync + 'static {
    async fn create_clinician(&self, clinician: &Clinician) -> StoreResult<()>;
    async fn clinician_by_id(&self, id: &Uuid) -> StoreResult<Option<Clinician>>;
    async fn clinician_by_email(&self, email: &str) -> StoreResult<Option<Clinician>>;
    async fn clinician_by_license(&self, license_number: &str) -> StoreResult<Option<Clinician>>;
    async fn clinicians_by_specialization(&self, specialization: &str)
        -> StoreResult<Vec<Clinician>>;
}

#[async_trait]
pub trait AppointmentStore: Send + Sync + 'static {
    async fn create_appointment(&self, appointment: &Appointment) -> StoreResult<()>;
    async fn appointment_by_id(&self, id: &Uuid) -> StoreResult<Option<Appointment>>;
    /// Unconditional row replacement; last write wins (no version token).
    async fn update_appointment(&self, appointment: &Appointment) -> StoreResult<()>;
    /// Appointments for one patient strictly after `after`, soonest first,
    /// at most `limit` rows.
    async fn upcoming_for_patient(
        &self,
        patient_id: &Uuid,
        after: DateTime<Utc>,
        limit: usize,
    ) -> StoreResult<Vec<Appointment>>;
}

#[async_trait]
pub trait ClinicalNoteStore: Send + Sync + 'static {
    async fn create_note(&self, note: &ClinicalNote) -> StoreResult<()>;
    async fn note_by_id(&self, id: &Uuid) -> StoreResult<Option<ClinicalNote>>;
    async fn note_by_appointment(&self, appointment_id: &Uuid)
        -> StoreResult<Option<ClinicalNote>>;
    async fn update_note(&self, note: &ClinicalNote) -> StoreResult<()>;
}

/// Append-only. No update or delete operations exist on purpose.
#[async_trait]
pub trait AuditStore: Send + Sync + 'static {
    async fn append(&self, record: &AuditRecord) -> StoreResult<()>;
    async fn recent_by_actor(&self, actor_id: &str, limit: usize)
        -> StoreResult<Vec<AuditRecord>>;
    async fn recent_by_resource(
        &self,
        resource_type: AuditResource,
        limit: usize,
    ) -> StoreResult<Vec<AuditRecord>>;
}
