// storage/src/memory.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::StoreResult;
use crate::stores::{AppointmentStore, AuditStore, ClinicalNoteStore, ClinicianStore, PatientStore};
use models::{Appointment, AuditRecord, AuditResource, ClinicalNote, Clinician, Patient};

/// In-memory implementation of every store trait, used by service-level
/// tests and lightweight embedding. Cheap to clone; clones share state.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    patients: Arc<RwLock<HashMap<Uuid, Patient>>>,
    clinicians: Arc<RwLock<HashMap<Uuid, Clinician>>>,
    appointments: Arc<RwLock<HashMap<Uuid, Appointment>>>,
    notes: Arc<RwLock<HashMap<Uuid, ClinicalNote>>>,
    audit: Arc<RwLock<Vec<AuditRecord>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every audit record appended so far, oldest first. Test helper.
    pub async fn audit_trail(&self) -> Vec<AuditRecord> {
        self.audit.read().await.clone()
    }
}

#[async_trait]
impl PatientStore for InMemoryStore {
    async fn create_patient(&self, patient: &Patient) -> StoreResult<()> {
        self.patients.write().await.insert(patient.id, patient.clone());
        Ok(())
    }

    async fn patient_by_id(&self, id: &Uuid) -> StoreResult<Option<Patient>> {
        Ok(self.patients.read().await.get(id).cloned())
    }

    async fn patient_by_email(&self, email: &str) -> StoreResult<Option<Patient>> {
        Ok(self.patients.read().await.values().find(|p| p.email == email).cloned())
    }

    async fn update_patient(&self, patient: &Patient) -> StoreResult<()> {
        self.patients.write().await.insert(patient.id, patient.clone());
        Ok(())
    }
}

#[async_trait]
impl ClinicianStore for InMemoryStore {
    async fn create_clinician(&self, clinician: &Clinician) -> StoreResult<()> {
        self.clinicians.write().await.insert(clinician.id, clinician.clone());
        Ok(())
    }

    async fn clinician_by_id(&self, id: &Uuid) -> StoreResult<Option<Clinician>> {
        Ok(self.clinicians.read().await.get(id).cloned())
    }

    async fn clinician_by_email(&self, email: &str) -> StoreResult<Option<Clinician>> {
        Ok(self.clinicians.read().await.values().find(|c| c.email == email).cloned())
    }

    async fn clinician_by_license(&self, license_number: &str) -> StoreResult<Option<Clinician>> {
        Ok(self
            .clinicians
            .read()
            .await
            .values()
            .find(|c| c.license_number == license_number)
            .cloned())
    }

    async fn clinicians_by_specialization(
        &self,
        specialization: &str,
    ) -> StoreResult<Vec<Clinician>> {
        Ok(self
            .clinicians
            .read()
            .await
            .values()
            .filter(|c| c.specialization.eq_ignore_ascii_case(specialization))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AppointmentStore for InMemoryStore {
    async fn create_appointment(&self, appointment: &Appointment) -> StoreResult<()> {
        self.appointments.write().await.insert(appointment.id, appointment.clone());
        Ok(())
    }

    async fn appointment_by_id(&self, id: &Uuid) -> StoreResult<Option<Appointment>> {
        Ok(self.appointments.read().await.get(id).cloned())
    }

    async fn update_appointment(&self, appointment: &Appointment) -> StoreResult<()> {
        self.appointments.write().await.insert(appointment.id, appointment.clone());
        Ok(())
    }

    async fn upcoming_for_patient(
        &self,
        patient_id: &Uuid,
        after: DateTime<Utc>,
        limit: usize,
    ) -> StoreResult<Vec<Appointment>> {
        let mut upcoming: Vec<Appointment> = self
            .appointments
            .read()
            .await
            .values()
            .filter(|a| a.patient_id == *patient_id && a.scheduled_at > after)
            .cloned()
            .collect();
        upcoming.sort_by_key(|a| a.scheduled_at);
        upcoming.truncate(limit);
        Ok(upcoming)
    }
}

#[async_trait]
impl ClinicalNoteStore for InMemoryStore {
    async fn create_note(&self, note: &ClinicalNote) -> StoreResult<()> {
        self.notes.write().await.insert(note.id, note.clone());
        Ok(())
    }

    async fn note_by_id(&self, id: &Uuid) -> StoreResult<Option<ClinicalNote>> {
        Ok(self.notes.read().await.get(id).cloned())
    }

    async fn note_by_appointment(
        &self,
        appointment_id: &Uuid,
    ) -> StoreResult<Option<ClinicalNote>> {
        Ok(self
            .notes
            .read()
            .await
            .values()
            .find(|n| n.appointment_id == *appointment_id)
            .cloned())
    }

    async fn update_note(&self, note: &ClinicalNote) -> StoreResult<()> {
        self.notes.write().await.insert(note.id, note.clone());
        Ok(())
    }
}

#[async_trait]
impl AuditStore for InMemoryStore {
    async fn append(&self, record: &AuditRecord) -> StoreResult<()> {
        self.audit.write().await.push(record.clone());
        Ok(())
    }

    async fn recent_by_actor(&self, actor_id: &str, limit: usize)
        -> StoreResult<Vec<AuditRecord>> {
        Ok(self
            .audit
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| r.actor_id == actor_id)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn recent_by_resource(
        &self,
        resource_type: AuditResource,
        limit: usize,
    ) -> StoreResult<Vec<AuditRecord>> {
        Ok(self
            .audit
            .read()
            .await
            .iter()
            .rev()
            .filter(|r| r.resource_type == resource_type)
            .take(limit)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use models::{AppointmentType, BookAppointment};

    #[tokio::test]
    async fn should_order_and_limit_upcoming() {
        let store = InMemoryStore::new();
        let patient_id = Uuid::new_v4();
        let now = Utc::now();
        let mut ids = Vec::new();
        for days in [5, 1, 3] {
            let appointment = Appointment::from_booking(&BookAppointment {
                patient_id,
                clinician_id: Uuid::new_v4(),
                scheduled_at: now + Duration::days(days),
                duration_minutes: None,
                reason_for_visit: None,
                appointment_type: Some(AppointmentType::InPerson),
            });
            ids.push((days, appointment.id));
            store.create_appointment(&appointment).await.unwrap();
        }
        let upcoming = store.upcoming_for_patient(&patient_id, now, 2).await.unwrap();
        assert_eq!(upcoming.len(), 2);
        assert_eq!(upcoming[0].id, ids.iter().find(|(d, _)| *d == 1).unwrap().1);
        assert_eq!(upcoming[1].id, ids.iter().find(|(d, _)| *d == 3).unwrap().1);
    }

    #[tokio::test]
    async fn should_share_state_between_clones() {
        let store = InMemoryStore::new();
        let clone = store.clone();
        let record = AuditRecord {
            id: Uuid::new_v4(),
            actor_id: "a1".to_string(),
            actor_role: models::ActorRole::Clinician,
            action: models::AuditAction::Create,
            resource_type: AuditResource::ClinicalNote,
            resource_id: None,
            old_values: None,
            new_values: None,
            ip_address: None,
            correlation_id: None,
            description: "created".to_string(),
            status: models::AuditStatus::Success,
            created_at: Utc::now(),
        };
        store.append(&record).await.unwrap();
        assert_eq!(clone.audit_trail().await.len(), 1);
    }
}
