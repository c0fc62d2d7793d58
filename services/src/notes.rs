// services/src/notes.rs

use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::audit::{AuditEntry, AuditLedger};
use crate::context::RequestContext;
use models::{
    Actor, AuditAction, AuditResource, AuditStatus, ClinicalNote, ClinicalNoteView,
    CreateClinicalNote, DomainError, DomainResult, NoteChanges,
};
use security::{evaluate, AccessDecision, PolicyAction};
use storage::{AppointmentStore, ClinicalNoteStore};

pub struct ClinicalNoteService {
    notes: Arc<dyn ClinicalNoteStore>,
    appointments: Arc<dyn AppointmentStore>,
    ledger: AuditLedger,
}

impl ClinicalNoteService {
    pub fn new(
        notes: Arc<dyn ClinicalNoteStore>,
        appointments: Arc<dyn AppointmentStore>,
        ledger: AuditLedger,
    ) -> Self {
        ClinicalNoteService { notes, appointments, ledger }
    }

    async fn record_denied(
        &self,
        actor: &Actor,
        action: AuditAction,
        resource_id: Option<Uuid>,
        description: &str,
        ctx: &RequestContext,
    ) {
        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id: actor.id.to_string(),
                    actor_role: actor.role,
                    action,
                    resource_type: AuditResource::ClinicalNote,
                    resource_id,
                    old_values: None,
                    new_values: None,
                    description: description.to_string(),
                    status: AuditStatus::Failure,
                },
            )
            .await;
    }

    /// Creates a draft note for an appointment. Only clinicians may author
    /// notes; the authoring clinician is forced to the actor identity, and
    /// an appointment carries at most one note.
    pub async fn create(
        &self,
        actor: &Actor,
        payload: CreateClinicalNote,
        ctx: &RequestContext,
    ) -> DomainResult<ClinicalNoteView> {
        if let AccessDecision::Deny(reason) = evaluate(actor, &PolicyAction::CreateNote) {
            self.record_denied(actor, AuditAction::Create, None, "Clinical note creation denied", ctx)
                .await;
            return Err(DomainError::PermissionDenied(reason.message()));
        }

        if self.appointments.appointment_by_id(&payload.appointment_id).await?.is_none() {
            return Err(DomainError::NotFound("Appointment"));
        }
        if self.notes.note_by_appointment(&payload.appointment_id).await?.is_some() {
            return Err(DomainError::NoteExists);
        }

        let note = ClinicalNote::from_payload(&payload, actor.id);
        self.notes.create_note(&note).await?;

        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id: actor.id.to_string(),
                    actor_role: actor.role,
                    action: AuditAction::Create,
                    resource_type: AuditResource::ClinicalNote,
                    resource_id: Some(note.id),
                    old_values: None,
                    new_values: Some(json!({ "appointment_id": note.appointment_id })),
                    description: format!("Clinical note created for patient {}", note.patient_id),
                    status: AuditStatus::Success,
                },
            )
            .await;

        tracing::info!(
            note_id = %note.id,
            appointment_id = %note.appointment_id,
            clinician_id = %note.clinician_id,
            correlation_id = %ctx.correlation_id,
            "clinical note created"
        );

        Ok(ClinicalNoteView::from(&note))
    }

    /// Applies content changes to a draft note. Only the authoring
    /// clinician may update, and only while the note is a draft.
    pub async fn update(
        &self,
        actor: &Actor,
        note_id: Uuid,
        changes: NoteChanges,
        ctx: &RequestContext,
    ) -> DomainResult<ClinicalNoteView> {
        let mut note = self
            .notes
            .note_by_id(&note_id)
            .await?
            .ok_or(DomainError::NotFound("Clinical note"))?;

        let action = PolicyAction::ModifyNote { author_id: note.clinician_id };
        if let AccessDecision::Deny(reason) = evaluate(actor, &action) {
            self.record_denied(actor, AuditAction::Update, Some(note_id), "Clinical note update denied", ctx)
                .await;
            return Err(DomainError::PermissionDenied(reason.message()));
        }

        let old_snapshot = serde_json::to_value(&note).ok();
        note.apply_changes(&changes)?;
        self.notes.update_note(&note).await?;

        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id: actor.id.to_string(),
                    actor_role: actor.role,
                    action: AuditAction::Update,
                    resource_type: AuditResource::ClinicalNote,
                    resource_id: Some(note_id),
                    old_values: old_snapshot,
                    new_values: serde_json::to_value(&note).ok(),
                    description: "Clinical note updated".to_string(),
                    status: AuditStatus::Success,
                },
            )
            .await;

        tracing::info!(note_id = %note_id, correlation_id = %ctx.correlation_id, "clinical note updated");

        Ok(ClinicalNoteView::from(&note))
    }

    /// The one exposed transition: `draft → finalized`.
    pub async fn finalize(
        &self,
        actor: &Actor,
        note_id: Uuid,
        ctx: &RequestContext,
    ) -> DomainResult<ClinicalNoteView> {
        let mut note = self
            .notes
            .note_by_id(&note_id)
            .await?
            .ok_or(DomainError::NotFound("Clinical note"))?;

        let action = PolicyAction::ModifyNote { author_id: note.clinician_id };
        if let AccessDecision::Deny(reason) = evaluate(actor, &action) {
            self.record_denied(actor, AuditAction::Finalize, Some(note_id), "Clinical note finalization denied", ctx)
                .await;
            return Err(DomainError::PermissionDenied(reason.message()));
        }

        let old_status = note.status;
        note.finalize()?;
        self.notes.update_note(&note).await?;

        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id: actor.id.to_string(),
                    actor_role: actor.role,
                    action: AuditAction::Finalize,
                    resource_type: AuditResource::ClinicalNote,
                    resource_id: Some(note_id),
                    old_values: Some(json!({ "status": old_status })),
                    new_values: Some(json!({ "status": note.status })),
                    description: "Clinical note finalized".to_string(),
                    status: AuditStatus::Success,
                },
            )
            .await;

        tracing::info!(note_id = %note_id, correlation_id = %ctx.correlation_id, "clinical note finalized");

        Ok(ClinicalNoteView::from(&note))
    }

    /// Fetches the note attached to an appointment, if any. Readable only
    /// by the note's patient or its authoring clinician.
    pub async fn for_appointment(
        &self,
        actor: &Actor,
        appointment_id: Uuid,
        ctx: &RequestContext,
    ) -> DomainResult<Option<ClinicalNoteView>> {
        let Some(note) = self.notes.note_by_appointment(&appointment_id).await? else {
            return Ok(None);
        };

        let action = PolicyAction::ViewNote {
            patient_id: note.patient_id,
            author_id: note.clinician_id,
        };
        if let AccessDecision::Deny(reason) = evaluate(actor, &action) {
            self.record_denied(actor, AuditAction::View, Some(note.id), "Clinical note access denied", ctx)
                .await;
            return Err(DomainError::PermissionDenied(reason.message()));
        }

        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id: actor.id.to_string(),
                    actor_role: actor.role,
                    action: AuditAction::View,
                    resource_type: AuditResource::ClinicalNote,
                    resource_id: Some(note.id),
                    old_values: None,
                    new_values: None,
                    description: "Clinical note viewed".to_string(),
                    status: AuditStatus::Success,
                },
            )
            .await;

        Ok(Some(ClinicalNoteView::from(&note)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use models::{Appointment, BookAppointment, NoteStatus};
    use storage::InMemoryStore;

    struct Fixture {
        service: ClinicalNoteService,
        store: InMemoryStore,
        author: Actor,
        patient: Actor,
        appointment_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let store = InMemoryStore::new();
        let author = Actor::clinician(Uuid::new_v4());
        let patient = Actor::patient(Uuid::new_v4());
        let appointment = Appointment::from_booking(&BookAppointment {
            patient_id: patient.id,
            clinician_id: author.id,
            scheduled_at: Utc::now() + Duration::days(1),
            duration_minutes: None,
            reason_for_visit: None,
            appointment_type: None,
        });
        store.create_appointment(&appointment).await.unwrap();
        let service = ClinicalNoteService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            AuditLedger::new(Arc::new(store.clone())),
        );
        Fixture { service, store, author, patient, appointment_id: appointment.id }
    }

    fn payload(fx: &Fixture) -> CreateClinicalNote {
        CreateClinicalNote {
            appointment_id: fx.appointment_id,
            patient_id: fx.patient.id,
            chief_complaint: Some("fatigue".to_string()),
            history_of_present_illness: None,
            physical_exam: None,
            assessment: None,
            plan: None,
            medications: None,
            follow_up: None,
        }
    }

    #[tokio::test]
    async fn should_force_author_to_actor_identity() {
        let fx = fixture().await;
        let ctx = RequestContext::new("corr-1");
        let view = fx.service.create(&fx.author, payload(&fx), &ctx).await.unwrap();
        assert_eq!(view.clinician_id, fx.author.id);
        assert_eq!(view.status, NoteStatus::Draft);
    }

    #[tokio::test]
    async fn should_deny_note_creation_to_patients() {
        let fx = fixture().await;
        let err = fx
            .service
            .create(&fx.patient, payload(&fx), &RequestContext::new("corr-2"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
        let trail = fx.store.audit_trail().await;
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].status, AuditStatus::Failure);
    }

    #[tokio::test]
    async fn should_enforce_one_note_per_appointment() {
        let fx = fixture().await;
        let ctx = RequestContext::new("corr-3");
        fx.service.create(&fx.author, payload(&fx), &ctx).await.unwrap();
        let err = fx.service.create(&fx.author, payload(&fx), &ctx).await.unwrap_err();
        assert_eq!(err, DomainError::NoteExists);
    }

    #[tokio::test]
    async fn should_run_full_note_lifecycle() {
        let fx = fixture().await;
        let ctx = RequestContext::new("corr-4");
        let view = fx.service.create(&fx.author, payload(&fx), &ctx).await.unwrap();

        let changes = NoteChanges {
            chief_complaint: Some("fatigue and dizziness".to_string()),
            ..NoteChanges::default()
        };
        let updated = fx.service.update(&fx.author, view.id, changes, &ctx).await.unwrap();
        assert_eq!(updated.chief_complaint.as_deref(), Some("fatigue and dizziness"));

        let finalized = fx.service.finalize(&fx.author, view.id, &ctx).await.unwrap();
        assert_eq!(finalized.status, NoteStatus::Finalized);

        // Any further mutation is rejected with InvalidState.
        let late_changes = NoteChanges {
            plan: Some("rest".to_string()),
            ..NoteChanges::default()
        };
        let err = fx.service.update(&fx.author, view.id, late_changes, &ctx).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_STATE");
        let err = fx.service.finalize(&fx.author, view.id, &ctx).await.unwrap_err();
        assert_eq!(err.code(), "INVALID_STATE");

        let stored = fx.store.note_by_id(&view.id).await.unwrap().unwrap();
        assert_eq!(stored.plan, None);
        assert_eq!(stored.status, NoteStatus::Finalized);
    }

    #[tokio::test]
    async fn should_deny_other_clinician_view_and_update() {
        let fx = fixture().await;
        let ctx = RequestContext::new("corr-5");
        let view = fx.service.create(&fx.author, payload(&fx), &ctx).await.unwrap();

        let other = Actor::clinician(Uuid::new_v4());
        let err = fx
            .service
            .for_appointment(&other, fx.appointment_id, &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");

        let err = fx
            .service
            .update(&other, view.id, NoteChanges::default(), &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
    }

    #[tokio::test]
    async fn should_share_note_reads_with_the_patient() {
        let fx = fixture().await;
        let ctx = RequestContext::new("corr-6");
        fx.service.create(&fx.author, payload(&fx), &ctx).await.unwrap();

        let seen = fx
            .service
            .for_appointment(&fx.patient, fx.appointment_id, &ctx)
            .await
            .unwrap();
        assert!(seen.is_some());

        let other_patient = Actor::patient(Uuid::new_v4());
        let err = fx
            .service
            .for_appointment(&other_patient, fx.appointment_id, &ctx)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
    }

    #[tokio::test]
    async fn should_return_none_for_appointment_without_note() {
        let fx = fixture().await;
        let seen = fx
            .service
            .for_appointment(&fx.patient, fx.appointment_id, &RequestContext::new("corr-7"))
            .await
            .unwrap();
        assert!(seen.is_none());
    }

    #[tokio::test]
    async fn should_emit_exactly_one_success_record_per_mutation() {
        let fx = fixture().await;
        let ctx = RequestContext::new("corr-8");
        let view = fx.service.create(&fx.author, payload(&fx), &ctx).await.unwrap();
        fx.service.finalize(&fx.author, view.id, &ctx).await.unwrap();

        let successes: Vec<_> = fx
            .store
            .audit_trail()
            .await
            .into_iter()
            .filter(|r| r.status == AuditStatus::Success)
            .collect();
        assert_eq!(successes.len(), 2);
        assert!(successes.iter().all(|r| r.resource_id == Some(view.id)));
        assert_eq!(successes[1].action, AuditAction::Finalize);
        assert_eq!(
            successes[1].old_values,
            Some(json!({ "status": "draft" }))
        );
        assert_eq!(
            successes[1].new_values,
            Some(json!({ "status": "finalized" }))
        );
    }
}
