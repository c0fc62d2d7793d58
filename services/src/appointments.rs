// services/src/appointments.rs

use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use uuid::Uuid;

use crate::audit::{AuditEntry, AuditLedger};
use crate::context::RequestContext;
use models::{
    Actor, Appointment, AppointmentView, AuditAction, AuditResource, AuditStatus, BookAppointment,
    DomainError, DomainResult,
};
use security::{evaluate, AccessDecision, PolicyAction};
use storage::{AppointmentStore, ClinicianStore, PatientStore};

const UPCOMING_LIMIT: usize = 10;

pub struct AppointmentService {
    appointments: Arc<dyn AppointmentStore>,
    patients: Arc<dyn PatientStore>,
    clinicians: Arc<dyn ClinicianStore>,
    ledger: AuditLedger,
}

impl AppointmentService {
    pub fn new(
        appointments: Arc<dyn AppointmentStore>,
        patients: Arc<dyn PatientStore>,
        clinicians: Arc<dyn ClinicianStore>,
        ledger: AuditLedger,
    ) -> Self {
        AppointmentService { appointments, patients, clinicians, ledger }
    }

    /// Books a new appointment. Patients may only book for themselves; the
    /// referenced patient and clinician must exist and the slot must be
    /// strictly in the future.
    pub async fn book(
        &self,
        actor: &Actor,
        payload: BookAppointment,
        ctx: &RequestContext,
    ) -> DomainResult<AppointmentView> {
        let action = PolicyAction::BookAppointment { patient_id: payload.patient_id };
        if let AccessDecision::Deny(reason) = evaluate(actor, &action) {
            self.ledger
                .record(
                    ctx,
                    AuditEntry {
                        actor_id: actor.id.to_string(),
                        actor_role: actor.role,
                        action: AuditAction::Create,
                        resource_type: AuditResource::Appointment,
                        resource_id: None,
                        old_values: None,
                        new_values: None,
                        description: "Appointment booking denied".to_string(),
                        status: AuditStatus::Failure,
                    },
                )
                .await;
            return Err(DomainError::PermissionDenied(reason.message()));
        }

        if self.patients.patient_by_id(&payload.patient_id).await?.is_none() {
            return Err(DomainError::NotFound("Patient"));
        }
        if self.clinicians.clinician_by_id(&payload.clinician_id).await?.is_none() {
            return Err(DomainError::NotFound("Clinician"));
        }
        payload.validate(Utc::now())?;

        let appointment = Appointment::from_booking(&payload);
        self.appointments.create_appointment(&appointment).await?;

        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id: actor.id.to_string(),
                    actor_role: actor.role,
                    action: AuditAction::Create,
                    resource_type: AuditResource::Appointment,
                    resource_id: Some(appointment.id),
                    old_values: None,
                    new_values: Some(json!({ "appointment_id": appointment.id })),
                    description: format!(
                        "Appointment created between patient {} and clinician {}",
                        appointment.patient_id, appointment.clinician_id
                    ),
                    status: AuditStatus::Success,
                },
            )
            .await;

        tracing::info!(
            appointment_id = %appointment.id,
            patient_id = %appointment.patient_id,
            clinician_id = %appointment.clinician_id,
            correlation_id = %ctx.correlation_id,
            "appointment created"
        );

        Ok(AppointmentView::from(&appointment))
    }

    /// Cancels an appointment. Either party on the appointment may cancel.
    /// The status update is unconditional: cancelling an already-cancelled
    /// appointment succeeds again (no idempotency guard at this layer).
    pub async fn cancel(
        &self,
        actor: &Actor,
        appointment_id: Uuid,
        ctx: &RequestContext,
    ) -> DomainResult<AppointmentView> {
        let mut appointment = self
            .appointments
            .appointment_by_id(&appointment_id)
            .await?
            .ok_or(DomainError::NotFound("Appointment"))?;

        let action = PolicyAction::CancelAppointment {
            patient_id: appointment.patient_id,
            clinician_id: appointment.clinician_id,
        };
        if let AccessDecision::Deny(reason) = evaluate(actor, &action) {
            self.ledger
                .record(
                    ctx,
                    AuditEntry {
                        actor_id: actor.id.to_string(),
                        actor_role: actor.role,
                        action: AuditAction::Cancel,
                        resource_type: AuditResource::Appointment,
                        resource_id: Some(appointment_id),
                        old_values: None,
                        new_values: None,
                        description: "Appointment cancellation denied".to_string(),
                        status: AuditStatus::Failure,
                    },
                )
                .await;
            return Err(DomainError::PermissionDenied(reason.message()));
        }

        let old_status = appointment.status;
        appointment.cancel();
        self.appointments.update_appointment(&appointment).await?;

        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id: actor.id.to_string(),
                    actor_role: actor.role,
                    action: AuditAction::Cancel,
                    resource_type: AuditResource::Appointment,
                    resource_id: Some(appointment_id),
                    old_values: Some(json!({ "status": old_status })),
                    new_values: Some(json!({ "status": appointment.status })),
                    description: "Appointment cancelled".to_string(),
                    status: AuditStatus::Success,
                },
            )
            .await;

        tracing::info!(
            appointment_id = %appointment_id,
            correlation_id = %ctx.correlation_id,
            "appointment cancelled"
        );

        Ok(AppointmentView::from(&appointment))
    }

    /// Lists at most ten future appointments for a patient, soonest first.
    /// Patients may only view their own schedule.
    pub async fn upcoming(
        &self,
        actor: &Actor,
        patient_id: Uuid,
        ctx: &RequestContext,
    ) -> DomainResult<Vec<AppointmentView>> {
        let action = PolicyAction::ViewSchedule { patient_id };
        if let AccessDecision::Deny(reason) = evaluate(actor, &action) {
            self.ledger
                .record(
                    ctx,
                    AuditEntry {
                        actor_id: actor.id.to_string(),
                        actor_role: actor.role,
                        action: AuditAction::View,
                        resource_type: AuditResource::Appointment,
                        resource_id: None,
                        old_values: None,
                        new_values: None,
                        description: "Schedule access denied".to_string(),
                        status: AuditStatus::Failure,
                    },
                )
                .await;
            return Err(DomainError::PermissionDenied(reason.message()));
        }

        let appointments = self
            .appointments
            .upcoming_for_patient(&patient_id, Utc::now(), UPCOMING_LIMIT)
            .await?;

        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id: actor.id.to_string(),
                    actor_role: actor.role,
                    action: AuditAction::View,
                    resource_type: AuditResource::Appointment,
                    resource_id: None,
                    old_values: None,
                    new_values: None,
                    description: "Retrieved upcoming appointments".to_string(),
                    status: AuditStatus::Success,
                },
            )
            .await;

        Ok(appointments.iter().map(AppointmentView::from).collect())
    }
}
