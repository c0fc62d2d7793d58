// services/src/patients.rs

use std::sync::Arc;
use uuid::Uuid;

use crate::audit::{AuditEntry, AuditLedger};
use crate::context::RequestContext;
use models::{
    Actor, AuditAction, AuditResource, AuditStatus, DomainError, DomainResult, PatientProfile,
    PatientSummary, ProfileChanges,
};
use security::{evaluate, AccessDecision, PolicyAction};
use storage::PatientStore;

/// Self-service patient profile access. Patients can only ever reach their
/// own row; denied attempts land on the audit ledger.
pub struct PatientService {
    patients: Arc<dyn PatientStore>,
    ledger: AuditLedger,
}

impl PatientService {
    pub fn new(patients: Arc<dyn PatientStore>, ledger: AuditLedger) -> Self {
        PatientService { patients, ledger }
    }

    pub async fn profile(
        &self,
        actor: &Actor,
        patient_id: Uuid,
        ctx: &RequestContext,
    ) -> DomainResult<PatientProfile> {
        let action = PolicyAction::ViewPatientProfile { patient_id };
        if let AccessDecision::Deny(reason) = evaluate(actor, &action) {
            self.ledger
                .record(
                    ctx,
                    AuditEntry {
                        actor_id: actor.id.to_string(),
                        actor_role: actor.role,
                        action: AuditAction::View,
                        resource_type: AuditResource::Patient,
                        resource_id: Some(patient_id),
                        old_values: None,
                        new_values: None,
                        description: "Unauthorized access to patient data".to_string(),
                        status: AuditStatus::Failure,
                    },
                )
                .await;
            return Err(DomainError::PermissionDenied(reason.message()));
        }

        let patient = self
            .patients
            .patient_by_id(&patient_id)
            .await?
            .ok_or(DomainError::NotFound("Patient"))?;

        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id: actor.id.to_string(),
                    actor_role: actor.role,
                    action: AuditAction::View,
                    resource_type: AuditResource::Patient,
                    resource_id: Some(patient_id),
                    old_values: None,
                    new_values: None,
                    description: "Patient data accessed".to_string(),
                    status: AuditStatus::Success,
                },
            )
            .await;

        Ok(PatientProfile::from(&patient))
    }

    pub async fn update_profile(
        &self,
        actor: &Actor,
        patient_id: Uuid,
        changes: ProfileChanges,
        ctx: &RequestContext,
    ) -> DomainResult<PatientSummary> {
        let action = PolicyAction::UpdatePatientProfile { patient_id };
        if let AccessDecision::Deny(reason) = evaluate(actor, &action) {
            self.ledger
                .record(
                    ctx,
                    AuditEntry {
                        actor_id: actor.id.to_string(),
                        actor_role: actor.role,
                        action: AuditAction::Update,
                        resource_type: AuditResource::Patient,
                        resource_id: Some(patient_id),
                        old_values: None,
                        new_values: None,
                        description: "Unauthorized patient update".to_string(),
                        status: AuditStatus::Failure,
                    },
                )
                .await;
            return Err(DomainError::PermissionDenied(reason.message()));
        }

        let mut patient = self
            .patients
            .patient_by_id(&patient_id)
            .await?
            .ok_or(DomainError::NotFound("Patient"))?;

        // Snapshots use the profile projection so the password hash never
        // lands on the ledger.
        let old_snapshot = serde_json::to_value(PatientProfile::from(&patient)).ok();
        patient.apply_profile_changes(&changes);
        self.patients.update_patient(&patient).await?;

        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id: actor.id.to_string(),
                    actor_role: actor.role,
                    action: AuditAction::Update,
                    resource_type: AuditResource::Patient,
                    resource_id: Some(patient_id),
                    old_values: old_snapshot,
                    new_values: serde_json::to_value(PatientProfile::from(&patient)).ok(),
                    description: "Patient updated".to_string(),
                    status: AuditStatus::Success,
                },
            )
            .await;

        tracing::info!(patient_id = %patient_id, correlation_id = %ctx.correlation_id, "patient updated");

        Ok(PatientSummary::from(&patient))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use models::{Patient, RegisterPatient};
    use storage::InMemoryStore;

    async fn fixture() -> (PatientService, InMemoryStore, Actor) {
        let store = InMemoryStore::new();
        let patient = Patient::from_registration(
            &RegisterPatient {
                email: "p1@example.com".to_string(),
                password: "x".to_string(),
                first_name: "Pat".to_string(),
                last_name: "One".to_string(),
                date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
                phone: "555-0100".to_string(),
                gender: "female".to_string(),
                address: None,
                city: None,
                state: None,
                zip_code: None,
            },
            "hash".to_string(),
        );
        store.create_patient(&patient).await.unwrap();
        let service = PatientService::new(
            Arc::new(store.clone()),
            AuditLedger::new(Arc::new(store.clone())),
        );
        (service, store, Actor::patient(patient.id))
    }

    #[tokio::test]
    async fn should_return_own_profile_without_hash() {
        let (service, _store, actor) = fixture().await;
        let profile = service
            .profile(&actor, actor.id, &RequestContext::new("corr-1"))
            .await
            .unwrap();
        assert_eq!(profile.email, "p1@example.com");
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn should_deny_profile_of_another_patient_with_failure_audit() {
        let (service, store, actor) = fixture().await;
        let other = Uuid::new_v4();
        let err = service
            .profile(&actor, other, &RequestContext::new("corr-2"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");

        let trail = store.audit_trail().await;
        assert_eq!(trail.len(), 1);
        assert_eq!(trail[0].status, AuditStatus::Failure);
        assert_eq!(trail[0].resource_id, Some(other));
    }

    #[tokio::test]
    async fn should_update_own_profile_and_snapshot_old_values() {
        let (service, store, actor) = fixture().await;
        let ctx = RequestContext::new("corr-3");
        let changes = ProfileChanges {
            phone: Some("555-0199".to_string()),
            ..ProfileChanges::default()
        };
        let summary = service.update_profile(&actor, actor.id, changes, &ctx).await.unwrap();
        assert_eq!(summary.id, actor.id);

        let trail = store.audit_trail().await;
        assert_eq!(trail.len(), 1);
        let old = trail[0].old_values.as_ref().unwrap();
        let new = trail[0].new_values.as_ref().unwrap();
        assert_eq!(old["phone"], "555-0100");
        assert_eq!(new["phone"], "555-0199");
        assert!(old.get("password_hash").is_none());
    }

    #[tokio::test]
    async fn should_deny_update_of_another_patient() {
        let (service, store, actor) = fixture().await;
        let err = service
            .update_profile(
                &actor,
                Uuid::new_v4(),
                ProfileChanges::default(),
                &RequestContext::new("corr-4"),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "FORBIDDEN");
        assert_eq!(store.audit_trail().await.len(), 1);
    }
}
