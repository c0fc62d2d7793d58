// services/src/registration.rs

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::audit::{AuditEntry, AuditLedger};
use crate::context::RequestContext;
use models::{
    Actor, ActorRole, AuditAction, AuditRecord, AuditResource, AuditStatus, Clinician,
    ClinicianSummary, DomainError, DomainResult, LoginCredentials, Patient, PatientSummary,
    RegisterClinician, RegisterPatient,
};
use security::{hash_password, verify_password, TokenIssuer};
use storage::{ClinicianStore, PatientStore};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientAuth {
    pub token: String,
    pub patient: PatientSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicianAuth {
    pub token: String,
    pub clinician: ClinicianSummary,
}

/// Registers identities and exchanges credentials for tokens. Login
/// failures never disclose whether the email or the password was wrong,
/// and the failed attempt is always audited.
pub struct RegistrationService {
    patients: Arc<dyn PatientStore>,
    clinicians: Arc<dyn ClinicianStore>,
    tokens: TokenIssuer,
    ledger: AuditLedger,
}

impl RegistrationService {
    pub fn new(
        patients: Arc<dyn PatientStore>,
        clinicians: Arc<dyn ClinicianStore>,
        tokens: TokenIssuer,
        ledger: AuditLedger,
    ) -> Self {
        RegistrationService { patients, clinicians, tokens, ledger }
    }

    fn check_password_policy(password: &str) -> DomainResult<()> {
        if password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }
        Ok(())
    }

    fn hash(&self, password: &str) -> DomainResult<String> {
        hash_password(password).map_err(|e| {
            tracing::error!(error = %e, "credential collaborator failed to hash password");
            DomainError::Dependency
        })
    }

    fn issue(&self, actor: &Actor) -> DomainResult<String> {
        self.tokens.issue(actor).map_err(|e| {
            tracing::error!(error = %e, "credential collaborator failed to issue token");
            DomainError::Dependency
        })
    }

    pub async fn register_patient(
        &self,
        payload: RegisterPatient,
        ctx: &RequestContext,
    ) -> DomainResult<PatientAuth> {
        Self::check_password_policy(&payload.password)?;

        if self.patients.patient_by_email(&payload.email).await?.is_some() {
            self.ledger
                .record(
                    ctx,
                    AuditEntry {
                        actor_id: AuditRecord::UNKNOWN_ACTOR.to_string(),
                        actor_role: ActorRole::Patient,
                        action: AuditAction::Register,
                        resource_type: AuditResource::Patient,
                        resource_id: None,
                        old_values: None,
                        new_values: None,
                        description: "Patient registration failed - email already exists"
                            .to_string(),
                        status: AuditStatus::Failure,
                    },
                )
                .await;
            return Err(DomainError::EmailExists);
        }

        let password_hash = self.hash(&payload.password)?;
        let patient = Patient::from_registration(&payload, password_hash);
        self.patients.create_patient(&patient).await?;

        let actor = Actor::patient(patient.id);
        let token = self.issue(&actor)?;

        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id: patient.id.to_string(),
                    actor_role: ActorRole::Patient,
                    action: AuditAction::Register,
                    resource_type: AuditResource::Patient,
                    resource_id: Some(patient.id),
                    old_values: None,
                    new_values: Some(json!({ "email": patient.email })),
                    description: "Patient registered successfully".to_string(),
                    status: AuditStatus::Success,
                },
            )
            .await;

        tracing::info!(patient_id = %patient.id, correlation_id = %ctx.correlation_id, "patient registered");

        Ok(PatientAuth { token, patient: PatientSummary::from(&patient) })
    }

    pub async fn login_patient(
        &self,
        credentials: LoginCredentials,
        ctx: &RequestContext,
    ) -> DomainResult<PatientAuth> {
        let Some(patient) = self.patients.patient_by_email(&credentials.email).await? else {
            self.record_login_failure(
                ctx,
                AuditRecord::UNKNOWN_ACTOR.to_string(),
                ActorRole::Patient,
                AuditResource::Patient,
                None,
                "Login failed - patient not found",
            )
            .await;
            return Err(DomainError::InvalidCredentials);
        };

        if !self.verify(&credentials.password, &patient.password_hash)? {
            self.record_login_failure(
                ctx,
                patient.id.to_string(),
                ActorRole::Patient,
                AuditResource::Patient,
                Some(patient.id),
                "Login failed - invalid password",
            )
            .await;
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.issue(&Actor::patient(patient.id))?;

        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id: patient.id.to_string(),
                    actor_role: ActorRole::Patient,
                    action: AuditAction::Login,
                    resource_type: AuditResource::Patient,
                    resource_id: Some(patient.id),
                    old_values: None,
                    new_values: None,
                    description: "Patient logged in successfully".to_string(),
                    status: AuditStatus::Success,
                },
            )
            .await;

        tracing::info!(patient_id = %patient.id, correlation_id = %ctx.correlation_id, "patient logged in");

        Ok(PatientAuth { token, patient: PatientSummary::from(&patient) })
    }

    pub async fn register_clinician(
        &self,
        payload: RegisterClinician,
        ctx: &RequestContext,
    ) -> DomainResult<ClinicianAuth> {
        Self::check_password_policy(&payload.password)?;

        if self.clinicians.clinician_by_email(&payload.email).await?.is_some() {
            self.record_registration_failure(
                ctx,
                "Clinician registration failed - email already exists",
            )
            .await;
            return Err(DomainError::EmailExists);
        }
        if self
            .clinicians
            .clinician_by_license(&payload.license_number)
            .await?
            .is_some()
        {
            self.record_registration_failure(
                ctx,
                "Clinician registration failed - license number already exists",
            )
            .await;
            return Err(DomainError::LicenseExists);
        }

        let password_hash = self.hash(&payload.password)?;
        let clinician = Clinician::from_registration(&payload, password_hash);
        self.clinicians.create_clinician(&clinician).await?;

        let token = self.issue(&Actor::clinician(clinician.id))?;

        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id: clinician.id.to_string(),
                    actor_role: ActorRole::Clinician,
                    action: AuditAction::Register,
                    resource_type: AuditResource::Clinician,
                    resource_id: Some(clinician.id),
                    old_values: None,
                    new_values: Some(json!({ "email": clinician.email })),
                    description: "Clinician registered successfully".to_string(),
                    status: AuditStatus::Success,
                },
            )
            .await;

        tracing::info!(clinician_id = %clinician.id, correlation_id = %ctx.correlation_id, "clinician registered");

        Ok(ClinicianAuth { token, clinician: ClinicianSummary::from(&clinician) })
    }

    pub async fn login_clinician(
        &self,
        credentials: LoginCredentials,
        ctx: &RequestContext,
    ) -> DomainResult<ClinicianAuth> {
        let Some(clinician) = self.clinicians.clinician_by_email(&credentials.email).await? else {
            self.record_login_failure(
                ctx,
                AuditRecord::UNKNOWN_ACTOR.to_string(),
                ActorRole::Clinician,
                AuditResource::Clinician,
                None,
                "Login failed - clinician not found",
            )
            .await;
            return Err(DomainError::InvalidCredentials);
        };

        if !self.verify(&credentials.password, &clinician.password_hash)? {
            self.record_login_failure(
                ctx,
                clinician.id.to_string(),
                ActorRole::Clinician,
                AuditResource::Clinician,
                Some(clinician.id),
                "Login failed - invalid password",
            )
            .await;
            return Err(DomainError::InvalidCredentials);
        }

        let token = self.issue(&Actor::clinician(clinician.id))?;

        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id: clinician.id.to_string(),
                    actor_role: ActorRole::Clinician,
                    action: AuditAction::Login,
                    resource_type: AuditResource::Clinician,
                    resource_id: Some(clinician.id),
                    old_values: None,
                    new_values: None,
                    description: "Clinician logged in successfully".to_string(),
                    status: AuditStatus::Success,
                },
            )
            .await;

        tracing::info!(clinician_id = %clinician.id, correlation_id = %ctx.correlation_id, "clinician logged in");

        Ok(ClinicianAuth { token, clinician: ClinicianSummary::from(&clinician) })
    }

    /// Verifies a token and reconstructs the actor it names. How incoming
    /// requests become an [`Actor`] before reaching the other services.
    pub fn authenticate(&self, token: &str) -> DomainResult<Actor> {
        self.tokens.validate(token).map_err(|_| {
            DomainError::PermissionDenied("Invalid or expired token".to_string())
        })
    }

    fn verify(&self, password: &str, digest: &str) -> DomainResult<bool> {
        verify_password(password, digest).map_err(|e| {
            tracing::error!(error = %e, "credential collaborator failed to verify password");
            DomainError::Dependency
        })
    }

    async fn record_registration_failure(&self, ctx: &RequestContext, description: &str) {
        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id: AuditRecord::UNKNOWN_ACTOR.to_string(),
                    actor_role: ActorRole::Clinician,
                    action: AuditAction::Register,
                    resource_type: AuditResource::Clinician,
                    resource_id: None,
                    old_values: None,
                    new_values: None,
                    description: description.to_string(),
                    status: AuditStatus::Failure,
                },
            )
            .await;
    }

    #[allow(clippy::too_many_arguments)]
    async fn record_login_failure(
        &self,
        ctx: &RequestContext,
        actor_id: String,
        actor_role: ActorRole,
        resource_type: AuditResource,
        resource_id: Option<uuid::Uuid>,
        description: &str,
    ) {
        self.ledger
            .record(
                ctx,
                AuditEntry {
                    actor_id,
                    actor_role,
                    action: AuditAction::Login,
                    resource_type,
                    resource_id,
                    old_values: None,
                    new_values: None,
                    description: description.to_string(),
                    status: AuditStatus::Failure,
                },
            )
            .await;
    }
}
