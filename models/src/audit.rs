// models/src/audit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

use crate::actor::ActorRole;

/// Actions recorded on the audit ledger, rendered to the compliance wire
/// strings downstream reporting expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Register,
    Login,
    Create,
    Cancel,
    View,
    Update,
    Finalize,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditAction::Register => write!(f, "REGISTER"),
            AuditAction::Login => write!(f, "LOGIN"),
            AuditAction::Create => write!(f, "CREATE"),
            AuditAction::Cancel => write!(f, "CANCEL"),
            AuditAction::View => write!(f, "VIEW"),
            AuditAction::Update => write!(f, "UPDATE"),
            AuditAction::Finalize => write!(f, "FINALIZE"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditResource {
    Patient,
    Clinician,
    Appointment,
    ClinicalNote,
}

impl fmt::Display for AuditResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditResource::Patient => write!(f, "patient"),
            AuditResource::Clinician => write!(f, "clinician"),
            AuditResource::Appointment => write!(f, "appointment"),
            AuditResource::ClinicalNote => write!(f, "clinical_note"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Failure,
}

/// One immutable observation of an access decision or mutation outcome.
/// Append-only: never updated, never deleted, never a source of authority
/// for later decisions. `actor_id` is a string because failed registration
/// and login attempts are recorded before any identity exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub actor_id: String,
    pub actor_role: ActorRole,
    pub action: AuditAction,
    pub resource_type: AuditResource,
    pub resource_id: Option<Uuid>,
    pub old_values: Option<Value>,
    pub new_values: Option<Value>,
    pub ip_address: Option<String>,
    pub correlation_id: Option<String>,
    pub description: String,
    pub status: AuditStatus,
    pub created_at: DateTime<Utc>,
}

impl AuditRecord {
    /// Actor id recorded when no authenticated identity exists yet.
    pub const UNKNOWN_ACTOR: &'static str = "unknown";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_render_compliance_wire_strings() {
        assert_eq!(AuditAction::Finalize.to_string(), "FINALIZE");
        assert_eq!(AuditResource::ClinicalNote.to_string(), "clinical_note");
        assert_eq!(serde_json::to_string(&AuditAction::Cancel).unwrap(), "\"CANCEL\"");
        assert_eq!(
            serde_json::to_string(&AuditResource::ClinicalNote).unwrap(),
            "\"clinical_note\""
        );
        assert_eq!(serde_json::to_string(&AuditStatus::Failure).unwrap(), "\"failure\"");
    }
}
