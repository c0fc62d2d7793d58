// models/src/note.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

/// Clinical note lifecycle: `Draft` → `Finalized` → `Signed`. Content is
/// mutable only while `Draft`. No signing transition is exposed by the
/// orchestrators; `Signed` exists for downstream systems that ingest notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    Draft,
    Finalized,
    Signed,
}

impl NoteStatus {
    pub fn accepts_changes(&self) -> bool {
        matches!(self, NoteStatus::Draft)
    }
}

impl fmt::Display for NoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteStatus::Draft => write!(f, "draft"),
            NoteStatus::Finalized => write!(f, "finalized"),
            NoteStatus::Signed => write!(f, "signed"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalNote {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub clinician_id: Uuid,
    pub chief_complaint: Option<String>,
    pub history_of_present_illness: Option<String>,
    pub physical_exam: Option<String>,
    pub assessment: Option<String>,
    pub plan: Option<String>,
    pub medications: Option<String>,
    pub follow_up: Option<String>,
    pub status: NoteStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClinicalNote {
    /// Builds a new `Draft` note. The authoring clinician is passed in by
    /// the orchestrator from the actor identity, never taken from input.
    pub fn from_payload(payload: &CreateClinicalNote, clinician_id: Uuid) -> Self {
        let now = Utc::now();
        ClinicalNote {
            id: Uuid::new_v4(),
            appointment_id: payload.appointment_id,
            patient_id: payload.patient_id,
            clinician_id,
            chief_complaint: payload.chief_complaint.clone(),
            history_of_present_illness: payload.history_of_present_illness.clone(),
            physical_exam: payload.physical_exam.clone(),
            assessment: payload.assessment.clone(),
            plan: payload.plan.clone(),
            medications: payload.medications.clone(),
            follow_up: payload.follow_up.clone(),
            status: NoteStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies content changes. Fails with `InvalidState` and leaves the
    /// note untouched unless the current status is `Draft`.
    pub fn apply_changes(&mut self, changes: &NoteChanges) -> DomainResult<()> {
        if !self.status.accepts_changes() {
            return Err(DomainError::InvalidState(
                "Cannot modify finalized or signed notes".to_string(),
            ));
        }
        if let Some(ref value) = changes.chief_complaint {
            self.chief_complaint = Some(value.clone());
        }
        if let Some(ref value) = changes.history_of_present_illness {
            self.history_of_present_illness = Some(value.clone());
        }
        if let Some(ref value) = changes.physical_exam {
            self.physical_exam = Some(value.clone());
        }
        if let Some(ref value) = changes.assessment {
            self.assessment = Some(value.clone());
        }
        if let Some(ref value) = changes.plan {
            self.plan = Some(value.clone());
        }
        if let Some(ref value) = changes.medications {
            self.medications = Some(value.clone());
        }
        if let Some(ref value) = changes.follow_up {
            self.follow_up = Some(value.clone());
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// The only exposed transition: `draft → finalized`. Finalizing a
    /// non-draft note fails with `InvalidState`.
    pub fn finalize(&mut self) -> DomainResult<()> {
        if self.status != NoteStatus::Draft {
            return Err(DomainError::InvalidState(
                "Only draft notes can be finalized".to_string(),
            ));
        }
        self.status = NoteStatus::Finalized;
        self.updated_at = Utc::now();
        Ok(())
    }
}

/// Creation payload. The clinician identity is not part of the payload;
/// the orchestrator forces it to the authenticated actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateClinicalNote {
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub chief_complaint: Option<String>,
    pub history_of_present_illness: Option<String>,
    pub physical_exam: Option<String>,
    pub assessment: Option<String>,
    pub plan: Option<String>,
    pub medications: Option<String>,
    pub follow_up: Option<String>,
}

/// Partial update of note content. Status is deliberately absent; the
/// only status transition is `finalize`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NoteChanges {
    pub chief_complaint: Option<String>,
    pub history_of_present_illness: Option<String>,
    pub physical_exam: Option<String>,
    pub assessment: Option<String>,
    pub plan: Option<String>,
    pub medications: Option<String>,
    pub follow_up: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicalNoteView {
    pub id: Uuid,
    pub appointment_id: Uuid,
    pub patient_id: Uuid,
    pub clinician_id: Uuid,
    pub chief_complaint: Option<String>,
    pub history_of_present_illness: Option<String>,
    pub physical_exam: Option<String>,
    pub assessment: Option<String>,
    pub plan: Option<String>,
    pub medications: Option<String>,
    pub follow_up: Option<String>,
    pub status: NoteStatus,
}

impl From<&ClinicalNote> for ClinicalNoteView {
    fn from(note: &ClinicalNote) -> Self {
        ClinicalNoteView {
            id: note.id,
            appointment_id: note.appointment_id,
            patient_id: note.patient_id,
            clinician_id: note.clinician_id,
            chief_complaint: note.chief_complaint.clone(),
            history_of_present_illness: note.history_of_present_illness.clone(),
            physical_exam: note.physical_exam.clone(),
            assessment: note.assessment.clone(),
            plan: note.plan.clone(),
            medications: note.medications.clone(),
            follow_up: note.follow_up.clone(),
            status: note.status,
        }
    }
}
