// models/src/lib.rs

pub mod actor;
pub mod appointment;
pub mod audit;
pub mod clinician;
pub mod errors;
pub mod note;
pub mod patient;
pub mod redact;

pub use actor::{Actor, ActorRole};
pub use appointment::{Appointment, AppointmentStatus, AppointmentType, AppointmentView, BookAppointment};
pub use audit::{AuditAction, AuditRecord, AuditResource, AuditStatus};
pub use clinician::{Clinician, ClinicianListing, ClinicianProfile, ClinicianSummary, RegisterClinician};
pub use errors::{DomainError, DomainResult};
pub use note::{ClinicalNote, ClinicalNoteView, CreateClinicalNote, NoteChanges, NoteStatus};
pub use patient::{LoginCredentials, Patient, PatientProfile, PatientSummary, ProfileChanges, RegisterPatient};
pub use redact::redact_phi;
