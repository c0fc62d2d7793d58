// services/src/lib.rs
//
// Lifecycle orchestrators. Every operation runs the same sequence:
// authorize, validate against the record state machine, mutate, append to
// the audit ledger, return a sanitized projection.

pub mod appointments;
pub mod audit;
pub mod clinicians;
pub mod context;
pub mod notes;
pub mod patients;
pub mod registration;

pub use appointments::AppointmentService;
pub use audit::{AuditEntry, AuditLedger};
pub use clinicians::ClinicianService;
pub use context::RequestContext;
pub use notes::ClinicalNoteService;
pub use patients::PatientService;
pub use registration::{ClinicianAuth, PatientAuth, RegistrationService};
