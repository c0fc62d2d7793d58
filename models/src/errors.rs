// models/src/errors.rs

pub use thiserror::Error;

/// The error taxonomy every orchestrator operation returns. Each variant
/// carries a stable machine-readable code (see [`DomainError::code`]) so
/// callers can branch without parsing the human message.
///
/// `PermissionDenied` and `NotFound` are deliberately distinct: conflating
/// them either over-discloses (an attacker learns a record exists) or
/// under-discloses (a legitimate caller cannot tell why access failed).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("{0}")]
    PermissionDenied(String),
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    InvalidState(String),
    #[error("{0}")]
    InvalidDate(String),
    #[error("{0}")]
    Validation(String),
    #[error("Email already registered")]
    EmailExists,
    #[error("License number already registered")]
    LicenseExists,
    #[error("A clinical note already exists for this appointment")]
    NoteExists,
    /// A persistence or credential collaborator failed. The underlying cause
    /// is logged operationally and never surfaced to the caller.
    #[error("A required dependency is unavailable")]
    Dependency,
}

impl DomainError {
    pub fn code(&self) -> &'static str {
        match self {
            DomainError::PermissionDenied(_) => "FORBIDDEN",
            DomainError::InvalidCredentials => "INVALID_CREDENTIALS",
            DomainError::NotFound(_) => "NOT_FOUND",
            DomainError::InvalidState(_) => "INVALID_STATE",
            DomainError::InvalidDate(_) => "INVALID_DATE",
            DomainError::Validation(_) => "VALIDATION_ERROR",
            DomainError::EmailExists => "EMAIL_EXISTS",
            DomainError::LicenseExists => "LICENSE_EXISTS",
            DomainError::NoteExists => "NOTE_EXISTS",
            DomainError::Dependency => "DEPENDENCY_FAILURE",
        }
    }
}

/// A type alias for a `Result` that returns a `DomainError` on failure.
pub type DomainResult<T> = Result<T, DomainError>;
