// models/src/appointment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::errors::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentType {
    InPerson,
    Remote,
}

impl Default for AppointmentType {
    fn default() -> Self {
        AppointmentType::InPerson
    }
}

/// Appointment lifecycle. `Scheduled` is the only non-terminal state.
/// `Completed` and `NoShow` are modeled for downstream reporting but no
/// transition into them is exposed by any orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppointmentStatus {
    Scheduled,
    Cancelled,
    Completed,
    NoShow,
}

impl AppointmentStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Scheduled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
            AppointmentStatus::NoShow => write!(f, "no-show"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub clinician_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub reason_for_visit: Option<String>,
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appointment {
    /// Builds a new `Scheduled` appointment from a booking payload. The
    /// payload must already have passed [`BookAppointment::validate`].
    pub fn from_booking(booking: &BookAppointment) -> Self {
        let now = Utc::now();
        Appointment {
            id: Uuid::new_v4(),
            patient_id: booking.patient_id,
            clinician_id: booking.clinician_id,
            scheduled_at: booking.scheduled_at,
            duration_minutes: booking.duration_minutes.unwrap_or(30),
            reason_for_visit: booking.reason_for_visit.clone(),
            appointment_type: booking.appointment_type.unwrap_or_default(),
            status: AppointmentStatus::Scheduled,
            created_at: now,
            updated_at: now,
        }
    }

    /// Moves the appointment to `Cancelled` unconditionally. Cancelling an
    /// already-cancelled appointment succeeds again; the persistence layer
    /// applies an unconditional row update and no idempotency guard exists
    /// at this layer (a tolerated weak invariant, asserted by tests).
    pub fn cancel(&mut self) {
        self.status = AppointmentStatus::Cancelled;
        self.updated_at = Utc::now();
    }
}

/// Booking payload. `duration_minutes` defaults to 30 and
/// `appointment_type` to in-person when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookAppointment {
    pub patient_id: Uuid,
    pub clinician_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: Option<u32>,
    pub reason_for_visit: Option<String>,
    pub appointment_type: Option<AppointmentType>,
}

impl BookAppointment {
    /// Structural checks that do not require resource state: the slot must
    /// be strictly in the future and the duration positive.
    pub fn validate(&self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.scheduled_at <= now {
            return Err(DomainError::InvalidDate(
                "Appointment must be scheduled for a future date".to_string(),
            ));
        }
        if let Some(0) = self.duration_minutes {
            return Err(DomainError::Validation(
                "Appointment duration must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sanitized projection returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentView {
    pub id: Uuid,
    pub patient_id: Uuid,
    pub clinician_id: Uuid,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: u32,
    pub reason_for_visit: Option<String>,
    pub appointment_type: AppointmentType,
    pub status: AppointmentStatus,
}

impl From<&Appointment> for AppointmentView {
    fn from(appointment: &Appointment) -> Self {
        AppointmentView {
            id: appointment.id,
            patient_id: appointment.patient_id,
            clinician_id: appointment.clinician_id,
            scheduled_at: appointment.scheduled_at,
            duration_minutes: appointment.duration_minutes,
            reason_for_visit: appointment.reason_for_visit.clone(),
            appointment_type: appointment.appointment_type,
            status: appointment.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn booking(scheduled_at: DateTime<Utc>) -> BookAppointment {
        BookAppointment {
            patient_id: Uuid::new_v4(),
            clinician_id: Uuid::new_v4(),
            scheduled_at,
            duration_minutes: None,
            reason_for_visit: None,
            appointment_type: None,
        }
    }

    #[test]
    fn should_reject_booking_in_the_past() {
        let now = Utc::now();
        let payload = booking(now - Duration::hours(1));
        let err = payload.validate(now).unwrap_err();
        assert_eq!(err.code(), "INVALID_DATE");
    }

    #[test]
    fn should_reject_booking_exactly_at_now() {
        let now = Utc::now();
        let payload = booking(now);
        assert!(payload.validate(now).is_err());
    }

    #[test]
    fn should_reject_zero_duration() {
        let now = Utc::now();
        let mut payload = booking(now + Duration::days(1));
        payload.duration_minutes = Some(0);
        let err = payload.validate(now).unwrap_err();
        assert_eq!(err.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn should_default_duration_and_type() {
        let now = Utc::now();
        let payload = booking(now + Duration::days(1));
        let appointment = Appointment::from_booking(&payload);
        assert_eq!(appointment.duration_minutes, 30);
        assert_eq!(appointment.appointment_type, AppointmentType::InPerson);
        assert_eq!(appointment.status, AppointmentStatus::Scheduled);
    }

    #[test]
    fn should_cancel_without_idempotency_guard() {
        let now = Utc::now();
        let mut appointment = Appointment::from_booking(&booking(now + Duration::days(1)));
        appointment.cancel();
        assert_eq!(appointment.status, AppointmentStatus::Cancelled);
        // Second cancel still succeeds; the weak invariant is documented.
        appointment.cancel();
        assert_eq!(appointment.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn should_serialize_status_in_kebab_case() {
        let json = serde_json::to_string(&AppointmentStatus::NoShow).unwrap();
        assert_eq!(json, "\"no-show\"");
        let json = serde_json::to_string(&AppointmentType::InPerson).unwrap();
        assert_eq!(json, "\"in-person\"");
    }
}
