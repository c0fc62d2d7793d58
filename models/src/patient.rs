// models/src/patient.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored patient record. Holds the password hash, never the plaintext
/// password; no projection type below carries the hash out of this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub gender: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub status: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    /// Creates a stored record from a registration payload and an
    /// already-computed password hash.
    pub fn from_registration(registration: &RegisterPatient, password_hash: String) -> Self {
        let now = Utc::now();
        Patient {
            id: Uuid::new_v4(),
            email: registration.email.clone(),
            password_hash,
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            date_of_birth: registration.date_of_birth,
            phone: registration.phone.clone(),
            gender: registration.gender.clone(),
            address: registration.address.clone(),
            city: registration.city.clone(),
            state: registration.state.clone(),
            zip_code: registration.zip_code.clone(),
            status: "active".to_string(),
            email_verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Registration payload; holds the plaintext password only transiently.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterPatient {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub gender: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

/// Login payload, shared by patients and clinicians.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

/// Compact projection returned alongside tokens on register/login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&Patient> for PatientSummary {
    fn from(patient: &Patient) -> Self {
        PatientSummary {
            id: patient.id,
            email: patient.email.clone(),
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
        }
    }
}

/// Full self-service profile projection. Excludes the password hash and
/// internal flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub date_of_birth: NaiveDate,
    pub gender: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl From<&Patient> for PatientProfile {
    fn from(patient: &Patient) -> Self {
        PatientProfile {
            id: patient.id,
            email: patient.email.clone(),
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
            phone: patient.phone.clone(),
            date_of_birth: patient.date_of_birth,
            gender: patient.gender.clone(),
            address: patient.address.clone(),
            city: patient.city.clone(),
            state: patient.state.clone(),
            zip_code: patient.zip_code.clone(),
        }
    }
}

/// Self-service profile update. Email, password, and status are not
/// updatable through this path.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
}

impl Patient {
    pub fn apply_profile_changes(&mut self, changes: &ProfileChanges) {
        if let Some(ref value) = changes.first_name {
            self.first_name = value.clone();
        }
        if let Some(ref value) = changes.last_name {
            self.last_name = value.clone();
        }
        if let Some(ref value) = changes.phone {
            self.phone = value.clone();
        }
        if let Some(ref value) = changes.address {
            self.address = Some(value.clone());
        }
        if let Some(ref value) = changes.city {
            self.city = Some(value.clone());
        }
        if let Some(ref value) = changes.state {
            self.state = Some(value.clone());
        }
        if let Some(ref value) = changes.zip_code {
            self.zip_code = Some(value.clone());
        }
        self.updated_at = Utc::now();
    }
}
