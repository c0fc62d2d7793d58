// models/src/clinician.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored clinician record. Email and license number are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clinician {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
    pub specialization: String,
    pub bio: Option<String>,
    pub phone: String,
    pub status: String,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Clinician {
    pub fn from_registration(registration: &RegisterClinician, password_hash: String) -> Self {
        let now = Utc::now();
        Clinician {
            id: Uuid::new_v4(),
            email: registration.email.clone(),
            password_hash,
            first_name: registration.first_name.clone(),
            last_name: registration.last_name.clone(),
            license_number: registration.license_number.clone(),
            specialization: registration.specialization.clone(),
            bio: registration.bio.clone(),
            phone: registration.phone.clone(),
            status: "active".to_string(),
            email_verified: false,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterClinician {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
    pub specialization: String,
    pub bio: Option<String>,
    pub phone: String,
}

/// Compact projection returned alongside tokens on register/login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicianSummary {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
}

impl From<&Clinician> for ClinicianSummary {
    fn from(clinician: &Clinician) -> Self {
        ClinicianSummary {
            id: clinician.id,
            email: clinician.email.clone(),
            first_name: clinician.first_name.clone(),
            last_name: clinician.last_name.clone(),
            specialization: clinician.specialization.clone(),
        }
    }
}

/// Directory profile for a single clinician.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicianProfile {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
    pub specialization: String,
    pub phone: String,
}

impl From<&Clinician> for ClinicianProfile {
    fn from(clinician: &Clinician) -> Self {
        ClinicianProfile {
            id: clinician.id,
            email: clinician.email.clone(),
            first_name: clinician.first_name.clone(),
            last_name: clinician.last_name.clone(),
            license_number: clinician.license_number.clone(),
            specialization: clinician.specialization.clone(),
            phone: clinician.phone.clone(),
        }
    }
}

/// Directory listing entry; no email or license number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClinicianListing {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub bio: Option<String>,
    pub phone: String,
}

impl From<&Clinician> for ClinicianListing {
    fn from(clinician: &Clinician) -> Self {
        ClinicianListing {
            id: clinician.id,
            first_name: clinician.first_name.clone(),
            last_name: clinician.last_name.clone(),
            specialization: clinician.specialization.clone(),
            bio: clinician.bio.clone(),
            phone: clinician.phone.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_keep_hash_out_of_directory_projections() {
        let registration = RegisterClinician {
            email: "d1@example.com".to_string(),
            password: "secret-secret".to_string(),
            first_name: "Dana".to_string(),
            last_name: "One".to_string(),
            license_number: "LIC-1001".to_string(),
            specialization: "cardiology".to_string(),
            bio: None,
            phone: "555-0200".to_string(),
        };
        let clinician = Clinician::from_registration(&registration, "$2b$12$hash".to_string());
        let profile = serde_json::to_value(ClinicianProfile::from(&clinician)).unwrap();
        assert!(profile.get("password_hash").is_none());
        let listing = serde_json::to_value(ClinicianListing::from(&clinician)).unwrap();
        assert!(listing.get("password_hash").is_none());
        assert!(listing.get("email").is_none());
        assert!(listing.get("license_number").is_none());
    }
}
