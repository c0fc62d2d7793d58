// models/src/actor.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The two actor classes the policy evaluator distinguishes. A tagged enum
/// rather than a role string so every authorization rule is an exhaustive
/// match the compiler checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Patient,
    Clinician,
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActorRole::Patient => write!(f, "patient"),
            ActorRole::Clinician => write!(f, "clinician"),
        }
    }
}

/// An authenticated party. Reconstructed per request from verified token
/// claims and never persisted by this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Uuid,
    pub role: ActorRole,
}

impl Actor {
    pub fn patient(id: Uuid) -> Self {
        Actor { id, role: ActorRole::Patient }
    }

    pub fn clinician(id: Uuid) -> Self {
        Actor { id, role: ActorRole::Clinician }
    }
}
