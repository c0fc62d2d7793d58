// security/src/policy.rs
//
// The single place access rules live. Orchestrators never compare roles or
// owner ids themselves; they describe the attempted action and ask.

use uuid::Uuid;

use models::{Actor, ActorRole};

/// An attempted action together with the ownership facts the rules need.
/// Ownership ids come from the loaded resource row, never from caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    BookAppointment { patient_id: Uuid },
    CancelAppointment { patient_id: Uuid, clinician_id: Uuid },
    ViewSchedule { patient_id: Uuid },
    CreateNote,
    ModifyNote { author_id: Uuid },
    ViewNote { patient_id: Uuid, author_id: Uuid },
    ViewPatientProfile { patient_id: Uuid },
    UpdatePatientProfile { patient_id: Uuid },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    Deny(DenyReason),
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }
}

/// Denials are structured so orchestrators and the audit ledger can record
/// intent; a boolean would lose why access was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    RoleNotPermitted { action: &'static str },
    NotResourceOwner { action: &'static str },
}

impl DenyReason {
    pub fn message(&self) -> String {
        match self {
            DenyReason::RoleNotPermitted { action } => {
                format!("Role is not permitted to {action}")
            }
            DenyReason::NotResourceOwner { action } => {
                format!("Can only {action} your own records")
            }
        }
    }
}

/// Pure decision function: no I/O, no state, deterministic. Every arm is an
/// exhaustive match over the actor role so a new role or action cannot
/// compile without a rule.
pub fn evaluate(actor: &Actor, action: &PolicyAction) -> AccessDecision {
    match *action {
        PolicyAction::BookAppointment { patient_id } => match actor.role {
            ActorRole::Patient if actor.id == patient_id => AccessDecision::Allow,
            ActorRole::Patient => {
                AccessDecision::Deny(DenyReason::NotResourceOwner { action: "book appointments for" })
            }
            ActorRole::Clinician => {
                AccessDecision::Deny(DenyReason::RoleNotPermitted { action: "book appointments" })
            }
        },
        PolicyAction::CancelAppointment { patient_id, clinician_id } => {
            if actor.id == patient_id || actor.id == clinician_id {
                AccessDecision::Allow
            } else {
                AccessDecision::Deny(DenyReason::NotResourceOwner { action: "cancel" })
            }
        }
        PolicyAction::ViewSchedule { patient_id } => {
            if actor.id == patient_id {
                AccessDecision::Allow
            } else {
                AccessDecision::Deny(DenyReason::NotResourceOwner { action: "view appointments for" })
            }
        }
        PolicyAction::CreateNote => match actor.role {
            ActorRole::Clinician => AccessDecision::Allow,
            ActorRole::Patient => {
                AccessDecision::Deny(DenyReason::RoleNotPermitted { action: "create clinical notes" })
            }
        },
        PolicyAction::ModifyNote { author_id } => match actor.role {
            ActorRole::Clinician if actor.id == author_id => AccessDecision::Allow,
            ActorRole::Clinician => {
                AccessDecision::Deny(DenyReason::NotResourceOwner { action: "modify notes authored by" })
            }
            ActorRole::Patient => {
                AccessDecision::Deny(DenyReason::RoleNotPermitted { action: "modify clinical notes" })
            }
        },
        PolicyAction::ViewNote { patient_id, author_id } => {
            if actor.id == patient_id || actor.id == author_id {
                AccessDecision::Allow
            } else {
                AccessDecision::Deny(DenyReason::NotResourceOwner { action: "view" })
            }
        }
        PolicyAction::ViewPatientProfile { patient_id } => {
            if actor.id == patient_id {
                AccessDecision::Allow
            } else {
                AccessDecision::Deny(DenyReason::NotResourceOwner { action: "view" })
            }
        }
        PolicyAction::UpdatePatientProfile { patient_id } => {
            if actor.id == patient_id {
                AccessDecision::Allow
            } else {
                AccessDecision::Deny(DenyReason::NotResourceOwner { action: "update" })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::Actor;

    #[test]
    fn should_allow_patient_booking_for_self_only() {
        let patient = Actor::patient(Uuid::new_v4());
        let other = Uuid::new_v4();
        assert!(evaluate(&patient, &PolicyAction::BookAppointment { patient_id: patient.id })
            .is_allowed());
        assert!(!evaluate(&patient, &PolicyAction::BookAppointment { patient_id: other })
            .is_allowed());
    }

    #[test]
    fn should_deny_clinician_booking_with_role_reason() {
        let clinician = Actor::clinician(Uuid::new_v4());
        let decision =
            evaluate(&clinician, &PolicyAction::BookAppointment { patient_id: clinician.id });
        assert_eq!(
            decision,
            AccessDecision::Deny(DenyReason::RoleNotPermitted { action: "book appointments" })
        );
    }

    #[test]
    fn should_allow_cancel_to_either_party_only() {
        let patient_id = Uuid::new_v4();
        let clinician_id = Uuid::new_v4();
        let action = PolicyAction::CancelAppointment { patient_id, clinician_id };
        assert!(evaluate(&Actor::patient(patient_id), &action).is_allowed());
        assert!(evaluate(&Actor::clinician(clinician_id), &action).is_allowed());
        assert!(!evaluate(&Actor::patient(Uuid::new_v4()), &action).is_allowed());
        assert!(!evaluate(&Actor::clinician(Uuid::new_v4()), &action).is_allowed());
    }

    #[test]
    fn should_restrict_schedule_to_self() {
        let patient = Actor::patient(Uuid::new_v4());
        assert!(evaluate(&patient, &PolicyAction::ViewSchedule { patient_id: patient.id })
            .is_allowed());
        assert!(!evaluate(&patient, &PolicyAction::ViewSchedule { patient_id: Uuid::new_v4() })
            .is_allowed());
    }

    #[test]
    fn should_allow_note_creation_to_clinicians_only() {
        assert!(evaluate(&Actor::clinician(Uuid::new_v4()), &PolicyAction::CreateNote).is_allowed());
        assert!(!evaluate(&Actor::patient(Uuid::new_v4()), &PolicyAction::CreateNote).is_allowed());
    }

    #[test]
    fn should_restrict_note_modification_to_the_author() {
        let author = Actor::clinician(Uuid::new_v4());
        let stranger = Actor::clinician(Uuid::new_v4());
        let action = PolicyAction::ModifyNote { author_id: author.id };
        assert!(evaluate(&author, &action).is_allowed());
        assert_eq!(
            evaluate(&stranger, &action),
            AccessDecision::Deny(DenyReason::NotResourceOwner {
                action: "modify notes authored by"
            })
        );
    }

    #[test]
    fn should_share_note_reads_with_patient_and_author_only() {
        let patient_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();
        let action = PolicyAction::ViewNote { patient_id, author_id };
        assert!(evaluate(&Actor::patient(patient_id), &action).is_allowed());
        assert!(evaluate(&Actor::clinician(author_id), &action).is_allowed());
        // A clinician who does not treat this patient is denied.
        assert!(!evaluate(&Actor::clinician(Uuid::new_v4()), &action).is_allowed());
        assert!(!evaluate(&Actor::patient(Uuid::new_v4()), &action).is_allowed());
    }

    #[test]
    fn should_restrict_profile_access_to_self() {
        let patient = Actor::patient(Uuid::new_v4());
        let other = Uuid::new_v4();
        assert!(evaluate(&patient, &PolicyAction::ViewPatientProfile { patient_id: patient.id })
            .is_allowed());
        assert!(!evaluate(&patient, &PolicyAction::ViewPatientProfile { patient_id: other })
            .is_allowed());
        assert!(!evaluate(&patient, &PolicyAction::UpdatePatientProfile { patient_id: other })
            .is_allowed());
    }
}
