// services/src/clinicians.rs

use std::sync::Arc;
use uuid::Uuid;

use models::{ClinicianListing, ClinicianProfile, DomainError, DomainResult};
use storage::ClinicianStore;

/// Public clinician directory. These reads carry no actor and are not
/// audited; they expose directory projections only, never credentials.
pub struct ClinicianService {
    clinicians: Arc<dyn ClinicianStore>,
}

impl ClinicianService {
    pub fn new(clinicians: Arc<dyn ClinicianStore>) -> Self {
        ClinicianService { clinicians }
    }

    pub async fn profile(&self, clinician_id: Uuid) -> DomainResult<ClinicianProfile> {
        let clinician = self
            .clinicians
            .clinician_by_id(&clinician_id)
            .await?
            .ok_or(DomainError::NotFound("Clinician"))?;
        Ok(ClinicianProfile::from(&clinician))
    }

    pub async fn by_specialization(
        &self,
        specialization: &str,
    ) -> DomainResult<Vec<ClinicianListing>> {
        let clinicians = self.clinicians.clinicians_by_specialization(specialization).await?;
        Ok(clinicians.iter().map(ClinicianListing::from).collect())
    }
}
