// storage/src/errors.rs

pub use thiserror::Error;

use models::DomainError;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Sled(#[from] sled::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("corrupt record in tree {tree}: {detail}")]
    Corrupt { tree: &'static str, detail: String },
}

/// A type alias for a `Result` that returns a `StoreError` on failure.
pub type StoreResult<T> = Result<T, StoreError>;

// Persistence failures reaching the orchestrators are generalized to an
// opaque dependency failure; the detail goes to the operational log only.
impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        tracing::error!(error = %err, "persistence collaborator failed");
        DomainError::Dependency
    }
}
