// security/src/credentials.rs

use bcrypt::{hash, verify, DEFAULT_COST};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("password verification failed: {0}")]
    Verify(String),
}

/// Hashes a plaintext password with bcrypt at the default cost.
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    hash(password, DEFAULT_COST).map_err(|e| CredentialError::Hash(e.to_string()))
}

/// Verifies a plaintext password against a stored bcrypt digest.
pub fn verify_password(password: &str, digest: &str) -> Result<bool, CredentialError> {
    verify(password, digest).map_err(|e| CredentialError::Verify(e.to_string()))
}
