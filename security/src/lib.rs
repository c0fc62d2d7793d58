// security/src/lib.rs

pub mod credentials;
pub mod policy;
pub mod tokens;

pub use credentials::{hash_password, verify_password, CredentialError};
pub use policy::{evaluate, AccessDecision, DenyReason, PolicyAction};
pub use tokens::{Claims, SecurityConfig, TokenError, TokenIssuer};
