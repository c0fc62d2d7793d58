// security/src/tokens.rs

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

use models::{Actor, ActorRole};

const DEFAULT_TTL_SECS: u64 = 60 * 60 * 24;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("failed to encode token: {0}")]
    Encode(String),
    #[error("invalid or expired token")]
    Invalid,
    #[error("token subject is not a valid identifier")]
    BadSubject,
    #[error("system clock error: {0}")]
    Clock(String),
}

/// Claims for JWT.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: ActorRole,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
}

impl SecurityConfig {
    /// Reads `MEDINOTE_JWT_SECRET` and `MEDINOTE_TOKEN_TTL_SECS` from the
    /// environment, falling back to a development secret and a 24h TTL.
    pub fn from_env() -> Self {
        let jwt_secret = env::var("MEDINOTE_JWT_SECRET")
            .unwrap_or_else(|_| "medinote-development-secret-do-not-deploy".to_string());
        let token_ttl_secs = env::var("MEDINOTE_TOKEN_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TTL_SECS);
        SecurityConfig { jwt_secret, token_ttl_secs }
    }
}

/// Issues and validates HS256 tokens carrying an actor identity. The
/// orchestrators consume this as an opaque capability; no token parsing
/// happens anywhere else.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    config: SecurityConfig,
}

impl TokenIssuer {
    pub fn new(config: SecurityConfig) -> Self {
        TokenIssuer { config }
    }

    pub fn issue(&self, actor: &Actor) -> Result<String, TokenError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|e| TokenError::Clock(e.to_string()))?
            .as_secs();
        let claims = Claims {
            sub: actor.id.to_string(),
            role: actor.role,
            iat: now,
            exp: now + self.config.token_ttl_secs,
        };
        let key = EncodingKey::from_secret(self.config.jwt_secret.as_bytes());
        encode(&Header::default(), &claims, &key).map_err(|e| TokenError::Encode(e.to_string()))
    }

    pub fn validate(&self, token: &str) -> Result<Actor, TokenError> {
        let key = DecodingKey::from_secret(self.config.jwt_secret.as_bytes());
        let data = decode::<Claims>(token, &key, &Validation::default())
            .map_err(|_| TokenError::Invalid)?;
        let id = Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::BadSubject)?;
        Ok(Actor { id, role: data.claims.role })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(SecurityConfig {
            jwt_secret: "test-secret-at-least-32-bytes-long!!".to_string(),
            token_ttl_secs: 3600,
        })
    }

    #[test]
    fn should_round_trip_actor_identity() {
        let issuer = issuer();
        let actor = Actor::clinician(Uuid::new_v4());
        let token = issuer.issue(&actor).unwrap();
        let validated = issuer.validate(&token).unwrap();
        assert_eq!(validated, actor);
    }

    #[test]
    fn should_reject_token_signed_with_other_secret() {
        let actor = Actor::patient(Uuid::new_v4());
        let token = issuer().issue(&actor).unwrap();
        let other = TokenIssuer::new(SecurityConfig {
            jwt_secret: "a-completely-different-secret-value!".to_string(),
            token_ttl_secs: 3600,
        });
        assert!(matches!(other.validate(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn should_reject_garbage_token() {
        assert!(issuer().validate("not.a.token").is_err());
    }
}
