use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::auth::AuthToken;

/// Cost used for stored passwords
pub const BCRYPT_COST: u32 = 12;

/// Lifetime of an issued bearer token
pub const DEFAULT_TOKEN_TTL_MINUTES: i64 = 60;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // user_id
    iat: i64,
    exp: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token generation failed: {0}")]
    Signing(String),
}

/// Password hashing and bearer-token signing behind one process-wide secret
#[derive(Clone)]
pub struct Credentials {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl Credentials {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            token_ttl: Duration::minutes(DEFAULT_TOKEN_TTL_MINUTES),
            bcrypt_cost: BCRYPT_COST,
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    pub fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        hash(plaintext, self.bcrypt_cost).map_err(|e| CredentialError::Hashing(e.to_string()))
    }

    /// A malformed stored hash counts as a mismatch
    pub fn verify(&self, plaintext: &str, password_hash: &str) -> bool {
        verify(plaintext, password_hash).unwrap_or(false)
    }

    pub fn issue_token(&self, user_id: Uuid) -> Result<AuthToken, CredentialError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| CredentialError::Signing(e.to_string()))?;

        Ok(AuthToken {
            token,
            user_id,
            expires_at,
        })
    }

    pub fn verify_token(&self, token: &str) -> Result<Uuid, CredentialError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => CredentialError::TokenExpired,
                _ => CredentialError::InvalidToken,
            })?;

        Uuid::parse_str(&token_data.claims.sub).map_err(|_| CredentialError::InvalidToken)
    }
}
