use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::models::auth::{AuthToken, CredentialsRequest};
use crate::models::user::User;
use crate::repositories::user_repository::UserRepository;
use crate::repositories::RepositoryError;
use crate::services::credentials::{CredentialError, Credentials};
use crate::validation::{self, ValidationError};

/// Authentication service errors
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Email already exists")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::InvalidToken => AuthError::InvalidToken,
            CredentialError::TokenExpired => AuthError::TokenExpired,
            other => AuthError::Internal(other.to_string()),
        }
    }
}

/// Trait defining authentication service operations
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user
    async fn register(&self, request: CredentialsRequest) -> Result<User, AuthError>;

    /// Authenticate user and return a bearer token
    async fn login(&self, request: CredentialsRequest) -> Result<AuthToken, AuthError>;

    /// Validate a bearer token and return the user it was issued to
    async fn validate_token(&self, token: &str) -> Result<Uuid, AuthError>;
}

/// Implementation of AuthService
pub struct AuthServiceImpl {
    user_repository: Arc<dyn UserRepository>,
    credentials: Credentials,
}

impl AuthServiceImpl {
    pub fn new(user_repository: Arc<dyn UserRepository>, credentials: Credentials) -> Self {
        Self {
            user_repository,
            credentials,
        }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn register(&self, request: CredentialsRequest) -> Result<User, AuthError> {
        validation::validate_email(&request.email)?;
        validation::validate_password(&request.password)?;

        let password_hash = self.credentials.hash(&request.password)?;

        // Email uniqueness is enforced by the store, not by a prior lookup
        let user = self
            .user_repository
            .create(&request.email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::ConstraintViolation(_) => AuthError::DuplicateEmail,
                RepositoryError::DatabaseError(msg) => AuthError::DatabaseError(msg),
                RepositoryError::NotFound => {
                    AuthError::DatabaseError("Unexpected error".to_string())
                }
            })?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    async fn login(&self, request: CredentialsRequest) -> Result<AuthToken, AuthError> {
        validation::validate_email(&request.email)?;

        // Unknown email and wrong password produce the same error
        let user = self
            .user_repository
            .find_by_email(&request.email)
            .await
            .map_err(|e| AuthError::DatabaseError(e.to_string()))?;

        let user = match user {
            Some(user) if self.credentials.verify(&request.password, &user.password_hash) => user,
            _ => {
                warn!("login rejected");
                return Err(AuthError::InvalidCredentials);
            }
        };

        let token = self.credentials.issue_token(user.id)?;
        info!(user_id = %user.id, "user logged in");
        Ok(token)
    }

    async fn validate_token(&self, token: &str) -> Result<Uuid, AuthError> {
        Ok(self.credentials.verify_token(token)?)
    }
}
