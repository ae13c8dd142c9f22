use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::handlers::{
    error_response, internal_error_response, json_rejection_response, validation_response,
    ErrorResponse,
};
use crate::models::auth::{CredentialsRequest, LoginResponse, RegisterResponse};
use crate::services::auth_service::{AuthError, AuthService};

/// Convert AuthError to HTTP response
impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::Validation(err) => validation_response(&err),
            AuthError::DuplicateEmail => error_response(
                StatusCode::BAD_REQUEST,
                "duplicate_email",
                "Email already exists",
            ),
            AuthError::InvalidCredentials => error_response(
                StatusCode::BAD_REQUEST,
                "invalid_credentials",
                "Invalid email or password",
            ),
            AuthError::InvalidToken => error_response(
                StatusCode::UNAUTHORIZED,
                "invalid_token",
                "Invalid authentication token",
            ),
            AuthError::TokenExpired => error_response(
                StatusCode::UNAUTHORIZED,
                "token_expired",
                "Authentication token has expired",
            ),
            AuthError::DatabaseError(msg) | AuthError::Internal(msg) => {
                internal_error_response(&msg)
            }
        }
    }
}

/// Handler for user registration
///
/// Creates a new user account with the provided credentials.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User successfully registered", body = RegisterResponse),
        (
            status = 400,
            description = "Validation error or email already exists",
            body = ErrorResponse
        ),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn register_handler(
    State(auth_service): State<Arc<dyn AuthService>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RegisterResponse>), Response> {
    let Json(request) = payload.map_err(json_rejection_response)?;

    match auth_service.register(request).await {
        Ok(user) => Ok((
            StatusCode::CREATED,
            Json(RegisterResponse {
                message: "User registered successfully".to_string(),
                user_id: user.id,
            }),
        )),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for user login
///
/// Authenticates a user and returns a signed bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Invalid credentials", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login_handler(
    State(auth_service): State<Arc<dyn AuthService>>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, Response> {
    let Json(request) = payload.map_err(json_rejection_response)?;

    match auth_service.login(request).await {
        Ok(token) => Ok(Json(token.into())),
        Err(e) => Err(e.into_response()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::User;
    use crate::repositories::user_repository::UserRepository;
    use crate::repositories::RepositoryError;
    use crate::services::auth_service::AuthServiceImpl;
    use crate::services::credentials::Credentials;
    use crate::validation::ValidationError;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    // Mock repository for testing
    struct MockUserRepository {
        users: Mutex<HashMap<String, User>>,
    }

    impl MockUserRepository {
        fn new() -> Self {
            Self {
                users: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl UserRepository for MockUserRepository {
        async fn create(&self, email: &str, password_hash: &str) -> Result<User, RepositoryError> {
            let mut users = self.users.lock().unwrap();

            if users.contains_key(email) {
                return Err(RepositoryError::ConstraintViolation(
                    "Email already exists".to_string(),
                ));
            }

            let new_user = User {
                id: Uuid::new_v4(),
                email: email.to_string(),
                password_hash: password_hash.to_string(),
                created_at: Utc::now(),
            };

            users.insert(new_user.email.clone(), new_user.clone());
            Ok(new_user)
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
            let users = self.users.lock().unwrap();
            Ok(users.get(email).cloned())
        }
    }

    fn auth_service() -> Arc<dyn AuthService> {
        let repo = Arc::new(MockUserRepository::new());
        Arc::new(AuthServiceImpl::new(
            repo,
            Credentials::new("test_secret").with_bcrypt_cost(4),
        ))
    }

    fn credentials(email: &str, password: &str) -> Result<Json<CredentialsRequest>, JsonRejection> {
        Ok(Json(CredentialsRequest {
            email: email.to_string(),
            password: password.to_string(),
        }))
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_register_handler_success() {
        let auth_service = auth_service();

        let result = register_handler(
            State(auth_service),
            credentials("test@example.com", "password123"),
        )
        .await;

        let (status, Json(body)) = result.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.message, "User registered successfully");
    }

    #[tokio::test]
    async fn test_register_handler_validation_error() {
        let auth_service = auth_service();

        let response = register_handler(
            State(auth_service),
            credentials("invalid-email", "password123"),
        )
        .await
        .unwrap_err();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid_email");
    }

    #[tokio::test]
    async fn test_register_handler_duplicate_email() {
        let auth_service = auth_service();

        // First registration should succeed
        register_handler(
            State(auth_service.clone()),
            credentials("test@example.com", "password123"),
        )
        .await
        .unwrap();

        // Second registration with same email should fail
        let response = register_handler(
            State(auth_service),
            credentials("test@example.com", "password123"),
        )
        .await
        .unwrap_err();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "duplicate_email");
    }

    #[tokio::test]
    async fn test_login_handler_success() {
        let auth_service = auth_service();

        let (_, Json(registered)) = register_handler(
            State(auth_service.clone()),
            credentials("test@example.com", "password123"),
        )
        .await
        .unwrap();

        let Json(token) = login_handler(
            State(auth_service),
            credentials("test@example.com", "password123"),
        )
        .await
        .unwrap();

        assert!(!token.token.is_empty());
        assert_eq!(token.user_id, registered.user_id);
    }

    #[tokio::test]
    async fn test_login_handler_invalid_credentials() {
        let auth_service = auth_service();

        register_handler(
            State(auth_service.clone()),
            credentials("test@example.com", "password123"),
        )
        .await
        .unwrap();

        // Try to login with wrong password
        let response = login_handler(
            State(auth_service),
            credentials("test@example.com", "wrongpassword"),
        )
        .await
        .unwrap_err();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "invalid_credentials");
    }

    #[tokio::test]
    async fn test_auth_error_into_response() {
        let cases = vec![
            (
                AuthError::Validation(ValidationError::PasswordTooShort),
                StatusCode::BAD_REQUEST,
                "password_too_short",
            ),
            (AuthError::InvalidToken, StatusCode::UNAUTHORIZED, "invalid_token"),
            (AuthError::TokenExpired, StatusCode::UNAUTHORIZED, "token_expired"),
            (
                AuthError::DatabaseError("connection reset".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
            ),
        ];

        for (error, status, code) in cases {
            let response = error.into_response();
            assert_eq!(response.status(), status);
            let body = body_json(response).await;
            assert_eq!(body["error"], code);
        }
    }

    #[tokio::test]
    async fn test_internal_error_hides_details() {
        let response = AuthError::Internal("secret detail".to_string()).into_response();
        let body = body_json(response).await;
        assert_eq!(body["message"], "Internal server error");
    }
}
