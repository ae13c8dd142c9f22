use axum::{
    extract::FromRef,
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers::{self, auth_handlers, expense_handlers, ErrorResponse};
use crate::middleware::auth_middleware::auth_middleware;
use crate::models::{
    CategoryList, CategoryTotal, CreateExpenseRequest, CredentialsRequest, Expense, LoginResponse,
    RegisterResponse, UpdateExpenseRequest,
};
use crate::services::auth_service::AuthService;
use crate::services::expense_service::ExpenseService;

/// Shared handler state; each handler extracts the service it needs
#[derive(Clone, FromRef)]
pub struct AppState {
    pub auth_service: Arc<dyn AuthService>,
    pub expense_service: Arc<dyn ExpenseService>,
}

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_check,
        auth_handlers::register_handler,
        auth_handlers::login_handler,
        expense_handlers::create_expense_handler,
        expense_handlers::list_expenses_handler,
        expense_handlers::update_expense_handler,
        expense_handlers::delete_expense_handler,
        expense_handlers::category_totals_handler,
        expense_handlers::list_categories_handler,
    ),
    components(
        schemas(
            CredentialsRequest,
            RegisterResponse,
            LoginResponse,
            Expense,
            CreateExpenseRequest,
            UpdateExpenseRequest,
            CategoryTotal,
            CategoryList,
            ErrorResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "expenses", description = "Expense tracking endpoints"),
        (name = "health", description = "Liveness check")
    ),
    info(
        title = "Expense Tracker API",
        version = "0.1.0",
        description = "REST API for tracking personal expenses",
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    // Every expense route requires a bearer token
    let expense_routes = Router::new()
        .route(
            "/expenses",
            post(expense_handlers::create_expense_handler)
                .get(expense_handlers::list_expenses_handler),
        )
        .route(
            "/expenses/totals",
            get(expense_handlers::category_totals_handler),
        )
        .route(
            "/expenses/:id",
            patch(expense_handlers::update_expense_handler)
                .delete(expense_handlers::delete_expense_handler),
        )
        .route_layer(middleware::from_fn_with_state(
            state.auth_service.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/auth/register", post(auth_handlers::register_handler))
        .route("/api/auth/login", post(auth_handlers::login_handler))
        .route(
            "/api/categories",
            get(expense_handlers::list_categories_handler),
        )
        .merge(expense_routes)
        .with_state(state)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
