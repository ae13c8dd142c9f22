use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::handlers::{
    error_response, internal_error_response, json_rejection_response, query_rejection_response,
    validation_response, ErrorResponse,
};
use crate::middleware::auth_middleware::AuthenticatedUser;
use crate::models::category::{CategoryList, CategoryTotal, SUGGESTED_CATEGORIES};
use crate::models::expense::{CreateExpenseRequest, Expense, UpdateExpenseRequest};
use crate::models::filters::{ExpenseFilter, ExpenseQuery};
use crate::services::expense_service::{ExpenseError, ExpenseService};
use crate::validation;

/// Convert ExpenseError to HTTP response
impl IntoResponse for ExpenseError {
    fn into_response(self) -> Response {
        match self {
            ExpenseError::Validation(err) => validation_response(&err),
            ExpenseError::NotFound => error_response(
                StatusCode::NOT_FOUND,
                "expense_not_found",
                "Expense not found",
            ),
            ExpenseError::DatabaseError(msg) => internal_error_response(&msg),
            err @ ExpenseError::TotalOverflow(_) => internal_error_response(&err.to_string()),
        }
    }
}

fn parse_query(
    query: Result<Query<ExpenseQuery>, QueryRejection>,
) -> Result<ExpenseFilter, Response> {
    let Query(query) = query.map_err(query_rejection_response)?;
    validation::parse_filter(&query).map_err(|e| validation_response(&e))
}

/// Handler for creating an expense
///
/// Creates a new expense owned by the authenticated user.
#[utoipa::path(
    post,
    path = "/expenses",
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense successfully created", body = Expense),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "expenses"
)]
pub async fn create_expense_handler(
    State(expense_service): State<Arc<dyn ExpenseService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    payload: Result<Json<CreateExpenseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Expense>), Response> {
    let Json(request) = payload.map_err(json_rejection_response)?;

    match expense_service.add_expense(auth_user.user_id, request).await {
        Ok(expense) => Ok((StatusCode::CREATED, Json(expense))),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for listing expenses
///
/// Returns the authenticated user's expenses, newest date first.
#[utoipa::path(
    get,
    path = "/expenses",
    params(ExpenseQuery),
    responses(
        (status = 200, description = "Matching expenses", body = Vec<Expense>),
        (status = 400, description = "Malformed filter date", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "expenses"
)]
pub async fn list_expenses_handler(
    State(expense_service): State<Arc<dyn ExpenseService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    query: Result<Query<ExpenseQuery>, QueryRejection>,
) -> Result<Json<Vec<Expense>>, Response> {
    let filter = parse_query(query)?;

    match expense_service.list_expenses(auth_user.user_id, filter).await {
        Ok(expenses) => Ok(Json(expenses)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for updating an expense
///
/// Applies the fields present in the body. Absent fields stay unchanged.
#[utoipa::path(
    patch,
    path = "/expenses/{id}",
    params(
        ("id" = Uuid, Path, description = "Expense ID")
    ),
    request_body = UpdateExpenseRequest,
    responses(
        (status = 200, description = "Expense updated", body = Expense),
        (status = 400, description = "Validation error or malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "expenses"
)]
pub async fn update_expense_handler(
    State(expense_service): State<Arc<dyn ExpenseService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateExpenseRequest>, JsonRejection>,
) -> Result<Json<Expense>, Response> {
    let expense_id = validation::parse_expense_id(&raw_id).map_err(|e| validation_response(&e))?;
    let Json(request) = payload.map_err(json_rejection_response)?;

    match expense_service
        .edit_expense(auth_user.user_id, expense_id, request)
        .await
    {
        Ok(expense) => Ok(Json(expense)),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for deleting an expense
#[utoipa::path(
    delete,
    path = "/expenses/{id}",
    params(
        ("id" = Uuid, Path, description = "Expense ID")
    ),
    responses(
        (status = 204, description = "Expense deleted"),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "Expense not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "expenses"
)]
pub async fn delete_expense_handler(
    State(expense_service): State<Arc<dyn ExpenseService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, Response> {
    let expense_id = validation::parse_expense_id(&raw_id).map_err(|e| validation_response(&e))?;

    match expense_service
        .remove_expense(auth_user.user_id, expense_id)
        .await
    {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => Err(e.into_response()),
    }
}

/// Handler for per-category totals
///
/// Accepts the same filters as the listing endpoint.
#[utoipa::path(
    get,
    path = "/expenses/totals",
    params(ExpenseQuery),
    responses(
        (status = 200, description = "Totals per category", body = Vec<CategoryTotal>),
        (status = 400, description = "Malformed filter date", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "expenses"
)]
pub async fn category_totals_handler(
    State(expense_service): State<Arc<dyn ExpenseService>>,
    Extension(auth_user): Extension<AuthenticatedUser>,
    query: Result<Query<ExpenseQuery>, QueryRejection>,
) -> Result<Json<Vec<CategoryTotal>>, Response> {
    let filter = parse_query(query)?;

    match expense_service
        .category_summary(auth_user.user_id, filter)
        .await
    {
        Ok(totals) => Ok(Json(
            totals
                .into_iter()
                .map(|(category, total)| CategoryTotal { category, total })
                .collect(),
        )),
        Err(e) => Err(e.into_response()),
    }
}

/// Suggested category names for input widgets
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "Suggested categories", body = CategoryList)
    ),
    tag = "expenses"
)]
pub async fn list_categories_handler() -> Json<CategoryList> {
    Json(CategoryList {
        categories: SUGGESTED_CATEGORIES.iter().map(|c| c.to_string()).collect(),
    })
}
