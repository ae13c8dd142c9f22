use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Expense entity owned by exactly one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": "7d9f2c1e-3b4a-4c5d-8e6f-0a1b2c3d4e5f",
    "title": "Groceries from Walmart",
    "amount": 75.5,
    "category": "Food",
    "date": "2025-08-12",
    "createdAt": "2025-08-12T10:00:00Z",
    "ownerId": "550e8400-e29b-41d4-a716-446655440000"
}))]
pub struct Expense {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64)]
    pub amount: Decimal,
    pub category: String,
    #[schema(format = "date")]
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Request payload for creating an expense.
///
/// Fields stay loosely typed so that the validation layer, not the JSON
/// decoder, decides which rule failed. `amount` accepts a number or a
/// numeric string.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "title": "Lunch at Subway",
    "amount": 12.5,
    "category": "Food",
    "date": "2025-08-14"
}))]
pub struct CreateExpenseRequest {
    pub title: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub amount: Option<serde_json::Value>,
    pub category: Option<String>,
    #[schema(format = "date")]
    pub date: Option<String>,
}

/// Partial update payload. Absent or null fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "amount": 14.0,
    "category": "Others"
}))]
pub struct UpdateExpenseRequest {
    pub title: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub amount: Option<serde_json::Value>,
    pub category: Option<String>,
    #[schema(format = "date")]
    pub date: Option<String>,
}

/// Validated fields for a new expense
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub title: String,
    pub amount: Decimal,
    pub category: String,
    pub date: NaiveDate,
}

/// Validated fields for a partial update; at least one is set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseChanges {
    pub title: Option<String>,
    pub amount: Option<Decimal>,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
}

impl ExpenseChanges {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
    }
}
