use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Category names offered to input widgets. Any non-empty category is accepted.
pub const SUGGESTED_CATEGORIES: &[&str] = &["Food", "Transport", "Shopping", "Others"];

/// Filter value meaning "every category"
pub const ALL_CATEGORIES: &str = "All";

/// Bucket used by the totals when a record carries a blank category
pub const FALLBACK_CATEGORY: &str = "Others";

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryList {
    pub categories: Vec<String>,
}

/// Summed spend for one category, rounded to cents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CategoryTotal {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 15.01)]
    pub total: Decimal,
}
