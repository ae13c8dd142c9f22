use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::IntoParams;

/// Raw query string for expense listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ExpenseQuery {
    /// Exact category match; omit or pass "All" for every category
    pub category: Option<String>,
    /// Inclusive lower bound (YYYY-MM-DD)
    pub start_date: Option<String>,
    /// Inclusive upper bound covering the whole day (YYYY-MM-DD)
    pub end_date: Option<String>,
}

/// Parsed filter criteria applied by the repository
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub category: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ExpenseFilter {
    /// Exclusive upper bound: the start of the day after `end_date`
    pub fn end_exclusive(&self) -> Option<NaiveDate> {
        self.end_date
            .map(|end| end.checked_add_days(Days::new(1)).unwrap_or(NaiveDate::MAX))
    }
}
