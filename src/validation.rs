use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde_json::Value;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::models::category::ALL_CATEGORIES;
use crate::models::expense::{
    CreateExpenseRequest, ExpenseChanges, NewExpense, UpdateExpenseRequest,
};
use crate::models::filters::{ExpenseFilter, ExpenseQuery};

pub const MIN_PASSWORD_LENGTH: usize = 6;
pub const MIN_TITLE_LENGTH: usize = 3;

/// Largest accepted amount, in whole currency units
pub const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

/// Calendar years a stored `DATE` may carry
pub const MIN_YEAR: i32 = 1;
pub const MAX_YEAR: i32 = 9999;

/// Field-level validation failures. The first failing rule wins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Password must be at least 6 characters")]
    PasswordTooShort,

    #[error("Title must be at least 3 characters")]
    InvalidTitle,

    #[error("Amount must be a number greater than 0")]
    InvalidAmount,

    #[error("Category is required")]
    InvalidCategory,

    #[error("Date is invalid")]
    InvalidDate,

    #[error("No valid fields to update")]
    NoFieldsToUpdate,

    #[error("Invalid expense id")]
    InvalidId,
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidEmail => "invalid_email",
            ValidationError::PasswordTooShort => "password_too_short",
            ValidationError::InvalidTitle => "invalid_title",
            ValidationError::InvalidAmount => "invalid_amount",
            ValidationError::InvalidCategory => "invalid_category",
            ValidationError::InvalidDate => "invalid_date",
            ValidationError::NoFieldsToUpdate => "no_fields_to_update",
            ValidationError::InvalidId => "invalid_id",
        }
    }
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.validate_email() {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Returns the trimmed title
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.chars().count() < MIN_TITLE_LENGTH {
        return Err(ValidationError::InvalidTitle);
    }
    Ok(trimmed.to_string())
}

/// Coerces a JSON number or numeric string into a positive amount
pub fn coerce_amount(value: &Value) -> Result<Decimal, ValidationError> {
    let amount = match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(s.trim()),
        _ => None,
    }
    .ok_or(ValidationError::InvalidAmount)?;

    if amount <= Decimal::ZERO || amount > Decimal::from(MAX_AMOUNT_UNITS) {
        return Err(ValidationError::InvalidAmount);
    }
    Ok(amount)
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    if raw.is_empty() {
        return None;
    }
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Returns the trimmed category; unknown names are accepted
pub fn validate_category(category: &str) -> Result<String, ValidationError> {
    let trimmed = category.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidCategory);
    }
    Ok(trimmed.to_string())
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp, keeping only the date part.
/// Years outside 1..=9999 are rejected.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| ValidationError::InvalidDate)?;

    if !(MIN_YEAR..=MAX_YEAR).contains(&date.year()) {
        return Err(ValidationError::InvalidDate);
    }
    Ok(date)
}

pub fn parse_expense_id(raw: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(raw.trim()).map_err(|_| ValidationError::InvalidId)
}

/// Validates a create payload in field order: title, amount, category, date
pub fn validate_new_expense(request: &CreateExpenseRequest) -> Result<NewExpense, ValidationError> {
    let title = validate_title(request.title.as_deref().unwrap_or_default())?;
    let amount = request
        .amount
        .as_ref()
        .ok_or(ValidationError::InvalidAmount)
        .and_then(coerce_amount)?;
    let category = validate_category(request.category.as_deref().unwrap_or_default())?;
    let date = request
        .date
        .as_deref()
        .ok_or(ValidationError::InvalidDate)
        .and_then(parse_date)?;

    Ok(NewExpense {
        title,
        amount,
        category,
        date,
    })
}

/// Validates only the fields present in a partial update
pub fn validate_expense_changes(
    request: &UpdateExpenseRequest,
) -> Result<ExpenseChanges, ValidationError> {
    let changes = ExpenseChanges {
        title: request.title.as_deref().map(validate_title).transpose()?,
        amount: request.amount.as_ref().map(coerce_amount).transpose()?,
        category: request
            .category
            .as_deref()
            .map(validate_category)
            .transpose()?,
        date: request.date.as_deref().map(parse_date).transpose()?,
    };

    if changes.is_empty() {
        return Err(ValidationError::NoFieldsToUpdate);
    }
    Ok(changes)
}

/// Turns query parameters into filter criteria. Empty values and the
/// `All` sentinel mean "no filter".
pub fn parse_filter(query: &ExpenseQuery) -> Result<ExpenseFilter, ValidationError> {
    let category = query
        .category
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty() && *c != ALL_CATEGORIES)
        .map(str::to_string);

    let parse_bound = |raw: &Option<String>| {
        raw.as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(parse_date)
            .transpose()
    };

    Ok(ExpenseFilter {
        category,
        start_date: parse_bound(&query.start_date)?,
        end_date: parse_bound(&query.end_date)?,
    })
}
