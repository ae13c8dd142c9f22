use async_trait::async_trait;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::models::category::FALLBACK_CATEGORY;
use crate::models::expense::{CreateExpenseRequest, Expense, UpdateExpenseRequest};
use crate::models::filters::ExpenseFilter;
use crate::repositories::expense_repository::ExpenseRepository;
use crate::repositories::RepositoryError;
use crate::validation::{self, ValidationError};

/// Expense service errors
#[derive(Debug, thiserror::Error)]
pub enum ExpenseError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Expense not found")]
    NotFound,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Total for category {0} overflowed")]
    TotalOverflow(String),
}

impl From<RepositoryError> for ExpenseError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ExpenseError::NotFound,
            RepositoryError::DatabaseError(msg) => ExpenseError::DatabaseError(msg),
            RepositoryError::ConstraintViolation(msg) => ExpenseError::DatabaseError(msg),
        }
    }
}

/// Trait defining expense service operations
#[async_trait]
pub trait ExpenseService: Send + Sync {
    async fn add_expense(
        &self,
        owner_id: Uuid,
        request: CreateExpenseRequest,
    ) -> Result<Expense, ExpenseError>;

    /// The owner's expenses matching `filter`, sorted by date descending
    async fn list_expenses(
        &self,
        owner_id: Uuid,
        filter: ExpenseFilter,
    ) -> Result<Vec<Expense>, ExpenseError>;

    async fn edit_expense(
        &self,
        owner_id: Uuid,
        expense_id: Uuid,
        request: UpdateExpenseRequest,
    ) -> Result<Expense, ExpenseError>;

    async fn remove_expense(&self, owner_id: Uuid, expense_id: Uuid) -> Result<(), ExpenseError>;

    /// Per-category totals over the expenses matching `filter`
    async fn category_summary(
        &self,
        owner_id: Uuid,
        filter: ExpenseFilter,
    ) -> Result<BTreeMap<String, Decimal>, ExpenseError>;
}

/// Sums amounts per category, then rounds each sum to cents (half away
/// from zero). Blank categories are counted under `Others`.
pub fn category_totals(expenses: &[Expense]) -> Result<BTreeMap<String, Decimal>, ExpenseError> {
    let mut totals: BTreeMap<String, Decimal> = BTreeMap::new();
    for expense in expenses {
        let category = match expense.category.trim() {
            "" => FALLBACK_CATEGORY,
            name => name,
        };
        let total = totals.entry(category.to_string()).or_default();
        *total = total
            .checked_add(expense.amount)
            .ok_or_else(|| ExpenseError::TotalOverflow(category.to_string()))?;
    }

    for total in totals.values_mut() {
        *total = total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    }
    Ok(totals)
}

/// Implementation of ExpenseService
pub struct ExpenseServiceImpl {
    expense_repository: Arc<dyn ExpenseRepository>,
}

impl ExpenseServiceImpl {
    pub fn new(expense_repository: Arc<dyn ExpenseRepository>) -> Self {
        Self { expense_repository }
    }
}

#[async_trait]
impl ExpenseService for ExpenseServiceImpl {
    async fn add_expense(
        &self,
        owner_id: Uuid,
        request: CreateExpenseRequest,
    ) -> Result<Expense, ExpenseError> {
        let new_expense = validation::validate_new_expense(&request)?;
        let expense = self.expense_repository.create(owner_id, new_expense).await?;

        info!(%owner_id, expense_id = %expense.id, "expense created");
        Ok(expense)
    }

    async fn list_expenses(
        &self,
        owner_id: Uuid,
        filter: ExpenseFilter,
    ) -> Result<Vec<Expense>, ExpenseError> {
        Ok(self.expense_repository.list(owner_id, &filter).await?)
    }

    async fn edit_expense(
        &self,
        owner_id: Uuid,
        expense_id: Uuid,
        request: UpdateExpenseRequest,
    ) -> Result<Expense, ExpenseError> {
        let changes = validation::validate_expense_changes(&request)?;

        // Ownership is part of the update statement itself
        let expense = self
            .expense_repository
            .update(owner_id, expense_id, changes)
            .await?;

        info!(%owner_id, %expense_id, "expense updated");
        Ok(expense)
    }

    async fn remove_expense(&self, owner_id: Uuid, expense_id: Uuid) -> Result<(), ExpenseError> {
        self.expense_repository.delete(owner_id, expense_id).await?;

        info!(%owner_id, %expense_id, "expense deleted");
        Ok(())
    }

    async fn category_summary(
        &self,
        owner_id: Uuid,
        filter: ExpenseFilter,
    ) -> Result<BTreeMap<String, Decimal>, ExpenseError> {
        let expenses = self.expense_repository.list(owner_id, &filter).await?;
        category_totals(&expenses)
    }
}
