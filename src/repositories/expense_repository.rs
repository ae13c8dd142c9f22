use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::expense::{Expense, ExpenseChanges, NewExpense};
use crate::models::filters::ExpenseFilter;
use crate::repositories::RepositoryError;

const EXPENSE_COLUMNS: &str =
    "id, owner_id, title, amount, category, date, created_at, updated_at";

/// Owner-scoped expense persistence.
///
/// Every operation filters on `owner_id` inside the statement itself, so a
/// record that belongs to another user is indistinguishable from a missing
/// one: both yield `NotFound`.
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Persist a new expense with a fresh ID and creation timestamp
    async fn create(&self, owner_id: Uuid, expense: NewExpense) -> Result<Expense, RepositoryError>;

    /// All of the owner's expenses matching `filter`, newest date first,
    /// ties broken by newest creation time
    async fn list(
        &self,
        owner_id: Uuid,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, RepositoryError>;

    /// Apply the present fields and stamp `updated_at`
    async fn update(
        &self,
        owner_id: Uuid,
        expense_id: Uuid,
        changes: ExpenseChanges,
    ) -> Result<Expense, RepositoryError>;

    async fn delete(&self, owner_id: Uuid, expense_id: Uuid) -> Result<(), RepositoryError>;
}

/// PostgreSQL implementation of ExpenseRepository
pub struct PostgresExpenseRepository {
    pool: PgPool,
}

impl PostgresExpenseRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExpenseRepository for PostgresExpenseRepository {
    async fn create(
        &self,
        owner_id: Uuid,
        expense: NewExpense,
    ) -> Result<Expense, RepositoryError> {
        let query = format!(
            r#"
            INSERT INTO expenses (id, owner_id, title, amount, category, date, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {EXPENSE_COLUMNS}
            "#
        );

        let created = sqlx::query_as::<_, Expense>(&query)
            .bind(Uuid::new_v4())
            .bind(owner_id)
            .bind(&expense.title)
            .bind(expense.amount)
            .bind(&expense.category)
            .bind(expense.date)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn list(
        &self,
        owner_id: Uuid,
        filter: &ExpenseFilter,
    ) -> Result<Vec<Expense>, RepositoryError> {
        // Build dynamic SQL query based on provided filters
        let mut query = format!(
            r#"
            SELECT {EXPENSE_COLUMNS}
            FROM expenses
            WHERE owner_id = $1
            "#
        );

        let mut param_count = 1;
        let mut conditions = Vec::new();

        if filter.category.is_some() {
            param_count += 1;
            conditions.push(format!("category = ${}", param_count));
        }

        // Inclusive lower bound
        if filter.start_date.is_some() {
            param_count += 1;
            conditions.push(format!("date >= ${}", param_count));
        }

        // Whole end day: strictly before the following day
        let end_exclusive = filter.end_exclusive();
        if end_exclusive.is_some() {
            param_count += 1;
            conditions.push(format!("date < ${}", param_count));
        }

        if !conditions.is_empty() {
            query.push_str(" AND ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY date DESC, created_at DESC");

        // Bind parameters in the same order the placeholders were numbered
        let mut sqlx_query = sqlx::query_as::<_, Expense>(&query).bind(owner_id);

        if let Some(category) = &filter.category {
            sqlx_query = sqlx_query.bind(category);
        }

        if let Some(start) = filter.start_date {
            sqlx_query = sqlx_query.bind(start);
        }

        if let Some(end) = end_exclusive {
            sqlx_query = sqlx_query.bind(end);
        }

        let expenses = sqlx_query.fetch_all(&self.pool).await?;
        Ok(expenses)
    }

    async fn update(
        &self,
        owner_id: Uuid,
        expense_id: Uuid,
        changes: ExpenseChanges,
    ) -> Result<Expense, RepositoryError> {
        let query = format!(
            r#"
            UPDATE expenses
            SET title = COALESCE($3, title),
                amount = COALESCE($4, amount),
                category = COALESCE($5, category),
                date = COALESCE($6, date),
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING {EXPENSE_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Expense>(&query)
            .bind(expense_id)
            .bind(owner_id)
            .bind(changes.title)
            .bind(changes.amount)
            .bind(changes.category)
            .bind(changes.date)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, owner_id: Uuid, expense_id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            DELETE FROM expenses
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(expense_id)
        .bind(owner_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            Err(RepositoryError::NotFound)
        } else {
            Ok(())
        }
    }
}
