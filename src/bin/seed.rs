//! Loads a demo user with a month of sample expenses.
//!
//! Re-running replaces the demo user's expenses; the account itself is kept.

use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::postgres::PgPoolOptions;

use expense_tracker::config::AppConfig;
use expense_tracker::logging;
use expense_tracker::models::{ExpenseFilter, NewExpense};
use expense_tracker::repositories::expense_repository::{
    ExpenseRepository, PostgresExpenseRepository,
};
use expense_tracker::repositories::user_repository::{PostgresUserRepository, UserRepository};
use expense_tracker::services::credentials::Credentials;

// (title, amount in cents, category, day of August 2025)
const SAMPLE_EXPENSES: [(&str, i64, &str, u32); 6] = [
    ("Groceries from Walmart", 7550, "Food", 12),
    ("Monthly bus pass", 5500, "Transport", 1),
    ("New T-shirt", 2599, "Shopping", 10),
    ("Coffee with friends", 875, "Food", 14),
    ("Electricity bill", 12000, "Others", 5),
    ("Movie tickets", 3200, "Shopping", 15),
];

fn sample_expenses() -> anyhow::Result<Vec<NewExpense>> {
    SAMPLE_EXPENSES
        .iter()
        .map(|&(title, cents, category, day)| {
            let date = NaiveDate::from_ymd_opt(2025, 8, day)
                .with_context(|| format!("invalid sample date 2025-08-{day}"))?;
            Ok(NewExpense {
                title: title.to_string(),
                amount: Decimal::new(cents, 2),
                category: category.to_string(),
                date,
            })
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    logging::init(config.log_format);

    let email = std::env::var("SEED_EMAIL").unwrap_or_else(|_| "demo@example.com".to_string());
    let password =
        std::env::var("SEED_PASSWORD").unwrap_or_else(|_| "demo-password".to_string());

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(config.database.connect_options()?)
        .await
        .context("failed to connect to database")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;

    let users = PostgresUserRepository::new(pool.clone());
    let expenses = PostgresExpenseRepository::new(pool);
    let credentials =
        Credentials::new(&config.auth.jwt_secret).with_bcrypt_cost(config.auth.bcrypt_cost);

    let user = match users.find_by_email(&email).await? {
        Some(user) => user,
        None => {
            let password_hash = credentials.hash(&password)?;
            let user = users.create(&email, &password_hash).await?;
            tracing::info!(user_id = %user.id, %email, "demo user created");
            user
        }
    };

    let existing = expenses.list(user.id, &ExpenseFilter::default()).await?;
    for expense in &existing {
        expenses.delete(user.id, expense.id).await?;
    }
    tracing::info!(removed = existing.len(), "cleared previous expenses");

    let samples = sample_expenses()?;
    let inserted = samples.len();
    for expense in samples {
        expenses.create(user.id, expense).await?;
    }

    tracing::info!(user_id = %user.id, inserted, "sample expenses loaded");
    Ok(())
}
