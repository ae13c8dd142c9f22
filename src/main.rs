use anyhow::Context;
use chrono::Duration;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;

use expense_tracker::config::AppConfig;
use expense_tracker::logging;
use expense_tracker::repositories::expense_repository::PostgresExpenseRepository;
use expense_tracker::repositories::user_repository::PostgresUserRepository;
use expense_tracker::routes::{build_router, AppState};
use expense_tracker::services::auth_service::{AuthService, AuthServiceImpl};
use expense_tracker::services::credentials::Credentials;
use expense_tracker::services::expense_service::{ExpenseService, ExpenseServiceImpl};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    logging::init(config.log_format);

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(config.database.connect_options()?)
        .await
        .context("failed to connect to database")?;
    tracing::info!("connected to database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;
    tracing::info!("migrations completed");

    // Initialize repositories
    let user_repository = Arc::new(PostgresUserRepository::new(pool.clone()));
    let expense_repository = Arc::new(PostgresExpenseRepository::new(pool));

    // Initialize services
    let credentials = Credentials::new(&config.auth.jwt_secret)
        .with_token_ttl(Duration::minutes(config.auth.token_ttl_minutes))
        .with_bcrypt_cost(config.auth.bcrypt_cost);
    let auth_service: Arc<dyn AuthService> =
        Arc::new(AuthServiceImpl::new(user_repository, credentials));
    let expense_service: Arc<dyn ExpenseService> =
        Arc::new(ExpenseServiceImpl::new(expense_repository));

    let app = build_router(AppState {
        auth_service,
        expense_service,
    });

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "server listening; API docs at /api/docs");

    axum::serve(listener, app).await?;

    Ok(())
}
