use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::auth::password::PasswordHasher;
use crate::config::Config;

/// Creates the SQLite connection pool, creating the database file if missing.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    info!("Opening SQLite database at {database_url}");

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid DATABASE_URL '{database_url}'"))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    info!("SQLite connection pool established");
    Ok(pool)
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to apply database migrations")?;
    info!("Database migrations applied");
    Ok(())
}

/// Inserts the default school-services admin when no admin account exists.
/// Returns `true` if an account was created.
pub async fn seed_default_admin(
    pool: &SqlitePool,
    hasher: &dyn PasswordHasher,
    config: &Config,
) -> Result<bool> {
    let admins: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = 'admin'")
        .fetch_one(pool)
        .await?;
    if admins > 0 {
        return Ok(false);
    }

    let password_hash = hasher.hash(&config.default_admin_password).await?;

    sqlx::query(
        r#"
        INSERT INTO users (enrollment_id, password_hash, role, first_name, last_name, email)
        VALUES (?, ?, 'admin', 'Servicios', 'Escolares', 'servicios@novauniversitas.edu')
        "#,
    )
    .bind(&config.default_admin_id)
    .bind(password_hash)
    .execute(pool)
    .await?;

    info!("Seeded default admin account {}", config.default_admin_id);
    Ok(true)
}

/// Single-connection in-memory pool with the schema applied.
#[cfg(test)]
pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    run_migrations(&pool).await.unwrap();
    pool
}
