use anyhow::{ensure, Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default suitable for a single-node local install.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    pub bcrypt_cost: u32,
    pub session_ttl_hours: i64,
    pub default_admin_id: String,
    pub default_admin_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let bcrypt_cost = env_or("BCRYPT_COST", "12")
            .parse::<u32>()
            .context("BCRYPT_COST must be an integer")?;
        ensure!(
            (4..=31).contains(&bcrypt_cost),
            "BCRYPT_COST must be between 4 and 31, got {bcrypt_cost}"
        );

        let session_ttl_hours = env_or("SESSION_TTL_HOURS", "12")
            .parse::<i64>()
            .context("SESSION_TTL_HOURS must be an integer")?;
        ensure!(
            session_ttl_hours > 0,
            "SESSION_TTL_HOURS must be positive, got {session_ttl_hours}"
        );

        Ok(Config {
            database_url: env_or("DATABASE_URL", "sqlite://nova_universitas.db"),
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            bcrypt_cost,
            session_ttl_hours,
            default_admin_id: env_or("DEFAULT_ADMIN_ID", "ADMIN001"),
            default_admin_password: env_or("DEFAULT_ADMIN_PASSWORD", "admin123"),
        })
    }

    /// Configuration used by unit tests: in-memory database, cheapest bcrypt cost.
    #[cfg(test)]
    pub fn for_tests() -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
            bcrypt_cost: 4,
            session_ttl_hours: 1,
            default_admin_id: "ADMIN001".to_string(),
            default_admin_password: "admin123".to_string(),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
