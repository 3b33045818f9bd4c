use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::password::{BcryptHasher, PasswordHasher};
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Config,
    /// Pluggable password hasher. Default: bcrypt at `config.bcrypt_cost`.
    pub hasher: Arc<dyn PasswordHasher>,
}

impl AppState {
    pub fn new(db: SqlitePool, config: Config) -> Self {
        let hasher = Arc::new(BcryptHasher::new(config.bcrypt_cost));
        Self { db, config, hasher }
    }
}
