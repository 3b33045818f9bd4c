mod auth;
mod catalog;
mod config;
mod db;
mod errors;
mod extract;
mod graduates;
mod models;
mod notifications;
mod portal;
mod routes;
mod state;
mod stats;
mod users;
mod validation;

use anyhow::Result;
use std::net::SocketAddr;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, run_migrations, seed_default_admin};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting alumni API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize SQLite and apply the schema
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    let state = AppState::new(db, config.clone());
    if !seed_default_admin(&state.db, state.hasher.as_ref(), &config).await? {
        info!("Admin account already present; skipping seed");
    }

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()), // TODO: restrict origins once the web client has a fixed host
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
