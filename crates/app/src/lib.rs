//! SwapShop application composition root
//!
//! Wires configuration, storage, email and auth into the conversations
//! router, plus the shared infrastructure routes and layers used by both
//! the local server and the Lambda entry point.

use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, http::HeaderValue, routing::get, Router};
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool};
use swapshop_auth::AuthConfig;
use swapshop_common::Config;
use swapshop_conversations::{ConversationService, ConversationsState};
use swapshop_email::{EmailConfig, EmailServiceFactory};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Embedded schema migrations
pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Largest accepted request body; messages are capped well below this
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Open the connection pool sized from configuration
pub async fn connect_pool(config: &Config) -> Result<PgPool, anyhow::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|e| anyhow::anyhow!("Database connection failed: {}", e))?;
    Ok(pool)
}

/// Apply pending schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), anyhow::Error> {
    MIGRATOR
        .run(pool)
        .await
        .map_err(|e| anyhow::anyhow!("Migration failed: {}", e))?;
    tracing::info!("Database migrations applied");
    Ok(())
}

/// Token verification settings derived from the app configuration
pub fn auth_config(config: &Config) -> AuthConfig {
    AuthConfig {
        jwt_secret: config.jwt_secret.clone(),
        issuer: config.jwt_issuer.clone(),
        audience: config.jwt_audience.clone(),
    }
}

/// Create the main application router backed by PostgreSQL
pub async fn create_app(config: Config, pool: PgPool) -> Result<Router, anyhow::Error> {
    let email_config = EmailConfig::from_env()?;
    let email_service = EmailServiceFactory::create(email_config).await?;

    let service = ConversationService::postgres(pool, Arc::from(email_service));
    Ok(build_router(service, auth_config(&config)))
}

/// Compose the domain router with shared infrastructure routes
pub fn build_router(service: ConversationService, auth: AuthConfig) -> Router {
    let state = ConversationsState { service, auth };

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(|| async { "SwapShop API v0.0.1-SNAPSHOT" }))
        .merge(swapshop_conversations::routes().with_state(state))
}

/// CORS policy from a comma-separated origin list; `*` allows any origin
pub fn build_cors_layer(allowed_origins: &str) -> CorsLayer {
    let base = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.trim() == "*" {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = o, "Ignoring malformed CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}

/// Request body size limit
pub fn body_limit_layer() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_BODY_BYTES)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
