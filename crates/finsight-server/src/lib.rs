//! Finsight Web Server
//!
//! Axum-based REST API around the Finsight insights engine.
//!
//! Security features:
//! - Bearer API-key authentication (secure by default, use --no-auth for local dev)
//! - Restrictive CORS policy
//! - Security headers on every response
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, set_header::SetResponseHeaderLayer, trace::TraceLayer};
use tracing::{debug, error, info, warn};

use finsight_core::db::Database;
use finsight_core::InsightsEngine;

mod handlers;

/// Authorization header for API key auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// Comma-separated CORS origins
pub const ALLOWED_ORIGINS_ENV: &str = "FINSIGHT_ALLOWED_ORIGINS";

/// Comma-separated API keys
pub const API_KEYS_ENV: &str = "FINSIGHT_API_KEYS";

/// Health check path, as seen with and without the `/api/v1` prefix
const PUBLIC_PATHS: &[&str] = &["/api/v1/health", "/health"];

/// Health checks are reachable without authentication
fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// API keys accepted as "Bearer <key>" in the Authorization header
    pub api_keys: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            api_keys: vec![],
        }
    }
}

impl ServerConfig {
    /// Read origins and API keys from the environment
    pub fn from_env(require_auth: bool) -> Self {
        Self {
            require_auth,
            allowed_origins: std::env::var(ALLOWED_ORIGINS_ENV)
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            api_keys: std::env::var(API_KEYS_ENV)
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
        }
    }
}

/// Split a comma-separated list, dropping blanks
pub fn parse_list(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub engine: InsightsEngine,
    pub config: ServerConfig,
}

/// Authentication middleware - validates bearer API keys
///
/// API keys are compared in constant time. Health checks are always allowed.
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth || is_public_path(request.uri().path()) {
        return next.run(request).await;
    }

    let api_key_valid = request
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|key| validate_api_key(key, &state.config.api_keys))
        .unwrap_or(false);

    if api_key_valid {
        debug!(path = %request.uri().path(), "Authenticated via API key");
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "Unauthorized request - no valid auth");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "Authentication required"
        })),
    )
        .into_response()
}

/// Validate an API key against the configured keys using constant-time comparison
fn validate_api_key(provided: &str, valid_keys: &[String]) -> bool {
    use subtle::ConstantTimeEq;

    let provided_bytes = provided.as_bytes();

    valid_keys.iter().any(|key| {
        let key_bytes = key.as_bytes();
        // Only compare if lengths match (constant-time for same-length keys)
        provided_bytes.len() == key_bytes.len() && bool::from(provided_bytes.ct_eq(key_bytes))
    })
}

/// Create the application router
pub fn create_router(db: Database, engine: InsightsEngine, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        db,
        engine,
        config: config.clone(),
    });

    let api_routes = Router::new()
        .route("/health", get(handlers::health))
        // Insights
        .route("/insights/categories", get(handlers::list_categories))
        .route("/insights/analyze", post(handlers::analyze))
        .route("/insights/quick-analyze", post(handlers::quick_analyze))
        .route("/insights/user/:user_id", get(handlers::user_insights))
        // Transactions
        .route("/transactions", post(handlers::store_transactions));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
        ))
}

/// Start the server
pub async fn serve_with_config(
    db: Database,
    engine: InsightsEngine,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - do not expose to network!");
    } else if config.api_keys.is_empty() {
        warn!(
            "No API keys configured (set {}); only /api/v1/health will be reachable",
            API_KEYS_ENV
        );
    }

    let app = create_router(db, engine, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error: validation failures are the caller's fault, the
    /// rest are internal
    pub fn from_core(err: finsight_core::Error) -> Self {
        if err.is_validation() {
            Self::bad_request(&err.to_string())
        } else {
            err.into()
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
