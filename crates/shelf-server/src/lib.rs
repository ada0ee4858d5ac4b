//! Shelf Web Server
//!
//! Axum-based JSON API over the Shelf search and analytics engines.
//!
//! The server acts for a single configured owner; authentication and
//! sessions are left to whatever sits in front of it.
//! - Restrictive CORS policy
//! - Security headers
//! - Sanitized error responses

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{error, info};

use shelf_core::analytics::{AnalyticsEngine, Period};
use shelf_core::db::Database;
use shelf_core::gateway::DatabaseGateway;
use shelf_core::history::{HistoryStore, MemoryHistoryStore};
use shelf_core::search::SearchEngine;

mod handlers;

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Owner whose categories and items the API serves
    pub owner: String,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Period used when `?period=` is omitted
    pub default_period: Period,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            owner: "local".to_string(),
            allowed_origins: vec![],
            default_period: Period::Month,
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    pub search: SearchEngine,
    pub analytics: AnalyticsEngine,
}

impl AppState {
    pub fn new(db: Database, config: ServerConfig, history: Arc<dyn HistoryStore>) -> Self {
        let gateway = Arc::new(DatabaseGateway::new(db.clone(), config.owner.clone()));
        Self {
            search: SearchEngine::new(gateway.clone(), history),
            analytics: AnalyticsEngine::new(gateway),
            db,
            config,
        }
    }

    pub fn owner(&self) -> &str {
        &self.config.owner
    }
}

/// Generic success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router with a process-local search history
pub fn create_router(db: Database, static_dir: Option<&str>, config: ServerConfig) -> Router {
    create_router_with_history(db, static_dir, config, Arc::new(MemoryHistoryStore::new()))
}

pub fn create_router_with_history(
    db: Database,
    static_dir: Option<&str>,
    config: ServerConfig,
    history: Arc<dyn HistoryStore>,
) -> Router {
    let state = Arc::new(AppState::new(db, config.clone(), history));

    let api_routes = Router::new()
        // Search
        .route("/search", get(handlers::search))
        .route("/search/suggestions", get(handlers::search_suggestions))
        .route(
            "/search/recent",
            get(handlers::recent_searches).delete(handlers::clear_recent_searches),
        )
        // Categories
        .route("/categories", get(handlers::list_categories))
        .route("/categories/templates", get(handlers::list_templates))
        .route("/categories/:id/items", get(handlers::list_category_items))
        .route("/categories/:id/search", get(handlers::search_category))
        // Analytics
        .route("/analytics", get(handlers::get_analytics))
        .route("/analytics/stats", get(handlers::get_overall_stats))
        .route("/analytics/timeseries", get(handlers::get_time_series))
        .route("/analytics/categories", get(handlers::get_category_distribution))
        .route("/analytics/ratings", get(handlers::get_rating_distribution))
        .route("/analytics/insights", get(handlers::get_insights));

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    let mut app = Router::new()
        .nest("/api", api_routes)
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
        ));

    // Serve static files if directory provided
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Install missing built-in templates; failures are logged, not fatal
pub fn install_templates(db: &Database) -> usize {
    match db.seed_templates() {
        Ok(count) => {
            if count > 0 {
                info!("Installed {} category template(s)", count);
            }
            count
        }
        Err(e) => {
            error!("Failed to seed templates: {}", e);
            0
        }
    }
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&str>,
    config: ServerConfig,
    history: Arc<dyn HistoryStore>,
) -> anyhow::Result<()> {
    install_templates(&db);

    let owner = config.owner.clone();
    let app = create_router_with_history(db, static_dir, config, history);
    let addr = format!("{}:{}", host, port);

    info!(owner = %owner, "Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
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

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
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

        // Client-caused core errors keep their message
        match err.downcast_ref::<shelf_core::Error>() {
            Some(shelf_core::Error::NotFound(what)) => {
                return Self::not_found(&format!("Not found: {}", what));
            }
            Some(shelf_core::Error::InvalidData(msg)) => return Self::bad_request(msg),
            _ => {}
        }

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
