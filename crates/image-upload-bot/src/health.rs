//! Health check endpoints

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Health check status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub uptime_seconds: u64,
    pub bot_username: Option<String>,
}

/// Immutable state shared by the health routes
#[derive(Clone)]
pub struct AppState {
    pub start_time: SystemTime,
    pub bot_username: Option<String>,
}

impl AppState {
    pub fn new(bot_username: Option<String>) -> Self {
        Self {
            start_time: SystemTime::now(),
            bot_username,
        }
    }
}

/// Health check endpoint handler
async fn health_handler(State(state): State<AppState>) -> (StatusCode, Json<HealthStatus>) {
    let uptime = state.start_time.elapsed().unwrap_or_default().as_secs();

    (
        StatusCode::OK,
        Json(HealthStatus {
            status: "healthy".to_string(),
            uptime_seconds: uptime,
            bot_username: state.bot_username.clone(),
        }),
    )
}

/// Liveness check (process is alive)
async fn live_handler() -> StatusCode {
    StatusCode::OK
}

/// Create health check router
pub fn create_health_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/live", get(live_handler))
        .with_state(state)
}

/// Start health check server
pub async fn start_health_server(state: AppState, port: u16) -> anyhow::Result<()> {
    let app = create_health_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Health check server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
