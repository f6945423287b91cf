use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_health_router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Health check: responde 503 si la base de datos no contesta
async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.routes.health().await?;

    Ok(Json(json!({
        "status": "ok",
        "database": "up",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    })))
}
