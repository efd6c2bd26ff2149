//! Health check API

use axum::{Json, Router, extract::State, routing::get};

use crate::core::ServerState;
use crate::utils::{AppResponse, AppResult, ok};

pub fn router() -> Router<ServerState> {
    Router::new().route("/api/health", get(health))
}

/// GET /api/health - 存活检查 (数据库连通性)
async fn health(State(state): State<ServerState>) -> AppResult<Json<AppResponse<&'static str>>> {
    sqlx::query("SELECT 1")
        .execute(&state.db.pool)
        .await
        .map_err(|e| crate::utils::AppError::database(e.to_string()))?;
    Ok(ok("healthy"))
}
