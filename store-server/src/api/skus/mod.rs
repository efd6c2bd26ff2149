//! SKU read-path API 模块

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/skus", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::index))
        .route("/history", get(handler::history))
        .route("/{id}", get(handler::detail))
}
