//! Order API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::history))
        .route("/place", post(handler::place))
        .route("/commit", post(handler::commit))
        .route("/pay", post(handler::pay))
        .route("/check", post(handler::check))
        .route("/{order_id}", get(handler::detail))
        .route("/{order_id}/comment", post(handler::comment))
}
