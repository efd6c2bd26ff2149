//! Cart API 模块

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/cart", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/add", post(handler::add))
        .route("/update", post(handler::update))
        .route("/delete", post(handler::delete))
        .route("/count", get(handler::count))
}
