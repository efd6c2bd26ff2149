//! Cart API Handlers
//!
//! Every mutation returns the resulting distinct-item count for the cart
//! badge. Mutations are retry-safe: `update`/`delete` are idempotent
//! sets, only `add` is additive.

use axum::{Json, extract::State};
use serde::Deserialize;

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::{CartBadge, CartView};

/// Body of cart add/update: both fields required
#[derive(Debug, Deserialize)]
pub struct CartMutation {
    pub sku_id: Option<i64>,
    pub count: Option<i64>,
}

/// Body of cart delete
#[derive(Debug, Deserialize)]
pub struct CartDelete {
    pub sku_id: Option<i64>,
}

/// POST /api/cart/add - 添加购物车记录（已有条目数量累加）
pub async fn add(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CartMutation>,
) -> AppResult<Json<AppResponse<CartBadge>>> {
    let sku_id = payload
        .sku_id
        .ok_or_else(|| AppError::incomplete("sku_id is required"))?;
    let count = payload
        .count
        .ok_or_else(|| AppError::incomplete("count is required"))?;

    let total_count = state.cart.add(user.id, sku_id, count).await?;
    Ok(ok(CartBadge { total_count }))
}

/// POST /api/cart/update - 更新购物车记录（绝对数量）
pub async fn update(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CartMutation>,
) -> AppResult<Json<AppResponse<CartBadge>>> {
    let sku_id = payload
        .sku_id
        .ok_or_else(|| AppError::incomplete("sku_id is required"))?;
    let count = payload
        .count
        .ok_or_else(|| AppError::incomplete("count is required"))?;

    let total_count = state.cart.update(user.id, sku_id, count).await?;
    Ok(ok(CartBadge { total_count }))
}

/// POST /api/cart/delete - 删除购物车记录（幂等）
pub async fn delete(
    State(state): State<ServerState>,
    user: CurrentUser,
    Json(payload): Json<CartDelete>,
) -> AppResult<Json<AppResponse<CartBadge>>> {
    let sku_id = payload
        .sku_id
        .ok_or_else(|| AppError::incomplete("sku_id is required"))?;

    let total_count = state.cart.remove(user.id, sku_id)?;
    Ok(ok(CartBadge { total_count }))
}

/// GET /api/cart - 购物车页面数据
pub async fn list(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<CartView>>> {
    let view = state.cart.list(user.id).await?;
    Ok(ok(view))
}

/// GET /api/cart/count - 角标数量
pub async fn count(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<CartBadge>>> {
    let total_count = state.cart.count(user.id)?;
    Ok(ok(CartBadge { total_count }))
}
