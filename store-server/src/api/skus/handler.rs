//! SKU read-path handlers
//!
//! Catalog browsing proper is out of scope; these are the read paths the
//! cart and order flows depend on, plus the browse-history list.

use axum::{
    Json,
    extract::{Path, State},
};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::services::catalog_cache::INDEX_KEY;
use crate::utils::{AppError, AppResponse, AppResult, ok};
use shared::models::SkuView;

/// GET /api/skus - 首页目录视图（缓存旁路）
pub async fn index(
    State(state): State<ServerState>,
) -> AppResult<Json<AppResponse<serde_json::Value>>> {
    if let Some(cached) = state.catalog_cache.get(INDEX_KEY).await {
        return Ok(ok(cached));
    }

    let skus: Vec<SkuView> = state
        .skus
        .find_active()
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .into_iter()
        .map(Into::into)
        .collect();
    let value = serde_json::to_value(&skus)
        .map_err(|e| AppError::internal(e.to_string()))?;
    state.catalog_cache.put(INDEX_KEY, value.clone()).await;
    Ok(ok(value))
}

/// GET /api/skus/:id - 商品详情；登录用户记录浏览历史
pub async fn detail(
    State(state): State<ServerState>,
    user: Option<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<AppResponse<SkuView>>> {
    let sku = state
        .skus
        .find_by_id(id)
        .await
        .map_err(|e| AppError::database(e.to_string()))?
        .ok_or_else(|| AppError::SkuNotFound(format!("Sku {} not found", id)))?;

    if let Some(user) = user
        && let Err(e) = state.cart.push_history(user.id, id)
    {
        // 历史记录失败只影响展示
        tracing::warn!(error = %e, sku_id = id, "failed to record browse history");
    }

    Ok(ok(sku.into()))
}

/// GET /api/skus/history - 最近浏览（≤5，去重，最近在前）
pub async fn history(
    State(state): State<ServerState>,
    user: CurrentUser,
) -> AppResult<Json<AppResponse<Vec<SkuView>>>> {
    let views = state.cart.recent_history(user.id).await?;
    Ok(ok(views))
}
