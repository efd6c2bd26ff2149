//! 统一错误处理
//!
//! 提供应用级错误类型和响应结构：
//! - [`AppError`] - 应用错误枚举
//! - [`AppResponse`] - API 响应结构
//!
//! # 错误码规范
//!
//! | 前缀 | 分类 | 示例 |
//! |------|------|------|
//! | E0xxx | 通用错误 | E0007 数据不完整 |
//! | E1xxx | 认证错误 | E1001 未登录 |
//! | E4xxx | 订单错误 | E4004 下单冲突 |
//! | E5xxx | 支付错误 | E5001 支付未确认 |
//! | E6xxx | 商品错误 | E6002 库存不足 |
//! | E9xxx | 系统错误 | E9002 数据库错误 |
//!
//! # 使用示例
//!
//! ```ignore
//! // 返回错误
//! Err(AppError::not_found("Order not found"))
//!
//! // 返回成功响应
//! Ok(ok(data))
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use tracing::error;

/// API 统一响应结构
///
/// ```json
/// {
///   "code": "E0000",
///   "message": "Success",
///   "data": { ... }
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AppResponse<T> {
    /// 错误码 (E0000 表示成功)
    pub code: String,
    /// 消息
    pub message: String,
    /// 响应数据
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 应用错误枚举
///
/// # 错误分类
///
/// | 分类 | 说明 |
/// |------|------|
/// | 认证错误 | 未登录、令牌过期、无效令牌 |
/// | 业务逻辑错误 | 资源不存在、验证失败、库存不足、下单冲突 |
/// | 系统错误 | 数据库错误、内部错误、网关不可达 |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // ========== 认证错误 (401) ==========
    #[error("Authentication required")]
    /// 未登录 (401)
    Unauthorized,

    #[error("Token expired")]
    /// 令牌过期 (401)
    TokenExpired,

    #[error("Invalid token")]
    /// 无效令牌 (401)
    InvalidToken,

    // ========== 通用业务错误 (4xx) ==========
    #[error("Resource not found: {0}")]
    /// 资源不存在 (404)
    NotFound(String),

    #[error("Validation failed: {0}")]
    /// 验证失败 (400)
    Validation(String),

    #[error("Incomplete data: {0}")]
    /// 数据不完整 (400)
    IncompleteData(String),

    #[error("Invalid quantity: {0}")]
    /// 商品数量非法 (400)
    InvalidQuantity(String),

    // ========== 订单错误 (4xx) ==========
    #[error("Order not found: {0}")]
    /// 订单不存在 (404)
    OrderNotFound(String),

    #[error("Invalid pay method: {0}")]
    /// 非法支付方式 (400)
    InvalidPayMethod(String),

    #[error("Invalid address: {0}")]
    /// 非法收货地址 (400)
    InvalidAddress(String),

    #[error("Stock contention: {0}")]
    /// 乐观锁重试耗尽，可重新提交 (409)
    ContentionExhausted(String),

    #[error("Cart entry missing: {0}")]
    /// 提交的商品不在购物车中 (422)
    CartEntryMissing(String),

    // ========== 商品错误 (4xx) ==========
    #[error("Sku not found: {0}")]
    /// 商品不存在 (404)
    SkuNotFound(String),

    #[error("Insufficient stock: {0}")]
    /// 库存不足 (422)
    InsufficientStock(String),

    // ========== 支付错误 ==========
    #[error("Payment not confirmed: {0}")]
    /// 支付未确认，可重新查询 (202)
    PaymentPending(String),

    #[error("Payment gateway unavailable: {0}")]
    /// 支付网关不可达 (502)
    PaymentUnavailable(String),

    // ========== 系统错误 (5xx) ==========
    #[error("Database error: {0}")]
    /// 数据库错误 (500)
    Database(String),

    #[error("Internal server error: {0}")]
    /// 内部错误 (500)
    Internal(String),

    #[error("Invalid request: {0}")]
    /// 无效请求 (400)
    Invalid(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // Authentication errors (401)
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "E1001", "Please login first"),
            AppError::TokenExpired => (StatusCode::UNAUTHORIZED, "E1003", "Token expired"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "E1004", "Invalid token"),

            // General business errors
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "E0003", msg.as_str()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "E0002", msg.as_str()),
            AppError::IncompleteData(msg) => (StatusCode::BAD_REQUEST, "E0007", msg.as_str()),
            AppError::InvalidQuantity(msg) => (StatusCode::BAD_REQUEST, "E0008", msg.as_str()),

            // Order errors
            AppError::OrderNotFound(msg) => (StatusCode::NOT_FOUND, "E4001", msg.as_str()),
            AppError::InvalidPayMethod(msg) => (StatusCode::BAD_REQUEST, "E4002", msg.as_str()),
            AppError::InvalidAddress(msg) => (StatusCode::BAD_REQUEST, "E4003", msg.as_str()),
            AppError::ContentionExhausted(msg) => (StatusCode::CONFLICT, "E4004", msg.as_str()),
            AppError::CartEntryMissing(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E4005", msg.as_str())
            }

            // Product errors
            AppError::SkuNotFound(msg) => (StatusCode::NOT_FOUND, "E6001", msg.as_str()),
            AppError::InsufficientStock(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "E6002", msg.as_str())
            }

            // Payment errors
            AppError::PaymentPending(msg) => (StatusCode::ACCEPTED, "E5001", msg.as_str()),
            AppError::PaymentUnavailable(msg) => (StatusCode::BAD_GATEWAY, "E5002", msg.as_str()),

            // Database errors (500)
            AppError::Database(msg) => {
                error!(target: "database", error = %msg, "Database error occurred");
                (StatusCode::INTERNAL_SERVER_ERROR, "E9002", "Database error")
            }

            // Internal errors (500)
            AppError::Internal(msg) => {
                error!(target: "internal", error = %msg, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "E9001",
                    "Internal server error",
                )
            }

            // Invalid request (400)
            AppError::Invalid(msg) => (StatusCode::BAD_REQUEST, "E0006", msg.as_str()),
        };

        let body = Json(AppResponse::<()> {
            code: code.to_string(),
            message: message.to_string(),
            data: None,
        });

        (status, body).into_response()
    }
}

// ========== Helper Constructors ==========

impl AppError {
    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn incomplete(message: impl Into<String>) -> Self {
        Self::IncompleteData(message.into())
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}

// ========== Helper functions ==========

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: "Success".to_string(),
        data: Some(data),
    })
}

/// Create a successful response with custom message
pub fn ok_with_message<T: Serialize>(data: T, message: impl Into<String>) -> Json<AppResponse<T>> {
    Json(AppResponse {
        code: "E0000".to_string(),
        message: message.into(),
        data: Some(data),
    })
}
