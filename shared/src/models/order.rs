//! Order domain enums and view DTOs

use serde::{Deserialize, Serialize};

// ============================================================================
// Order Status
// ============================================================================

/// 订单状态机
///
/// `Unpaid(1) → AwaitingShipment(2) → AwaitingReceipt(3) →
/// AwaitingComment(4) → Completed(5)`
///
/// Commit creates `Unpaid`; payment reconciliation moves to
/// `AwaitingComment`; comment submission moves to `Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
#[repr(i32)]
pub enum OrderStatus {
    /// 待支付
    Unpaid = 1,
    /// 待发货
    AwaitingShipment = 2,
    /// 待收货
    AwaitingReceipt = 3,
    /// 待评价（已支付）
    AwaitingComment = 4,
    /// 已完成
    Completed = 5,
}

impl OrderStatus {
    /// Display title used by the order-history view
    pub fn title(&self) -> &'static str {
        match self {
            Self::Unpaid => "待支付",
            Self::AwaitingShipment => "待发货",
            Self::AwaitingReceipt => "待收货",
            Self::AwaitingComment => "待评价",
            Self::Completed => "已完成",
        }
    }
}

impl From<OrderStatus> for i32 {
    fn from(s: OrderStatus) -> i32 {
        s as i32
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid order status: {0}")]
pub struct InvalidOrderStatus(pub i32);

impl TryFrom<i32> for OrderStatus {
    type Error = InvalidOrderStatus;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Self::Unpaid),
            2 => Ok(Self::AwaitingShipment),
            3 => Ok(Self::AwaitingReceipt),
            4 => Ok(Self::AwaitingComment),
            5 => Ok(Self::Completed),
            other => Err(InvalidOrderStatus(other)),
        }
    }
}

// ============================================================================
// Pay Method
// ============================================================================

/// 支付方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
#[repr(i32)]
pub enum PayMethod {
    /// 货到付款
    CashOnDelivery = 1,
    /// 余额支付
    WalletBalance = 2,
    /// 第三方网关支付
    Gateway = 3,
    /// 银行卡支付
    BankCard = 4,
}

impl PayMethod {
    pub fn title(&self) -> &'static str {
        match self {
            Self::CashOnDelivery => "货到付款",
            Self::WalletBalance => "余额支付",
            Self::Gateway => "网关支付",
            Self::BankCard => "银行卡支付",
        }
    }
}

impl From<PayMethod> for i32 {
    fn from(m: PayMethod) -> i32 {
        m as i32
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid pay method: {0}")]
pub struct InvalidPayMethod(pub i32);

impl TryFrom<i32> for PayMethod {
    type Error = InvalidPayMethod;

    fn try_from(v: i32) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(Self::CashOnDelivery),
            2 => Ok(Self::WalletBalance),
            3 => Ok(Self::Gateway),
            4 => Ok(Self::BankCard),
            other => Err(InvalidPayMethod(other)),
        }
    }
}

// ============================================================================
// Trade Status (payment gateway)
// ============================================================================

/// Outcome reported by the payment gateway for one trade query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStatus {
    /// Payment confirmed
    Success,
    /// Trade exists but not yet paid
    Pending,
    /// Trade closed without payment
    Closed,
    /// Gateway did not recognize the trade (or transport failed)
    Unknown,
}

// ============================================================================
// View DTOs
// ============================================================================

/// Saved delivery address, as shown on the place-order page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressView {
    pub id: i64,
    pub receiver: String,
    pub addr: String,
    pub zip_code: String,
    pub phone: String,
    pub is_default: bool,
}

/// One order line with its point-in-time price and computed subtotal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineView {
    pub sku_id: i64,
    pub name: String,
    pub quantity: i64,
    /// Unit price copied from the sku at purchase time, in cents
    pub unit_price_cents: i64,
    /// quantity × unit_price_cents
    pub subtotal_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Full order as rendered in history and detail pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderView {
    pub order_id: String,
    pub status: OrderStatus,
    pub status_name: String,
    pub pay_method: PayMethod,
    pub pay_method_name: String,
    pub total_count: i64,
    pub total_price_cents: i64,
    pub transit_price_cents: i64,
    /// total_price + transit_price, computed for display
    pub total_pay_cents: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_no: Option<String>,
    pub created_at: i64,
    pub lines: Vec<OrderLineView>,
}

/// Place-order summary returned before commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPreview {
    pub lines: Vec<crate::models::CartLineView>,
    pub total_count: i64,
    pub total_price_cents: i64,
    pub transit_price_cents: i64,
    pub total_pay_cents: i64,
    pub addresses: Vec<AddressView>,
    /// Comma-joined sku ids, echoed back to the commit form
    pub sku_ids: String,
}

/// One page of order history plus the page-window metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderPage {
    pub orders: Vec<OrderView>,
    pub page: u32,
    pub num_pages: u32,
    /// Page numbers to render (window of at most 5)
    pub pages: Vec<u32>,
}

/// Result of a successful commit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitResult {
    pub order_id: String,
}

/// Result of the pay endpoint: where to send the buyer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayResult {
    pub pay_url: String,
}

/// Result of the payment-status check endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub status: TradeStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trade_no: Option<String>,
}

/// One (sku, content) pair in a comment submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentEntry {
    pub sku_id: i64,
    #[serde(default)]
    pub content: String,
}
