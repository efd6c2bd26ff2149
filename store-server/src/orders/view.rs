//! Order read paths and view projections
//!
//! Rendered views are explicit DTOs produced here; domain rows are never
//! decorated with display fields.

use crate::db::models::OrderInfo;
use crate::db::repository::{OrderRepository, RepoError, SkuRepository};
use shared::models::{OrderLineView, OrderPage, OrderStatus, OrderView, PayMethod};

/// Orders per history page
pub const PAGE_SIZE: i64 = 2;

/// Most page numbers shown in the pagination strip
const PAGE_WINDOW: u32 = 5;

#[derive(Clone, Debug)]
pub struct OrderQueryService {
    orders: OrderRepository,
    skus: SkuRepository,
}

impl OrderQueryService {
    pub fn new(orders: OrderRepository, skus: SkuRepository) -> Self {
        Self { orders, skus }
    }

    /// One order owned by the user, fully projected
    pub async fn order_detail(
        &self,
        order_id: &str,
        user_id: i64,
    ) -> Result<Option<OrderView>, RepoError> {
        match self.orders.find_for_user(order_id, user_id).await? {
            Some(order) => Ok(Some(self.build_view(order).await?)),
            None => Ok(None),
        }
    }

    /// One page of the user's order history, newest first
    pub async fn history_page(&self, user_id: i64, page: u32) -> Result<OrderPage, RepoError> {
        let count = self.orders.count_by_user(user_id).await?;
        let num_pages = (count.max(0) as u32).div_ceil(PAGE_SIZE as u32).max(1);

        // Out-of-range pages fall back to the first page
        let page = if page == 0 || page > num_pages { 1 } else { page };

        let offset = i64::from(page - 1) * PAGE_SIZE;
        let rows = self.orders.find_by_user(user_id, PAGE_SIZE, offset).await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            orders.push(self.build_view(row).await?);
        }

        Ok(OrderPage {
            orders,
            page,
            num_pages,
            pages: page_window(page, num_pages),
        })
    }

    async fn build_view(&self, order: OrderInfo) -> Result<OrderView, RepoError> {
        let status = OrderStatus::try_from(order.order_status as i32)
            .map_err(|e| RepoError::Validation(e.to_string()))?;
        let pay_method = PayMethod::try_from(order.pay_method as i32)
            .map_err(|e| RepoError::Validation(e.to_string()))?;

        let rows = self.orders.lines_for_order(&order.order_id).await?;
        let mut lines = Vec::with_capacity(rows.len());
        for line in rows {
            // Sku name resolved at read time; the price is the line's own
            // point-in-time copy
            let name = match self.skus.find_by_id(line.sku_id).await? {
                Some(sku) => sku.name,
                None => format!("Sku {}", line.sku_id),
            };
            lines.push(OrderLineView {
                sku_id: line.sku_id,
                name,
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                subtotal_cents: line.unit_price_cents * line.quantity,
                comment: line.comment,
            });
        }

        Ok(OrderView {
            order_id: order.order_id,
            status,
            status_name: status.title().to_string(),
            pay_method,
            pay_method_name: pay_method.title().to_string(),
            total_count: order.total_count,
            total_price_cents: order.total_price_cents,
            transit_price_cents: order.transit_price_cents,
            total_pay_cents: order.total_price_cents + order.transit_price_cents,
            trade_no: order.trade_no,
            created_at: order.created_at,
            lines,
        })
    }
}

/// Page numbers to render: at most [`PAGE_WINDOW`], centered on the
/// current page once past the edges
fn page_window(page: u32, num_pages: u32) -> Vec<u32> {
    if num_pages <= PAGE_WINDOW {
        (1..=num_pages).collect()
    } else if page <= 3 {
        (1..=PAGE_WINDOW).collect()
    } else if num_pages - page <= 2 {
        (num_pages - PAGE_WINDOW + 1..=num_pages).collect()
    } else {
        (page - 2..=page + 2).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_shows_all_when_few_pages() {
        assert_eq!(page_window(1, 3), vec![1, 2, 3]);
        assert_eq!(page_window(3, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn window_clamps_to_front() {
        assert_eq!(page_window(2, 9), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn window_clamps_to_back() {
        assert_eq!(page_window(8, 9), vec![5, 6, 7, 8, 9]);
    }

    #[test]
    fn window_centers_in_the_middle() {
        assert_eq!(page_window(5, 9), vec![3, 4, 5, 6, 7]);
    }
}
