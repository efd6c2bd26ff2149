//! Order Commit Engine
//!
//! Turns a cart selection into a persisted order plus line records inside
//! one all-or-nothing transaction. Stock is reserved at placement time by
//! an optimistic compare-and-swap per sku, retried under contention up to
//! [`stock::MAX_ATTEMPTS`]. Quantities are read from the cart store at
//! commit time, never from client input.
//!
//! Write ordering inside the transaction: ledger first, line second. A
//! rollback caused by a later sku therefore undoes both the earlier skus'
//! lines and their stock mutations together.

use sqlx::{SqliteConnection, SqlitePool};

use crate::cart::CartStore;
use crate::db::repository::{AddressRepository, OrderRepository, RepoError, SkuRepository};
use crate::orders::error::CommitError;
use crate::orders::stock::{self, plan_stock_update};
use crate::services::{OutboundTask, TaskQueue};
use shared::models::{CartLineView, CommitResult, OrderPreview, PayMethod};

/// Totals accumulated while walking the selection
#[derive(Debug, Default)]
struct CommitTotals {
    total_count: i64,
    total_price_cents: i64,
    sold_out: Vec<i64>,
}

#[derive(Clone, Debug)]
pub struct OrderCommitEngine {
    pool: SqlitePool,
    cart: CartStore,
    addresses: AddressRepository,
    skus: SkuRepository,
    orders: OrderRepository,
    tasks: TaskQueue,
    transit_price_cents: i64,
}

impl OrderCommitEngine {
    pub fn new(
        pool: SqlitePool,
        cart: CartStore,
        tasks: TaskQueue,
        transit_price_cents: i64,
    ) -> Self {
        Self {
            addresses: AddressRepository::new(pool.clone()),
            skus: SkuRepository::new(pool.clone()),
            orders: OrderRepository::new(pool.clone()),
            pool,
            cart,
            tasks,
            transit_price_cents,
        }
    }

    /// Place-order preview: selected lines with quantities from the cart,
    /// totals, shipping, and the user's saved addresses
    pub async fn place(
        &self,
        user_id: i64,
        sku_ids: &[i64],
    ) -> Result<OrderPreview, CommitError> {
        if sku_ids.is_empty() {
            return Err(CommitError::EmptySelection);
        }

        let mut lines = Vec::with_capacity(sku_ids.len());
        let mut total_count = 0i64;
        let mut total_price_cents = 0i64;

        for &sku_id in sku_ids {
            let sku = self
                .skus
                .find_by_id(sku_id)
                .await?
                .ok_or(CommitError::SkuNotFound(sku_id))?;
            let quantity = i64::from(
                self.cart
                    .quantity(user_id, sku_id)?
                    .ok_or(CommitError::CartEntryMissing(sku_id))?,
            );
            let subtotal = sku.price_cents * quantity;
            total_count += quantity;
            total_price_cents += subtotal;
            lines.push(CartLineView {
                sku_id: sku.id,
                name: sku.name,
                unit: sku.unit,
                price_cents: sku.price_cents,
                quantity,
                subtotal_cents: subtotal,
                stock: sku.stock,
            });
        }

        let addresses = self
            .addresses
            .find_by_user(user_id)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        let sku_ids_joined = sku_ids
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        Ok(OrderPreview {
            lines,
            total_count,
            total_price_cents,
            transit_price_cents: self.transit_price_cents,
            total_pay_cents: total_price_cents + self.transit_price_cents,
            addresses,
            sku_ids: sku_ids_joined,
        })
    }

    /// Commit the selection into a persisted order
    ///
    /// Validation errors reject before the transaction opens; everything
    /// from the order header insert onward runs in one transaction and
    /// rolls back without trace on any failure.
    pub async fn commit(
        &self,
        user_id: i64,
        addr_id: i64,
        pay_method: PayMethod,
        sku_ids: &[i64],
    ) -> Result<CommitResult, CommitError> {
        if sku_ids.is_empty() {
            return Err(CommitError::EmptySelection);
        }
        self.addresses
            .find_for_user(addr_id, user_id)
            .await?
            .ok_or(CommitError::InvalidAddress(addr_id))?;

        let order_id = shared::util::order_id(user_id);
        let created_at = shared::util::now_millis();

        let mut tx = self.pool.begin().await.map_err(RepoError::from)?;
        let totals = match self
            .commit_in_tx(
                &mut tx,
                &order_id,
                user_id,
                addr_id,
                pay_method,
                sku_ids,
                created_at,
            )
            .await
        {
            Ok(totals) => totals,
            Err(e) => {
                // Explicit rollback: no order row, no lines, no stock
                // deltas survive the abort
                if let Err(re) = tx.rollback().await {
                    tracing::error!(error = %re, order_id = %order_id, "rollback failed");
                }
                return Err(e);
            }
        };
        tx.commit().await.map_err(RepoError::from)?;

        tracing::info!(
            order_id = %order_id,
            user_id,
            total_count = totals.total_count,
            total_price_cents = totals.total_price_cents,
            "order committed"
        );

        // Post-commit cart eviction. A failure here leaves a stale cart
        // entry, which the next add/update overwrites; the order itself
        // is already durable.
        if let Err(e) = self.cart.remove_many(user_id, sku_ids) {
            tracing::warn!(error = %e, order_id = %order_id, user_id, "cart eviction failed after commit");
        }

        for sku_id in totals.sold_out {
            self.tasks.enqueue(OutboundTask::CatalogChanged { sku_id });
        }

        Ok(CommitResult { order_id })
    }

    async fn commit_in_tx(
        &self,
        conn: &mut SqliteConnection,
        order_id: &str,
        user_id: i64,
        addr_id: i64,
        pay_method: PayMethod,
        sku_ids: &[i64],
        created_at: i64,
    ) -> Result<CommitTotals, CommitError> {
        // Header first, totals zero until the selection is walked. The
        // insert is also the transaction's first statement, so it takes
        // the write lock before any stock read below: reads inside the
        // transaction always observe post-contention state.
        OrderRepository::create_tx(
            conn,
            order_id,
            user_id,
            addr_id,
            i32::from(pay_method) as i64,
            self.transit_price_cents,
            created_at,
        )
        .await?;

        let mut totals = CommitTotals::default();

        for &sku_id in sku_ids {
            // Quantity from the cart store, at commit time
            let quantity = i64::from(
                self.cart
                    .quantity(user_id, sku_id)?
                    .ok_or(CommitError::CartEntryMissing(sku_id))?,
            );

            let mut attempt = 0u32;
            let unit_price_cents = loop {
                attempt += 1;
                let (cur_stock, cur_sales, price_cents) =
                    SkuRepository::read_stock_tx(conn, sku_id)
                        .await?
                        .ok_or(CommitError::SkuNotFound(sku_id))?;

                // A shortage is not retried: stock does not grow back
                // mid-commit
                let plan = plan_stock_update(cur_stock, cur_sales, quantity).map_err(|s| {
                    CommitError::InsufficientStock {
                        sku_id,
                        requested: s.requested,
                        available: s.available,
                    }
                })?;

                let swapped = SkuRepository::compare_and_swap_stock(
                    conn,
                    sku_id,
                    cur_stock,
                    plan.new_stock,
                    plan.new_sales,
                )
                .await?;

                if swapped {
                    if plan.new_stock == 0 {
                        totals.sold_out.push(sku_id);
                    }
                    break price_cents;
                }
                if attempt >= stock::MAX_ATTEMPTS {
                    return Err(CommitError::ContentionExhausted(sku_id, attempt));
                }
                tracing::debug!(sku_id, attempt, "stock swap lost the race, retrying");
            };

            // Line recorded only after the ledger update for this sku
            // succeeded, with the price observed in the winning attempt
            OrderRepository::insert_line_tx(conn, order_id, sku_id, quantity, unit_price_cents)
                .await?;

            totals.total_count += quantity;
            totals.total_price_cents += unit_price_cents * quantity;
        }

        OrderRepository::update_totals_tx(
            conn,
            order_id,
            totals.total_count,
            totals.total_price_cents,
        )
        .await?;

        Ok(totals)
    }
}
