//! Orders: creation, edits and the stock movements they cause.

use tracing::{debug, info, warn};

use hamperdesk_activity::ActivityKind;
use hamperdesk_core::{DomainError, DomainResult, Money, OrderId};
use hamperdesk_inventory::{StockPlan, plan_create, plan_update};
use hamperdesk_invoicing::allocate_line;
use hamperdesk_sales::{LineItem, Order, OrderDraft, OrderStatus, resolve_lines};

use crate::sequence::SequenceKind;

use super::Engine;

impl Engine {
    /// `(total_amount, total_vat_amount)` for a set of lines.
    pub(super) fn totals(&self, items: &[LineItem]) -> DomainResult<(Money, Money)> {
        let hampers = self.hampers.all();
        let products = self.products.all();
        items
            .iter()
            .try_fold((Money::ZERO, Money::ZERO), |(base, vat), item| {
                let line = allocate_line(item, hampers, products);
                base.checked_add(line.line_base)
                    .zip(vat.checked_add(line.total_vat))
            })
            .ok_or_else(|| DomainError::validation("document total is out of range"))
    }

    fn commit_stock(&mut self, plan: &StockPlan) {
        if plan.is_empty() {
            return;
        }
        let commit = plan.commit(self.products.all());
        for id in &commit.missing {
            warn!(product_id = %id, "stock movement skipped for missing product");
        }
        for p in &commit.updated {
            debug!(product_id = %p.id, stock = p.stock, delta = plan.delta(&p.id), "stock adjusted");
        }
        self.products.upsert_many(commit.updated);
    }

    fn build_order(&self, id: OrderId, order_number: String, draft: OrderDraft) -> DomainResult<Order> {
        draft.validate()?;
        let customer = self.require_customer(&draft.customer_id)?;
        let items = resolve_lines(&draft.items, self.hampers.all())?;
        let (total_amount, total_vat_amount) = self.totals(&items)?;

        Ok(Order {
            id,
            order_number,
            customer_id: draft.customer_id,
            items,
            order_date: draft.order_date.unwrap_or_else(|| self.clock.today()),
            status: draft.status,
            total_amount,
            total_vat_amount,
            shipping_address: draft.shipping_address.or_else(|| customer.address.clone()),
            payment_method: draft.payment_method,
            notes: draft.notes,
        })
    }

    /// Create an order. Orders created straight into a stock-affecting status
    /// consume stock, and fail with `InsufficientStock` when it is short.
    pub fn add_order(&mut self, draft: OrderDraft) -> DomainResult<Order> {
        let mut order = self.build_order(OrderId::new(), String::new(), draft)?;
        let plan = plan_create(&order, self.hampers.all(), self.products.all())?;

        order.order_number = self.reserve_number(SequenceKind::Order);
        self.commit_stock(&plan);
        self.orders.upsert(order.clone());

        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            status = ?order.status,
            total = %order.grand_total(),
            "order created"
        );
        self.log(
            ActivityKind::OrderCreated,
            format!("Order {} created", order.order_number),
            Some(order.id.to_string()),
        );
        Ok(order)
    }

    /// Replace an order's contents and status, reconciling stock against what
    /// the previous version consumed.
    pub fn update_order(&mut self, id: OrderId, mut draft: OrderDraft) -> DomainResult<Order> {
        let original = self
            .orders
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("order", id))?;
        if draft.order_date.is_none() {
            draft.order_date = Some(original.order_date);
        }
        let updated = self.build_order(id, original.order_number.clone(), draft)?;
        let plan = plan_update(&original, &updated, self.hampers.all(), self.products.all())?;

        self.commit_stock(&plan);
        self.orders.upsert(updated.clone());

        info!(
            order_id = %id,
            order_number = %updated.order_number,
            from = ?original.status,
            to = ?updated.status,
            "order updated"
        );
        let message = if original.status != updated.status {
            format!(
                "Order {} moved to {}",
                updated.order_number,
                updated.status.label()
            )
        } else {
            format!("Order {} updated", updated.order_number)
        };
        self.log(ActivityKind::OrderUpdated, message, Some(id.to_string()));
        Ok(updated)
    }

    /// Status-only edit; items and prices stay as stored.
    pub fn update_order_status(&mut self, id: OrderId, status: OrderStatus) -> DomainResult<Order> {
        let original = self
            .orders
            .get(&id)
            .ok_or_else(|| DomainError::not_found("order", id))?;
        let mut draft = OrderDraft::from_order(original);
        draft.status = status;
        self.update_order(id, draft)
    }
}
