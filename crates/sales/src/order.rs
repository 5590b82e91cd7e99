use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use hamperdesk_core::{CustomerId, DomainError, DomainResult, Entity, Money, OrderId};

use crate::line::{LineItem, LineItemInput, OrderLike};

/// Sales order status lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Draft,
    PendingPayment,
    Processing,
    Packaging,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Draft,
        OrderStatus::PendingPayment,
        OrderStatus::Processing,
        OrderStatus::Packaging,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Whether inventory is reserved/consumed while an order sits in this status.
    pub fn affects_stock(&self) -> bool {
        matches!(
            self,
            OrderStatus::Processing
                | OrderStatus::Packaging
                | OrderStatus::Shipped
                | OrderStatus::Delivered
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Draft => "draft",
            OrderStatus::PendingPayment => "pending payment",
            OrderStatus::Processing => "processing",
            OrderStatus::Packaging => "packaging",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    #[default]
    Transfer,
    Card,
    Cash,
    DirectDebit,
}

/// A binding sale of one or more hampers to a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub customer_id: CustomerId,
    pub items: Vec<LineItem>,
    pub order_date: NaiveDate,
    pub status: OrderStatus,
    /// Σ unit_price · quantity. Derived; never edited directly.
    pub total_amount: Money,
    /// VAT allocated over the items. Derived; never edited directly.
    pub total_vat_amount: Money,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Order {
    pub fn grand_total(&self) -> Money {
        self.total_amount + self.total_vat_amount
    }

    pub fn is_cancelled(&self) -> bool {
        self.status == OrderStatus::Cancelled
    }
}

impl OrderLike for Order {
    fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    fn items(&self) -> &[LineItem] {
        &self.items
    }
}

impl Entity for Order {
    type Id = OrderId;
    const COLLECTION: &'static str = "orders";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Caller-supplied fields for creating or editing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    pub customer_id: CustomerId,
    pub items: Vec<LineItemInput>,
    /// Defaults to today on create; keeps the stored date on update.
    #[serde(default)]
    pub order_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub notes: Option<String>,
}

impl OrderDraft {
    pub fn new(customer_id: CustomerId, items: Vec<LineItemInput>, status: OrderStatus) -> Self {
        Self {
            customer_id,
            items,
            order_date: None,
            status,
            shipping_address: None,
            payment_method: PaymentMethod::default(),
            notes: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.items.is_empty() {
            return Err(DomainError::validation("order must contain at least one item"));
        }
        Ok(())
    }

    /// Editable draft that reproduces `order` (same items, prices and fields).
    pub fn from_order(order: &Order) -> Self {
        Self {
            customer_id: order.customer_id,
            items: order
                .items
                .iter()
                .map(|i| LineItemInput::priced(i.hamper_id, i.quantity, i.unit_price))
                .collect(),
            order_date: Some(order.order_date),
            status: order.status,
            shipping_address: order.shipping_address.clone(),
            payment_method: order.payment_method,
            notes: order.notes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_fulfilment_statuses_affect_stock() {
        let affecting: Vec<_> = OrderStatus::ALL
            .into_iter()
            .filter(OrderStatus::affects_stock)
            .collect();
        assert_eq!(
            affecting,
            vec![
                OrderStatus::Processing,
                OrderStatus::Packaging,
                OrderStatus::Shipped,
                OrderStatus::Delivered
            ]
        );
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::PendingPayment).unwrap(),
            "\"pending_payment\""
        );
    }

    #[test]
    fn empty_draft_is_rejected() {
        let draft = OrderDraft::new(CustomerId::new(), vec![], OrderStatus::Draft);
        assert!(matches!(draft.validate(), Err(DomainError::Validation(_))));
    }
}
