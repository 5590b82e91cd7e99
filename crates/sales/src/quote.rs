use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use hamperdesk_core::{CustomerId, DomainError, DomainResult, Entity, Money, OrderId, QuoteId};

use crate::line::{LineItem, LineItemInput, OrderLike};

/// Days a quote stays open when no expiry date is given.
pub const QUOTE_VALIDITY_DAYS: u64 = 30;

/// Quote status lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    #[default]
    Draft,
    Sent,
    Accepted,
    Rejected,
    ConvertedToOrder,
    Expired,
}

impl QuoteStatus {
    pub fn can_convert(&self) -> bool {
        matches!(
            self,
            QuoteStatus::Draft | QuoteStatus::Sent | QuoteStatus::Accepted
        )
    }

    /// Statuses that lapse to `Expired` once the expiry date has passed.
    pub fn can_expire(&self) -> bool {
        matches!(self, QuoteStatus::Draft | QuoteStatus::Sent)
    }
}

/// A non-binding priced proposal, convertible into an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: QuoteId,
    pub quote_number: String,
    pub customer_id: CustomerId,
    pub items: Vec<LineItem>,
    pub quote_date: NaiveDate,
    pub expiry_date: NaiveDate,
    pub status: QuoteStatus,
    pub total_amount: Money,
    pub total_vat_amount: Money,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Set exactly once, when the quote is converted.
    #[serde(default)]
    pub related_order_id: Option<OrderId>,
}

impl Quote {
    pub fn grand_total(&self) -> Money {
        self.total_amount + self.total_vat_amount
    }

    pub fn is_converted(&self) -> bool {
        self.status == QuoteStatus::ConvertedToOrder || self.related_order_id.is_some()
    }

    pub fn ensure_convertible(&self) -> DomainResult<()> {
        if self.is_converted() {
            return Err(DomainError::conflict(format!(
                "quote {} was already converted to an order",
                self.quote_number
            )));
        }
        if !self.status.can_convert() {
            return Err(DomainError::conflict(format!(
                "quote {} cannot be converted from status {:?}",
                self.quote_number, self.status
            )));
        }
        Ok(())
    }

    /// Terminal transition. Fails if the quote was already converted.
    pub fn mark_converted(&mut self, order_id: OrderId) -> DomainResult<()> {
        self.ensure_convertible()?;
        self.related_order_id = Some(order_id);
        self.status = QuoteStatus::ConvertedToOrder;
        Ok(())
    }

    pub fn is_past_expiry(&self, today: NaiveDate) -> bool {
        self.status.can_expire() && today > self.expiry_date
    }
}

impl OrderLike for Quote {
    fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    fn items(&self) -> &[LineItem] {
        &self.items
    }
}

impl Entity for Quote {
    type Id = QuoteId;
    const COLLECTION: &'static str = "quotes";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteDraft {
    pub customer_id: CustomerId,
    pub items: Vec<LineItemInput>,
    #[serde(default)]
    pub quote_date: Option<NaiveDate>,
    /// Defaults to the quote date plus the validity window.
    #[serde(default)]
    pub expiry_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: QuoteStatus,
    #[serde(default)]
    pub shipping_address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl QuoteDraft {
    pub fn new(customer_id: CustomerId, items: Vec<LineItemInput>) -> Self {
        Self {
            customer_id,
            items,
            quote_date: None,
            expiry_date: None,
            status: QuoteStatus::Draft,
            shipping_address: None,
            notes: None,
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.items.is_empty() {
            return Err(DomainError::validation("quote must contain at least one item"));
        }
        if self.status == QuoteStatus::ConvertedToOrder {
            return Err(DomainError::validation(
                "quotes become converted only through conversion",
            ));
        }
        if let (Some(date), Some(expiry)) = (self.quote_date, self.expiry_date) {
            if expiry < date {
                return Err(DomainError::validation(
                    "expiry date cannot be before the quote date",
                ));
            }
        }
        Ok(())
    }
}
