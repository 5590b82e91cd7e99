use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use hamperdesk_core::{CustomerId, DomainError, DomainResult, Entity, InvoiceId, Money, OrderId};
use hamperdesk_parties::Customer;
use hamperdesk_sales::Order;

/// Days between issue and due date for a freshly generated invoice.
pub const PAYMENT_TERM_DAYS: u64 = 30;

/// Invoice payment lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    PartiallyPaid,
    Paid,
    Overdue,
    Cancelled,
}

impl PaymentStatus {
    /// Statuses still waiting on money, which lapse to `Overdue`.
    pub fn is_outstanding(&self) -> bool {
        matches!(self, PaymentStatus::Pending | PaymentStatus::PartiallyPaid)
    }
}

/// Fiscal document issued for exactly one order.
///
/// Amounts and customer fields are copied at issue time so later edits to the
/// order or customer do not rewrite the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub order_id: OrderId,
    pub order_number: String,
    pub customer_id: CustomerId,
    pub issue_date: NaiveDate,
    pub due_date: NaiveDate,
    pub payment_status: PaymentStatus,
    pub total_amount: Money,
    pub total_vat_amount: Money,
    pub grand_total: Money,
    pub customer_name: String,
    #[serde(default)]
    pub customer_tax_id: Option<String>,
    #[serde(default)]
    pub customer_address: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Invoice {
    /// Issue an invoice for `order` on `issue_date`.
    ///
    /// The billing address prefers the order's shipping address over the
    /// customer's default.
    pub fn issue(
        id: InvoiceId,
        invoice_number: String,
        order: &Order,
        customer: &Customer,
        issue_date: NaiveDate,
    ) -> DomainResult<Self> {
        if order.customer_id != customer.id {
            return Err(DomainError::validation(format!(
                "customer {} does not own order {}",
                customer.id, order.order_number
            )));
        }
        let due_date = issue_date
            .checked_add_days(Days::new(PAYMENT_TERM_DAYS))
            .ok_or_else(|| DomainError::validation("invoice due date out of range"))?;

        Ok(Self {
            id,
            invoice_number,
            order_id: order.id,
            order_number: order.order_number.clone(),
            customer_id: customer.id,
            issue_date,
            due_date,
            payment_status: PaymentStatus::Pending,
            total_amount: order.total_amount,
            total_vat_amount: order.total_vat_amount,
            grand_total: order.total_amount + order.total_vat_amount,
            customer_name: customer.name.clone(),
            customer_tax_id: customer.tax_id.clone(),
            customer_address: order
                .shipping_address
                .clone()
                .or_else(|| customer.address.clone()),
            customer_email: customer.email.clone(),
            notes: None,
        })
    }

    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        self.payment_status.is_outstanding() && today > self.due_date
    }

    pub fn apply_update(&mut self, update: InvoiceUpdate) -> DomainResult<()> {
        if self.payment_status == PaymentStatus::Cancelled {
            return Err(DomainError::conflict(format!(
                "invoice {} is cancelled",
                self.invoice_number
            )));
        }
        if let Some(due) = update.due_date {
            if due < self.issue_date {
                return Err(DomainError::validation(
                    "due date cannot be before the issue date",
                ));
            }
            self.due_date = due;
        }
        if let Some(status) = update.payment_status {
            self.payment_status = status;
        }
        if let Some(notes) = update.notes {
            let notes = notes.trim();
            self.notes = (!notes.is_empty()).then(|| notes.to_string());
        }
        Ok(())
    }
}

impl Entity for Invoice {
    type Id = InvoiceId;
    const COLLECTION: &'static str = "invoices";

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The editable part of an issued invoice. `None` leaves a field unchanged;
/// an empty `notes` string clears the notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceUpdate {
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}
