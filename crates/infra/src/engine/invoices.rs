//! Invoices: generation from orders, payment tracking and VAT breakdowns.

use chrono::NaiveDate;
use tracing::info;

use hamperdesk_activity::ActivityKind;
use hamperdesk_core::{DomainError, DomainResult, InvoiceId, OrderId};
use hamperdesk_invoicing::{
    DetailedInvoiceLineItem, Invoice, InvoiceUpdate, PaymentStatus, VatSummary,
    calculate_detailed_line_items, summarize,
};
use hamperdesk_sales::OrderLike;

use crate::sequence::SequenceKind;

use super::Engine;

impl Engine {
    /// Issue the invoice for an order, dated today and due in 30 days.
    ///
    /// An order is invoiced at most once.
    pub fn generate_invoice_for_order(&mut self, order_id: OrderId) -> DomainResult<Invoice> {
        let order = self
            .orders
            .get(&order_id)
            .ok_or_else(|| DomainError::not_found("order", order_id))?;
        if order.is_cancelled() {
            return Err(DomainError::conflict(format!(
                "order {} is cancelled",
                order.order_number
            )));
        }
        if let Some(existing) = self.invoice_for_order(&order_id) {
            return Err(DomainError::conflict(format!(
                "order {} already has invoice {}",
                order.order_number, existing.invoice_number
            )));
        }
        let customer = self.require_customer(&order.customer_id)?;

        let id = InvoiceId::new();
        let mut invoice = Invoice::issue(id, String::new(), order, customer, self.clock.today())?;
        invoice.invoice_number = self.reserve_number(SequenceKind::Invoice);
        self.invoices.upsert(invoice.clone());

        info!(
            invoice_id = %id,
            invoice_number = %invoice.invoice_number,
            order_number = %invoice.order_number,
            grand_total = %invoice.grand_total,
            "invoice generated"
        );
        self.log(
            ActivityKind::InvoiceGenerated,
            format!(
                "Invoice {} generated for order {}",
                invoice.invoice_number, invoice.order_number
            ),
            Some(id.to_string()),
        );
        Ok(invoice)
    }

    /// Edit payment status, due date or notes.
    pub fn update_invoice(&mut self, id: InvoiceId, update: InvoiceUpdate) -> DomainResult<Invoice> {
        let mut invoice = self
            .invoices
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("invoice", id))?;
        let previous = invoice.payment_status;
        invoice.apply_update(update)?;
        self.invoices.upsert(invoice.clone());

        info!(
            invoice_id = %id,
            from = ?previous,
            to = ?invoice.payment_status,
            "invoice updated"
        );
        self.log(
            ActivityKind::InvoiceUpdated,
            format!("Invoice {} updated", invoice.invoice_number),
            Some(id.to_string()),
        );
        Ok(invoice)
    }

    /// Flag outstanding invoices whose due date is before `today`.
    pub fn mark_overdue_invoices(&mut self, today: NaiveDate) -> Vec<InvoiceId> {
        let overdue: Vec<Invoice> = self
            .invoices
            .all()
            .iter()
            .filter(|i| i.is_overdue_on(today))
            .map(|i| Invoice {
                payment_status: PaymentStatus::Overdue,
                ..i.clone()
            })
            .collect();
        if overdue.is_empty() {
            return Vec::new();
        }

        let ids: Vec<InvoiceId> = overdue.iter().map(|i| i.id).collect();
        let numbers: Vec<String> = overdue.iter().map(|i| i.invoice_number.clone()).collect();
        self.invoices.upsert_many(overdue);

        info!(count = ids.len(), %today, "invoices marked overdue");
        for (id, number) in ids.iter().zip(numbers) {
            self.log(
                ActivityKind::InvoiceOverdue,
                format!("Invoice {number} is overdue"),
                Some(id.to_string()),
            );
        }
        ids
    }

    /// Per-line VAT breakdown for any order-shaped record.
    pub fn calculate_detailed_invoice_line_items<O>(&self, record: &O) -> Vec<DetailedInvoiceLineItem>
    where
        O: OrderLike + ?Sized,
    {
        calculate_detailed_line_items(record, self.hampers.all(), self.products.all())
    }

    pub fn vat_summary_for_order(&self, order_id: OrderId) -> DomainResult<VatSummary> {
        let order = self
            .orders
            .get(&order_id)
            .ok_or_else(|| DomainError::not_found("order", order_id))?;
        Ok(summarize(&self.calculate_detailed_invoice_line_items(order)))
    }
}
