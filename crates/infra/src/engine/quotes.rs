//! Quotes and their conversion into orders.

use chrono::{Days, NaiveDate};
use tracing::info;

use hamperdesk_activity::ActivityKind;
use hamperdesk_core::{DomainError, DomainResult, QuoteId};
use hamperdesk_invoicing::{DetailedInvoiceLineItem, calculate_detailed_line_items};
use hamperdesk_sales::{
    Order, QUOTE_VALIDITY_DAYS, Quote, QuoteDraft, QuoteStatus, order_draft_from_quote,
    resolve_lines,
};

use crate::sequence::SequenceKind;

use super::Engine;

impl Engine {
    fn build_quote(&self, id: QuoteId, quote_number: String, draft: QuoteDraft) -> DomainResult<Quote> {
        draft.validate()?;
        let customer = self.require_customer(&draft.customer_id)?;
        let items = resolve_lines(&draft.items, self.hampers.all())?;
        let (total_amount, total_vat_amount) = self.totals(&items)?;

        let quote_date = draft.quote_date.unwrap_or_else(|| self.clock.today());
        let expiry_date = match draft.expiry_date {
            Some(date) => date,
            None => quote_date
                .checked_add_days(Days::new(QUOTE_VALIDITY_DAYS))
                .ok_or_else(|| DomainError::validation("quote expiry date out of range"))?,
        };
        if expiry_date < quote_date {
            return Err(DomainError::validation(
                "expiry date cannot be before the quote date",
            ));
        }

        Ok(Quote {
            id,
            quote_number,
            customer_id: draft.customer_id,
            items,
            quote_date,
            expiry_date,
            status: draft.status,
            total_amount,
            total_vat_amount,
            shipping_address: draft.shipping_address.or_else(|| customer.address.clone()),
            notes: draft.notes,
            related_order_id: None,
        })
    }

    pub fn add_quote(&mut self, draft: QuoteDraft) -> DomainResult<Quote> {
        let mut quote = self.build_quote(QuoteId::new(), String::new(), draft)?;
        quote.quote_number = self.reserve_number(SequenceKind::Quote);
        self.quotes.upsert(quote.clone());

        info!(quote_id = %quote.id, quote_number = %quote.quote_number, "quote created");
        self.log(
            ActivityKind::QuoteCreated,
            format!("Quote {} created", quote.quote_number),
            Some(quote.id.to_string()),
        );
        Ok(quote)
    }

    /// Edit an open quote. Converted quotes are final.
    pub fn update_quote(&mut self, id: QuoteId, mut draft: QuoteDraft) -> DomainResult<Quote> {
        let original = self
            .quotes
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("quote", id))?;
        if original.is_converted() {
            return Err(DomainError::conflict(format!(
                "quote {} was already converted to an order",
                original.quote_number
            )));
        }
        if draft.quote_date.is_none() {
            draft.quote_date = Some(original.quote_date);
        }
        if draft.expiry_date.is_none() {
            draft.expiry_date = Some(original.expiry_date);
        }

        let quote = self.build_quote(id, original.quote_number, draft)?;
        self.quotes.upsert(quote.clone());

        info!(quote_id = %id, status = ?quote.status, "quote updated");
        self.log(
            ActivityKind::QuoteUpdated,
            format!("Quote {} updated", quote.quote_number),
            Some(id.to_string()),
        );
        Ok(quote)
    }

    /// Turn an open quote into a pending-payment order at the quoted prices.
    ///
    /// The order goes through the regular create path; the quote is then
    /// marked converted and linked to it. A second attempt fails with
    /// `Conflict` and creates nothing.
    pub fn convert_quote_to_order(&mut self, id: QuoteId) -> DomainResult<Order> {
        let mut quote = self
            .quotes
            .get(&id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("quote", id))?;
        let default_address = self
            .customers
            .get(&quote.customer_id)
            .and_then(|c| c.address.clone());

        let draft = order_draft_from_quote(&quote, default_address.as_deref())?;
        let order = self.add_order(draft)?;
        quote.mark_converted(order.id)?;
        self.quotes.upsert(quote.clone());

        info!(
            quote_id = %id,
            quote_number = %quote.quote_number,
            order_number = %order.order_number,
            "quote converted to order"
        );
        self.log(
            ActivityKind::QuoteConverted,
            format!(
                "Quote {} converted to order {}",
                quote.quote_number, order.order_number
            ),
            Some(id.to_string()),
        );
        Ok(order)
    }

    /// Expire every draft or sent quote whose expiry date is before `today`.
    pub fn expire_quotes(&mut self, today: NaiveDate) -> Vec<QuoteId> {
        let expired: Vec<Quote> = self
            .quotes
            .all()
            .iter()
            .filter(|q| q.is_past_expiry(today))
            .map(|q| Quote {
                status: QuoteStatus::Expired,
                ..q.clone()
            })
            .collect();
        if expired.is_empty() {
            return Vec::new();
        }

        let ids: Vec<QuoteId> = expired.iter().map(|q| q.id).collect();
        let numbers: Vec<String> = expired.iter().map(|q| q.quote_number.clone()).collect();
        self.quotes.upsert_many(expired);

        info!(count = ids.len(), %today, "quotes expired");
        for (id, number) in ids.iter().zip(numbers) {
            self.log(
                ActivityKind::QuoteExpired,
                format!("Quote {number} expired"),
                Some(id.to_string()),
            );
        }
        ids
    }

    pub fn detailed_lines_for_quote(&self, id: QuoteId) -> DomainResult<Vec<DetailedInvoiceLineItem>> {
        let quote = self
            .quotes
            .get(&id)
            .ok_or_else(|| DomainError::not_found("quote", id))?;
        Ok(calculate_detailed_line_items(
            quote,
            self.hampers.all(),
            self.products.all(),
        ))
    }
}
