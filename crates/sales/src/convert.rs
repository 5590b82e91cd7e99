use hamperdesk_core::DomainResult;

use crate::line::LineItemInput;
use crate::order::{OrderDraft, OrderStatus, PaymentMethod};
use crate::quote::Quote;

/// Build the order draft a quote turns into.
///
/// Items keep the quoted prices. The shipping address falls back to the
/// customer's default when the quote has none, and the notes record the
/// source quote number. The draft still goes through the regular order
/// create path, so totals and numbering are assigned there.
pub fn order_draft_from_quote(
    quote: &Quote,
    customer_default_address: Option<&str>,
) -> DomainResult<OrderDraft> {
    quote.ensure_convertible()?;

    let items = quote
        .items
        .iter()
        .map(|i| LineItemInput::priced(i.hamper_id, i.quantity, i.unit_price))
        .collect();

    let shipping_address = quote
        .shipping_address
        .clone()
        .or_else(|| customer_default_address.map(str::to_string));

    let origin = format!("Generated from quote {}", quote.quote_number);
    let notes = match quote.notes.as_deref().map(str::trim) {
        Some(n) if !n.is_empty() => format!("{origin}\n{n}"),
        _ => origin,
    };

    Ok(OrderDraft {
        customer_id: quote.customer_id,
        items,
        order_date: None,
        status: OrderStatus::PendingPayment,
        shipping_address,
        payment_method: PaymentMethod::default(),
        notes: Some(notes),
    })
}
