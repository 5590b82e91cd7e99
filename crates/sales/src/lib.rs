//! Sales domain module: orders, quotes and their line items.
//!
//! Pure domain rules (status lifecycles, line validation, quote conversion).
//! Stock reconciliation lives in `hamperdesk-inventory`; VAT totals come from
//! `hamperdesk-invoicing`.

pub mod convert;
pub mod line;
pub mod order;
pub mod quote;

pub use convert::order_draft_from_quote;
pub use line::{LineItem, LineItemInput, OrderLike, resolve_lines};
pub use order::{Order, OrderDraft, OrderStatus, PaymentMethod};
pub use quote::{QUOTE_VALIDITY_DAYS, Quote, QuoteDraft, QuoteStatus};
