//! Invoicing domain module: invoices and output VAT allocation.
//!
//! Deterministic domain logic only (no IO, no storage).

pub mod invoice;
pub mod vat;

pub use invoice::{Invoice, InvoiceUpdate, PAYMENT_TERM_DAYS, PaymentStatus};
pub use vat::{
    AllocationBasis, DetailedInvoiceLineItem, RateBreakdown, VatSummary, allocate_line,
    calculate_detailed_line_items, summarize,
};
