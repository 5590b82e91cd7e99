//! `hamperdesk-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, money, VAT rates, the error taxonomy and the entity trait used
//! by repositories.

pub mod clock;
pub mod entity;
pub mod error;
pub mod id;
pub mod money;
pub mod vat;

pub use clock::{Clock, FixedClock, SystemClock};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{
    ActivityId, CustomerId, HamperId, InvoiceId, OrderId, ProductId, QuoteId, SupplierId,
};
pub use money::{MAX_QUANTITY, Money};
pub use vat::{FALLBACK_VAT_RATE, VAT_RATES, VatRate};
