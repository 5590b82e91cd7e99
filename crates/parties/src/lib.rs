//! Parties domain module: customers and suppliers.
//!
//! Simple reference entities. Deletion rules (referential integrity) are
//! enforced by the engine, which can see the referencing collections.

pub mod customer;
pub mod supplier;

pub use customer::{Customer, CustomerDraft};
pub use supplier::{Supplier, SupplierDraft};
