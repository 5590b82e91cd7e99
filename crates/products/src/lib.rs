//! Products domain module: catalog products, hampers (bundles) and the hamper
//! cost engine.
//!
//! Pure, deterministic domain logic (no IO, no storage).

pub mod catalog;
pub mod cost;
pub mod hamper;
pub mod product;

pub use catalog::{HamperCatalog, ProductCatalog};
pub use cost::{HamperDetails, compute_details};
pub use hamper::{Hamper, HamperComponent, HamperDraft};
pub use product::{Product, ProductDraft};
