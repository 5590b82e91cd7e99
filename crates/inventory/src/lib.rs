//! Inventory domain module: order-driven stock reconciliation.
//!
//! Deterministic domain logic only. The ledger plans stock movements for an
//! order create or edit; committing the plan to the product store is the
//! caller's job.

pub mod ledger;

pub use ledger::{StockCommit, StockPlan, plan_create, plan_update, requirements};
