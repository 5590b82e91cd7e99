//! Activity log: a short, capped audit trail of what changed.

pub mod log;

pub use log::{ACTIVITY_LOG_CAP, ActivityKind, ActivityLogEntry, record};
