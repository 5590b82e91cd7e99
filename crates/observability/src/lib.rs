//! Shared tracing setup for hamperdesk binaries.

/// Tracing configuration (filters, output format).
pub mod tracing;

pub use crate::tracing::{LogFormat, LogSettings};

/// Initialize process-wide logging with the default settings (JSON, `info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(&LogSettings::default());
}

/// Initialize process-wide logging with explicit settings.
pub fn init_with(settings: &LogSettings) {
    tracing::init(settings);
}
