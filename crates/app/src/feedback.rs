//! User-facing feedback: turning outcomes into short messages with a severity.

use hamperdesk_core::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Message plus a stable machine code, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub severity: Severity,
    pub code: &'static str,
    pub message: String,
}

impl Feedback {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            code: "ok",
            message: message.into(),
        }
    }
}

impl From<&DomainError> for Feedback {
    fn from(err: &DomainError) -> Self {
        let (severity, code, message) = match err {
            DomainError::Validation(msg) => {
                (Severity::Warning, "validation_error", format!("Please check the form: {msg}"))
            }
            DomainError::ReferentialIntegrity {
                entity,
                referenced_by,
                ..
            } => (
                Severity::Warning,
                "in_use",
                format!("This {entity} cannot be deleted because {referenced_by} uses it."),
            ),
            DomainError::InsufficientStock {
                product_name,
                available,
                required,
                ..
            } => (
                Severity::Error,
                "insufficient_stock",
                format!(
                    "Not enough stock of {product_name}: {available} available, {required} needed."
                ),
            ),
            DomainError::NotFound { entity, .. } => (
                Severity::Error,
                "not_found",
                format!("The {entity} no longer exists."),
            ),
            DomainError::Conflict(msg) => (Severity::Warning, "conflict", capitalize(msg)),
            DomainError::InvalidId(msg) => {
                (Severity::Error, "invalid_id", format!("Invalid identifier: {msg}"))
            }
        };
        Self {
            severity,
            code,
            message,
        }
    }
}

fn capitalize(msg: &str) -> String {
    let mut chars = msg.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Where feedback is shown. A desktop shell would toast; the CLI logs.
pub trait Notifier {
    fn notify(&self, message: &str, severity: Severity);

    fn feedback(&self, feedback: &Feedback) {
        self.notify(&feedback.message, feedback.severity);
    }
}

/// Notifier that writes through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        match severity {
            Severity::Info => tracing::info!(notification = message),
            Severity::Warning => tracing::warn!(notification = message),
            Severity::Error => tracing::error!(notification = message),
        }
    }
}
