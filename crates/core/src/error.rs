//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// referential integrity, stock, terminal states). Persistence failures belong
/// to the infra layer and are never surfaced through this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed validation before anything was mutated.
    #[error("validation failed: {0}")]
    Validation(String),

    /// A delete was blocked because the entity is still referenced.
    #[error("{entity} {id} is still referenced by {referenced_by}")]
    ReferentialIntegrity {
        entity: &'static str,
        id: String,
        referenced_by: String,
    },

    /// Projected stock would go negative; the whole batch was discarded.
    #[error("insufficient stock for {product_name}: available {available}, required {required}")]
    InsufficientStock {
        product_id: String,
        product_name: String,
        available: i64,
        required: i64,
    },

    /// The target of an operation does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The operation conflicts with a terminal or otherwise final state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn referenced(
        entity: &'static str,
        id: impl ToString,
        referenced_by: impl Into<String>,
    ) -> Self {
        Self::ReferentialIntegrity {
            entity,
            id: id.to_string(),
            referenced_by: referenced_by.into(),
        }
    }
}
