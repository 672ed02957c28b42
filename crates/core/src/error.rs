//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// invariants, lookups). Infrastructure concerns belong elsewhere.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A required field was missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// A field carried a value outside its allowed set.
    #[error("invalid value for {field}: {message}")]
    InvalidField { field: &'static str, message: String },

    /// A quantity was not a non-negative integer.
    #[error("Invalid quantity value")]
    InvalidQuantity,

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested resource was not found (domain-level).
    #[error("not found")]
    NotFound,
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_field(field: &'static str, msg: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: msg.into(),
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// Whether this error stems from caller input (maps to a 400-class response).
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidField { .. } | Self::InvalidQuantity | Self::InvalidId(_)
        )
    }
}
