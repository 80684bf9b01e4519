//! Error types for FleetGrid core values.

use thiserror::Error;

/// Result type alias for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while constructing or parsing core values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid quantity: {0:?}")]
    InvalidQuantity(String),

    #[error("invalid requirement for key {key:?}: {reason}")]
    InvalidRequirement { key: String, reason: String },

    #[error("invalid requirement expression: {0:?}")]
    InvalidExpression(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
