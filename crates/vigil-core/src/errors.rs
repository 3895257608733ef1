//! Cross-cutting error types for Vigil.
//!
//! Storage errors (`DatabaseError`, `AuditError`) live in `vigil-db`. A unified
//! error is deferred to `vigil-cli`, which works in `anyhow`.

use thiserror::Error;

/// Errors raised by capture, diffing, and value parsing.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Capture or diff was invoked on a table the registry does not monitor.
    ///
    /// This is a caller contract violation, not a runtime condition to recover from.
    #[error("Entity type '{table}' is not registered for auditing")]
    UnregisteredEntity { table: String },

    /// An entity declared a field it cannot produce a value for.
    #[error("Entity type '{table}' has no value for declared field '{field}'")]
    UnknownField { table: String, field: String },

    /// The audit log table was offered to the registry.
    #[error("Table '{0}' cannot be monitored (it would audit its own writes)")]
    SelfMonitoring(String),

    /// A textual value could not be parsed into its field kind.
    #[error("Invalid {kind} value '{value}'")]
    InvalidValue { kind: &'static str, value: String },

    /// Data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CoreError {
    #[must_use]
    pub const fn is_unregistered(&self) -> bool {
        matches!(self, Self::UnregisteredEntity { .. })
    }
}
