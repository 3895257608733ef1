//! Database and audit error types for vigil-db.

use thiserror::Error;
use vigil_core::enums::MutationPhase;
use vigil_core::errors::CoreError;

use crate::repos::audit::AdminAction;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., bad data in DB).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// An entity could not produce its declared fields.
    #[error(transparent)]
    Entity(#[from] CoreError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors surfaced by audited mutations and the audit read surface.
#[derive(Debug, Error)]
pub enum AuditError {
    /// Capture or diff was requested for a table that is not monitored.
    #[error("Entity type '{table}' is not registered for auditing")]
    Unregistered { table: String },

    /// Persisting an audit entry failed. The domain change was rolled back.
    #[error("Audit write failed, mutation rolled back: {0}")]
    Write(#[source] DatabaseError),

    /// The domain write or a read failed.
    #[error(transparent)]
    Storage(#[from] DatabaseError),

    #[error("{table} #{id} not found")]
    NotFound { table: String, id: i64 },

    /// Add, change, or delete was attempted on the audit log.
    #[error("The audit log is read-only: '{action}' is not permitted")]
    ReadOnly { action: AdminAction },

    /// Lifecycle hooks fired out of order.
    #[error("Mutation hook out of order: {from} -> {to}")]
    InvalidPhase {
        from: MutationPhase,
        to: MutationPhase,
    },

    #[error(transparent)]
    Core(CoreError),
}

impl AuditError {
    /// Whether the failure came from writing audit entries.
    #[must_use]
    pub const fn is_write_failure(&self) -> bool {
        matches!(self, Self::Write(_))
    }
}

impl From<CoreError> for AuditError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::UnregisteredEntity { table } => Self::Unregistered { table },
            other => Self::Core(other),
        }
    }
}

impl From<libsql::Error> for AuditError {
    fn from(error: libsql::Error) -> Self {
        Self::Storage(DatabaseError::LibSql(error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unregistered_core_error_maps_to_unregistered() {
        let err: AuditError = CoreError::UnregisteredEntity {
            table: "users".into(),
        }
        .into();
        assert!(matches!(err, AuditError::Unregistered { ref table } if table == "users"));
    }

    #[test]
    fn other_core_errors_stay_core() {
        let err: AuditError = CoreError::Validation("bad".into()).into();
        assert!(matches!(err, AuditError::Core(_)));
        assert!(!err.is_write_failure());
    }

    #[test]
    fn read_only_message_names_action() {
        let err = AuditError::ReadOnly {
            action: AdminAction::Delete,
        };
        assert_eq!(
            err.to_string(),
            "The audit log is read-only: 'delete' is not permitted"
        );
    }
}
