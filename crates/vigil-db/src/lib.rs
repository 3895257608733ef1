//! # vigil-db
//!
//! libSQL storage for Vigil: the catalog tables, the append-only audit log,
//! and the machinery that audits every catalog mutation in the same
//! transaction as the mutation itself.
//!
//! Uses the `libsql` crate (C `SQLite` fork, v0.9.29), local files only.

pub mod error;
pub mod helpers;
pub mod interceptor;
mod migrations;
pub mod repos;
pub mod service;
pub mod writer;

#[cfg(test)]
mod test_support;

use std::time::Duration;

use error::DatabaseError;
use libsql::Builder;
use tokio::sync::{Mutex, MutexGuard};

/// Default wait on a locked database file.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Central database handle.
///
/// Holds a single connection behind an async mutex: every mutation takes the
/// lock for the whole of its transaction, so mutations through one handle are
/// serialised. Separate handles on the same file are serialised by `SQLite`'s
/// write lock instead.
pub struct VigilDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: Mutex<libsql::Connection>,
}

impl VigilDb {
    /// Open a local database at the given path, or `":memory:"`.
    ///
    /// Runs migrations automatically on open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open_with_timeout(path, DEFAULT_BUSY_TIMEOUT).await
    }

    /// Open a local database with an explicit busy timeout.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened, a PRAGMA
    /// fails, or migrations fail.
    pub async fn open_with_timeout(path: &str, busy_timeout: Duration) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Foreign keys are per-connection in SQLite.
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        // busy_timeout echoes the new value as a row, so it goes through query().
        let millis = busy_timeout.as_millis();
        let mut rows = conn
            .query(&format!("PRAGMA busy_timeout = {millis}"), ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA busy_timeout: {e}")))?;
        rows.next().await?;
        drop(rows);

        let vigil_db = Self {
            db,
            conn: Mutex::new(conn),
        };
        vigil_db.run_migrations().await?;
        tracing::debug!(path, "opened database");
        Ok(vigil_db)
    }

    /// Lock the connection for direct queries.
    ///
    /// Hold the guard only as long as needed: mutations wait on it.
    pub async fn conn(&self) -> MutexGuard<'_, libsql::Connection> {
        self.conn.lock().await
    }
}
