//! Audit writer: persists change records as audit log rows.
//!
//! The writer never opens its own transaction. It is handed the connection of
//! the mutation's transaction, so a failed insert here rolls back the domain
//! write too.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use libsql::Connection;
use vigil_core::actor::ActorRef;
use vigil_core::diff::ChangeRecord;
use vigil_core::entities::AuditLogEntry;

use crate::error::DatabaseError;
use crate::helpers::format_datetime;

/// Stamps and inserts audit entries.
///
/// Timestamps are strictly increasing per writer (one microsecond apart when
/// the clock has not moved), so entries replay in insertion order.
#[derive(Debug, Default)]
pub struct AuditWriter {
    last_micros: AtomicI64,
}

impl AuditWriter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            last_micros: AtomicI64::new(0),
        }
    }

    /// Next write-time timestamp.
    pub fn next_timestamp(&self) -> DateTime<Utc> {
        let now = Utc::now().timestamp_micros();
        let mut last = self.last_micros.load(Ordering::Relaxed);
        loop {
            let next = now.max(last + 1);
            match self.last_micros.compare_exchange_weak(
                last,
                next,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    return DateTime::from_timestamp_micros(next).unwrap_or_else(Utc::now);
                }
                Err(current) => last = current,
            }
        }
    }

    /// Insert one row per change record, attributed to `actor`.
    ///
    /// Returns the stored entries in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` on the first failed insert. Rows already
    /// inserted stay in the caller's transaction, which must be rolled back.
    pub async fn write(
        &self,
        conn: &Connection,
        records: &[ChangeRecord],
        actor: Option<&ActorRef>,
    ) -> Result<Vec<AuditLogEntry>, DatabaseError> {
        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let created_at = self.next_timestamp();
            let old_value = record.old_text();
            let new_value = record.new_text();
            conn.execute(
                "INSERT INTO audit_log (table_name, object_id, field, old_value, new_value, action, user_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                libsql::params![
                    record.table,
                    record.object_id,
                    record.field,
                    old_value.as_deref(),
                    new_value.as_deref(),
                    record.action.as_str(),
                    actor.map(|a| a.user_id),
                    format_datetime(&created_at)
                ],
            )
            .await?;

            entries.push(AuditLogEntry {
                id: conn.last_insert_rowid(),
                table_name: record.table.to_string(),
                object_id: record.object_id,
                field: record.field.to_string(),
                old_value,
                new_value,
                action: record.action,
                user_id: actor.map(|a| a.user_id),
                username: actor.map(|a| a.username.clone()),
                created_at,
            });
        }
        Ok(entries)
    }
}
