//! Audit log repository: the read-only administrative surface.
//!
//! Rows are only ever inserted by the [`AuditWriter`](crate::writer::AuditWriter)
//! inside a mutation's transaction. Nothing here writes; update and delete are
//! additionally blocked by storage triggers.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_core::entities::AuditLogEntry;
use vigil_core::enums::Action;
use vigil_core::registry::AUDIT_LOG_TABLE;

use crate::error::{AuditError, DatabaseError};
use crate::helpers::{format_datetime, get_nullable_i64, get_nullable_string, parse_datetime, parse_enum};
use crate::service::VigilService;

/// Limit applied when a filter does not set one.
pub const DEFAULT_AUDIT_LIMIT: u32 = 100;

const SELECT_ENTRY: &str = "SELECT a.id, a.table_name, a.object_id, a.field, a.old_value, a.new_value,
        a.action, a.user_id, u.username, a.created_at
 FROM audit_log a LEFT JOIN users u ON u.id = a.user_id";

/// Filter criteria for audit queries. All set criteria must match.
#[derive(Debug, Default, Clone)]
pub struct AuditFilter {
    pub table: Option<String>,
    pub action: Option<Action>,
    pub user_id: Option<i64>,
    /// Acting username, exact match.
    pub username: Option<String>,
    pub object_id: Option<i64>,
    pub field: Option<String>,
    /// Inclusive lower bound on `created_at`.
    pub since: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`.
    pub until: Option<DateTime<Utc>>,
    pub limit: Option<u32>,
}

fn row_to_entry(row: &libsql::Row) -> Result<AuditLogEntry, DatabaseError> {
    Ok(AuditLogEntry {
        id: row.get::<i64>(0)?,
        table_name: row.get::<String>(1)?,
        object_id: get_nullable_i64(row, 2)?,
        field: row.get::<String>(3)?,
        old_value: get_nullable_string(row, 4)?,
        new_value: get_nullable_string(row, 5)?,
        action: parse_enum(&row.get::<String>(6)?)?,
        user_id: get_nullable_i64(row, 7)?,
        username: get_nullable_string(row, 8)?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

async fn collect_entries(mut rows: libsql::Rows) -> Result<Vec<AuditLogEntry>, DatabaseError> {
    let mut entries = Vec::new();
    while let Some(row) = rows.next().await? {
        entries.push(row_to_entry(&row)?);
    }
    Ok(entries)
}

/// Escape `LIKE` wildcards so user input matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .to_lowercase()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

impl VigilService {
    /// Query audit entries, newest first. Ties on timestamp fall back to row id.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_audit(
        &self,
        filter: &AuditFilter,
    ) -> Result<Vec<AuditLogEntry>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        if let Some(ref table) = filter.table {
            params.push(libsql::Value::Text(table.clone()));
            conditions.push(format!("a.table_name = ?{}", params.len()));
        }
        if let Some(action) = filter.action {
            params.push(libsql::Value::Text(action.as_str().to_string()));
            conditions.push(format!("a.action = ?{}", params.len()));
        }
        if let Some(user_id) = filter.user_id {
            params.push(libsql::Value::Integer(user_id));
            conditions.push(format!("a.user_id = ?{}", params.len()));
        }
        if let Some(ref username) = filter.username {
            params.push(libsql::Value::Text(username.clone()));
            conditions.push(format!("u.username = ?{}", params.len()));
        }
        if let Some(object_id) = filter.object_id {
            params.push(libsql::Value::Integer(object_id));
            conditions.push(format!("a.object_id = ?{}", params.len()));
        }
        if let Some(ref field) = filter.field {
            params.push(libsql::Value::Text(field.clone()));
            conditions.push(format!("a.field = ?{}", params.len()));
        }
        if let Some(since) = filter.since {
            params.push(libsql::Value::Text(format_datetime(&since)));
            conditions.push(format!("a.created_at >= ?{}", params.len()));
        }
        if let Some(until) = filter.until {
            params.push(libsql::Value::Text(format_datetime(&until)));
            conditions.push(format!("a.created_at < ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let limit = filter.limit.unwrap_or(DEFAULT_AUDIT_LIMIT);
        let sql = format!(
            "{SELECT_ENTRY} {where_clause} ORDER BY a.created_at DESC, a.id DESC LIMIT {limit}"
        );

        let conn = self.db().conn().await;
        let rows = conn.query(&sql, libsql::params_from_iter(params)).await?;
        collect_entries(rows).await
    }

    /// Case-insensitive substring search over table name, object id, field,
    /// action and acting username. Newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn search_audit(
        &self,
        query: &str,
        limit: u32,
    ) -> Result<Vec<AuditLogEntry>, DatabaseError> {
        let sql = format!(
            "{SELECT_ENTRY}
             WHERE lower(a.table_name) LIKE ?1 ESCAPE '\\'
                OR CAST(a.object_id AS TEXT) LIKE ?1 ESCAPE '\\'
                OR lower(a.field) LIKE ?1 ESCAPE '\\'
                OR lower(a.action) LIKE ?1 ESCAPE '\\'
                OR lower(u.username) LIKE ?1 ESCAPE '\\'
             ORDER BY a.created_at DESC, a.id DESC LIMIT ?2"
        );
        let conn = self.db().conn().await;
        let rows = conn
            .query(&sql, libsql::params![like_pattern(query), i64::from(limit)])
            .await?;
        collect_entries(rows).await
    }

    /// Full history of one object, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn object_history(
        &self,
        table: &str,
        object_id: i64,
    ) -> Result<Vec<AuditLogEntry>, DatabaseError> {
        let sql = format!(
            "{SELECT_ENTRY} WHERE a.table_name = ?1 AND a.object_id = ?2
             ORDER BY a.created_at ASC, a.id ASC"
        );
        let conn = self.db().conn().await;
        let rows = conn.query(&sql, libsql::params![table, object_id]).await?;
        collect_entries(rows).await
    }

    /// Fetch one entry by id.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::NotFound` if no entry has that id.
    pub async fn get_audit_entry(&self, id: i64) -> Result<AuditLogEntry, AuditError> {
        let sql = format!("{SELECT_ENTRY} WHERE a.id = ?1");
        let conn = self.db().conn().await;
        let mut rows = conn.query(&sql, [id]).await?;
        let row = rows.next().await?.ok_or_else(|| AuditError::NotFound {
            table: AUDIT_LOG_TABLE.to_string(),
            id,
        })?;
        Ok(row_to_entry(&row)?)
    }
}

/// Operations an administrator might attempt on the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    View,
    Add,
    Change,
    Delete,
}

impl AdminAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Add => "add",
            Self::Change => "change",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Administrative view of the audit log. Listing, searching, and viewing are
/// allowed; everything else is refused.
#[derive(Clone, Copy)]
pub struct AuditLogAdmin<'a> {
    service: &'a VigilService,
}

impl<'a> AuditLogAdmin<'a> {
    #[must_use]
    pub const fn new(service: &'a VigilService) -> Self {
        Self { service }
    }

    /// Check whether `action` is permitted on the audit log.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::ReadOnly` for anything but `View`.
    pub fn authorize(action: AdminAction) -> Result<(), AuditError> {
        match action {
            AdminAction::View => Ok(()),
            AdminAction::Add | AdminAction::Change | AdminAction::Delete => {
                Err(AuditError::ReadOnly { action })
            }
        }
    }

    /// # Errors
    ///
    /// Returns `AuditError::Storage` if the query fails.
    pub async fn list(&self, filter: &AuditFilter) -> Result<Vec<AuditLogEntry>, AuditError> {
        Self::authorize(AdminAction::View)?;
        Ok(self.service.query_audit(filter).await?)
    }

    /// # Errors
    ///
    /// Returns `AuditError::Storage` if the query fails.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<AuditLogEntry>, AuditError> {
        Self::authorize(AdminAction::View)?;
        Ok(self.service.search_audit(query, limit).await?)
    }

    /// # Errors
    ///
    /// Returns `AuditError::NotFound` if no entry has that id.
    pub async fn view(&self, id: i64) -> Result<AuditLogEntry, AuditError> {
        Self::authorize(AdminAction::View)?;
        self.service.get_audit_entry(id).await
    }

    /// # Errors
    ///
    /// Returns `AuditError::Storage` if the query fails.
    pub async fn history(
        &self,
        table: &str,
        object_id: i64,
    ) -> Result<Vec<AuditLogEntry>, AuditError> {
        Self::authorize(AdminAction::View)?;
        Ok(self.service.object_history(table, object_id).await?)
    }
}
