//! Repository modules for Vigil records and the audit log.
//!
//! Catalog tables share one shape: an integer `id`, one column per declared
//! field (same name), and storage-maintained `created_at`/`modified_at`. The
//! generic row functions here build their SQL from the [`Auditable`] field
//! list, so every statement works on a plain connection or inside a
//! transaction.

pub mod audit;
pub mod catalog;
pub mod user;

use chrono::NaiveDate;
use libsql::Connection;
use vigil_core::capture::snapshot_of;
use vigil_core::registry::Auditable;
use vigil_core::snapshot::FieldSnapshot;
use vigil_core::value::{Decimal, FieldValue};

use crate::error::DatabaseError;
use crate::helpers::{from_sql_value, to_sql_value};

/// A stored record type.
pub trait Record: Auditable + Clone + Send + Sync + Sized {
    /// Rebuild the record from its stored id and declared field values.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if a field is missing or has the wrong kind.
    fn from_fields(id: i64, fields: &StoredFields<'_>) -> Result<Self, DatabaseError>;

    /// Record the id assigned on insert.
    fn set_primary_key(&mut self, id: i64);
}

/// Declared field values read back from a row, with typed accessors.
pub struct StoredFields<'a> {
    table: &'static str,
    snapshot: &'a FieldSnapshot,
}

impl<'a> StoredFields<'a> {
    #[must_use]
    pub const fn new(table: &'static str, snapshot: &'a FieldSnapshot) -> Self {
        Self { table, snapshot }
    }

    fn value(&self, field: &str) -> Result<&FieldValue, DatabaseError> {
        self.snapshot.get(field).ok_or_else(|| {
            DatabaseError::InvalidState(format!("{}.{field} missing from row", self.table))
        })
    }

    fn wrong_kind(&self, field: &str, expected: &str) -> DatabaseError {
        DatabaseError::InvalidState(format!("{}.{field} is not {expected}", self.table))
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the field is absent or not text.
    pub fn text(&self, field: &str) -> Result<String, DatabaseError> {
        match self.value(field)? {
            FieldValue::Text(s) => Ok(s.clone()),
            _ => Err(self.wrong_kind(field, "text")),
        }
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the field is absent or neither null nor text.
    pub fn opt_text(&self, field: &str) -> Result<Option<String>, DatabaseError> {
        match self.value(field)? {
            FieldValue::Null => Ok(None),
            FieldValue::Text(s) => Ok(Some(s.clone())),
            _ => Err(self.wrong_kind(field, "nullable text")),
        }
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the field is absent or not a boolean.
    pub fn boolean(&self, field: &str) -> Result<bool, DatabaseError> {
        match self.value(field)? {
            FieldValue::Boolean(b) => Ok(*b),
            _ => Err(self.wrong_kind(field, "a boolean")),
        }
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the field is absent or not a decimal.
    pub fn decimal(&self, field: &str) -> Result<Decimal, DatabaseError> {
        match self.value(field)? {
            FieldValue::Decimal(d) => Ok(*d),
            _ => Err(self.wrong_kind(field, "a decimal")),
        }
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the field is absent or not a date.
    pub fn date(&self, field: &str) -> Result<NaiveDate, DatabaseError> {
        match self.value(field)? {
            FieldValue::Date(d) => Ok(*d),
            _ => Err(self.wrong_kind(field, "a date")),
        }
    }

    /// # Errors
    ///
    /// Returns `DatabaseError::InvalidState` if the field is absent or not a reference.
    pub fn reference(&self, field: &str) -> Result<i64, DatabaseError> {
        match self.value(field)? {
            FieldValue::Reference(id) | FieldValue::Integer(id) => Ok(*id),
            _ => Err(self.wrong_kind(field, "a reference")),
        }
    }
}

fn column_list<E: Auditable>() -> String {
    E::fields()
        .iter()
        .map(|f| f.name)
        .collect::<Vec<_>>()
        .join(", ")
}

fn row_to_record<E: Record>(row: &libsql::Row) -> Result<E, DatabaseError> {
    let id = row.get::<i64>(0)?;
    let mut pairs = Vec::with_capacity(E::fields().len());
    for (idx, field) in (1_i32..).zip(E::fields()) {
        let value = from_sql_value(field.kind, row.get_value(idx)?)?;
        pairs.push((field.name, value));
    }
    let snapshot = FieldSnapshot::from_pairs(pairs);
    E::from_fields(id, &StoredFields::new(E::TABLE, &snapshot))
}

/// Insert a record and return its new id.
///
/// # Errors
///
/// Returns `DatabaseError` if the entity cannot be read or the INSERT fails.
pub async fn insert_row<E: Record>(conn: &Connection, entity: &E) -> Result<i64, DatabaseError> {
    let snapshot = snapshot_of(entity)?;
    let placeholders = (1..=snapshot.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({placeholders})",
        E::TABLE,
        column_list::<E>()
    );
    let params: Vec<libsql::Value> = snapshot.iter().map(|(_, v)| to_sql_value(v)).collect();
    conn.execute(&sql, libsql::params_from_iter(params)).await?;
    Ok(conn.last_insert_rowid())
}

/// Overwrite every declared column of row `id` and bump `modified_at`.
///
/// # Errors
///
/// Returns `DatabaseError::NoResult` if no row has that id.
pub async fn update_row<E: Record>(
    conn: &Connection,
    id: i64,
    entity: &E,
) -> Result<(), DatabaseError> {
    let snapshot = snapshot_of(entity)?;
    let sets = snapshot
        .field_names()
        .enumerate()
        .map(|(i, name)| format!("{name} = ?{}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    let id_idx = snapshot.len() + 1;
    let sql = format!(
        "UPDATE {} SET {sets}, modified_at = datetime('now') WHERE id = ?{id_idx}",
        E::TABLE
    );
    let mut params: Vec<libsql::Value> = snapshot.iter().map(|(_, v)| to_sql_value(v)).collect();
    params.push(libsql::Value::Integer(id));

    let changed = conn.execute(&sql, libsql::params_from_iter(params)).await?;
    if changed == 0 {
        return Err(DatabaseError::NoResult);
    }
    Ok(())
}

/// Delete row `id` from `E`'s table.
///
/// # Errors
///
/// Returns `DatabaseError::NoResult` if no row has that id.
pub async fn delete_row<E: Record>(conn: &Connection, id: i64) -> Result<(), DatabaseError> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", E::TABLE);
    let changed = conn.execute(&sql, [id]).await?;
    if changed == 0 {
        return Err(DatabaseError::NoResult);
    }
    Ok(())
}

/// Load row `id`, or `None` if it does not exist.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails or the row cannot be decoded.
pub async fn load_row<E: Record>(conn: &Connection, id: i64) -> Result<Option<E>, DatabaseError> {
    let sql = format!(
        "SELECT id, {} FROM {} WHERE id = ?1",
        column_list::<E>(),
        E::TABLE
    );
    let mut rows = conn.query(&sql, [id]).await?;
    match rows.next().await? {
        Some(row) => Ok(Some(row_to_record(&row)?)),
        None => Ok(None),
    }
}

/// List records in id order.
///
/// # Errors
///
/// Returns `DatabaseError` if the query fails or a row cannot be decoded.
pub async fn list_rows<E: Record>(conn: &Connection, limit: u32) -> Result<Vec<E>, DatabaseError> {
    let sql = format!(
        "SELECT id, {} FROM {} ORDER BY id LIMIT ?1",
        column_list::<E>(),
        E::TABLE
    );
    let mut rows = conn.query(&sql, [i64::from(limit)]).await?;
    let mut records = Vec::new();
    while let Some(row) = rows.next().await? {
        records.push(row_to_record(&row)?);
    }
    Ok(records)
}
