//! Field-level comparison of two snapshots.
//!
//! | before | after | result                                   |
//! |--------|-------|------------------------------------------|
//! | none   | some  | CREATE for every field, old = null       |
//! | some   | some  | UPDATE for each field whose value differs |
//! | some   | none  | DELETE for every field, new = null       |
//! | none   | none  | nothing                                  |
//!
//! Records come out in snapshot order, which is the registry's declared order.

use crate::enums::Action;
use crate::snapshot::FieldSnapshot;
use crate::value::FieldValue;

/// One field-level change, ready to be written as an audit entry.
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeRecord {
    pub table: &'static str,
    pub object_id: Option<i64>,
    pub field: &'static str,
    pub old: FieldValue,
    pub new: FieldValue,
    pub action: Action,
}

impl ChangeRecord {
    #[must_use]
    pub fn old_text(&self) -> Option<String> {
        self.old.to_audit_text()
    }

    #[must_use]
    pub fn new_text(&self) -> Option<String> {
        self.new.to_audit_text()
    }
}

/// Compare `before` and `after` and return one record per changed field.
#[must_use]
pub fn diff(
    table: &'static str,
    object_id: Option<i64>,
    before: Option<&FieldSnapshot>,
    after: Option<&FieldSnapshot>,
) -> Vec<ChangeRecord> {
    let record = |field, old, new, action| ChangeRecord {
        table,
        object_id,
        field,
        old,
        new,
        action,
    };

    let records: Vec<ChangeRecord> = match (before, after) {
        (None, None) => Vec::new(),
        (None, Some(after)) => after
            .iter()
            .map(|(field, value)| record(field, FieldValue::Null, value.clone(), Action::Create))
            .collect(),
        (Some(before), None) => before
            .iter()
            .map(|(field, value)| record(field, value.clone(), FieldValue::Null, Action::Delete))
            .collect(),
        (Some(before), Some(after)) => {
            let mut changed = Vec::new();
            for (field, new) in after.iter() {
                let old = before.get(field).cloned().unwrap_or(FieldValue::Null);
                if old != *new {
                    changed.push(record(field, old, new.clone(), Action::Update));
                }
            }
            for (field, old) in before.iter() {
                if after.get(field).is_none() {
                    changed.push(record(field, old.clone(), FieldValue::Null, Action::Update));
                }
            }
            changed
        }
    };

    tracing::debug!(table, object_id = ?object_id, changes = records.len(), "diffed snapshots");
    records
}
