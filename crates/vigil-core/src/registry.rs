//! Static declaration of auditable entity types.
//!
//! Every record type implements [`Auditable`], which declares its table name
//! and an ordered list of field descriptors at compile time. The
//! [`EntityRegistry`] decides which of those tables are monitored; it is built
//! once at startup and never mutated afterwards.

use std::collections::HashSet;

use crate::enums::FieldKind;
use crate::errors::CoreError;
use crate::value::FieldValue;

/// Table holding audit entries. Never monitored.
pub const AUDIT_LOG_TABLE: &str = "audit_log";

/// Name and semantic type of one declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDescriptor {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    #[must_use]
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// A record type with a stable primary key and a fixed set of named fields.
///
/// Field order in [`Auditable::fields`] is the order audit entries are emitted in.
/// Bookkeeping columns (timestamps maintained by storage) are not declared.
pub trait Auditable {
    /// Storage table name, also recorded as `audit_log.table_name`.
    const TABLE: &'static str;

    /// Declared fields, in emission order.
    fn fields() -> &'static [FieldDescriptor];

    /// Primary key, `None` until the record has been inserted.
    fn primary_key(&self) -> Option<i64>;

    /// Current in-memory value of a declared field.
    ///
    /// Returns `None` only for names the type does not declare.
    fn field_value(&self, field: &str) -> Option<FieldValue>;
}

#[derive(Debug, Clone, Copy)]
struct RegisteredEntity {
    table: &'static str,
    fields: &'static [FieldDescriptor],
}

/// The set of monitored tables and their field descriptors.
#[derive(Debug, Clone, Default)]
pub struct EntityRegistry {
    entries: Vec<RegisteredEntity>,
}

impl EntityRegistry {
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Whether mutations on `table` are audited.
    #[must_use]
    pub fn is_monitored(&self, table: &str) -> bool {
        self.entries.iter().any(|e| e.table == table)
    }

    /// Ordered field descriptors of a monitored table.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnregisteredEntity` if `table` is not monitored.
    pub fn fields_of(&self, table: &str) -> Result<&'static [FieldDescriptor], CoreError> {
        self.entries
            .iter()
            .find(|e| e.table == table)
            .map(|e| e.fields)
            .ok_or_else(|| CoreError::UnregisteredEntity {
                table: table.to_string(),
            })
    }

    /// Monitored tables in registration order.
    pub fn tables(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.table)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects monitored types; validation errors surface from [`RegistryBuilder::build`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    entries: Vec<RegisteredEntity>,
    error: Option<CoreError>,
}

impl RegistryBuilder {
    /// Monitor mutations of `E`. Registering the same table twice is a no-op.
    #[must_use]
    pub fn monitor<E: Auditable>(mut self) -> Self {
        if self.error.is_some() || self.entries.iter().any(|e| e.table == E::TABLE) {
            return self;
        }
        match validate(E::TABLE, E::fields()) {
            Ok(()) => self.entries.push(RegisteredEntity {
                table: E::TABLE,
                fields: E::fields(),
            }),
            Err(error) => self.error = Some(error),
        }
        self
    }

    /// Finish the registry.
    ///
    /// # Errors
    ///
    /// Returns the first validation error hit while registering: the audit log
    /// table itself, an entity with no fields, or duplicate field names.
    pub fn build(self) -> Result<EntityRegistry, CoreError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(EntityRegistry {
                entries: self.entries,
            }),
        }
    }
}

fn validate(table: &'static str, fields: &[FieldDescriptor]) -> Result<(), CoreError> {
    if table == AUDIT_LOG_TABLE {
        return Err(CoreError::SelfMonitoring(table.to_string()));
    }
    if fields.is_empty() {
        return Err(CoreError::Validation(format!(
            "entity type '{table}' declares no fields"
        )));
    }
    let mut seen = HashSet::new();
    for field in fields {
        if !seen.insert(field.name) {
            return Err(CoreError::Validation(format!(
                "entity type '{table}' declares field '{}' twice",
                field.name
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    struct Widget;

    impl Auditable for Widget {
        const TABLE: &'static str = "widgets";

        fn fields() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::new("label", FieldKind::Text),
                FieldDescriptor::new("weight", FieldKind::Decimal),
            ];
            FIELDS
        }

        fn primary_key(&self) -> Option<i64> {
            None
        }

        fn field_value(&self, _field: &str) -> Option<FieldValue> {
            None
        }
    }

    struct Doubled;

    impl Auditable for Doubled {
        const TABLE: &'static str = "doubled";

        fn fields() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::new("a", FieldKind::Text),
                FieldDescriptor::new("a", FieldKind::Integer),
            ];
            FIELDS
        }

        fn primary_key(&self) -> Option<i64> {
            None
        }

        fn field_value(&self, _field: &str) -> Option<FieldValue> {
            None
        }
    }

    struct SelfLog;

    impl Auditable for SelfLog {
        const TABLE: &'static str = AUDIT_LOG_TABLE;

        fn fields() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[FieldDescriptor::new("field", FieldKind::Text)];
            FIELDS
        }

        fn primary_key(&self) -> Option<i64> {
            None
        }

        fn field_value(&self, _field: &str) -> Option<FieldValue> {
            None
        }
    }

    #[test]
    fn registered_table_is_monitored() {
        let registry = EntityRegistry::builder().monitor::<Widget>().build().unwrap();
        assert!(registry.is_monitored("widgets"));
        assert!(!registry.is_monitored("gadgets"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn fields_keep_declaration_order() {
        let registry = EntityRegistry::builder().monitor::<Widget>().build().unwrap();
        let names: Vec<_> = registry
            .fields_of("widgets")
            .unwrap()
            .iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["label", "weight"]);
    }

    #[test]
    fn unknown_table_is_unregistered() {
        let registry = EntityRegistry::default();
        let err = registry.fields_of("widgets").unwrap_err();
        assert!(err.is_unregistered());
        assert!(registry.is_empty());
    }

    #[test]
    fn double_registration_is_idempotent() {
        let registry = EntityRegistry::builder()
            .monitor::<Widget>()
            .monitor::<Widget>()
            .build()
            .unwrap();
        assert_eq!(registry.tables().collect::<Vec<_>>(), vec!["widgets"]);
    }

    #[test]
    fn audit_log_cannot_be_monitored() {
        let err = EntityRegistry::builder()
            .monitor::<Widget>()
            .monitor::<SelfLog>()
            .build()
            .unwrap_err();
        assert!(matches!(err, CoreError::SelfMonitoring(t) if t == AUDIT_LOG_TABLE));
    }

    #[test]
    fn duplicate_field_names_rejected() {
        let err = EntityRegistry::builder().monitor::<Doubled>().build().unwrap_err();
        assert!(err.to_string().contains("declares field 'a' twice"));
    }
}
