//! Snapshot capture.
//!
//! Reads the in-memory values of an entity's declared fields. Capture never
//! touches storage and never follows references: a foreign key is captured as
//! its raw id.

use crate::errors::CoreError;
use crate::registry::{Auditable, EntityRegistry, FieldDescriptor};
use crate::snapshot::FieldSnapshot;

/// Capture a monitored entity, using the registry's field list.
///
/// # Errors
///
/// Returns `CoreError::UnregisteredEntity` if `E` is not monitored, or
/// `CoreError::UnknownField` if the entity cannot produce a declared field.
pub fn capture<E: Auditable>(
    registry: &EntityRegistry,
    entity: &E,
) -> Result<FieldSnapshot, CoreError> {
    let fields = registry.fields_of(E::TABLE)?;
    let snapshot = read_fields(entity, fields)?;
    tracing::debug!(
        table = E::TABLE,
        object_id = ?entity.primary_key(),
        fields = snapshot.len(),
        "captured snapshot"
    );
    Ok(snapshot)
}

/// Read every field the type declares, whether or not it is monitored.
///
/// Storage uses this to build column values.
///
/// # Errors
///
/// Returns `CoreError::UnknownField` if the entity cannot produce a declared field.
pub fn snapshot_of<E: Auditable>(entity: &E) -> Result<FieldSnapshot, CoreError> {
    read_fields(entity, E::fields())
}

fn read_fields<E: Auditable>(
    entity: &E,
    fields: &'static [FieldDescriptor],
) -> Result<FieldSnapshot, CoreError> {
    let mut pairs = Vec::with_capacity(fields.len());
    for field in fields {
        let value = entity
            .field_value(field.name)
            .ok_or_else(|| CoreError::UnknownField {
                table: E::TABLE.to_string(),
                field: field.name.to_string(),
            })?;
        pairs.push((field.name, value));
    }
    Ok(FieldSnapshot::from_pairs(pairs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Product, User, catalog_registry};
    use crate::enums::FieldKind;
    use crate::value::{Decimal, FieldValue};
    use pretty_assertions::assert_eq;

    struct Broken;

    impl Auditable for Broken {
        const TABLE: &'static str = "broken";

        fn fields() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[FieldDescriptor::new("ghost", FieldKind::Text)];
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
    fn captures_declared_fields_in_order() {
        let registry = catalog_registry().unwrap();
        let product = Product {
            id: Some(4),
            name: "Shampoo".into(),
            price: Decimal::new(10, 0),
            category_id: 2,
            brand_id: 3,
            ..Product::default()
        };

        let snap = capture(&registry, &product).unwrap();
        let names: Vec<_> = snap.field_names().collect();
        let declared: Vec<_> = Product::fields().iter().map(|f| f.name).collect();
        assert_eq!(names, declared);
        assert_eq!(snap.get("price"), Some(&FieldValue::Decimal(Decimal::new(10, 0))));
        assert_eq!(snap.get("category_id"), Some(&FieldValue::Reference(2)));
    }

    #[test]
    fn unregistered_type_fails_fast() {
        let registry = catalog_registry().unwrap();
        let user = User::new("alice");
        let err = capture(&registry, &user).unwrap_err();
        assert!(err.is_unregistered());
    }

    #[test]
    fn snapshot_of_ignores_registry() {
        let user = User::new("alice");
        let snap = snapshot_of(&user).unwrap();
        assert_eq!(snap.get("username"), Some(&FieldValue::from("alice")));
    }

    #[test]
    fn missing_field_value_is_reported() {
        let err = snapshot_of(&Broken).unwrap_err();
        assert!(matches!(err, CoreError::UnknownField { ref field, .. } if field == "ghost"));
    }
}
