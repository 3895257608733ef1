//! Point-in-time field values of one entity.

use crate::value::FieldValue;

/// Ordered mapping of field name to value. Built on demand, never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldSnapshot {
    fields: Vec<(&'static str, FieldValue)>,
}

impl FieldSnapshot {
    #[must_use]
    pub const fn from_pairs(fields: Vec<(&'static str, FieldValue)>) -> Self {
        Self { fields }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    pub fn field_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_by_name() {
        let snap = FieldSnapshot::from_pairs(vec![
            ("name", FieldValue::from("Shampoo")),
            ("active", FieldValue::from(true)),
        ]);
        assert_eq!(snap.get("active"), Some(&FieldValue::Boolean(true)));
        assert!(snap.get("missing").is_none());
        assert_eq!(snap.len(), 2);
        assert_eq!(snap.field_names().collect::<Vec<_>>(), vec!["name", "active"]);
    }

    #[test]
    fn equality_uses_logical_values() {
        let a = FieldSnapshot::from_pairs(vec![("qty", FieldValue::Integer(2))]);
        let b = FieldSnapshot::from_pairs(vec![("qty", FieldValue::Reference(2))]);
        assert_eq!(a, b);
    }
}
