use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::FieldKind;
use crate::registry::{Auditable, FieldDescriptor};
use crate::value::FieldValue;

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("name", FieldKind::Text),
    FieldDescriptor::new("email", FieldKind::Text),
    FieldDescriptor::new("tax_id", FieldKind::Text),
    FieldDescriptor::new("active", FieldKind::Boolean),
];

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Customer {
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    /// Nullable; an empty string is a distinct value.
    pub tax_id: Option<String>,
    pub active: bool,
}

impl Customer {
    #[must_use]
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            tax_id: None,
            active: true,
        }
    }
}

impl Auditable for Customer {
    const TABLE: &'static str = "customers";

    fn fields() -> &'static [FieldDescriptor] {
        FIELDS
    }

    fn primary_key(&self) -> Option<i64> {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        Some(match field {
            "name" => self.name.as_str().into(),
            "email" => self.email.as_str().into(),
            "tax_id" => self.tax_id.as_deref().into(),
            "active" => self.active.into(),
            _ => return None,
        })
    }
}
