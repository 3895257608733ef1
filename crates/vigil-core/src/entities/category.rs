use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::FieldKind;
use crate::registry::{Auditable, FieldDescriptor};
use crate::value::FieldValue;

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("name", FieldKind::Text),
    FieldDescriptor::new("description", FieldKind::Text),
    FieldDescriptor::new("active", FieldKind::Boolean),
    FieldDescriptor::new("slug", FieldKind::Text),
];

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Category {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    pub active: bool,
    pub slug: String,
}

impl Category {
    #[must_use]
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            active: true,
            slug: slug.into(),
        }
    }
}

impl Auditable for Category {
    const TABLE: &'static str = "categories";

    fn fields() -> &'static [FieldDescriptor] {
        FIELDS
    }

    fn primary_key(&self) -> Option<i64> {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        Some(match field {
            "name" => self.name.as_str().into(),
            "description" => self.description.as_str().into(),
            "active" => self.active.into(),
            "slug" => self.slug.as_str().into(),
            _ => return None,
        })
    }
}
