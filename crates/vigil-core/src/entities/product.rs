use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::FieldKind;
use crate::registry::{Auditable, FieldDescriptor};
use crate::value::{Decimal, FieldValue};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("name", FieldKind::Text),
    FieldDescriptor::new("description", FieldKind::Text),
    FieldDescriptor::new("price", FieldKind::Decimal),
    FieldDescriptor::new("manufactured_on", FieldKind::Date),
    FieldDescriptor::new("expires_on", FieldKind::Date),
    FieldDescriptor::new("category_id", FieldKind::Reference),
    FieldDescriptor::new("brand_id", FieldKind::Reference),
    FieldDescriptor::new("active", FieldKind::Boolean),
    FieldDescriptor::new("slug", FieldKind::Text),
];

/// A sellable product. Category and brand are captured by id only.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Product {
    pub id: Option<i64>,
    pub name: String,
    pub description: String,
    #[schemars(with = "String")]
    pub price: Decimal,
    pub manufactured_on: NaiveDate,
    pub expires_on: NaiveDate,
    pub category_id: i64,
    pub brand_id: i64,
    pub active: bool,
    pub slug: String,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            price: Decimal::zero(),
            manufactured_on: NaiveDate::default(),
            expires_on: NaiveDate::default(),
            category_id: 0,
            brand_id: 0,
            active: true,
            slug: String::new(),
        }
    }
}

impl Auditable for Product {
    const TABLE: &'static str = "products";

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
            "price" => self.price.into(),
            "manufactured_on" => self.manufactured_on.into(),
            "expires_on" => self.expires_on.into(),
            "category_id" => FieldValue::Reference(self.category_id),
            "brand_id" => FieldValue::Reference(self.brand_id),
            "active" => self.active.into(),
            "slug" => self.slug.as_str().into(),
            _ => return None,
        })
    }
}
