use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::FieldKind;
use crate::registry::{Auditable, FieldDescriptor};
use crate::value::{Decimal, FieldValue};

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("code", FieldKind::Text),
    FieldDescriptor::new("discount", FieldKind::Decimal),
    FieldDescriptor::new("active", FieldKind::Boolean),
];

/// A discount code.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Coupon {
    pub id: Option<i64>,
    pub code: String,
    #[schemars(with = "String")]
    pub discount: Decimal,
    pub active: bool,
}

impl Coupon {
    #[must_use]
    pub fn new(code: impl Into<String>, discount: Decimal) -> Self {
        Self {
            id: None,
            code: code.into(),
            discount,
            active: true,
        }
    }
}

impl Auditable for Coupon {
    const TABLE: &'static str = "coupons";

    fn fields() -> &'static [FieldDescriptor] {
        FIELDS
    }

    fn primary_key(&self) -> Option<i64> {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        Some(match field {
            "code" => self.code.as_str().into(),
            "discount" => self.discount.into(),
            "active" => self.active.into(),
            _ => return None,
        })
    }
}
