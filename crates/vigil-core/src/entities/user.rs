use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::actor::ActorRef;
use crate::enums::FieldKind;
use crate::registry::{Auditable, FieldDescriptor};
use crate::value::FieldValue;

const FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("username", FieldKind::Text),
    FieldDescriptor::new("is_staff", FieldKind::Boolean),
    FieldDescriptor::new("is_superuser", FieldKind::Boolean),
    FieldDescriptor::new("is_active", FieldKind::Boolean),
];

/// An account that can be credited with mutations. Users are not audited.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct User {
    pub id: Option<i64>,
    pub username: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub is_active: bool,
}

impl User {
    #[must_use]
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: None,
            username: username.into(),
            is_staff: false,
            is_superuser: false,
            is_active: true,
        }
    }

    /// Actor reference for a stored user.
    #[must_use]
    pub fn actor_ref(&self) -> Option<ActorRef> {
        self.id.map(|id| ActorRef::new(id, self.username.clone()))
    }
}

impl Auditable for User {
    const TABLE: &'static str = "users";

    fn fields() -> &'static [FieldDescriptor] {
        FIELDS
    }

    fn primary_key(&self) -> Option<i64> {
        self.id
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        Some(match field {
            "username" => self.username.as_str().into(),
            "is_staff" => self.is_staff.into(),
            "is_superuser" => self.is_superuser.into(),
            "is_active" => self.is_active.into(),
            _ => return None,
        })
    }
}
