use chrono::{DateTime, SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::Action;

/// An append-only audit log row: one field of one mutation.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct AuditLogEntry {
    pub id: i64,
    pub table_name: String,
    pub object_id: Option<i64>,
    pub field: String,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub action: Action,
    pub user_id: Option<i64>,
    /// Username of `user_id`, joined at read time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AuditLogEntry {
    /// One-line summary for listings, values cut to `preview_len` characters.
    ///
    /// `[2026-01-01T10:00:00Z] UPDATE products#3.price: 10.00 -> 12.50 by alice`
    #[must_use]
    pub fn describe(&self, preview_len: usize) -> String {
        let object = self
            .object_id
            .map_or_else(|| "?".to_string(), |id| id.to_string());
        let actor = match (&self.username, self.user_id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => format!("user {id}"),
            (None, None) => "unknown".to_string(),
        };
        format!(
            "[{}] {} {}#{}.{}: {} -> {} by {}",
            self.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.action,
            self.table_name,
            object,
            self.field,
            preview(self.old_value.as_deref(), preview_len),
            preview(self.new_value.as_deref(), preview_len),
            actor
        )
    }
}

fn preview(value: Option<&str>, max: usize) -> String {
    match value {
        None => "null".to_string(),
        Some(text) if text.chars().count() > max => {
            let cut: String = text.chars().take(max.saturating_sub(3)).collect();
            format!("{cut}...")
        }
        Some(text) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn entry() -> AuditLogEntry {
        AuditLogEntry {
            id: 1,
            table_name: "products".into(),
            object_id: Some(3),
            field: "price".into(),
            old_value: Some("10.00".into()),
            new_value: Some("12.50".into()),
            action: Action::Update,
            user_id: Some(1),
            username: Some("alice".into()),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap(),
        }
    }

    #[test]
    fn describe_update() {
        assert_eq!(
            entry().describe(40),
            "[2026-01-01T10:00:00Z] UPDATE products#3.price: 10.00 -> 12.50 by alice"
        );
    }

    #[test]
    fn describe_create_without_actor() {
        let mut e = entry();
        e.action = Action::Create;
        e.old_value = None;
        e.user_id = None;
        e.username = None;
        assert!(e.describe(40).ends_with("price: null -> 12.50 by unknown"));
    }

    #[test]
    fn describe_truncates_long_values() {
        let mut e = entry();
        e.field = "description".into();
        e.new_value = Some("x".repeat(50));
        let line = e.describe(10);
        assert!(line.contains("-> xxxxxxx... by"));
    }

    #[test]
    fn username_is_omitted_from_json_when_absent() {
        let mut e = entry();
        e.username = None;
        let json = serde_json::to_value(&e).unwrap();
        assert!(json.get("username").is_none());
        assert_eq!(json["action"], "UPDATE");
    }
}
