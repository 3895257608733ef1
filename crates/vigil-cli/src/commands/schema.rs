use schemars::schema_for;
use vigil_core::actor::ActorRef;
use vigil_core::entities::{AuditLogEntry, Brand, Category, Coupon, Customer, Product, User};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Type names accepted by `vigil schema`.
pub const SCHEMA_NAMES: &[&str] = &[
    "actor-ref",
    "audit-log-entry",
    "brand",
    "category",
    "coupon",
    "customer",
    "product",
    "user",
];

/// JSON Schema for a named type, or `None` if the name is unknown.
pub fn schema_json(type_name: &str) -> anyhow::Result<Option<serde_json::Value>> {
    let schema = match type_name.replace('_', "-").as_str() {
        "actor-ref" => schema_for!(ActorRef),
        "audit-log-entry" => schema_for!(AuditLogEntry),
        "brand" => schema_for!(Brand),
        "category" => schema_for!(Category),
        "coupon" => schema_for!(Coupon),
        "customer" => schema_for!(Customer),
        "product" => schema_for!(Product),
        "user" => schema_for!(User),
        _ => return Ok(None),
    };
    Ok(Some(serde_json::to_value(schema)?))
}

/// Handle `vigil schema`.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let Some(schema) = schema_json(&args.type_name)? else {
        anyhow::bail!(
            "unknown type '{}' (expected one of: {})",
            args.type_name,
            SCHEMA_NAMES.join(", ")
        );
    };
    output(&schema, flags.format)
}

#[cfg(test)]
mod tests {
    use super::{SCHEMA_NAMES, schema_json};

    #[test]
    fn every_listed_name_has_a_schema() {
        for name in SCHEMA_NAMES {
            assert!(schema_json(name).unwrap().is_some(), "missing schema for {name}");
        }
    }

    #[test]
    fn audit_log_entry_schema_names_its_columns() {
        let schema = schema_json("audit_log_entry").unwrap().unwrap();
        let properties = schema["properties"].as_object().expect("properties");
        for column in ["table_name", "object_id", "field", "old_value", "new_value", "action"] {
            assert!(properties.contains_key(column), "missing {column}");
        }
    }

    #[test]
    fn unknown_name_is_none() {
        assert!(schema_json("invoice").unwrap().is_none());
    }
}
