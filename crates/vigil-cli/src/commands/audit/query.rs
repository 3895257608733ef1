use vigil_core::entities::AuditLogEntry;
use vigil_core::enums::Action;
use vigil_db::repos::audit::{AuditFilter, AuditLogAdmin};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::commands::shared::parse::{parse_enum, parse_timestamp};
use crate::context::AppContext;

pub async fn fetch(
    args: &AuditArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<Vec<AuditLogEntry>> {
    let filter = build_filter(args, ctx.limit(flags.limit))?;
    AuditLogAdmin::new(&ctx.service)
        .list(&filter)
        .await
        .map_err(Into::into)
}

fn build_filter(args: &AuditArgs, limit: u32) -> anyhow::Result<AuditFilter> {
    Ok(AuditFilter {
        table: args.table.clone(),
        action: args
            .action
            .as_deref()
            .map(|value| parse_enum::<Action>(&value.to_ascii_uppercase(), "action"))
            .transpose()?,
        user_id: None,
        username: args.user.clone(),
        object_id: args.object_id,
        field: args.field.clone(),
        since: args
            .since
            .as_deref()
            .map(|value| parse_timestamp(value, "since"))
            .transpose()?,
        until: args
            .until
            .as_deref()
            .map(|value| parse_timestamp(value, "until"))
            .transpose()?,
        limit: Some(limit),
    })
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::cli::{Cli, Commands};

    fn audit_args(argv: &[&str]) -> AuditArgs {
        let cli = Cli::try_parse_from(argv).expect("cli should parse");
        match cli.command {
            Commands::Audit(args) => args,
            other => panic!("expected audit, got {other:?}"),
        }
    }

    #[test]
    fn lowercase_action_is_accepted() {
        let args = audit_args(&["vigil", "audit", "--action", "delete", "--table", "products"]);
        let filter = build_filter(&args, 20).unwrap();
        assert_eq!(filter.action, Some(Action::Delete));
        assert_eq!(filter.table.as_deref(), Some("products"));
        assert_eq!(filter.limit, Some(20));
    }

    #[test]
    fn since_before_until() {
        let args = audit_args(&["vigil", "audit", "--since", "2024-01-01", "--until", "2024-02-01"]);
        let filter = build_filter(&args, 20).unwrap();
        assert!(filter.since.unwrap() < filter.until.unwrap());
    }

    #[test]
    fn unknown_action_is_an_error() {
        let args = audit_args(&["vigil", "audit", "--action", "rename"]);
        assert!(build_filter(&args, 20).is_err());
    }
}
