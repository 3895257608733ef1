#[path = "audit/entry.rs"]
mod entry;
#[path = "audit/query.rs"]
mod query;
#[path = "audit/search.rs"]
mod search;

use vigil_core::entities::AuditLogEntry;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::AuditArgs;
use crate::cli::subcommands::AuditCommands;
use crate::context::AppContext;
use crate::output::{output, output_lines};

/// Handle `vigil audit`.
pub async fn handle(args: &AuditArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match &args.command {
        Some(AuditCommands::Show { id }) => entry::show(*id, ctx, flags).await,
        Some(AuditCommands::History { table, object_id }) => {
            let entries = entry::history(table, *object_id, ctx).await?;
            emit(&entries, args.lines, ctx, flags)
        }
        Some(AuditCommands::Delete { id }) => entry::delete(*id),
        None => {
            let entries = match args.search.as_deref() {
                Some(query) => search::fetch(query, ctx, flags).await?,
                None => query::fetch(args, ctx, flags).await?,
            };
            emit(&entries, args.lines, ctx, flags)
        }
    }
}

fn emit(
    entries: &[AuditLogEntry],
    lines: bool,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if lines {
        let preview = ctx.config.audit.value_preview_len;
        output_lines(entries.iter().map(|entry| entry.describe(preview)));
        Ok(())
    } else {
        output(&entries, flags.format)
    }
}
