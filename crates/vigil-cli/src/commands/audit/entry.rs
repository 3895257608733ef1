use vigil_core::entities::AuditLogEntry;
use vigil_db::repos::audit::{AdminAction, AuditLogAdmin};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn show(id: i64, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let entry = AuditLogAdmin::new(&ctx.service).view(id).await?;
    output(&entry, flags.format)
}

pub async fn history(
    table: &str,
    object_id: i64,
    ctx: &AppContext,
) -> anyhow::Result<Vec<AuditLogEntry>> {
    AuditLogAdmin::new(&ctx.service)
        .history(table, object_id)
        .await
        .map_err(Into::into)
}

/// Always refused: the audit log has no delete path.
pub fn delete(id: i64) -> anyhow::Result<()> {
    AuditLogAdmin::authorize(AdminAction::Delete)?;
    anyhow::bail!("audit entry #{id} cannot be deleted")
}
