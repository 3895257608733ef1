use vigil_core::entities::AuditLogEntry;
use vigil_db::repos::audit::AuditLogAdmin;

use crate::cli::GlobalFlags;
use crate::context::AppContext;

pub async fn fetch(
    query: &str,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<Vec<AuditLogEntry>> {
    AuditLogAdmin::new(&ctx.service)
        .search(query, ctx.limit(flags.limit))
        .await
        .map_err(Into::into)
}
