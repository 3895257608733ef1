//! Catalog mutations through the audited service.
//!
//! Updates load the stored record, apply only the fields given on the command
//! line, and save it back, so omitted fields produce no audit entries.

pub mod coupon;
pub mod customer;
pub mod product;
pub mod taxonomy;

use serde::Serialize;
use vigil_db::repos::Record;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

pub async fn create<E>(entity: &E, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()>
where
    E: Record + Serialize,
{
    let audited = ctx.service.create(entity, &ctx.actor).await?;
    output(&audited, flags.format)
}

pub async fn update<E, F>(
    id: i64,
    apply: F,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()>
where
    E: Record + Serialize,
    F: FnOnce(&mut E) -> anyhow::Result<()>,
{
    let mut record: E = ctx.service.get(id).await?;
    apply(&mut record)?;
    let audited = ctx.service.update(&record, &ctx.actor).await?;
    output(&audited, flags.format)
}

pub async fn delete<E>(id: i64, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()>
where
    E: Record + Serialize,
{
    let audited = ctx.service.delete::<E>(id, &ctx.actor).await?;
    output(&audited, flags.format)
}

pub async fn list<E>(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()>
where
    E: Record + Serialize,
{
    let records = ctx.service.list::<E>(ctx.limit(flags.limit)).await?;
    output(&records, flags.format)
}

pub async fn get<E>(id: i64, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()>
where
    E: Record + Serialize,
{
    let record: E = ctx.service.get(id).await?;
    output(&record, flags.format)
}
