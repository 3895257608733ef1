use vigil_core::entities::Coupon;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CouponCommands;
use crate::commands::shared::parse::parse_decimal;
use crate::context::AppContext;

/// Handle `vigil coupon`.
pub async fn handle(
    action: &CouponCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CouponCommands::Create { code, discount } => {
            let coupon = Coupon::new(code, parse_decimal(discount, "discount")?);
            super::create(&coupon, ctx, flags).await
        }
        CouponCommands::Update {
            id,
            code,
            discount,
            active,
        } => {
            let apply = |coupon: &mut Coupon| {
                if let Some(code) = code {
                    coupon.code.clone_from(code);
                }
                if let Some(raw) = discount {
                    coupon.discount = parse_decimal(raw, "discount")?;
                }
                if let Some(active) = active {
                    coupon.active = *active;
                }
                anyhow::Ok(())
            };
            super::update(*id, apply, ctx, flags).await
        }
        CouponCommands::Delete { id } => super::delete::<Coupon>(*id, ctx, flags).await,
        CouponCommands::List => super::list::<Coupon>(ctx, flags).await,
        CouponCommands::Get { id } => super::get::<Coupon>(*id, ctx, flags).await,
    }
}
