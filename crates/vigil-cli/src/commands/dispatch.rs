use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(command: Commands, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::User { action } => commands::user::handle(&action, ctx, flags).await,
        Commands::Category { action } => {
            commands::catalog::taxonomy::handle::<vigil_core::entities::Category>(&action, ctx, flags)
                .await
        }
        Commands::Brand { action } => {
            commands::catalog::taxonomy::handle::<vigil_core::entities::Brand>(&action, ctx, flags)
                .await
        }
        Commands::Product { action } => commands::catalog::product::handle(&action, ctx, flags).await,
        Commands::Customer { action } => {
            commands::catalog::customer::handle(&action, ctx, flags).await
        }
        Commands::Coupon { action } => commands::catalog::coupon::handle(&action, ctx, flags).await,
        Commands::Audit(args) => commands::audit::handle(&args, ctx, flags).await,
        Commands::Init(_) | Commands::Schema(_) => {
            unreachable!("init/schema are pre-dispatched in main")
        }
    }
}
