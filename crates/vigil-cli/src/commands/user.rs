use vigil_core::entities::User;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::UserCommands;
use crate::context::AppContext;
use crate::output::output;

/// Handle `vigil user`.
pub async fn handle(
    action: &UserCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        UserCommands::Add {
            username,
            staff,
            superuser,
        } => {
            let mut user = User::new(username);
            user.is_staff = *staff || *superuser;
            user.is_superuser = *superuser;
            let user = ctx.service.create_user(&user).await?;
            output(&user, flags.format)
        }
        UserCommands::List => {
            let users = ctx.service.list_users(ctx.limit(flags.limit)).await?;
            output(&users, flags.format)
        }
    }
}
