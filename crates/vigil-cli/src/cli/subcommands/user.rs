use clap::Subcommand;

/// User account commands.
#[derive(Clone, Debug, Subcommand)]
pub enum UserCommands {
    /// Add a user.
    Add {
        username: String,
        #[arg(long)]
        staff: bool,
        #[arg(long)]
        superuser: bool,
    },
    /// List users.
    List,
}
