use clap::Subcommand;

/// Customer commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CustomerCommands {
    /// Create a customer.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        tax_id: Option<String>,
    },
    /// Update a customer. Omitted fields keep their stored value.
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        tax_id: Option<String>,
        /// Set the tax ID to null.
        #[arg(long, conflicts_with = "tax_id")]
        clear_tax_id: bool,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a customer.
    Delete { id: i64 },
    /// List customers.
    List,
    /// Get a customer by ID.
    Get { id: i64 },
}
