use clap::Subcommand;

/// Commands shared by categories and brands.
#[derive(Clone, Debug, Subcommand)]
pub enum TaxonomyCommands {
    /// Create an entry.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        inactive: bool,
    },
    /// Update an entry. Omitted fields keep their stored value.
    Update {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete an entry.
    Delete { id: i64 },
    /// List entries.
    List,
    /// Get an entry by ID.
    Get { id: i64 },
}
