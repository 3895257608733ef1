use clap::Subcommand;

/// Audit log commands beyond the default listing.
#[derive(Clone, Debug, Subcommand)]
pub enum AuditCommands {
    /// Show one entry by ID.
    Show { id: i64 },
    /// Full history of one object, oldest first.
    History { table: String, object_id: i64 },
    /// Attempt to delete an entry (always refused).
    Delete { id: i64 },
}
