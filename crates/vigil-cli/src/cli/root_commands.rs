use clap::{Args, Subcommand};

use crate::cli::subcommands::{
    AuditCommands, CouponCommands, CustomerCommands, ProductCommands, TaxonomyCommands,
    UserCommands,
};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Initialize vigil for a project.
    Init(InitArgs),
    /// User accounts (not audited).
    User {
        #[command(subcommand)]
        action: UserCommands,
    },
    /// Product categories.
    Category {
        #[command(subcommand)]
        action: TaxonomyCommands,
    },
    /// Product brands.
    Brand {
        #[command(subcommand)]
        action: TaxonomyCommands,
    },
    /// Products.
    Product {
        #[command(subcommand)]
        action: ProductCommands,
    },
    /// Customers.
    Customer {
        #[command(subcommand)]
        action: CustomerCommands,
    },
    /// Discount coupons.
    Coupon {
        #[command(subcommand)]
        action: CouponCommands,
    },
    /// View the audit log.
    Audit(AuditArgs),
    /// Dump JSON schema for a registered type.
    Schema(SchemaArgs),
}

/// Arguments for `vigil init`.
#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Directory to initialize (defaults to the current directory).
    #[arg(long)]
    pub path: Option<String>,
}

/// Arguments for `vigil audit`.
#[derive(Clone, Debug, Args)]
pub struct AuditArgs {
    #[command(subcommand)]
    pub command: Option<AuditCommands>,
    /// Only entries for this table.
    #[arg(long)]
    pub table: Option<String>,
    /// create, update, or delete.
    #[arg(long)]
    pub action: Option<String>,
    /// Acting username.
    #[arg(long)]
    pub user: Option<String>,
    #[arg(long)]
    pub object_id: Option<i64>,
    #[arg(long)]
    pub field: Option<String>,
    /// RFC 3339 timestamp or YYYY-MM-DD (inclusive).
    #[arg(long)]
    pub since: Option<String>,
    /// RFC 3339 timestamp or YYYY-MM-DD (exclusive).
    #[arg(long)]
    pub until: Option<String>,
    /// Substring search over table, object id, field, action, and username.
    #[arg(long, conflicts_with_all = ["table", "action", "user", "object_id", "field", "since", "until"])]
    pub search: Option<String>,
    /// Print one human-readable line per entry.
    #[arg(long)]
    pub lines: bool,
}

/// Arguments for `vigil schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    pub type_name: String,
}
