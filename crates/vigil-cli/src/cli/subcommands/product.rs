use clap::{Args, Subcommand};

/// Product commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ProductCommands {
    /// Create a product.
    Create(ProductCreateArgs),
    /// Update a product. Omitted fields keep their stored value.
    Update(ProductUpdateArgs),
    /// Delete a product.
    Delete { id: i64 },
    /// List products.
    List,
    /// Get a product by ID.
    Get { id: i64 },
}

#[derive(Clone, Debug, Args)]
pub struct ProductCreateArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub slug: String,
    /// Decimal with at most two places, e.g. 10.00
    #[arg(long)]
    pub price: String,
    /// Category ID.
    #[arg(long)]
    pub category: i64,
    /// Brand ID.
    #[arg(long)]
    pub brand: i64,
    #[arg(long)]
    pub description: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub manufactured_on: Option<String>,
    /// YYYY-MM-DD
    #[arg(long)]
    pub expires_on: Option<String>,
    #[arg(long)]
    pub inactive: bool,
}

#[derive(Clone, Debug, Args)]
pub struct ProductUpdateArgs {
    pub id: i64,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub slug: Option<String>,
    #[arg(long)]
    pub price: Option<String>,
    #[arg(long)]
    pub category: Option<i64>,
    #[arg(long)]
    pub brand: Option<i64>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub manufactured_on: Option<String>,
    #[arg(long)]
    pub expires_on: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
}
