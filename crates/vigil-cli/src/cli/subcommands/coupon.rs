use clap::Subcommand;

/// Coupon commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CouponCommands {
    /// Create a coupon.
    Create {
        #[arg(long)]
        code: String,
        /// Decimal with at most two places, e.g. 5.00
        #[arg(long)]
        discount: String,
    },
    /// Update a coupon. Omitted fields keep their stored value.
    Update {
        id: i64,
        #[arg(long)]
        code: Option<String>,
        #[arg(long)]
        discount: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a coupon.
    Delete { id: i64 },
    /// List coupons.
    List,
    /// Get a coupon by ID.
    Get { id: i64 },
}
