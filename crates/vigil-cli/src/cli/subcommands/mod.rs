mod audit;
mod coupon;
mod customer;
mod product;
mod taxonomy;
mod user;

pub use audit::AuditCommands;
pub use coupon::CouponCommands;
pub use customer::CustomerCommands;
pub use product::{ProductCommands, ProductCreateArgs, ProductUpdateArgs};
pub use taxonomy::TaxonomyCommands;
pub use user::UserCommands;
