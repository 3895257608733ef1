//! Entity structs for Vigil.
//!
//! Catalog records map one-to-one to tables in the libSQL database and
//! implement [`Auditable`](crate::registry::Auditable). `User` is declared but
//! never monitored. `AuditLogEntry` is the stored form of one change record.

mod audit;
mod brand;
mod category;
mod coupon;
mod customer;
mod product;
mod user;

pub use audit::AuditLogEntry;
pub use brand::Brand;
pub use category::Category;
pub use coupon::Coupon;
pub use customer::Customer;
pub use product::Product;
pub use user::User;

use crate::errors::CoreError;
use crate::registry::EntityRegistry;

/// Registry monitoring every catalog table. Users and the audit log are excluded.
///
/// # Errors
///
/// Returns `CoreError` if a catalog declaration is invalid.
pub fn catalog_registry() -> Result<EntityRegistry, CoreError> {
    EntityRegistry::builder()
        .monitor::<Category>()
        .monitor::<Brand>()
        .monitor::<Product>()
        .monitor::<Customer>()
        .monitor::<Coupon>()
        .build()
}
