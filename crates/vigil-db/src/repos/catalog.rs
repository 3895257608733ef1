//! Storage mapping for the catalog records.

use vigil_core::entities::{Brand, Category, Coupon, Customer, Product};

use super::{Record, StoredFields};
use crate::error::DatabaseError;

impl Record for Category {
    fn from_fields(id: i64, fields: &StoredFields<'_>) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: Some(id),
            name: fields.text("name")?,
            description: fields.text("description")?,
            active: fields.boolean("active")?,
            slug: fields.text("slug")?,
        })
    }

    fn set_primary_key(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl Record for Brand {
    fn from_fields(id: i64, fields: &StoredFields<'_>) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: Some(id),
            name: fields.text("name")?,
            description: fields.text("description")?,
            active: fields.boolean("active")?,
            slug: fields.text("slug")?,
        })
    }

    fn set_primary_key(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl Record for Product {
    fn from_fields(id: i64, fields: &StoredFields<'_>) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: Some(id),
            name: fields.text("name")?,
            description: fields.text("description")?,
            price: fields.decimal("price")?,
            manufactured_on: fields.date("manufactured_on")?,
            expires_on: fields.date("expires_on")?,
            category_id: fields.reference("category_id")?,
            brand_id: fields.reference("brand_id")?,
            active: fields.boolean("active")?,
            slug: fields.text("slug")?,
        })
    }

    fn set_primary_key(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl Record for Customer {
    fn from_fields(id: i64, fields: &StoredFields<'_>) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: Some(id),
            name: fields.text("name")?,
            email: fields.text("email")?,
            tax_id: fields.opt_text("tax_id")?,
            active: fields.boolean("active")?,
        })
    }

    fn set_primary_key(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl Record for Coupon {
    fn from_fields(id: i64, fields: &StoredFields<'_>) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: Some(id),
            code: fields.text("code")?,
            discount: fields.decimal("discount")?,
            active: fields.boolean("active")?,
        })
    }

    fn set_primary_key(&mut self, id: i64) {
        self.id = Some(id);
    }
}
