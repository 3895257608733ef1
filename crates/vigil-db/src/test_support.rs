//! Shared test utilities for vigil-db unit tests.

#[cfg(test)]
pub(crate) mod helpers {
    use vigil_core::actor::MutationContext;
    use vigil_core::entities::{Brand, Category, Product, User};
    use vigil_core::value::Decimal;

    use crate::service::VigilService;

    /// In-memory service monitored by the catalog registry.
    pub async fn test_service() -> VigilService {
        VigilService::new_local(":memory:").await.unwrap()
    }

    /// Create a staff user and return a context acting as them.
    pub async fn staff_context(svc: &VigilService, username: &str) -> MutationContext {
        let mut user = User::new(username);
        user.is_staff = true;
        let user = svc.create_user(&user).await.unwrap();
        MutationContext::as_actor(user.actor_ref().unwrap())
    }

    /// Insert a category and brand, returning a product ready to be created.
    pub async fn product_fixture(svc: &VigilService, ctx: &MutationContext) -> Product {
        let category = svc
            .create(&Category::new("Hair", "hair"), ctx)
            .await
            .unwrap()
            .record;
        let brand = svc
            .create(&Brand::new("Acme", "acme"), ctx)
            .await
            .unwrap()
            .record;
        Product {
            name: "Shampoo".into(),
            price: Decimal::new(10, 0),
            category_id: category.id.unwrap(),
            brand_id: brand.id.unwrap(),
            slug: "shampoo".into(),
            ..Product::default()
        }
    }
}
