//! End-to-end audit trail tests.
//!
//! - Create, update, delete entry shapes
//! - Replaying an object's history reproduces its stored state
//! - A failed audit write rolls back the domain write
//! - The audit log refuses updates and deletes
//! - Actor attribution

use std::collections::HashMap;

use pretty_assertions::assert_eq;
use vigil_core::actor::{ActorRef, MutationContext};
use vigil_core::capture::snapshot_of;
use vigil_core::entities::{AuditLogEntry, Brand, Category, Customer, Product, User};
use vigil_core::enums::Action;
use vigil_core::value::Decimal;
use vigil_db::error::AuditError;
use vigil_db::repos::audit::{AdminAction, AuditFilter, AuditLogAdmin};
use vigil_db::service::VigilService;

async fn test_service() -> VigilService {
    VigilService::new_local(":memory:").await.unwrap()
}

async fn create_staff(svc: &VigilService, username: &str) -> MutationContext {
    let mut user = User::new(username);
    user.is_staff = true;
    let user = svc.create_user(&user).await.unwrap();
    MutationContext::as_actor(user.actor_ref().unwrap())
}

async fn shampoo(svc: &VigilService, ctx: &MutationContext) -> Product {
    let category = svc.create(&Category::new("Hair", "hair"), ctx).await.unwrap();
    let brand = svc.create(&Brand::new("Acme", "acme"), ctx).await.unwrap();
    let product = Product {
        name: "Shampoo".into(),
        description: "Gentle daily shampoo".into(),
        price: Decimal::new(10, 0),
        category_id: category.record.id.unwrap(),
        brand_id: brand.record.id.unwrap(),
        slug: "shampoo".into(),
        ..Product::default()
    };
    svc.create(&product, ctx).await.unwrap().record
}

async fn all_entries(svc: &VigilService) -> Vec<AuditLogEntry> {
    svc.query_audit(&AuditFilter {
        limit: Some(10_000),
        ..AuditFilter::default()
    })
    .await
    .unwrap()
}

/// Fold an object's history into the latest value of each field.
fn replay(history: &[AuditLogEntry]) -> HashMap<String, Option<String>> {
    let mut state = HashMap::new();
    for entry in history {
        match entry.action {
            Action::Create | Action::Update => {
                state.insert(entry.field.clone(), entry.new_value.clone());
            }
            Action::Delete => {
                state.remove(&entry.field);
            }
        }
    }
    state
}

// ---------------------------------------------------------------------------
// Entry shapes
// ---------------------------------------------------------------------------

#[tokio::test]
async fn price_change_is_a_single_attributed_entry() {
    let svc = test_service().await;
    let alice = create_staff(&svc, "alice").await;
    let mut product = shampoo(&svc, &alice).await;

    product.price = Decimal::new(12, 50);
    let updated = svc.update(&product, &alice).await.unwrap();

    assert_eq!(updated.entries.len(), 1);
    let entry = &updated.entries[0];
    assert_eq!(entry.table_name, "products");
    assert_eq!(entry.object_id, product.id);
    assert_eq!(entry.field, "price");
    assert_eq!(entry.old_value.as_deref(), Some("10.00"));
    assert_eq!(entry.new_value.as_deref(), Some("12.50"));
    assert_eq!(entry.action, Action::Update);
    assert_eq!(entry.username.as_deref(), Some("alice"));

    let stored = svc.get_audit_entry(entry.id).await.unwrap();
    assert_eq!(&stored, entry);
}

#[tokio::test]
async fn create_emits_one_entry_per_field_in_declared_order() {
    let svc = test_service().await;
    let ctx = MutationContext::anonymous();
    let product = shampoo(&svc, &ctx).await;

    let history = svc.object_history("products", product.id.unwrap()).await.unwrap();
    let fields: Vec<&str> = history.iter().map(|e| e.field.as_str()).collect();
    assert_eq!(
        fields,
        vec![
            "name",
            "description",
            "price",
            "manufactured_on",
            "expires_on",
            "category_id",
            "brand_id",
            "active",
            "slug"
        ]
    );
    let active = history.iter().find(|e| e.field == "active").unwrap();
    assert_eq!(active.new_value.as_deref(), Some("true"));
}

#[tokio::test]
async fn saving_without_changes_writes_nothing() {
    let svc = test_service().await;
    let ctx = MutationContext::anonymous();
    let product = shampoo(&svc, &ctx).await;
    let before = all_entries(&svc).await.len();

    let updated = svc.update(&product, &ctx).await.unwrap();
    assert!(updated.entries.is_empty());
    assert_eq!(all_entries(&svc).await.len(), before);
}

#[tokio::test]
async fn delete_keeps_the_object_id_and_old_values() {
    let svc = test_service().await;
    let ctx = MutationContext::anonymous();
    let product = shampoo(&svc, &ctx).await;
    let id = product.id.unwrap();

    let deleted = svc.delete::<Product>(id, &ctx).await.unwrap();
    assert_eq!(deleted.entries.len(), 9);
    let price = deleted.entries.iter().find(|e| e.field == "price").unwrap();
    assert_eq!(price.object_id, Some(id));
    assert_eq!(price.old_value.as_deref(), Some("10.00"));
    assert_eq!(price.new_value, None);
}

#[tokio::test]
async fn nullable_field_transitions_are_recorded() {
    let svc = test_service().await;
    let ctx = MutationContext::anonymous();
    let mut customer = svc
        .create(&Customer::new("Ada", "ada@example.com"), &ctx)
        .await
        .unwrap()
        .record;

    customer.tax_id = Some(String::new());
    let updated = svc.update(&customer, &ctx).await.unwrap();
    assert_eq!(updated.entries.len(), 1);
    assert_eq!(updated.entries[0].old_value, None);
    assert_eq!(updated.entries[0].new_value.as_deref(), Some(""));

    customer.tax_id = None;
    let updated = svc.update(&customer, &ctx).await.unwrap();
    assert_eq!(updated.entries[0].old_value.as_deref(), Some(""));
    assert_eq!(updated.entries[0].new_value, None);
}

#[tokio::test]
async fn users_are_not_monitored() {
    let svc = test_service().await;
    svc.create_user(&User::new("alice")).await.unwrap();
    assert!(all_entries(&svc).await.is_empty());

    let err = svc
        .create(&User::new("bob"), &MutationContext::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, AuditError::Unregistered { ref table } if table == "users"));

    let id = svc.resolve_username("alice").await.unwrap().unwrap().user_id;
    let mut renamed = svc.get_user(id).await.unwrap().unwrap();
    renamed.username = "alicia".into();
    let err = svc
        .update(&renamed, &MutationContext::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, AuditError::Unregistered { ref table } if table == "users"));

    let err = svc
        .delete::<User>(id, &MutationContext::anonymous())
        .await
        .unwrap_err();
    assert!(matches!(err, AuditError::Unregistered { ref table } if table == "users"));

    assert!(all_entries(&svc).await.is_empty());
    assert_eq!(svc.get_user(id).await.unwrap().unwrap().username, "alice");
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

#[tokio::test]
async fn replaying_history_reproduces_stored_state() {
    let svc = test_service().await;
    let alice = create_staff(&svc, "alice").await;
    let mut product = shampoo(&svc, &alice).await;

    product.price = Decimal::new(12, 50);
    svc.update(&product, &alice).await.unwrap();
    product.name = "Shampoo Plus".into();
    product.active = false;
    svc.update(&product, &alice).await.unwrap();
    product.price = Decimal::new(11, 99);
    svc.update(&product, &MutationContext::anonymous()).await.unwrap();

    let stored: Product = svc.get(product.id.unwrap()).await.unwrap();
    let expected: HashMap<String, Option<String>> = snapshot_of(&stored)
        .unwrap()
        .iter()
        .map(|(field, value)| (field.to_string(), value.to_audit_text()))
        .collect();

    let history = svc.object_history("products", product.id.unwrap()).await.unwrap();
    assert_eq!(replay(&history), expected);
    assert!(history.windows(2).all(|w| w[0].created_at < w[1].created_at));
}

#[tokio::test]
async fn replay_after_delete_is_empty() {
    let svc = test_service().await;
    let ctx = MutationContext::anonymous();
    let product = shampoo(&svc, &ctx).await;
    svc.delete::<Product>(product.id.unwrap(), &ctx).await.unwrap();

    let history = svc.object_history("products", product.id.unwrap()).await.unwrap();
    assert_eq!(history.len(), 18);
    assert!(replay(&history).is_empty());
}

// ---------------------------------------------------------------------------
// Atomicity
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_audit_write_rolls_back_the_mutation() {
    let svc = test_service().await;
    let ctx = MutationContext::anonymous();
    let original = shampoo(&svc, &ctx).await;
    let entries_before = all_entries(&svc).await.len();

    svc.db()
        .conn()
        .await
        .execute_batch(
            "CREATE TRIGGER fail_price_audit BEFORE INSERT ON audit_log
             WHEN NEW.field = 'price'
             BEGIN SELECT RAISE(ABORT, 'boom'); END;",
        )
        .await
        .unwrap();

    let mut changed = original.clone();
    changed.name = "Conditioner".into();
    changed.price = Decimal::new(15, 0);
    changed.slug = "conditioner".into();
    let err = svc.update(&changed, &ctx).await.unwrap_err();
    assert!(err.is_write_failure());

    let stored: Product = svc.get(original.id.unwrap()).await.unwrap();
    assert_eq!(stored, original);
    assert_eq!(all_entries(&svc).await.len(), entries_before);

    // The connection is usable again after the rollback.
    let mut renamed = original.clone();
    renamed.name = "Shampoo 2".into();
    assert_eq!(svc.update(&renamed, &ctx).await.unwrap().entries.len(), 1);
}

#[tokio::test]
async fn failed_domain_write_leaves_no_entries() {
    let svc = test_service().await;
    let ctx = MutationContext::anonymous();
    let orphan = Product {
        name: "Orphan".into(),
        category_id: 404,
        brand_id: 404,
        slug: "orphan".into(),
        ..Product::default()
    };

    let err = svc.create(&orphan, &ctx).await.unwrap_err();
    assert!(matches!(err, AuditError::Storage(_)));
    assert!(all_entries(&svc).await.is_empty());
}

// ---------------------------------------------------------------------------
// Read-only surface
// ---------------------------------------------------------------------------

#[tokio::test]
async fn audit_rows_cannot_be_changed_or_removed() {
    let svc = test_service().await;
    let ctx = MutationContext::anonymous();
    shampoo(&svc, &ctx).await;

    let conn = svc.db().conn().await;
    let update = conn
        .execute("UPDATE audit_log SET new_value = 'tampered'", ())
        .await;
    assert!(update.unwrap_err().to_string().contains("append-only"));
    let delete = conn.execute("DELETE FROM audit_log", ()).await;
    assert!(delete.unwrap_err().to_string().contains("append-only"));
}

#[tokio::test]
async fn admin_lists_and_searches_but_refuses_writes() {
    let svc = test_service().await;
    let alice = create_staff(&svc, "alice").await;
    let mut product = shampoo(&svc, &alice).await;
    product.price = Decimal::new(12, 50);
    svc.update(&product, &MutationContext::anonymous()).await.unwrap();

    let admin = AuditLogAdmin::new(&svc);
    let updates = admin
        .list(&AuditFilter {
            action: Some(Action::Update),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].user_id, None);

    let by_alice = admin.search("ALI", 100).await.unwrap();
    assert_eq!(by_alice.len(), 4 + 4 + 9);
    assert!(by_alice.iter().all(|e| e.username.as_deref() == Some("alice")));

    let prices = admin.search("price", 100).await.unwrap();
    assert_eq!(prices.len(), 2);
    assert_eq!(prices[0].action, Action::Update);

    let skin = svc
        .create(&Category::new("Skin", "skin"), &alice)
        .await
        .unwrap()
        .record;
    let by_object = admin
        .search(&skin.id.unwrap().to_string(), 100)
        .await
        .unwrap();
    assert_eq!(by_object.len(), 4);
    assert!(by_object.iter().all(|e| e.object_id == skin.id));

    let err = AuditLogAdmin::authorize(AdminAction::Delete).unwrap_err();
    assert_eq!(
        err.to_string(),
        "The audit log is read-only: 'delete' is not permitted"
    );
    assert!(matches!(
        admin.view(9_999).await,
        Err(AuditError::NotFound { .. })
    ));
}

#[tokio::test]
async fn filters_combine() {
    let svc = test_service().await;
    let alice = create_staff(&svc, "alice").await;
    let bob = create_staff(&svc, "bob").await;
    let mut product = shampoo(&svc, &alice).await;
    product.price = Decimal::new(12, 50);
    svc.update(&product, &bob).await.unwrap();

    let by_bob = svc
        .query_audit(&AuditFilter {
            username: Some("bob".into()),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_bob.len(), 1);

    let creates = svc
        .query_audit(&AuditFilter {
            table: Some("products".into()),
            action: Some(Action::Create),
            field: Some("price".into()),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(creates.len(), 1);
    assert_eq!(creates[0].new_value.as_deref(), Some("10.00"));

    let limited = svc
        .query_audit(&AuditFilter {
            limit: Some(3),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(limited.len(), 3);
    assert_eq!(limited[0].field, "price");
    assert!(limited[0].created_at > limited[1].created_at);

    let future = svc
        .query_audit(&AuditFilter {
            since: Some(limited[0].created_at + chrono::Duration::seconds(1)),
            ..AuditFilter::default()
        })
        .await
        .unwrap();
    assert!(future.is_empty());
}

// ---------------------------------------------------------------------------
// Actor attribution
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_actor_is_recorded_without_user() {
    let svc = test_service().await;
    let ghost = MutationContext::as_actor(ActorRef::new(12_345, "ghost"));
    let product = shampoo(&svc, &ghost).await;

    let history = svc.object_history("products", product.id.unwrap()).await.unwrap();
    assert!(history.iter().all(|e| e.user_id.is_none() && e.username.is_none()));
}

#[tokio::test]
async fn resolved_username_attributes_the_mutation() {
    let svc = test_service().await;
    create_staff(&svc, "Carol").await;
    let actor = svc.resolve_username("carol").await.unwrap();
    let ctx = actor.map_or_else(MutationContext::anonymous, MutationContext::as_actor);

    let created = svc.create(&Category::new("Skin", "skin"), &ctx).await.unwrap();
    assert!(created.entries.iter().all(|e| e.username.as_deref() == Some("Carol")));
}
