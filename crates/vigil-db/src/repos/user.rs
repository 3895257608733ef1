//! User accounts. Users are not monitored: these writes never produce audit entries.

use vigil_core::actor::{ActorRef, ActorResolution};
use vigil_core::entities::User;

use super::{Record, StoredFields, insert_row, list_rows, load_row};
use crate::error::DatabaseError;
use crate::service::VigilService;

impl Record for User {
    fn from_fields(id: i64, fields: &StoredFields<'_>) -> Result<Self, DatabaseError> {
        Ok(Self {
            id: Some(id),
            username: fields.text("username")?,
            is_staff: fields.boolean("is_staff")?,
            is_superuser: fields.boolean("is_superuser")?,
            is_active: fields.boolean("is_active")?,
        })
    }

    fn set_primary_key(&mut self, id: i64) {
        self.id = Some(id);
    }
}

impl VigilService {
    /// Insert a user account.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the username is taken or the INSERT fails.
    pub async fn create_user(&self, user: &User) -> Result<User, DatabaseError> {
        let conn = self.db().conn().await;
        let id = insert_row(&conn, user).await?;
        let mut stored = user.clone();
        stored.set_primary_key(id);
        tracing::info!(user_id = id, username = %stored.username, "created user");
        Ok(stored)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn get_user(&self, id: i64) -> Result<Option<User>, DatabaseError> {
        let conn = self.db().conn().await;
        load_row(&conn, id).await
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_users(&self, limit: u32) -> Result<Vec<User>, DatabaseError> {
        let conn = self.db().conn().await;
        list_rows(&conn, limit).await
    }

    /// Resolve a username to an actor, matching case-insensitively.
    ///
    /// Unknown or ambiguous usernames resolve to `None`; the caller still
    /// performs the mutation, audited without an actor.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn resolve_username(&self, username: &str) -> Result<Option<ActorRef>, DatabaseError> {
        let conn = self.db().conn().await;
        let mut rows = conn
            .query(
                "SELECT id, username FROM users WHERE username = ?1 COLLATE NOCASE ORDER BY id",
                [username],
            )
            .await?;
        let mut matches = Vec::new();
        while let Some(row) = rows.next().await? {
            matches.push(ActorRef::new(row.get::<i64>(0)?, row.get::<String>(1)?));
        }
        Ok(ActorResolution::from_matches(username, matches).into_actor())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::test_service;

    use super::*;

    #[tokio::test]
    async fn create_and_get_user() {
        let svc = test_service().await;
        let mut staff = User::new("alice");
        staff.is_staff = true;
        let created = svc.create_user(&staff).await.unwrap();

        let loaded = svc.get_user(created.id.unwrap()).await.unwrap().unwrap();
        assert_eq!(loaded, created);
        assert!(loaded.is_staff);
    }

    #[tokio::test]
    async fn usernames_are_unique() {
        let svc = test_service().await;
        svc.create_user(&User::new("alice")).await.unwrap();
        assert!(svc.create_user(&User::new("alice")).await.is_err());
    }

    #[tokio::test]
    async fn resolve_username_ignores_case() {
        let svc = test_service().await;
        let alice = svc.create_user(&User::new("alice")).await.unwrap();

        let actor = svc.resolve_username("ALICE").await.unwrap();
        assert_eq!(actor, alice.actor_ref());
    }

    #[tokio::test]
    async fn ambiguous_username_resolves_to_none() {
        let svc = test_service().await;
        svc.create_user(&User::new("alice")).await.unwrap();
        svc.create_user(&User::new("Alice")).await.unwrap();

        assert_eq!(svc.resolve_username("alice").await.unwrap(), None);
        assert_eq!(svc.resolve_username("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn creating_users_writes_no_audit_entries() {
        let svc = test_service().await;
        svc.create_user(&User::new("alice")).await.unwrap();
        let entries = svc
            .query_audit(&crate::repos::audit::AuditFilter::default())
            .await
            .unwrap();
        assert!(entries.is_empty());
    }
}
