//! Service layer running audited mutations.
//!
//! `VigilService` wraps `VigilDb` (raw database access), the monitored
//! `EntityRegistry`, and the `AuditWriter`. Catalog mutations follow one
//! protocol:
//!
//! 1. Lock the connection and `BEGIN IMMEDIATE`
//! 2. Before-hook (reads stored state for updates)
//! 3. Execute the domain write
//! 4. Resolve the actor, after-hook, write audit entries
//! 5. Commit, or roll back on any error
//!
//! Nothing from a rolled-back mutation persists: neither the domain row nor
//! its audit entries.

use std::path::Path;

use libsql::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;
use vigil_config::VigilConfig;
use vigil_core::actor::{ActorRef, ActorResolver};
use vigil_core::entities::{AuditLogEntry, User, catalog_registry};
use vigil_core::enums::Action;
use vigil_core::registry::EntityRegistry;

use crate::VigilDb;
use crate::error::{AuditError, DatabaseError};
use crate::interceptor::Interceptor;
use crate::repos::{Record, delete_row, insert_row, list_rows, load_row, update_row};
use crate::writer::AuditWriter;

/// A stored record plus the audit entries its mutation produced.
#[derive(Debug, Clone, Serialize)]
pub struct Audited<E> {
    pub record: E,
    pub entries: Vec<AuditLogEntry>,
}

/// Runs catalog mutations with field-level auditing.
pub struct VigilService {
    db: VigilDb,
    registry: EntityRegistry,
    writer: AuditWriter,
}

impl VigilService {
    /// Open a local database monitored by the catalog registry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        let db = VigilDb::open_local(db_path).await?;
        Ok(Self::from_db(db, catalog_registry()?))
    }

    /// Open the database configured for the project at `project_root`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn from_config(
        config: &VigilConfig,
        project_root: &Path,
    ) -> Result<Self, DatabaseError> {
        let path = config.database.resolve_path(project_root);
        let path = path.to_str().ok_or_else(|| {
            DatabaseError::InvalidState(format!("database path is not UTF-8: {}", path.display()))
        })?;
        let timeout = std::time::Duration::from_millis(config.database.busy_timeout_ms);
        let db = VigilDb::open_with_timeout(path, timeout).await?;
        Ok(Self::from_db(db, catalog_registry()?))
    }

    /// Wrap an open database with an explicit registry.
    #[must_use]
    pub fn from_db(db: VigilDb, registry: EntityRegistry) -> Self {
        Self {
            db,
            registry,
            writer: AuditWriter::new(),
        }
    }

    #[must_use]
    pub const fn db(&self) -> &VigilDb {
        &self.db
    }

    #[must_use]
    pub const fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    const fn interceptor(&self) -> Interceptor<'_> {
        Interceptor::new(&self.registry, &self.writer)
    }

    /// Insert `entity` and audit every declared field as CREATE.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Unregistered` for non-monitored types,
    /// `AuditError::Storage` if the insert fails, or `AuditError::Write` if the
    /// audit write fails. Nothing persists on error.
    pub async fn create<E: Record>(
        &self,
        entity: &E,
        actor: &impl ActorResolver,
    ) -> Result<Audited<E>, AuditError> {
        let conn = self.db.conn().await;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;
        let result = self.create_in(&tx, entity, actor).await;
        finish(tx, result, Action::Create).await
    }

    async fn create_in<E: Record>(
        &self,
        conn: &Connection,
        entity: &E,
        actor: &impl ActorResolver,
    ) -> Result<Audited<E>, AuditError> {
        let hooks = self.interceptor();
        let pending = hooks.on_before_mutation(conn, entity, Action::Create).await?;
        let mut stored = entity.clone();
        stored.set_primary_key(insert_row(conn, entity).await?);
        let actor = self.verify_actor(conn, actor).await?;
        let (_, entries) = hooks
            .on_after_mutation(conn, pending, &stored, true, actor.as_ref())
            .await?;
        Ok(Audited {
            record: stored,
            entries,
        })
    }

    /// Overwrite the stored row with `entity` and audit each changed field.
    ///
    /// An update that changes nothing commits with zero entries.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::NotFound` if the row does not exist, plus the
    /// errors of [`VigilService::create`].
    pub async fn update<E: Record>(
        &self,
        entity: &E,
        actor: &impl ActorResolver,
    ) -> Result<Audited<E>, AuditError> {
        let conn = self.db.conn().await;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;
        let result = self.update_in(&tx, entity, actor).await;
        finish(tx, result, Action::Update).await
    }

    async fn update_in<E: Record>(
        &self,
        conn: &Connection,
        entity: &E,
        actor: &impl ActorResolver,
    ) -> Result<Audited<E>, AuditError> {
        let hooks = self.interceptor();
        let pending = hooks.on_before_mutation(conn, entity, Action::Update).await?;
        let id = pending.object_id().ok_or_else(|| AuditError::NotFound {
            table: E::TABLE.to_string(),
            id: 0,
        })?;
        update_row(conn, id, entity).await?;
        let actor = self.verify_actor(conn, actor).await?;
        let (_, entries) = hooks
            .on_after_mutation(conn, pending, entity, false, actor.as_ref())
            .await?;
        Ok(Audited {
            record: entity.clone(),
            entries,
        })
    }

    /// Delete row `id` and audit every declared field as DELETE.
    ///
    /// The deleted record is returned with its id still set.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::NotFound` if the row does not exist, plus the
    /// errors of [`VigilService::create`].
    pub async fn delete<E: Record>(
        &self,
        id: i64,
        actor: &impl ActorResolver,
    ) -> Result<Audited<E>, AuditError> {
        let conn = self.db.conn().await;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .await?;
        let result = self.delete_in(&tx, id, actor).await;
        finish(tx, result, Action::Delete).await
    }

    async fn delete_in<E: Record>(
        &self,
        conn: &Connection,
        id: i64,
        actor: &impl ActorResolver,
    ) -> Result<Audited<E>, AuditError> {
        if !self.registry.is_monitored(E::TABLE) {
            return Err(AuditError::Unregistered {
                table: E::TABLE.to_string(),
            });
        }
        let stored: E = load_row(conn, id).await?.ok_or_else(|| AuditError::NotFound {
            table: E::TABLE.to_string(),
            id,
        })?;
        let hooks = self.interceptor();
        let pending = hooks.on_before_delete(&stored)?;
        delete_row::<E>(conn, id).await?;
        let actor = self.verify_actor(conn, actor).await?;
        let (_, entries) = hooks.on_after_delete(conn, pending, actor.as_ref()).await?;
        Ok(Audited {
            record: stored,
            entries,
        })
    }

    /// Load one record.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::NotFound` if the row does not exist.
    pub async fn get<E: Record>(&self, id: i64) -> Result<E, AuditError> {
        let conn = self.db.conn().await;
        load_row(&conn, id).await?.ok_or_else(|| AuditError::NotFound {
            table: E::TABLE.to_string(),
            id,
        })
    }

    /// List records in id order.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list<E: Record>(&self, limit: u32) -> Result<Vec<E>, DatabaseError> {
        let conn = self.db.conn().await;
        list_rows(&conn, limit).await
    }

    /// Confirm the resolved actor still exists. A missing user is audited as
    /// no actor rather than failing the mutation.
    async fn verify_actor(
        &self,
        conn: &Connection,
        resolver: &impl ActorResolver,
    ) -> Result<Option<ActorRef>, DatabaseError> {
        let Some(actor) = resolver.current_actor() else {
            return Ok(None);
        };
        match load_row::<User>(conn, actor.user_id).await? {
            Some(user) => Ok(user.actor_ref()),
            None => {
                tracing::warn!(
                    user_id = actor.user_id,
                    username = %actor.username,
                    "acting user does not exist; auditing without actor"
                );
                Ok(None)
            }
        }
    }
}

/// Commit on success, roll back on failure.
async fn finish<E: Record>(
    tx: Transaction,
    result: Result<Audited<E>, AuditError>,
    action: Action,
) -> Result<Audited<E>, AuditError> {
    match result {
        Ok(audited) => {
            tx.commit().await?;
            tracing::info!(
                table = E::TABLE,
                object_id = ?audited.record.primary_key(),
                %action,
                entries = audited.entries.len(),
                "committed audited mutation"
            );
            Ok(audited)
        }
        Err(error) => {
            if let Err(rollback) = tx.rollback().await {
                tracing::error!(%rollback, "rollback failed");
            }
            Err(error)
        }
    }
}
