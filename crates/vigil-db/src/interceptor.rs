//! Mutation interception.
//!
//! Each mutation of a monitored record passes through a pair of hooks around
//! the storage write:
//!
//! ```text
//! create:  on_before_mutation ─ INSERT ─ on_after_mutation(created = true)
//! update:  on_before_mutation ─ UPDATE ─ on_after_mutation(created = false)
//! delete:  on_before_delete   ─ DELETE ─ on_after_delete
//! ```
//!
//! All hooks run on the mutation's transaction connection. State between the
//! hooks lives in an explicit [`PendingMutation`]; nothing is stashed on the
//! record itself.

use libsql::Connection;
use vigil_core::actor::ActorRef;
use vigil_core::capture::capture;
use vigil_core::diff::{ChangeRecord, diff};
use vigil_core::entities::AuditLogEntry;
use vigil_core::enums::{Action, MutationPhase};
use vigil_core::registry::EntityRegistry;
use vigil_core::snapshot::FieldSnapshot;

use crate::error::AuditError;
use crate::repos::{Record, load_row};
use crate::writer::AuditWriter;

/// State carried from a before-hook to its after-hook.
#[derive(Debug)]
pub struct PendingMutation {
    table: &'static str,
    action: Action,
    object_id: Option<i64>,
    phase: MutationPhase,
    before: Option<FieldSnapshot>,
    changes: Vec<ChangeRecord>,
}

impl PendingMutation {
    fn new(table: &'static str, action: Action, object_id: Option<i64>) -> Self {
        Self {
            table,
            action,
            object_id,
            phase: MutationPhase::PendingBefore,
            before: None,
            changes: Vec::new(),
        }
    }

    #[must_use]
    pub const fn table(&self) -> &'static str {
        self.table
    }

    #[must_use]
    pub const fn action(&self) -> Action {
        self.action
    }

    #[must_use]
    pub const fn object_id(&self) -> Option<i64> {
        self.object_id
    }

    #[must_use]
    pub const fn phase(&self) -> MutationPhase {
        self.phase
    }

    #[must_use]
    pub const fn before(&self) -> Option<&FieldSnapshot> {
        self.before.as_ref()
    }

    /// Change records computed by the after-hook, empty before that.
    #[must_use]
    pub fn changes(&self) -> &[ChangeRecord] {
        &self.changes
    }

    fn advance(&mut self, next: MutationPhase) -> Result<(), AuditError> {
        if !self.phase.can_transition_to(next) {
            return Err(AuditError::InvalidPhase {
                from: self.phase,
                to: next,
            });
        }
        self.phase = next;
        Ok(())
    }

    /// Refuse an after-hook that does not belong to this mutation's path.
    fn mismatched(&self) -> AuditError {
        AuditError::InvalidPhase {
            from: self.phase,
            to: MutationPhase::MutationApplied,
        }
    }
}

/// Lifecycle hooks bound to a registry and a writer.
#[derive(Debug, Clone, Copy)]
pub struct Interceptor<'a> {
    registry: &'a EntityRegistry,
    writer: &'a AuditWriter,
}

impl<'a> Interceptor<'a> {
    #[must_use]
    pub const fn new(registry: &'a EntityRegistry, writer: &'a AuditWriter) -> Self {
        Self { registry, writer }
    }

    fn ensure_monitored(&self, table: &str) -> Result<(), AuditError> {
        self.registry.fields_of(table)?;
        Ok(())
    }

    /// Before a create or update.
    ///
    /// For an update the before-state is the row as currently stored, read on
    /// the transaction connection, not the caller's in-memory copy.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Unregistered` for non-monitored types,
    /// `AuditError::NotFound` when updating a row that does not exist, or
    /// `AuditError::Storage` if the read fails.
    pub async fn on_before_mutation<E: Record>(
        &self,
        conn: &Connection,
        entity: &E,
        action: Action,
    ) -> Result<PendingMutation, AuditError> {
        self.ensure_monitored(E::TABLE)?;
        let mut pending = PendingMutation::new(E::TABLE, action, entity.primary_key());

        if action.has_before() {
            let id = entity.primary_key().ok_or_else(|| AuditError::NotFound {
                table: E::TABLE.to_string(),
                id: 0,
            })?;
            let stored: E = load_row(conn, id).await?.ok_or_else(|| AuditError::NotFound {
                table: E::TABLE.to_string(),
                id,
            })?;
            pending.before = Some(capture(self.registry, &stored)?);
            pending.advance(MutationPhase::BeforeCaptured)?;
        }
        Ok(pending)
    }

    /// Before a delete. The before-state and object id are taken from the
    /// instance about to be deleted.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Unregistered` for non-monitored types.
    pub fn on_before_delete<E: Record>(&self, entity: &E) -> Result<PendingMutation, AuditError> {
        let mut pending = PendingMutation::new(E::TABLE, Action::Delete, entity.primary_key());
        pending.before = Some(capture(self.registry, entity)?);
        pending.advance(MutationPhase::BeforeCaptured)?;
        Ok(pending)
    }

    /// After a create or update has been applied.
    ///
    /// `created` reports whether storage inserted a new row; a create has no
    /// before-state regardless of what the before-hook saw.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Write` if persisting the entries fails, or
    /// `AuditError::InvalidPhase` if the hook does not match the pending state,
    /// including a pending delete.
    pub async fn on_after_mutation<E: Record>(
        &self,
        conn: &Connection,
        mut pending: PendingMutation,
        entity: &E,
        created: bool,
        actor: Option<&ActorRef>,
    ) -> Result<(PendingMutation, Vec<AuditLogEntry>), AuditError> {
        if !matches!(pending.action, Action::Create | Action::Update) {
            return Err(pending.mismatched());
        }
        pending.advance(MutationPhase::MutationApplied)?;
        if created {
            pending.action = Action::Create;
            pending.before = None;
        }
        pending.object_id = entity.primary_key();

        let after = capture(self.registry, entity)?;
        pending.advance(MutationPhase::AfterCaptured)?;

        pending.changes = diff(
            pending.table,
            pending.object_id,
            pending.before.as_ref(),
            Some(&after),
        );
        pending.advance(MutationPhase::Diffed)?;

        self.log(conn, pending, actor).await
    }

    /// After a delete has been applied.
    ///
    /// # Errors
    ///
    /// Returns `AuditError::Write` if persisting the entries fails, or
    /// `AuditError::InvalidPhase` if the pending state is not a captured delete.
    pub async fn on_after_delete(
        &self,
        conn: &Connection,
        mut pending: PendingMutation,
        actor: Option<&ActorRef>,
    ) -> Result<(PendingMutation, Vec<AuditLogEntry>), AuditError> {
        if pending.action != Action::Delete || pending.before.is_none() {
            return Err(pending.mismatched());
        }
        pending.advance(MutationPhase::MutationApplied)?;
        pending.changes = diff(pending.table, pending.object_id, pending.before.as_ref(), None);
        pending.advance(MutationPhase::Diffed)?;
        self.log(conn, pending, actor).await
    }

    async fn log(
        &self,
        conn: &Connection,
        mut pending: PendingMutation,
        actor: Option<&ActorRef>,
    ) -> Result<(PendingMutation, Vec<AuditLogEntry>), AuditError> {
        match self.writer.write(conn, &pending.changes, actor).await {
            Ok(entries) => {
                pending.advance(MutationPhase::Logged)?;
                Ok((pending, entries))
            }
            Err(error) => {
                pending.advance(MutationPhase::LogFailed)?;
                tracing::error!(
                    table = pending.table,
                    object_id = ?pending.object_id,
                    action = %pending.action,
                    %error,
                    "audit write failed; aborting mutation"
                );
                Err(AuditError::Write(error))
            }
        }
    }
}
