//! Actions, field kinds, and mutation phases.
//!
//! `Action` serializes in upper case (`"CREATE"`), which is also the form stored
//! in the `audit_log.action` column. `MutationPhase` provides
//! `allowed_next_states()` so the interceptor can refuse out-of-order hooks.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// Kind of mutation recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Create,
    Update,
    Delete,
}

impl Action {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }

    /// Whether the mutation has a prior stored state to capture.
    #[must_use]
    pub const fn has_before(self) -> bool {
        matches!(self, Self::Update | Self::Delete)
    }

    /// Whether the mutation leaves a stored state to capture afterwards.
    #[must_use]
    pub const fn has_after(self) -> bool {
        matches!(self, Self::Create | Self::Update)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FieldKind
// ---------------------------------------------------------------------------

/// Semantic type of a declared field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    /// Foreign key, captured by raw id.
    Reference,
}

impl FieldKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "date_time",
            Self::Reference => "reference",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// MutationPhase
// ---------------------------------------------------------------------------

/// Progress of one intercepted mutation.
///
/// ```text
/// pending_before → before_captured → mutation_applied      (update, delete)
/// pending_before → mutation_applied                        (create)
/// mutation_applied → after_captured → diffed               (create, update)
/// mutation_applied → diffed                                (delete)
/// diffed → logged | log_failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationPhase {
    PendingBefore,
    BeforeCaptured,
    MutationApplied,
    AfterCaptured,
    Diffed,
    Logged,
    LogFailed,
}

impl MutationPhase {
    /// Valid next states from the current state.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::PendingBefore => &[Self::BeforeCaptured, Self::MutationApplied],
            Self::BeforeCaptured => &[Self::MutationApplied],
            Self::MutationApplied => &[Self::AfterCaptured, Self::Diffed],
            Self::AfterCaptured => &[Self::Diffed],
            Self::Diffed => &[Self::Logged, Self::LogFailed],
            Self::Logged | Self::LogFailed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Logged | Self::LogFailed)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PendingBefore => "pending_before",
            Self::BeforeCaptured => "before_captured",
            Self::MutationApplied => "mutation_applied",
            Self::AfterCaptured => "after_captured",
            Self::Diffed => "diffed",
            Self::Logged => "logged",
            Self::LogFailed => "log_failed",
        }
    }
}

impl fmt::Display for MutationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
