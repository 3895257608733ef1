//! Attribution of mutations to a user.
//!
//! The acting user travels with each mutation in an explicit
//! [`MutationContext`]; there is no ambient "current request". When no
//! identity is available the entry is still written with a null user.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The user credited with a mutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ActorRef {
    pub user_id: i64,
    pub username: String,
}

impl ActorRef {
    #[must_use]
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}

/// Source of the acting user for the mutation in progress.
pub trait ActorResolver {
    /// The acting user, or `None` when no identity is available.
    fn current_actor(&self) -> Option<ActorRef>;
}

impl<T: ActorResolver + ?Sized> ActorResolver for &T {
    fn current_actor(&self) -> Option<ActorRef> {
        (**self).current_actor()
    }
}

/// Per-mutation context passed explicitly into the service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutationContext {
    actor: Option<ActorRef>,
}

impl MutationContext {
    /// Mutation with no known actor. Entries get a null user.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { actor: None }
    }

    #[must_use]
    pub const fn as_actor(actor: ActorRef) -> Self {
        Self { actor: Some(actor) }
    }

    #[must_use]
    pub const fn actor(&self) -> Option<&ActorRef> {
        self.actor.as_ref()
    }
}

impl ActorResolver for MutationContext {
    fn current_actor(&self) -> Option<ActorRef> {
        self.actor.clone()
    }
}

/// Outcome of looking up an actor from an external identity such as a
/// username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorResolution {
    Resolved(ActorRef),
    Unknown(String),
    /// More than one user matched.
    Ambiguous { identity: String, matches: usize },
}

impl ActorResolution {
    /// Build from the users matching `identity`.
    #[must_use]
    pub fn from_matches(identity: &str, mut matches: Vec<ActorRef>) -> Self {
        match matches.len() {
            0 => Self::Unknown(identity.to_string()),
            1 => Self::Resolved(matches.remove(0)),
            n => Self::Ambiguous {
                identity: identity.to_string(),
                matches: n,
            },
        }
    }

    /// Collapse to an optional actor. Unknown and ambiguous identities
    /// resolve to no actor; the mutation is still audited.
    #[must_use]
    pub fn into_actor(self) -> Option<ActorRef> {
        match self {
            Self::Resolved(actor) => Some(actor),
            Self::Unknown(identity) => {
                tracing::warn!(%identity, "acting user not found; auditing without actor");
                None
            }
            Self::Ambiguous { identity, matches } => {
                tracing::warn!(%identity, matches, "acting user is ambiguous; auditing without actor");
                None
            }
        }
    }
}
