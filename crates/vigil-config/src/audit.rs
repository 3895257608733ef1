//! Audit log read-surface configuration.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

const fn default_limit() -> u32 {
    20
}

const fn default_max_limit() -> u32 {
    500
}

const fn default_value_preview_len() -> usize {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuditConfig {
    /// Entries returned by a listing when no limit is given.
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    /// Upper bound applied to any requested limit.
    #[serde(default = "default_max_limit")]
    pub max_limit: u32,

    /// Characters of old/new values shown in human-readable listings.
    #[serde(default = "default_value_preview_len")]
    pub value_preview_len: usize,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            value_preview_len: default_value_preview_len(),
        }
    }
}

impl AuditConfig {
    /// Effective limit for a request: the default when absent, capped at `max_limit`.
    #[must_use]
    pub fn effective_limit(&self, requested: Option<u32>) -> u32 {
        requested.unwrap_or(self.default_limit).min(self.max_limit)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.default_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "audit.default_limit".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.default_limit > self.max_limit {
            return Err(ConfigError::InvalidValue {
                field: "audit.default_limit".into(),
                reason: format!("exceeds audit.max_limit ({})", self.max_limit),
            });
        }
        if self.value_preview_len < 4 {
            return Err(ConfigError::InvalidValue {
                field: "audit.value_preview_len".into(),
                reason: "must be at least 4".into(),
            });
        }
        Ok(())
    }
}
