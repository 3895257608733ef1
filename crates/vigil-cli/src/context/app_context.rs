use std::path::PathBuf;

use anyhow::Context;
use vigil_config::VigilConfig;
use vigil_core::actor::MutationContext;
use vigil_db::service::VigilService;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: VigilService,
    pub config: VigilConfig,
    /// Principal credited with every mutation of this invocation.
    pub actor: MutationContext,
}

impl AppContext {
    /// Open the project database and resolve the acting user.
    ///
    /// An unknown or ambiguous `actor` name is not an error: mutations proceed
    /// and are audited without a user.
    pub async fn init(
        project_root: PathBuf,
        config: VigilConfig,
        actor: Option<&str>,
    ) -> anyhow::Result<Self> {
        let service = VigilService::from_config(&config, &project_root)
            .await
            .context("failed to open vigil database")?;

        let actor = match actor {
            Some(username) => service
                .resolve_username(username)
                .await
                .context("failed to resolve --actor")?
                .map_or_else(MutationContext::anonymous, MutationContext::as_actor),
            None => MutationContext::anonymous(),
        };

        tracing::debug!(
            project = %project_root.display(),
            actor = ?actor.actor(),
            "application context ready"
        );

        Ok(Self {
            service,
            config,
            actor,
        })
    }

    /// Effective listing limit: the `--limit` flag capped by config.
    #[must_use]
    pub fn limit(&self, requested: Option<u32>) -> u32 {
        self.config.audit.effective_limit(requested)
    }
}
