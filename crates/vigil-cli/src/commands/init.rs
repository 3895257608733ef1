use std::path::PathBuf;

use anyhow::Context;
use serde::Serialize;
use vigil_config::PROJECT_DIR;
use vigil_db::service::VigilService;

use crate::bootstrap;
use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::output::output;

#[derive(Debug, Serialize)]
struct InitResponse {
    project_root: String,
    database: String,
    created: bool,
    monitored_tables: Vec<&'static str>,
}

/// Handle `vigil init`.
pub async fn handle(args: &InitArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let root = match args.path.as_deref().or(flags.project.as_deref()) {
        Some(path) => PathBuf::from(path),
        None => std::env::current_dir().context("failed to read current directory")?,
    };

    let project_dir = root.join(PROJECT_DIR);
    let created = !project_dir.is_dir();
    std::fs::create_dir_all(&project_dir)
        .with_context(|| format!("failed to create {}", project_dir.display()))?;

    let config = bootstrap::load_config(&root)?;
    let database = config.database.resolve_path(&root);
    let service = VigilService::from_config(&config, &root)
        .await
        .context("failed to create vigil database")?;

    let mut monitored_tables: Vec<&'static str> = service.registry().tables().collect();
    monitored_tables.sort_unstable();

    tracing::info!(root = %root.display(), created, "initialized vigil project");

    output(
        &InitResponse {
            project_root: root.display().to_string(),
            database: database.display().to_string(),
            created,
            monitored_tables,
        },
        flags.format,
    )
}
