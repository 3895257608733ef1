use std::path::Path;

use anyhow::Context;
use vigil_config::VigilConfig;

/// Load `.env` from the project root (falling back to the current directory),
/// then the layered config.
pub fn load_config(project_root: &Path) -> anyhow::Result<VigilConfig> {
    load_project_dotenv(project_root)?;
    VigilConfig::load(project_root).context("failed to load vigil configuration")
}

fn load_project_dotenv(project_root: &Path) -> anyhow::Result<()> {
    let env_path = project_root.join(".env");
    if env_path.exists() {
        dotenvy::from_path(&env_path)
            .with_context(|| format!("failed to load dotenv file at {}", env_path.display()))?;
        return Ok(());
    }

    if let Err(error) = dotenvy::dotenv() {
        if !error.not_found() {
            return Err(anyhow::anyhow!("failed to load dotenv file: {error}"));
        }
    }
    Ok(())
}
