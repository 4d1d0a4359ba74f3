//! Layout configuration discovery.
//!
//! Precedence (highest wins): command-line flags, the project file
//! (`--config <path>` or `./assetgraph.toml`), the user file
//! (`<config_dir>/assetgraph/config.toml`), built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use assetgraph_core::{GraphConfig, LayoutConfig};
use tracing::debug;

pub const PROJECT_CONFIG_FILE: &str = "assetgraph.toml";

/// Read a config file. A missing file yields the default config.
pub fn load_config_file(path: &Path) -> Result<GraphConfig> {
    if !path.exists() {
        return Ok(GraphConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<GraphConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    debug!(path = %path.display(), "loaded config file");
    Ok(config)
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("assetgraph/config.toml"))
}

/// Merge user and project files. An explicit `--config` path must exist.
pub fn load_layout_config(explicit: Option<&Path>, project_root: &Path) -> Result<LayoutConfig> {
    let user = match user_config_path() {
        Some(path) => load_config_file(&path)?,
        None => GraphConfig::default(),
    };

    let project = match explicit {
        Some(path) => {
            anyhow::ensure!(path.exists(), "config file {} does not exist", path.display());
            load_config_file(path)?
        }
        None => load_config_file(&project_root.join(PROJECT_CONFIG_FILE))?,
    };

    Ok(user.layout.merged_with(&project.layout))
}
