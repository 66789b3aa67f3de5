use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::Config;

/// Name of the config file looked up inside a config directory.
pub const CONFIG_FILE_NAME: &str = "cglaunch.yaml";

/// Directory name used under the platform config and data roots.
pub const APP_DIR_NAME: &str = "cloudgraph";

/// Load `cglaunch.yaml` from `dir`, falling back to defaults when absent.
pub fn load(dir: &Path) -> Result<Config> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        return Ok(Config::default());
    }
    load_file(&path)
}

/// Load an explicitly named config file. Missing files are an error here.
pub fn load_file(path: &Path) -> Result<Config> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&contents)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    Ok(config)
}

/// Platform config directory for this tool, e.g. `~/.config/cloudgraph`.
pub fn default_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME))
}

/// Platform data directory for this tool, e.g. `~/.local/share/cloudgraph`.
pub fn default_data_root() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME))
}

/// The data root to use: the configured override, else the platform default.
///
/// Always absolute, since the runtime reads a relative bind-mount source as a
/// named volume.
pub fn resolve_data_root(config: &Config) -> Result<PathBuf> {
    let root = match &config.data_dir {
        Some(dir) => dir.clone(),
        None => default_data_root().context("could not determine a data directory for this platform")?,
    };
    std::path::absolute(&root)
        .with_context(|| format!("failed to resolve data directory {}", root.display()))
}
