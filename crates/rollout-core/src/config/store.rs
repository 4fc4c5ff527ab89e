//! Config store for loading rollout.toml.

use std::path::{Path, PathBuf};

use super::{CONFIG_FILE_NAME, Settings, parser};

#[derive(Debug, Clone)]
pub struct ConfigStore {
    config_path: PathBuf,
}

impl ConfigStore {
    pub fn in_folder(config_folder: &Path) -> Self {
        Self {
            config_path: config_folder.join(CONFIG_FILE_NAME),
        }
    }

    /// Settings from `rollout.toml`; defaults when the file does not exist.
    pub fn load(&self) -> anyhow::Result<Settings> {
        if !self.config_path.exists() {
            return Ok(Settings::default());
        }
        parser::parse_settings(&self.config_path)
    }
}

pub fn default_config_dir() -> anyhow::Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?
        .join("rollout"))
}
