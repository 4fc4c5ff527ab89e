//! `rollout.toml` settings.
//!
//! Every key is optional. Values given on the command line win over the
//! file, and the file wins over built-in defaults.

pub mod parser;
pub mod store;

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::DeployError;
use crate::scripts::{DEFAULT_SCRIPT_HOST, ScriptNames};

pub use parser::{parse_settings, parse_settings_str};
pub use store::ConfigStore;

pub const CONFIG_FILE_NAME: &str = "rollout.toml";
pub const DEFAULT_PACKAGING_FOLDER_NAME: &str = "packages";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Folder package versions are installed into.
    #[serde(default)]
    pub install_root: Option<PathBuf>,

    /// Folder `package` writes archives to.
    #[serde(default)]
    pub packaging_folder: Option<PathBuf>,

    #[serde(default)]
    pub script_host: Option<String>,

    #[serde(default)]
    pub deploy_script: Option<String>,

    #[serde(default)]
    pub remove_script: Option<String>,
}

impl Settings {
    pub fn validate(&self) -> Result<(), DeployError> {
        let names = [
            ("script_host", &self.script_host),
            ("deploy_script", &self.deploy_script),
            ("remove_script", &self.remove_script),
        ];
        for (name, value) in names {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(DeployError::blank(name));
            }
        }
        Ok(())
    }

    pub fn script_host(&self) -> &str {
        self.script_host.as_deref().unwrap_or(DEFAULT_SCRIPT_HOST)
    }

    pub fn script_names(&self) -> ScriptNames {
        let defaults = ScriptNames::default();
        ScriptNames {
            deploy: self.deploy_script.clone().unwrap_or(defaults.deploy),
            remove: self.remove_script.clone().unwrap_or(defaults.remove),
        }
    }
}
