//! Installation status, decisions and the install/uninstall/cleanup
//! workflows built on them.

pub mod cleanup;
pub mod installer;
pub mod logic;
pub mod status;
pub mod uninstaller;

use std::fmt;
use std::str::FromStr;

use crate::error::DeployError;

pub use cleanup::PackageCleaner;
pub use installer::{InstallOutcome, InstallRequest, PackageInstaller};
pub use logic::{Decision, DecisionReason, InstallationLogicProvider};
pub use status::{InstallationStatusProvider, InstalledPackageInfo};
pub use uninstaller::{PackageUninstaller, UninstallOutcome};

/// How a package version is rolled out.
///
/// A full deployment replaces the installed version (uninstalling it
/// first); an update deploys over it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeploymentType {
    #[default]
    Full,
    Update,
}

impl DeploymentType {
    pub fn as_str(self) -> &'static str {
        match self {
            DeploymentType::Full => "Full",
            DeploymentType::Update => "Update",
        }
    }
}

impl fmt::Display for DeploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeploymentType {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(DeploymentType::Full),
            "update" => Ok(DeploymentType::Update),
            _ => Err(DeployError::InvalidArgument {
                name: "deployment type",
                reason: format!("'{s}' is not one of Full, Update"),
            }),
        }
    }
}
