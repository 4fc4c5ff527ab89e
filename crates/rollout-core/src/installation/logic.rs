//! Install/uninstall decisions.
//!
//! The decision rules are pure functions over the currently installed
//! version ([`decide_install`], [`decide_uninstall`]);
//! [`InstallationLogicProvider`] feeds them from the status provider.

use std::fmt;

use super::DeploymentType;
use super::status::InstallationStatusProvider;
use crate::error::{DeployError, ensure_not_blank};
use crate::version::SemanticVersion;

/// Why a decision came out the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionReason {
    ForceRequested,
    NotInstalled,
    NewerVersionRequested,
    SameOrNewerInstalled,
    UpdateDeployment,
}

impl DecisionReason {
    pub fn message(self) -> &'static str {
        match self {
            DecisionReason::ForceRequested => "force flag set",
            DecisionReason::NotInstalled => "not currently installed",
            DecisionReason::NewerVersionRequested => "requested version is newer than the installed version",
            DecisionReason::SameOrNewerInstalled => "already installed at same or newer version",
            DecisionReason::UpdateDeployment => "update deployments never uninstall first",
        }
    }
}

impl fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub required: bool,
    pub reason: DecisionReason,
    /// Installed version the decision was based on, if any.
    pub installed_version: Option<SemanticVersion>,
}

impl Decision {
    fn new(required: bool, reason: DecisionReason, installed: Option<&SemanticVersion>) -> Self {
        Self {
            required,
            reason,
            installed_version: installed.cloned(),
        }
    }
}

pub fn decide_install(
    installed: Option<&SemanticVersion>,
    new_version: &SemanticVersion,
    force: bool,
) -> Decision {
    if force {
        return Decision::new(true, DecisionReason::ForceRequested, installed);
    }
    match installed {
        None => Decision::new(true, DecisionReason::NotInstalled, None),
        Some(current) if new_version > current => {
            Decision::new(true, DecisionReason::NewerVersionRequested, installed)
        }
        Some(_) => Decision::new(false, DecisionReason::SameOrNewerInstalled, installed),
    }
}

pub fn decide_uninstall(
    installed: Option<&SemanticVersion>,
    new_version: &SemanticVersion,
    deployment_type: DeploymentType,
    force: bool,
) -> Decision {
    if deployment_type == DeploymentType::Update {
        return Decision::new(false, DecisionReason::UpdateDeployment, installed);
    }
    match installed {
        None => Decision::new(false, DecisionReason::NotInstalled, None),
        Some(_) if force => Decision::new(true, DecisionReason::ForceRequested, installed),
        Some(current) if new_version > current => {
            Decision::new(true, DecisionReason::NewerVersionRequested, installed)
        }
        Some(_) => Decision::new(false, DecisionReason::SameOrNewerInstalled, installed),
    }
}

#[derive(Debug, Clone)]
pub struct InstallationLogicProvider {
    status: InstallationStatusProvider,
}

impl InstallationLogicProvider {
    pub fn new(status: InstallationStatusProvider) -> Self {
        Self { status }
    }

    pub fn is_install_required(
        &self,
        package_id: &str,
        new_version: Option<&SemanticVersion>,
        force: bool,
    ) -> anyhow::Result<Decision> {
        let new_version = validate(package_id, new_version)?;
        let installed = self.installed_version(package_id)?;
        Ok(decide_install(installed.as_ref(), new_version, force))
    }

    pub fn is_uninstall_required(
        &self,
        package_id: &str,
        new_version: Option<&SemanticVersion>,
        deployment_type: DeploymentType,
        force: bool,
    ) -> anyhow::Result<Decision> {
        let new_version = validate(package_id, new_version)?;
        let installed = self.installed_version(package_id)?;
        Ok(decide_uninstall(
            installed.as_ref(),
            new_version,
            deployment_type,
            force,
        ))
    }

    fn installed_version(&self, package_id: &str) -> anyhow::Result<Option<SemanticVersion>> {
        Ok(self
            .status
            .installed_package(package_id)?
            .map(|info| info.version))
    }
}

fn validate<'a>(
    package_id: &str,
    new_version: Option<&'a SemanticVersion>,
) -> Result<&'a SemanticVersion, DeployError> {
    ensure_not_blank("package id", package_id)?;
    new_version.ok_or(DeployError::InvalidArgument {
        name: "version",
        reason: "a version is required".to_string(),
    })
}
