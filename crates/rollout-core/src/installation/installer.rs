//! Installing a package version from the configured repositories.

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use tracing::{debug, info, warn};

use super::DeploymentType;
use super::logic::{DecisionReason, InstallationLogicProvider};
use super::status::InstallationStatusProvider;
use super::uninstaller::{PackageUninstaller, UninstallOutcome};
use crate::error::{DeployError, ensure_not_blank};
use crate::manifest::{ManifestAccess, PackageRecord};
use crate::packaging::PackageArchive;
use crate::repository::PackageRepository;
use crate::scripts::ScriptRunner;
use crate::version::SemanticVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub id: String,
    /// `None` installs the highest available version.
    pub version: Option<SemanticVersion>,
    pub deployment_type: DeploymentType,
    pub force: bool,
}

impl InstallRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: None,
            deployment_type: DeploymentType::Full,
            force: false,
        }
    }

    pub fn version(mut self, version: Option<SemanticVersion>) -> Self {
        self.version = version;
        self
    }

    pub fn deployment_type(mut self, deployment_type: DeploymentType) -> Self {
        self.deployment_type = deployment_type;
        self
    }

    pub fn force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    AlreadyInstalled {
        requested: SemanticVersion,
        installed: Option<SemanticVersion>,
        reason: DecisionReason,
    },
    Installed {
        version: SemanticVersion,
        folder: PathBuf,
        /// Version uninstalled before this one was deployed.
        replaced: Option<SemanticVersion>,
    },
}

pub struct PackageInstaller {
    status: InstallationStatusProvider,
    logic: InstallationLogicProvider,
    uninstaller: PackageUninstaller,
    repository: Rc<dyn PackageRepository>,
    manifest: Rc<dyn ManifestAccess>,
    runner: Rc<dyn ScriptRunner>,
    deploy_script: String,
}

impl PackageInstaller {
    pub fn new(
        status: InstallationStatusProvider,
        uninstaller: PackageUninstaller,
        repository: Rc<dyn PackageRepository>,
        manifest: Rc<dyn ManifestAccess>,
        runner: Rc<dyn ScriptRunner>,
        deploy_script: impl Into<String>,
    ) -> Self {
        Self {
            logic: InstallationLogicProvider::new(status.clone()),
            status,
            uninstaller,
            repository,
            manifest,
            runner,
            deploy_script: deploy_script.into(),
        }
    }

    pub fn install(&self, request: &InstallRequest) -> anyhow::Result<InstallOutcome> {
        ensure_not_blank("package id", &request.id)?;

        let location = self
            .repository
            .find(&request.id, request.version.as_ref())
            .with_context(|| format!("Failed to search repositories for {}", request.id))?
            .ok_or_else(|| DeployError::PackageNotFound {
                id: request.id.clone(),
                version: request.version.as_ref().map(ToString::to_string),
            })?;
        debug!(id = %request.id, version = %location.version, path = %location.path.display(), "Resolved package");

        let install = self.logic.is_install_required(
            &request.id,
            Some(&location.version),
            request.force,
        )?;
        if !install.required {
            info!(id = %request.id, version = %location.version, reason = %install.reason, "Install not required");
            return Ok(InstallOutcome::AlreadyInstalled {
                requested: location.version,
                installed: install.installed_version,
                reason: install.reason,
            });
        }

        let uninstall = self.logic.is_uninstall_required(
            &request.id,
            Some(&location.version),
            request.deployment_type,
            request.force,
        )?;
        let replaced = if uninstall.required {
            match self.uninstaller.uninstall(&request.id)? {
                UninstallOutcome::Removed { version, .. } => Some(version),
                UninstallOutcome::StaleRecordRemoved { .. } => None,
            }
        } else {
            None
        };

        let archive = PackageArchive::open(&location.path)?;
        let metadata = archive.metadata();
        if !metadata.id.eq_ignore_ascii_case(&request.id) || metadata.version != location.version {
            return Err(DeployError::InvalidPackage {
                path: location.path.clone(),
                reason: format!(
                    "metadata describes {} {}, expected {} {}",
                    metadata.id, metadata.version, request.id, location.version
                ),
            }
            .into());
        }

        let folder = self
            .status
            .startup_folder()
            .join(format!("{}.{}", metadata.id, location.version));
        if folder.exists() {
            warn!(folder = %folder.display(), "Replacing existing package folder");
            fs::remove_dir_all(&folder).with_context(|| {
                format!("Failed to delete package folder: {}", folder.display())
            })?;
        }

        if let Err(e) = archive.extract_to(&folder) {
            if let Err(cleanup) = fs::remove_dir_all(&folder) {
                warn!(folder = %folder.display(), error = %cleanup, "Failed to remove partially extracted package folder");
            }
            return Err(e.context(format!("Failed to extract package into {}", folder.display())));
        }
        info!(id = %metadata.id, version = %location.version, folder = %folder.display(), "Extracted package");

        let script = folder.join(&self.deploy_script);
        if script.is_file() {
            self.runner
                .run(
                    &script,
                    &folder,
                    &[("DeploymentType", request.deployment_type.as_str())],
                )
                .with_context(|| {
                    format!("Deploy script failed for {} {}", metadata.id, location.version)
                })?;
        } else {
            debug!(script = %script.display(), "No deploy script in package");
        }

        self.manifest
            .upsert(PackageRecord::new(
                metadata.id.clone(),
                location.version.to_string(),
            ))
            .context("Failed to record installed package in manifest")?;
        info!(id = %metadata.id, version = %location.version, "Installed package");

        Ok(InstallOutcome::Installed {
            version: location.version,
            folder,
            replaced,
        })
    }
}

impl std::fmt::Debug for PackageInstaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageInstaller")
            .field("status", &self.status)
            .field("deploy_script", &self.deploy_script)
            .finish_non_exhaustive()
    }
}
