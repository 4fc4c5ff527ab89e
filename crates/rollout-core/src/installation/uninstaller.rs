//! Removing an installed package.

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use anyhow::Context;
use tracing::{debug, info, warn};

use super::status::InstallationStatusProvider;
use crate::error::{DeployError, ensure_not_blank};
use crate::manifest::ManifestAccess;
use crate::scripts::ScriptRunner;
use crate::version::SemanticVersion;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UninstallOutcome {
    /// The package folder and its manifest record were removed.
    Removed {
        version: SemanticVersion,
        folder: PathBuf,
        ran_remove_script: bool,
    },
    /// The manifest listed a version whose folder no longer exists; only the
    /// record was removed.
    StaleRecordRemoved { recorded_version: String },
}

pub struct PackageUninstaller {
    status: InstallationStatusProvider,
    manifest: Rc<dyn ManifestAccess>,
    runner: Rc<dyn ScriptRunner>,
    remove_script: String,
}

impl PackageUninstaller {
    pub fn new(
        status: InstallationStatusProvider,
        manifest: Rc<dyn ManifestAccess>,
        runner: Rc<dyn ScriptRunner>,
        remove_script: impl Into<String>,
    ) -> Self {
        Self {
            status,
            manifest,
            runner,
            remove_script: remove_script.into(),
        }
    }

    pub fn uninstall(&self, id: &str) -> anyhow::Result<UninstallOutcome> {
        ensure_not_blank("package id", id)?;

        let Some(installed) = self.status.installed_package(id)? else {
            return self.remove_stale_record(id);
        };

        let script = installed.folder.join(&self.remove_script);
        let ran_remove_script = script.is_file();
        if ran_remove_script {
            self.runner
                .run(&script, &installed.folder, &[])
                .with_context(|| format!("Remove script failed for {id} {}", installed.version))?;
        } else {
            debug!(script = %script.display(), "No remove script in package folder");
        }

        fs::remove_dir_all(&installed.folder).with_context(|| {
            format!(
                "Failed to delete package folder: {}",
                installed.folder.display()
            )
        })?;
        self.manifest
            .remove(&installed.id)
            .with_context(|| format!("Failed to update manifest after removing {id}"))?;

        info!(id = %installed.id, version = %installed.version, "Uninstalled package");
        Ok(UninstallOutcome::Removed {
            version: installed.version,
            folder: installed.folder,
            ran_remove_script,
        })
    }

    fn remove_stale_record(&self, id: &str) -> anyhow::Result<UninstallOutcome> {
        let record = self
            .manifest
            .records()?
            .into_iter()
            .find(|record| record.id.eq_ignore_ascii_case(id));

        let Some(record) = record else {
            return Err(DeployError::NotInstalled { id: id.to_string() }.into());
        };

        warn!(
            id = %record.id,
            version = %record.version,
            "Package folder is missing, removing manifest record only"
        );
        self.manifest.remove(&record.id)?;
        Ok(UninstallOutcome::StaleRecordRemoved {
            recorded_version: record.version,
        })
    }
}

impl std::fmt::Debug for PackageUninstaller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageUninstaller")
            .field("status", &self.status)
            .field("remove_script", &self.remove_script)
            .finish_non_exhaustive()
    }
}
