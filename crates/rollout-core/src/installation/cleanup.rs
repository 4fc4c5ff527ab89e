//! Removing package folders that are no longer the installed version.

use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use tracing::info;

use super::status::InstallationStatusProvider;

#[derive(Debug, Clone)]
pub struct PackageCleaner {
    status: InstallationStatusProvider,
}

impl PackageCleaner {
    pub fn new(status: InstallationStatusProvider) -> Self {
        Self { status }
    }

    /// Delete folders not flagged as installed, for one package or for all
    /// packages in the manifest. Returns the deleted folders.
    pub fn cleanup(&self, id: Option<&str>) -> anyhow::Result<Vec<PathBuf>> {
        let infos = match id {
            Some(id) if !id.trim().is_empty() => self.status.get_package_info_for(id)?,
            _ => self.status.get_package_info()?,
        };

        let mut removed = Vec::new();
        for info in infos.into_iter().filter(|info| !info.is_installed) {
            fs::remove_dir_all(&info.folder).with_context(|| {
                format!("Failed to delete package folder: {}", info.folder.display())
            })?;
            info!(id = %info.id, version = %info.version, "Removed outdated package folder");
            removed.push(info.folder);
        }
        Ok(removed)
    }
}
