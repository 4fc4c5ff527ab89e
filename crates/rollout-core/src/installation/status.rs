//! Installation status: which package folders exist and which one is active.

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context;
use serde::Serialize;
use tracing::debug;

use crate::manifest::{ManifestAccess, PackageRecord};
use crate::version::{SemanticVersion, parse_versioned_name};

/// A package folder found on disk for a package listed in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstalledPackageInfo {
    pub id: String,
    pub version: SemanticVersion,
    pub folder: PathBuf,
    /// The folder holds the version recorded in the manifest.
    pub is_installed: bool,
}

/// Cross-references manifest records with `{id}.{version}` folders in the
/// startup folder. Every call takes a fresh snapshot.
#[derive(Clone)]
pub struct InstallationStatusProvider {
    manifest: Rc<dyn ManifestAccess>,
    startup_folder: PathBuf,
}

impl InstallationStatusProvider {
    pub fn new(manifest: Rc<dyn ManifestAccess>, startup_folder: PathBuf) -> Self {
        Self {
            manifest,
            startup_folder,
        }
    }

    pub fn startup_folder(&self) -> &Path {
        &self.startup_folder
    }

    /// Folders for every package in the manifest.
    pub fn get_package_info(&self) -> anyhow::Result<Vec<InstalledPackageInfo>> {
        let records = self.manifest.records()?;
        self.collect(&records)
    }

    /// Folders for one package; empty when `id` is blank.
    pub fn get_package_info_for(&self, id: &str) -> anyhow::Result<Vec<InstalledPackageInfo>> {
        if id.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<PackageRecord> = self
            .manifest
            .records()?
            .into_iter()
            .filter(|record| record.id.eq_ignore_ascii_case(id))
            .collect();
        self.collect(&records)
    }

    /// First folder flagged as installed for `id`, in provider order.
    pub fn installed_package(&self, id: &str) -> anyhow::Result<Option<InstalledPackageInfo>> {
        Ok(self
            .get_package_info_for(id)?
            .into_iter()
            .find(|info| info.is_installed))
    }

    fn collect(&self, records: &[PackageRecord]) -> anyhow::Result<Vec<InstalledPackageInfo>> {
        if records.is_empty() || !self.startup_folder.is_dir() {
            return Ok(Vec::new());
        }

        let folder_names = self.folder_names()?;
        let mut infos = Vec::new();

        for record in records {
            let mut found: Vec<InstalledPackageInfo> = folder_names
                .iter()
                .filter_map(|name| {
                    let version = parse_versioned_name(name, &record.id)?;
                    // Exact text comparison: "1.0" and "1.0.0" are different
                    // installations even though the versions compare equal.
                    let is_installed = version.as_str() == record.version;
                    Some(InstalledPackageInfo {
                        id: record.id.clone(),
                        version,
                        folder: self.startup_folder.join(name),
                        is_installed,
                    })
                })
                .collect();
            found.sort_by(|a, b| a.version.cmp(&b.version).then_with(|| a.folder.cmp(&b.folder)));

            debug!(
                id = %record.id,
                recorded = %record.version,
                folders = found.len(),
                "Scanned package folders"
            );
            infos.extend(found);
        }

        Ok(infos)
    }

    fn folder_names(&self) -> anyhow::Result<Vec<String>> {
        let entries = fs::read_dir(&self.startup_folder).with_context(|| {
            format!(
                "Failed to read startup folder: {}",
                self.startup_folder.display()
            )
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| {
                format!(
                    "Failed to read startup folder entry: {}",
                    self.startup_folder.display()
                )
            })?;
            let is_dir = entry
                .file_type()
                .map(|file_type| file_type.is_dir())
                .unwrap_or(false);
            if !is_dir {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}

impl std::fmt::Debug for InstallationStatusProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstallationStatusProvider")
            .field("startup_folder", &self.startup_folder)
            .finish_non_exhaustive()
    }
}
