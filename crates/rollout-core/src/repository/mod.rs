//! Package repositories.
//!
//! A repository is a folder (local or on a share) holding package archives
//! named `{id}.{version}.zip`. Several named folders can be configured as
//! sources; lookups consider all of them.

pub mod sources;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{debug, info};

use crate::packaging::{ARCHIVE_EXTENSION, PackageArchive, archive_file_name};
use crate::version::{SemanticVersion, parse_versioned_name};

pub use sources::{RepositorySource, SourceStore};

/// A package archive available in a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageLocation {
    pub id: String,
    pub version: SemanticVersion,
    pub path: PathBuf,
}

pub trait PackageRepository {
    /// Every available version of `id`, ascending.
    fn versions(&self, id: &str) -> anyhow::Result<Vec<PackageLocation>>;

    /// The given version of `id`, or the highest available when `version`
    /// is `None`.
    fn find(
        &self,
        id: &str,
        version: Option<&SemanticVersion>,
    ) -> anyhow::Result<Option<PackageLocation>> {
        let mut versions = self.versions(id)?;
        Ok(match version {
            Some(wanted) => versions.into_iter().find(|location| &location.version == wanted),
            None => versions.pop(),
        })
    }
}

/// Repository backed by a single folder.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    name: String,
    root: PathBuf,
}

impl FolderRepository {
    pub fn new(name: impl Into<String>, root: PathBuf) -> Self {
        Self {
            name: name.into(),
            root,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Copy a package archive into this repository under its canonical
    /// file name and return the destination path.
    pub fn publish(&self, archive: &Path) -> anyhow::Result<PathBuf> {
        let package = PackageArchive::open(archive)?;
        let metadata = package.metadata();

        fs::create_dir_all(&self.root).with_context(|| {
            format!("Failed to create repository folder: {}", self.root.display())
        })?;
        let dest = self
            .root
            .join(archive_file_name(&metadata.id, &metadata.version));
        fs::copy(archive, &dest).with_context(|| {
            format!(
                "Failed to copy {} to {}",
                archive.display(),
                dest.display()
            )
        })?;

        info!(
            repository = %self.name,
            id = %metadata.id,
            version = %metadata.version,
            "Published package"
        );
        Ok(dest)
    }
}

impl PackageRepository for FolderRepository {
    fn versions(&self, id: &str) -> anyhow::Result<Vec<PackageLocation>> {
        if !self.root.is_dir() {
            debug!(repository = %self.name, root = %self.root.display(), "Repository folder missing");
            return Ok(Vec::new());
        }

        let entries = fs::read_dir(&self.root).with_context(|| {
            format!("Failed to read repository folder: {}", self.root.display())
        })?;

        let mut locations = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| {
                format!("Failed to read repository entry: {}", self.root.display())
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_archive = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION));
            let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if !is_archive {
                continue;
            }
            if let Some(version) = parse_versioned_name(stem, id) {
                locations.push(PackageLocation {
                    id: id.to_string(),
                    version,
                    path: path.clone(),
                });
            }
        }

        locations.sort_by(|a, b| a.version.cmp(&b.version));
        Ok(locations)
    }
}

/// All configured sources, searched together.
#[derive(Debug, Clone, Default)]
pub struct SourceRepositories {
    repositories: Vec<FolderRepository>,
}

impl SourceRepositories {
    pub fn new(repositories: Vec<FolderRepository>) -> Self {
        Self { repositories }
    }

    pub fn from_sources(sources: &[RepositorySource]) -> Self {
        Self::new(
            sources
                .iter()
                .map(|source| FolderRepository::new(&source.name, source.path.clone()))
                .collect(),
        )
    }

    pub fn repositories(&self) -> &[FolderRepository] {
        &self.repositories
    }

    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty()
    }
}

impl PackageRepository for SourceRepositories {
    /// Versions from every source. When several sources hold the same
    /// version, the first configured source wins.
    fn versions(&self, id: &str) -> anyhow::Result<Vec<PackageLocation>> {
        let mut merged: Vec<PackageLocation> = Vec::new();
        for repository in &self.repositories {
            for location in repository.versions(id)? {
                if !merged.iter().any(|known| known.version == location.version) {
                    merged.push(location);
                }
            }
        }
        merged.sort_by(|a, b| a.version.cmp(&b.version));
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), "").unwrap();
    }

    #[test]
    fn folder_lists_matching_archives_in_version_order() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("repo");
        touch(&root, "Web.Api.1.0.0.10.zip");
        touch(&root, "Web.Api.1.0.0.9.ZIP");
        touch(&root, "Web.Api.Client.2.0.zip");
        touch(&root, "Web.Api.1.1.txt");
        touch(&root, "Other.1.0.zip");

        let repository = FolderRepository::new("local", root);
        let versions: Vec<String> = repository
            .versions("web.api")
            .unwrap()
            .into_iter()
            .map(|location| location.version.to_string())
            .collect();
        assert_eq!(versions, vec!["1.0.0.9", "1.0.0.10"]);
    }

    #[test]
    fn find_returns_latest_or_exact_version() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("repo");
        touch(&root, "App.1.0.zip");
        touch(&root, "App.2.0.zip");
        let repository = FolderRepository::new("local", root);

        let latest = repository.find("App", None).unwrap().unwrap();
        assert_eq!(latest.version.to_string(), "2.0");

        let wanted = SemanticVersion::parse("1.0.0.0").unwrap();
        let exact = repository.find("App", Some(&wanted)).unwrap().unwrap();
        assert_eq!(exact.version.to_string(), "1.0");

        let missing = SemanticVersion::parse("3.0").unwrap();
        assert!(repository.find("App", Some(&missing)).unwrap().is_none());
    }

    #[test]
    fn missing_folder_has_no_versions() {
        let temp = TempDir::new().unwrap();
        let repository = FolderRepository::new("gone", temp.path().join("gone"));
        assert!(repository.versions("App").unwrap().is_empty());
    }

    #[test]
    fn sources_merge_and_prefer_first_source() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("first");
        let second = temp.path().join("second");
        touch(&first, "App.1.0.zip");
        touch(&second, "App.1.0.zip");
        touch(&second, "App.1.5.zip");

        let sources = SourceRepositories::new(vec![
            FolderRepository::new("first", first.clone()),
            FolderRepository::new("second", second.clone()),
        ]);

        let versions = sources.versions("App").unwrap();
        assert_eq!(versions.len(), 2);
        assert_eq!(versions[0].path, first.join("App.1.0.zip"));

        let latest = sources.find("App", None).unwrap().unwrap();
        assert_eq!(latest.path, second.join("App.1.5.zip"));
    }
}
