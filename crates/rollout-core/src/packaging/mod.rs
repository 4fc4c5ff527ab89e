//! Package archives.
//!
//! A package is a zip archive named `{id}.{version}.zip`. It contains the
//! build output tree as-is plus a `package.json` metadata file at the root.
//! The metadata records a blake3 hash of the payload so an extracted package
//! can be checked against what was built.

pub mod tree_hash;

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DeployError, ensure_not_blank};
use crate::version::SemanticVersion;

pub use tree_hash::hash_tree;

pub const METADATA_FILE_NAME: &str = "package.json";
pub const ARCHIVE_EXTENSION: &str = "zip";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMetadata {
    pub id: String,
    pub version: SemanticVersion,
    pub created_at: DateTime<Utc>,
    pub content_hash: String,
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// `{id}.{version}.zip`
pub fn archive_file_name(id: &str, version: &SemanticVersion) -> String {
    format!("{id}.{version}.{ARCHIVE_EXTENSION}")
}

/// Package ids become folder and file names, so they are restricted to
/// letters, digits, `.`, `_` and `-`, and must not start or end with `.`.
pub fn validate_package_id(id: &str) -> Result<(), DeployError> {
    ensure_not_blank("package id", id)?;
    let invalid = |reason: &str| DeployError::InvalidArgument {
        name: "package id",
        reason: format!("'{id}' {reason}"),
    };
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
    {
        return Err(invalid("may only contain letters, digits, '.', '_' and '-'"));
    }
    if id.starts_with('.') || id.ends_with('.') || id.contains("..") {
        return Err(invalid("must not start or end with '.' or contain '..'"));
    }
    Ok(())
}

/// Writes package archives into an output folder.
#[derive(Debug, Clone)]
pub struct PackageBuilder {
    output_folder: PathBuf,
}

impl PackageBuilder {
    pub fn new(output_folder: PathBuf) -> Self {
        Self { output_folder }
    }

    /// Package the contents of `build_output` and return the archive path.
    pub fn build(
        &self,
        build_output: &Path,
        id: &str,
        version: &SemanticVersion,
        properties: Vec<(String, String)>,
    ) -> anyhow::Result<PathBuf> {
        validate_package_id(id)?;
        if !build_output.is_dir() {
            anyhow::bail!(
                "Build output folder does not exist: {}",
                build_output.display()
            );
        }
        if build_output.join(METADATA_FILE_NAME).exists() {
            anyhow::bail!(
                "Build output must not contain a top-level {}: {}",
                METADATA_FILE_NAME,
                build_output.display()
            );
        }

        let mut entries = Vec::new();
        collect_entries(build_output, "", &mut entries)?;
        if entries.is_empty() {
            anyhow::bail!("Build output folder is empty: {}", build_output.display());
        }

        let metadata = PackageMetadata {
            id: id.to_string(),
            version: version.clone(),
            created_at: Utc::now(),
            content_hash: hash_tree(build_output, &[])?,
            properties: properties.into_iter().collect(),
        };

        fs::create_dir_all(&self.output_folder).with_context(|| {
            format!(
                "Failed to create packaging folder: {}",
                self.output_folder.display()
            )
        })?;
        let archive_path = self.output_folder.join(archive_file_name(id, version));
        write_archive(&archive_path, &entries, &metadata)
            .with_context(|| format!("Failed to write package: {}", archive_path.display()))?;

        info!(
            id,
            version = %version,
            files = entries.iter().filter(|e| !e.is_dir).count(),
            path = %archive_path.display(),
            "Created package"
        );
        Ok(archive_path)
    }
}

struct PayloadEntry {
    relative: String,
    path: PathBuf,
    is_dir: bool,
}

fn collect_entries(dir: &Path, base: &str, entries: &mut Vec<PayloadEntry>) -> anyhow::Result<()> {
    let mut children: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read directory entries: {}", dir.display()))?;
    children.sort_by_key(|e| e.file_name());

    for child in children {
        let name = child.file_name().to_string_lossy().into_owned();
        let relative = if base.is_empty() {
            name
        } else {
            format!("{base}/{name}")
        };
        let ty = child
            .file_type()
            .with_context(|| format!("Failed to stat file: {}", child.path().display()))?;

        if ty.is_dir() {
            entries.push(PayloadEntry {
                relative: relative.clone(),
                path: child.path(),
                is_dir: true,
            });
            collect_entries(&child.path(), &relative, entries)?;
        } else if ty.is_file() {
            entries.push(PayloadEntry {
                relative,
                path: child.path(),
                is_dir: false,
            });
        } else {
            anyhow::bail!(
                "Unsupported filesystem entry in build output: {}",
                child.path().display()
            );
        }
    }
    Ok(())
}

fn write_archive(
    archive_path: &Path,
    entries: &[PayloadEntry],
    metadata: &PackageMetadata,
) -> anyhow::Result<()> {
    let file = File::create(archive_path)?;
    let mut zip = zip::ZipWriter::new(BufWriter::new(file));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);

    for entry in entries {
        if entry.is_dir {
            zip.add_directory(entry.relative.as_str(), options)?;
            continue;
        }
        zip.start_file(entry.relative.as_str(), options)?;
        let mut source = File::open(&entry.path)
            .with_context(|| format!("Failed to open file: {}", entry.path.display()))?;
        io::copy(&mut source, &mut zip)
            .with_context(|| format!("Failed to add file: {}", entry.path.display()))?;
    }

    zip.start_file(METADATA_FILE_NAME, options)?;
    serde_json::to_writer_pretty(&mut zip, metadata).context("Failed to write package metadata")?;
    zip.finish()?;
    Ok(())
}

/// A package archive on disk together with its metadata.
#[derive(Debug, Clone)]
pub struct PackageArchive {
    path: PathBuf,
    metadata: PackageMetadata,
}

impl PackageArchive {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let file =
            File::open(path).with_context(|| format!("Failed to open package: {}", path.display()))?;
        let mut archive = zip::ZipArchive::new(file)
            .with_context(|| format!("Failed to read package as zip archive: {}", path.display()))?;

        let metadata: PackageMetadata = {
            let entry = archive.by_name(METADATA_FILE_NAME).map_err(|_| {
                DeployError::InvalidPackage {
                    path: path.to_path_buf(),
                    reason: format!("missing {METADATA_FILE_NAME}"),
                }
            })?;
            serde_json::from_reader(entry).with_context(|| {
                format!("Failed to parse {} in {}", METADATA_FILE_NAME, path.display())
            })?
        };

        Ok(Self {
            path: path.to_path_buf(),
            metadata,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }

    /// Unpack into `dest` and verify the payload hash.
    pub fn extract_to(&self, dest: &Path) -> anyhow::Result<()> {
        fs::create_dir_all(dest)
            .with_context(|| format!("Failed to create extract directory: {}", dest.display()))?;

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open package: {}", self.path.display()))?;
        let mut archive = zip::ZipArchive::new(file).with_context(|| {
            format!("Failed to read package as zip archive: {}", self.path.display())
        })?;

        for i in 0..archive.len() {
            let mut entry = archive
                .by_index(i)
                .with_context(|| format!("Failed to read zip entry {i}"))?;

            // Entries that would land outside `dest` are refused outright.
            let Some(relative) = entry.enclosed_name() else {
                return Err(DeployError::InvalidPackage {
                    path: self.path.clone(),
                    reason: format!("entry '{}' escapes the package folder", entry.name()),
                }
                .into());
            };
            let outpath = dest.join(relative);

            if entry.is_dir() {
                fs::create_dir_all(&outpath).with_context(|| {
                    format!("Failed to create directory: {}", outpath.display())
                })?;
                continue;
            }

            if let Some(parent) = outpath.parent() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create parent directory: {}", parent.display())
                })?;
            }
            let mut outfile = File::create(&outpath)
                .with_context(|| format!("Failed to create file: {}", outpath.display()))?;
            io::copy(&mut entry, &mut outfile)
                .with_context(|| format!("Failed to write file: {}", outpath.display()))?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                if let Some(mode) = entry.unix_mode() {
                    fs::set_permissions(&outpath, fs::Permissions::from_mode(mode)).ok();
                }
            }
        }

        let actual = hash_tree(dest, &[METADATA_FILE_NAME])?;
        if actual != self.metadata.content_hash {
            return Err(DeployError::InvalidPackage {
                path: self.path.clone(),
                reason: format!(
                    "payload hash mismatch (expected {}, found {actual})",
                    self.metadata.content_hash
                ),
            }
            .into());
        }

        debug!(package = %self.path.display(), dest = %dest.display(), "Extracted package");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn build_output(root: &Path) -> PathBuf {
        let output = root.join("build");
        fs::create_dir_all(output.join("bin")).unwrap();
        fs::create_dir_all(output.join("logs")).unwrap();
        fs::write(output.join("bin/app.dll"), "binary").unwrap();
        fs::write(output.join("deploy.ps1"), "Write-Host deploy").unwrap();
        output
    }

    #[test]
    fn archive_name_uses_id_and_version() {
        let version = SemanticVersion::parse("1.2.0-beta").unwrap();
        assert_eq!(archive_file_name("Web.Api", &version), "Web.Api.1.2.0-beta.zip");
    }

    #[test]
    fn package_ids_are_restricted() {
        assert!(validate_package_id("Web.Api_2-x").is_ok());
        for id in ["", " ", "../etc", "a/b", "a\\b", ".hidden", "trailing.", "a..b", "with space"] {
            assert!(validate_package_id(id).is_err(), "{id:?} should be rejected");
        }
    }

    #[test]
    fn build_then_extract_reproduces_payload() {
        let temp = TempDir::new().unwrap();
        let output = build_output(temp.path());
        let version = SemanticVersion::parse("1.0.0.1").unwrap();
        let builder = PackageBuilder::new(temp.path().join("packages"));

        let path = builder
            .build(&output, "Web.Api", &version, vec![("Owner".into(), "ops".into())])
            .unwrap();
        assert!(path.ends_with("Web.Api.1.0.0.1.zip"));

        let archive = PackageArchive::open(&path).unwrap();
        assert_eq!(archive.metadata().id, "Web.Api");
        assert_eq!(archive.metadata().version, version);
        assert_eq!(archive.metadata().properties.get("Owner").map(String::as_str), Some("ops"));

        let dest = temp.path().join("Web.Api.1.0.0.1");
        archive.extract_to(&dest).unwrap();
        assert_eq!(fs::read_to_string(dest.join("bin/app.dll")).unwrap(), "binary");
        assert!(dest.join("logs").is_dir());
        assert!(dest.join(METADATA_FILE_NAME).is_file());
        assert_eq!(
            hash_tree(&dest, &[METADATA_FILE_NAME]).unwrap(),
            hash_tree(&output, &[]).unwrap()
        );
    }

    #[test]
    fn build_rejects_missing_or_empty_output() {
        let temp = TempDir::new().unwrap();
        let builder = PackageBuilder::new(temp.path().join("packages"));
        let version = SemanticVersion::parse("1.0").unwrap();

        let missing = builder.build(&temp.path().join("nope"), "App", &version, Vec::new());
        assert!(missing.unwrap_err().to_string().contains("does not exist"));

        let empty = temp.path().join("empty");
        fs::create_dir_all(&empty).unwrap();
        let err = builder.build(&empty, "App", &version, Vec::new()).unwrap_err();
        assert!(err.to_string().contains("is empty"));
    }

    #[test]
    fn open_rejects_archive_without_metadata() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("App.1.0.zip");
        {
            let mut zip = zip::ZipWriter::new(File::create(&path).unwrap());
            zip.start_file("readme.txt", zip::write::SimpleFileOptions::default())
                .unwrap();
            io::Write::write_all(&mut zip, b"hello").unwrap();
            zip.finish().unwrap();
        }

        let err = PackageArchive::open(&path).unwrap_err();
        let deploy_error = err.downcast_ref::<DeployError>().unwrap();
        assert!(matches!(deploy_error, DeployError::InvalidPackage { .. }));
    }

    #[test]
    fn extract_detects_tampered_payload() {
        let temp = TempDir::new().unwrap();
        let output = build_output(temp.path());
        let version = SemanticVersion::parse("1.0").unwrap();
        let path = PackageBuilder::new(temp.path().join("packages"))
            .build(&output, "App", &version, Vec::new())
            .unwrap();

        // Rewrite the archive with the same metadata but different content.
        let archive = PackageArchive::open(&path).unwrap();
        let tampered = temp.path().join("tampered.zip");
        {
            let mut zip = zip::ZipWriter::new(File::create(&tampered).unwrap());
            let options = zip::write::SimpleFileOptions::default();
            zip.start_file("deploy.ps1", options).unwrap();
            io::Write::write_all(&mut zip, b"Write-Host tampered").unwrap();
            zip.start_file(METADATA_FILE_NAME, options).unwrap();
            serde_json::to_writer(&mut zip, archive.metadata()).unwrap();
            zip.finish().unwrap();
        }

        let err = PackageArchive::open(&tampered)
            .unwrap()
            .extract_to(&temp.path().join("out"))
            .unwrap_err();
        assert!(err.to_string().contains("payload hash mismatch"));
    }
}
