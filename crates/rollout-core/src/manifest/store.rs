//! JSON-file backed manifest.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use super::{ManifestAccess, PackageRecord};

pub const MANIFEST_FILE_NAME: &str = "packages.json";

/// Manifest stored as a JSON array of `{"Id", "Version"}` objects.
///
/// A missing file reads as an empty manifest. Writes go to a temporary file
/// in the same directory which is then renamed over the manifest.
#[derive(Debug, Clone)]
pub struct ManifestStore {
    path: PathBuf,
}

impl ManifestStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Manifest at the default location inside `config_folder`.
    pub fn in_folder(config_folder: &Path) -> Self {
        Self::new(config_folder.join(MANIFEST_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> anyhow::Result<Vec<PackageRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let bytes = fs::read(&self.path)
            .with_context(|| format!("Failed to read manifest: {}", self.path.display()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes)
            .with_context(|| format!("Failed to parse manifest: {}", self.path.display()))
    }

    fn save(&self, records: &[PackageRecord]) -> anyhow::Result<()> {
        let dir = self
            .path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Manifest path has no parent: {}", self.path.display()))?;
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create manifest directory: {}", dir.display()))?;

        let bytes = serde_json::to_vec_pretty(records).context("Failed to serialize manifest")?;
        let tmp_path = dir.join(format!("{}.{}.tmp", MANIFEST_FILE_NAME, std::process::id()));
        fs::write(&tmp_path, bytes)
            .with_context(|| format!("Failed to write tmp manifest: {}", tmp_path.display()))?;

        if self.path.exists() {
            fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove existing manifest: {}", self.path.display())
            })?;
        }
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to rename tmp manifest: {}", tmp_path.display()))?;

        debug!(path = %self.path.display(), count = records.len(), "Saved manifest");
        Ok(())
    }
}

impl ManifestAccess for ManifestStore {
    fn records(&self) -> anyhow::Result<Vec<PackageRecord>> {
        self.load()
    }

    fn upsert(&self, record: PackageRecord) -> anyhow::Result<()> {
        let mut records = self.load()?;
        match records
            .iter_mut()
            .find(|existing| existing.id.eq_ignore_ascii_case(&record.id))
        {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.save(&records)
    }

    fn remove(&self, id: &str) -> anyhow::Result<bool> {
        let mut records = self.load()?;
        let before = records.len();
        records.retain(|record| !record.id.eq_ignore_ascii_case(id));
        if records.len() == before {
            return Ok(false);
        }
        self.save(&records)?;
        Ok(true)
    }
}
