//! The package manifest: which package versions rollout considers installed.
//!
//! The manifest is independent of the folders on disk; the installation
//! status provider cross-references the two.

pub mod store;

use serde::{Deserialize, Serialize};

pub use store::ManifestStore;

/// One manifest entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PackageRecord {
    pub id: String,
    pub version: String,
}

impl PackageRecord {
    pub fn new(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            version: version.into(),
        }
    }
}

/// Read/write access to the manifest.
pub trait ManifestAccess {
    fn records(&self) -> anyhow::Result<Vec<PackageRecord>>;

    /// Insert `record`, replacing any entry with the same id (ignoring case).
    fn upsert(&self, record: PackageRecord) -> anyhow::Result<()>;

    /// Remove the entry for `id`. Returns whether an entry existed.
    fn remove(&self, id: &str) -> anyhow::Result<bool>;
}
