//! Configured repository sources, persisted as `sources.json`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ensure_not_blank;

pub const SOURCES_FILE_NAME: &str = "sources.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RepositorySource {
    pub name: String,
    pub path: PathBuf,
}

impl RepositorySource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SourceStore {
    path: PathBuf,
}

impl SourceStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn in_folder(config_folder: &Path) -> Self {
        Self::new(config_folder.join(SOURCES_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn list(&self) -> anyhow::Result<Vec<RepositorySource>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read sources: {}", self.path.display()))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse sources: {}", self.path.display()))
    }

    /// Add a source, replacing any existing source with the same name.
    pub fn add(&self, name: &str, path: &Path) -> anyhow::Result<RepositorySource> {
        ensure_not_blank("source name", name)?;
        ensure_not_blank("source path", &path.to_string_lossy())?;

        let source = RepositorySource::new(name.trim(), path);
        let mut sources = self.list()?;
        match sources
            .iter_mut()
            .find(|existing| existing.name.eq_ignore_ascii_case(&source.name))
        {
            Some(existing) => *existing = source.clone(),
            None => sources.push(source.clone()),
        }
        self.save(&sources)?;
        Ok(source)
    }

    /// Returns whether a source was removed.
    pub fn remove(&self, name: &str) -> anyhow::Result<bool> {
        ensure_not_blank("source name", name)?;
        let mut sources = self.list()?;
        let before = sources.len();
        sources.retain(|source| !source.name.eq_ignore_ascii_case(name.trim()));
        if sources.len() == before {
            return Ok(false);
        }
        self.save(&sources)?;
        Ok(true)
    }

    pub fn reset(&self) -> anyhow::Result<()> {
        self.save(&[])
    }

    fn save(&self, sources: &[RepositorySource]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content =
            serde_json::to_string_pretty(sources).context("Failed to serialize sources")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write sources: {}", self.path.display()))?;
        debug!(path = %self.path.display(), count = sources.len(), "Saved sources");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn add_list_remove_reset() {
        let temp = TempDir::new().unwrap();
        let store = SourceStore::in_folder(&temp.path().join("config"));
        assert!(store.list().unwrap().is_empty());

        store.add("local", Path::new("/srv/packages")).unwrap();
        store.add("share", Path::new("//fileserver/packages")).unwrap();
        assert_eq!(store.list().unwrap().len(), 2);

        assert!(store.remove("SHARE").unwrap());
        assert!(!store.remove("share").unwrap());
        assert_eq!(
            store.list().unwrap(),
            vec![RepositorySource::new("local", "/srv/packages")]
        );

        store.reset().unwrap();
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn add_replaces_source_with_same_name() {
        let temp = TempDir::new().unwrap();
        let store = SourceStore::in_folder(temp.path());
        store.add("Local", Path::new("/old")).unwrap();
        store.add("local", Path::new("/new")).unwrap();

        let sources = store.list().unwrap();
        assert_eq!(sources, vec![RepositorySource::new("local", "/new")]);
    }

    #[test]
    fn persists_pascal_case_keys() {
        let temp = TempDir::new().unwrap();
        let store = SourceStore::in_folder(temp.path());
        store.add("local", Path::new("/srv/packages")).unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        assert!(raw.contains("\"Name\""));
        assert!(raw.contains("\"Path\""));
    }

    #[test]
    fn blank_name_is_rejected() {
        let temp = TempDir::new().unwrap();
        let store = SourceStore::in_folder(temp.path());
        assert!(store.add(" ", Path::new("/srv")).is_err());
    }
}
