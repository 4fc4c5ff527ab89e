//! Deterministic content hash of a package payload directory.

use std::fs;
use std::path::Path;

use anyhow::Context;

/// Compute a blake3 hash over the tree at `path`.
///
/// Entries are visited in lexicographic order. Files contribute
/// `relative_path || 0x00 || content`, directories `relative_path || 0xFF`.
/// Top-level entries named in `exclude` are skipped, so the metadata file
/// written next to the payload does not change the payload hash.
pub fn hash_tree(path: &Path, exclude: &[&str]) -> anyhow::Result<String> {
    let mut hasher = blake3::Hasher::new();
    hash_dir_recursive(&mut hasher, path, "", exclude)?;
    Ok(hasher.finalize().to_hex().to_string())
}

fn hash_dir_recursive(
    hasher: &mut blake3::Hasher,
    dir: &Path,
    base: &str,
    exclude: &[&str],
) -> anyhow::Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Failed to read directory entries: {}", dir.display()))?;
    entries.sort_by_key(|e| e.file_name());

    for entry in entries {
        let name = entry.file_name().to_string_lossy().into_owned();
        if base.is_empty() && exclude.contains(&name.as_str()) {
            continue;
        }
        let rel_path = if base.is_empty() {
            name.clone()
        } else {
            format!("{base}/{name}")
        };

        let ty = entry
            .file_type()
            .with_context(|| format!("Failed to stat file: {}", entry.path().display()))?;

        if ty.is_dir() {
            hasher.update(rel_path.as_bytes());
            hasher.update(&[0xFF]);
            hash_dir_recursive(hasher, &entry.path(), &rel_path, exclude)?;
        } else if ty.is_file() {
            hasher.update(rel_path.as_bytes());
            hasher.update(&[0x00]);
            let content = fs::read(entry.path())
                .with_context(|| format!("Failed to read file: {}", entry.path().display()))?;
            hasher.update(&content);
        } else {
            anyhow::bail!(
                "Unsupported filesystem entry in package payload: {}",
                entry.path().display()
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn identical_trees_hash_equal() {
        let a = TempDir::new().unwrap();
        let b = TempDir::new().unwrap();
        for root in [a.path(), b.path()] {
            write(root, "bin/app.dll", "binary");
            write(root, "deploy.ps1", "Write-Host hi");
        }
        assert_eq!(hash_tree(a.path(), &[]).unwrap(), hash_tree(b.path(), &[]).unwrap());
    }

    #[test]
    fn content_change_changes_hash() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "app.config", "a");
        let before = hash_tree(temp.path(), &[]).unwrap();
        write(temp.path(), "app.config", "b");
        assert_ne!(before, hash_tree(temp.path(), &[]).unwrap());
    }

    #[test]
    fn excluded_top_level_entries_are_ignored() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), "app.config", "a");
        let before = hash_tree(temp.path(), &["package.json"]).unwrap();
        write(temp.path(), "package.json", "{}");
        assert_eq!(before, hash_tree(temp.path(), &["package.json"]).unwrap());

        // Only the top level is excluded.
        write(temp.path(), "nested/package.json", "{}");
        assert_ne!(before, hash_tree(temp.path(), &["package.json"]).unwrap());
    }
}
