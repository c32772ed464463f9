//! Filesystem utilities.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

use crate::core::manifest::MANIFEST_NAME;

/// Directories never searched for manifests.
const SKIPPED_DIRS: &[&str] = &["target", "node_modules"];

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.contains(&name.as_ref())
}

/// Recursively find every import manifest under `root`, sorted by path.
pub fn find_manifests(root: &Path) -> Result<Vec<PathBuf>> {
    let mut manifests = Vec::new();

    for entry in WalkDir::new(root).into_iter().filter_entry(|e| !is_skipped(e)) {
        let entry =
            entry.with_context(|| format!("failed to walk directory: {}", root.display()))?;
        if entry.file_type().is_file() && entry.file_name() == MANIFEST_NAME {
            manifests.push(entry.into_path());
        }
    }

    manifests.sort();
    Ok(manifests)
}
