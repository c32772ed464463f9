//! Imports.toml manifest parsing and schema.
//!
//! An import manifest describes the precompiled libraries of one package:
//!
//! ```toml
//! [package]
//! path = "third_party/foo"
//!
//! [[cc_import]]
//! name = "foo"
//! static_library = "libfoo.a"
//! shared_library = "libfoo.so"
//! hdrs = ["foo.h"]
//! ```
//!
//! File names are resolved relative to the package; values starting with
//! `//` or `@` are taken as labels.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::artifact::LibraryArtifact;
use crate::core::import::ImportSpec;
use crate::core::label::{Label, PackagePath};

/// Canonical manifest file name.
pub const MANIFEST_NAME: &str = "Imports.toml";

/// Errors locating a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error(
        "no manifest found in {} or any parent directory (looking for {})",
        .dir.display(),
        MANIFEST_NAME
    )]
    NotFound { dir: PathBuf },
}

/// `[package]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PackageSection {
    /// Package path, e.g. `third_party/foo`
    #[serde(default)]
    pub path: PackagePath,

    /// External repository the package belongs to
    #[serde(default)]
    pub repository: Option<String>,
}

/// One `[[cc_import]]` entry as written.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImportEntry {
    pub name: String,

    #[serde(default)]
    pub static_library: Option<String>,

    #[serde(default)]
    pub shared_library: Option<String>,

    #[serde(default)]
    pub interface_library: Option<String>,

    #[serde(default)]
    pub hdrs: Vec<String>,

    #[serde(default)]
    pub alwayslink: bool,

    #[serde(default)]
    pub system_provided: bool,
}

/// Raw TOML layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RawManifest {
    #[serde(default)]
    package: PackageSection,

    #[serde(default, rename = "cc_import")]
    imports: Vec<ImportEntry>,
}

/// A parsed import manifest.
#[derive(Debug, Clone)]
pub struct ImportManifest {
    /// Package section
    pub package: PackageSection,

    /// Declared imports, in file order
    pub imports: Vec<ImportEntry>,

    /// Where the manifest was read from, if from disk
    pub path: Option<PathBuf>,
}

impl ImportManifest {
    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;

        let mut manifest = Self::parse(&contents)
            .with_context(|| format!("failed to parse manifest: {}", path.display()))?;
        manifest.path = Some(path.to_path_buf());
        Ok(manifest)
    }

    /// Parse a manifest from a string.
    pub fn parse(contents: &str) -> Result<Self> {
        let raw: RawManifest = toml::from_str(contents)?;

        let mut seen = std::collections::HashSet::new();
        for entry in &raw.imports {
            if entry.name.is_empty() {
                bail!("cc_import entry is missing a name");
            }
            if !seen.insert(entry.name.as_str()) {
                bail!("duplicate cc_import target `{}`", entry.name);
            }
        }

        Ok(ImportManifest {
            package: raw.package,
            imports: raw.imports,
            path: None,
        })
    }

    /// Label of a target in this package.
    pub fn label(&self, name: &str) -> Result<Label> {
        let label = Label::new(self.package.path.clone(), name)?;
        match &self.package.repository {
            Some(repo) => Ok(label.in_repository(repo.clone())?),
            None => Ok(label),
        }
    }

    /// Find an import entry by target name.
    pub fn entry(&self, name: &str) -> Option<&ImportEntry> {
        self.imports.iter().find(|e| e.name == name)
    }

    /// Resolve every entry into an [`ImportSpec`].
    pub fn specs(&self) -> Result<Vec<ImportSpec>> {
        self.imports.iter().map(|e| self.resolve(e)).collect()
    }

    /// Resolve one entry: turn file names into artifacts and labels.
    pub fn resolve(&self, entry: &ImportEntry) -> Result<ImportSpec> {
        let label = self.label(&entry.name)?;

        let artifact = |value: &Option<String>| -> Result<Option<LibraryArtifact>> {
            value
                .as_deref()
                .map(|v| self.file_label(&label, v).map(LibraryArtifact::source))
                .transpose()
        };

        let hdrs = entry
            .hdrs
            .iter()
            .map(|h| self.file_label(&label, h))
            .collect::<Result<Vec<_>>>()?;

        Ok(ImportSpec {
            static_library: artifact(&entry.static_library)?,
            shared_library: artifact(&entry.shared_library)?,
            interface_library: artifact(&entry.interface_library)?,
            system_provided: entry.system_provided,
            always_link: entry.alwayslink,
            hdrs,
            label,
        })
    }

    fn file_label(&self, owner: &Label, value: &str) -> Result<Label> {
        if value.starts_with("//") || value.starts_with('@') {
            value
                .parse::<Label>()
                .with_context(|| format!("in cc_import rule {}", owner))
        } else {
            owner
                .sibling(value)
                .with_context(|| format!("in cc_import rule {}", owner))
        }
    }
}

/// Find the manifest in `dir`, if any.
pub fn find_manifest(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(MANIFEST_NAME);
    path.is_file().then_some(path)
}

/// Find the manifest in `start` or the nearest parent directory.
pub fn find_manifest_upward(start: &Path) -> Result<PathBuf, ManifestError> {
    let mut current = start.to_path_buf();
    loop {
        if let Some(path) = find_manifest(&current) {
            return Ok(path);
        }
        if !current.pop() {
            return Err(ManifestError::NotFound {
                dir: start.to_path_buf(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"
[package]
path = "third_party/foo"

[[cc_import]]
name = "foo"
static_library = "libfoo.a"
shared_library = "lib/libfoo.so"
hdrs = ["foo.h", "//common:defs.h"]
alwayslink = true

[[cc_import]]
name = "sys"
interface_library = "libsys.ifso"
system_provided = true
"#;

    #[test]
    fn test_parse_manifest() {
        let manifest = ImportManifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.package.path.as_string(), "third_party/foo");
        assert_eq!(manifest.imports.len(), 2);
        assert!(manifest.entry("sys").unwrap().system_provided);
    }

    #[test]
    fn test_resolve_entry() {
        let manifest = ImportManifest::parse(MANIFEST).unwrap();
        let specs = manifest.specs().unwrap();

        let foo = &specs[0];
        assert_eq!(foo.label.to_string(), "//third_party/foo:foo");
        assert_eq!(
            foo.static_library.as_ref().unwrap().to_string(),
            "src third_party/foo/libfoo.a"
        );
        assert_eq!(
            foo.shared_library.as_ref().unwrap().label().to_string(),
            "//third_party/foo:lib/libfoo.so"
        );
        assert!(foo.always_link);
        let hdrs: Vec<String> = foo.hdrs.iter().map(|h| h.to_string()).collect();
        assert_eq!(hdrs, ["//third_party/foo:foo.h", "//common:defs.h"]);
    }

    #[test]
    fn test_external_repository() {
        let manifest = ImportManifest::parse(
            "[package]\nrepository = \"zlib\"\n\n[[cc_import]]\nname = \"zlib\"\nstatic_library = \"libz.a\"\n",
        )
        .unwrap();
        let spec = &manifest.specs().unwrap()[0];
        assert_eq!(spec.label.to_string(), "@zlib//:zlib");
    }

    #[test]
    fn test_illegal_repository_rejected() {
        let manifest = ImportManifest::parse(
            "[package]\nrepository = \"123abc\"\n\n[[cc_import]]\nname = \"x\"\n",
        )
        .unwrap();
        let err = manifest.specs().unwrap_err();
        assert!(err.to_string().contains("123abc is not a legal workspace name"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = ImportManifest::parse("[[cc_import]]\nname = \"a\"\n\n[[cc_import]]\nname = \"a\"\n")
            .unwrap_err();
        assert!(err.to_string().contains("duplicate cc_import target `a`"));
    }

    #[test]
    fn test_unknown_attribute_rejected() {
        assert!(ImportManifest::parse("[[cc_import]]\nname = \"a\"\nsrcs = []\n").is_err());
    }

    #[test]
    fn test_find_manifest_upward() {
        let tmp = TempDir::new().unwrap();
        let manifest = tmp.path().join(MANIFEST_NAME);
        std::fs::write(&manifest, "").unwrap();
        let nested = tmp.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_manifest_upward(&nested).unwrap(), manifest);
    }

    #[test]
    fn test_find_manifest_not_found() {
        let tmp = TempDir::new().unwrap();
        assert!(find_manifest(tmp.path()).is_none());
    }
}
