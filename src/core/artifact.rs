//! Library artifacts and their classification.
//!
//! An import declares up to three library files, each under a fixed role.
//! The role decides which file extensions are acceptable.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::label::Label;

/// Static archive extensions.
pub const STATIC_LIBRARY_EXTENSIONS: &[&str] = &[".a", ".lib", ".pic.a"];

/// Shared library extensions.
pub const SHARED_LIBRARY_EXTENSIONS: &[&str] = &[".so", ".dylib", ".dll"];

/// Interface stub extensions.
pub const INTERFACE_LIBRARY_EXTENSIONS: &[&str] = &[".ifso", ".tbd", ".lib", ".so", ".dylib"];

/// Which attribute slot a library file was declared under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LibraryRole {
    /// `static_library`
    Static,
    /// `shared_library`
    Shared,
    /// `interface_library`
    InterfaceStub,
}

impl LibraryRole {
    /// All roles, in declaration order.
    pub const ALL: [LibraryRole; 3] = [
        LibraryRole::Static,
        LibraryRole::Shared,
        LibraryRole::InterfaceStub,
    ];

    /// The attribute name this role is declared under.
    pub fn attribute(&self) -> &'static str {
        match self {
            LibraryRole::Static => "static_library",
            LibraryRole::Shared => "shared_library",
            LibraryRole::InterfaceStub => "interface_library",
        }
    }

    /// File extensions accepted for this role.
    pub fn allowed_extensions(&self) -> &'static [&'static str] {
        match self {
            LibraryRole::Static => STATIC_LIBRARY_EXTENSIONS,
            LibraryRole::Shared => SHARED_LIBRARY_EXTENSIONS,
            LibraryRole::InterfaceStub => INTERFACE_LIBRARY_EXTENSIONS,
        }
    }
}

impl fmt::Display for LibraryRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute())
    }
}

/// A file name does not carry an extension legal for its role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {}", format_extensions(.allowed))]
pub struct InvalidExtension {
    pub role: LibraryRole,
    pub allowed: &'static [&'static str],
}

/// Render an extension list as `.a, .lib or .pic.a`.
pub fn format_extensions(extensions: &[&str]) -> String {
    match extensions {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} or {}", init.join(", "), last),
    }
}

/// Classify `file_name` for `role`.
///
/// Matching is a case-sensitive suffix match against the role's allowed
/// extensions.
pub fn classify(role: LibraryRole, file_name: &str) -> Result<LibraryRole, InvalidExtension> {
    let allowed = role.allowed_extensions();
    if allowed.iter().any(|ext| file_name.ends_with(ext)) {
        Ok(role)
    } else {
        Err(InvalidExtension { role, allowed })
    }
}

/// A handle to a precompiled library checked into some package.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LibraryArtifact {
    label: Label,
}

impl LibraryArtifact {
    /// A source file, e.g. `//third_party/foo:libfoo.so`.
    pub fn source(label: Label) -> Self {
        LibraryArtifact { label }
    }

    /// The file's label (`//pkg:file`).
    pub fn label(&self) -> &Label {
        &self.label
    }

    /// Path within the package, as declared (may contain `/`).
    pub fn name(&self) -> &str {
        self.label.name()
    }

    /// Base name of the file.
    pub fn file_name(&self) -> &str {
        let name = self.label.name();
        name.rsplit('/').next().unwrap_or(name)
    }

    /// Execution-root relative path, e.g. `third_party/foo/libfoo.so`.
    pub fn exec_path(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(repo) = self.label.repository() {
            parts.push("external");
            parts.push(repo);
        }
        parts.extend(self.label.package().segments().iter().map(String::as_str));
        parts.push(self.label.name());
        parts.join("/")
    }

    /// Execution-root relative directory holding the file.
    pub fn exec_dir(&self) -> String {
        let path = self.exec_path();
        match path.rsplit_once('/') {
            Some((dir, _)) => dir.to_string(),
            None => String::new(),
        }
    }

    /// Classify this artifact for `role`.
    pub fn classify(&self, role: LibraryRole) -> Result<LibraryRole, InvalidExtension> {
        classify(role, self.file_name())
    }
}

impl fmt::Display for LibraryArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "src {}", self.exec_path())
    }
}
