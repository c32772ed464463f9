//! Build labels - `@repo//package/path:name`.
//!
//! A Label names either an import target (`//third_party/foo:foo`) or a
//! file inside a package (`//third_party/foo:libfoo.so`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing or constructing a label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("{0} is not a legal workspace name")]
    IllegalRepository(String),

    #[error("invalid label `{0}`: expected `//package:name`")]
    Malformed(String),

    #[error("invalid label `{label}`: {reason}")]
    InvalidPackage { label: String, reason: String },

    #[error("invalid label `{0}`: target name must not be empty")]
    EmptyName(String),
}

/// Check whether `name` is a legal repository (workspace) name.
///
/// Legal names start with an ASCII letter and continue with ASCII
/// alphanumerics, `_` or `-`.
pub fn is_legal_workspace_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// A package path as a sequence of segments (`third_party/foo` -> `["third_party", "foo"]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackagePath {
    segments: Vec<String>,
}

impl PackagePath {
    /// The root package (empty path).
    pub fn root() -> Self {
        PackagePath::default()
    }

    /// Build a package path from already-split segments.
    pub fn from_segments(
        segments: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<Self, String> {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        for seg in &segments {
            if seg.is_empty() {
                return Err("package path contains an empty segment".to_string());
            }
            if seg == "." || seg == ".." {
                return Err(format!("package path segment `{}` is not allowed", seg));
            }
            if seg.contains(':') || seg.contains('/') {
                return Err(format!("package path segment `{}` contains a separator", seg));
            }
        }
        Ok(PackagePath { segments })
    }

    /// Path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this is the root package.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Slash-joined form, e.g. `third_party/foo`.
    pub fn as_string(&self) -> String {
        self.segments.join("/")
    }
}

impl FromStr for PackagePath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim_matches('/');
        if s.is_empty() {
            return Ok(PackagePath::root());
        }
        PackagePath::from_segments(s.split('/'))
    }
}

impl TryFrom<String> for PackagePath {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PackagePath> for String {
    fn from(path: PackagePath) -> String {
        path.as_string()
    }
}

impl fmt::Display for PackagePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

/// A fully-qualified label.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Label {
    repository: Option<String>,
    package: PackagePath,
    name: String,
}

impl Label {
    /// Create a label in the main repository.
    pub fn new(package: PackagePath, name: impl Into<String>) -> Result<Self, LabelError> {
        let name = name.into();
        if name.is_empty() {
            return Err(LabelError::EmptyName(format!("//{}:", package)));
        }
        Ok(Label {
            repository: None,
            package,
            name,
        })
    }

    /// Place this label in an external repository.
    pub fn in_repository(mut self, repository: impl Into<String>) -> Result<Self, LabelError> {
        let repository = repository.into();
        if !is_legal_workspace_name(&repository) {
            return Err(LabelError::IllegalRepository(repository));
        }
        self.repository = Some(repository);
        Ok(self)
    }

    /// External repository name, if any.
    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    /// Owning package.
    pub fn package(&self) -> &PackagePath {
        &self.package
    }

    /// Target (or file) name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// A sibling label in the same package and repository.
    pub fn sibling(&self, name: impl Into<String>) -> Result<Self, LabelError> {
        let mut label = Label::new(self.package.clone(), name)?;
        label.repository = self.repository.clone();
        Ok(label)
    }
}

impl FromStr for Label {
    type Err = LabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (repository, rest) = match s.strip_prefix('@') {
            Some(after) => {
                let idx = after
                    .find("//")
                    .ok_or_else(|| LabelError::Malformed(s.to_string()))?;
                (Some(&after[..idx]), &after[idx..])
            }
            None => (None, s),
        };

        let rest = rest
            .strip_prefix("//")
            .ok_or_else(|| LabelError::Malformed(s.to_string()))?;

        let (package, name) = match rest.split_once(':') {
            Some((pkg, name)) => (pkg, name.to_string()),
            // `//a/b` is shorthand for `//a/b:b`
            None => (rest, rest.rsplit('/').next().unwrap_or_default().to_string()),
        };

        let package: PackagePath = package.parse().map_err(|reason| LabelError::InvalidPackage {
            label: s.to_string(),
            reason,
        })?;

        if name.is_empty() {
            return Err(LabelError::EmptyName(s.to_string()));
        }

        let label = Label {
            repository: None,
            package,
            name,
        };

        match repository {
            Some(repo) => label.in_repository(repo),
            None => Ok(label),
        }
    }
}

impl TryFrom<String> for Label {
    type Error = LabelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Label> for String {
    fn from(label: Label) -> String {
        label.to_string()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(repo) = &self.repository {
            write!(f, "@{}", repo)?;
        }
        write!(f, "//{}:{}", self.package, self.name)
    }
}
