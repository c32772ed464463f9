//! Runtime staging paths for shared libraries.
//!
//! Binaries find their shared-library dependencies through a single
//! runtime search directory per platform (`_solib_<cpu>`). Two packages
//! may both ship a `libfoo.so`, so each library is staged in a
//! subdirectory whose name encodes the owning target and the library's
//! directory. The encoding escapes every separator and every literal
//! underscore, which keeps it injective.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::artifact::LibraryArtifact;
use crate::core::label::Label;
use crate::core::platform::Platform;

/// Separator between the escaped owner label and the escaped library directory.
///
/// [`escape_path`] never emits two consecutive underscores and never ends
/// with one, so the separator splits a mangled name unambiguously. The
/// escaped directory starts with `_U`, which makes the seam read `___`.
const MANGLE_SEPARATOR: &str = "__";

/// Escape a path so that it can be used as a single directory name.
pub fn escape_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len() * 2);
    for c in path.chars() {
        match c {
            '_' => out.push_str("_U"),
            '/' => out.push_str("_S"),
            '\\' => out.push_str("_B"),
            ':' => out.push_str("_C"),
            '@' => out.push_str("_A"),
            c => out.push(c),
        }
    }
    out
}

/// Where a shared library is staged, relative to the runtime staging root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StagedRuntimePath {
    /// Staging directory (`_solib_k8`)
    pub solib_dir: String,

    /// Mangled per-library subdirectory
    pub mangled_dir: String,

    /// Original file name of the library
    pub file_name: String,
}

impl StagedRuntimePath {
    /// Path relative to the output root, `/`-separated.
    pub fn relative_path(&self) -> String {
        format!("{}/{}/{}", self.solib_dir, self.mangled_dir, self.file_name)
    }

    /// Directory that must be on the runtime search path.
    pub fn search_dir(&self) -> String {
        format!("{}/{}", self.solib_dir, self.mangled_dir)
    }
}

impl fmt::Display for StagedRuntimePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.relative_path())
    }
}

/// Compute the staged path of `library`, owned by `owner`, on `platform`.
///
/// For `//a:foo` shipping `a/libfoo.so` on `k8` this is
/// `_solib_k8/_U_S_Sa_Cfoo___Ua/libfoo.so`.
pub fn mangle(owner: &Label, library: &LibraryArtifact, platform: &Platform) -> StagedRuntimePath {
    let escaped_owner = escape_path(&format!("_{}", owner));
    let escaped_dir = escape_path(&format!("_{}", library.exec_dir()));

    StagedRuntimePath {
        solib_dir: platform.solib_dir(),
        mangled_dir: format!("{}{}{}", escaped_owner, MANGLE_SEPARATOR, escaped_dir),
        file_name: library.file_name().to_string(),
    }
}
