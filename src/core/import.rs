//! Precompiled library import declarations.
//!
//! [`ImportSpec`] is the attribute bundle handed over by whoever resolved
//! the declaration. [`ImportDeclaration`] is the same data after
//! validation; it can only be obtained from
//! [`validate`](crate::builder::validate::validate), so holding one proves
//! that the declaration is consistent for its platform.

use serde::{Deserialize, Serialize};

use crate::core::artifact::{LibraryArtifact, LibraryRole};
use crate::core::label::Label;
use crate::core::platform::Platform;

/// Resolved, unvalidated attributes of one import target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSpec {
    /// Label of the import target itself
    pub label: Label,

    /// `static_library`
    #[serde(default)]
    pub static_library: Option<LibraryArtifact>,

    /// `shared_library`
    #[serde(default)]
    pub shared_library: Option<LibraryArtifact>,

    /// `interface_library`
    #[serde(default)]
    pub interface_library: Option<LibraryArtifact>,

    /// The shared library is supplied by the execution environment
    #[serde(default)]
    pub system_provided: bool,

    /// Link every object of the static archive
    #[serde(default)]
    pub always_link: bool,

    /// Declared headers, passed through unexamined
    #[serde(default)]
    pub hdrs: Vec<Label>,
}

impl ImportSpec {
    /// Create an import with no libraries.
    pub fn new(label: Label) -> Self {
        ImportSpec {
            label,
            static_library: None,
            shared_library: None,
            interface_library: None,
            system_provided: false,
            always_link: false,
            hdrs: Vec::new(),
        }
    }

    /// Set the static archive.
    pub fn with_static(mut self, artifact: LibraryArtifact) -> Self {
        self.static_library = Some(artifact);
        self
    }

    /// Set the shared library.
    pub fn with_shared(mut self, artifact: LibraryArtifact) -> Self {
        self.shared_library = Some(artifact);
        self
    }

    /// Set the interface stub.
    pub fn with_interface(mut self, artifact: LibraryArtifact) -> Self {
        self.interface_library = Some(artifact);
        self
    }

    pub fn with_system_provided(mut self, system_provided: bool) -> Self {
        self.system_provided = system_provided;
        self
    }

    pub fn with_always_link(mut self, always_link: bool) -> Self {
        self.always_link = always_link;
        self
    }

    pub fn with_hdrs(mut self, hdrs: impl IntoIterator<Item = Label>) -> Self {
        self.hdrs = hdrs.into_iter().collect();
        self
    }

    /// The artifact declared under `role`, if any.
    pub fn artifact(&self, role: LibraryRole) -> Option<&LibraryArtifact> {
        match role {
            LibraryRole::Static => self.static_library.as_ref(),
            LibraryRole::Shared => self.shared_library.as_ref(),
            LibraryRole::InterfaceStub => self.interface_library.as_ref(),
        }
    }
}

/// A validated import declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportDeclaration {
    label: Label,
    static_library: Option<LibraryArtifact>,
    shared_library: Option<LibraryArtifact>,
    interface_library: Option<LibraryArtifact>,
    system_provided: bool,
    always_link: bool,
    hdrs: Vec<Label>,
    platform: Platform,
}

impl ImportDeclaration {
    /// Only the validator constructs declarations.
    pub(crate) fn from_validated(spec: ImportSpec, platform: Platform) -> Self {
        ImportDeclaration {
            label: spec.label,
            static_library: spec.static_library,
            shared_library: spec.shared_library,
            interface_library: spec.interface_library,
            system_provided: spec.system_provided,
            always_link: spec.always_link,
            hdrs: spec.hdrs,
            platform,
        }
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn static_library(&self) -> Option<&LibraryArtifact> {
        self.static_library.as_ref()
    }

    pub fn shared_library(&self) -> Option<&LibraryArtifact> {
        self.shared_library.as_ref()
    }

    pub fn interface_library(&self) -> Option<&LibraryArtifact> {
        self.interface_library.as_ref()
    }

    pub fn system_provided(&self) -> bool {
        self.system_provided
    }

    pub fn always_link(&self) -> bool {
        self.always_link
    }

    pub fn hdrs(&self) -> &[Label] {
        &self.hdrs
    }

    /// The platform this declaration was validated for.
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// Whether the declaration was validated for a Windows-like platform.
    pub fn is_windows(&self) -> bool {
        self.platform.is_windows()
    }

    /// Whether the import provides no library at all (headers only).
    pub fn is_header_only(&self) -> bool {
        self.static_library.is_none()
            && self.shared_library.is_none()
            && self.interface_library.is_none()
    }
}

/// Compile-time information an import exposes to dependents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompilationInfo {
    /// Headers declared by the import
    pub declared_include_srcs: Vec<Label>,
}

impl CompilationInfo {
    /// Pass the declaration's headers through.
    pub fn from_declaration(decl: &ImportDeclaration) -> Self {
        CompilationInfo {
            declared_include_srcs: decl.hdrs().to_vec(),
        }
    }
}
