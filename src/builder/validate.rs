//! Import declaration validation.
//!
//! Every check runs independently and every failure is collected, so one
//! pass reports all problems with a declaration.

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::core::artifact::{format_extensions, LibraryRole};
use crate::core::import::{ImportDeclaration, ImportSpec};
use crate::core::label::Label;
use crate::core::platform::Platform;
use crate::util::diagnostic::Diagnostic;

/// A user-facing configuration error in an import declaration.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum ConfigError {
    #[error(
        "'{label}' does not produce any cc_import {role} files (expected {})",
        format_extensions(.allowed)
    )]
    #[diagnostic(code(ccimport::import::invalid_extension))]
    InvalidExtension {
        label: Label,
        role: LibraryRole,
        allowed: &'static [&'static str],
    },

    #[error("'{}' shouldn't be specified when 'system_provided' is true", LibraryRole::Shared)]
    #[diagnostic(
        code(ccimport::import::inconsistent_system_provided),
        help("drop `shared_library`, or set `system_provided = false`")
    )]
    InconsistentSystemProvided,

    #[error("'{}' should be specified when 'system_provided' is false", LibraryRole::Shared)]
    #[diagnostic(
        code(ccimport::import::missing_shared_library),
        help("add `shared_library`, or set `system_provided = true`")
    )]
    MissingSharedLibrary,

    #[error("an interface library must be specified when using cc_import for shared library on Windows")]
    #[diagnostic(
        code(ccimport::import::missing_interface_library),
        help("add `interface_library` pointing at the import library (.lib)")
    )]
    MissingInterfaceLibraryOnWindows,
}

/// All configuration errors of one import target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("in cc_import rule {label}: {} error(s)", .errors.len())]
pub struct AnalysisError {
    pub label: Label,
    pub errors: Vec<ConfigError>,
}

impl AnalysisError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(format!(
            "analysis of target '{}' failed",
            self.label
        ));

        for error in &self.errors {
            diag = diag.with_context(error.to_string());
        }

        for error in &self.errors {
            if let Some(help) = MietteDiagnostic::help(error) {
                diag = diag.with_suggestion(help.to_string());
            }
        }

        diag
    }
}

/// Validate `spec` for `platform`.
///
/// Returns the validated declaration, or every error found.
pub fn validate(spec: ImportSpec, platform: &Platform) -> Result<ImportDeclaration, AnalysisError> {
    let mut errors = Vec::new();

    for role in LibraryRole::ALL {
        if let Some(artifact) = spec.artifact(role) {
            if let Err(invalid) = artifact.classify(role) {
                errors.push(ConfigError::InvalidExtension {
                    label: artifact.label().clone(),
                    role,
                    allowed: invalid.allowed,
                });
            }
        }
    }

    let has_shared = spec.shared_library.is_some();
    let has_interface = spec.interface_library.is_some();

    if has_shared && spec.system_provided {
        errors.push(ConfigError::InconsistentSystemProvided);
    }

    if has_interface && !has_shared && !spec.system_provided {
        errors.push(ConfigError::MissingSharedLibrary);
    }

    if platform.is_windows() && has_shared && !has_interface {
        errors.push(ConfigError::MissingInterfaceLibraryOnWindows);
    }

    if errors.is_empty() {
        Ok(ImportDeclaration::from_validated(spec, platform.clone()))
    } else {
        Err(AnalysisError {
            label: spec.label,
            errors,
        })
    }
}
