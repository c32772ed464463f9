//! Core data structures.
//!
//! This module contains the foundational types of import analysis:
//! - Labels and package paths
//! - Target platforms
//! - Library artifacts and their classification
//! - Import declarations and the Imports.toml manifest

pub mod artifact;
pub mod import;
pub mod label;
pub mod manifest;
pub mod platform;

pub use artifact::{classify, LibraryArtifact, LibraryRole};
pub use import::{CompilationInfo, ImportDeclaration, ImportSpec};
pub use label::{Label, PackagePath};
pub use manifest::{ImportManifest, MANIFEST_NAME};
pub use platform::{Platform, TargetOs};
