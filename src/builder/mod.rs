//! Link input computation.
//!
//! Turns import declarations into validated declarations, runtime staging
//! paths and per-mode link parameters.

pub mod link_params;
pub mod solib;
pub mod validate;

pub use link_params::{
    select, ArtifactCategory, LibraryToLink, LinkParameterSet, LinkParams, LinkingMode,
};
pub use solib::{mangle, StagedRuntimePath};
pub use validate::{validate, AnalysisError, ConfigError};
