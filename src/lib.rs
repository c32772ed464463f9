//! ccimport - link-input analysis for precompiled C/C++ libraries
//!
//! This crate validates `cc_import` declarations, selects the library to
//! link for every linking mode, and computes where shared libraries are
//! staged for execution.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use builder::{select, validate, LinkParameterSet, LinkingMode};
pub use core::{ImportDeclaration, ImportSpec, Label, LibraryArtifact, Platform};
pub use ops::{analyze_import, ImportProviders};
pub use util::context::GlobalContext;
