//! High-level operations.

pub mod analyze;

pub use analyze::{analyze_import, analyze_manifest, analyze_target, ImportProviders};
