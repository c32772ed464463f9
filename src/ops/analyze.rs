//! Import analysis: validation, link parameter selection and header
//! passthrough for each declared import.

use anyhow::{anyhow, Result};
use rayon::prelude::*;
use serde::Serialize;

use crate::builder::link_params::{select, LinkParameterSet};
use crate::builder::validate::{validate, AnalysisError};
use crate::core::import::{CompilationInfo, ImportSpec};
use crate::core::label::Label;
use crate::core::manifest::ImportManifest;
use crate::core::platform::Platform;
use crate::util::diagnostic::suggestions;

/// Everything an analyzed import exposes to its dependents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportProviders {
    pub label: Label,
    pub link_params: LinkParameterSet,
    pub compilation: CompilationInfo,
}

/// Analyze one import.
pub fn analyze_import(
    spec: ImportSpec,
    platform: &Platform,
) -> Result<ImportProviders, AnalysisError> {
    tracing::debug!("Analyzing {} for {}", spec.label, platform);

    let decl = validate(spec, platform)?;
    let link_params = select(&decl);
    let compilation = CompilationInfo::from_declaration(&decl);

    Ok(ImportProviders {
        label: decl.label().clone(),
        link_params,
        compilation,
    })
}

/// Results of analyzing every import of a manifest, in declaration order.
#[derive(Debug)]
pub struct ManifestAnalysis {
    pub results: Vec<Result<ImportProviders, AnalysisError>>,
}

impl ManifestAnalysis {
    /// Successfully analyzed imports.
    pub fn providers(&self) -> impl Iterator<Item = &ImportProviders> {
        self.results.iter().filter_map(|r| r.as_ref().ok())
    }

    /// Imports that failed validation.
    pub fn errors(&self) -> impl Iterator<Item = &AnalysisError> {
        self.results.iter().filter_map(|r| r.as_ref().err())
    }

    pub fn is_success(&self) -> bool {
        self.results.iter().all(Result::is_ok)
    }
}

/// Analyze every import of `manifest`.
///
/// Imports are independent: each is analyzed in parallel and a failing
/// import does not affect its siblings.
pub fn analyze_manifest(
    manifest: &ImportManifest,
    platform: &Platform,
) -> Result<ManifestAnalysis> {
    let specs = manifest.specs()?;
    tracing::debug!("Analyzing {} imports", specs.len());

    let results: Vec<_> = specs
        .into_par_iter()
        .map(|spec| analyze_import(spec, platform))
        .collect();

    let analysis = ManifestAnalysis { results };
    let failed = analysis.errors().count();
    if failed > 0 {
        tracing::info!(
            "{} of {} imports failed analysis",
            failed,
            analysis.results.len()
        );
    }

    Ok(analysis)
}

/// Analyze a single named import of `manifest`.
///
/// Validation failures are reported as the error's diagnostic text.
pub fn analyze_target(
    manifest: &ImportManifest,
    name: &str,
    platform: &Platform,
) -> Result<ImportProviders> {
    let entry = manifest.entry(name).ok_or_else(|| {
        anyhow!(
            "target `{}` not found\n{}",
            name,
            suggestions::TARGET_NOT_FOUND
        )
    })?;

    let spec = manifest.resolve(entry)?;
    analyze_import(spec, platform)
        .map_err(|e| anyhow!("{}", e.to_diagnostic().format(false).trim_end()))
}
