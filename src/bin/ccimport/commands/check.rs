//! `ccimport check` command

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::cli::CheckArgs;
use ccimport::core::ImportManifest;
use ccimport::ops::analyze_manifest;
use ccimport::util::diagnostic::{emit, suggestions, Diagnostic};
use ccimport::util::fs::find_manifests;
use ccimport::util::GlobalContext;

pub fn execute(
    ctx: &GlobalContext,
    manifest_path: Option<PathBuf>,
    args: CheckArgs,
) -> Result<()> {
    let platform = ctx.platform()?;

    let manifests = match args.path.or(manifest_path) {
        Some(path) if ctx.cwd().join(&path).is_dir() => {
            let found = find_manifests(&ctx.cwd().join(&path))?;
            if found.is_empty() {
                bail!(
                    "no Imports.toml found under {}\n{}",
                    path.display(),
                    suggestions::NO_MANIFEST
                );
            }
            found
        }
        Some(path) => vec![ctx.cwd().join(path)],
        None => match ctx.find_manifest() {
            Ok(path) => vec![path],
            Err(e) => bail!("{}\n{}", e, suggestions::NO_MANIFEST),
        },
    };

    tracing::debug!("Checking {} manifest(s) for {}", manifests.len(), platform);

    let mut checked = 0;
    let mut failed = 0;

    for manifest_path in &manifests {
        let manifest = ImportManifest::load(manifest_path)?;
        let analysis = analyze_manifest(&manifest, &platform)?;

        for result in &analysis.results {
            checked += 1;
            match result {
                Ok(providers) => {
                    eprintln!("     Checked {}", providers.label);
                }
                Err(err) => {
                    failed += 1;
                    let diag: Diagnostic = err.to_diagnostic().with_location(manifest_path);
                    emit(&diag, ctx.use_color());
                }
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} import(s) failed analysis", failed, checked);
    }

    eprintln!("    Finished {} import(s) valid for {}", checked, platform);
    Ok(())
}
