//! `ccimport link-params` command

use std::path::PathBuf;

use anyhow::{bail, Result};

use crate::cli::LinkParamsArgs;
use ccimport::builder::{LinkParams, LinkingMode};
use ccimport::core::ImportManifest;
use ccimport::ops::{analyze_manifest, analyze_target, ImportProviders};
use ccimport::util::diagnostic::emit;
use ccimport::util::GlobalContext;

pub fn execute(
    ctx: &GlobalContext,
    manifest_path: Option<PathBuf>,
    args: LinkParamsArgs,
) -> Result<()> {
    let platform = ctx.platform()?;
    let manifest_path = ctx.manifest_path(manifest_path.as_deref())?;
    let manifest = ImportManifest::load(&manifest_path)?;

    let providers = match &args.target {
        Some(name) => vec![analyze_target(&manifest, name, &platform)?],
        None => {
            let analysis = analyze_manifest(&manifest, &platform)?;
            for err in analysis.errors() {
                emit(&err.to_diagnostic().with_location(&manifest_path), ctx.use_color());
            }
            if !analysis.is_success() {
                bail!("could not compute link parameters: some imports failed analysis");
            }
            analysis.providers().cloned().collect()
        }
    };

    let modes = selected_modes(&args);

    if args.json || ctx.config().json_output() {
        let json: Vec<_> = providers.iter().map(|p| to_json(p, &modes)).collect();
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    for p in &providers {
        println!("{}", p.label);
        for mode in &modes {
            print_mode(*mode, p.link_params.for_mode(*mode));
        }
        if !p.compilation.declared_include_srcs.is_empty() {
            println!("  headers:");
            for hdr in &p.compilation.declared_include_srcs {
                println!("    {}", hdr);
            }
        }
    }

    Ok(())
}

/// Modes to display: all four unless a flag narrows them down.
fn selected_modes(args: &LinkParamsArgs) -> Vec<LinkingMode> {
    LinkingMode::ALL
        .into_iter()
        .filter(|m| args.statically.map_or(true, |s| m.statically == s))
        .filter(|m| args.shared_preferred.map_or(true, |s| m.shared_preferred == s))
        .collect()
}

fn print_mode(mode: LinkingMode, params: &LinkParams) {
    println!("  [{}]", mode);
    if params.libraries.is_empty() {
        println!("    (no link libraries)");
    }
    for lib in &params.libraries {
        println!("    link:    {} ({})", lib.artifact, lib.category);
    }
    for staged in &params.execution_dynamic_libraries {
        println!("    runtime: {}", staged);
    }
}

fn to_json(p: &ImportProviders, modes: &[LinkingMode]) -> serde_json::Value {
    let modes: Vec<_> = modes
        .iter()
        .map(|mode| {
            serde_json::json!({
                "statically": mode.statically,
                "shared_preferred": mode.shared_preferred,
                "params": p.link_params.for_mode(*mode),
            })
        })
        .collect();

    serde_json::json!({
        "label": p.label,
        "modes": modes,
        "hdrs": p.compilation.declared_include_srcs,
    })
}
