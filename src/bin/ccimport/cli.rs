//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use ccimport::core::TargetOs;

/// ccimport - link-input analysis for precompiled C/C++ libraries
#[derive(Parser)]
#[command(name = "ccimport")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Path to Imports.toml (or a directory containing one)
    #[arg(long, global = true)]
    pub manifest_path: Option<PathBuf>,

    /// Target triple to analyze for (e.g. x86_64-pc-windows-msvc)
    #[arg(long, global = true, env = "CCIMPORT_TARGET")]
    pub target_triple: Option<String>,

    /// CPU tag used for the runtime staging directory (e.g. k8)
    #[arg(long, global = true)]
    pub cpu: Option<String>,

    /// Target operating system (linux, macos, windows)
    #[arg(long, global = true)]
    pub os: Option<TargetOs>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate every cc_import of a manifest
    Check(CheckArgs),

    /// Show the link parameters of an import
    LinkParams(LinkParamsArgs),

    /// Show where a shared library is staged for execution
    Solib(SolibArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct CheckArgs {
    /// Manifest file, or a directory to search recursively for manifests
    pub path: Option<PathBuf>,
}

#[derive(Args)]
pub struct LinkParamsArgs {
    /// Import target name (defaults to every import of the manifest)
    pub target: Option<String>,

    /// Only show the mode with this `statically` value
    #[arg(long)]
    pub statically: Option<bool>,

    /// Only show the mode with this `shared_preferred` value
    #[arg(long)]
    pub shared_preferred: Option<bool>,

    /// Emit JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct SolibArgs {
    /// Label of the owning import target (e.g. //third_party/foo:foo)
    pub owner: String,

    /// Shared library: a label, or a file name in the owner's package
    pub library: String,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
