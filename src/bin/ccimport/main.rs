//! ccimport CLI - link-input analysis for precompiled C/C++ libraries

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ccimport::util::GlobalContext;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("ccimport=debug")
    } else {
        EnvFilter::new("ccimport=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    // Global flags override configuration files
    let mut ctx = GlobalContext::new()?;
    ctx.set_color(!cli.no_color);
    {
        let platform = &mut ctx.config_mut().platform;
        if cli.target_triple.is_some() {
            platform.triple = cli.target_triple;
        }
        if cli.cpu.is_some() {
            platform.cpu = cli.cpu;
        }
        if cli.os.is_some() {
            platform.os = cli.os;
        }
    }

    // Execute command
    match cli.command {
        Commands::Check(args) => commands::check::execute(&ctx, cli.manifest_path, args),
        Commands::LinkParams(args) => {
            commands::link_params::execute(&ctx, cli.manifest_path, args)
        }
        Commands::Solib(args) => commands::solib::execute(&ctx, args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
