//! `ccimport solib` command

use anyhow::{Context, Result};

use crate::cli::SolibArgs;
use ccimport::builder::mangle;
use ccimport::core::{classify, Label, LibraryArtifact, LibraryRole};
use ccimport::util::GlobalContext;

pub fn execute(ctx: &GlobalContext, args: SolibArgs) -> Result<()> {
    let platform = ctx.platform()?;

    let owner: Label = args
        .owner
        .parse()
        .with_context(|| format!("invalid owner label `{}`", args.owner))?;

    let library_label = if args.library.starts_with("//") || args.library.starts_with('@') {
        args.library.parse::<Label>()
    } else {
        owner.sibling(args.library.as_str())
    }
    .with_context(|| format!("invalid library `{}`", args.library))?;

    let library = LibraryArtifact::source(library_label);

    if let Err(e) = classify(LibraryRole::Shared, library.file_name()) {
        tracing::warn!("{} is not a shared library ({})", library.label(), e);
    }

    let staged = mangle(&owner, &library, &platform);
    println!("{}", staged);

    Ok(())
}
