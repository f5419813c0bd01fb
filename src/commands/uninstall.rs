//! # Uninstall Command Implementation
//!
//! Drops layering requests. Arguments match a local request by NEVRA, a
//! remote request by exact string, or a local request by bare package name.

use anyhow::{bail, Result};
use clap::Args;

use super::{join, Context};

/// Drop layered package requests
#[derive(Args, Debug)]
pub struct UninstallArgs {
    /// Packages to drop
    #[arg(value_name = "PACKAGE", required_unless_present = "all")]
    pub packages: Vec<String>,

    /// Drop every layered package request
    #[arg(long, conflicts_with = "packages")]
    pub all: bool,

    /// Ignore packages that are not requested
    #[arg(long)]
    pub allow_noent: bool,
}

/// Execute the `uninstall` command.
pub fn execute(args: UninstallArgs, ctx: &Context) -> Result<()> {
    let mut origin = ctx.load()?;

    if args.all {
        let changed = origin.remove_all_packages();
        return ctx.commit(&origin, changed, "Dropped all package requests");
    }

    if args.packages.is_empty() {
        bail!("No packages given");
    }
    let changed = origin.remove_packages(&args.packages, args.allow_noent)?;
    ctx.commit(
        &origin,
        changed,
        &format!("Dropped package requests: {}", join(&args.packages)),
    )
}
