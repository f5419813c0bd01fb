//! # Install Command Implementation
//!
//! Records package layering requests. Remote requests are names or
//! capabilities; `--local` requests are `sha256:NEVRA` strings for packages
//! supplied from local files.

use anyhow::Result;
use clap::Args;

use super::{join, Context};

/// Request packages to layer
#[derive(Args, Debug)]
pub struct InstallArgs {
    /// Packages or capabilities to request
    #[arg(required = true, value_name = "PACKAGE")]
    pub packages: Vec<String>,

    /// Treat each argument as a local package given as `sha256:NEVRA`
    #[arg(long)]
    pub local: bool,

    /// Skip packages that are already requested instead of failing
    #[arg(long)]
    pub allow_existing: bool,
}

/// Execute the `install` command.
pub fn execute(args: InstallArgs, ctx: &Context) -> Result<()> {
    let mut origin = ctx.load()?;
    let changed = origin.add_packages(&args.packages, args.local, args.allow_existing)?;
    let what = if args.local { "local package" } else { "package" };
    ctx.commit(
        &origin,
        changed,
        &format!("Requested {}: {}", what, join(&args.packages)),
    )
}
