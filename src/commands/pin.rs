//! # Pin and Unpin Command Implementations
//!
//! Pinning records an override commit, the exact checksum the deployment
//! must use instead of the branch head, optionally annotated with a version.

use anyhow::{bail, Result};
use clap::Args;

use super::Context;
use deploy_origin::nevra::is_sha256;

/// Pin the deployment to a specific commit
#[derive(Args, Debug)]
pub struct PinArgs {
    /// Commit checksum (64 lowercase hex characters)
    #[arg(value_name = "CHECKSUM")]
    pub checksum: String,

    /// Version string to annotate the pin with
    #[arg(long, value_name = "VERSION")]
    pub version: Option<String>,
}

/// Execute the `pin` command.
pub fn execute(args: PinArgs, ctx: &Context) -> Result<()> {
    if !is_sha256(&args.checksum) {
        bail!("Invalid commit checksum: {}", args.checksum);
    }

    let mut origin = ctx.load()?;
    let before = origin.to_data();
    origin.set_override_commit(Some(&args.checksum), args.version.as_deref());
    let changed = origin.to_data() != before;
    ctx.commit(&origin, changed, &format!("Pinned to {}", args.checksum))
}

/// Execute the `unpin` command.
pub fn execute_unpin(ctx: &Context) -> Result<()> {
    let mut origin = ctx.load()?;
    let changed = origin.override_commit().is_some();
    origin.set_override_commit(None, None);
    ctx.commit(&origin, changed, "Unpinned")
}
