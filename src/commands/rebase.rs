//! # Rebase Command Implementation
//!
//! Switches the origin to a new branch or commit. A custom origin (an
//! external URL plus a human description) may be attached, but only when the
//! target is a pinned commit checksum.

use anyhow::{bail, Result};
use clap::Args;

use super::Context;
use deploy_origin::origin::CustomOrigin;
use deploy_origin::refspec::{classify, RefspecKind};

/// Switch to a different branch or commit
#[derive(Args, Debug)]
pub struct RebaseArgs {
    /// New refspec: `remote:ref`, a bare ref, or a 64-character commit checksum
    #[arg(value_name = "REFSPEC")]
    pub refspec: String,

    /// URL describing where the commit came from
    #[arg(long, value_name = "URL", requires = "custom_description")]
    pub custom_url: Option<String>,

    /// Human-readable description of the custom origin
    #[arg(long, value_name = "TEXT", requires = "custom_url")]
    pub custom_description: Option<String>,
}

/// Execute the `rebase` command.
pub fn execute(args: RebaseArgs, ctx: &Context) -> Result<()> {
    let custom = match (args.custom_url, args.custom_description) {
        (Some(url), Some(description)) => {
            if url.is_empty() || description.is_empty() {
                bail!("--custom-url and --custom-description must not be empty");
            }
            if classify(&args.refspec)?.kind() != RefspecKind::Commit {
                bail!("A custom origin requires a commit checksum, not '{}'", args.refspec);
            }
            Some(CustomOrigin::new(url, description))
        }
        _ => None,
    };

    let mut origin = ctx.load()?;
    let previous = origin.refspec().to_string();
    origin.rebase_custom(&args.refspec, custom.as_ref())?;
    let current = origin.refspec().to_string();
    ctx.commit(
        &origin,
        true,
        &format!("Rebased from {previous} to {current}"),
    )
}
