//! # Cliwrap Command Implementation

use anyhow::Result;
use clap::{ArgAction, Args};

use super::Context;

/// Enable or disable CLI wrapping
#[derive(Args, Debug)]
pub struct CliwrapArgs {
    /// `true` to wrap package-manager CLIs in the deployment, `false` to stop
    #[arg(action = ArgAction::Set, value_name = "BOOL")]
    pub enabled: bool,
}

/// Execute the `cliwrap` command.
pub fn execute(args: CliwrapArgs, ctx: &Context) -> Result<()> {
    let mut origin = ctx.load()?;
    let changed = origin.cliwrap() != args.enabled;
    origin.set_cliwrap(args.enabled);
    let summary = if args.enabled {
        "Enabled CLI wrapping"
    } else {
        "Disabled CLI wrapping"
    };
    ctx.commit(&origin, changed, summary)
}
