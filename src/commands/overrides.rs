//! # Override Command Implementation
//!
//! Manages base package overrides: removing base packages by name,
//! replacing them with local `sha256:NEVRA` packages, and resetting either.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use super::{join, Context};
use deploy_origin::origin::OverrideKind;

/// Manage base package overrides
#[derive(Args, Debug)]
pub struct OverrideArgs {
    #[command(subcommand)]
    pub action: OverrideAction,
}

#[derive(Subcommand, Debug)]
pub enum OverrideAction {
    /// Remove base packages by name
    Remove {
        #[arg(required = true, value_name = "PACKAGE")]
        packages: Vec<String>,
    },

    /// Replace base packages with local packages given as `sha256:NEVRA`
    Replace {
        #[arg(required = true, value_name = "SHA256:NEVRA")]
        packages: Vec<String>,
    },

    /// Drop overrides
    Reset {
        /// Package names to reset (NEVRAs with --replaced)
        #[arg(value_name = "PACKAGE", required_unless_present = "all")]
        packages: Vec<String>,

        /// Reset local replacements instead of removals
        #[arg(long)]
        replaced: bool,

        /// Drop every override of both kinds
        #[arg(long, conflicts_with_all = ["packages", "replaced"])]
        all: bool,
    },
}

/// Execute the `override` command.
pub fn execute(args: OverrideArgs, ctx: &Context) -> Result<()> {
    let mut origin = ctx.load()?;

    match args.action {
        OverrideAction::Remove { packages } => {
            origin.add_overrides(&packages, OverrideKind::RemoveBase)?;
            ctx.commit(
                &origin,
                true,
                &format!("Overrode (removed): {}", join(&packages)),
            )
        }
        OverrideAction::Replace { packages } => {
            origin.add_overrides(&packages, OverrideKind::ReplaceLocal)?;
            ctx.commit(
                &origin,
                true,
                &format!("Overrode (replaced): {}", join(&packages)),
            )
        }
        OverrideAction::Reset { all: true, .. } => {
            let changed = origin.remove_all_overrides();
            ctx.commit(&origin, changed, "Reset all overrides")
        }
        OverrideAction::Reset {
            packages, replaced, ..
        } => {
            let kind = if replaced {
                OverrideKind::ReplaceLocal
            } else {
                OverrideKind::RemoveBase
            };
            let missing: Vec<String> = packages
                .iter()
                .filter(|pkg| !origin.remove_override(pkg, kind))
                .cloned()
                .collect();
            if !missing.is_empty() {
                bail!("No {} override for: {}", kind, join(&missing));
            }
            ctx.commit(
                &origin,
                true,
                &format!("Reset {} overrides: {}", kind, join(&packages)),
            )
        }
    }
}
