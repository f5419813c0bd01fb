//! # Initramfs Command Implementations
//!
//! `initramfs` toggles client-side regeneration of the initramfs and its
//! extra arguments. `initramfs-etc` manages the set of `/etc` files copied
//! into it.

use anyhow::Result;
use clap::Args;

use super::{join, Context};

/// Enable or disable initramfs regeneration
#[derive(Args, Debug)]
pub struct InitramfsArgs {
    /// Regenerate the initramfs on the client
    #[arg(long, conflicts_with = "disable", required_unless_present = "disable")]
    pub enable: bool,

    /// Use the initramfs shipped with the base image
    #[arg(long)]
    pub disable: bool,

    /// Extra argument for the initramfs generator (repeatable)
    #[arg(long = "arg", value_name = "ARG", requires = "enable", allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Track or untrack /etc files in the initramfs
#[derive(Args, Debug)]
pub struct InitramfsEtcArgs {
    /// Start tracking a file (repeatable)
    #[arg(long, value_name = "PATH")]
    pub track: Vec<String>,

    /// Stop tracking a file (repeatable)
    #[arg(long, value_name = "PATH")]
    pub untrack: Vec<String>,

    /// Stop tracking every file
    #[arg(long, conflicts_with = "untrack")]
    pub untrack_all: bool,
}

/// Execute the `initramfs` command.
pub fn execute(args: InitramfsArgs, ctx: &Context) -> Result<()> {
    let mut origin = ctx.load()?;
    let changed = origin.regenerate_initramfs() != args.enable
        || origin.initramfs_args() != args.args.as_slice();
    origin.set_regenerate_initramfs(args.enable, &args.args);
    let summary = if args.enable {
        "Enabled initramfs regeneration"
    } else {
        "Disabled initramfs regeneration"
    };
    ctx.commit(&origin, changed, summary)
}

/// Execute the `initramfs-etc` command.
pub fn execute_etc(args: InitramfsEtcArgs, ctx: &Context) -> Result<()> {
    let mut origin = ctx.load()?;
    let mut changed = false;
    let mut notes = Vec::new();

    if args.untrack_all {
        changed |= origin.untrack_all_etc_files();
        notes.push("untracked all".to_string());
    } else if !args.untrack.is_empty() {
        changed |= origin.untrack_etc_files(&args.untrack);
        notes.push(format!("untracked {}", join(&args.untrack)));
    }
    if !args.track.is_empty() {
        changed |= origin.track_etc_files(&args.track);
        notes.push(format!("tracked {}", join(&args.track)));
    }

    ctx.commit(&origin, changed, &format!("Initramfs /etc files: {}", join(&notes)))
}
