//! # Show Command Implementation
//!
//! Prints the parsed origin, either as a human-readable summary grouped the
//! way the document is, or as JSON for scripts. This command never writes.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use super::Context;
use deploy_origin::origin::{CustomOrigin, Origin};
use deploy_origin::output::{heading, marker, Marker};
use deploy_origin::refspec::Refspec;

/// Show the origin
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Emit JSON instead of a text summary
    #[arg(long)]
    pub json: bool,
}

/// Machine-readable view of an origin
#[derive(Serialize)]
struct Summary<'a> {
    refspec: &'a Refspec,
    refspec_key: &'static str,
    override_commit: Option<&'a str>,
    override_commit_annotation: Option<&'a str>,
    custom_origin: Option<&'a CustomOrigin>,
    unconfigured_state: Option<&'a str>,
    requires_local_assembly: bool,
    packages: &'a BTreeSet<String>,
    local_packages: &'a BTreeMap<String, String>,
    overrides_remove: &'a BTreeSet<String>,
    overrides_local_replace: &'a BTreeMap<String, String>,
    regenerate_initramfs: bool,
    initramfs_args: &'a [String],
    initramfs_etc_files: &'a BTreeSet<String>,
    cliwrap: bool,
}

impl<'a> From<&'a Origin> for Summary<'a> {
    fn from(origin: &'a Origin) -> Self {
        Self {
            refspec: origin.refspec(),
            refspec_key: origin.refspec_key(),
            override_commit: origin.override_commit(),
            override_commit_annotation: origin.override_commit_annotation(),
            custom_origin: origin.custom_origin(),
            unconfigured_state: origin.unconfigured_state(),
            requires_local_assembly: origin.requires_local_assembly(),
            packages: origin.packages(),
            local_packages: origin.local_packages(),
            overrides_remove: origin.overrides_remove(),
            overrides_local_replace: origin.overrides_local_replace(),
            regenerate_initramfs: origin.regenerate_initramfs(),
            initramfs_args: origin.initramfs_args(),
            initramfs_etc_files: origin.initramfs_etc_files(),
            cliwrap: origin.cliwrap(),
        }
    }
}

/// Execute the `show` command.
pub fn execute(args: ShowArgs, ctx: &Context) -> Result<()> {
    let origin = ctx.load()?;

    if args.json {
        let summary = Summary::from(&origin);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    let out = &ctx.out;
    println!(
        "{} Origin: {}",
        marker(out, Marker::Info),
        ctx.origin_path.display()
    );
    println!();

    let refspec = origin.refspec();
    println!("{}", heading(out, "Source"));
    println!(
        "  {} ({}, stored as {})",
        refspec,
        refspec.kind(),
        origin.refspec_key()
    );
    if let Some(commit) = origin.override_commit() {
        match origin.override_commit_annotation() {
            Some(note) => println!("  Pinned: {commit} ({note})"),
            None => println!("  Pinned: {commit}"),
        }
    }
    if let Some(custom) = origin.custom_origin() {
        println!("  Custom origin: {} ({})", custom.url, custom.description);
    }
    if let Some(state) = origin.unconfigured_state() {
        println!("  Unconfigured: {state}");
    }

    if !origin.packages().is_empty() || !origin.local_packages().is_empty() {
        println!();
        println!("{}", heading(out, "Packages"));
        for pkg in origin.packages() {
            println!("  {pkg}");
        }
        for (nevra, sha256) in origin.local_packages() {
            println!("  {nevra} (local, {})", short_checksum(sha256));
        }
    }

    if !origin.overrides_remove().is_empty() || !origin.overrides_local_replace().is_empty() {
        println!();
        println!("{}", heading(out, "Overrides"));
        for pkg in origin.overrides_remove() {
            println!("  removed: {pkg}");
        }
        for (nevra, sha256) in origin.overrides_local_replace() {
            println!("  replaced: {nevra} ({})", short_checksum(sha256));
        }
    }

    if origin.regenerate_initramfs() || !origin.initramfs_etc_files().is_empty() {
        println!();
        println!("{}", heading(out, "Initramfs"));
        if origin.regenerate_initramfs() {
            if origin.initramfs_args().is_empty() {
                println!("  regenerate: yes");
            } else {
                println!(
                    "  regenerate: yes, args: {}",
                    origin.initramfs_args().join(" ")
                );
            }
        }
        for path in origin.initramfs_etc_files() {
            println!("  etc: {path}");
        }
    }

    if origin.cliwrap() {
        println!();
        println!("{}", heading(out, "CLI wrapping"));
        println!("  enabled");
    }

    Ok(())
}

fn short_checksum(sha256: &str) -> &str {
    sha256.get(..12).unwrap_or(sha256)
}
