//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the
//! `deploy-origin` command-line tool. Each subcommand is defined in its own
//! file.
//!
//! ## Structure
//!
//! Each command module typically contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and a [`Context`],
//!   loads the origin, applies one change through the `deploy_origin`
//!   library and hands the result back to [`Context::commit`].

pub mod cliwrap;
pub mod initramfs;
pub mod install;
pub mod overrides;
pub mod pin;
pub mod rebase;
pub mod reset_transient;
pub mod show;
pub mod uninstall;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context as _, Result};
use log::debug;

use deploy_origin::origin::Origin;
use deploy_origin::output::{marker, Marker, OutputConfig};

/// Settings shared by every subcommand, taken from the global flags
#[derive(Debug)]
pub struct Context {
    /// Origin file being read and rewritten
    pub origin_path: PathBuf,
    /// Print the new document instead of writing it
    pub dry_run: bool,
    pub out: OutputConfig,
}

impl Context {
    /// Read and parse the origin file.
    pub fn load(&self) -> Result<Origin> {
        let data = fs::read_to_string(&self.origin_path).with_context(|| {
            format!(
                "Failed to read origin file: {}",
                self.origin_path.display()
            )
        })?;
        let origin = Origin::from_data(&data).with_context(|| {
            format!("Invalid origin file: {}", self.origin_path.display())
        })?;
        debug!("Loaded origin from {}", self.origin_path.display());
        Ok(origin)
    }

    /// Persist `origin` if `changed`, reporting the outcome with `summary`.
    ///
    /// Under `--dry-run` the serialized document goes to stdout and the file
    /// is left untouched.
    pub fn commit(&self, origin: &Origin, changed: bool, summary: &str) -> Result<()> {
        if !changed {
            println!("{} No changes", marker(&self.out, Marker::Unchanged));
            return Ok(());
        }

        let data = origin.to_data();
        if self.dry_run {
            println!("{} {}", marker(&self.out, Marker::DryRun), summary);
            print!("{data}");
            return Ok(());
        }

        fs::write(&self.origin_path, data).with_context(|| {
            format!(
                "Failed to write origin file: {}",
                self.origin_path.display()
            )
        })?;
        println!("{} {}", marker(&self.out, Marker::Changed), summary);
        Ok(())
    }
}

/// Comma-separated list for status lines
pub(crate) fn join(items: &[String]) -> String {
    items.join(", ")
}
