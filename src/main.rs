//! # Deployment Origin CLI
//!
//! This is the binary entry point for the `deploy-origin` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Executing the appropriate command based on the parsed arguments.
//! - Handling top-level application errors and translating them into user-friendly
//!   output.
//!
//! The origin model itself lives in the `deploy_origin` library; the binary
//! only loads an origin file, applies one change and writes it back.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
