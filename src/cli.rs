//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};

use crate::commands::{self, Context};
use deploy_origin::output::OutputConfig;

/// Deployment origin editor - inspect and change how a deployment is derived
#[derive(Parser, Debug)]
#[command(name = "deploy-origin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Origin key file to operate on
    #[arg(
        short = 'f',
        long,
        global = true,
        value_name = "FILE",
        env = "DEPLOY_ORIGIN_FILE"
    )]
    origin: Option<PathBuf>,

    /// Print the resulting origin instead of writing it back
    #[arg(long, global = true)]
    dry_run: bool,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the origin
    Show(commands::show::ShowArgs),

    /// Request packages to layer
    Install(commands::install::InstallArgs),

    /// Drop layered package requests
    Uninstall(commands::uninstall::UninstallArgs),

    /// Manage base package overrides
    Override(commands::overrides::OverrideArgs),

    /// Switch to a different branch or commit
    Rebase(commands::rebase::RebaseArgs),

    /// Pin the deployment to a specific commit
    Pin(commands::pin::PinArgs),

    /// Drop a pinned commit
    Unpin,

    /// Enable or disable initramfs regeneration
    Initramfs(commands::initramfs::InitramfsArgs),

    /// Track or untrack /etc files in the initramfs
    InitramfsEtc(commands::initramfs::InitramfsEtcArgs),

    /// Enable or disable CLI wrapping
    Cliwrap(commands::cliwrap::CliwrapArgs),

    /// Strip per-deployment state so the origin can seed a new deployment
    ResetTransient,
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        init_logging(&self.log_level);

        let origin_path = self.origin.ok_or_else(|| {
            anyhow!("No origin file given; pass --origin <FILE> or set DEPLOY_ORIGIN_FILE")
        })?;
        let ctx = Context {
            origin_path,
            dry_run: self.dry_run,
            out: OutputConfig::from_env_and_flag(&self.color),
        };

        match self.command {
            Commands::Show(args) => commands::show::execute(args, &ctx),
            Commands::Install(args) => commands::install::execute(args, &ctx),
            Commands::Uninstall(args) => commands::uninstall::execute(args, &ctx),
            Commands::Override(args) => commands::overrides::execute(args, &ctx),
            Commands::Rebase(args) => commands::rebase::execute(args, &ctx),
            Commands::Pin(args) => commands::pin::execute(args, &ctx),
            Commands::Unpin => commands::pin::execute_unpin(&ctx),
            Commands::Initramfs(args) => commands::initramfs::execute(args, &ctx),
            Commands::InitramfsEtc(args) => commands::initramfs::execute_etc(args, &ctx),
            Commands::Cliwrap(args) => commands::cliwrap::execute(args, &ctx),
            Commands::ResetTransient => commands::reset_transient::execute(&ctx),
        }
    }
}

/// Install `env_logger`, letting `RUST_LOG` override `--log-level`
fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}
