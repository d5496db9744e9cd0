//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::AppContext;
use crate::commands;

/// Fleet configuration deployment with validation and rollback
#[derive(Parser)]
#[command(
    name = "confleet",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Render, back up, deploy, validate, and roll back on failure
    Deploy(commands::deploy::DeployArgs),

    /// Render configurations into the configs bucket only
    Render(commands::render::RenderArgs),

    /// Capture pre-deployment backups only
    Backup(commands::backup::BackupArgs),

    /// Run both validation engines without deploying
    Validate(commands::validate::ValidateArgs),

    /// Redeploy stored backups fleet-wide
    Rollback(commands::rollback::RollbackArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails before producing an exit code.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            command,
        } = self;
        let ctx = AppContext::new(json, quiet, no_color);

        match command {
            Command::Deploy(args) => commands::deploy::run(&ctx, &args).await,
            Command::Render(args) => commands::render::run(&ctx, &args).await,
            Command::Backup(args) => commands::backup::run(&ctx, &args).await,
            Command::Validate(args) => commands::validate::run(&ctx, &args).await,
            Command::Rollback(args) => commands::rollback::run(&ctx, &args).await,
            Command::Version => {
                commands::version::run(json);
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}
