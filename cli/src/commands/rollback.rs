//! `confleet rollback` — redeploy stored backups fleet-wide.
//!
//! Manual escape hatch for when a previous run deployed but could not roll
//! back, or when validation was skipped and the change turned out bad.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::rollback;
use crate::commands::{self, FleetArgs, print_push_failures};
use crate::infra::{DirArtifactStore, DriverClient, load_inventory};
use crate::output::TerminalReporter;

/// Arguments for the rollback command.
#[derive(Args, Debug)]
pub struct RollbackArgs {
    #[command(flatten)]
    pub fleet: FleetArgs,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Run `confleet rollback`.
///
/// # Errors
///
/// Returns an error when the inventory is unusable; per-host push failures
/// are reported and drive a non-zero exit instead.
pub async fn run(ctx: &AppContext, args: &RollbackArgs) -> Result<ExitCode> {
    let hosts = load_inventory(&args.fleet.inventory)?;

    if !args.yes && !ctx.non_interactive {
        let prompt = format!("Redeploy stored backups to {} host(s)?", hosts.len());
        if !commands::confirm(&prompt)? {
            ctx.output.info("Cancelled.");
            return Ok(ExitCode::from(1));
        }
    }

    let gateway = DriverClient::new(&args.fleet.driver_url);
    let store = DirArtifactStore::with_root(args.fleet.artifacts_dir.clone());
    let reporter = TerminalReporter::new(&ctx.output);

    let failures = rollback::rollback_fleet(&gateway, &store, &hosts, &reporter).await;
    if failures.is_empty() {
        ctx.output.success("backups redeployed fleet-wide");
        Ok(ExitCode::SUCCESS)
    } else {
        print_push_failures(&ctx.output, &failures);
        ctx.output.error("some rollback pushes failed; manual recovery required");
        Ok(ExitCode::from(1))
    }
}
