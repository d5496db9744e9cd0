//! Command implementations

pub mod backup;
pub mod deploy;
pub mod render;
pub mod rollback;
pub mod validate;
pub mod version;

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use confleet_common::{RollbackDecision, RunReport};

use crate::domain::RollbackError;
use crate::output::OutputContext;

/// Arguments shared by every fleet-touching command.
#[derive(Args, Debug)]
pub struct FleetArgs {
    /// Inventory file
    #[arg(long, default_value = "inventory.yaml")]
    pub inventory: PathBuf,

    /// Directory holding per-host check files
    #[arg(long, default_value = "checks")]
    pub checks_dir: PathBuf,

    /// Root directory for the configs/backup/diffs artifact buckets
    #[arg(long, default_value = ".")]
    pub artifacts_dir: PathBuf,

    /// Base URL of the device-driver service
    #[arg(long, env = "CONFLEET_DRIVER_URL")]
    pub driver_url: String,
}

/// Ask for confirmation before touching devices.
pub(crate) fn confirm(prompt: &str) -> Result<bool> {
    Ok(dialoguer::Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

/// Print every failed stage, per host, in execution order.
pub(crate) fn print_stage_failures(ctx: &OutputContext, report: &RunReport) {
    for (hostname, outcome) in &report.hosts {
        for stage in outcome.stages.iter().filter(|s| !s.is_ok()) {
            let detail = stage.error.as_deref().unwrap_or("unknown failure");
            ctx.error(&format!("{hostname}: {} failed: {detail}", stage.stage.label()));
        }
    }
}

/// Print every (host, check) pair that failed validation.
pub(crate) fn print_failed_checks(ctx: &OutputContext, decision: &RollbackDecision) {
    for (hostname, check) in &decision.failed {
        ctx.error(&format!("{hostname}: check '{check}' failed"));
    }
}

/// Print rollback push failures. These are terminal; nothing recovers them.
pub(crate) fn print_push_failures(ctx: &OutputContext, failures: &[RollbackError]) {
    for failure in failures {
        ctx.error(&failure.to_string());
    }
}

/// Print the machine-readable run report.
pub(crate) fn print_report_json(report: &RunReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}
