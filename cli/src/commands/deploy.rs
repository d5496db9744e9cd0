//! `confleet deploy` — run the full pipeline against the fleet.

use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::{AppContext, OutputMode};
use crate::application::services::pipeline::{self, PipelineConfig, PipelineOutcome};
use crate::commands::{
    self, FleetArgs, print_failed_checks, print_push_failures, print_stage_failures,
};
use crate::infra::{DirArtifactStore, DirCheckSource, DriverClient, RenderClient, load_inventory};
use crate::output::TerminalReporter;

/// Arguments for the deploy command.
#[derive(Args, Debug)]
pub struct DeployArgs {
    #[command(flatten)]
    pub fleet: FleetArgs,

    /// Base URL of the templating service
    #[arg(long, env = "CONFLEET_RENDER_URL")]
    pub render_url: String,

    /// Stop after the dry-run push; no device is modified
    #[arg(long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Settling time in seconds between deployment and validation
    #[arg(long, default_value_t = 10)]
    pub settle: u64,
}

/// Run `confleet deploy`.
///
/// Exit contract: 0 on full success (or a clean dry-run), 2 when validation
/// failed but the fleet-wide rollback succeeded, 1 for everything else.
///
/// # Errors
///
/// Returns an error when the inventory or a check file is unusable; pipeline
/// failures past that point are reported through the exit code instead.
pub async fn run(ctx: &AppContext, args: &DeployArgs) -> Result<ExitCode> {
    let hosts = load_inventory(&args.fleet.inventory)?;

    if !args.dry_run && !args.yes && !ctx.non_interactive {
        let prompt = format!("Deploy to {} host(s)?", hosts.len());
        if !commands::confirm(&prompt)? {
            ctx.output.info("Cancelled.");
            return Ok(ExitCode::from(1));
        }
    }

    let gateway = DriverClient::new(&args.fleet.driver_url);
    let renderer = RenderClient::new(&args.render_url);
    let store = DirArtifactStore::with_root(args.fleet.artifacts_dir.clone());
    let checks = DirCheckSource::with_dir(args.fleet.checks_dir.clone());
    let reporter = TerminalReporter::new(&ctx.output);

    let config = PipelineConfig {
        convergence_delay: Duration::from_secs(args.settle),
        stop_after_dry_run: args.dry_run,
    };

    let (outcome, report) =
        pipeline::run(&gateway, &renderer, &store, &checks, &reporter, hosts, &config).await?;

    if ctx.mode == OutputMode::Json {
        commands::print_report_json(&report)?;
    }

    match &outcome {
        PipelineOutcome::Done => {
            ctx.output.success("deployment complete, all checks passed");
        }
        PipelineOutcome::DryRun => {
            for (hostname, host_outcome) in &report.hosts {
                if let Some(diff) = &host_outcome.last_diff {
                    ctx.output.header(hostname);
                    if !ctx.output.quiet {
                        println!("{diff}");
                    }
                }
            }
            ctx.output.success("dry run complete, no device was modified");
        }
        PipelineOutcome::Aborted { stage } => {
            print_stage_failures(&ctx.output, &report);
            ctx.output
                .error(&format!("deployment aborted during {}", stage.label()));
        }
        PipelineOutcome::RolledBack { push_failures } => {
            print_failed_checks(&ctx.output, &report.decision);
            if push_failures.is_empty() {
                ctx.output
                    .warn("validation failed; backups were redeployed fleet-wide");
            } else {
                print_push_failures(&ctx.output, push_failures);
                ctx.output
                    .error("validation failed AND some rollback pushes failed; manual recovery required");
            }
        }
    }
    Ok(ExitCode::from(exit_status(&outcome)))
}

/// Exit status of a finished pipeline: 0 for success or a clean dry-run, 2
/// when validation failed but every rollback push landed, 1 otherwise.
fn exit_status(outcome: &PipelineOutcome) -> u8 {
    match outcome {
        PipelineOutcome::Done | PipelineOutcome::DryRun => 0,
        PipelineOutcome::RolledBack { push_failures } if push_failures.is_empty() => 2,
        PipelineOutcome::Aborted { .. } | PipelineOutcome::RolledBack { .. } => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RollbackError;
    use confleet_common::PipelineStage;

    fn push_failure() -> RollbackError {
        RollbackError::PushFailed {
            hostname: "leaf1".into(),
            message: "device unreachable".into(),
        }
    }

    #[test]
    fn success_and_dry_run_exit_zero() {
        assert_eq!(exit_status(&PipelineOutcome::Done), 0);
        assert_eq!(exit_status(&PipelineOutcome::DryRun), 0);
    }

    #[test]
    fn abort_exits_one() {
        let outcome = PipelineOutcome::Aborted {
            stage: PipelineStage::Backup,
        };
        assert_eq!(exit_status(&outcome), 1);
    }

    #[test]
    fn clean_rollback_exits_two() {
        let outcome = PipelineOutcome::RolledBack {
            push_failures: Vec::new(),
        };
        assert_eq!(exit_status(&outcome), 2);
    }

    #[test]
    fn failed_rollback_push_exits_one() {
        let outcome = PipelineOutcome::RolledBack {
            push_failures: vec![push_failure()],
        };
        assert_eq!(exit_status(&outcome), 1);
    }
}
