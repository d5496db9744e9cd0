//! The deployment pipeline: fleet-wide stage barriers, convergence wait,
//! validation, rollback decision.
//!
//! Every stage is a barrier. All hosts run a stage concurrently, and no host
//! enters the next stage until every host has finished the current one. A
//! failure in a pre-deployment stage aborts the whole run; validation failures
//! aggregate into a single fleet-wide rollback decision instead.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use confleet_common::{PipelineStage, RollbackDecision, RunReport, StageResult};
use futures_util::future::join_all;

use crate::application::ports::{
    ArtifactStore, CheckProvider, DeviceGateway, ProgressReporter, TemplateRenderer,
};
use crate::application::services::validate::ValidationSuite;
use crate::application::services::{rollback, stages, validate};
use crate::application::services::stages::HostRun;
use crate::domain::{Host, RollbackError};

/// Default settling time between the real deployment and validation, matching
/// typical IGP adjacency re-establishment.
pub const DEFAULT_CONVERGENCE_DELAY: Duration = Duration::from_secs(10);

/// Knobs for one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Wait between DEPLOY and validation.
    pub convergence_delay: Duration,
    /// Stop after the dry-run push, leaving devices untouched.
    pub stop_after_dry_run: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            convergence_delay: DEFAULT_CONVERGENCE_DELAY,
            stop_after_dry_run: false,
        }
    }
}

/// Terminal state of a pipeline run.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Deployed and validated clean.
    Done,
    /// Stopped after the dry-run push; no device was modified.
    DryRun,
    /// A pre-deployment stage failed on at least one host.
    Aborted { stage: PipelineStage },
    /// Validation failed; backups were redeployed fleet-wide. Any per-host
    /// push failures during rollback are carried here.
    RolledBack { push_failures: Vec<RollbackError> },
}

/// What to do to one host in a pre-validation stage.
#[derive(Debug, Clone, Copy)]
enum StageAction {
    Render,
    WriteConfig,
    Backup,
    WriteBackup,
    Deploy { dry_run: bool },
}

async fn apply_stage(
    action: StageAction,
    gateway: &impl DeviceGateway,
    renderer: &impl TemplateRenderer,
    store: &impl ArtifactStore,
    run: &mut HostRun,
) -> Result<()> {
    match action {
        StageAction::Render => stages::render_host(renderer, run).await,
        StageAction::WriteConfig => stages::write_config(store, run).await,
        StageAction::Backup => stages::backup_host(gateway, run).await,
        StageAction::WriteBackup => stages::write_backup(store, run).await,
        StageAction::Deploy { dry_run } => stages::deploy_host(gateway, store, run, dry_run).await,
    }
}

/// Run one stage across the fleet and record per-host results. Returns
/// whether every host succeeded.
async fn run_stage(
    stage: PipelineStage,
    action: StageAction,
    gateway: &impl DeviceGateway,
    renderer: &impl TemplateRenderer,
    store: &impl ArtifactStore,
    reporter: &impl ProgressReporter,
    runs: &mut [HostRun],
) -> bool {
    reporter.step(stage.label());
    let results = join_all(runs.iter_mut().map(|run| async move {
        let result = apply_stage(action, gateway, renderer, store, run).await;
        let record = match &result {
            Ok(()) => StageResult::ok(stage, &run.host.hostname),
            Err(err) => StageResult::failed(stage, &run.host.hostname, format!("{err:#}")),
        };
        run.outcome.stages.push(record);
        result.is_ok()
    }))
    .await;

    let all_ok = results.iter().all(|ok| *ok);
    if all_ok {
        reporter.success(&format!("{} complete", stage.label()));
    }
    all_ok
}

/// Run both validation engines across the fleet, one barrier per engine.
async fn run_validation(
    gateway: &impl DeviceGateway,
    reporter: &impl ProgressReporter,
    suite: &ValidationSuite,
    runs: &mut [HostRun],
    report: &mut RunReport,
) {
    reporter.step(PipelineStage::ValidateDeclarative.label());
    let declarative = join_all(runs.iter_mut().map(|run| async move {
        let checks = suite
            .declarative
            .get(&run.host.hostname)
            .map_or(&[][..], Vec::as_slice);
        let host_report = validate::declarative_report(gateway, &run.host, checks).await;
        run.outcome
            .stages
            .push(StageResult::ok(PipelineStage::ValidateDeclarative, &run.host.hostname));
        (run.host.hostname.clone(), host_report)
    }))
    .await;
    report.declarative = declarative.into_iter().collect();

    reporter.step(PipelineStage::ValidateImperative.label());
    let imperative = join_all(runs.iter_mut().map(|run| async move {
        let checks = suite
            .imperative
            .get(&run.host.hostname)
            .map_or(&[][..], Vec::as_slice);
        let host_report = validate::imperative_report(gateway, &run.host, checks).await;
        run.outcome
            .stages
            .push(StageResult::ok(PipelineStage::ValidateImperative, &run.host.hostname));
        (run.host.hostname.clone(), host_report)
    }))
    .await;
    report.imperative = imperative.into_iter().collect();
}

fn finish(runs: Vec<HostRun>, mut report: RunReport, decision: RollbackDecision) -> RunReport {
    report.decision = decision;
    report.hosts = runs
        .into_iter()
        .map(|run| (run.host.hostname, run.outcome))
        .collect();
    report
}

/// Execute the full pipeline for a fleet of hosts.
///
/// The validation suite is loaded and resolved up front so a malformed check
/// file aborts the run before any device is contacted.
pub async fn run(
    gateway: &impl DeviceGateway,
    renderer: &impl TemplateRenderer,
    store: &impl ArtifactStore,
    checks: &impl CheckProvider,
    reporter: &impl ProgressReporter,
    hosts: Vec<Host>,
    config: &PipelineConfig,
) -> Result<(PipelineOutcome, RunReport)> {
    let suite = validate::load_suite(checks, &hosts, reporter)
        .await
        .context("loading validation checks")?;

    let mut report = RunReport::new(Utc::now());
    let mut runs: Vec<HostRun> = hosts.into_iter().map(HostRun::new).collect();

    let plan = [
        (PipelineStage::Render, StageAction::Render),
        (PipelineStage::WriteConfig, StageAction::WriteConfig),
        (PipelineStage::Backup, StageAction::Backup),
        (PipelineStage::WriteBackup, StageAction::WriteBackup),
        (PipelineStage::DeployDryRun, StageAction::Deploy { dry_run: true }),
        (PipelineStage::DeployReal, StageAction::Deploy { dry_run: false }),
    ];
    for (stage, action) in plan {
        if stage == PipelineStage::DeployReal && config.stop_after_dry_run {
            let report = finish(runs, report, RollbackDecision::default());
            return Ok((PipelineOutcome::DryRun, report));
        }
        let all_ok = run_stage(stage, action, gateway, renderer, store, reporter, &mut runs).await;
        if !all_ok && stage.aborts_on_failure() {
            let report = finish(runs, report, RollbackDecision::default());
            return Ok((PipelineOutcome::Aborted { stage }, report));
        }
    }

    reporter.begin_wait(&format!(
        "waiting {}s for the network to converge",
        config.convergence_delay.as_secs()
    ));
    tokio::time::sleep(config.convergence_delay).await;
    reporter.end_wait();

    run_validation(gateway, reporter, &suite, &mut runs, &mut report).await;

    reporter.step(PipelineStage::Decide.label());
    let decision = rollback::decide(&report.declarative, &report.imperative, reporter);

    if decision.rollback_required() {
        reporter.warn(&format!(
            "{} check(s) failed; rolling back the whole fleet",
            decision.failed.len()
        ));
        let fleet: Vec<Host> = runs.iter().map(|run| run.host.clone()).collect();
        let push_failures = rollback::rollback_fleet(gateway, store, &fleet, reporter).await;
        let report = finish(runs, report, decision);
        return Ok((PipelineOutcome::RolledBack { push_failures }, report));
    }

    reporter.success("all checks passed");
    let report = finish(runs, report, decision);
    Ok((PipelineOutcome::Done, report))
}
