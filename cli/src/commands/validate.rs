//! `confleet validate` — run both validation engines without deploying.
//!
//! Useful after a manual change or a previous run's rollback: it reports what
//! a deployment's DECIDE stage would conclude right now.

use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use confleet_common::RunReport;
use futures_util::future::join_all;

use crate::app::{AppContext, OutputMode};
use crate::application::services::{rollback, validate};
use crate::commands::{self, FleetArgs, print_failed_checks};
use crate::infra::{DirCheckSource, DriverClient, load_inventory};
use crate::output::TerminalReporter;

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub fleet: FleetArgs,
}

/// Run `confleet validate`.
///
/// # Errors
///
/// Returns an error when the inventory or a check file is unusable.
pub async fn run(ctx: &AppContext, args: &ValidateArgs) -> Result<ExitCode> {
    let hosts = load_inventory(&args.fleet.inventory)?;
    let gateway = DriverClient::new(&args.fleet.driver_url);
    let checks = DirCheckSource::with_dir(args.fleet.checks_dir.clone());
    let reporter = TerminalReporter::new(&ctx.output);

    let suite = validate::load_suite(&checks, &hosts, &reporter).await?;
    let mut report = RunReport::new(Utc::now());

    report.declarative = join_all(hosts.iter().map(|host| {
        let gateway = &gateway;
        let suite = &suite;
        async move {
            let checks = suite
                .declarative
                .get(&host.hostname)
                .map_or(&[][..], Vec::as_slice);
            (
                host.hostname.clone(),
                validate::declarative_report(gateway, host, checks).await,
            )
        }
    }))
    .await
    .into_iter()
    .collect();

    report.imperative = join_all(hosts.iter().map(|host| {
        let gateway = &gateway;
        let suite = &suite;
        async move {
            let checks = suite
                .imperative
                .get(&host.hostname)
                .map_or(&[][..], Vec::as_slice);
            (
                host.hostname.clone(),
                validate::imperative_report(gateway, host, checks).await,
            )
        }
    }))
    .await
    .into_iter()
    .collect();

    report.decision = rollback::decide(&report.declarative, &report.imperative, &reporter);
    let failed = report.decision.rollback_required();

    if ctx.mode == OutputMode::Json {
        commands::print_report_json(&report)?;
    } else if failed {
        print_failed_checks(&ctx.output, &report.decision);
        ctx.output.warn(&format!(
            "{} check(s) failed; a deployment would roll back",
            report.decision.failed.len()
        ));
    } else {
        ctx.output.success("all checks passed");
    }

    Ok(if failed {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}
