//! Rollback decision and fleet-wide redeploy.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use confleet_common::{CheckOutcome, HostReport, RollbackDecision};
use futures_util::future::join_all;

use crate::application::ports::{ArtifactStore, ConfigPusher, ProgressReporter};
use crate::domain::{Bucket, Host, RollbackError};

/// Aggregate every check outcome from every host across both engines.
///
/// A (host, check) pair joins the failed set iff its outcome is an explicit
/// non-compliant verdict. Skipped checks are excluded regardless of content.
/// Error outcomes and unrecognized shapes carry no verdict; they are reported
/// loudly and excluded — whether they should count as failures is unresolved,
/// so they are surfaced rather than guessed at.
pub fn decide(
    declarative: &BTreeMap<String, HostReport>,
    imperative: &BTreeMap<String, HostReport>,
    reporter: &impl ProgressReporter,
) -> RollbackDecision {
    let mut decision = RollbackDecision::default();
    for (hostname, report) in declarative.iter().chain(imperative.iter()) {
        for (label, outcome) in report {
            if outcome.is_failed() {
                decision.failed.push((hostname.clone(), label.clone()));
                continue;
            }
            match outcome {
                CheckOutcome::Verdict { .. } | CheckOutcome::Skipped { .. } => {}
                CheckOutcome::Error { message } => {
                    reporter.warn(&format!(
                        "{hostname}: check '{label}' errored (not counted): {message}"
                    ));
                }
                CheckOutcome::Other(value) => {
                    reporter.warn(&format!(
                        "{hostname}: check '{label}' has unrecognized verdict shape \
                         (not counted): {value}"
                    ));
                }
            }
        }
    }
    decision
}

/// Redeploy one host's backup artifact, dry-run disabled.
///
/// The stored blob is re-read as raw bytes so the byte-oriented platform's
/// payload reaches the device unmodified.
pub async fn redeploy_backup(
    pusher: &impl ConfigPusher,
    store: &impl ArtifactStore,
    host: &Host,
) -> Result<()> {
    let raw = store
        .get(&host.hostname, Bucket::Backup)
        .await
        .context("reading backup artifact")?;
    let payload = host
        .platform
        .encode(raw)
        .context("encoding backup payload")?;
    pusher
        .push_config(host, &payload, false)
        .await
        .context("pushing backup configuration")?;
    Ok(())
}

/// Fleet-wide conservative rollback: every host gets its backup back, not
/// only the ones that failed validation. Returns the per-host push failures;
/// the caller prints them in full — rollback failures are never swallowed.
pub async fn rollback_fleet(
    pusher: &impl ConfigPusher,
    store: &impl ArtifactStore,
    hosts: &[Host],
    reporter: &impl ProgressReporter,
) -> Vec<RollbackError> {
    let results = join_all(hosts.iter().map(|h| async move {
        (h.hostname.clone(), redeploy_backup(pusher, store, h).await)
    }))
    .await;

    let mut failures = Vec::new();
    for (hostname, result) in results {
        match result {
            Ok(()) => reporter.success(&format!("{hostname}: backup redeployed")),
            Err(err) => failures.push(RollbackError::PushFailed {
                hostname,
                message: format!("{err:#}"),
            }),
        }
    }
    failures
}
