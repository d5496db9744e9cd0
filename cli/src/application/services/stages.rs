//! Per-host stage operations.
//!
//! Each function performs one stage for one host, reading its inputs from and
//! writing its outputs to the host's [`HostArtifacts`] record. A stage whose
//! required predecessor artifact is missing fails instead of guessing.

use anyhow::{Context, Result};
use confleet_common::DeploymentOutcome;

use crate::application::ports::{
    ArtifactStore, ConfigPusher, ConfigSource, TemplateRenderer,
};
use crate::domain::{Bucket, Host, HostArtifacts};

/// One host's slot in the pipeline: identity, scratch artifacts, outcome.
#[derive(Debug, Clone)]
pub struct HostRun {
    pub host: Host,
    pub artifacts: HostArtifacts,
    pub outcome: DeploymentOutcome,
}

impl HostRun {
    #[must_use]
    pub fn new(host: Host) -> Self {
        Self {
            host,
            artifacts: HostArtifacts::default(),
            outcome: DeploymentOutcome::default(),
        }
    }
}

/// RENDER: ask the templating service for this host's configuration.
pub async fn render_host(renderer: &impl TemplateRenderer, run: &mut HostRun) -> Result<()> {
    let config = renderer
        .render(&run.host)
        .await
        .with_context(|| format!("rendering template '{}'", run.host.template))?;
    run.artifacts.rendered = Some(config);
    Ok(())
}

/// WRITE_CONFIG: persist the rendered configuration to the `configs` bucket.
pub async fn write_config(store: &impl ArtifactStore, run: &mut HostRun) -> Result<()> {
    let rendered = run
        .artifacts
        .rendered
        .as_deref()
        .context("no rendered configuration to write")?;
    store
        .put(&run.host.hostname, Bucket::Configs, rendered.as_bytes())
        .await
        .context("writing rendered configuration")?;
    Ok(())
}

/// BACKUP: capture the pre-deployment configuration.
///
/// Checkpoint-capable platforms read the device's saved checkpoint directly;
/// everything else goes through the generic running-config getter. The raw
/// dump is normalized into diffable form before it is kept.
pub async fn backup_host(source: &impl ConfigSource, run: &mut HostRun) -> Result<()> {
    let raw = if run.host.platform.checkpoint_capable() {
        source
            .checkpoint(&run.host)
            .await
            .context("fetching checkpoint")?
    } else {
        source
            .running_config(&run.host)
            .await
            .context("fetching running configuration")?
    };
    run.artifacts.backup = Some(run.host.platform.normalize_backup(&raw));
    Ok(())
}

/// WRITE_BACKUP: persist the backup to the `backup` bucket. Rollback re-reads
/// this blob, so it must exist before any push happens.
pub async fn write_backup(store: &impl ArtifactStore, run: &mut HostRun) -> Result<()> {
    let backup = run
        .artifacts
        .backup
        .as_deref()
        .context("no backup configuration to write")?;
    store
        .put(&run.host.hostname, Bucket::Backup, backup.as_bytes())
        .await
        .context("writing backup configuration")?;
    Ok(())
}

/// DEPLOY (dry-run or real): full-replace push of the rendered configuration.
///
/// The dry-run pass records the device-computed diff in the `diffs` bucket;
/// the real pass only keeps it in memory.
pub async fn deploy_host(
    pusher: &impl ConfigPusher,
    store: &impl ArtifactStore,
    run: &mut HostRun,
    dry_run: bool,
) -> Result<()> {
    let rendered = run
        .artifacts
        .rendered
        .as_deref()
        .context("no rendered configuration to deploy")?;
    let payload = run
        .host
        .platform
        .encode(rendered.as_bytes().to_vec())
        .context("encoding configuration payload")?;

    let diff = pusher
        .push_config(&run.host, &payload, dry_run)
        .await
        .context("pushing configuration")?;

    if dry_run {
        store
            .put(&run.host.hostname, Bucket::Diffs, diff.as_bytes())
            .await
            .context("writing diff")?;
    }
    run.artifacts.last_diff = Some(diff.clone());
    run.outcome.last_diff = Some(diff);
    Ok(())
}
