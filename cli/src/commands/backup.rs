//! `confleet backup` — capture every host's pre-deployment configuration.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use futures_util::future::join_all;

use crate::app::AppContext;
use crate::application::ports::{ArtifactStore, ConfigSource};
use crate::commands::FleetArgs;
use crate::domain::{Bucket, Host};
use crate::infra::{DirArtifactStore, DriverClient, load_inventory};

/// Arguments for the backup command.
#[derive(Args, Debug)]
pub struct BackupArgs {
    #[command(flatten)]
    pub fleet: FleetArgs,
}

async fn backup_one(
    source: &impl ConfigSource,
    store: &impl ArtifactStore,
    host: &Host,
) -> Result<String> {
    let raw = if host.platform.checkpoint_capable() {
        source.checkpoint(host).await?
    } else {
        source.running_config(host).await?
    };
    let normalized = host.platform.normalize_backup(&raw);
    store
        .put(&host.hostname, Bucket::Backup, normalized.as_bytes())
        .await
}

/// Run `confleet backup`.
///
/// # Errors
///
/// Returns an error when the inventory is unusable; per-host backup failures
/// are reported and drive a non-zero exit instead.
pub async fn run(ctx: &AppContext, args: &BackupArgs) -> Result<ExitCode> {
    let hosts = load_inventory(&args.fleet.inventory)?;
    let gateway = DriverClient::new(&args.fleet.driver_url);
    let store = DirArtifactStore::with_root(args.fleet.artifacts_dir.clone());

    let results = join_all(hosts.iter().map(|host| {
        let gateway = &gateway;
        let store = &store;
        async move { (host.hostname.clone(), backup_one(gateway, store, host).await) }
    }))
    .await;

    let mut failed = false;
    for (hostname, outcome) in results {
        match outcome {
            Ok(digest) => ctx.output.kv(&hostname, &format!("sha256:{digest}")),
            Err(err) => {
                failed = true;
                ctx.output.error(&format!("{hostname}: {err:#}"));
            }
        }
    }

    if failed {
        Ok(ExitCode::from(1))
    } else {
        ctx.output.success("all backups captured");
        Ok(ExitCode::SUCCESS)
    }
}
