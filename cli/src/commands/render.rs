//! `confleet render` — render configurations without touching any device.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use futures_util::future::join_all;

use crate::app::AppContext;
use crate::application::ports::{ArtifactStore, TemplateRenderer};
use crate::domain::Bucket;
use crate::infra::{DirArtifactStore, RenderClient, load_inventory};

/// Arguments for the render command.
#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Inventory file
    #[arg(long, default_value = "inventory.yaml")]
    pub inventory: std::path::PathBuf,

    /// Root directory for the configs artifact bucket
    #[arg(long, default_value = ".")]
    pub artifacts_dir: std::path::PathBuf,

    /// Base URL of the templating service
    #[arg(long, env = "CONFLEET_RENDER_URL")]
    pub render_url: String,
}

/// Run `confleet render`.
///
/// # Errors
///
/// Returns an error when the inventory is unusable; per-host render failures
/// are reported and drive a non-zero exit instead.
pub async fn run(ctx: &AppContext, args: &RenderArgs) -> Result<ExitCode> {
    let hosts = load_inventory(&args.inventory)?;
    let renderer = RenderClient::new(&args.render_url);
    let store = DirArtifactStore::with_root(args.artifacts_dir.clone());

    let results = join_all(hosts.iter().map(|host| {
        let renderer = &renderer;
        let store = &store;
        async move {
            let outcome: Result<String> = async {
                let config = renderer.render(host).await?;
                store
                    .put(&host.hostname, Bucket::Configs, config.as_bytes())
                    .await
            }
            .await;
            (host.hostname.clone(), outcome)
        }
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
        ctx.output.success("all configurations rendered");
        Ok(ExitCode::SUCCESS)
    }
}
