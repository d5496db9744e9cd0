//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use anyhow::Result;
use serde_json::{Map, Value};

use crate::domain::{Bucket, ConfigPayload, Engine, Host};

// ── Device Gateway Ports ──────────────────────────────────────────────────────

/// Reading configuration off a device.
#[allow(async_fn_in_trait)]
pub trait ConfigSource {
    /// Fetch the running configuration via the generic multi-vendor getter.
    async fn running_config(&self, host: &Host) -> Result<String>;
    /// Fetch the device's saved checkpoint directly. Only called for
    /// platforms where [`crate::domain::Platform::checkpoint_capable`] holds.
    async fn checkpoint(&self, host: &Host) -> Result<String>;
}

/// Pushing configuration onto a device.
#[allow(async_fn_in_trait)]
pub trait ConfigPusher {
    /// Full-replace push. Returns the textual diff the device computed;
    /// dry-run computes the diff without committing.
    async fn push_config(
        &self,
        host: &Host,
        payload: &ConfigPayload,
        dry_run: bool,
    ) -> Result<String>;
}

/// Raw command execution on a device. Used only by the imperative validators.
#[allow(async_fn_in_trait)]
pub trait CommandExecutor {
    /// Run a show command and return its raw text/JSON output.
    async fn run_command(&self, host: &Host, command: &str) -> Result<String>;
}

/// Named operational-state getters for the declarative engine.
#[allow(async_fn_in_trait)]
pub trait StateFetcher {
    /// Invoke the named getter with the given arguments and return its
    /// structured result.
    async fn fetch_state(
        &self,
        host: &Host,
        getter: &str,
        kwargs: &Map<String, Value>,
    ) -> Result<Value>;
}

/// Composite trait — any type implementing all four device ports is a
/// `DeviceGateway`.
pub trait DeviceGateway: ConfigSource + ConfigPusher + CommandExecutor + StateFetcher {}

/// Blanket implementation for the composite gateway trait.
impl<T> DeviceGateway for T where T: ConfigSource + ConfigPusher + CommandExecutor + StateFetcher {}

// ── Template Renderer Port ────────────────────────────────────────────────────

/// External templating service: template name + host vars in, config text out.
#[allow(async_fn_in_trait)]
pub trait TemplateRenderer {
    /// Render the host's template with its variables.
    async fn render(&self, host: &Host) -> Result<String>;
}

// ── Artifact Store Port ───────────────────────────────────────────────────────

/// Blob store keyed by hostname and bucket. One blob per pair; writes
/// overwrite. No transactional guarantees across hosts.
#[allow(async_fn_in_trait)]
pub trait ArtifactStore {
    /// Store `content`, creating the bucket namespace if absent. Returns the
    /// SHA-256 hex digest of the stored content.
    async fn put(&self, hostname: &str, bucket: Bucket, content: &[u8]) -> Result<String>;
    /// Retrieve stored content. Fails with
    /// [`crate::domain::ArtifactError::NotFound`] when absent.
    async fn get(&self, hostname: &str, bucket: Bucket) -> Result<Vec<u8>>;
}

// ── Check Provider Port ───────────────────────────────────────────────────────

/// Source of per-host validation check documents.
#[allow(async_fn_in_trait)]
pub trait CheckProvider {
    /// Load the raw check document for one host and engine. `None` means no
    /// checks are defined for that pair.
    async fn check_document(&self, hostname: &str, engine: Engine) -> Result<Option<Value>>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without depending
/// on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Mark the start of a fixed wait (convergence delay). Implementations
    /// may show a spinner until [`ProgressReporter::end_wait`].
    fn begin_wait(&self, message: &str) {
        self.step(message);
    }
    /// Mark the end of a fixed wait.
    fn end_wait(&self) {}
}
