//! Shared stub infrastructure for unit tests.
//!
//! Provides canned port implementations so each test file doesn't have to
//! re-define the same boilerplate.

#![allow(clippy::expect_used)]

use std::cell::RefCell;
use std::collections::HashMap;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use confleet_cli::application::ports::{
    ArtifactStore, CheckProvider, CommandExecutor, ConfigPusher, ConfigSource, ProgressReporter,
    StateFetcher, TemplateRenderer,
};
use confleet_cli::domain::{Bucket, ConfigPayload, Engine, Host, Platform};

// ── Fixtures ──────────────────────────────────────────────────────────────────

pub fn host(hostname: &str, platform: Platform) -> Host {
    Host {
        hostname: hostname.into(),
        platform,
        address: "10.0.0.1".into(),
        port: 22,
        username: Some("admin".into()),
        password: Some("admin".into()),
        template: format!("{hostname}.j2"),
        vars: Value::Object(Map::new()),
    }
}

// ── Device gateway stub ───────────────────────────────────────────────────────

pub struct PushRecord {
    pub hostname: String,
    pub payload: ConfigPayload,
    pub dry_run: bool,
}

/// Canned device-side world: fixed configs and state, per-host command
/// outputs, and a full record of every push.
pub struct StubGateway {
    pub checkpoint: String,
    pub running: String,
    pub state: Value,
    /// Raw `run_command` output per hostname.
    pub command_output: HashMap<String, String>,
    pub pushes: RefCell<Vec<PushRecord>>,
}

impl StubGateway {
    pub fn new(state: Value) -> Self {
        Self {
            checkpoint: "checkpoint config\n".into(),
            running: "running config\n".into(),
            state,
            command_output: HashMap::new(),
            pushes: RefCell::new(Vec::new()),
        }
    }

    pub fn real_pushes(&self) -> Vec<String> {
        self.pushes
            .borrow()
            .iter()
            .filter(|p| !p.dry_run)
            .map(|p| p.hostname.clone())
            .collect()
    }
}

impl ConfigSource for StubGateway {
    async fn running_config(&self, _: &Host) -> Result<String> {
        Ok(self.running.clone())
    }
    async fn checkpoint(&self, _: &Host) -> Result<String> {
        Ok(self.checkpoint.clone())
    }
}

impl ConfigPusher for StubGateway {
    async fn push_config(
        &self,
        host: &Host,
        payload: &ConfigPayload,
        dry_run: bool,
    ) -> Result<String> {
        self.pushes.borrow_mut().push(PushRecord {
            hostname: host.hostname.clone(),
            payload: payload.clone(),
            dry_run,
        });
        Ok(format!("+hostname {}", host.hostname))
    }
}

impl CommandExecutor for StubGateway {
    async fn run_command(&self, host: &Host, _: &str) -> Result<String> {
        self.command_output
            .get(&host.hostname)
            .cloned()
            .with_context(|| format!("no canned command output for {}", host.hostname))
    }
}

impl StateFetcher for StubGateway {
    async fn fetch_state(&self, _: &Host, _: &str, _: &Map<String, Value>) -> Result<Value> {
        Ok(self.state.clone())
    }
}

// ── Renderer stub ─────────────────────────────────────────────────────────────

pub struct StubRenderer {
    pub fail_for: Option<String>,
}

impl TemplateRenderer for StubRenderer {
    async fn render(&self, host: &Host) -> Result<String> {
        if self.fail_for.as_deref() == Some(host.hostname.as_str()) {
            anyhow::bail!("template '{}' not found", host.template)
        }
        Ok(format!("hostname {}\ninterface Ethernet1/1\n", host.hostname))
    }
}

// ── Artifact store stub ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemoryStore {
    blobs: RefCell<HashMap<(String, Bucket), Vec<u8>>>,
}

impl MemoryStore {
    pub fn blob(&self, hostname: &str, bucket: Bucket) -> Option<Vec<u8>> {
        self.blobs
            .borrow()
            .get(&(hostname.to_string(), bucket))
            .cloned()
    }
}

impl ArtifactStore for MemoryStore {
    async fn put(&self, hostname: &str, bucket: Bucket, content: &[u8]) -> Result<String> {
        self.blobs
            .borrow_mut()
            .insert((hostname.to_string(), bucket), content.to_vec());
        Ok(String::new())
    }
    async fn get(&self, hostname: &str, bucket: Bucket) -> Result<Vec<u8>> {
        self.blob(hostname, bucket)
            .with_context(|| format!("no '{bucket}' blob for {hostname}"))
    }
}

// ── Check provider stub ───────────────────────────────────────────────────────

#[derive(Default)]
pub struct StubChecks {
    docs: HashMap<(String, &'static str), Value>,
}

impl StubChecks {
    pub fn with(mut self, hostname: &str, engine: Engine, doc: Value) -> Self {
        self.docs
            .insert((hostname.to_string(), engine.file_suffix()), doc);
        self
    }
}

impl CheckProvider for StubChecks {
    async fn check_document(&self, hostname: &str, engine: Engine) -> Result<Option<Value>> {
        Ok(self
            .docs
            .get(&(hostname.to_string(), engine.file_suffix()))
            .cloned())
    }
}

// ── Reporter stub ─────────────────────────────────────────────────────────────

pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn step(&self, _: &str) {}
    fn success(&self, _: &str) {}
    fn warn(&self, _: &str) {}
}
