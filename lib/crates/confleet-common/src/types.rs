use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Stages of the deployment pipeline, in execution order.
///
/// Every stage is a fleet-wide barrier: all hosts finish (or fail) the stage
/// before any host enters the next one.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Render,
    WriteConfig,
    Backup,
    WriteBackup,
    DeployDryRun,
    DeployReal,
    ValidateDeclarative,
    ValidateImperative,
    Decide,
}

impl PipelineStage {
    /// Human label used in progress output and failure summaries.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Render => "render",
            Self::WriteConfig => "write-config",
            Self::Backup => "backup",
            Self::WriteBackup => "write-backup",
            Self::DeployDryRun => "deploy (dry-run)",
            Self::DeployReal => "deploy",
            Self::ValidateDeclarative => "validate (declarative)",
            Self::ValidateImperative => "validate (imperative)",
            Self::Decide => "decide",
        }
    }

    /// Whether a host failure in this stage aborts the whole run.
    ///
    /// Everything up to and including the real deployment is abort-on-failure:
    /// a configuration or connectivity problem there must not reach (more of)
    /// production. Validation stages aggregate instead.
    #[must_use]
    pub fn aborts_on_failure(self) -> bool {
        matches!(
            self,
            Self::Render
                | Self::WriteConfig
                | Self::Backup
                | Self::WriteBackup
                | Self::DeployDryRun
                | Self::DeployReal
        )
    }
}

/// Outcome of one validation check for one host.
///
/// `Other` preserves report shapes that carry neither a `complies` verdict nor
/// a `skipped` marker; the rollback decider logs these and never counts them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum CheckOutcome {
    /// Expected-vs-actual comparison result.
    Verdict {
        complies: bool,
        expected: Value,
        actual: Value,
    },
    /// Check was not run.
    Skipped { reason: String },
    /// Check could not produce a verdict (bad device output, transport error).
    Error { message: String },
    /// Unrecognized report shape, carried through verbatim.
    Other(Value),
}

impl CheckOutcome {
    /// True iff this outcome is an explicit non-compliant verdict.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Verdict { complies: false, .. })
    }
}

/// All check outcomes for one host from one validation engine, keyed by the
/// check's report label. `BTreeMap` keeps summaries deterministically ordered.
pub type HostReport = BTreeMap<String, CheckOutcome>;

/// Result of one pipeline stage for one host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageResult {
    pub stage: PipelineStage,
    pub hostname: String,
    /// Error message when the stage failed for this host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StageResult {
    #[must_use]
    pub fn ok(stage: PipelineStage, hostname: &str) -> Self {
        Self {
            stage,
            hostname: hostname.to_string(),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(stage: PipelineStage, hostname: &str, error: String) -> Self {
        Self {
            stage,
            hostname: hostname.to_string(),
            error: Some(error),
        }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Per-host record of how far the pipeline got and what it produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeploymentOutcome {
    /// Stage results in execution order.
    pub stages: Vec<StageResult>,
    /// Diff from the most recent push (dry-run or real).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_diff: Option<String>,
}

/// Aggregated rollback decision across the whole fleet.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollbackDecision {
    /// `(hostname, check label)` pairs whose verdict was explicitly
    /// non-compliant.
    pub failed: Vec<(String, String)>,
}

impl RollbackDecision {
    /// Whether backups must be redeployed fleet-wide.
    #[must_use]
    pub fn rollback_required(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Machine-readable run report printed under `--json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    /// Per-host stage outcomes, keyed by hostname.
    pub hosts: BTreeMap<String, DeploymentOutcome>,
    /// Declarative-engine reports, keyed by hostname.
    pub declarative: BTreeMap<String, HostReport>,
    /// Imperative-engine reports, keyed by hostname.
    pub imperative: BTreeMap<String, HostReport>,
    pub decision: RollbackDecision,
}

impl RunReport {
    #[must_use]
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            hosts: BTreeMap::new(),
            declarative: BTreeMap::new(),
            imperative: BTreeMap::new(),
            decision: RollbackDecision::default(),
        }
    }
}
