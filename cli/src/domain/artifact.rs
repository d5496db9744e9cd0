//! Configuration artifacts: buckets, payload encoding, per-host scratch state.

use serde::{Deserialize, Serialize};

/// Artifact bucket. One blob per (host, bucket); writes overwrite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    Configs,
    Backup,
    Diffs,
}

impl Bucket {
    /// Directory name under the artifacts root.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Configs => "configs",
            Self::Backup => "backup",
            Self::Diffs => "diffs",
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform-encoded body of a configuration push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigPayload {
    /// UTF-8 configuration text (EOS and the generic platform class).
    Text(String),
    /// Raw bytes (NX-OS class; the replace operation requires them verbatim).
    Bytes(Vec<u8>),
}

impl ConfigPayload {
    /// The payload body, independent of representation.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(s) => s.as_bytes(),
            Self::Bytes(b) => b,
        }
    }
}

/// Per-host artifacts produced by the stage pipeline.
///
/// Threaded through the stages as an explicit record: a stage that needs a
/// predecessor's output fails cleanly when the field is still `None`.
#[derive(Debug, Clone, Default)]
pub struct HostArtifacts {
    /// Rendered configuration (RENDER).
    pub rendered: Option<String>,
    /// Normalized backup text (BACKUP). Stored and re-read as bytes so the
    /// byte-oriented platform's rollback push is unmodified.
    pub backup: Option<String>,
    /// Diff from the most recent push (dry-run or real).
    pub last_diff: Option<String>,
}
