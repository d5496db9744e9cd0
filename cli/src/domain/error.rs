//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator. The propagation policy is split by pipeline phase:
//! pre-deployment errors abort the whole run; post-deployment errors are
//! aggregated into check outcomes and drive the rollback decision instead.

use thiserror::Error;

// ── Transport errors ──────────────────────────────────────────────────────────

/// Device transport failures. Fatal to the host's current stage, not retried.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("device '{hostname}' is unreachable: {message}")]
    Unreachable { hostname: String, message: String },

    #[error("driver rejected '{operation}' for '{hostname}': {message}")]
    Rejected {
        hostname: String,
        operation: String,
        message: String,
    },
}

// ── Template errors ───────────────────────────────────────────────────────────

/// Template rendering failures. Fatal — the run aborts before deployment.
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("template '{template}' failed to render for '{hostname}': {message}")]
    Render {
        hostname: String,
        template: String,
        message: String,
    },

    #[error("renderer service is unreachable: {0}")]
    Unreachable(String),
}

// ── Artifact errors ───────────────────────────────────────────────────────────

/// Artifact store failures.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("no '{bucket}' artifact stored for host '{hostname}'")]
    NotFound { hostname: String, bucket: String },

    #[error("configuration for a text platform is not valid UTF-8")]
    NotText(#[from] std::string::FromUtf8Error),
}

// ── Parse errors ──────────────────────────────────────────────────────────────

/// Unexpected device output in the imperative validators. Caught and converted
/// to an `error` check outcome, never fatal.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("output from '{hostname}' is not valid JSON: {message}")]
    InvalidJson { hostname: String, message: String },

    #[error("unexpected output shape from '{hostname}': {message}")]
    UnexpectedShape { hostname: String, message: String },
}

// ── Rollback errors ───────────────────────────────────────────────────────────

/// Rollback push failures. Fatal and terminal — surfaced in full, no further
/// automated recovery is attempted.
#[derive(Debug, Error)]
pub enum RollbackError {
    #[error("rollback push failed for '{hostname}': {message}")]
    PushFailed { hostname: String, message: String },
}
