//! Shared types for confleet: pipeline stages, validation reports, and the
//! check-file format consumed by both validation engines.

pub mod checks;
pub mod types;

pub use checks::{CheckParseError, CheckSpec, parse_check_document};
pub use types::{
    CheckOutcome, DeploymentOutcome, HostReport, PipelineStage, RollbackDecision, RunReport,
    StageResult,
};
