//! Use-case services: the stage pipeline, the validation engines, and the
//! rollback path.

pub mod peers;
pub mod pipeline;
pub mod rollback;
pub mod stages;
pub mod validate;
