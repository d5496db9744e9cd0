//! Confleet — fleet configuration deployment with validation and rollback.
//!
//! Layered hexagonally: `domain` holds platform knowledge and pure logic,
//! `application` holds port traits and use-case services, `infra` implements
//! the ports over HTTP and the filesystem, `commands` and `output` are the
//! presentation surface.

pub mod app;
pub mod application;
pub mod cli;
pub mod commands;
pub mod domain;
pub mod infra;
pub mod output;
