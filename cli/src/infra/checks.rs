//! Infrastructure implementation of the `CheckProvider` port.
//!
//! Check documents live at `<dir>/<hostname>_<suffix>.yaml`, where the suffix
//! is `state` for the declarative engine and `peers` for the imperative one.
//! A missing file means no checks are defined for that pair.

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;
use tokio::fs;

use crate::application::ports::CheckProvider;
use crate::domain::Engine;

/// Directory-backed check document source.
pub struct DirCheckSource {
    dir: PathBuf,
}

impl DirCheckSource {
    #[must_use]
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }
}

impl CheckProvider for DirCheckSource {
    async fn check_document(&self, hostname: &str, engine: Engine) -> Result<Option<Value>> {
        let path = self
            .dir
            .join(format!("{hostname}_{}.yaml", engine.file_suffix()));
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        let doc: Value = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(doc))
    }
}
