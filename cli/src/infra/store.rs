//! Infrastructure implementation of the `ArtifactStore` port.
//!
//! Blobs live at `<root>/<bucket>/<hostname>`. One blob per pair; writes
//! overwrite.

use std::io::ErrorKind;
use std::path::PathBuf;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::application::ports::ArtifactStore;
use crate::domain::{ArtifactError, Bucket};

pub fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// Directory-backed artifact store.
pub struct DirArtifactStore {
    root: PathBuf,
}

impl DirArtifactStore {
    #[must_use]
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    fn blob_path(&self, hostname: &str, bucket: Bucket) -> PathBuf {
        self.root.join(bucket.as_str()).join(hostname)
    }
}

impl ArtifactStore for DirArtifactStore {
    async fn put(&self, hostname: &str, bucket: Bucket, content: &[u8]) -> Result<String> {
        let dir = self.root.join(bucket.as_str());
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("creating directory {}", dir.display()))?;
        let path = self.blob_path(hostname, bucket);
        fs::write(&path, content)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(hex_encode(&Sha256::digest(content)))
    }

    async fn get(&self, hostname: &str, bucket: Bucket) -> Result<Vec<u8>> {
        let path = self.blob_path(hostname, bucket);
        match fs::read(&path).await {
            Ok(content) => Ok(content),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(ArtifactError::NotFound {
                hostname: hostname.to_string(),
                bucket: bucket.to_string(),
            }
            .into()),
            Err(err) => Err(err).with_context(|| format!("reading {}", path.display())),
        }
    }
}
