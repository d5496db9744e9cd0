//! Host inventory types and platform capabilities.
//!
//! `Platform` is the single place where per-vendor behavior lives. Pipeline
//! stages call its capability methods and never branch on the tag directly.

use serde::{Deserialize, Serialize};

use crate::domain::artifact::ConfigPayload;
use crate::domain::error::ArtifactError;
use crate::domain::normalize;

/// Device platform class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Nxos,
    Eos,
    Other,
}

impl Platform {
    /// Whether the platform keeps a device-native checkpoint file.
    ///
    /// When true, backups read the saved checkpoint directly instead of the
    /// generic running-config getter — the checkpoint is authoritative and
    /// faster on that platform.
    #[must_use]
    pub fn checkpoint_capable(self) -> bool {
        matches!(self, Self::Nxos)
    }

    /// Encode a configuration body for a full-replace push.
    ///
    /// NX-OS takes the payload as raw bytes; every other platform takes text.
    /// Pushing the wrong representation silently corrupts the replace
    /// operation, so this is the only place the decision is made.
    ///
    /// # Errors
    ///
    /// Returns an error if a text platform's configuration is not valid UTF-8.
    pub fn encode(self, raw: Vec<u8>) -> Result<ConfigPayload, ArtifactError> {
        match self {
            Self::Nxos => Ok(ConfigPayload::Bytes(raw)),
            Self::Eos | Self::Other => Ok(ConfigPayload::Text(String::from_utf8(raw)?)),
        }
    }

    /// Post-process a raw backup dump into diffable form.
    ///
    /// Only the NX-OS checkpoint dump needs repair (see [`normalize`]); other
    /// platforms pass through unchanged.
    #[must_use]
    pub fn normalize_backup(self, text: &str) -> String {
        match self {
            Self::Nxos => normalize::restore_terminators(text),
            Self::Eos | Self::Other => text.to_string(),
        }
    }

    /// Rewrite a fully-qualified interface name into the platform's CLI
    /// abbreviation. NX-OS show commands want `Eth1/1`, not `Ethernet1/1`.
    #[must_use]
    pub fn normalize_interface(self, name: &str) -> String {
        match self {
            Self::Nxos => name.replace("Ethernet", "Eth"),
            Self::Eos | Self::Other => name.to_string(),
        }
    }
}

/// One managed device. Immutable for the duration of a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Host {
    pub hostname: String,
    pub platform: Platform,
    /// Management address the driver service connects to.
    pub address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Template identifier passed to the renderer service.
    pub template: String,
    /// Free-form variables forwarded to the renderer.
    #[serde(default = "default_vars")]
    pub vars: serde_json::Value,
}

fn default_port() -> u16 {
    22
}

fn default_vars() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

/// Inventory file shape: a `hosts` list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    pub hosts: Vec<Host>,
}
