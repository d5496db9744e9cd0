//! Inventory file loading and validation.

use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::{Host, Inventory};

/// Load and validate the fleet inventory.
///
/// # Errors
///
/// Fails when the file is missing or malformed, when the host list is empty,
/// or when two entries share a hostname (artifacts are keyed by hostname, so
/// duplicates would silently overwrite each other).
pub fn load_inventory(path: &Path) -> Result<Vec<Host>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading inventory {}", path.display()))?;
    let inventory: Inventory = serde_yaml::from_str(&content)
        .with_context(|| format!("parsing inventory {}", path.display()))?;

    anyhow::ensure!(
        !inventory.hosts.is_empty(),
        "inventory {} contains no hosts",
        path.display()
    );

    let mut seen = BTreeSet::new();
    for host in &inventory.hosts {
        anyhow::ensure!(
            seen.insert(host.hostname.as_str()),
            "duplicate hostname '{}' in inventory",
            host.hostname
        );
    }

    Ok(inventory.hosts)
}
