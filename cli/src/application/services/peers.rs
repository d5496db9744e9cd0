//! Platform-specific imperative peer checks.
//!
//! Currently one operation exists: `ospf_peer`, which queries a device for its
//! OSPF neighbors, locates the one matching the requested identity, and
//! reports its adjacency state. Operation names are resolved through the
//! [`PeerOp`] registry when check files are loaded, so an unknown name is
//! rejected before any device is touched.

use anyhow::Result;
use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;

use crate::application::ports::CommandExecutor;
use crate::domain::{Host, ParseError, Platform};

// ── Operation registry ────────────────────────────────────────────────────────

/// Imperative check operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerOp {
    OspfPeer,
}

/// Raised at check-file load time for operation names the registry does not
/// know.
#[derive(Debug, Error)]
#[error("unknown imperative check operation '{0}'")]
pub struct UnknownOperation(pub String);

impl PeerOp {
    /// Resolve an operation name from a check file.
    pub fn from_name(name: &str) -> Result<Self, UnknownOperation> {
        match name {
            "ospf_peer" => Ok(Self::OspfPeer),
            other => Err(UnknownOperation(other.to_string())),
        }
    }
}

// ── ospf_peer ─────────────────────────────────────────────────────────────────

/// Arguments of the `ospf_peer` operation, decoded from a check's `_kwargs`.
#[derive(Debug, Clone, Deserialize)]
pub struct OspfPeerArgs {
    #[serde(default = "default_process_id")]
    pub process_id: u32,
    /// Fully qualified interface name (e.g. `Ethernet1/1`).
    pub interface: String,
    /// IP address of the peer's interface.
    pub peer_address: String,
    /// Router ID of the peer.
    pub peer_id: String,
    /// VRF/context of the peering. The NX-OS variant accepts this but does
    /// not apply it as a filter — the issued command has no VRF qualifier.
    /// Known gap, preserved from the original check semantics.
    #[serde(default = "default_context")]
    pub context: String,
}

fn default_process_id() -> u32 {
    1
}

fn default_context() -> String {
    "default".to_string()
}

/// Run the `ospf_peer` check against one host.
///
/// The result is the report structure the expected body is compared against:
/// `{"success": {"state": <UPPERCASED>}}` for exactly one matching neighbor,
/// `{"error": ...}` for zero or multiple matches. Parse failures surface as
/// [`ParseError`] and are converted to an error outcome by the caller, never
/// raised to the pipeline.
pub async fn ospf_peer(
    executor: &impl CommandExecutor,
    host: &Host,
    args: &OspfPeerArgs,
) -> Result<Value> {
    let interface = host.platform.normalize_interface(&args.interface);
    let command = format!("show ip ospf neighbor {interface} | json");
    let raw = executor.run_command(host, &command).await?;

    let parsed: Value = serde_json::from_str(&raw).map_err(|e| ParseError::InvalidJson {
        hostname: host.hostname.clone(),
        message: e.to_string(),
    })?;

    let neighbors = match host.platform {
        Platform::Nxos => nxos_neighbors(&parsed),
        Platform::Eos => eos_neighbors(host, &parsed, args)?,
        Platform::Other => {
            return Err(ParseError::UnexpectedShape {
                hostname: host.hostname.clone(),
                message: "no ospf_peer support for this platform".to_string(),
            }
            .into());
        }
    };

    let fields = field_names(host.platform);
    let matches: Vec<&Value> = neighbors
        .iter()
        .filter(|peer| {
            peer.get(fields.router_id).and_then(Value::as_str) == Some(args.peer_id.as_str())
                && peer.get(fields.address).and_then(Value::as_str)
                    == Some(args.peer_address.as_str())
        })
        .collect();

    match matches.as_slice() {
        [] => Ok(json!({"error": "no matching peer found"})),
        [peer] => {
            let state = peer
                .get(fields.state)
                .and_then(Value::as_str)
                .ok_or_else(|| ParseError::UnexpectedShape {
                    hostname: host.hostname.clone(),
                    message: format!("neighbor entry has no '{}' field", fields.state),
                })?;
            Ok(json!({"success": {"state": state.to_uppercase()}}))
        }
        _ => Ok(json!({"error": "multiple peer matches"})),
    }
}

/// Per-platform field names inside a neighbor entry.
struct NeighborFields {
    router_id: &'static str,
    address: &'static str,
    state: &'static str,
}

fn field_names(platform: Platform) -> NeighborFields {
    match platform {
        Platform::Nxos | Platform::Other => NeighborFields {
            router_id: "rid",
            address: "addr",
            state: "state",
        },
        Platform::Eos => NeighborFields {
            router_id: "routerId",
            address: "interfaceAddress",
            state: "adjacencyState",
        },
    }
}

/// NX-OS nests neighbors under `TABLE_ctx.ROW_ctx.TABLE_nbr.ROW_nbr`. A
/// single neighbor collapses to a bare mapping, which is normalized into a
/// one-element list; a missing path means zero neighbors, not an error.
fn nxos_neighbors(parsed: &Value) -> Vec<Value> {
    let row = parsed
        .pointer("/TABLE_ctx/ROW_ctx/TABLE_nbr/ROW_nbr")
        .cloned();
    match row {
        Some(Value::Array(entries)) => entries,
        Some(entry @ Value::Object(_)) => vec![entry],
        _ => Vec::new(),
    }
}

/// EOS nests neighbors under
/// `vrfs.<context>.instList.<process_id>.ospfNeighborEntries`.
fn eos_neighbors(host: &Host, parsed: &Value, args: &OspfPeerArgs) -> Result<Vec<Value>> {
    let path = format!(
        "/vrfs/{}/instList/{}/ospfNeighborEntries",
        args.context, args.process_id
    );
    let entries = parsed
        .pointer(&path)
        .and_then(Value::as_array)
        .ok_or_else(|| ParseError::UnexpectedShape {
            hostname: host.hostname.clone(),
            message: format!("missing neighbor list at '{path}'"),
        })?;
    Ok(entries.clone())
}
