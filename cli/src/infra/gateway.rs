//! Infrastructure implementation of the device gateway ports.
//!
//! `DriverClient` talks HTTP/JSON to the external device-driver service, which
//! owns the per-vendor transport. Requests carry the connection parameters of
//! the target device; payload bodies carry an explicit encoding tag so raw
//! byte configurations survive the wire intact.

use anyhow::Result;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::application::ports::{CommandExecutor, ConfigPusher, ConfigSource, StateFetcher};
use crate::domain::{ConfigPayload, Host, Platform, TransportError};

/// HTTP client for the device-driver service.
pub struct DriverClient {
    base: String,
    http: reqwest::Client,
}

/// Connection parameters of the target device, as the driver expects them.
#[derive(Serialize)]
struct Target<'a> {
    hostname: &'a str,
    platform: Platform,
    address: &'a str,
    port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    password: Option<&'a str>,
}

impl<'a> Target<'a> {
    fn from_host(host: &'a Host) -> Self {
        Self {
            hostname: &host.hostname,
            platform: host.platform,
            address: &host.address,
            port: host.port,
            username: host.username.as_deref(),
            password: host.password.as_deref(),
        }
    }
}

/// Wire form of a configuration body. Raw data is base64-encoded because the
/// envelope is JSON.
#[derive(Serialize)]
#[serde(tag = "encoding", content = "data", rename_all = "snake_case")]
enum WirePayload {
    Text(String),
    Raw(String),
}

impl WirePayload {
    fn from_payload(payload: &ConfigPayload) -> Self {
        match payload {
            ConfigPayload::Text(text) => Self::Text(text.clone()),
            ConfigPayload::Bytes(bytes) => Self::Raw(BASE64.encode(bytes)),
        }
    }
}

#[derive(Deserialize)]
struct ConfigResponse {
    config: String,
}

#[derive(Deserialize)]
struct PushResponse {
    diff: String,
}

#[derive(Deserialize)]
struct CommandResponse {
    output: String,
}

#[derive(Deserialize)]
struct StateResponse {
    state: Value,
}

impl DriverClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// POST a JSON body and decode a JSON response, mapping connection and
    /// status failures to [`TransportError`].
    async fn post<Req: Serialize, Resp: for<'de> Deserialize<'de>>(
        &self,
        host: &Host,
        operation: &str,
        path: &str,
        body: &Req,
    ) -> Result<Resp> {
        let url = format!("{}{path}", self.base);
        let response = self.http.post(&url).json(body).send().await.map_err(|e| {
            TransportError::Unreachable {
                hostname: host.hostname.clone(),
                message: e.to_string(),
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected {
                hostname: host.hostname.clone(),
                operation: operation.to_string(),
                message: format!("{status}: {message}"),
            }
            .into());
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| {
                TransportError::Rejected {
                    hostname: host.hostname.clone(),
                    operation: operation.to_string(),
                    message: format!("undecodable response: {e}"),
                }
                .into()
            })
    }
}

impl ConfigSource for DriverClient {
    async fn running_config(&self, host: &Host) -> Result<String> {
        #[derive(Serialize)]
        struct Req<'a> {
            target: Target<'a>,
        }
        let resp: ConfigResponse = self
            .post(host, "running-config", "/v1/config/running", &Req {
                target: Target::from_host(host),
            })
            .await?;
        Ok(resp.config)
    }

    async fn checkpoint(&self, host: &Host) -> Result<String> {
        #[derive(Serialize)]
        struct Req<'a> {
            target: Target<'a>,
        }
        let resp: ConfigResponse = self
            .post(host, "checkpoint", "/v1/config/checkpoint", &Req {
                target: Target::from_host(host),
            })
            .await?;
        Ok(resp.config)
    }
}

impl ConfigPusher for DriverClient {
    async fn push_config(
        &self,
        host: &Host,
        payload: &ConfigPayload,
        dry_run: bool,
    ) -> Result<String> {
        #[derive(Serialize)]
        struct Req<'a> {
            target: Target<'a>,
            payload: WirePayload,
            /// Full replacement, never a merge.
            replace: bool,
            dry_run: bool,
        }
        let resp: PushResponse = self
            .post(host, "push-config", "/v1/config/push", &Req {
                target: Target::from_host(host),
                payload: WirePayload::from_payload(payload),
                replace: true,
                dry_run,
            })
            .await?;
        Ok(resp.diff)
    }
}

impl CommandExecutor for DriverClient {
    async fn run_command(&self, host: &Host, command: &str) -> Result<String> {
        #[derive(Serialize)]
        struct Req<'a> {
            target: Target<'a>,
            command: &'a str,
        }
        let resp: CommandResponse = self
            .post(host, "run-command", "/v1/command", &Req {
                target: Target::from_host(host),
                command,
            })
            .await?;
        Ok(resp.output)
    }
}

impl StateFetcher for DriverClient {
    async fn fetch_state(
        &self,
        host: &Host,
        getter: &str,
        kwargs: &Map<String, Value>,
    ) -> Result<Value> {
        #[derive(Serialize)]
        struct Req<'a> {
            target: Target<'a>,
            getter: &'a str,
            kwargs: &'a Map<String, Value>,
        }
        let resp: StateResponse = self
            .post(host, "fetch-state", "/v1/state", &Req {
                target: Target::from_host(host),
                getter,
                kwargs,
            })
            .await?;
        Ok(resp.state)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn text_payload_serializes_with_text_tag() {
        let wire = WirePayload::from_payload(&ConfigPayload::Text("hostname leaf1\n".into()));
        assert_eq!(
            serde_json::to_value(&wire).unwrap(),
            json!({"encoding": "text", "data": "hostname leaf1\n"})
        );
    }

    #[test]
    fn byte_payload_serializes_base64_with_raw_tag() {
        let wire = WirePayload::from_payload(&ConfigPayload::Bytes(vec![0xff, 0x00, 0x41]));
        assert_eq!(
            serde_json::to_value(&wire).unwrap(),
            json!({"encoding": "raw", "data": "/wBB"})
        );
    }

    #[test]
    fn target_omits_absent_credentials() {
        let host = Host {
            hostname: "leaf1".into(),
            platform: Platform::Eos,
            address: "10.0.0.21".into(),
            port: 22,
            username: None,
            password: None,
            template: "leaf.j2".into(),
            vars: json!({}),
        };
        let v = serde_json::to_value(Target::from_host(&host)).unwrap();
        assert_eq!(
            v,
            json!({"hostname": "leaf1", "platform": "eos", "address": "10.0.0.21", "port": 22})
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = DriverClient::new("http://driver.local:8080/");
        assert_eq!(client.base, "http://driver.local:8080");
    }
}
