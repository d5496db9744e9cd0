//! Infrastructure implementation of the `TemplateRenderer` port.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::ports::TemplateRenderer;
use crate::domain::{Host, TemplateError};

/// HTTP client for the external templating service.
pub struct RenderClient {
    base: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct RenderRequest<'a> {
    template: &'a str,
    hostname: &'a str,
    vars: &'a Value,
}

#[derive(Deserialize)]
struct RenderResponse {
    config: String,
}

impl RenderClient {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }
}

impl TemplateRenderer for RenderClient {
    async fn render(&self, host: &Host) -> Result<String> {
        let url = format!("{}/v1/render", self.base);
        let response = self
            .http
            .post(&url)
            .json(&RenderRequest {
                template: &host.template,
                hostname: &host.hostname,
                vars: &host.vars,
            })
            .send()
            .await
            .map_err(|e| TemplateError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(TemplateError::Render {
                hostname: host.hostname.clone(),
                template: host.template.clone(),
                message: format!("{status}: {message}"),
            }
            .into());
        }

        let body: RenderResponse = response.json().await.map_err(|e| TemplateError::Render {
            hostname: host.hostname.clone(),
            template: host.template.clone(),
            message: format!("undecodable response: {e}"),
        })?;
        Ok(body.config)
    }
}
