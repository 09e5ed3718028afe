use async_trait::async_trait;
use reqwest::header::ACCEPT;

use crate::config::ClientConfig;
use crate::errors::{DebtError, Result};
use crate::remote::{ApiReply, ApiRequest, HttpMethod, HttpTransport};

/// http transport backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: String,
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| DebtError::InvalidConfiguration {
                message: format!("cannot build http client: {e}"),
            })?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiReply> {
        let url = self.url_for(&request.path);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        }
        .header(ACCEPT, "application/json");

        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        log::debug!("{} {}", request.method, url);

        let response = builder.send().await.map_err(|e| {
            log::warn!("{} {} failed: {e}", request.method, url);
            DebtError::remote(format!("network error: {e}"))
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| DebtError::remote(format!("failed to read response body: {e}")))?;

        log::debug!("{} {} -> {} ({} bytes)", request.method, url, status, body.len());
        Ok(ApiReply { status, body })
    }
}
