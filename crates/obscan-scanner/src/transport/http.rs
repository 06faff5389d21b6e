use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use super::Transport;
use crate::error::TransportError;
use crate::rate_limit::retry_with_backoff;

const CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct HttpTransportConfig {
    pub endpoint_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Extra headers sent with every request (cookies, referer, API keys).
    pub headers: BTreeMap<String, String>,
    /// Additional attempts after the first failure for retriable errors.
    pub max_retries: u32,
    pub retry_backoff_base_ms: u64,
}

/// POSTs JSON bodies to a fixed availability endpoint.
///
/// 429 and 5xx responses and network failures are retried with exponential
/// back-off. Other non-2xx statuses and non-JSON bodies fail immediately.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint_url: String,
    max_retries: u32,
    retry_backoff_base_ms: u64,
}

impl HttpTransport {
    /// # Errors
    ///
    /// - [`TransportError::InvalidHeader`] if a configured header name or
    ///   value is not valid HTTP.
    /// - [`TransportError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(config: HttpTransportConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(config.user_agent.as_str())
            .default_headers(header_map(&config.headers)?)
            .build()?;

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url,
            max_retries: config.max_retries,
            retry_backoff_base_ms: config.retry_backoff_base_ms,
        })
    }

    #[must_use]
    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    async fn post_once(&self, body: &Value) -> Result<Value, TransportError> {
        let response = self.client.post(&self.endpoint_url).json(body).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(TransportError::RateLimited {
                url: self.endpoint_url.clone(),
                retry_after_secs,
            });
        }

        if !status.is_success() {
            return Err(TransportError::UnexpectedStatus {
                status: status.as_u16(),
                url: self.endpoint_url.clone(),
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|source| TransportError::Decode {
            url: self.endpoint_url.clone(),
            source,
        })
    }
}

impl Transport for HttpTransport {
    async fn submit(&self, body: &Value) -> Result<Value, TransportError> {
        retry_with_backoff(self.max_retries, self.retry_backoff_base_ms, || {
            self.post_once(body)
        })
        .await
    }
}

fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, TransportError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let invalid = || TransportError::InvalidHeader { name: name.clone() };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value).map_err(|_| invalid())?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}
