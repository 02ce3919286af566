//! HTTP transport for the carrier API
//!
//! The session builds fully-formed [`ApiRequest`]s and hands them to a
//! [`Transport`]. The production transport sends them with `reqwest`; tests
//! plug in a recording transport instead.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::fmt;
use tmstat_core::error::Result;
use tracing::debug;

/// HTTP methods used by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// A request ready to be sent
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path below the API root, starting with `/`
    pub path: String,
    pub headers: HeaderMap,
    /// JSON body for POST requests
    pub body: Option<Value>,
}

/// Sends API requests and returns the decoded JSON reply
///
/// Implementations return the body whatever the HTTP status, so that error
/// envelopes reach response validation.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: ApiRequest) -> Result<Value>;
}

/// `reqwest`-backed transport
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport rooted at `base_url`
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder().gzip(true).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Full URL for an API path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<Value> {
        let url = self.url_for(&request.path);
        debug!("{} {}", request.method, url);

        let mut builder = match request.method {
            HttpMethod::Get => self.client.get(&url),
            HttpMethod::Post => self.client.post(&url),
        }
        .headers(request.headers);

        if let Some(body) = &request.body {
            builder = builder.body(serde_json::to_vec(body)?);
        }

        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        debug!("{} {} -> {} ({} bytes)", request.method, url, status, bytes.len());

        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish()
    }
}
