//! HTTP transport abstraction and the reqwest-backed implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use probekit_common::ApiConfig;

use crate::error::{ApiError, ApiResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Method> for reqwest::Method {
    fn from(m: Method) -> Self {
        match m {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A request relative to the transport's base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: BTreeMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn headers(mut self, headers: &BTreeMap<String, String>) -> Self {
        self.headers
            .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// A received response. Non-2xx statuses are not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub ok: bool,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            ok: (200..300).contains(&status),
            body,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn json(&self) -> &Value {
        &self.body
    }

    /// Look up a top-level field of an object body
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }
}

/// Capability to issue one HTTP call
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for std::sync::Arc<T> {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        (**self).send(request).await
    }
}

/// Transport performing real network I/O
pub struct ReqwestTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
        })
    }

    pub fn from_config(config: &ApiConfig) -> ApiResult<Self> {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append `path` to the base URL, keeping any path prefix the base carries
    pub fn url_for(&self, path: &str) -> ApiResult<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let url = self.url_for(&request.path)?;
        debug!("{} {}", request.method, url);

        let mut builder = self.client.request(request.method.into(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    method: request.method,
                    path: request.path.clone(),
                }
            } else {
                ApiError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                ApiError::Timeout {
                    method: request.method,
                    path: request.path.clone(),
                }
            } else {
                ApiError::Transport(e.to_string())
            }
        })?;

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(e) => {
                    warn!("Non-JSON body from {} {}: {}", request.method, request.path, e);
                    Value::String(text)
                }
            }
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            ok: status.is_success(),
            body,
        })
    }
}
