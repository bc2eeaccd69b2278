use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use crate::config::ClientConfig;
use crate::error::{ApiError, TransportError};
use crate::http_utils::{join_base_path, origin_of};

pub const API_KEY_HEADER: &str = "x-api-key";

static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
}

impl Method {
    fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    pub method: Method,
    pub body: Option<Value>,
    /// Extra headers; they replace the defaults on a name collision.
    pub headers: Vec<(String, String)>,
    pub query: Vec<(&'static str, String)>,
}

impl CallOptions {
    pub fn post(body: Value) -> Self {
        Self {
            method: Method::Post,
            body: Some(body),
            ..Self::default()
        }
    }

    pub fn get() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl IntoIterator<Item = (&'static str, String)>) -> Self {
        self.query.extend(query);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Issues JSON requests against the configured backend.
///
/// Every request carries `Content-Type: application/json` and the static
/// credential header. One call is exactly one round trip: no retry, and no
/// timeout unless `ClientConfig::timeout` is set.
pub struct Transport {
    config: ClientConfig,
    http: Client,
}

impl Transport {
    pub fn new(config: ClientConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Calls `{api_base}{path}`.
    pub async fn call(&self, path: &str, options: CallOptions) -> Result<Value, TransportError> {
        let url = join_base_path(&self.config.api_base, path).map_err(TransportError::InvalidUrl)?;
        self.execute(path, url, options).await
    }

    /// Calls `{origin}{path}`, where origin is the api base without `/api`.
    pub async fn call_origin(
        &self,
        path: &str,
        options: CallOptions,
    ) -> Result<Value, TransportError> {
        let url = join_base_path(origin_of(&self.config.api_base), path)
            .map_err(TransportError::InvalidUrl)?;
        self.execute(path, url, options).await
    }

    pub fn merged_headers(&self, extra: &[(String, String)]) -> Result<HeaderMap, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(&self.config.api_key)
            .map_err(|err| TransportError::InvalidHeader(format!("{API_KEY_HEADER}: {err}")))?;
        headers.insert(HeaderName::from_static(API_KEY_HEADER), key);
        for (name, value) in extra {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|err| TransportError::InvalidHeader(format!("{name}: {err}")))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|err| TransportError::InvalidHeader(format!("{name}: {err}")))?;
            headers.insert(header_name, header_value);
        }
        Ok(headers)
    }

    async fn execute(
        &self,
        path: &str,
        url: String,
        options: CallOptions,
    ) -> Result<Value, TransportError> {
        let request_id = REQUEST_ID.fetch_add(1, Ordering::Relaxed);
        let method = options.method.as_str();
        let headers = self.merged_headers(&options.headers)?;
        let mut request = match options.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
        };
        request = request.headers(headers);
        if !options.query.is_empty() {
            request = request.query(&options.query);
        }
        let mut body_len = 0usize;
        if let Some(body) = options.body {
            let body = body.to_string();
            body_len = body.len();
            request = request.body(body);
        }
        tracing::debug!(request_id, method, path, body_len, "backend request start");

        let started = Instant::now();
        let response = request.send().await.map_err(|err| {
            tracing::debug!(
                request_id,
                timeout = err.is_timeout(),
                connect = err.is_connect(),
                error = %err,
                "backend request error"
            );
            TransportError::Network {
                path: path.to_string(),
                message: err.to_string(),
            }
        })?;
        let status = response.status();
        let text = response.text().await.map_err(|err| TransportError::Network {
            path: path.to_string(),
            message: err.to_string(),
        })?;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        tracing::info!(
            request_id,
            method,
            path,
            status = status.as_u16(),
            body_len = text.len(),
            elapsed_ms,
            "backend request"
        );

        if !status.is_success() {
            return Err(TransportError::Status(ApiError {
                path: path.to_string(),
                status_code: status.as_u16(),
                body: text,
            }));
        }
        serde_json::from_str(&text).map_err(|err| TransportError::Decode {
            path: path.to_string(),
            message: err.to_string(),
        })
    }
}
