//! HTTP transport implementation
//!
//! This module sends requests to the event-stream service, including:
//! - Building HTTP clients with proper user agent strings
//! - Resolving relative stream URIs against the configured base URL
//! - Applying the default feed media type to Content-Type and Accept
//! - Error classification (timeouts, refused connections, HTTP status)

use crate::config::{Config, UserAgentConfig};
use crate::transport::{Request, Transport, DEFAULT_CONTENT_TYPE};
use crate::{Result, StreamError};
use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `request_timeout` - Total time allowed per request
/// * `connect_timeout` - Time allowed to establish a connection
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_stream::config::UserAgentConfig;
/// use sumi_stream::transport::build_http_client;
///
/// let config = UserAgentConfig {
///     client_name: "SumiStream".to_string(),
///     client_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client =
///     build_http_client(&config, Duration::from_secs(30), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    request_timeout: Duration,
    connect_timeout: Duration,
) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Transport backed by a reqwest client
///
/// Cloning is cheap; the underlying connection pool is shared.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    /// Creates a transport sending requests relative to `base_url`
    ///
    /// A trailing slash is added to the base path when missing, so that
    /// `streams/orders` resolves beneath it rather than replacing its last
    /// segment.
    pub fn new(client: Client, mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    /// Builds a transport from the `[server]` and `[user-agent]` sections
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_millis(config.server.request_timeout),
            Duration::from_millis(config.server.connect_timeout),
        )?;
        let base_url = Url::parse(&config.server.base_url)?;
        Ok(Self::new(client, base_url))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a link URI; absolute URIs pass through unchanged
    pub fn resolve(&self, uri: &str) -> Result<Url> {
        Ok(self.base_url.join(uri)?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &Request) -> Result<Value> {
        let url = self.resolve(&request.uri)?;

        let mut headers = request.headers.clone();
        headers
            .entry(CONTENT_TYPE)
            .or_insert(HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
        headers
            .entry(ACCEPT)
            .or_insert(HeaderValue::from_static(DEFAULT_CONTENT_TYPE));

        tracing::trace!("{} {}", request.method, url);

        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| classify_error(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::Status {
                uri: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| classify_error(url.as_str(), e))?;

        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&body).map_err(|e| StreamError::Parse {
            uri: url.to_string(),
            message: e.to_string(),
        })
    }
}

/// Maps a reqwest failure to a transport error
fn classify_error(uri: &str, error: reqwest::Error) -> StreamError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        "Connection refused".to_string()
    } else {
        error.to_string()
    };

    StreamError::Transport {
        uri: uri.to_string(),
        message,
    }
}
