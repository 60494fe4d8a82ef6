use crate::transport::DEFAULT_CONCURRENCY;
use serde::Deserialize;

/// Main configuration structure for Sumi-Stream
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub reader: ReaderConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
}

/// Event-stream service connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Base URL stream paths are resolved against
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Total time allowed per request (milliseconds)
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Time allowed to establish a connection (milliseconds)
    #[serde(rename = "connect-timeout", default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

/// Traversal behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReaderConfig {
    /// Maximum enrichment requests in flight per page
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the client
    #[serde(rename = "client-name")]
    pub client_name: String,

    /// Version of the client
    #[serde(rename = "client-version")]
    pub client_version: String,

    /// URL with information about the client
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for client-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header: `Name/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.client_name, self.client_version, self.contact_url, self.contact_email
        )
    }
}

fn default_request_timeout() -> u64 {
    30_000
}

fn default_connect_timeout() -> u64 {
    10_000
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}
