//! Sumi-Stream: a reader for paginated event-stream feeds
//!
//! This crate walks an append-only event stream exposed as a chain of Atom-style
//! pages (`first`/`last`/`next`/`previous` links), enriching every entry of a page
//! with its full event document through one bounded-concurrency batch per page.

pub mod client;
pub mod config;
pub mod entity;
pub mod stream;
pub mod transport;

use entity::Relation;
use thiserror::Error;

/// Main error type for Sumi-Stream operations
#[derive(Debug, Error)]
pub enum StreamError {
    #[error("Transport error for {uri}: {message}")]
    Transport { uri: String, message: String },

    #[error("HTTP {status} for {uri}")]
    Status { uri: String, status: u16 },

    #[error("Parse error for {uri}: {message}")]
    Parse { uri: String, message: String },

    #[error("Unable to enrich entry \"{entry_id}\" with no alternate link")]
    MissingLink { entry_id: String },

    #[error("Document {owner_id} has no '{relation}' link")]
    MissingRelation { owner_id: String, relation: Relation },

    #[error("Batch request {index} of {total} ({uri}) failed: {source}")]
    Batch {
        index: usize,
        total: usize,
        uri: String,
        #[source]
        source: Box<StreamError>,
    },

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl StreamError {
    /// Returns true if the error came from the network or the HTTP layer
    ///
    /// Batch failures are classified by the request that aborted them.
    pub fn is_transport(&self) -> bool {
        match self {
            Self::Transport { .. } | Self::Status { .. } | Self::Reqwest(_) => true,
            Self::Batch { source, .. } => source.is_transport(),
            _ => false,
        }
    }

    /// Returns true if a document was missing a required field or was malformed
    pub fn is_parse(&self) -> bool {
        match self {
            Self::Parse { .. } => true,
            Self::Batch { source, .. } => source.is_parse(),
            _ => false,
        }
    }

    /// Returns true if a required link relation was absent
    pub fn is_missing_link(&self) -> bool {
        matches!(self, Self::MissingLink { .. } | Self::MissingRelation { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Sumi-Stream operations
pub type Result<T> = std::result::Result<T, StreamError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::EventStore;
pub use config::Config;
pub use entity::{EnrichedEvent, EntryStub, Link, LinkIndex, Page};
pub use stream::{Direction, EventStream, StreamEndpoint};
pub use transport::{HttpTransport, Transport};
