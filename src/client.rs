//! Client facade
//!
//! Owns the shared transport and hands out per-stream endpoints.

use crate::config::Config;
use crate::stream::StreamEndpoint;
use crate::transport::{HttpTransport, Transport, DEFAULT_CONCURRENCY};
use crate::Result;
use std::sync::Arc;

/// Entry point for reading streams from one service
///
/// # Example
///
/// ```no_run
/// use futures::TryStreamExt;
/// use std::path::Path;
/// use sumi_stream::config::load_config;
/// use sumi_stream::EventStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let store = EventStore::from_config(&config)?;
///
/// let mut events = store.stream("orders").read_forwards();
/// while let Some(event) = events.try_next().await? {
///     println!("{} {}", event.event_number, event.event_type);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct EventStore {
    transport: Arc<dyn Transport>,
    concurrency: usize,
}

impl EventStore {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets the number of enrichment requests allowed in flight per page
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Builds an HTTP-backed store from a validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = HttpTransport::from_config(config)?;
        tracing::debug!("Reading from {}", transport.base_url());
        Ok(Self::new(Arc::new(transport)).with_concurrency(config.reader.concurrency))
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Returns the endpoint for the stream called `name`
    pub fn stream(&self, name: &str) -> StreamEndpoint {
        StreamEndpoint::new(Arc::clone(&self.transport), name, self.concurrency)
    }
}
