//! Per-stream endpoint
//!
//! Entry point for reading one named stream: the head page, full traversals in
//! either direction, and direct access to a single event.

use crate::entity::{EnrichedEvent, Page, Relation};
use crate::stream::enricher::BatchEnricher;
use crate::stream::fetcher::PageFetcher;
use crate::stream::walker::{Direction, EventStream, StreamWalker};
use crate::transport::{Request, Transport};
use crate::Result;
use std::sync::Arc;

/// Reader for the stream at `streams/{name}`
#[derive(Clone)]
pub struct StreamEndpoint {
    name: String,
    uri: String,
    transport: Arc<dyn Transport>,
    concurrency: usize,
}

impl StreamEndpoint {
    pub fn new(transport: Arc<dyn Transport>, name: impl Into<String>, concurrency: usize) -> Self {
        let name = name.into();
        Self {
            uri: format!("streams/{}", name),
            name,
            transport,
            concurrency,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// URI of the stream's root page
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Fetches the stream's root (head) page
    pub async fn read(&self) -> Result<Page> {
        self.fetcher().fetch_page(&self.uri).await
    }

    /// All events, oldest page first
    pub fn read_forwards(&self) -> EventStream {
        self.walk(Direction::Forward)
    }

    /// All events, newest first
    pub fn read_backwards(&self) -> EventStream {
        self.walk(Direction::Backward)
    }

    /// Starts a lazy traversal in `direction`
    ///
    /// Nothing is requested until the returned stream is polled.
    pub fn walk(&self, direction: Direction) -> EventStream {
        tracing::debug!("Reading stream {} {:?}", self.name, direction);
        StreamWalker::new(self.fetcher(), self.enricher(), self.uri.clone(), direction).into_stream()
    }

    /// Reads a single event by number, bypassing page traversal
    pub async fn read_event(&self, event_number: u64) -> Result<EnrichedEvent> {
        let uri = format!("{}/{}", self.uri, event_number);
        let document = self.transport.send(&Request::get_atom(uri.as_str())).await?;
        EnrichedEvent::from_document(&uri, document)
    }

    /// Fetches the page that `relation` of `page` points at
    ///
    /// # Returns
    ///
    /// * `Ok(Page)` - The linked page
    /// * `Err(StreamError::MissingRelation)` - `page` has no such link
    pub async fn follow(&self, page: &Page, relation: &Relation) -> Result<Page> {
        let link = page.require_link(relation)?;
        self.fetcher().fetch_page(&link.uri).await
    }

    fn fetcher(&self) -> PageFetcher {
        PageFetcher::new(Arc::clone(&self.transport))
    }

    fn enricher(&self) -> BatchEnricher {
        BatchEnricher::new(Arc::clone(&self.transport), self.concurrency)
    }
}
