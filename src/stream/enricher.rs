//! Batch enricher
//!
//! Resolves a page's entry stubs into full event documents with a single
//! bounded-concurrency batch. Output order is the entries' order (or its exact
//! reverse), never the order in which responses arrived.

use crate::entity::{EnrichedEvent, EntryStub};
use crate::transport::{Request, Transport};
use crate::Result;
use std::sync::Arc;

/// Turns entry stubs into enriched events, one batch per call
#[derive(Clone)]
pub struct BatchEnricher {
    transport: Arc<dyn Transport>,
    concurrency: usize,
}

impl BatchEnricher {
    pub fn new(transport: Arc<dyn Transport>, concurrency: usize) -> Self {
        Self {
            transport,
            concurrency,
        }
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Enriches `entries` in one batch
    ///
    /// Every `alternate` link is resolved before the first request goes out, so
    /// an entry without one fails the call without touching the network.
    ///
    /// # Arguments
    ///
    /// * `entries` - Entry stubs in feed order
    /// * `reverse_output` - Reverse the enriched events before returning
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<EnrichedEvent>)` - One event per entry
    /// * `Err(StreamError::MissingLink)` - An entry has no `alternate` link
    /// * `Err(StreamError::Batch)` - A request in the batch failed
    /// * `Err(StreamError::Parse)` - An event document could not be decoded
    pub async fn enrich(
        &self,
        entries: &[EntryStub],
        reverse_output: bool,
    ) -> Result<Vec<EnrichedEvent>> {
        let requests = entries
            .iter()
            .map(|entry| entry.alternate().map(|link| Request::get_atom(link.uri.clone())))
            .collect::<Result<Vec<_>>>()?;

        if requests.is_empty() {
            return Ok(Vec::new());
        }

        let uris: Vec<String> = requests.iter().map(|r| r.uri.clone()).collect();
        tracing::debug!(
            "Enriching {} entries (concurrency {})",
            requests.len(),
            self.concurrency
        );

        let documents = self
            .transport
            .fetch_many(requests, self.concurrency)
            .await?;

        let mut events = uris
            .iter()
            .zip(documents)
            .map(|(uri, document)| EnrichedEvent::from_document(uri, document))
            .collect::<Result<Vec<_>>>()?;

        if reverse_output {
            events.reverse();
        }

        Ok(events)
    }
}
