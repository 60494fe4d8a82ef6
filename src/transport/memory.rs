//! In-memory transport for tests
//!
//! Serves canned documents by URI, with optional per-URI latency and failure
//! status, and records every request plus the peak number in flight.

use crate::transport::{Request, Transport};
use crate::{Result, StreamError};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
pub(crate) struct MemoryTransport {
    documents: HashMap<String, Value>,
    delays: HashMap<String, Duration>,
    statuses: HashMap<String, u16>,
    log: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `document` at `uri`; registering the same URI twice panics
    pub fn with_document(mut self, uri: impl Into<String>, document: Value) -> Self {
        let uri = uri.into();
        assert!(
            !self.documents.contains_key(&uri),
            "document already registered at {}",
            uri
        );
        self.documents.insert(uri, document);
        self
    }

    pub fn with_delay(mut self, uri: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(uri.into(), delay);
        self
    }

    pub fn with_status(mut self, uri: impl Into<String>, status: u16) -> Self {
        self.statuses.insert(uri.into(), status);
        self
    }

    /// Registers the full event documents for `numbers` of `stream`
    pub fn with_events(mut self, stream: &str, numbers: impl IntoIterator<Item = u64>) -> Self {
        for n in numbers {
            self = self.with_document(event_uri(stream, n), event_document(stream, n));
        }
        self
    }

    /// URIs requested so far, in the order requests started
    pub fn requests(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn send(&self, request: &Request) -> Result<Value> {
        self.log.lock().unwrap().push(request.uri.clone());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&request.uri) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if let Some(status) = self.statuses.get(&request.uri) {
            return Err(StreamError::Status {
                uri: request.uri.clone(),
                status: *status,
            });
        }

        self.documents
            .get(&request.uri)
            .cloned()
            .ok_or_else(|| StreamError::Status {
                uri: request.uri.clone(),
                status: 404,
            })
    }
}

pub(crate) fn event_uri(stream: &str, number: u64) -> String {
    format!("streams/{}/{}", stream, number)
}

pub(crate) fn event_document(stream: &str, number: u64) -> Value {
    json!({
        "eventStreamId": stream,
        "eventNumber": number,
        "eventType": "TestEvent",
        "eventId": format!("00000000-0000-0000-0000-{:012}", number),
        "data": {"n": number},
        "metadata": {}
    })
}

/// Entry stub whose `alternate` link points at `event_uri(stream, number)`
pub(crate) fn entry_document(stream: &str, number: u64) -> Value {
    json!({
        "title": format!("{}@{}", number, stream),
        "id": event_uri(stream, number),
        "updated": "2024-03-01T09:15:42.123456Z",
        "author": {"name": "EventStore"},
        "summary": "TestEvent",
        "links": [
            {"uri": event_uri(stream, number), "relation": "edit"},
            {"uri": event_uri(stream, number), "relation": "alternate"}
        ]
    })
}

/// Page document listing `numbers` in the given (feed) order
pub(crate) fn page_document(
    stream: &str,
    page_id: &str,
    links: &[(&str, &str)],
    numbers: &[u64],
) -> Value {
    let links: Vec<Value> = links
        .iter()
        .map(|(relation, uri)| json!({"uri": uri, "relation": relation}))
        .collect();
    let entries: Vec<Value> = numbers.iter().map(|n| entry_document(stream, *n)).collect();

    json!({
        "title": format!("Event stream '{}'", stream),
        "id": page_id,
        "updated": "2024-03-01T09:15:42.123456Z",
        "streamId": stream,
        "author": {"name": "EventStore"},
        "headOfStream": false,
        "links": links,
        "entries": entries
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "document already registered at streams/X/2")]
    fn test_page_and_event_at_same_uri_panics() {
        MemoryTransport::new()
            .with_document("streams/X/2", page_document("X", "streams/X/2", &[], &[]))
            .with_events("X", 1..3);
    }

    #[tokio::test]
    async fn test_serves_registered_document() {
        let transport = MemoryTransport::new().with_events("orders", [4]);
        let document = transport
            .send(&Request::get(event_uri("orders", 4)))
            .await
            .unwrap();

        assert_eq!(document, event_document("orders", 4));
        assert_eq!(transport.requests(), vec![event_uri("orders", 4)]);
    }
}
