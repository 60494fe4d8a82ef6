//! Full event documents

use crate::{Result, StreamError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Field holding the event body when the service wraps it in an Atom entry
const CONTENT_FIELD: &str = "content";

/// The full event document behind an entry's `alternate` link
///
/// `event_number` is monotonic within a stream. Traversal never re-sorts on it;
/// page and entry order already encode the sequence.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedEvent {
    pub event_stream_id: String,
    pub event_number: u64,
    pub event_type: String,
    pub event_id: String,
    pub data: Value,
    pub metadata: Value,
}

impl EnrichedEvent {
    /// Decodes an event from a fetched JSON document
    ///
    /// Accepts either the bare event body or an Atom entry whose `content`
    /// object holds the body.
    ///
    /// # Arguments
    ///
    /// * `uri` - The URI the document was fetched from (for error reporting)
    /// * `document` - The decoded JSON body
    pub fn from_document(uri: &str, document: Value) -> Result<Self> {
        let body = match document {
            Value::Object(mut fields) => match fields.remove(CONTENT_FIELD) {
                Some(content @ Value::Object(_)) => content,
                Some(other) => {
                    fields.insert(CONTENT_FIELD.to_string(), other);
                    Value::Object(fields)
                }
                None => Value::Object(fields),
            },
            other => other,
        };

        serde_json::from_value(body).map_err(|e| StreamError::Parse {
            uri: uri.to_string(),
            message: e.to_string(),
        })
    }
}
