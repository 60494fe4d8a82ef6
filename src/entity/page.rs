//! Page and entry documents
//!
//! A page is one slice of a stream's feed. Its entries are lightweight stubs;
//! the full event sits behind each entry's `alternate` link.

use crate::entity::link::{Link, LinkIndex, Relation};
use crate::entity::timestamp;
use crate::{Result, StreamError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

/// Feed author block
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Author {
    pub name: String,
}

/// Summary reference to one event within a page
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryStub {
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated: DateTime<Utc>,
    pub summary: String,
    pub author: Option<Author>,
    pub links: LinkIndex,
}

impl EntryStub {
    /// Returns the link to the entry's full event document
    ///
    /// # Returns
    ///
    /// * `Ok(&Link)` - The `alternate` link
    /// * `Err(StreamError::MissingLink)` - The entry cannot be enriched
    pub fn alternate(&self) -> Result<&Link> {
        self.links
            .get_relation(&Relation::Alternate)
            .ok_or_else(|| StreamError::MissingLink {
                entry_id: self.id.clone(),
            })
    }
}

/// One page of a stream feed
///
/// Entries are kept in the feed's native order, which is newest-first for the
/// service this crate talks to.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub updated: DateTime<Utc>,
    pub stream_id: String,
    pub author: Option<Author>,
    #[serde(default)]
    pub head_of_stream: bool,
    pub self_url: Option<String>,
    pub e_tag: Option<String>,
    pub links: LinkIndex,
    pub entries: Vec<EntryStub>,
}

impl Page {
    /// Decodes a page from a fetched JSON document
    ///
    /// # Arguments
    ///
    /// * `uri` - The URI the document was fetched from (for error reporting)
    /// * `document` - The decoded JSON body
    ///
    /// # Returns
    ///
    /// * `Ok(Page)` - All required fields were present and well formed
    /// * `Err(StreamError::Parse)` - A required field is missing or malformed
    pub fn from_document(uri: &str, document: Value) -> Result<Self> {
        serde_json::from_value(document).map_err(|e| StreamError::Parse {
            uri: uri.to_string(),
            message: e.to_string(),
        })
    }

    pub fn link(&self, relation: &Relation) -> Option<&Link> {
        self.links.get_relation(relation)
    }

    pub fn require_link(&self, relation: &Relation) -> Result<&Link> {
        self.links.require(relation, &self.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
