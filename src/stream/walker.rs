//! Stream walker - the traversal state machine
//!
//! The walker enters a stream through its root page, then follows one relation
//! page by page until it disappears:
//!
//! | Direction | Enter via | Follow     | Page batches |
//! |-----------|-----------|------------|--------------|
//! | Forward   | `first`   | `next`     | as listed    |
//! | Backward  | `last`    | `previous` | reversed     |
//!
//! A root page without `first` is an empty stream going forward. A root page
//! without `last` holds the whole stream, so going backward emits its own
//! entries and stops.
//!
//! Pages are fetched one at a time and only when the consumer polls for more.
//! Each page is enriched as one unit before any of its events are yielded.

use crate::entity::{EnrichedEvent, Page, Relation};
use crate::stream::enricher::BatchEnricher;
use crate::stream::fetcher::PageFetcher;
use crate::{Result, StreamError};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use std::sync::Arc;

/// Lazy, ordered sequence of enriched events
///
/// `None` means the last page was reached; an `Err` item aborts the sequence
/// and is always the final item.
pub type EventStream = BoxStream<'static, Result<EnrichedEvent>>;

/// Chronological direction of a traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Relation on the root page that leads into the page chain
    pub fn entry_relation(&self) -> Relation {
        match self {
            Self::Forward => Relation::First,
            Self::Backward => Relation::Last,
        }
    }

    /// Relation followed from one page to the next
    pub fn follow_relation(&self) -> Relation {
        match self {
            Self::Forward => Relation::Next,
            Self::Backward => Relation::Previous,
        }
    }

    /// Returns true if each page's batch is emitted in reverse
    pub fn reverses(&self) -> bool {
        matches!(self, Self::Backward)
    }
}

/// Where the walk resumes on the next poll
#[derive(Debug)]
enum Cursor {
    Root,
    Page(String),
    Exhausted,
}

/// Drives one traversal of one stream
pub struct StreamWalker {
    fetcher: PageFetcher,
    enricher: BatchEnricher,
    root_uri: String,
    direction: Direction,
}

impl StreamWalker {
    pub fn new(
        fetcher: PageFetcher,
        enricher: BatchEnricher,
        root_uri: impl Into<String>,
        direction: Direction,
    ) -> Self {
        Self {
            fetcher,
            enricher,
            root_uri: root_uri.into(),
            direction,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Consumes the walker into a flattened event stream
    ///
    /// Dropping the stream early abandons any in-flight batch.
    pub fn into_stream(self) -> EventStream {
        let walker = Arc::new(self);

        stream::try_unfold(Cursor::Root, move |cursor| {
            let walker = Arc::clone(&walker);
            async move { walker.step(cursor).await }
        })
        .map_ok(|batch| stream::iter(batch.into_iter().map(Ok::<_, StreamError>)))
        .try_flatten()
        .boxed()
    }

    /// Processes one page and decides where to go next
    async fn step(&self, cursor: Cursor) -> Result<Option<(Vec<EnrichedEvent>, Cursor)>> {
        let (page, chained) = match cursor {
            Cursor::Exhausted => return Ok(None),
            Cursor::Root => match self.enter().await? {
                Some(landing) => landing,
                None => return Ok(None),
            },
            Cursor::Page(uri) => (self.fetcher.fetch_page(&uri).await?, true),
        };

        let events = self
            .enricher
            .enrich(&page.entries, self.direction.reverses())
            .await?;

        let next = if chained {
            self.next_cursor(&page)
        } else {
            Cursor::Exhausted
        };
        tracing::trace!("Page {} yielded {} events, next: {:?}", page.id, events.len(), next);

        Ok(Some((events, next)))
    }

    /// Fetches the root page and lands on the first page to emit
    ///
    /// The flag is false when the landing page is the root itself, which ends
    /// the walk after it.
    async fn enter(&self) -> Result<Option<(Page, bool)>> {
        let root = self.fetcher.fetch_page(&self.root_uri).await?;
        let relation = self.direction.entry_relation();

        match root.link(&relation) {
            Some(link) => {
                tracing::debug!("Entering {} via '{}': {}", root.stream_id, relation, link.uri);
                let page = self.fetcher.fetch_page(&link.uri).await?;
                Ok(Some((page, true)))
            }
            None => match self.direction {
                Direction::Forward => {
                    tracing::debug!("Stream {} has no '{}' link, nothing to read", root.stream_id, relation);
                    Ok(None)
                }
                Direction::Backward => {
                    tracing::debug!("Stream {} fits on its root page", root.stream_id);
                    Ok(Some((root, false)))
                }
            },
        }
    }

    fn next_cursor(&self, page: &Page) -> Cursor {
        match page.link(&self.direction.follow_relation()) {
            Some(link) => Cursor::Page(link.uri.clone()),
            None => {
                tracing::debug!("Page {} is the end of the chain", page.id);
                Cursor::Exhausted
            }
        }
    }
}
