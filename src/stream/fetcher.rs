//! Page fetcher
//!
//! One GET per page, negotiated to the feed's Atom JSON media type and decoded
//! into a typed `Page`. Errors propagate unmodified; nothing is retried here.

use crate::entity::Page;
use crate::transport::{Request, Transport};
use crate::Result;
use std::sync::Arc;

/// Retrieves and decodes feed pages
#[derive(Clone)]
pub struct PageFetcher {
    transport: Arc<dyn Transport>,
}

impl PageFetcher {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Fetches the page at `uri`
    ///
    /// # Returns
    ///
    /// * `Ok(Page)` - The decoded page
    /// * `Err(StreamError)` - Transport failure, non-success status, or a
    ///   malformed/incomplete document
    pub async fn fetch_page(&self, uri: &str) -> Result<Page> {
        tracing::debug!("Fetching page {}", uri);

        let document = self.transport.send(&Request::get_atom(uri)).await?;
        let page = Page::from_document(uri, document)?;

        tracing::trace!("Page {} holds {} entries", page.id, page.len());
        Ok(page)
    }
}
