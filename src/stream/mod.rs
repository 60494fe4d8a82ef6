//! Stream traversal and enrichment
//!
//! This module contains the core reading logic, including:
//! - Page fetching and decoding
//! - Batched, order-preserving enrichment of entry stubs
//! - Forward/backward traversal of the page chain as a lazy stream
//! - The per-stream endpoint tying them together

mod endpoint;
mod enricher;
mod fetcher;
mod walker;

pub use endpoint::StreamEndpoint;
pub use enricher::BatchEnricher;
pub use fetcher::PageFetcher;
pub use walker::{Direction, EventStream, StreamWalker};
