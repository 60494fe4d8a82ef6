//! Typed feed documents
//!
//! Everything here is decoded at the parse boundary: a document either yields a
//! fully populated value or a `StreamError::Parse`.

mod event;
mod link;
mod page;
pub mod timestamp;

pub use event::EnrichedEvent;
pub use link::{Link, LinkIndex, Relation};
pub use page::{Author, EntryStub, Page};
