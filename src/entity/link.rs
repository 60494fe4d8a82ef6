//! Link relations and the per-document link index
//!
//! Every page and every entry carries a list of `{uri, relation}` pairs. The
//! index keeps at most one link per relation; when a document repeats a
//! relation, the last occurrence wins.

use crate::{Result, StreamError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// The role a link plays relative to the document that carries it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(from = "String", into = "String")]
pub enum Relation {
    /// Oldest page of the stream
    First,
    /// Page holding the stream head
    Last,
    Next,
    Previous,
    /// Full representation of an entry
    Alternate,
    Edit,
    /// Any relation not named above (e.g. `self`, `metadata`)
    ///
    /// Build relations with `Relation::from(name)`. A hand-built `Other` holding
    /// a known name is not equal to its named variant; `LinkIndex` normalises
    /// such keys on insert and lookup.
    Other(String),
}

impl Relation {
    /// Returns the wire name of the relation
    pub fn as_str(&self) -> &str {
        match self {
            Self::First => "first",
            Self::Last => "last",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::Alternate => "alternate",
            Self::Edit => "edit",
            Self::Other(name) => name,
        }
    }

    /// Maps an `Other` carrying a known name onto its named variant
    pub fn canonical(&self) -> Relation {
        match self {
            Self::Other(name) => Relation::from(name.as_str()),
            known => known.clone(),
        }
    }
}

impl From<String> for Relation {
    fn from(name: String) -> Self {
        match name.as_str() {
            "first" => Self::First,
            "last" => Self::Last,
            "next" => Self::Next,
            "previous" => Self::Previous,
            "alternate" => Self::Alternate,
            "edit" => Self::Edit,
            _ => Self::Other(name),
        }
    }
}

impl From<&str> for Relation {
    fn from(name: &str) -> Self {
        Self::from(name.to_string())
    }
}

impl From<Relation> for String {
    fn from(relation: Relation) -> Self {
        match relation {
            Relation::Other(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single `{uri, relation}` pair
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Link {
    pub uri: String,
    pub relation: Relation,
}

impl Link {
    pub fn new(uri: impl Into<String>, relation: impl Into<Relation>) -> Self {
        Self {
            uri: uri.into(),
            relation: relation.into(),
        }
    }
}

/// Relation-keyed lookup over the links of one document
///
/// Absence of a relation is a normal outcome: a root page without `first` is an
/// empty stream, a root page without `last` fits on a single page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<Link>")]
pub struct LinkIndex {
    links: HashMap<Relation, Link>,
}

impl LinkIndex {
    /// Builds an index from links in document order
    pub fn from_links(links: impl IntoIterator<Item = Link>) -> Self {
        let mut index = HashMap::new();
        for link in links {
            index.insert(link.relation.canonical(), link);
        }
        Self { links: index }
    }

    pub fn has_relation(&self, relation: &Relation) -> bool {
        self.get_relation(relation).is_some()
    }

    pub fn get_relation(&self, relation: &Relation) -> Option<&Link> {
        match relation {
            Relation::Other(_) => self.links.get(&relation.canonical()),
            known => self.links.get(known),
        }
    }

    /// Looks up a relation the caller cannot proceed without
    ///
    /// # Arguments
    ///
    /// * `relation` - The relation to resolve
    /// * `owner_id` - Id of the document carrying this index, used in the error
    ///
    /// # Returns
    ///
    /// * `Ok(&Link)` - The link registered for the relation
    /// * `Err(StreamError::MissingRelation)` - The relation is absent
    pub fn require(&self, relation: &Relation, owner_id: &str) -> Result<&Link> {
        self.get_relation(relation)
            .ok_or_else(|| StreamError::MissingRelation {
                owner_id: owner_id.to_string(),
                relation: relation.clone(),
            })
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

impl From<Vec<Link>> for LinkIndex {
    fn from(links: Vec<Link>) -> Self {
        Self::from_links(links)
    }
}
