//! Tag matching for key lookups
//!
//! Stores answer both lookups with [`matching_keys`], a pure pass over their
//! records, so any backend that can enumerate `(key, tags)` pairs gets exact
//! and ancestor queries for free.

use crate::domain::tag::Tag;
use std::collections::HashSet;

/// A lookup against the tags attached to keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagQuery {
    /// Stored tag equals this tag exactly
    Exact(Tag),

    /// Stored tag starts with this tag (itself included)
    Parent(Tag),
}

impl TagQuery {
    /// Whether a single stored tag satisfies this query
    pub fn matches_tag(&self, tag: &Tag) -> bool {
        match self {
            TagQuery::Exact(expected) => tag == expected,
            TagQuery::Parent(prefix) => tag.has_prefix(prefix),
        }
    }

    /// Whether any tag of a key satisfies this query
    pub fn matches<'a, I>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = &'a Tag>,
    {
        tags.into_iter().any(|tag| self.matches_tag(tag))
    }
}

/// Collect the keys owning at least one matching tag.
///
/// Keys come back in the order the records are visited, each at most once even
/// when several of its tags match.
pub fn matching_keys<'a, R, T>(records: R, query: &TagQuery) -> Vec<String>
where
    R: IntoIterator<Item = (&'a str, T)>,
    T: IntoIterator<Item = &'a Tag>,
{
    let mut seen = HashSet::new();
    let mut keys = Vec::new();

    for (key, tags) in records {
        if query.matches(tags) && seen.insert(key) {
            keys.push(key.to_string());
        }
    }

    keys
}
