//! Hierarchical tag model

use crate::domain::parser::{parse_tag, TagParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Separator between the levels of a tag in its string form
pub const SEPARATOR: char = '/';

/// A path from a root namespace down to a leaf category, e.g. `a/b/c`.
///
/// Two tags are equal when they have the same levels in the same order.
/// Structured values are taken as given: constructing a `Tag` from a vector
/// does not re-check that levels are non-empty or free of separators. Use
/// [`parse_tag`] (or `str::parse`) when the input is untrusted text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(Vec<String>);

impl Tag {
    pub fn new(levels: Vec<String>) -> Self {
        Tag(levels)
    }

    pub fn levels(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when the first `prefix.len()` levels of this tag equal `prefix`.
    ///
    /// A tag shorter than the prefix never matches.
    pub fn has_prefix(&self, prefix: &Tag) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, level) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            write!(f, "{}", level)?;
        }
        Ok(())
    }
}

impl FromStr for Tag {
    type Err = TagParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_tag(s)
    }
}

impl From<Vec<String>> for Tag {
    fn from(levels: Vec<String>) -> Self {
        Tag(levels)
    }
}

impl From<Vec<&str>> for Tag {
    fn from(levels: Vec<&str>) -> Self {
        Tag(levels.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Tag {
    fn from(levels: [&str; N]) -> Self {
        Tag(levels.iter().map(|l| l.to_string()).collect())
    }
}

/// Argument accepted by the tagging operations: either an already structured
/// tag or its string form, which still has to go through the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagInput {
    Structured(Tag),
    Raw(String),
}

impl TagInput {
    /// Resolve the input to a canonical tag, parsing raw strings.
    pub fn normalize(self) -> Result<Tag, TagParseError> {
        match self {
            TagInput::Structured(tag) => Ok(tag),
            TagInput::Raw(text) => parse_tag(&text),
        }
    }
}

impl From<Tag> for TagInput {
    fn from(tag: Tag) -> Self {
        TagInput::Structured(tag)
    }
}

impl From<&Tag> for TagInput {
    fn from(tag: &Tag) -> Self {
        TagInput::Structured(tag.clone())
    }
}

impl From<&str> for TagInput {
    fn from(text: &str) -> Self {
        TagInput::Raw(text.to_string())
    }
}

impl From<String> for TagInput {
    fn from(text: String) -> Self {
        TagInput::Raw(text)
    }
}

impl From<Vec<String>> for TagInput {
    fn from(levels: Vec<String>) -> Self {
        TagInput::Structured(Tag::from(levels))
    }
}

impl From<Vec<&str>> for TagInput {
    fn from(levels: Vec<&str>) -> Self {
        TagInput::Structured(Tag::from(levels))
    }
}

impl<const N: usize> From<[&str; N]> for TagInput {
    fn from(levels: [&str; N]) -> Self {
        TagInput::Structured(Tag::from(levels))
    }
}

/// Tags attached to one key. Backed by a vector to keep insertion order, but
/// never holds two equal tags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet(Vec<Tag>);

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tag unless an equal one is already present.
    /// Returns whether the set changed.
    pub fn insert(&mut self, tag: Tag) -> bool {
        if self.0.contains(&tag) {
            return false;
        }
        self.0.push(tag);
        true
    }

    /// Remove every element equal to `tag`, returning how many were removed
    pub fn remove(&mut self, tag: &Tag) -> usize {
        let before = self.0.len();
        self.0.retain(|t| t != tag);
        before - self.0.len()
    }

    pub fn contains(&self, tag: &Tag) -> bool {
        self.0.contains(tag)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Tag] {
        &self.0
    }
}

impl From<Vec<Tag>> for TagSet {
    fn from(tags: Vec<Tag>) -> Self {
        let mut set = TagSet::new();
        for tag in tags {
            set.insert(tag);
        }
        set
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A key together with its tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
    pub id: String,
    pub tag_set: TagSet,
}

impl KeyRecord {
    pub fn new(id: String, tag_set: TagSet) -> Self {
        KeyRecord { id, tag_set }
    }
}
