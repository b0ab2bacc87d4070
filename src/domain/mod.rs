//! Domain layer - Tag model, parsing and matching

pub mod parser;
pub mod query;
pub mod tag;

pub use parser::{parse_tag, TagParseError, TokenKind};
pub use query::{matching_keys, TagQuery};
pub use tag::{KeyRecord, Tag, TagInput, TagSet, SEPARATOR};
