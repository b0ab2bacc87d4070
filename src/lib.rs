//! tagpath - Hierarchical key tagging
//!
//! Keys are annotated with path-like tags such as `project/alpha/docs` and
//! looked up later either by exact tag or by any ancestor of it. Persistence
//! is delegated to a [`DocumentStore`](infrastructure::DocumentStore), with an
//! in-memory store and a TOML snapshot store provided.
//!
//! [`TaggerConfig`](infrastructure::TaggerConfig) and `Tagger::from_config`
//! are optional wiring for picking a store and field name. The tagging
//! operations only need a store handed to [`Tagger::new`].

pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;

pub use application::Tagger;
pub use domain::{parse_tag, Tag, TagInput, TagParseError, TagSet};
pub use error::{Result, TaggerError};
