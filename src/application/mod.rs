//! Application layer - Tagging use cases

pub mod tagger;

pub use tagger::Tagger;
