//! Tag string parsing
//!
//! Turns `level/level/...` text into a [`Tag`]. Parsing runs in two passes:
//! the lexer splits the input into level and separator tokens, then the parser
//! walks the tokens alternating between expecting a level and a separator.
//!
//! # Examples
//!
//! ```
//! use tagpath::domain::parse_tag;
//!
//! let tag = parse_tag("a/b/c").unwrap();
//! assert_eq!(tag.levels(), &["a", "b", "c"]);
//! ```

use crate::domain::tag::{Tag, SEPARATOR};
use std::fmt;
use thiserror::Error;

/// Reasons a tag string is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagParseError {
    #[error("empty tag")]
    Empty,

    #[error("unexpected token {found} at position {position}, expected {expected}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
        position: usize,
    },
}

/// Kinds of lexical tokens in a tag string
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Level,
    Separator,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Level => write!(f, "level"),
            TokenKind::Separator => write!(f, "separator"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token<'a> {
    Level(&'a str),
    Separator,
}

impl Token<'_> {
    fn kind(&self) -> TokenKind {
        match self {
            Token::Level(_) => TokenKind::Level,
            Token::Separator => TokenKind::Separator,
        }
    }
}

/// Parse a tag from its string form.
///
/// Leading and doubled separators are rejected. A single trailing separator is
/// accepted and dropped, so `"a/"` parses to `["a"]`: the token stream ends
/// right after the separator and no further level is demanded.
pub fn parse_tag(text: &str) -> Result<Tag, TagParseError> {
    parse(&lex(text))
}

/// Split text into tokens. Each `/` is a separator; each maximal run of other
/// characters is a level.
fn lex(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if c == SEPARATOR {
            tokens.push(Token::Separator);
            rest = &rest[c.len_utf8()..];
        } else {
            let end = rest.find(SEPARATOR).unwrap_or(rest.len());
            tokens.push(Token::Level(&rest[..end]));
            rest = &rest[end..];
        }
    }

    tokens
}

fn parse(tokens: &[Token<'_>]) -> Result<Tag, TagParseError> {
    if tokens.is_empty() {
        return Err(TagParseError::Empty);
    }

    let mut levels = Vec::new();
    let mut expect = TokenKind::Level;

    for (position, token) in tokens.iter().enumerate() {
        if token.kind() != expect {
            return Err(TagParseError::UnexpectedToken {
                expected: expect,
                found: token.kind(),
                position,
            });
        }

        expect = match token {
            Token::Level(value) => {
                levels.push(value.to_string());
                TokenKind::Separator
            }
            Token::Separator => TokenKind::Level,
        };
    }

    Ok(Tag::new(levels))
}
