//! Error taxonomy for the syntax frontend.
//!
//! Parsing is all-or-nothing: every error here is fatal to the current parse,
//! there is no recovery or resynchronization. Errors carry the source position
//! as a labeled [`SourceSpan`] so the CLI can render annotated snippets with
//! `miette`.

use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

use crate::ast::Pos;

/// Fatal low-level lexical errors.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ScanError {
    #[error("unterminated string literal")]
    #[diagnostic(code(pandoro::scan::unterminated_string))]
    UnterminatedString {
        #[label("string starts here")]
        at: SourceSpan,
    },

    #[error("unterminated block comment")]
    #[diagnostic(code(pandoro::scan::unterminated_comment))]
    UnterminatedComment {
        #[label("comment starts here")]
        at: SourceSpan,
    },
}

impl ScanError {
    /// Position of the offending lexeme.
    pub fn pos(&self) -> Pos {
        match self {
            ScanError::UnterminatedString { at } | ScanError::UnterminatedComment { at } => {
                Pos::from_offset(at.offset())
            }
        }
    }
}

/// Fatal parse errors.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ParseError {
    /// A required literal or token kind did not match.
    #[error("expected {expected}, found {found}")]
    #[diagnostic(code(pandoro::parse::unexpected_token))]
    UnexpectedToken {
        /// What the grammar required, quoted for literals (e.g. `"end"`).
        expected: String,
        /// What was actually seen (`end of input` at EOF).
        found: String,
        #[label("here")]
        at: SourceSpan,
    },

    /// A raw span handed to the delegated expression parser failed to parse.
    #[error("malformed expression {span:?}: {detail}")]
    #[diagnostic(code(pandoro::parse::malformed_literal))]
    MalformedLiteral {
        /// The offending raw text.
        span: String,
        /// The collaborator's own description of the failure.
        detail: String,
        #[label("in this expression")]
        at: SourceSpan,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Scan(#[from] ScanError),
}

impl ParseError {
    pub(crate) fn unexpected(expected: impl Into<String>, found: &str, pos: Pos) -> Self {
        let found_desc = if found.is_empty() {
            "end of input".to_string()
        } else {
            format!("{found:?}")
        };
        ParseError::UnexpectedToken {
            expected: expected.into(),
            found: found_desc,
            at: span_at(pos, found.len()),
        }
    }

    /// Position of the error site.
    pub fn pos(&self) -> Pos {
        match self {
            ParseError::UnexpectedToken { at, .. } | ParseError::MalformedLiteral { at, .. } => {
                Pos::from_offset(at.offset())
            }
            ParseError::Scan(scan) => scan.pos(),
        }
    }
}

/// Build a labeled span from a node position and lexeme length.
pub(crate) fn span_at(pos: Pos, len: usize) -> SourceSpan {
    (pos.offset().unwrap_or(0), len.max(1)).into()
}

/// Map a byte offset to 1-based `(line, column)` in `src`.
///
/// Used for the token trace and for CLI reporting; positions inside the tree
/// stay byte-based.
pub fn line_col(src: &str, offset: usize) -> (usize, usize) {
    let clamped = offset.min(src.len());
    let prefix = &src[..clamped];
    let line = prefix.bytes().filter(|&b| b == b'\n').count() + 1;
    let col = prefix
        .rfind('\n')
        .map(|nl| clamped - nl)
        .unwrap_or(clamped + 1);
    (line, col)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_col_maps_offsets() {
        let src = "fn main() begin\nend";
        assert_eq!(line_col(src, 0), (1, 1));
        assert_eq!(line_col(src, 3), (1, 4));
        assert_eq!(line_col(src, 16), (2, 1));
        assert_eq!(line_col(src, 18), (2, 3));
    }

    #[test]
    fn unexpected_token_names_eof() {
        let err = ParseError::unexpected("\"end\"", "", Pos::from_offset(42));
        assert_eq!(err.to_string(), "expected \"end\", found end of input");
        assert_eq!(err.pos(), Pos::from_offset(42));
    }
}
