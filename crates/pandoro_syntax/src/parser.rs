//! Recursive-descent parser for Pandoro.
//!
//! Converts source text into a [`SourceFile`] tree. The grammar is LL(1) on
//! keyword and punctuation literals: every decision dispatches on the current
//! token with one token of lookahead and no backtracking.
//!
//! Parsing is all-or-nothing: the first error aborts the parse (there is no
//! recovery or resynchronization), and no partial tree is produced.
//!
//! ## Examples
//!
//! ```rust
//! use pandoro_syntax::parser;
//!
//! let source = "fn main() begin\n  greet(\"GopherCon\")\nend";
//! let file = parser::parse_file("main.pan", source).unwrap();
//! assert_eq!(file.decls.len(), 1);
//! ```

use crate::ast::*;
use crate::cursor::{Cursor, TraceSink};
use crate::diagnostics::ParseError;
use crate::expr;
use crate::scanner::{Scanner, TokenKind};

// NOTE: This module is split across multiple files using `include!` to keep all
// parser methods in the same Rust module (preserving privacy + call patterns)
// while avoiding a single large source file.

include!("parser/core.rs");
include!("parser/helpers.rs");
include!("parser/decl.rs");
include!("parser/types.rs");
include!("parser/stmts.rs");
include!("parser/tests.rs");

/// Parse a compilation unit.
///
/// `name` is used only for position reporting. `source` is expected to have
/// leading/trailing whitespace already trimmed, so that node positions address
/// the same buffer the caller holds.
///
/// ## Errors
/// Returns the first [`ParseError`] encountered; the parse is all-or-nothing.
#[tracing::instrument(skip_all, fields(file = name, source_len = source.len()))]
pub fn parse_file(name: &str, source: &str) -> Result<SourceFile, ParseError> {
    Parser::new(name, source)?.parse()
}

/// Like [`parse_file`], with a trace sink that observes every consumed token.
pub fn parse_file_with_trace<'a>(
    name: &str,
    source: &'a str,
    sink: TraceSink<'a>,
) -> Result<SourceFile, ParseError> {
    Parser::with_trace(name, source, sink)?.parse()
}
