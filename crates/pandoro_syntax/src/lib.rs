//! Shared syntax frontend for the Pandoro language: scanner, parser, AST, rewrite passes, diagnostics.
//!
//! This crate is intended for reuse across the compiler and future tooling; the
//! backend (code emission, host type-checking) lives in the root crate.
//!
//! ## Notes
//! - Positions are 1-based byte offsets into the scanned source; `Pos::NONE`
//!   marks synthesized nodes (see [`ast::Pos`]).
//! - The parser is fail-fast: the first error aborts the unit with a
//!   [`diagnostics::ParseError`], there is no recovery or resynchronization.
//! - Value expressions are delegated: the parser captures a raw span and hands
//!   it to [`expr::parse_value`], which folds the host grammar's tree into
//!   [`ast::Expr`].
//!
//! ## Examples
//! ```rust,no_run
//! use pandoro_syntax::{lower, parser};
//!
//! let mut file = parser::parse_file("hello.pan", "fn main() begin\n  printf(\"hi\")\nend").unwrap();
//! lower::rewrite_builtins(&mut file);
//! lower::lower_unions(&mut file);
//! assert_eq!(file.decls.len(), 2);
//! ```

pub mod ast;
pub mod cursor;
pub mod diagnostics;
pub mod expr;
pub mod lower;
pub mod parser;
pub mod scanner;
