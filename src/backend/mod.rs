//! Pandoro compiler backend.
//!
//! The frontend hands over a parsed and lowered [`pandoro_syntax::ast::SourceFile`];
//! this module turns it into checked Rust source.
//!
//! The pipeline is:
//! 1. Lowered AST -> `Emitter` (`quote!`) -> `syn::File` -> `prettyplease`
//! 2. `rustc --emit metadata` type-checks the generated file
//!
//! ## Module Organization
//!
//! - `emit` - Token-level emission and formatting
//! - `format` - Printf directive translation
//! - `check` - Host toolchain type-check boundary

pub mod check;
pub mod emit;
pub mod format;

pub use check::{check_generated, CheckReport};
pub use emit::{emit_file, EmitError, Emitter};
