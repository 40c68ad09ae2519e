#![forbid(unsafe_code)]
//! Pandoro Language Compiler
//!
//! Pandoro is a small declaration-oriented language that compiles to Rust
//! source. This crate provides the backend (code emission, host toolchain
//! type-checking) and the CLI; the frontend (scanner, parser, rewrite
//! passes) lives in the `pandoro_syntax` crate.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.

pub mod backend;
pub mod cli;

pub use pandoro_syntax as syntax;

pub use backend::{emit_file, Emitter};
