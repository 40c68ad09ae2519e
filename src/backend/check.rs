//! Host type-check boundary.
//!
//! The compiler does no semantic analysis of its own. Generated Rust source
//! is handed to `rustc` in metadata-only mode, which type-checks the program
//! without producing a binary, and whatever diagnostics come back are shown
//! to the user as-is.

use std::path::Path;
use std::process::Command;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to launch rustc: {0}")]
    Spawn(#[from] std::io::Error),
}

/// The outcome of one metadata-only compile.
#[derive(Debug)]
pub struct CheckReport {
    pub success: bool,
    /// Raw rustc diagnostics, empty on a clean check.
    pub diagnostics: String,
}

/// Type-check a generated Rust file with the host toolchain.
///
/// The file is compiled as a library so units without an entry point still
/// check; metadata lands in `out_dir` and is never read back.
#[tracing::instrument(skip_all, fields(source = %source.display()))]
pub fn check_generated(source: &Path, out_dir: &Path) -> Result<CheckReport, CheckError> {
    let output = Command::new("rustc")
        .arg("--edition")
        .arg("2021")
        .arg("--crate-type")
        .arg("lib")
        .arg("--emit")
        .arg("metadata")
        .arg("--out-dir")
        .arg(out_dir)
        .arg(source)
        .output()?;

    Ok(CheckReport {
        success: output.status.success(),
        diagnostics: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}
