//! CLI module for the Pandoro compiler
//!
//! This module provides the command-line interface for the compiler.
//!
//! ## Commands
//!
//! - `build <file>` - Compile to Rust, write the generated file, type-check it
//! - `check <file>` - Compile and type-check without keeping output
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// The Pandoro language compiler
#[derive(Parser, Debug)]
#[command(name = "pandoro")]
#[command(version = VERSION)]
#[command(about = "The Pandoro language compiler", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// File to check (default action when no subcommand given)
    #[arg(value_name = "FILE")]
    pub file: Option<PathBuf>,

    // Debug/development flags
    /// Scan only, printing each token with its line and column (debug)
    #[arg(long = "tokens", value_name = "FILE", conflicts_with = "file")]
    pub tokens_file: Option<PathBuf>,

    /// Parse only, printing the tree (debug)
    #[arg(long = "ast", value_name = "FILE", conflicts_with = "file")]
    pub ast_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile to Rust, write the generated file, and type-check it
    Build {
        /// Source file to compile
        #[arg(value_name = "FILE")]
        file: PathBuf,
        /// Output directory (default: target/pandoro/<stem>)
        #[arg(value_name = "OUTPUT_DIR")]
        output_dir: Option<PathBuf>,
    },

    /// Compile and type-check without keeping output
    Check {
        /// Source file to check
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    // Handle debug flags first
    if let Some(file) = cli.tokens_file {
        return commands::tokens_file(&file.to_string_lossy());
    }
    if let Some(file) = cli.ast_file {
        return commands::ast_file(&file.to_string_lossy());
    }

    match cli.command {
        Some(Command::Build { file, output_dir }) => {
            let out = output_dir.map(|p| p.to_string_lossy().to_string());
            commands::build_file(&file.to_string_lossy(), out.as_ref())
        }
        Some(Command::Check { file }) => commands::check_file(&file.to_string_lossy()),
        None => {
            // Default: check the file if provided
            if let Some(file) = cli.file {
                commands::check_file(&file.to_string_lossy())
            } else {
                Err(CliError::failure("Usage: pandoro <COMMAND|FILE>"))
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
