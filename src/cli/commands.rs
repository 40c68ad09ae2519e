//! CLI command implementations
//!
//! All command functions return `CliResult<ExitCode>` instead of calling
//! `process::exit`. Error handling and exits happen in the top-level `run()`.

use std::env;
use std::fs;
use std::path::Path;
use std::process;

use miette::NamedSource;

use crate::backend;
use pandoro_syntax::ast::SourceFile;
use pandoro_syntax::scanner::{Scanner, Token};
use pandoro_syntax::{diagnostics, lower, parser};

use super::{CliError, CliResult, ExitCode};

/// Maximum source file size (100 MB)
///
/// Files larger than this are rejected to prevent out-of-memory conditions
/// during compilation.
const MAX_SOURCE_SIZE: u64 = 100 * 1024 * 1024;

/// Read source file contents.
///
/// ## Errors
///
/// Returns an error if:
/// - The file cannot be read (I/O error)
/// - The file exceeds `MAX_SOURCE_SIZE` (100 MB)
pub fn read_source(file_path: &str) -> CliResult<String> {
    let metadata = fs::metadata(file_path)
        .map_err(|e| CliError::failure(format!("Cannot access file '{}': {}", file_path, e)))?;

    if metadata.len() > MAX_SOURCE_SIZE {
        return Err(CliError::failure(format!(
            "Source file '{}' is too large ({} bytes, max {} bytes)",
            file_path,
            metadata.len(),
            MAX_SOURCE_SIZE
        )));
    }

    fs::read_to_string(file_path)
        .map_err(|e| CliError::failure(format!("Error reading file '{}': {}", file_path, e)))
}

/// Render a frontend diagnostic against its source with miette.
fn render_diagnostic(
    file_path: &str,
    source: &str,
    err: impl miette::Diagnostic + Send + Sync + 'static,
) -> CliError {
    let report = miette::Report::new(err)
        .with_source_code(NamedSource::new(file_path, source.to_string()));
    CliError::failure(format!("{report:?}"))
}

/// Run the whole frontend on one file: parse, rewrite built-ins, lower unions.
///
/// Positions in diagnostics are relative to the trimmed source, so errors are
/// rendered against the same trimmed buffer the scanner saw.
fn compile_front(file_path: &str, source: &str) -> CliResult<SourceFile> {
    let mut file = parser::parse_file(file_path, source)
        .map_err(|e| render_diagnostic(file_path, source, e))?;
    lower::rewrite_builtins(&mut file);
    lower::lower_unions(&mut file);
    Ok(file)
}

/// Validate the output directory to prevent path traversal.
fn validate_output_dir(out_dir: &str) -> CliResult<()> {
    let path = Path::new(out_dir);

    for component in path.components() {
        if let std::path::Component::ParentDir = component {
            return Err(CliError::failure(format!(
                "Output directory '{}' contains path traversal (..)",
                out_dir
            )));
        }
    }

    if path.is_absolute() {
        tracing::warn!(
            "Using absolute output path: {}. Consider using a relative path.",
            out_dir
        );
    }

    Ok(())
}

/// One line of token trace output: filename, line:col, kind, literal.
fn token_line(file_path: &str, line: usize, col: usize, token: &Token) -> String {
    format!("{file_path}:{line}:{col}\t{}\t{:?}", token.kind, token.text)
}

/// Scan and display tokens with their file, line, and column.
pub fn tokens_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let trimmed = source.trim();
    let mut scanner = Scanner::new(trimmed);

    loop {
        let token = scanner
            .scan()
            .map_err(|e| render_diagnostic(file_path, trimmed, e))?;
        let (line, col) = token
            .pos()
            .offset()
            .map(|o| diagnostics::line_col(trimmed, o))
            .unwrap_or((0, 0));
        println!("{}", token_line(file_path, line, col, &token));
        if token.is_eof() {
            break;
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Parse and display the AST (before any rewrite pass).
pub fn ast_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let trimmed = source.trim();
    let file = parser::parse_file(file_path, trimmed)
        .map_err(|e| render_diagnostic(file_path, trimmed, e))?;
    println!("{:#?}", file);
    Ok(ExitCode::SUCCESS)
}

/// Compile a source file to Rust and type-check the result.
///
/// The generated file is written whether or not the host check passes, so a
/// failing program can still be inspected. A failed check is reported through
/// the exit code.
pub fn build_file(file_path: &str, output_dir: Option<&String>) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let file = compile_front(file_path, source.trim())?;
    let rust_source = backend::emit_file(&file)
        .map_err(|e| CliError::failure(format!("Code generation error: {}", e)))?;

    let stem = Path::new(file_path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("pandoro_out");
    let out_dir = output_dir
        .cloned()
        .unwrap_or_else(|| format!("target/pandoro/{}", stem));
    validate_output_dir(&out_dir)?;
    fs::create_dir_all(&out_dir)
        .map_err(|e| CliError::failure(format!("Error creating '{}': {}", out_dir, e)))?;

    let out_file = Path::new(&out_dir).join(format!("{}.rs", stem));
    fs::write(&out_file, &rust_source)
        .map_err(|e| CliError::failure(format!("Error writing '{}': {}", out_file.display(), e)))?;

    let report = backend::check_generated(&out_file, Path::new(&out_dir))
        .map_err(|e| CliError::failure(e.to_string()))?;
    if !report.success {
        eprint!("{}", report.diagnostics);
        println!("Wrote {} (host check failed)", out_file.display());
        return Ok(ExitCode::FAILURE);
    }

    println!("Wrote {}", out_file.display());
    Ok(ExitCode::SUCCESS)
}

/// Compile a source file and type-check it without keeping any output.
pub fn check_file(file_path: &str) -> CliResult<ExitCode> {
    let source = read_source(file_path)?;
    let file = compile_front(file_path, source.trim())?;
    let rust_source = backend::emit_file(&file)
        .map_err(|e| CliError::failure(format!("Code generation error: {}", e)))?;

    let tmp_dir = env::temp_dir().join(format!("pandoro_check_{}", process::id()));
    fs::create_dir_all(&tmp_dir)
        .map_err(|e| CliError::failure(format!("Error creating temp dir: {}", e)))?;
    let tmp_file = tmp_dir.join("check.rs");
    fs::write(&tmp_file, &rust_source)
        .map_err(|e| CliError::failure(format!("Error writing temp file: {}", e)))?;

    let report = backend::check_generated(&tmp_file, &tmp_dir);
    let _ = fs::remove_dir_all(&tmp_dir);
    let report = report.map_err(|e| CliError::failure(e.to_string()))?;

    if !report.success {
        eprint!("{}", report.diagnostics);
        return Ok(ExitCode::FAILURE);
    }

    println!("{}: OK", file_path);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_lines_start_with_the_file_name() {
        let mut scanner = Scanner::new("var x");
        let token = scanner.scan().unwrap();
        let line = token_line("demo.pan", 1, 1, &token);
        assert_eq!(line, "demo.pan:1:1\tidentifier\t\"var\"");
    }
}
