//! One-token lookahead cursor over the scanner.
//!
//! All parsing decisions dispatch on the current token's literal text (and
//! occasionally its kind) with no further lookahead; the grammar is LL(1) on
//! keyword and punctuation literals.

use crate::scanner::{Scanner, Token, TokenKind};
use crate::diagnostics::ScanError;

/// Callback invoked for every token the cursor consumes.
///
/// An explicit sink threaded through construction instead of a process-wide
/// verbosity flag; the CLI uses it for `--tokens`.
pub type TraceSink<'a> = Box<dyn FnMut(&Token) + 'a>;

/// Cursor holding exactly one token of lookahead.
pub struct Cursor<'a> {
    scanner: Scanner<'a>,
    current: Token,
    trace: Option<TraceSink<'a>>,
}

impl<'a> Cursor<'a> {
    pub fn new(scanner: Scanner<'a>) -> Result<Self, ScanError> {
        Self::build(scanner, None)
    }

    pub fn with_trace(scanner: Scanner<'a>, sink: TraceSink<'a>) -> Result<Self, ScanError> {
        Self::build(scanner, Some(sink))
    }

    fn build(mut scanner: Scanner<'a>, trace: Option<TraceSink<'a>>) -> Result<Self, ScanError> {
        let current = scanner.scan()?;
        let mut cursor = Self {
            scanner,
            current,
            trace,
        };
        cursor.emit_trace();
        Ok(cursor)
    }

    fn emit_trace(&mut self) {
        if let Some(sink) = self.trace.as_mut() {
            sink(&self.current);
        }
    }

    /// The current (lookahead) token.
    pub fn current(&self) -> &Token {
        &self.current
    }

    pub fn kind(&self) -> TokenKind {
        self.current.kind
    }

    /// Literal text of the current token.
    pub fn lit(&self) -> &str {
        &self.current.text
    }

    pub fn is_eof(&self) -> bool {
        self.current.is_eof()
    }

    /// Pull the next token from the scanner.
    ///
    /// Idempotent at end-of-input: once the current token is EOF, `advance`
    /// is a no-op.
    pub fn advance(&mut self) -> Result<(), ScanError> {
        if self.current.is_eof() {
            return Ok(());
        }
        self.current = self.scanner.scan()?;
        self.emit_trace();
        Ok(())
    }

    /// Toggle the scanner's stop-at-delimiter mode.
    ///
    /// Affects how the *next* token is scanned; the buffered lookahead token
    /// was already scanned normally, which callers grabbing a raw span must
    /// account for by consuming the current token's text first.
    pub fn set_stop_at(&mut self, delimiters: &[char]) {
        self.scanner.set_stop_at(delimiters);
    }

    pub fn clear_stop_at(&mut self) {
        self.scanner.clear_stop_at();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_is_idempotent_at_eof() {
        let mut cursor = Cursor::new(Scanner::new("x")).unwrap();
        assert_eq!(cursor.lit(), "x");
        cursor.advance().unwrap();
        assert!(cursor.is_eof());
        cursor.advance().unwrap();
        cursor.advance().unwrap();
        assert!(cursor.is_eof());
    }

    #[test]
    fn trace_sink_sees_every_token() {
        let mut seen: Vec<String> = Vec::new();
        {
            let sink: TraceSink<'_> = Box::new(|tok: &Token| seen.push(tok.text.clone()));
            let mut cursor = Cursor::with_trace(Scanner::new("fn main"), sink).unwrap();
            while !cursor.is_eof() {
                cursor.advance().unwrap();
            }
        }
        assert_eq!(seen, ["fn", "main", ""]);
    }
}
