//! Streaming scanner for Pandoro source.
//!
//! This is the token stream adapter of the frontend: a conventional tokenizer
//! with two grammar-specific behaviors layered on top.
//!
//! - Line breaks are statement terminators in Pandoro, so `\n`, `\r` and `;`
//!   all surface as a synthetic `;` token ([`TokenKind::Semi`]) instead of
//!   being discarded as whitespace.
//! - [`Scanner::set_stop_at`] enables a temporary "stop at delimiter" mode in
//!   which everything up to one of the given delimiter characters is returned
//!   as a single opaque [`TokenKind::Raw`] token. The parser uses this to
//!   grab `everything up to the end of the statement` verbatim for hand-off
//!   to the delegated expression parser.
//!
//! The scanner is purely pull-based: one token per [`Scanner::scan`] call,
//! no side effects beyond advancing the read cursor. It fails only on
//! malformed low-level input (unterminated string or block comment), which is
//! fatal for the whole parse.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::ast::Pos;
use crate::diagnostics::{span_at, ScanError};

/// Kind of token produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Identifier or keyword; the parser dispatches on the literal text.
    Ident,
    Int,
    Float,
    /// String literal; the text keeps its surrounding quotes.
    Str,
    /// Single-character punctuation (`*`, `=`, `|`, `(`, `)`, `,`, `:`, ...).
    Punct,
    /// Statement terminator: a real `;`, `\n`, or `\r`.
    Semi,
    /// Opaque raw span produced in stop-at-delimiter mode.
    Raw,
    Eof,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            TokenKind::Ident => "identifier",
            TokenKind::Int => "integer literal",
            TokenKind::Float => "float literal",
            TokenKind::Str => "string literal",
            TokenKind::Punct => "punctuation",
            TokenKind::Semi => "';'",
            TokenKind::Raw => "raw span",
            TokenKind::Eof => "end of input",
        };
        f.write_str(s)
    }
}

/// A scanned token: kind, literal text, and starting byte offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub offset: usize,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// The token's 1-based source position.
    pub fn pos(&self) -> Pos {
        Pos::from_offset(self.offset)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }
}

/// Streaming scanner over a source buffer.
pub struct Scanner<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    /// Byte offset of the next unconsumed character.
    current_pos: usize,
    /// Active stop-at delimiters; empty means normal tokenization.
    stop: Vec<char>,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            current_pos: 0,
            stop: Vec::new(),
        }
    }

    /// Enable stop-at-delimiter mode for subsequent [`scan`](Self::scan) calls.
    pub fn set_stop_at(&mut self, delimiters: &[char]) {
        self.stop = delimiters.to_vec();
    }

    /// Return to normal tokenization.
    pub fn clear_stop_at(&mut self) {
        self.stop.clear();
    }

    // ========================================================================
    // Core character handling
    // ========================================================================

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next(&self) -> Option<char> {
        self.source[self.current_pos..].chars().nth(1)
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((pos, c)) = self.chars.next() {
            self.current_pos = pos + c.len_utf8();
            Some(c)
        } else {
            None
        }
    }

    fn skip_blanks(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' {
                self.advance();
            } else {
                break;
            }
        }
    }

    // ========================================================================
    // Scanning
    // ========================================================================

    /// Consume and return the next token.
    pub fn scan(&mut self) -> Result<Token, ScanError> {
        if !self.stop.is_empty() {
            return Ok(self.scan_stopped());
        }

        self.skip_comments_and_blanks()?;

        let start = self.current_pos;
        let Some(c) = self.advance() else {
            return Ok(Token::new(TokenKind::Eof, "", start));
        };

        let token = match c {
            // Line breaks terminate statements; normalize to ';'.
            '\n' | '\r' | ';' => Token::new(TokenKind::Semi, ";", start),
            '"' => self.scan_string(start)?,
            '0'..='9' => self.scan_number(start),
            _ if is_ident_start(c) => self.scan_identifier(start),
            // Everything else is single-character punctuation; unknown
            // characters fall through to the parser, which rejects them
            // with an expected-vs-actual diagnostic.
            _ => Token::new(TokenKind::Punct, c.to_string(), start),
        };
        Ok(token)
    }

    /// Stop-at-delimiter tokenization: one opaque span per call, with the
    /// delimiters themselves still scanned as ordinary terminator tokens.
    fn scan_stopped(&mut self) -> Token {
        self.skip_blanks();
        let start = self.current_pos;

        let Some(c) = self.peek() else {
            return Token::new(TokenKind::Eof, "", start);
        };

        if self.stop.contains(&c) {
            self.advance();
            return match c {
                '\n' | '\r' | ';' => Token::new(TokenKind::Semi, ";", start),
                _ => Token::new(TokenKind::Punct, c.to_string(), start),
            };
        }

        while let Some(c) = self.peek() {
            if self.stop.contains(&c) {
                break;
            }
            self.advance();
        }
        let text = self.source[start..self.current_pos].trim_end();
        Token::new(TokenKind::Raw, text, start)
    }

    fn skip_comments_and_blanks(&mut self) -> Result<(), ScanError> {
        loop {
            self.skip_blanks();
            if self.peek() != Some('/') {
                return Ok(());
            }
            match self.peek_next() {
                Some('/') => {
                    // Line comment: consume up to (not including) the line
                    // break, so the terminator token is still emitted.
                    while let Some(c) = self.peek() {
                        if c == '\n' || c == '\r' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('*') => {
                    let start = self.current_pos;
                    self.advance();
                    self.advance();
                    loop {
                        match self.advance() {
                            None => {
                                return Err(ScanError::UnterminatedComment {
                                    at: span_at(Pos::from_offset(start), 2),
                                });
                            }
                            Some('*') if self.peek() == Some('/') => {
                                self.advance();
                                break;
                            }
                            Some(_) => {}
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn scan_string(&mut self, start: usize) -> Result<Token, ScanError> {
        loop {
            match self.advance() {
                None | Some('\n') => {
                    return Err(ScanError::UnterminatedString {
                        at: span_at(Pos::from_offset(start), self.current_pos - start),
                    });
                }
                Some('\\') => {
                    // Escape: the next character is taken verbatim.
                    self.advance();
                }
                Some('"') => break,
                Some(_) => {}
            }
        }
        let text = &self.source[start..self.current_pos];
        Ok(Token::new(TokenKind::Str, text, start))
    }

    fn scan_number(&mut self, start: usize) -> Token {
        while matches!(self.peek(), Some('0'..='9')) {
            self.advance();
        }
        let mut kind = TokenKind::Int;
        if self.peek() == Some('.') && matches!(self.peek_next(), Some('0'..='9')) {
            kind = TokenKind::Float;
            self.advance();
            while matches!(self.peek(), Some('0'..='9')) {
                self.advance();
            }
        }
        Token::new(kind, &self.source[start..self.current_pos], start)
    }

    fn scan_identifier(&mut self, start: usize) -> Token {
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                self.advance();
            } else {
                break;
            }
        }
        Token::new(TokenKind::Ident, &self.source[start..self.current_pos], start)
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
