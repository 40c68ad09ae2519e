/// Token-stream helpers.
///
/// Low-level primitives used throughout parsing: literal matching and
/// expectation, terminator handling, and the raw-span grab that feeds the
/// delegated expression parser.
impl<'a> Parser<'a> {
    // ========================================================================
    // Matching and expectation
    // ========================================================================

    /// Return `true` if the current token's literal text is `lit`.
    fn at(&self, lit: &str) -> bool {
        self.cursor.lit() == lit
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.cursor.advance()?;
        Ok(())
    }

    /// Require the literal `want`, consume it, and return its position.
    fn expect_lit(&mut self, want: &str) -> Result<Pos, ParseError> {
        if !self.at(want) {
            return Err(ParseError::unexpected(
                format!("{want:?}"),
                self.cursor.lit(),
                self.cursor.current().pos(),
            ));
        }
        let pos = self.cursor.current().pos();
        self.advance()?;
        Ok(pos)
    }

    /// Require an identifier token and consume it.
    fn expect_ident(&mut self) -> Result<Ident, ParseError> {
        if self.cursor.kind() != TokenKind::Ident {
            return Err(ParseError::unexpected(
                "identifier",
                self.cursor.lit(),
                self.cursor.current().pos(),
            ));
        }
        let ident = Ident::new(self.cursor.lit(), self.cursor.current().pos());
        self.advance()?;
        Ok(ident)
    }

    /// Require a string literal token, consume it, and return its unquoted
    /// value and position.
    fn expect_string(&mut self) -> Result<(String, Pos), ParseError> {
        if self.cursor.kind() != TokenKind::Str {
            return Err(ParseError::unexpected(
                "string literal",
                self.cursor.lit(),
                self.cursor.current().pos(),
            ));
        }
        let pos = self.cursor.current().pos();
        let text = self.cursor.lit();
        let value = text[1..text.len() - 1].to_string();
        self.advance()?;
        Ok((value, pos))
    }

    // ========================================================================
    // Terminators
    // ========================================================================

    /// Skip a run of statement terminators (real `;` and line breaks).
    fn skip_newlines(&mut self) -> Result<(), ParseError> {
        while self.cursor.kind() == TokenKind::Semi {
            self.advance()?;
        }
        Ok(())
    }

    /// Require a statement terminator, then skip any following blank lines.
    /// At end-of-input the terminator is implied.
    fn expect_semi(&mut self) -> Result<(), ParseError> {
        if self.cursor.is_eof() {
            return Ok(());
        }
        self.expect_lit(KW_SEMI)?;
        self.skip_newlines()
    }

    // ========================================================================
    // Raw spans
    // ========================================================================

    /// Grab everything from the current token up to one of `delims` as one
    /// raw text span, leaving the delimiter as the current token.
    ///
    /// The buffered lookahead token was scanned normally, so its text seeds
    /// the span; subsequent chunks come from the scanner's stop-at mode.
    /// Chunks are joined with single spaces, which is insignificant to the
    /// delegated expression grammar.
    fn raw_span_to(&mut self, delims: &[char]) -> Result<(String, Pos), ParseError> {
        let pos = self.cursor.current().pos();
        let mut text = String::new();

        self.cursor.set_stop_at(delims);
        loop {
            match self.cursor.kind() {
                TokenKind::Semi | TokenKind::Eof => break,
                TokenKind::Punct if is_delim_punct(self.cursor.lit(), delims) => break,
                _ => {}
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(self.cursor.lit());
            self.cursor.advance()?;
        }
        self.cursor.clear_stop_at();

        Ok((text, pos))
    }

    /// Parse a value span running to the end of the statement, consuming the
    /// terminator.
    fn value_to_stmt_end(&mut self) -> Result<Expr, ParseError> {
        let (text, pos) = self.raw_span_to(STMT_END)?;
        let value = expr::parse_value(&text, pos)?;
        self.expect_semi()?;
        Ok(value)
    }
}

fn is_delim_punct(lit: &str, delims: &[char]) -> bool {
    let mut chars = lit.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => delims.contains(&c),
        _ => false,
    }
}
