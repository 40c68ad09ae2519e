/// Statement parsing.
///
/// `stmt := var-decl | return-stmt | switch-stmt | call-expr`
impl<'a> Parser<'a> {
    /// `body := "begin" stmt* "end"`
    fn block(&mut self) -> Result<Block, ParseError> {
        let begin = self.expect_lit(KW_BEGIN)?;
        let stmts = self.stmts_until(&[KW_END])?;
        let end = self.expect_lit(KW_END)?;
        Ok(Block { begin, stmts, end })
    }

    /// Parse statements until one of `enders` (or end-of-input, so that a
    /// missing closer is reported against the ender, not cascaded).
    fn stmts_until(&mut self, enders: &[&str]) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        loop {
            self.skip_newlines()?;
            if self.cursor.is_eof() || enders.iter().any(|e| self.at(e)) {
                break;
            }
            stmts.push(self.stmt()?);
        }
        Ok(stmts)
    }

    fn stmt(&mut self) -> Result<Stmt, ParseError> {
        if self.at(KW_VAR) {
            Ok(Stmt::Var(self.var_decl()?))
        } else if self.at(KW_RETURN) {
            Ok(Stmt::Return(self.return_stmt()?))
        } else if self.at(KW_SWITCH) {
            Ok(Stmt::Switch(self.switch_stmt()?))
        } else {
            Ok(Stmt::Expr(self.call_expr()?))
        }
    }

    /// `return-stmt := "return" value ";"`
    fn return_stmt(&mut self) -> Result<ReturnStmt, ParseError> {
        let pos = self.expect_lit(KW_RETURN)?;
        let value = self.value_to_stmt_end()?;
        Ok(ReturnStmt { pos, value })
    }

    /// `switch-stmt := "switch" value ";" case-clause* "end"`
    fn switch_stmt(&mut self) -> Result<SwitchStmt, ParseError> {
        let pos = self.expect_lit(KW_SWITCH)?;

        let (text, tag_pos) = self.raw_span_to(STMT_END)?;
        let tag = expr::parse_value(&text, tag_pos)?;
        self.expect_semi()?;

        let mut clauses = Vec::new();
        while self.at(KW_CASE) || self.at(KW_DEFAULT) {
            clauses.push(self.case_clause()?);
        }

        let end = self.expect_lit(KW_END)?;
        Ok(SwitchStmt {
            pos,
            tag,
            clauses,
            end,
        })
    }

    /// `case-clause := "case" value ":" stmt* | "default" ":" stmt*`
    ///
    /// The clause body runs until the next `case`, `default`, or the
    /// enclosing `end`. Multiple `default` clauses are not rejected here;
    /// the host type-checker reports them.
    fn case_clause(&mut self) -> Result<CaseClause, ParseError> {
        if self.at(KW_DEFAULT) {
            let pos = self.expect_lit(KW_DEFAULT)?;
            let colon = self.expect_lit(":")?;
            let body = self.stmts_until(&[KW_END, KW_CASE, KW_DEFAULT])?;
            return Ok(CaseClause {
                pos,
                pattern: None,
                colon,
                body,
            });
        }

        let pos = self.expect_lit(KW_CASE)?;

        // The pattern may contain interior colons (struct literals), so the
        // span runs to the end of the statement and only the trailing clause
        // colon is split off.
        let (text, expr_pos) = self.raw_span_to(STMT_END)?;
        let Some(pattern_text) = text.strip_suffix(':') else {
            return Err(ParseError::unexpected("\":\"", &text, expr_pos));
        };
        let pattern = expr::parse_value(pattern_text.trim_end(), expr_pos)?;

        let colon = self.cursor.current().pos();
        self.expect_semi()?;
        let body = self.stmts_until(&[KW_END, KW_CASE, KW_DEFAULT])?;

        Ok(CaseClause {
            pos,
            pattern: Some(pattern),
            colon,
            body,
        })
    }

    // ========================================================================
    // Calls
    // ========================================================================

    /// `call-expr := ident "(" ( arg ("," arg)* )? ")"`
    ///
    /// This is the only expression form the parser recognizes directly;
    /// a statement that starts with anything but a keyword must be a call.
    fn call_expr(&mut self) -> Result<CallExpr, ParseError> {
        let callee = Callee::Ident(self.expect_ident()?);

        let lparen = self.expect_lit("(")?;
        let mut args = Vec::new();
        if !self.at(")") {
            loop {
                args.push(self.call_arg()?);
                if self.at(",") {
                    self.advance()?;
                } else {
                    break;
                }
            }
        }
        let rparen = self.expect_lit(")")?;

        Ok(CallExpr {
            callee,
            lparen,
            args,
            rparen,
        })
    }

    /// A call argument is a single literal or identifier token.
    fn call_arg(&mut self) -> Result<Expr, ParseError> {
        let tok = self.cursor.current();
        let pos = tok.pos();
        let arg = match tok.kind {
            TokenKind::Int => Expr::Lit(Lit {
                kind: LitKind::Int,
                text: tok.text.clone(),
                pos,
            }),
            TokenKind::Float => Expr::Lit(Lit {
                kind: LitKind::Float,
                text: tok.text.clone(),
                pos,
            }),
            TokenKind::Str => Expr::Lit(Lit {
                kind: LitKind::Str,
                text: tok.text.clone(),
                pos,
            }),
            TokenKind::Ident => Expr::Ident(Ident::new(tok.text.clone(), pos)),
            _ => {
                return Err(ParseError::unexpected(
                    "expression",
                    self.cursor.lit(),
                    pos,
                ));
            }
        };
        self.advance()?;
        Ok(arg)
    }
}
