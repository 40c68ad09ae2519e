/// Declaration parsing.
///
/// Top-level declarations (`import`, `var`, `type`, `fn`) plus the field and
/// type lists shared by function signatures and interface method specs.
impl<'a> Parser<'a> {
    // ========================================================================
    // Declarations
    // ========================================================================

    /// `import := "import" string ";"`
    fn import_decl(&mut self) -> Result<ImportDecl, ParseError> {
        let pos = self.expect_lit(KW_IMPORT)?;
        let (path, path_pos) = self.expect_string()?;
        self.expect_semi()?;
        Ok(ImportDecl { pos, path, path_pos })
    }

    /// `var-decl := "var" ident ( "=" value | type "=" value ) ";"`
    ///
    /// Disambiguation: `=` directly after the identifier means the type is
    /// left to downstream inference; anything else is a type expression.
    fn var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let pos = self.expect_lit(KW_VAR)?;
        let name = self.expect_ident()?;

        let ty = if self.at("=") {
            None
        } else {
            Some(self.type_expr()?)
        };
        self.expect_lit("=")?;
        let value = self.value_to_stmt_end()?;

        Ok(VarDecl { pos, name, ty, value })
    }

    /// `type-decl := "type" ident type-expr ";"`
    fn type_decl(&mut self) -> Result<TypeDecl, ParseError> {
        let pos = self.expect_lit(KW_TYPE)?;
        let name = self.expect_ident()?;
        let ty = self.type_expr()?;
        self.expect_semi()?;
        Ok(TypeDecl { pos, name, ty })
    }

    /// `func-decl := "fn" [ field-list ] ident field-list body ";"`
    ///
    /// A parenthesized field list before the name is a receiver
    /// (method-on-type sugar).
    fn func_decl(&mut self) -> Result<FuncDecl, ParseError> {
        let pos = self.expect_lit(KW_FN)?;

        let recv = if self.at("(") {
            Some(self.field_list()?)
        } else {
            None
        };

        let name = self.expect_ident()?;
        let params = self.field_list()?;
        let body = self.block()?;
        self.expect_semi()?;

        Ok(FuncDecl {
            pos,
            recv,
            name,
            params,
            body,
        })
    }

    // ========================================================================
    // Field lists
    // ========================================================================

    /// `field-list := "(" ( ident type-expr ("," ident type-expr)* )? ")"`
    fn field_list(&mut self) -> Result<FieldList, ParseError> {
        self.paren_list(Self::named_field)
    }

    /// Like [`field_list`](Self::field_list), but entries are bare types
    /// (return-type lists of interface method specs).
    fn type_list(&mut self) -> Result<FieldList, ParseError> {
        self.paren_list(|p| {
            Ok(Field {
                name: None,
                ty: p.type_expr()?,
            })
        })
    }

    fn named_field(&mut self) -> Result<Field, ParseError> {
        let name = self.expect_ident()?;
        let ty = self.type_expr()?;
        Ok(Field { name: Some(name), ty })
    }

    fn paren_list(
        &mut self,
        mut entry: impl FnMut(&mut Self) -> Result<Field, ParseError>,
    ) -> Result<FieldList, ParseError> {
        let opening = self.expect_lit("(")?;
        let mut fields = Vec::new();
        while !self.at(")") {
            fields.push(entry(self)?);
            if self.at(",") {
                self.advance()?;
            }
        }
        let closing = self.expect_lit(")")?;
        Ok(FieldList {
            opening,
            fields,
            closing,
        })
    }
}
