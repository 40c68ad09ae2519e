/// Type-expression parsing.
///
/// `type-expr := "*" type-expr | struct-type | union-type | interface-type | ident`
impl<'a> Parser<'a> {
    fn type_expr(&mut self) -> Result<TypeExpr, ParseError> {
        if self.at("*") {
            let star = self.expect_lit("*")?;
            let elem = Box::new(self.type_expr()?);
            Ok(TypeExpr::Pointer { star, elem })
        } else if self.at(KW_STRUCT) {
            Ok(TypeExpr::Struct(self.struct_type()?))
        } else if self.at(KW_UNION) {
            Ok(TypeExpr::Union(self.union_type()?))
        } else if self.at(KW_INTERFACE) {
            Ok(TypeExpr::Interface(self.interface_type()?))
        } else {
            Ok(TypeExpr::Named(self.expect_ident()?))
        }
    }

    /// `struct-type := "struct" "begin" field* "end"`, each field
    /// `ident type-expr` terminated by a line break or `;`.
    fn struct_type(&mut self) -> Result<StructType, ParseError> {
        let pos = self.expect_lit(KW_STRUCT)?;
        let begin = self.expect_lit(KW_BEGIN)?;

        let mut fields = Vec::new();
        loop {
            self.skip_newlines()?;
            if self.at(KW_END) || self.cursor.is_eof() {
                break;
            }
            fields.push(self.named_field()?);
        }

        let end = self.expect_lit(KW_END)?;
        Ok(StructType {
            pos,
            begin,
            fields,
            end,
        })
    }

    /// `union-type := "union" "=" type-expr ( "|" type-expr )* ";"`
    ///
    /// Terminated at `;` (line breaks also terminate, since they normalize to
    /// `;`), so single-line declarations work. The terminator itself is left
    /// for the enclosing type declaration to consume.
    fn union_type(&mut self) -> Result<UnionType, ParseError> {
        let pos = self.expect_lit(KW_UNION)?;
        self.expect_lit("=")?;

        let mut variants = Vec::new();
        while !self.cursor.is_eof() && !self.at(KW_SEMI) {
            variants.push(self.type_expr()?);
            if self.at("|") {
                self.advance()?;
            }
        }

        Ok(UnionType { pos, variants })
    }

    /// `interface-type := "interface" "begin" method-spec* "end"`
    fn interface_type(&mut self) -> Result<InterfaceType, ParseError> {
        let pos = self.expect_lit(KW_INTERFACE)?;
        let begin = self.expect_lit(KW_BEGIN)?;

        let mut methods = Vec::new();
        loop {
            self.skip_newlines()?;
            if self.at(KW_END) || self.cursor.is_eof() {
                break;
            }
            methods.push(self.method_spec()?);
        }

        let end = self.expect_lit(KW_END)?;
        Ok(InterfaceType {
            pos,
            begin,
            methods,
            end,
        })
    }

    /// `method-spec := ident field-list type-list ";"`
    fn method_spec(&mut self) -> Result<MethodSpec, ParseError> {
        let name = self.expect_ident()?;
        let params = self.field_list()?;
        let results = self.type_list()?;
        self.expect_semi()?;
        Ok(MethodSpec {
            name,
            params,
            results,
        })
    }
}
