#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> SourceFile {
        parse_file("test.pan", source).unwrap_or_else(|e| panic!("parse failed: {e}"))
    }

    #[test]
    fn two_functions_round_trip_shape() {
        let source = "fn greet(name string) begin\n  printf(\"hello %s!\\n\", name)\nend\n\nfn main() begin\n  greet(\"GopherCon\")\nend";
        let file = parse(source);
        assert_eq!(file.decls.len(), 2);

        let Decl::Func(greet) = &file.decls[0] else {
            panic!("expected function decl");
        };
        assert_eq!(greet.name.name, "greet");
        assert_eq!(greet.params.fields.len(), 1);
        assert_eq!(greet.body.stmts.len(), 1);
        let Stmt::Expr(call) = &greet.body.stmts[0] else {
            panic!("expected call statement");
        };
        assert!(matches!(&call.callee, Callee::Ident(id) if id.name == "printf"));
        assert_eq!(call.args.len(), 2);

        let Decl::Func(main) = &file.decls[1] else {
            panic!("expected function decl");
        };
        assert_eq!(main.name.name, "main");
        assert!(main.recv.is_none());
        assert!(main.params.fields.is_empty());
    }

    #[test]
    fn var_without_type_annotation() {
        let file = parse("var x = 5");
        let Decl::Var(var) = &file.decls[0] else {
            panic!("expected var decl");
        };
        assert_eq!(var.name.name, "x");
        assert!(var.ty.is_none());
        assert!(matches!(&var.value, Expr::Lit(lit) if lit.text == "5"));
    }

    #[test]
    fn var_with_type_annotation() {
        let file = parse("var x int = 5");
        let Decl::Var(var) = &file.decls[0] else {
            panic!("expected var decl");
        };
        assert!(matches!(&var.ty, Some(TypeExpr::Named(id)) if id.name == "int"));
        assert!(matches!(&var.value, Expr::Lit(lit) if lit.text == "5"));
    }

    #[test]
    fn var_with_compound_value() {
        let file = parse("var x = 3 + 2");
        let Decl::Var(var) = &file.decls[0] else {
            panic!("expected var decl");
        };
        assert!(matches!(&var.value, Expr::Binary { op: BinOp::Add, .. }));
    }

    #[test]
    fn import_path_is_unquoted() {
        let file = parse("import \"fmt\"");
        let Decl::Import(import) = &file.decls[0] else {
            panic!("expected import decl");
        };
        assert_eq!(import.path, "fmt");
    }

    #[test]
    fn struct_type_fields() {
        let file = parse("type Point struct begin\n  x int\n  y int\nend");
        let Decl::Type(decl) = &file.decls[0] else {
            panic!("expected type decl");
        };
        let TypeExpr::Struct(st) = &decl.ty else {
            panic!("expected struct type");
        };
        assert_eq!(st.fields.len(), 2);
        assert_eq!(st.fields[0].name.as_ref().unwrap().name, "x");
        assert!(matches!(&st.fields[1].ty, TypeExpr::Named(id) if id.name == "int"));
    }

    #[test]
    fn interface_method_specs() {
        let file = parse("type Shape interface begin\n  area() (float)\n  scale(factor float) ()\nend");
        let Decl::Type(decl) = &file.decls[0] else {
            panic!("expected type decl");
        };
        let TypeExpr::Interface(iface) = &decl.ty else {
            panic!("expected interface type");
        };
        assert_eq!(iface.methods.len(), 2);
        assert_eq!(iface.methods[0].name.name, "area");
        assert!(iface.methods[0].params.fields.is_empty());
        assert_eq!(iface.methods[0].results.fields.len(), 1);
        assert!(iface.methods[0].results.fields[0].name.is_none());
        assert_eq!(iface.methods[1].params.fields.len(), 1);
    }

    #[test]
    fn union_on_one_line() {
        let file = parse("type Shape union = Circle | Square;");
        let Decl::Type(decl) = &file.decls[0] else {
            panic!("expected type decl");
        };
        let TypeExpr::Union(union) = &decl.ty else {
            panic!("expected union type");
        };
        assert_eq!(union.variants.len(), 2);
        assert!(matches!(&union.variants[0], TypeExpr::Named(id) if id.name == "Circle"));
        assert!(matches!(&union.variants[1], TypeExpr::Named(id) if id.name == "Square"));
    }

    #[test]
    fn pointer_type_nests() {
        let file = parse("type P **Circle;");
        let Decl::Type(decl) = &file.decls[0] else {
            panic!("expected type decl");
        };
        let TypeExpr::Pointer { elem, .. } = &decl.ty else {
            panic!("expected pointer type");
        };
        assert!(matches!(elem.as_ref(), TypeExpr::Pointer { .. }));
    }

    #[test]
    fn receiver_field_list() {
        let file = parse("fn (c Circle) describe() begin\n  printf(\"circle\")\nend");
        let Decl::Func(func) = &file.decls[0] else {
            panic!("expected func decl");
        };
        let recv = func.recv.as_ref().expect("receiver");
        assert_eq!(recv.fields.len(), 1);
        assert_eq!(recv.fields[0].name.as_ref().unwrap().name, "c");
        assert_eq!(func.name.name, "describe");
    }

    #[test]
    fn zero_argument_call() {
        let file = parse("fn main() begin\n  tick()\nend");
        let Decl::Func(func) = &file.decls[0] else {
            panic!("expected func decl");
        };
        let Stmt::Expr(call) = &func.body.stmts[0] else {
            panic!("expected call statement");
        };
        assert!(call.args.is_empty());
    }

    #[test]
    fn switch_with_cases_and_default() {
        let source = "fn main() begin\n  switch x\n  case 1:\n    printf(\"one\")\n  case 2:\n    printf(\"two\")\n  default:\n    printf(\"many\")\n  end\nend";
        let file = parse(source);
        let Decl::Func(func) = &file.decls[0] else {
            panic!("expected func decl");
        };
        let Stmt::Switch(switch) = &func.body.stmts[0] else {
            panic!("expected switch statement");
        };
        assert!(matches!(&switch.tag, Expr::Ident(id) if id.name == "x"));
        assert_eq!(switch.clauses.len(), 3);
        assert!(matches!(&switch.clauses[0].pattern, Some(Expr::Lit(lit)) if lit.text == "1"));
        assert!(switch.clauses[2].pattern.is_none());
        assert_eq!(switch.clauses[2].body.len(), 1);
    }

    #[test]
    fn case_pattern_with_interior_colon() {
        let source = "fn main() begin\n  switch x\n  case Circle{r: 2}:\n    tick()\n  default:\n    tock()\n  end\nend";
        let file = parse(source);
        let Decl::Func(func) = &file.decls[0] else {
            panic!("expected func decl");
        };
        let Stmt::Switch(switch) = &func.body.stmts[0] else {
            panic!("expected switch statement");
        };
        assert_eq!(switch.clauses.len(), 2);
        let Some(Expr::Verbatim { text, .. }) = &switch.clauses[0].pattern else {
            panic!("expected verbatim pattern, got {:?}", switch.clauses[0].pattern);
        };
        assert_eq!(text, "Circle {r: 2}");
        assert_eq!(switch.clauses[0].body.len(), 1);
    }

    #[test]
    fn case_pattern_without_colon_is_rejected() {
        let source = "fn main() begin\n  switch x\n  case 1\n    tick()\n  end\nend";
        let err = parse_file("test.pan", source).unwrap_err();
        match &err {
            ParseError::UnexpectedToken { expected, .. } => assert_eq!(expected, "\":\""),
            other => panic!("expected unexpected-token error, got {other:?}"),
        }
    }

    #[test]
    fn return_value_is_delegated() {
        let file = parse("fn area(r float) begin\n  return r * r * 3.14\nend");
        let Decl::Func(func) = &file.decls[0] else {
            panic!("expected func decl");
        };
        let Stmt::Return(ret) = &func.body.stmts[0] else {
            panic!("expected return statement");
        };
        assert!(matches!(&ret.value, Expr::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn nested_var_statement() {
        let file = parse("fn main() begin\n  var greeting string = \"hi\"\n  printf(greeting)\nend");
        let Decl::Func(func) = &file.decls[0] else {
            panic!("expected func decl");
        };
        assert_eq!(func.body.stmts.len(), 2);
        let Stmt::Var(var) = &func.body.stmts[0] else {
            panic!("expected var statement");
        };
        assert!(matches!(&var.ty, Some(TypeExpr::Named(id)) if id.name == "string"));
    }

    #[test]
    fn missing_switch_end_reports_expected_end_at_eof() {
        let source = "fn main() begin\n  switch x\n  case 1:\n    greet(1)";
        let err = parse_file("test.pan", source).unwrap_err();
        match &err {
            ParseError::UnexpectedToken { expected, found, .. } => {
                assert_eq!(expected, "\"end\"");
                assert_eq!(found, "end of input");
            }
            other => panic!("expected unexpected-token error, got {other:?}"),
        }
        assert_eq!(err.pos(), Pos::from_offset(source.len()));
    }

    #[test]
    fn malformed_value_span_is_fatal() {
        let err = parse_file("test.pan", "var x = 5 +").unwrap_err();
        assert!(matches!(err, ParseError::MalformedLiteral { .. }));
    }

    #[test]
    fn unknown_leading_literal_ends_declarations() {
        let file = parse("var x = 1\nwat 42");
        assert_eq!(file.decls.len(), 1);
    }

    #[test]
    fn declaration_positions_are_token_starts() {
        let source = "var x = 1\nfn main() begin\nend";
        let file = parse(source);
        let Decl::Var(var) = &file.decls[0] else {
            panic!("expected var decl");
        };
        let Decl::Func(func) = &file.decls[1] else {
            panic!("expected func decl");
        };
        assert_eq!(var.pos, Pos::from_offset(0));
        assert_eq!(var.name.pos, Pos::from_offset(4));
        assert_eq!(func.pos, Pos::from_offset(10));
        assert!(var.pos < var.name.pos);
        assert!(var.value.pos() < func.pos);
    }
}
