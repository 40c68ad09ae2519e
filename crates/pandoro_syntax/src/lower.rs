//! Post-parse tree rewriting.
//!
//! Two passes run over the parsed [`SourceFile`] before it is handed to the
//! backend, staged as an explicit pipeline: `parse -> rewrite_builtins ->
//! lower_unions`. Both mutate the declaration list in place; no concurrent
//! readers exist at that point.
//!
//! - [`lower_unions`] eliminates `union` type declarations, which the target
//!   representation cannot express natively, replacing each with a marker
//!   type plus a synthesized carrier record.
//! - [`rewrite_builtins`] resolves the single reserved identifier `printf`
//!   to a qualified call into the external text-formatting collaborator and
//!   registers that collaborator as an import of the unit exactly once.

use crate::ast::*;

/// The one reserved call target of the language.
pub const BUILTIN_PRINTF: &str = "printf";
/// Module name and import path of the text-formatting collaborator.
pub const FMT_MODULE: &str = "fmt";
/// The collaborator function `printf` resolves to.
pub const FMT_FUNC: &str = "Printf";
/// Name prefix of synthesized carrier records.
pub const CARRIER_PREFIX: &str = "__";

// ============================================================================
// Union lowering
// ============================================================================

/// Lower every named union type declaration.
///
/// For a declaration `type N union = T0 | .. | Tk-1;` this pass:
///
/// 1. replaces the declared type with an empty-capability marker interface,
///    preserving `N` as a usable type name at use sites; and
/// 2. appends a carrier record `__N` with a discriminant field `Type N`
///    followed by one positional field `Fieldi Ti` per member.
///
/// Carrier records are appended after all originally parsed declarations, in
/// source union order. The pass is total: it does not validate its input.
/// Self-referential unions and undeclared members are lowered as-is and
/// surface later as semantic diagnostics from the host type-checker.
#[tracing::instrument(skip_all)]
pub fn lower_unions(file: &mut SourceFile) {
    let mut carriers = Vec::new();

    for decl in &mut file.decls {
        let Decl::Type(type_decl) = decl else {
            continue;
        };
        let TypeExpr::Union(union) = &type_decl.ty else {
            continue;
        };

        tracing::debug!(name = %type_decl.name.name, members = union.variants.len(), "lowering union");
        let union_pos = union.pos;
        carriers.push(Decl::Type(carrier_record(&type_decl.name, union)));
        type_decl.ty = TypeExpr::Interface(InterfaceType::marker(union_pos));
    }

    file.decls.extend(carriers);
}

/// The carrier record emulating a discriminated union: a tag field plus one
/// slot per variant.
fn carrier_record(name: &Ident, union: &UnionType) -> TypeDecl {
    let mut fields = vec![Field {
        name: Some(Ident::synthesized("Type")),
        ty: TypeExpr::Named(Ident::synthesized(name.name.clone())),
    }];
    for (i, variant) in union.variants.iter().enumerate() {
        fields.push(Field {
            name: Some(Ident::synthesized(format!("Field{i}"))),
            ty: variant.clone(),
        });
    }

    TypeDecl {
        pos: Pos::NONE,
        name: Ident::synthesized(format!("{CARRIER_PREFIX}{}", name.name)),
        ty: TypeExpr::Struct(StructType {
            pos: Pos::NONE,
            begin: Pos::NONE,
            fields,
            end: Pos::NONE,
        }),
    }
}

// ============================================================================
// Built-in call rewriting
// ============================================================================

/// Rewrite `printf(...)` calls to qualified `fmt.Printf(...)` calls and
/// register the `fmt` import if any call was rewritten.
///
/// Idempotent: existing import declarations are scanned by path before
/// inserting, so running the pass twice (or on a unit that already imports
/// the collaborator) registers it exactly once. All other call targets pass
/// through unchanged.
#[tracing::instrument(skip_all)]
pub fn rewrite_builtins(file: &mut SourceFile) {
    let mut used = false;

    for decl in &mut file.decls {
        match decl {
            Decl::Func(func) => {
                for stmt in &mut func.body.stmts {
                    rewrite_stmt(stmt, &mut used);
                }
            }
            Decl::Var(var) => rewrite_expr(&mut var.value, &mut used),
            Decl::Import(_) | Decl::Type(_) => {}
        }
    }

    if used {
        register_import(file, FMT_MODULE);
    }
}

fn rewrite_stmt(stmt: &mut Stmt, used: &mut bool) {
    match stmt {
        Stmt::Expr(call) => rewrite_call(call, used),
        Stmt::Var(var) => rewrite_expr(&mut var.value, used),
        Stmt::Return(ret) => rewrite_expr(&mut ret.value, used),
        Stmt::Switch(switch) => {
            rewrite_expr(&mut switch.tag, used);
            for clause in &mut switch.clauses {
                if let Some(pattern) = &mut clause.pattern {
                    rewrite_expr(pattern, used);
                }
                for stmt in &mut clause.body {
                    rewrite_stmt(stmt, used);
                }
            }
        }
    }
}

fn rewrite_expr(expr: &mut Expr, used: &mut bool) {
    match expr {
        Expr::Call(call) => rewrite_call(call, used),
        Expr::Unary { operand, .. } => rewrite_expr(operand, used),
        Expr::Binary { lhs, rhs, .. } => {
            rewrite_expr(lhs, used);
            rewrite_expr(rhs, used);
        }
        Expr::Lit(_) | Expr::Ident(_) | Expr::Verbatim { .. } => {}
    }
}

fn rewrite_call(call: &mut CallExpr, used: &mut bool) {
    for arg in &mut call.args {
        rewrite_expr(arg, used);
    }

    if let Callee::Ident(ident) = &call.callee {
        if ident.name == BUILTIN_PRINTF {
            call.callee = Callee::Qualified {
                module: Ident::new(FMT_MODULE, ident.pos),
                name: Ident::synthesized(FMT_FUNC),
            };
            *used = true;
        }
    }
}

fn register_import(file: &mut SourceFile, path: &str) {
    let already_imported = file.decls.iter().any(|decl| {
        matches!(decl, Decl::Import(import) if import.path == path)
    });
    if already_imported {
        return;
    }

    file.decls.push(Decl::Import(ImportDecl {
        pos: Pos::NONE,
        path: path.to_string(),
        path_pos: Pos::NONE,
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_file;

    fn import_count(file: &SourceFile, path: &str) -> usize {
        file.decls
            .iter()
            .filter(|decl| matches!(decl, Decl::Import(import) if import.path == path))
            .count()
    }

    #[test]
    fn union_becomes_marker_plus_carrier() {
        let mut file = parse_file("test.pan", "type Shape union = Circle | Square;").unwrap();
        lower_unions(&mut file);

        assert_eq!(file.decls.len(), 2);
        let Decl::Type(marker) = &file.decls[0] else {
            panic!("expected type decl");
        };
        assert_eq!(marker.name.name, "Shape");
        assert!(matches!(&marker.ty, TypeExpr::Interface(iface) if iface.methods.is_empty()));

        let Decl::Type(carrier) = &file.decls[1] else {
            panic!("expected carrier decl");
        };
        assert_eq!(carrier.name.name, "__Shape");
        let TypeExpr::Struct(record) = &carrier.ty else {
            panic!("expected carrier record");
        };
        assert_eq!(record.fields.len(), 3);
        assert_eq!(record.fields[0].name.as_ref().unwrap().name, "Type");
        assert!(matches!(&record.fields[0].ty, TypeExpr::Named(id) if id.name == "Shape"));
        assert_eq!(record.fields[1].name.as_ref().unwrap().name, "Field0");
        assert!(matches!(&record.fields[1].ty, TypeExpr::Named(id) if id.name == "Circle"));
        assert_eq!(record.fields[2].name.as_ref().unwrap().name, "Field1");
        assert!(matches!(&record.fields[2].ty, TypeExpr::Named(id) if id.name == "Square"));
    }

    #[test]
    fn carriers_are_appended_in_source_order() {
        let source = "type A union = X | Y;\ntype B union = Z;\nvar n = 1";
        let mut file = parse_file("test.pan", source).unwrap();
        lower_unions(&mut file);

        let names: Vec<&str> = file
            .decls
            .iter()
            .map(|d| match d {
                Decl::Type(t) => t.name.name.as_str(),
                Decl::Var(v) => v.name.name.as_str(),
                _ => "?",
            })
            .collect();
        assert_eq!(names, ["A", "B", "n", "__A", "__B"]);
    }

    #[test]
    fn no_union_remains_after_lowering() {
        let mut file = parse_file("test.pan", "type Shape union = Circle | Square;").unwrap();
        lower_unions(&mut file);
        for decl in &file.decls {
            if let Decl::Type(t) = decl {
                assert!(!matches!(t.ty, TypeExpr::Union(_)));
                if let TypeExpr::Struct(record) = &t.ty {
                    for field in &record.fields {
                        assert!(!matches!(field.ty, TypeExpr::Union(_)));
                    }
                }
            }
        }
    }

    #[test]
    fn printf_is_qualified_and_import_registered_once() {
        let source = "fn main() begin\n  printf(\"a\")\n  printf(\"b\")\nend";
        let mut file = parse_file("test.pan", source).unwrap();
        rewrite_builtins(&mut file);

        assert_eq!(import_count(&file, FMT_MODULE), 1);
        let Decl::Func(func) = &file.decls[0] else {
            panic!("expected func decl");
        };
        for stmt in &func.body.stmts {
            let Stmt::Expr(call) = stmt else {
                panic!("expected call statement");
            };
            assert!(matches!(
                &call.callee,
                Callee::Qualified { module, name } if module.name == "fmt" && name.name == "Printf"
            ));
        }
    }

    #[test]
    fn rewriting_is_idempotent() {
        let source = "fn main() begin\n  printf(\"a\")\nend";
        let mut file = parse_file("test.pan", source).unwrap();
        rewrite_builtins(&mut file);
        rewrite_builtins(&mut file);
        assert_eq!(import_count(&file, FMT_MODULE), 1);
    }

    #[test]
    fn existing_import_is_reused() {
        let source = "import \"fmt\"\nfn main() begin\n  printf(\"a\")\nend";
        let mut file = parse_file("test.pan", source).unwrap();
        rewrite_builtins(&mut file);
        assert_eq!(import_count(&file, FMT_MODULE), 1);
    }

    #[test]
    fn other_callees_pass_through() {
        let source = "fn main() begin\n  greet(\"x\")\nend";
        let mut file = parse_file("test.pan", source).unwrap();
        rewrite_builtins(&mut file);
        assert_eq!(import_count(&file, FMT_MODULE), 0);
        let Decl::Func(func) = &file.decls[0] else {
            panic!("expected func decl");
        };
        let Stmt::Expr(call) = &func.body.stmts[0] else {
            panic!("expected call statement");
        };
        assert!(matches!(&call.callee, Callee::Ident(id) if id.name == "greet"));
    }

    #[test]
    fn printf_inside_switch_body_is_rewritten() {
        let source = "fn main() begin\n  switch x\n  default:\n    printf(\"d\")\n  end\nend";
        let mut file = parse_file("test.pan", source).unwrap();
        rewrite_builtins(&mut file);
        assert_eq!(import_count(&file, FMT_MODULE), 1);
    }
}
