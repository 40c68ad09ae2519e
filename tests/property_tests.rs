//! Property-based tests for the Pandoro compiler
//!
//! These tests use proptest to verify frontend invariants across many
//! randomly generated inputs, catching edge cases that hand-written tests
//! might miss.

use proptest::prelude::*;

use pandoro::syntax::ast::{Decl, Pos, TypeExpr};
use pandoro::syntax::{lower, parser};

/// Words with grammar meaning that an identifier strategy must avoid.
const RESERVED: &[&str] = &[
    "import", "var", "type", "fn", "return", "switch", "case", "default", "struct", "union",
    "interface", "begin", "end", "true", "false",
];

fn ident_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,8}".prop_filter("reserved word", |s| !RESERVED.contains(&s.as_str()))
}

/// The source position of a top-level declaration.
fn decl_pos(decl: &Decl) -> Pos {
    match decl {
        Decl::Import(i) => i.pos,
        Decl::Var(v) => v.pos,
        Decl::Type(t) => t.pos,
        Decl::Func(f) => f.pos,
    }
}

proptest! {
    /// Property: a unit of n generated declarations parses to n declarations.
    #[test]
    fn declaration_count_is_preserved(
        names in prop::collection::vec(ident_strategy(), 1..10),
        values in prop::collection::vec(0i64..1000, 1..10),
    ) {
        let mut source = String::new();
        for (i, name) in names.iter().enumerate() {
            let value = values[i % values.len()];
            // Cycle through every declaration form the dispatch recognizes.
            match i % 4 {
                0 => source.push_str(&format!("var {name}_{i} = {value}\n")),
                1 => source.push_str(&format!("fn {name}_{i}() begin\nend\n")),
                2 => source.push_str(&format!("import \"{name}_{i}\"\n")),
                _ => source.push_str(&format!("type T{name}_{i} {name};\n")),
            }
        }

        let file = parser::parse_file("gen.pan", source.trim()).expect("parse failed");
        prop_assert_eq!(file.decls.len(), names.len());
    }

    /// Property: top-level declaration positions are strictly increasing and
    /// stay inside the source buffer.
    #[test]
    fn declaration_positions_are_monotonic(
        names in prop::collection::vec(ident_strategy(), 2..8),
    ) {
        let mut source = String::new();
        for (i, name) in names.iter().enumerate() {
            source.push_str(&format!("var {name}_{i} = {i}\n"));
        }
        let source = source.trim().to_string();

        let file = parser::parse_file("gen.pan", &source).expect("parse failed");
        let positions: Vec<Pos> = file.decls.iter().map(decl_pos).collect();
        for pair in positions.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
        for pos in &positions {
            let offset = pos.offset().expect("parsed decl without position");
            prop_assert!(offset < source.len());
        }
    }

    /// Property: lowering a k-member union always yields a carrier with k+1
    /// fields and leaves no union node in the tree.
    #[test]
    fn union_lowering_is_total(
        variants in prop::collection::vec(ident_strategy(), 1..8),
    ) {
        let source = format!("type Pick union = {};", variants.join(" | "));
        let mut file = parser::parse_file("gen.pan", &source).expect("parse failed");
        lower::lower_unions(&mut file);

        prop_assert_eq!(file.decls.len(), 2);
        let Decl::Type(carrier) = &file.decls[1] else {
            return Err(TestCaseError::fail("expected carrier decl"));
        };
        let TypeExpr::Struct(record) = &carrier.ty else {
            return Err(TestCaseError::fail("expected carrier record"));
        };
        prop_assert_eq!(record.fields.len(), variants.len() + 1);

        for decl in &file.decls {
            if let Decl::Type(t) = decl {
                prop_assert!(!matches!(t.ty, TypeExpr::Union(_)));
            }
        }
    }

    /// Property: no matter how many printf calls a unit contains, the rewrite
    /// registers exactly one import, and a second run changes nothing.
    #[test]
    fn builtin_rewrite_registers_one_import(calls in 1usize..10) {
        let mut source = String::from("fn main() begin\n");
        for i in 0..calls {
            source.push_str(&format!("  printf(\"{i}\")\n"));
        }
        source.push_str("end");

        let mut file = parser::parse_file("gen.pan", &source).expect("parse failed");
        lower::rewrite_builtins(&mut file);
        let once = file.clone();
        lower::rewrite_builtins(&mut file);
        prop_assert_eq!(&file, &once);

        let imports = file
            .decls
            .iter()
            .filter(|d| matches!(d, Decl::Import(i) if i.path == "fmt"))
            .count();
        prop_assert_eq!(imports, 1);
    }

    /// Property: statement terminators are interchangeable at the top level.
    #[test]
    fn terminators_are_interchangeable(
        seps in prop::collection::vec(prop::sample::select(vec!["\n", "\r", ";", "\r\n"]), 1..6),
    ) {
        let mut source = String::new();
        for (i, sep) in seps.iter().enumerate() {
            source.push_str(&format!("var t{i} = {i}{sep}"));
        }

        let file = parser::parse_file("gen.pan", source.trim()).expect("parse failed");
        prop_assert_eq!(file.decls.len(), seps.len());
    }
}
