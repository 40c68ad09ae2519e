//! Delegated expression parsing.
//!
//! Pandoro does not have an expression grammar of its own. Value spans (var
//! initializers, return values, switch tags, case patterns) are grabbed as
//! raw text and handed to the host language's expression parser (`syn`),
//! which is leveraged as a black box: it either accepts the span or reports a
//! syntax error, surfaced here as [`ParseError::MalformedLiteral`].
//!
//! The host node is then folded into the Pandoro [`Expr`] family. Literals,
//! identifiers, unary negation, simple binary expressions, and calls are
//! modeled structurally; any other well-formed host expression is preserved
//! verbatim with its source text, since downstream consumers only re-render
//! it.

use crate::ast::{BinOp, Callee, CallExpr, Expr, Ident, Lit, LitKind, Pos};
use crate::diagnostics::{span_at, ParseError};

/// Parse a raw value span at the given source position.
///
/// The span is everything the scanner grabbed up to the statement terminator;
/// surrounding whitespace is insignificant.
pub fn parse_value(span: &str, pos: Pos) -> Result<Expr, ParseError> {
    let text = span.trim();
    if text.is_empty() {
        return Err(ParseError::MalformedLiteral {
            span: span.to_string(),
            detail: "empty expression".to_string(),
            at: span_at(pos, span.len()),
        });
    }

    let host: syn::Expr = syn::parse_str(text).map_err(|err| ParseError::MalformedLiteral {
        span: text.to_string(),
        detail: err.to_string(),
        at: span_at(pos, text.len()),
    })?;

    // Sub-node source offsets are not recoverable from the host parser, so
    // every folded node carries the span's starting position.
    Ok(fold(&host, pos).unwrap_or(Expr::Verbatim {
        text: text.to_string(),
        pos,
    }))
}

/// Fold a host expression into the Pandoro family.
///
/// Returns `None` when the shape is not modeled; the caller falls back to a
/// verbatim node holding the whole span.
fn fold(host: &syn::Expr, pos: Pos) -> Option<Expr> {
    match host {
        syn::Expr::Lit(lit) => fold_lit(&lit.lit, pos),
        syn::Expr::Path(path) => {
            let ident = single_segment(&path.path)?;
            Some(Expr::Ident(Ident::new(ident.to_string(), pos)))
        }
        syn::Expr::Paren(paren) => fold(&paren.expr, pos),
        syn::Expr::Unary(unary) => {
            let op = match unary.op {
                syn::UnOp::Neg(_) => '-',
                syn::UnOp::Not(_) => '!',
                _ => return None,
            };
            let operand = fold(&unary.expr, pos)?;
            Some(Expr::Unary {
                op,
                pos,
                operand: Box::new(operand),
            })
        }
        syn::Expr::Binary(binary) => {
            let op = fold_binop(&binary.op)?;
            let lhs = fold(&binary.left, pos)?;
            let rhs = fold(&binary.right, pos)?;
            Some(Expr::Binary {
                op,
                pos,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            })
        }
        syn::Expr::Call(call) => {
            let callee = match call.func.as_ref() {
                syn::Expr::Path(path) => single_segment(&path.path)?,
                _ => return None,
            };
            let args = call
                .args
                .iter()
                .map(|arg| fold(arg, pos))
                .collect::<Option<Vec<_>>>()?;
            Some(Expr::Call(CallExpr {
                callee: Callee::Ident(Ident::new(callee.to_string(), pos)),
                lparen: Pos::NONE,
                args,
                rparen: Pos::NONE,
            }))
        }
        _ => None,
    }
}

fn fold_lit(lit: &syn::Lit, pos: Pos) -> Option<Expr> {
    let (kind, text) = match lit {
        syn::Lit::Int(l) => (LitKind::Int, l.token().to_string()),
        syn::Lit::Float(l) => (LitKind::Float, l.token().to_string()),
        syn::Lit::Str(l) => (LitKind::Str, l.token().to_string()),
        syn::Lit::Bool(l) => (LitKind::Bool, l.value.to_string()),
        _ => return None,
    };
    Some(Expr::Lit(Lit { kind, text, pos }))
}

fn fold_binop(op: &syn::BinOp) -> Option<BinOp> {
    Some(match op {
        syn::BinOp::Add(_) => BinOp::Add,
        syn::BinOp::Sub(_) => BinOp::Sub,
        syn::BinOp::Mul(_) => BinOp::Mul,
        syn::BinOp::Div(_) => BinOp::Div,
        syn::BinOp::Rem(_) => BinOp::Rem,
        syn::BinOp::Eq(_) => BinOp::Eq,
        syn::BinOp::Ne(_) => BinOp::Ne,
        syn::BinOp::Lt(_) => BinOp::Lt,
        syn::BinOp::Le(_) => BinOp::Le,
        syn::BinOp::Gt(_) => BinOp::Gt,
        syn::BinOp::Ge(_) => BinOp::Ge,
        _ => return None,
    })
}

fn single_segment(path: &syn::Path) -> Option<&syn::Ident> {
    if path.leading_colon.is_some() || path.segments.len() != 1 {
        return None;
    }
    let segment = path.segments.first()?;
    if !segment.arguments.is_none() {
        return None;
    }
    Some(&segment.ident)
}
