//! Rust source emission.
//!
//! The pipeline mirrors the rest of the compiler's trust in the host
//! toolchain: lowered AST -> `quote!` token stream -> `syn::File` ->
//! `prettyplease::unparse`. Re-parsing the generated tokens with `syn` means
//! a malformed emission is caught here as an [`EmitError`] instead of
//! surfacing as an inscrutable `rustc` failure later.
//!
//! ## Notes
//! - The input tree must already be lowered: union declarations are rejected,
//!   callers run [`pandoro_syntax::lower`] first.
//! - The generated file opens with a blanket `#![allow(...)]` block. Source
//!   programs freely leave declarations unused and the synthesized carrier
//!   records have field names the host linter would reject.

use std::collections::HashSet;

use proc_macro2::TokenStream;
use quote::quote;
use thiserror::Error;

use pandoro_syntax::ast::*;
use pandoro_syntax::lower::{FMT_FUNC, FMT_MODULE};

use super::format;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error("`{name}` is not usable as an identifier in generated code ({pos})")]
    BadName { name: String, pos: Pos },
    #[error("cannot express {what} in generated code ({pos})")]
    Unsupported { what: &'static str, pos: Pos },
    #[error("malformed embedded expression `{text}`: {detail}")]
    BadExpr { text: String, detail: String },
    #[error("generated code failed to re-parse: {0}")]
    Reparse(String),
}

/// Emit a lowered compilation unit as formatted Rust source.
pub fn emit_file(file: &SourceFile) -> Result<String, EmitError> {
    Emitter::new(file).emit(file)
}

/// Token-level emitter for one compilation unit.
///
/// Construction scans the declaration list once to learn which type names
/// denote traits; fields and pointers of those types become `Box<dyn T>`.
pub struct Emitter {
    traits: HashSet<String>,
}

impl Emitter {
    pub fn new(file: &SourceFile) -> Self {
        let traits = file
            .decls
            .iter()
            .filter_map(|decl| match decl {
                Decl::Type(t) if matches!(t.ty, TypeExpr::Interface(_)) => Some(t.name.name.clone()),
                _ => None,
            })
            .collect();
        Self { traits }
    }

    /// Emit the whole unit and format it.
    #[tracing::instrument(skip_all, fields(decl_count = file.decls.len()))]
    pub fn emit(&self, file: &SourceFile) -> Result<String, EmitError> {
        let tokens = self.emit_tokens(file)?;
        let tree: syn::File = syn::parse2(tokens).map_err(|e| EmitError::Reparse(e.to_string()))?;
        Ok(prettyplease::unparse(&tree))
    }

    /// Emit the whole unit as an unformatted token stream.
    pub fn emit_tokens(&self, file: &SourceFile) -> Result<TokenStream, EmitError> {
        let mut items = vec![quote! {
            #![allow(
                dead_code,
                unused_mut,
                unused_variables,
                non_snake_case,
                non_camel_case_types,
                non_upper_case_globals
            )]
        }];

        for decl in &file.decls {
            match decl {
                Decl::Import(import) => {
                    // Formatting goes through the print! macro, so the fmt
                    // collaborator needs no use item. Anything else has no
                    // host-side counterpart to link against.
                    if import.path != FMT_MODULE {
                        tracing::warn!(path = %import.path, "skipping import with no host counterpart");
                    }
                }
                Decl::Var(var) => items.push(self.emit_static(var)?),
                Decl::Type(decl) => items.push(self.emit_type_decl(decl)?),
                Decl::Func(func) => items.push(self.emit_func(func)?),
            }
        }

        Ok(quote! { #(#items)* })
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn emit_static(&self, var: &VarDecl) -> Result<TokenStream, EmitError> {
        let name = rust_ident(&var.name.name, var.name.pos)?;
        let value = self.emit_expr(&var.value)?;
        let ty = match &var.ty {
            Some(ty) => self.emit_type(ty)?,
            None => infer_static_ty(&var.value).ok_or(EmitError::Unsupported {
                what: "an untyped top-level binding with a non-literal initializer",
                pos: var.pos,
            })?,
        };
        Ok(quote! { static #name: #ty = #value; })
    }

    fn emit_type_decl(&self, decl: &TypeDecl) -> Result<TokenStream, EmitError> {
        match &decl.ty {
            TypeExpr::Struct(record) => self.emit_struct(&decl.name, record),
            TypeExpr::Interface(iface) => self.emit_trait(&decl.name, iface),
            TypeExpr::Union(union) => Err(EmitError::Unsupported {
                what: "an unlowered union declaration",
                pos: union.pos,
            }),
            aliased @ (TypeExpr::Named(_) | TypeExpr::Pointer { .. }) => {
                let name = rust_ident(&decl.name.name, decl.name.pos)?;
                let target = self.emit_type(aliased)?;
                Ok(quote! { type #name = #target; })
            }
        }
    }

    fn emit_struct(&self, name: &Ident, record: &StructType) -> Result<TokenStream, EmitError> {
        let struct_name = rust_ident(&name.name, name.pos)?;
        let mut fields = Vec::new();
        for field in &record.fields {
            let field_name = field.name.as_ref().ok_or(EmitError::Unsupported {
                what: "an unnamed record field",
                pos: field.ty.pos(),
            })?;
            let f = rust_ident(&field_name.name, field_name.pos)?;
            let t = self.emit_type(&field.ty)?;
            fields.push(quote! { #f: #t });
        }
        Ok(quote! { struct #struct_name { #(#fields),* } })
    }

    fn emit_trait(&self, name: &Ident, iface: &InterfaceType) -> Result<TokenStream, EmitError> {
        let trait_name = rust_ident(&name.name, name.pos)?;
        let mut methods = Vec::new();
        for spec in &iface.methods {
            let method = rust_ident(&spec.name.name, spec.name.pos)?;
            let params = self.emit_params(&spec.params)?;
            let ret = self.emit_results(&spec.results)?;
            methods.push(quote! { fn #method(&self #(, #params)*) #ret; });
        }
        Ok(quote! { trait #trait_name { #(#methods)* } })
    }

    fn emit_func(&self, func: &FuncDecl) -> Result<TokenStream, EmitError> {
        let name = rust_ident(&func.name.name, func.name.pos)?;
        let params = self.emit_params(&func.params)?;
        let stmts = func
            .body
            .stmts
            .iter()
            .map(|s| self.emit_stmt(s))
            .collect::<Result<Vec<_>, _>>()?;

        let Some(recv) = &func.recv else {
            return Ok(quote! { fn #name(#(#params),*) { #(#stmts)* } });
        };

        // Methods become inherent impl items. A value receiver borrows, a
        // pointer receiver borrows mutably; the receiver name is rebound so
        // the body reads the way it was written.
        let field = recv.fields.first().ok_or(EmitError::Unsupported {
            what: "an empty receiver list",
            pos: func.pos,
        })?;
        let (on_type, self_param) = match &field.ty {
            TypeExpr::Named(id) => (rust_ident(&id.name, id.pos)?, quote!(&self)),
            TypeExpr::Pointer { elem, .. } => match elem.as_ref() {
                TypeExpr::Named(id) => (rust_ident(&id.name, id.pos)?, quote!(&mut self)),
                other => {
                    return Err(EmitError::Unsupported {
                        what: "a non-named pointer receiver",
                        pos: other.pos(),
                    })
                }
            },
            other => {
                return Err(EmitError::Unsupported {
                    what: "a non-named receiver",
                    pos: other.pos(),
                })
            }
        };
        let binder = match &field.name {
            Some(n) => {
                let b = rust_ident(&n.name, n.pos)?;
                quote! { let #b = self; }
            }
            None => TokenStream::new(),
        };

        Ok(quote! {
            impl #on_type {
                fn #name(#self_param #(, #params)*) { #binder #(#stmts)* }
            }
        })
    }

    fn emit_params(&self, params: &FieldList) -> Result<Vec<TokenStream>, EmitError> {
        params
            .fields
            .iter()
            .map(|field| {
                let name = field.name.as_ref().ok_or(EmitError::Unsupported {
                    what: "an unnamed parameter",
                    pos: field.ty.pos(),
                })?;
                let n = rust_ident(&name.name, name.pos)?;
                let t = self.emit_type(&field.ty)?;
                Ok(quote! { #n: #t })
            })
            .collect()
    }

    fn emit_results(&self, results: &FieldList) -> Result<TokenStream, EmitError> {
        let types = results
            .fields
            .iter()
            .map(|field| self.emit_type(&field.ty))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(match types.len() {
            0 => TokenStream::new(),
            1 => {
                let t = &types[0];
                quote! { -> #t }
            }
            _ => quote! { -> (#(#types),*) },
        })
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    fn emit_type(&self, ty: &TypeExpr) -> Result<TokenStream, EmitError> {
        match ty {
            TypeExpr::Named(id) => match id.name.as_str() {
                "string" => Ok(quote!(String)),
                "int" => Ok(quote!(i64)),
                "float" => Ok(quote!(f64)),
                "bool" => Ok(quote!(bool)),
                name if self.traits.contains(name) => {
                    let t = rust_ident(name, id.pos)?;
                    Ok(quote!(Box<dyn #t>))
                }
                name => {
                    let t = rust_ident(name, id.pos)?;
                    Ok(quote!(#t))
                }
            },
            TypeExpr::Pointer { elem, .. } => {
                // A trait-typed name is already boxed, a pointer to it adds
                // nothing the host side can use.
                if let TypeExpr::Named(id) = elem.as_ref() {
                    if self.traits.contains(&id.name) {
                        return self.emit_type(elem);
                    }
                }
                let inner = self.emit_type(elem)?;
                Ok(quote!(Box<#inner>))
            }
            TypeExpr::Struct(record) => Err(EmitError::Unsupported {
                what: "an inline record type",
                pos: record.pos,
            }),
            TypeExpr::Union(union) => Err(EmitError::Unsupported {
                what: "an unlowered union type",
                pos: union.pos,
            }),
            TypeExpr::Interface(iface) => Err(EmitError::Unsupported {
                what: "an inline interface type",
                pos: iface.pos,
            }),
        }
    }

    // ------------------------------------------------------------------
    // Statements and expressions
    // ------------------------------------------------------------------

    fn emit_stmt(&self, stmt: &Stmt) -> Result<TokenStream, EmitError> {
        match stmt {
            Stmt::Var(var) => {
                let name = rust_ident(&var.name.name, var.name.pos)?;
                let value = self.emit_expr(&var.value)?;
                Ok(match &var.ty {
                    Some(ty) => {
                        let t = self.emit_type(ty)?;
                        quote! { let mut #name: #t = #value; }
                    }
                    None => quote! { let mut #name = #value; },
                })
            }
            Stmt::Return(ret) => {
                let value = self.emit_expr(&ret.value)?;
                Ok(quote! { return #value; })
            }
            Stmt::Expr(call) => {
                let call = self.emit_call(call)?;
                Ok(quote! { #call; })
            }
            Stmt::Switch(switch) => self.emit_switch(switch),
        }
    }

    fn emit_switch(&self, switch: &SwitchStmt) -> Result<TokenStream, EmitError> {
        let tag = self.emit_expr(&switch.tag)?;
        let mut arms = Vec::new();
        let mut default_arm = None;

        for clause in &switch.clauses {
            let body = clause
                .body
                .iter()
                .map(|s| self.emit_stmt(s))
                .collect::<Result<Vec<_>, _>>()?;
            match &clause.pattern {
                Some(Expr::Lit(lit)) => {
                    let pat = lit_tokens(lit)?;
                    arms.push(quote! { #pat => { #(#body)* } });
                }
                Some(pattern) => {
                    let pat = self.emit_expr(pattern)?;
                    arms.push(quote! { other if other == #pat => { #(#body)* } });
                }
                None => default_arm = Some(quote! { _ => { #(#body)* } }),
            }
        }

        // The default clause is the fallback arm wherever it was written.
        let default_arm = default_arm.unwrap_or_else(|| quote! { _ => {} });
        Ok(quote! { match #tag { #(#arms)* #default_arm } })
    }

    fn emit_call(&self, call: &CallExpr) -> Result<TokenStream, EmitError> {
        if let Callee::Qualified { module, name } = &call.callee {
            if module.name == FMT_MODULE && name.name == FMT_FUNC {
                return self.emit_printf(call);
            }
        }

        let args = call
            .args
            .iter()
            .map(|a| self.emit_expr(a))
            .collect::<Result<Vec<_>, _>>()?;
        let target = match &call.callee {
            Callee::Ident(id) => {
                let i = rust_ident(&id.name, id.pos)?;
                quote!(#i)
            }
            Callee::Qualified { module, name } => {
                let m = rust_ident(&module.name, module.pos)?;
                let n = rust_ident(&name.name, name.pos)?;
                quote!(#m::#n)
            }
        };
        Ok(quote! { #target(#(#args),*) })
    }

    fn emit_printf(&self, call: &CallExpr) -> Result<TokenStream, EmitError> {
        let mut args = call.args.iter();
        match args.next() {
            Some(Expr::Lit(lit)) if lit.kind == LitKind::Str => {
                let spec = format!("\"{}\"", format::to_rust_format(format::unquote(&lit.text)));
                let fmt_lit: TokenStream = spec.parse().map_err(|e| EmitError::BadExpr {
                    text: spec.clone(),
                    detail: format!("{e}"),
                })?;
                let rest = args
                    .map(|a| self.emit_expr(a))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(quote! { print!(#fmt_lit #(, #rest)*) })
            }
            Some(first) => {
                tracing::warn!("printf with a non-literal format string, printing the value directly");
                let value = self.emit_expr(first)?;
                Ok(quote! { print!("{}", #value) })
            }
            None => Ok(quote! { print!("") }),
        }
    }

    fn emit_expr(&self, expr: &Expr) -> Result<TokenStream, EmitError> {
        match expr {
            Expr::Lit(lit) => lit_tokens(lit),
            Expr::Ident(id) => {
                let i = rust_ident(&id.name, id.pos)?;
                Ok(quote!(#i))
            }
            Expr::Unary { op, pos, operand } => {
                let inner = self.emit_expr(operand)?;
                match op {
                    '-' => Ok(quote! { -#inner }),
                    '!' => Ok(quote! { !#inner }),
                    _ => Err(EmitError::Unsupported {
                        what: "a unary operator",
                        pos: *pos,
                    }),
                }
            }
            Expr::Binary { op, lhs, rhs, .. } => {
                let l = self.emit_expr(lhs)?;
                let r = self.emit_expr(rhs)?;
                let o = bin_op_tokens(*op);
                Ok(quote! { (#l #o #r) })
            }
            Expr::Call(call) => self.emit_call(call),
            Expr::Verbatim { text, pos } => {
                text.parse::<TokenStream>().map_err(|e| EmitError::BadExpr {
                    text: text.clone(),
                    detail: format!("{e} ({pos})"),
                })
            }
        }
    }
}

fn rust_ident(name: &str, pos: Pos) -> Result<syn::Ident, EmitError> {
    syn::parse_str::<syn::Ident>(name).map_err(|_| EmitError::BadName {
        name: name.to_string(),
        pos,
    })
}

fn lit_tokens(lit: &Lit) -> Result<TokenStream, EmitError> {
    lit.text.parse::<TokenStream>().map_err(|e| EmitError::BadExpr {
        text: lit.text.clone(),
        detail: format!("{e}"),
    })
}

fn bin_op_tokens(op: BinOp) -> TokenStream {
    match op {
        BinOp::Add => quote!(+),
        BinOp::Sub => quote!(-),
        BinOp::Mul => quote!(*),
        BinOp::Div => quote!(/),
        BinOp::Rem => quote!(%),
        BinOp::Eq => quote!(==),
        BinOp::Ne => quote!(!=),
        BinOp::Lt => quote!(<),
        BinOp::Le => quote!(<=),
        BinOp::Gt => quote!(>),
        BinOp::Ge => quote!(>=),
    }
}

/// The static's type, read off the shape of a literal initializer.
fn infer_static_ty(value: &Expr) -> Option<TokenStream> {
    match value {
        Expr::Lit(lit) => Some(match lit.kind {
            LitKind::Int => quote!(i64),
            LitKind::Float => quote!(f64),
            LitKind::Str => quote!(&'static str),
            LitKind::Bool => quote!(bool),
        }),
        Expr::Unary { operand, .. } => infer_static_ty(operand),
        Expr::Binary { lhs, .. } => infer_static_ty(lhs),
        _ => None,
    }
}
