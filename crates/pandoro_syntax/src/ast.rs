//! Abstract syntax tree for the Pandoro language.
//!
//! Every node family (`TypeExpr`, `Stmt`, `Decl`, `Expr`) is a tagged enum so
//! that downstream passes dispatch via exhaustive matches. Nodes are built
//! once by the parser and are immutable afterwards, with one exception: the
//! declaration list of a [`SourceFile`], which the two post-parse passes in
//! [`crate::lower`] extend and rewrite in place.

use std::fmt;

/// A 1-based byte offset into the (trimmed) source buffer.
///
/// `Pos(0)` means "no position" and is used for nodes synthesized after
/// parsing (carrier records, rewritten callees, inserted imports).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Pos(pub usize);

impl Pos {
    pub const NONE: Pos = Pos(0);

    /// Build a position from a 0-based byte offset.
    pub fn from_offset(offset: usize) -> Self {
        Pos(offset + 1)
    }

    /// The 0-based byte offset, if this position is real.
    pub fn offset(self) -> Option<usize> {
        self.0.checked_sub(1)
    }

    pub fn is_some(self) -> bool {
        self.0 != 0
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_some() {
            write!(f, "byte {}", self.0)
        } else {
            write!(f, "<synthesized>")
        }
    }
}

/// A name together with the position where it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub pos: Pos,
}

impl Ident {
    pub fn new(name: impl Into<String>, pos: Pos) -> Self {
        Self { name: name.into(), pos }
    }

    /// An identifier synthesized by a rewrite pass (no source position).
    pub fn synthesized(name: impl Into<String>) -> Self {
        Self::new(name, Pos::NONE)
    }
}

// ============================================================================
// Types
// ============================================================================

/// A syntactic type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    /// A named type: `int`, `Circle`.
    Named(Ident),
    /// A pointer type: `*T`.
    Pointer { star: Pos, elem: Box<TypeExpr> },
    /// `struct begin ... end`
    Struct(StructType),
    /// `union = T | U | ... ;` — eliminated by [`crate::lower::lower_unions`].
    Union(UnionType),
    /// `interface begin ... end`
    Interface(InterfaceType),
}

impl TypeExpr {
    /// The position of the type's leading token.
    pub fn pos(&self) -> Pos {
        match self {
            TypeExpr::Named(ident) => ident.pos,
            TypeExpr::Pointer { star, .. } => *star,
            TypeExpr::Struct(s) => s.pos,
            TypeExpr::Union(u) => u.pos,
            TypeExpr::Interface(i) => i.pos,
        }
    }
}

/// A single `name type` entry in a struct, parameter list, or receiver.
///
/// The name is absent in return-type-only lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: Option<Ident>,
    pub ty: TypeExpr,
}

/// A parenthesized, comma-separated field list.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldList {
    pub opening: Pos,
    pub fields: Vec<Field>,
    pub closing: Pos,
}

impl FieldList {
    /// A field list synthesized by a rewrite pass.
    pub fn synthesized(fields: Vec<Field>) -> Self {
        Self {
            opening: Pos::NONE,
            fields,
            closing: Pos::NONE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StructType {
    pub pos: Pos,
    pub begin: Pos,
    pub fields: Vec<Field>,
    pub end: Pos,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnionType {
    pub pos: Pos,
    pub variants: Vec<TypeExpr>,
}

/// One `name (params) (results) ;` entry of an interface.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSpec {
    pub name: Ident,
    pub params: FieldList,
    pub results: FieldList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceType {
    pub pos: Pos,
    pub begin: Pos,
    pub methods: Vec<MethodSpec>,
    pub end: Pos,
}

impl InterfaceType {
    /// The empty-capability marker interface substituted for a lowered union.
    pub fn marker(pos: Pos) -> Self {
        Self {
            pos,
            begin: Pos::NONE,
            methods: Vec::new(),
            end: Pos::NONE,
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// The kind of a literal, following the host grammar's classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LitKind {
    Int,
    Float,
    Str,
    Bool,
}

/// A literal with its exact source spelling (strings keep their quotes).
#[derive(Debug, Clone, PartialEq)]
pub struct Lit {
    pub kind: LitKind,
    pub text: String,
    pub pos: Pos,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Rem => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
        }
    }
}

/// The target of a call expression.
///
/// Calls are parsed with a plain identifier callee; the built-in rewrite pass
/// upgrades `printf` callees to a qualified reference into the external
/// formatting collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum Callee {
    Ident(Ident),
    Qualified { module: Ident, name: Ident },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub callee: Callee,
    pub lparen: Pos,
    pub args: Vec<Expr>,
    pub rparen: Pos,
}

/// An expression.
///
/// Only literals, identifiers, and calls are produced by the parser directly;
/// everything else comes out of the delegated expression collaborator
/// ([`crate::expr`]), which folds the host grammar's result into this family.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Lit(Lit),
    Ident(Ident),
    Unary {
        op: char,
        pos: Pos,
        operand: Box<Expr>,
    },
    Binary {
        op: BinOp,
        pos: Pos,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call(CallExpr),
    /// A well-formed host expression the core does not model structurally.
    /// The exact source text is preserved for the emitter.
    Verbatim { text: String, pos: Pos },
}

impl Expr {
    pub fn pos(&self) -> Pos {
        match self {
            Expr::Lit(lit) => lit.pos,
            Expr::Ident(ident) => ident.pos,
            Expr::Unary { pos, .. } => *pos,
            Expr::Binary { pos, .. } => *pos,
            Expr::Call(call) => match &call.callee {
                Callee::Ident(ident) => ident.pos,
                Callee::Qualified { module, .. } => module.pos,
            },
            Expr::Verbatim { pos, .. } => *pos,
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Var(VarDecl),
    Return(ReturnStmt),
    Switch(SwitchStmt),
    Expr(CallExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub pos: Pos,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub pos: Pos,
    pub tag: Expr,
    pub clauses: Vec<CaseClause>,
    pub end: Pos,
}

/// One `case expr:` or `default:` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    pub pos: Pos,
    /// `None` for a `default` clause.
    pub pattern: Option<Expr>,
    pub colon: Pos,
    pub body: Vec<Stmt>,
}

/// A `begin ... end` statement block.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub begin: Pos,
    pub stmts: Vec<Stmt>,
    pub end: Pos,
}

// ============================================================================
// Declarations
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Import(ImportDecl),
    Var(VarDecl),
    Type(TypeDecl),
    Func(FuncDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    pub pos: Pos,
    /// The import path, without quotes.
    pub path: String,
    pub path_pos: Pos,
}

/// `var name [type] = value`, used both at top level and as a statement.
#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub pos: Pos,
    pub name: Ident,
    /// `None` when the type is left to downstream inference.
    pub ty: Option<TypeExpr>,
    pub value: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    pub pos: Pos,
    pub name: Ident,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub pos: Pos,
    /// Receiver field list for method-on-type sugar, e.g. `fn (c Circle) area()`.
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub params: FieldList,
    pub body: Block,
}

/// The root of the tree: one parsed compilation unit.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceFile {
    /// File name, used only for position reporting.
    pub name: String,
    pub decls: Vec<Decl>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            decls: Vec::new(),
        }
    }
}
