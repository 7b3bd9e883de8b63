//! Statement nodes.

use quillc_util::{Span, Symbol};

use crate::expr::Expr;
use crate::ty::TypeRef;

#[derive(Debug, Clone)]
pub struct Param {
    pub name: Symbol,
    pub ty: TypeRef,
}

#[derive(Debug, Clone)]
pub struct ProgramStmt {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ModuleStmt {
    pub name: Symbol,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ImportStmt {
    pub path: Symbol,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub statements: Vec<Stmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct VarDeclStmt {
    pub name: Symbol,
    pub is_constant: bool,
    pub explicit_type: Option<TypeRef>,
    pub value: Option<Expr>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct FnDeclStmt {
    pub name: Symbol,
    pub params: Vec<Param>,
    pub return_type: TypeRef,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub span: Span,
}

/// An `if` statement's `alternate`: absent, an else-if chain (another `If`),
/// or the final `else` block.
#[derive(Debug, Clone)]
pub enum Alternate {
    If(Box<IfStmt>),
    Block(BlockStmt),
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Expr,
    pub consequent: BlockStmt,
    pub alternate: Option<Box<Alternate>>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

/// The four independently-optional fields of a C-style `for` loop; only
/// `condition` is mandatory.
#[derive(Debug, Clone)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub condition: Expr,
    pub post: Option<Box<Expr>>,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ForEachStmt {
    pub variable: Symbol,
    pub iterable: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct CaseArm {
    pub value: Expr,
    pub body: BlockStmt,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct SwitchStmt {
    pub scrutinee: Expr,
    pub cases: Vec<CaseArm>,
    /// At most one, position-independent.
    pub default: Option<BlockStmt>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct BreakStmt {
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ContinueStmt {
    pub span: Span,
}

/// Struct property qualifiers: a `static` property lives on the type rather
/// than per-instance, `public` is recorded for a future driver to enforce,
/// `read_only` blocks post-construction assignment.
#[derive(Debug, Clone)]
pub struct PropertyDecl {
    pub name: Symbol,
    pub ty: TypeRef,
    pub is_static: bool,
    pub is_public: bool,
    pub read_only: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub name: Symbol,
    pub params: Vec<Param>,
    pub return_type: TypeRef,
    pub body: BlockStmt,
    pub is_static: bool,
    pub is_public: bool,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct StructDeclStmt {
    pub name: Symbol,
    pub properties: Vec<PropertyDecl>,
    pub methods: Vec<MethodDecl>,
    pub span: Span,
}

/// A trait method signature: no body, just the shape `Implements` checks
/// a struct's method descriptor against.
#[derive(Debug, Clone)]
pub struct TraitMethodSig {
    pub name: Symbol,
    pub params: Vec<Param>,
    pub return_type: TypeRef,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct TraitStmt {
    pub name: Symbol,
    pub methods: Vec<TraitMethodSig>,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct ImplementsStmt {
    pub struct_name: Symbol,
    pub trait_name: Symbol,
    pub span: Span,
}

#[derive(Debug, Clone)]
pub enum Stmt {
    Program(ProgramStmt),
    Module(ModuleStmt),
    Import(ImportStmt),
    Block(BlockStmt),
    VarDecl(VarDeclStmt),
    FnDecl(FnDeclStmt),
    Return(ReturnStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    ForEach(ForEachStmt),
    Switch(SwitchStmt),
    Break(BreakStmt),
    Continue(ContinueStmt),
    StructDecl(StructDeclStmt),
    Trait(TraitStmt),
    Implements(ImplementsStmt),
    /// A bare expression used as a statement (e.g. the trailing `a + b` in
    /// S1/S6/S7/S8 of the spec's scenario table, which have no explicit
    /// statement keyword).
    Expr(Expr),
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Program(s) => s.span,
            Stmt::Module(s) => s.span,
            Stmt::Import(s) => s.span,
            Stmt::Block(s) => s.span,
            Stmt::VarDecl(s) => s.span,
            Stmt::FnDecl(s) => s.span,
            Stmt::Return(s) => s.span,
            Stmt::If(s) => s.span,
            Stmt::While(s) => s.span,
            Stmt::For(s) => s.span,
            Stmt::ForEach(s) => s.span,
            Stmt::Switch(s) => s.span,
            Stmt::Break(s) => s.span,
            Stmt::Continue(s) => s.span,
            Stmt::StructDecl(s) => s.span,
            Stmt::Trait(s) => s.span,
            Stmt::Implements(s) => s.span,
            Stmt::Expr(e) => e.span(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quillc_util::FileId;

    fn dummy_span() -> Span {
        Span::new(0, 1, 1, 1, FileId(0))
    }

    #[test]
    fn stmt_span_dispatches_by_variant() {
        let s = Stmt::Break(BreakStmt { span: dummy_span() });
        assert_eq!(s.span(), dummy_span());
    }

    #[test]
    fn if_alternate_chain_is_recursive() {
        let inner_if = IfStmt {
            condition: Expr::BooleanLiteral(crate::expr::BooleanLiteralExpr { value: false, span: dummy_span() }),
            consequent: BlockStmt { statements: vec![], span: dummy_span() },
            alternate: None,
            span: dummy_span(),
        };
        let outer = IfStmt {
            condition: Expr::BooleanLiteral(crate::expr::BooleanLiteralExpr { value: true, span: dummy_span() }),
            consequent: BlockStmt { statements: vec![], span: dummy_span() },
            alternate: Some(Box::new(Alternate::If(Box::new(inner_if)))),
            span: dummy_span(),
        };
        assert!(matches!(outer.alternate, Some(_)));
    }
}
