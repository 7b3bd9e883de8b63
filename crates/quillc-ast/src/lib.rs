//! quillc-ast - Abstract Syntax Tree
//!
//! The tagged tree a (deliberately out-of-scope) parser produces: statements,
//! expressions, and type references, each carrying a [`Span`](quillc_util::Span).
//! No evaluation logic lives here — that's `quillc-sem`'s job. This crate is
//! a pure data model plus the small amount of constructor/accessor code a
//! tree like this needs.

pub mod expr;
pub mod stmt;
pub mod ty;

pub use expr::{
    AssignmentExpr, ArrayLiteralExpr, BinOp, BinaryExpr, BooleanLiteralExpr, CharacterLiteralExpr,
    Expr, FunctionCallExpr, IdentifierExpr, NumericClass, NumericLiteralExpr, StringLiteralExpr,
    StructLiteralExpr, StructLiteralFieldInit, StructPropertyAccessExpr, UnOp, UnaryExpr,
};
pub use stmt::{
    Alternate, BlockStmt, BreakStmt, CaseArm, ContinueStmt, ForEachStmt, ForStmt, FnDeclStmt,
    IfStmt, ImplementsStmt, ImportStmt, MethodDecl, ModuleStmt, Param, ProgramStmt, PropertyDecl,
    ReturnStmt, Stmt, StructDeclStmt, SwitchStmt, TraitMethodSig, TraitStmt, VarDeclStmt,
    WhileStmt,
};
pub use ty::{FloatWidth, IntWidth, TypeRef};
