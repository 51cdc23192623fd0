//! The external L-src semantic-tree contract.
//!
//! This crate is not a front-end: it does not lex, parse, bind, or
//! type-check anything. It defines the *shape* a front-end must produce —
//! symbols, types, a resolved syntax tree, and the two oracle traits the
//! transformer queries — so that `compiler` can be written, and tested,
//! against a stable contract.

pub mod diagnostics;
pub mod node;
pub mod oracle;
pub mod span;
pub mod symbol;
pub mod types;

pub use diagnostics::{
    add_diagnostic_chain, make_diagnostic_chain, Diagnostic, DiagnosticCategory,
    DiagnosticMessageChain, DiagnosticRelatedInformation,
};
pub use node::{CompilationUnit, Expr, ExprKind, Stmt, StmtKind, TypeDecl};
pub use oracle::{MetadataOracle, SymbolOracle};
pub use span::{ParseError, ParseErrorLevel, ParseLocation, ParseSourceFile, ParseSourceSpan};
pub use symbol::{Accessibility, MethodFlags, ParameterInfo, ParameterModifier, Symbol, SymbolKind};
pub use types::{ConstantValue, NamespaceId, TypeId, TypeKind, TypeRef};
