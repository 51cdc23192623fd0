//! Shared test-tree builders. Kept deliberately minimal: just enough
//! `semantic::node` construction to exercise the transformer without a
//! real front-end.

use compiler::{EmitConfig, NullLogger, TransformContext};
use semantic::node::{Block, Expr, ExprKind, Literal, Stmt, StmtKind};
use semantic::symbol::{Accessibility, MethodFlags, ParameterInfo, ParameterModifier, Symbol, SymbolKind};
use semantic::types::{ConstantValue, NamespaceId, TypeId, TypeKind, TypeRef};
use semantic::{MetadataOracle, ParseLocation, ParseSourceFile, ParseSourceSpan, SymbolOracle};

pub fn span() -> ParseSourceSpan {
    let file = ParseSourceFile::new(String::new(), "test.cs".to_string());
    let loc = ParseLocation::new(file, 0, 1, 1);
    ParseSourceSpan::new(loc.clone(), loc)
}

pub fn int_type() -> TypeRef {
    TypeRef::Named { id: TypeId(1), name: "int".to_string(), namespace: None, kind: TypeKind::Struct, type_arguments: Vec::new() }
}

pub fn named_type(name: &str, kind: TypeKind) -> TypeRef {
    TypeRef::Named { id: TypeId(2), name: name.to_string(), namespace: None, kind, type_arguments: Vec::new() }
}

pub fn void_type() -> TypeRef {
    TypeRef::Void
}

pub fn expr(kind: ExprKind, ty: TypeRef) -> Expr {
    Expr { kind, ty, symbol: None, span: span() }
}

pub fn int_lit(v: i64) -> Expr {
    expr(ExprKind::Literal(Literal::Int(v)), int_type())
}

pub fn ident(name: &str, ty: TypeRef) -> Expr {
    expr(ExprKind::Identifier(name.to_string()), ty)
}

pub fn stmt(kind: StmtKind) -> Stmt {
    Stmt { kind, span: span() }
}

pub fn block(statements: Vec<Stmt>) -> Block {
    Block { statements, span: span() }
}

pub fn method_symbol(name: &str, params: Vec<ParameterInfo>, is_static: bool) -> Symbol {
    Symbol {
        name: name.to_string(),
        kind: SymbolKind::Method,
        containing_type: None,
        accessibility: Accessibility::Public,
        is_static,
        overrides: None,
        parameters: params,
        type_arguments: Vec::new(),
        is_from_metadata: false,
        method_flags: MethodFlags::NONE,
        operator_kind: None,
        overload_index: None,
    }
}

pub fn param(name: &str, ty: TypeRef, modifier: ParameterModifier) -> ParameterInfo {
    ParameterInfo { name: name.to_string(), ty, modifier, default_value: None }
}

pub fn type_symbol(name: &str) -> Symbol {
    Symbol {
        name: name.to_string(),
        kind: SymbolKind::Type,
        containing_type: None,
        accessibility: Accessibility::Public,
        is_static: false,
        overrides: None,
        parameters: Vec::new(),
        type_arguments: Vec::new(),
        is_from_metadata: false,
        method_flags: MethodFlags::NONE,
        operator_kind: None,
        overload_index: None,
    }
}

/// An empty, base-less type ready for callers to fill in the fields they
/// care about for a given test.
pub fn empty_type_decl(name: &str) -> semantic::node::TypeDecl {
    semantic::node::TypeDecl {
        symbol: type_symbol(name),
        type_parameters: Vec::new(),
        base_type: None,
        interfaces: Vec::new(),
        fields: Vec::new(),
        methods: Vec::new(),
        constructors: Vec::new(),
        static_constructor: None,
        properties: Vec::new(),
        events: Vec::new(),
        nested_types: Vec::new(),
        ignored: false,
    }
}

pub fn ctor_decl(symbol: Symbol, initializer: Option<semantic::node::ConstructorInitializer>, body: Block) -> semantic::node::MethodDecl {
    semantic::node::MethodDecl { symbol, body: Some(body), initializer }
}

pub fn const_value(v: i64) -> ConstantValue {
    ConstantValue::Int(v)
}

pub struct NullOracle;

impl SymbolOracle for NullOracle {
    fn symbol_of(&self, expr: &Expr) -> Option<Symbol> {
        expr.symbol.clone()
    }
    fn type_of(&self, expr: &Expr) -> TypeRef {
        expr.ty.clone()
    }
    fn converted_type_of(&self, expr: &Expr) -> TypeRef {
        expr.ty.clone()
    }
    fn constant_value_of(&self, expr: &Expr) -> Option<ConstantValue> {
        match &expr.kind {
            ExprKind::Literal(Literal::Int(i)) => Some(ConstantValue::Int(*i)),
            ExprKind::Literal(Literal::Bool(b)) => Some(ConstantValue::Bool(*b)),
            _ => None,
        }
    }
    fn is_subtype(&self, sub: &TypeRef, base: &TypeRef) -> bool {
        sub == base
    }
}

pub struct NullMetadata;

impl MetadataOracle for NullMetadata {
    fn code_template_for(&self, _method: &Symbol) -> Option<&str> {
        None
    }
}

pub fn with_ctx<R>(f: impl FnOnce(&mut TransformContext<'_>) -> R) -> R {
    let config = EmitConfig::default();
    let logger = NullLogger::new();
    let symbols = NullOracle;
    let metadata = NullMetadata;
    let mut ctx = TransformContext::new(&config, &logger, &symbols, &metadata);
    f(&mut ctx)
}

pub fn with_ctx_config<R>(config: &EmitConfig, f: impl FnOnce(&mut TransformContext<'_>) -> R) -> R {
    let logger = NullLogger::new();
    let symbols = NullOracle;
    let metadata = NullMetadata;
    let mut ctx = TransformContext::new(config, &logger, &symbols, &metadata);
    f(&mut ctx)
}

/// Runs `f` inside a function scope and a block scope — the state every
/// expression/statement lowering call that touches `current_block()` or
/// `current_function()` needs pushed first.
pub fn with_ctx_in_block<R>(f: impl FnOnce(&mut TransformContext<'_>) -> R) -> R {
    with_ctx(|ctx| ctx.with_function_scope(|ctx| ctx.with_block_scope(f)))
}

#[allow(dead_code)]
pub fn namespace_id() -> NamespaceId {
    NamespaceId(0)
}
