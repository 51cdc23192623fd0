//! `SymbolOracle` backed directly by the inline `ty`/`symbol` fields every
//! [`semantic::Expr`] already carries (§3 "for every node the transformer
//! needs... an attached symbol").
//!
//! This driver has no real front-end behind it — no binder, no type
//! hierarchy — so `converted_type_of` answers with the node's own type
//! (no implicit-conversion tracking) and `is_subtype` falls back to
//! nominal type-id equality rather than walking a base-type chain. Both
//! are conservative: they under-approximate what a real L-src front-end
//! would report, which only ever causes the transformer to skip an
//! optimization (e.g. the `is`-pattern constant fold in §4.D), never to
//! emit wrong code.

use semantic::node::{Expr, ExprKind, Literal};
use semantic::types::{ConstantValue, TypeRef};
use semantic::{Symbol, SymbolOracle};

#[derive(Default)]
pub struct InlineSymbolOracle;

impl InlineSymbolOracle {
    pub fn new() -> Self {
        Self
    }
}

fn literal_to_constant(lit: &Literal) -> Option<ConstantValue> {
    match lit {
        Literal::Null => Some(ConstantValue::Null),
        Literal::Bool(b) => Some(ConstantValue::Bool(*b)),
        Literal::Char(c) => Some(ConstantValue::Char(*c)),
        Literal::Int(i) => Some(ConstantValue::Int(*i)),
        Literal::UInt(u) => Some(ConstantValue::UInt(*u)),
        Literal::Float(f) => Some(ConstantValue::Float(*f)),
        Literal::String(s) => Some(ConstantValue::String(s.clone())),
        Literal::Verbatim(_) => None,
    }
}

impl SymbolOracle for InlineSymbolOracle {
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
            ExprKind::Literal(lit) => literal_to_constant(lit),
            _ => None,
        }
    }

    fn is_subtype(&self, sub: &TypeRef, base: &TypeRef) -> bool {
        match (sub, base) {
            (TypeRef::Named { id: a, .. }, TypeRef::Named { id: b, .. }) => a == b,
            _ => sub == base,
        }
    }
}
