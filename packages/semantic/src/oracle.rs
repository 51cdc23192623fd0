//! Oracle traits the transformer queries while it walks a [`crate::node`]
//! tree (§6: "a symbol-info oracle... and a metadata oracle").
//!
//! Neither is implemented in this crate — a front-end and an XML
//! meta-file loader respectively provide real implementations. These
//! traits exist so `compiler::transform` can be written and tested against
//! the contract alone.

use crate::node::Expr;
use crate::symbol::Symbol;
use crate::types::{ConstantValue, TypeRef};

/// Per-compilation-unit view over symbol/type facts that are not carried
/// directly on a node (subtype checks, constant folding).
pub trait SymbolOracle {
    fn symbol_of(&self, expr: &Expr) -> Option<Symbol>;
    fn type_of(&self, expr: &Expr) -> TypeRef;
    /// The type `expr` converts to at its use site, if an implicit
    /// conversion applies (used by `is`-pattern constant folding: §4.D).
    fn converted_type_of(&self, expr: &Expr) -> TypeRef;
    fn constant_value_of(&self, expr: &Expr) -> Option<ConstantValue>;
    /// `true` if `sub` is assignable to `base` per L-src's type system —
    /// backs the `is`-pattern constant-fold rule in §4.D.
    fn is_subtype(&self, sub: &TypeRef, base: &TypeRef) -> bool;
}

/// Per-method code-template lookup, backed by the XML meta file (§6).
pub trait MetadataOracle {
    /// The override template string for `method`, if the meta file
    /// supplies one. `None` means: use the default translation (§4.D
    /// "Object creation").
    fn code_template_for(&self, method: &Symbol) -> Option<&str>;
}
