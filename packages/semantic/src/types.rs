//! Type references in the L-src semantic model.
//!
//! `TypeRef` is what an expression's or declaration's "attached type" looks
//! like (§3, "Data model"). It is deliberately shallow: the transformer only
//! ever needs to ask "is this nullable/tuple/array/dynamic", "what's the
//! element type", or "what's the declared kind" — never to re-derive full
//! type-checking judgments, which belong to the front-end this crate does
//! not implement.

use indexmap::IndexMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct TypeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct NamespaceId(pub u32);

/// Declared shape of a named type, independent of any particular reference
/// to it. The naming service and declaration transformer both key off this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TypeRef {
    /// A named type: class, struct, interface, enum, delegate, or a
    /// built-in alias (`int`, `string`, `bool`, ...).
    Named {
        id: TypeId,
        name: String,
        namespace: Option<NamespaceId>,
        kind: TypeKind,
        type_arguments: Vec<TypeRef>,
    },
    /// `T?` / `Nullable<T>`.
    Nullable(Box<TypeRef>),
    /// `(T1, T2, ...)` value tuples.
    Tuple(Vec<TypeRef>),
    /// `T[]` / `T[,]` with the given rank.
    Array { element: Box<TypeRef>, rank: u32 },
    /// The untyped `dynamic` type.
    Dynamic,
    /// `void` — only valid as a method return type.
    Void,
}

impl TypeRef {
    pub fn is_nullable(&self) -> bool {
        matches!(self, TypeRef::Nullable(_))
    }

    pub fn is_tuple(&self) -> bool {
        matches!(self, TypeRef::Tuple(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, TypeRef::Array { .. })
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Void)
    }

    /// The type this nullable wraps, if any.
    pub fn nullable_inner(&self) -> Option<&TypeRef> {
        match self {
            TypeRef::Nullable(inner) => Some(inner),
            _ => None,
        }
    }

    pub fn tuple_elements(&self) -> Option<&[TypeRef]> {
        match self {
            TypeRef::Tuple(elems) => Some(elems),
            _ => None,
        }
    }

    pub fn named_kind(&self) -> Option<TypeKind> {
        match self {
            TypeRef::Named { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    pub fn is_enum(&self) -> bool {
        self.named_kind() == Some(TypeKind::Enum)
    }

    pub fn display_name(&self) -> String {
        match self {
            TypeRef::Named { name, type_arguments, .. } => {
                if type_arguments.is_empty() {
                    name.clone()
                } else {
                    let args: Vec<String> = type_arguments.iter().map(|t| t.display_name()).collect();
                    format!("{}<{}>", name, args.join(", "))
                }
            }
            TypeRef::Nullable(inner) => format!("{}?", inner.display_name()),
            TypeRef::Tuple(elems) => {
                let parts: Vec<String> = elems.iter().map(|t| t.display_name()).collect();
                format!("({})", parts.join(", "))
            }
            TypeRef::Array { element, rank } => {
                format!("{}[{}]", element.display_name(), ",".repeat((*rank as usize).saturating_sub(1)))
            }
            TypeRef::Dynamic => "dynamic".to_string(),
            TypeRef::Void => "void".to_string(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A compile-time constant, as produced by the semantic input's constant
/// evaluator (used for `sizeof`, `default(T)` when resolvable, and enum
/// member values).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Char(char),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
}

/// Minimal registry of named types, keyed by `TypeId`. Front-ends populate
/// this once per compilation; the transformer only reads it.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TypeTable {
    types: IndexMap<TypeId, TypeRef>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: TypeId, ty: TypeRef) {
        self.types.insert(id, ty);
    }

    pub fn get(&self, id: TypeId) -> Option<&TypeRef> {
        self.types.get(&id)
    }
}
