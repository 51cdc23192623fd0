//! Reserved words and operator token tables for the L-dst renderer.
//!
//! Modeled on the teacher's `abstract_emitter.rs` `lazy_static! { static ref
//! BINARY_OPERATORS: HashMap<...> }` table mapping an operator enum to its
//! surface token; ours maps to Lua tokens rather than JS ones, and adds the
//! classic/modern dialect split §4.B calls out for integer division,
//! bitwise operators, and `goto`.

use crate::output::ast::{BinaryOp, UnaryOp};
use std::collections::HashSet;

use lazy_static::lazy_static;

lazy_static! {
    /// Lua keywords, plus the curated "compiler-reserved" names §4.C names
    /// explicitly (`System`, `Linq`): identifiers assigned by the naming
    /// service must avoid all of these.
    pub static ref RESERVED_WORDS: HashSet<&'static str> = {
        let mut s = HashSet::new();
        for w in [
            "and", "break", "do", "else", "elseif", "end", "false", "for",
            "function", "goto", "if", "in", "local", "nil", "not", "or",
            "repeat", "return", "then", "true", "until", "while",
            "System", "Linq",
        ] {
            s.insert(w);
        }
        s
    };

    /// Metatable method names and the runtime's reserved adapter set
    /// (§4.C point 3): method names colliding with these take a guaranteed
    /// disambiguation even though they aren't Lua keywords.
    pub static ref RESERVED_METHOD_NAMES: HashSet<&'static str> = {
        let mut s = HashSet::new();
        for w in [
            "__add", "__sub", "__mul", "__div", "__mod", "__pow", "__unm",
            "__idiv", "__band", "__bor", "__bxor", "__bnot", "__shl", "__shr",
            "__concat", "__len", "__eq", "__lt", "__le", "__index",
            "__newindex", "__call", "__tostring", "__metatable",
            "__ctor__", "__base__", "__inherits__", "__interfaces__",
            "__default__", "__attributes__", "__clone__", "__name__", "__kind__",
        ] {
            s.insert(w);
        }
        s
    };
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED_WORDS.contains(name) || RESERVED_METHOD_NAMES.contains(name)
}

/// Operators whose *modern*-dialect spelling is a native Lua infix token.
/// In classic dialect these have no operator syntax at all (Lua 5.1 has
/// neither `//` nor bitwise operators) and the renderer instead emits a
/// `System.bit.*`/`System.idiv` runtime call — see
/// [`crate::output::renderer::needs_classic_call`].
pub fn binary_op_token(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Add => "+",
        BinaryOp::Sub => "-",
        BinaryOp::Mul => "*",
        BinaryOp::Div => "/",
        BinaryOp::FloorDiv => "//",
        BinaryOp::Mod => "%",
        BinaryOp::Pow => "^",
        BinaryOp::Concat => "..",
        BinaryOp::Eq => "==",
        BinaryOp::NotEq => "~=",
        BinaryOp::Lt => "<",
        BinaryOp::Gt => ">",
        BinaryOp::Le => "<=",
        BinaryOp::Ge => ">=",
        BinaryOp::And => "and",
        BinaryOp::Or => "or",
        BinaryOp::BitAnd => "&",
        BinaryOp::BitOr => "|",
        BinaryOp::BitXor => "~",
        BinaryOp::Shl => "<<",
        BinaryOp::Shr => ">>",
    }
}

/// The classic-dialect runtime call name for operators with no Lua 5.1
/// operator syntax.
pub fn classic_runtime_call(op: BinaryOp) -> Option<&'static str> {
    match op {
        BinaryOp::FloorDiv => Some("System.idiv"),
        BinaryOp::BitAnd => Some("System.bit.band"),
        BinaryOp::BitOr => Some("System.bit.bor"),
        BinaryOp::BitXor => Some("System.bit.bxor"),
        BinaryOp::Shl => Some("System.bit.lshift"),
        BinaryOp::Shr => Some("System.bit.rshift"),
        _ => None,
    }
}

pub fn unary_op_token(op: UnaryOp) -> &'static str {
    match op {
        UnaryOp::Neg => "-",
        UnaryOp::Not => "not ",
        UnaryOp::BitNot => "~",
        UnaryOp::Len => "#",
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*` — §3 invariant 1, checked by the naming
/// service before any identifier is handed to the renderer.
pub fn is_legal_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
