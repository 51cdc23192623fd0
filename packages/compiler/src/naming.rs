//! Symbol & Naming Service (§4.C).
//!
//! Assigns an L-dst name to every user symbol, applying the rules in
//! order: base-63 encode non-ASCII identifiers, disambiguate against
//! reserved words and sibling collisions, guard the metatable/runtime
//! reserved-method set, then qualify nested types and suffix generic
//! arity. Assignment is monotonic and write-once per symbol per §5 ("the
//! naming service's assigned-name table (monotonic, write-once per
//! symbol)") — once a symbol has a name in a scope, re-assigning returns
//! the same name rather than picking a new one.

use crate::output::reserved::{is_reserved, RESERVED_METHOD_NAMES};
use semantic::types::TypeRef;
use std::collections::{HashMap, HashSet};

pub type ScopeId = u32;

const BASE63_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_";

/// Base-63-encode any character outside `[A-Za-z0-9_]`, then guard a
/// leading digit with `_` (§4.C rule 1).
pub fn encode_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c == '_' || c.is_ascii_alphanumeric() {
            out.push(c);
            continue;
        }
        let mut code = c as u32;
        let mut digits = Vec::new();
        if code == 0 {
            digits.push(0usize);
        }
        while code > 0 {
            digits.push((code % 63) as usize);
            code /= 63;
        }
        digits.reverse();
        out.push('_');
        for d in digits {
            out.push(BASE63_ALPHABET[d] as char);
        }
    }
    if out.chars().next().map(|c| c.is_ascii_digit()).unwrap_or(false) {
        out = format!("_{}", out);
    }
    out
}

/// `Outer.Inner` qualification for a nested type name (§4.C rule 4).
pub fn qualify_nested(outer: &str, inner: &str) -> String {
    format!("{}.{}", outer, inner)
}

/// `_N` arity suffix distinguishing closed/open generics of the same base
/// name (§4.C rule 4). Non-generic types (`arity == 0`) are unaffected.
pub fn generic_arity_suffix(base: &str, arity: u32) -> String {
    if arity == 0 {
        base.to_string()
    } else {
        format!("{}_{}", base, arity)
    }
}

/// The Lua-safe identifier for a named-type reference: the declared name
/// (dot-qualified for nested types by whoever built the `TypeRef`) with the
/// `_N` generic-arity suffix in place of `TypeRef::display_name()`'s
/// C#-style `<T1, T2>` syntax — Lua would parse a bare `<`/`>` in an
/// identifier position as a comparison operator, so every place a type is
/// referenced by name in emitted code (base/interface lists, `new T(...)`,
/// `is T`, `typeof(T)`) must go through this instead of `display_name()`.
pub fn type_lua_name(ty: &TypeRef) -> String {
    match ty {
        TypeRef::Named { name, type_arguments, .. } => generic_arity_suffix(name, type_arguments.len() as u32),
        _ => ty.display_name(),
    }
}

/// Per-scope collision-free name assignment.
#[derive(Default)]
pub struct NamingService {
    used: HashMap<ScopeId, HashSet<String>>,
    assigned: HashMap<(ScopeId, String), String>,
}

impl NamingService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign (or recall) the L-dst name for `symbol_key` — a caller-chosen
    /// stable identity for a symbol, e.g. its mangled declaration path —
    /// within `scope`. `is_method_name` additionally guards the metatable
    /// and runtime reserved-adapter sets (§4.C rule 3).
    pub fn assign(
        &mut self,
        scope: ScopeId,
        symbol_key: &str,
        original_name: &str,
        is_method_name: bool,
    ) -> String {
        if let Some(existing) = self.assigned.get(&(scope, symbol_key.to_string())) {
            return existing.clone();
        }
        let encoded = encode_identifier(original_name);
        let name = self.disambiguate(scope, &encoded, is_method_name);
        self.used.entry(scope).or_default().insert(name.clone());
        self.assigned.insert((scope, symbol_key.to_string()), name.clone());
        name
    }

    fn conflicts(&self, scope: ScopeId, candidate: &str, is_method_name: bool) -> bool {
        if is_reserved(candidate) {
            return true;
        }
        if is_method_name && RESERVED_METHOD_NAMES.contains(candidate) {
            return true;
        }
        self.used.get(&scope).map(|s| s.contains(candidate)).unwrap_or(false)
    }

    /// `N`, `N_`, `_N`, `N1`, `N2`, ... until unique (§4.C rule 2).
    fn disambiguate(&self, scope: ScopeId, base: &str, is_method_name: bool) -> String {
        if !self.conflicts(scope, base, is_method_name) {
            return base.to_string();
        }
        let trailing_underscore = format!("{}_", base);
        if !self.conflicts(scope, &trailing_underscore, is_method_name) {
            return trailing_underscore;
        }
        let leading_underscore = format!("_{}", base);
        if !self.conflicts(scope, &leading_underscore, is_method_name) {
            return leading_underscore;
        }
        for i in 1u32.. {
            let candidate = format!("{}{}", base, i);
            if !self.conflicts(scope, &candidate, is_method_name) {
                return candidate;
            }
        }
        unreachable!("disambiguation sequence is infinite")
    }
}
