//! Renderer and transformer configuration.
//!
//! `EmitConfig` is the renderer's config input (§4.B): indent width,
//! dialect, semicolon policy, plus an export-attributes flag the
//! declaration transformer consults when deciding whether to keep
//! doc-comment attribute annotations in rendered output. Modeled on the
//! teacher's `compiler-cli/src/config/angular.rs` serde-`Deserialize`
//! config structs, generalized from Angular compiler flags to the CLI
//! surface in §6.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmitConfig {
    /// Spaces per indent level. Default 2 (§4.B).
    pub indent_width: usize,
    /// `true` selects the Lua 5.1-compatible dialect: no native `//` or
    /// bitwise operators, `goto` still used (5.1 never had it, but the
    /// runtime ships a coroutine-based shim — out of scope here, see
    /// `System.bit.*`/`System.idiv` call rewriting in the renderer).
    pub classic_dialect: bool,
    /// Whether statements get a trailing `;`. Purely cosmetic in Lua but
    /// configurable per §4.B/§6 `-sem`.
    pub semicolons: bool,
    /// Keep `@CSharpLua.*`-style attribute doc-comments in rendered output
    /// instead of stripping them (§6 `-a`).
    pub export_attributes: bool,
}

impl Default for EmitConfig {
    fn default() -> Self {
        EmitConfig {
            indent_width: 2,
            classic_dialect: false,
            semicolons: false,
            export_attributes: false,
        }
    }
}
