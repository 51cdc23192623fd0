//! CLI driver: source discovery, XML meta-file loading, parallel
//! compilation, and mirrored-tree output writing (§6).
//!
//! The `semantic`/`compiler` crates consume an already-resolved tree; this
//! crate supplies the missing half of that contract for a standalone
//! binary — each compilation unit is handed to the driver as a
//! JSON-serialized [`semantic::CompilationUnit`] (the workspace's own
//! framing: "semantic trees cross the front-end/transformer boundary as
//! data"), discovered under `-s`, paired with an XML meta file under
//! `-m`, and rendered to a mirrored `.lua` tree under `-d`.

pub mod cli;
pub mod compile;
pub mod config;
pub mod discover;
pub mod meta;
pub mod oracle;

/// CLI version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
