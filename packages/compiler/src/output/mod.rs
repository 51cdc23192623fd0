//! The L-dst output AST and its renderer.

pub mod ast;
pub mod renderer;
pub mod reserved;
