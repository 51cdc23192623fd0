//! Compilation errors.
//!
//! Mirrors the shape of the teacher's `ngtsc/diagnostics/src/error.rs`
//! (`FatalDiagnosticError` carrying an `ErrorCode`, the offending node, and
//! a message), generalized from TS diagnostics to the transformer's own
//! fail-fast error model (§7): "unsupported construct... malformed
//! template, unknown attribute name, contract violation in the semantic
//! input." There is no recovery path inside the transformer — every error
//! here unwinds the current compilation unit.

use semantic::ParseSourceSpan;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A construct the transformer has no lowering for (`ref`-returns,
    /// pointer arithmetic, unsafe raw pointers).
    UnsupportedConstruct,
    /// A code-template placeholder referenced an argument index the
    /// method doesn't have (§4.G).
    TemplateArityMismatch,
    /// The XML meta file referenced a method that doesn't resolve against
    /// the semantic input, or used a malformed placeholder.
    MalformedTemplate,
    /// A doc-comment attribute name outside the recognized
    /// `@CSharpLua.*` set.
    UnknownAttribute,
    /// The semantic input violated a contract the transformer relies on
    /// (e.g. a tuple type with no element-type info, a constructor symbol
    /// with no overload index).
    ContractViolation,
    /// An oracle call (`is_subtype`, `code_template_for`, ...) the current
    /// semantic front-end doesn't implement.
    OracleCapabilityMissing,
}

#[derive(Debug, Clone)]
pub struct CompilationError {
    pub code: ErrorCode,
    pub span: ParseSourceSpan,
    pub message: String,
}

impl CompilationError {
    pub fn new(code: ErrorCode, span: ParseSourceSpan, message: impl Into<String>) -> Self {
        CompilationError { code, span, message: message.into() }
    }
}

impl fmt::Display for CompilationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?}: {}", self.span.start.to_string(), self.code, self.message)
    }
}

impl std::error::Error for CompilationError {}

pub type Result<T> = std::result::Result<T, CompilationError>;
