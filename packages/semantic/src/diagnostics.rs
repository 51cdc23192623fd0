//! Diagnostic reporting types shared across the front-end/transformer boundary.
//!
//! The transformer does not produce these directly (it raises its own
//! `CompilationError`), but a front-end satisfying this contract is expected
//! to report parse/bind/check errors in this shape, and the CLI driver
//! aggregates both kinds into one exit-code decision.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    Warning,
    Error,
    Suggestion,
    Message,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticMessageChain {
    String(String),
    Chain {
        message_text: String,
        category: DiagnosticCategory,
        code: i32,
        next: Option<Vec<DiagnosticMessageChain>>,
    },
}

impl DiagnosticMessageChain {
    pub fn new(message: impl Into<String>) -> Self {
        Self::String(message.into())
    }
}

impl From<String> for DiagnosticMessageChain {
    fn from(s: String) -> Self {
        DiagnosticMessageChain::String(s)
    }
}

impl From<&str> for DiagnosticMessageChain {
    fn from(s: &str) -> Self {
        DiagnosticMessageChain::String(s.to_string())
    }
}

impl fmt::Display for DiagnosticMessageChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticMessageChain::String(s) => write!(f, "{}", s),
            DiagnosticMessageChain::Chain { message_text, .. } => write!(f, "{}", message_text),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiagnosticRelatedInformation {
    pub category: DiagnosticCategory,
    pub code: i32,
    pub file: Option<String>,
    pub start: Option<usize>,
    pub length: Option<usize>,
    pub message_text: String,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub category: DiagnosticCategory,
    pub code: i32,
    pub file: Option<String>,
    pub start: usize,
    pub length: usize,
    pub message_text: DiagnosticMessageChain,
    pub related_information: Option<Vec<DiagnosticRelatedInformation>>,
}

pub fn make_diagnostic_chain(
    message_text: String,
    next: Option<Vec<DiagnosticMessageChain>>,
) -> DiagnosticMessageChain {
    DiagnosticMessageChain::Chain {
        category: DiagnosticCategory::Message,
        code: 0,
        message_text,
        next,
    }
}

pub fn add_diagnostic_chain(
    message_text: DiagnosticMessageChain,
    add: Vec<DiagnosticMessageChain>,
) -> DiagnosticMessageChain {
    match message_text {
        DiagnosticMessageChain::String(s) => make_diagnostic_chain(s, Some(add)),
        DiagnosticMessageChain::Chain {
            message_text,
            category,
            code,
            next,
        } => {
            let mut next_vec = next.unwrap_or_default();
            next_vec.extend(add);
            DiagnosticMessageChain::Chain {
                message_text,
                category,
                code,
                next: Some(next_vec),
            }
        }
    }
}
