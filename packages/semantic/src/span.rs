//! Source locations and spans.
//!
//! Carried on every semantic node so that a compilation error or a rendered
//! line can be traced back to `file:line:col` (§7). Adapted near-verbatim
//! from the teacher's `parse_util.rs`, which the Angular compiler uses for
//! the same purpose against template/TS source text.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ParseSourceFile {
    pub content: String,
    pub url: String,
}

impl ParseSourceFile {
    pub fn new(content: String, url: String) -> Self {
        ParseSourceFile { content, url }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParseLocation {
    pub file: ParseSourceFile,
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl ParseLocation {
    pub fn new(file: ParseSourceFile, offset: usize, line: usize, col: usize) -> Self {
        ParseLocation { file, offset, line, col }
    }

    pub fn to_string(&self) -> String {
        format!("{}@{}:{}", self.file.url, self.line, self.col)
    }

    pub fn move_by(&self, delta: i32) -> ParseLocation {
        let source = &self.file.content;
        let len = source.len();
        let mut offset = self.offset;
        let mut line = self.line;
        let mut col = self.col;
        let mut delta = delta;

        while offset > 0 && delta < 0 {
            offset -= 1;
            delta += 1;
            let ch = source.as_bytes()[offset];
            if ch == b'\n' {
                line -= 1;
                if let Some(prior_line) = source[..offset].rfind('\n') {
                    col = offset - prior_line;
                } else {
                    col = offset;
                }
            } else {
                col -= 1;
            }
        }

        while offset < len && delta > 0 {
            let ch = source.as_bytes()[offset];
            offset += 1;
            delta -= 1;
            if ch == b'\n' {
                line += 1;
                col = 0;
            } else {
                col += 1;
            }
        }

        ParseLocation::new(self.file.clone(), offset, line, col)
    }

    /// Source text around this location, up to `max_chars`/`max_lines` on
    /// each side.
    pub fn get_context(&self, max_chars: usize, max_lines: usize) -> Option<(String, String)> {
        let content = &self.file.content;
        let mut start_offset = self.offset;

        if start_offset > content.len().saturating_sub(1) {
            start_offset = content.len().saturating_sub(1);
        }

        let mut end_offset = start_offset;
        let mut ctx_chars = 0;
        let mut ctx_lines = 0;

        while ctx_chars < max_chars && start_offset > 0 {
            start_offset -= 1;
            ctx_chars += 1;
            if content.chars().nth(start_offset) == Some('\n') {
                ctx_lines += 1;
                if ctx_lines >= max_lines {
                    break;
                }
            }
        }

        ctx_chars = 0;
        ctx_lines = 0;
        while ctx_chars < max_chars && end_offset < content.len().saturating_sub(1) {
            end_offset += 1;
            ctx_chars += 1;
            if content.chars().nth(end_offset) == Some('\n') {
                ctx_lines += 1;
                if ctx_lines >= max_lines {
                    break;
                }
            }
        }

        let before = content[start_offset..self.offset].to_string();
        let after = content[self.offset..=end_offset].to_string();
        Some((before, after))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseSourceSpan {
    pub start: ParseLocation,
    pub end: ParseLocation,
    pub details: Option<String>,
}

impl ParseSourceSpan {
    pub fn new(start: ParseLocation, end: ParseLocation) -> Self {
        ParseSourceSpan { start, end, details: None }
    }

    pub fn with_details(mut self, details: String) -> Self {
        self.details = Some(details);
        self
    }

    pub fn to_string(&self) -> String {
        self.start.file.content[self.start.offset..self.end.offset].to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseError {
    pub span: ParseSourceSpan,
    pub msg: String,
    pub level: ParseErrorLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseErrorLevel {
    Warning,
    Error,
}

impl ParseError {
    pub fn new(span: ParseSourceSpan, msg: String) -> Self {
        ParseError {
            span,
            msg,
            level: ParseErrorLevel::Error,
        }
    }

    pub fn contextual_message(&self) -> String {
        if let Some((before, after)) = self.span.start.get_context(100, 3) {
            let level_str = match self.level {
                ParseErrorLevel::Warning => "WARNING",
                ParseErrorLevel::Error => "ERROR",
            };
            format!("{} (\"{}[{} ->]{}\")", self.msg, before, level_str, after)
        } else {
            self.msg.clone()
        }
    }

    pub fn to_string(&self) -> String {
        let details = self.span.details.as_ref()
            .map(|d| format!(", {}", d))
            .unwrap_or_default();
        format!("{}: {}{}", self.contextual_message(), self.span.start.to_string(), details)
    }
}
