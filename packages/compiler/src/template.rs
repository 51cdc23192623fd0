//! Code-template engine (§4.G).
//!
//! A template string carries `{this}`, `{0}`..`{n}` (positional arguments),
//! `{*}` (rest), and `{T0}`..`{Tk}` (type arguments) placeholders.
//! Substitution is purely textual: a placeholder that doesn't occur in the
//! template is simply never looked at, and one that does but has no
//! matching argument is an arity-mismatch compilation error carrying the
//! method's location (§4.G, §7).

use crate::error::{CompilationError, ErrorCode};
use once_cell::sync::Lazy;
use regex::Regex;
use semantic::ParseSourceSpan;

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{(this|\*|T?\d+)\}").unwrap());

pub struct TemplateInputs<'a> {
    pub this_expr: Option<&'a str>,
    pub arguments: &'a [String],
    /// Remaining arguments beyond the templated positional ones, rendered
    /// as a single comma-joined string, substituted for `{*}`.
    pub rest: Option<&'a str>,
    pub type_arguments: &'a [String],
}

/// Expand `template` against `inputs`. `span` is attributed to any
/// arity-mismatch error raised.
pub fn expand(
    template: &str,
    inputs: &TemplateInputs<'_>,
    span: &ParseSourceSpan,
) -> Result<String, CompilationError> {
    let mut err: Option<CompilationError> = None;
    let expanded = PLACEHOLDER_RE.replace_all(template, |caps: &regex::Captures| {
        let token = &caps[1];
        match token {
            "this" => inputs.this_expr.unwrap_or("nil").to_string(),
            "*" => inputs.rest.unwrap_or("").to_string(),
            _ if token.starts_with('T') => {
                let idx: usize = token[1..].parse().unwrap_or(usize::MAX);
                match inputs.type_arguments.get(idx) {
                    Some(arg) => arg.clone(),
                    None => {
                        err.get_or_insert_with(|| {
                            CompilationError::new(
                                ErrorCode::TemplateArityMismatch,
                                span.clone(),
                                format!("template references type argument {{{}}} but only {} were supplied", token, inputs.type_arguments.len()),
                            )
                        });
                        String::new()
                    }
                }
            }
            _ => {
                let idx: usize = token.parse().unwrap_or(usize::MAX);
                match inputs.arguments.get(idx) {
                    Some(arg) => arg.clone(),
                    None => {
                        err.get_or_insert_with(|| {
                            CompilationError::new(
                                ErrorCode::TemplateArityMismatch,
                                span.clone(),
                                format!("template references argument {{{}}} but only {} were supplied", token, inputs.arguments.len()),
                            )
                        });
                        String::new()
                    }
                }
            }
        }
    });
    match err {
        Some(e) => Err(e),
        None => Ok(expanded.into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use semantic::{ParseLocation, ParseSourceFile};

    fn dummy_span() -> ParseSourceSpan {
        let file = ParseSourceFile::new(String::new(), "test.cs".to_string());
        let loc = ParseLocation::new(file, 0, 0, 0);
        ParseSourceSpan::new(loc.clone(), loc)
    }

    #[test]
    fn substitutes_this_and_positional_args() {
        let inputs = TemplateInputs {
            this_expr: Some("self"),
            arguments: &["x".to_string(), "y".to_string()],
            rest: None,
            type_arguments: &[],
        };
        let out = expand("{this}:Add({0}, {1})", &inputs, &dummy_span()).unwrap();
        assert_eq!(out, "self:Add(x, y)");
    }

    #[test]
    fn unused_placeholder_style_text_is_left_alone() {
        let inputs = TemplateInputs { this_expr: None, arguments: &[], rest: None, type_arguments: &[] };
        let out = expand("plain text, no holes", &inputs, &dummy_span()).unwrap();
        assert_eq!(out, "plain text, no holes");
    }

    #[test]
    fn mismatched_arity_is_a_compilation_error() {
        let inputs = TemplateInputs { this_expr: None, arguments: &[], rest: None, type_arguments: &[] };
        let err = expand("{0}", &inputs, &dummy_span()).unwrap_err();
        assert_eq!(err.code, ErrorCode::TemplateArityMismatch);
    }

    #[test]
    fn rest_placeholder_substitutes_joined_string() {
        let inputs = TemplateInputs { this_expr: None, arguments: &[], rest: Some("a, b, c"), type_arguments: &[] };
        let out = expand("f({*})", &inputs, &dummy_span()).unwrap();
        assert_eq!(out, "f(a, b, c)");
    }

    #[test]
    fn type_argument_placeholder_substitutes() {
        let inputs = TemplateInputs {
            this_expr: None,
            arguments: &[],
            rest: None,
            type_arguments: &["Foo".to_string()],
        };
        let out = expand("System.typeof({T0})", &inputs, &dummy_span()).unwrap();
        assert_eq!(out, "System.typeof(Foo)");
    }
}
