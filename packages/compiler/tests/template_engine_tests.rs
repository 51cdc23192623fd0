mod support;

use compiler::error::ErrorCode;
use compiler::template::{expand, TemplateInputs};
use support::span;

#[test]
fn combines_this_positional_and_rest_in_one_template() {
    let inputs = TemplateInputs {
        this_expr: Some("self"),
        arguments: &["a".to_string()],
        rest: Some("b, c"),
        type_arguments: &[],
    };
    let out = expand("{this}:Call({0}, {*})", &inputs, &span()).unwrap();
    assert_eq!(out, "self:Call(a, b, c)");
}

#[test]
fn this_placeholder_with_no_this_expr_falls_back_to_nil() {
    let inputs = TemplateInputs { this_expr: None, arguments: &[], rest: None, type_arguments: &[] };
    let out = expand("{this}", &inputs, &span()).unwrap();
    assert_eq!(out, "nil");
}

#[test]
fn multiple_type_arguments_resolve_independently() {
    let inputs = TemplateInputs {
        this_expr: None,
        arguments: &[],
        rest: None,
        type_arguments: &["int".to_string(), "string".to_string()],
    };
    let out = expand("System.Map({T0}, {T1})", &inputs, &span()).unwrap();
    assert_eq!(out, "System.Map(int, string)");
}

#[test]
fn missing_type_argument_is_arity_mismatch_not_panic() {
    let inputs = TemplateInputs { this_expr: None, arguments: &[], rest: None, type_arguments: &[] };
    let err = expand("{T0}", &inputs, &span()).unwrap_err();
    assert_eq!(err.code, ErrorCode::TemplateArityMismatch);
}
