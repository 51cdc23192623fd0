//! Declaration Transformer (§4.F).
//!
//! Lowers a resolved type (and, transitively, its nested types) into the
//! table-literal shape `System.define` consumes: constructors under
//! `__ctor__` (a bare function for a single overload, a 1-based array for
//! several), fields, field-like properties, `get_X`/`set_X` accessor pairs,
//! and operator methods under their stable runtime names.

use crate::error::{CompilationError, ErrorCode};
use crate::output::ast::{self, Block as OutBlock, Expr as OutExpr, FieldDecl as OutFieldDecl, MethodDecl as OutMethodDecl, PropertyDecl as OutPropertyDecl, TypeDeclaration};
use crate::transform::expr::{lower_expr, type_name_expr};
use crate::transform::stmt::{lower_block, lower_ctor_initializer_target};
use crate::transform::{MethodInfo, TransformContext};
use semantic::node::{CompilationUnit, ConstructorInitializerTarget, MethodDecl as InMethodDecl, PropertyAccessor, TypeDecl};
use semantic::symbol::{MethodFlags, ParameterModifier, Symbol};
use semantic::types::TypeRef;

type R<T> = Result<T, CompilationError>;

/// Lowers every non-ignored top-level type in a compilation unit.
pub fn lower_compilation_unit(ctx: &mut TransformContext<'_>, unit: &CompilationUnit) -> R<ast::Module> {
    let declarations = unit
        .types
        .iter()
        .filter(|t| !t.ignored)
        .map(|t| lower_type_decl(ctx, t).map(ast::Decl::Type))
        .collect::<R<Vec<_>>>()?;
    Ok(ast::Module { declarations, top_level: Vec::new() })
}

/// `System.Object`/`System.ValueType` are the implicit roots; a type
/// derived directly from either needs no base reference at all (§4.F
/// "Constructors... implicit call derived from the direct base if neither
/// System.Object nor System.ValueType").
fn is_root_base(ty: &TypeRef) -> bool {
    matches!(ty, TypeRef::Named { name, .. } if matches!(name.as_str(), "Object" | "System.Object" | "ValueType" | "System.ValueType"))
}

pub fn lower_type_decl(ctx: &mut TransformContext<'_>, decl: &TypeDecl) -> R<TypeDeclaration> {
    lower_type_decl_qualified(ctx, decl, None)
}

/// `outer_path` is the enclosing type's dot-qualified name (pre-arity-suffix)
/// when `decl` is a nested type, `None` at the top level — threaded through
/// recursion so a type nested several levels deep gets the full `A.B.C`
/// path rather than just its own bare name (§4.C rule 4 "qualify nested
/// types").
fn lower_type_decl_qualified(ctx: &mut TransformContext<'_>, decl: &TypeDecl, outer_path: Option<&str>) -> R<TypeDeclaration> {
    let qualified_path = match outer_path {
        Some(outer) => crate::naming::qualify_nested(outer, &decl.symbol.name),
        None => decl.symbol.name.clone(),
    };
    let name = crate::naming::generic_arity_suffix(&qualified_path, decl.type_parameters.len() as u32);

    let real_base = decl.base_type.as_ref().filter(|t| !is_root_base(t));
    let base_type = real_base.map(crate::naming::type_lua_name);
    let interfaces = decl.interfaces.iter().map(crate::naming::type_lua_name).collect();

    let mut fields = lower_fields(ctx, decl)?;
    let methods = lower_methods(ctx, decl)?;
    let constructors = lower_constructors(ctx, decl, &name, real_base)?;
    let static_constructor = decl
        .static_constructor
        .as_ref()
        .map(|m| lower_static_constructor_body(ctx, m))
        .transpose()?;
    let (properties, events, backing_fields) = lower_properties_and_events(ctx, decl)?;
    fields.extend(backing_fields);

    let nested_types = decl
        .nested_types
        .iter()
        .map(|n| lower_type_decl_qualified(ctx, n, Some(&qualified_path)))
        .collect::<R<Vec<_>>>()?;

    Ok(TypeDeclaration {
        name,
        type_parameter_count: decl.type_parameters.len() as u32,
        base_type,
        interfaces,
        fields,
        methods,
        constructors,
        static_constructor,
        properties,
        events,
        nested_types,
    })
}

fn lower_static_constructor_body(ctx: &mut TransformContext<'_>, m: &InMethodDecl) -> R<OutBlock> {
    let body = m.body.as_ref().ok_or_else(|| {
        CompilationError::new(ErrorCode::ContractViolation, dummy_span(), "static constructor has no body")
    })?;
    ctx.with_function_scope(|ctx| lower_block(ctx, body))
}

fn dummy_span() -> semantic::ParseSourceSpan {
    let loc = semantic::ParseLocation::new(semantic::ParseSourceFile::new(String::new(), String::new()), 0, 0, 0);
    semantic::ParseSourceSpan::new(loc.clone(), loc)
}

fn lower_fields(ctx: &mut TransformContext<'_>, decl: &TypeDecl) -> R<Vec<OutFieldDecl>> {
    decl.fields
        .iter()
        .map(|f| {
            Ok(OutFieldDecl {
                name: f.symbol.name.clone(),
                initializer: f.initializer.as_ref().map(|e| lower_expr(ctx, e)).transpose()?,
                is_static: f.symbol.is_static,
            })
        })
        .collect()
}

/// Builds a method's parameter list, with `this` prepended for instance
/// methods — constructors and methods share this convention so every
/// table-literal function value is self-sufficient without relying on
/// Lua's colon-call sugar (§4.F "every constructor receives `this` as its
/// first parameter").
fn method_parameters(symbol: &Symbol) -> (Vec<String>, bool) {
    let mut names = Vec::new();
    if !symbol.is_static {
        names.push("this".to_string());
    }
    let mut is_vararg = false;
    for (i, p) in symbol.parameters.iter().enumerate() {
        if p.modifier.contains(ParameterModifier::PARAMS) && i + 1 == symbol.parameters.len() {
            is_vararg = true;
            break;
        }
        names.push(p.name.clone());
    }
    (names, is_vararg)
}

fn ref_out_param_names(symbol: &Symbol) -> Vec<String> {
    symbol
        .parameters
        .iter()
        .filter(|p| p.modifier.intersects(ParameterModifier::REF | ParameterModifier::OUT))
        .map(|p| p.name.clone())
        .collect()
}

fn lower_methods(ctx: &mut TransformContext<'_>, decl: &TypeDecl) -> R<Vec<OutMethodDecl>> {
    let mut out = Vec::new();
    for method in &decl.methods {
        let Some(body) = &method.body else { continue };
        let symbol = &method.symbol;
        let name = if symbol.is_operator() {
            symbol
                .operator_kind
                .ok_or_else(|| CompilationError::new(ErrorCode::ContractViolation, dummy_span(), "operator method has no operator kind"))?
                .runtime_name()
                .to_string()
        } else {
            symbol.name.clone()
        };
        let (parameters, is_vararg) = method_parameters(symbol);
        let ref_out_params = ref_out_param_names(symbol);
        let info = MethodInfo { symbol: symbol.clone(), ref_out_params, has_return: true };
        let lowered_body = ctx.with_method_info(info, |ctx| ctx.with_function_scope(|ctx| lower_block(ctx, body)))?;
        out.push(OutMethodDecl { name, parameters, is_vararg, body: lowered_body, is_static: symbol.is_static });
    }
    Ok(out)
}

/// A property/event counts as field-like when it has no explicit
/// accessors, doesn't implement an interface member explicitly, and isn't
/// forced into accessor form by `@CSharpLua.NoField` (§4.F
/// "Properties/events").
fn is_field_like(accessor: &PropertyAccessor, symbol: &Symbol, no_field_attribute: bool) -> bool {
    matches!(accessor, PropertyAccessor::FieldLike) && !no_field_attribute && !symbol.is_explicit_interface_impl()
}

/// Events default to field-like unless overridable (virtual/abstract/
/// override) or interface-implementing (§4.F).
fn event_is_field_like(accessor: &PropertyAccessor, symbol: &Symbol) -> bool {
    matches!(accessor, PropertyAccessor::FieldLike)
        && !symbol.is_explicit_interface_impl()
        && !symbol.method_flags.intersects(MethodFlags::VIRTUAL | MethodFlags::ABSTRACT | MethodFlags::OVERRIDE)
}

fn lower_properties_and_events(
    ctx: &mut TransformContext<'_>,
    decl: &TypeDecl,
) -> R<(Vec<OutPropertyDecl>, Vec<OutPropertyDecl>, Vec<OutFieldDecl>)> {
    let mut extra_fields = Vec::new();
    let mut properties = Vec::new();
    for prop in &decl.properties {
        if is_field_like(&prop.accessor, &prop.symbol, prop.no_field_attribute) {
            continue;
        }
        let (getter, setter) = match &prop.accessor {
            PropertyAccessor::FieldLike => {
                // Forced into accessor form (NoField/explicit-interface) with
                // no user-written bodies: synthesize trivial passthrough
                // accessors over a same-named backing field.
                extra_fields.push(OutFieldDecl { name: prop.symbol.name.clone(), initializer: None, is_static: prop.symbol.is_static });
                (Some(trivial_getter(&prop.symbol.name)), Some(trivial_setter(&prop.symbol.name)))
            }
            PropertyAccessor::Accessors { getter, setter } => (
                getter.as_ref().map(|b| ctx.with_function_scope(|ctx| lower_block(ctx, b))).transpose()?,
                setter.as_ref().map(|b| ctx.with_function_scope(|ctx| lower_block(ctx, b))).transpose()?,
            ),
        };
        properties.push(OutPropertyDecl { name: prop.symbol.name.clone(), getter, setter });
    }

    let mut events = Vec::new();
    for event in &decl.events {
        if event_is_field_like(&event.accessor, &event.symbol) {
            continue;
        }
        let (getter, setter) = match &event.accessor {
            PropertyAccessor::FieldLike => {
                extra_fields.push(OutFieldDecl { name: event.symbol.name.clone(), initializer: None, is_static: event.symbol.is_static });
                (Some(trivial_getter(&event.symbol.name)), Some(trivial_setter(&event.symbol.name)))
            }
            PropertyAccessor::Accessors { getter, setter } => (
                getter.as_ref().map(|b| ctx.with_function_scope(|ctx| lower_block(ctx, b))).transpose()?,
                setter.as_ref().map(|b| ctx.with_function_scope(|ctx| lower_block(ctx, b))).transpose()?,
            ),
        };
        events.push(OutPropertyDecl { name: event.symbol.name.clone(), getter, setter });
    }

    Ok((properties, events, extra_fields))
}

fn trivial_getter(field_name: &str) -> OutBlock {
    OutBlock::new(vec![ast::Stmt::Return(vec![OutExpr::MemberAccess {
        receiver: Box::new(OutExpr::Identifier("this".to_string())),
        member: field_name.to_string(),
        is_colon_call: false,
    }])])
}

fn trivial_setter(field_name: &str) -> OutBlock {
    OutBlock::new(vec![ast::Stmt::Assignment {
        targets: vec![OutExpr::MemberAccess {
            receiver: Box::new(OutExpr::Identifier("this".to_string())),
            member: field_name.to_string(),
            is_colon_call: false,
        }],
        values: vec![OutExpr::Identifier("value".to_string())],
    }])
}

/// The sibling constructor's 1-based position among `decl.constructors`:
/// prefers the front-end-resolved [`Symbol::overload_index`] and falls back
/// to matching the initializer's argument count against a candidate's
/// declared parameter count only when that's absent.
fn resolve_this_ctor_index(decl: &TypeDecl, arg_count: usize) -> u32 {
    decl.constructors
        .iter()
        .enumerate()
        .find(|(_, c)| c.symbol.parameters.len() == arg_count)
        .map(|(idx, c)| c.symbol.overload_index.unwrap_or(idx as u32 + 1))
        .unwrap_or(1)
}

fn lower_constructors(ctx: &mut TransformContext<'_>, decl: &TypeDecl, own_name: &str, real_base: Option<&TypeRef>) -> R<Vec<ast::Stmt>> {
    let multiple = decl.constructors.len() > 1;
    let mut out = Vec::new();
    for (i, ctor) in decl.constructors.iter().enumerate() {
        let symbol = &ctor.symbol;
        let (parameters, _is_vararg) = method_parameters(symbol);
        let base_call = lower_ctor_initializer(ctx, decl, ctor, own_name, real_base)?;
        let body_block = ctor.body.as_ref().ok_or_else(|| {
            CompilationError::new(ErrorCode::ContractViolation, dummy_span(), "constructor has no body")
        })?;
        let ref_out_params = ref_out_param_names(symbol);
        let info = MethodInfo { symbol: symbol.clone(), ref_out_params, has_return: false };
        let body = ctx.with_method_info(info, |ctx| ctx.with_function_scope(|ctx| lower_block(ctx, body_block)))?;
        out.push(ast::Stmt::ConstructorAdapter {
            overload_index: if multiple { Some(symbol.overload_index.unwrap_or(i as u32 + 1)) } else { None },
            parameters,
            base_call,
            body,
        });
    }
    Ok(out)
}

fn lower_ctor_initializer(
    ctx: &mut TransformContext<'_>,
    decl: &TypeDecl,
    ctor: &InMethodDecl,
    own_name: &str,
    real_base: Option<&TypeRef>,
) -> R<Option<Box<OutExpr>>> {
    match &ctor.initializer {
        Some(init) => {
            let args = init.arguments.iter().map(|a| lower_expr(ctx, a)).collect::<R<Vec<_>>>()?;
            let mut call_args = vec![OutExpr::Identifier("this".to_string())];
            call_args.extend(args);
            let callee = match init.target {
                ConstructorInitializerTarget::Base => {
                    let base = real_base.ok_or_else(|| {
                        CompilationError::new(
                            ErrorCode::ContractViolation,
                            dummy_span(),
                            format!("explicit `{}(...)` initializer with no base type", lower_ctor_initializer_target(init.target)),
                        )
                    })?;
                    OutExpr::MemberAccess { receiver: Box::new(type_name_expr(base)), member: "__ctor__".to_string(), is_colon_call: false }
                }
                ConstructorInitializerTarget::This => {
                    let idx = resolve_this_ctor_index(decl, init.arguments.len());
                    let ctor_table = OutExpr::MemberAccess {
                        receiver: Box::new(OutExpr::Identifier(own_name.to_string())),
                        member: "__ctor__".to_string(),
                        is_colon_call: false,
                    };
                    OutExpr::TableIndex { receiver: Box::new(ctor_table), index: Box::new(OutExpr::Literal(ast::Literal::Number(idx.to_string()))) }
                }
            };
            Ok(Some(Box::new(OutExpr::Invocation { callee: Box::new(callee), arguments: call_args, span: None })))
        }
        None => match real_base {
            Some(base) => Ok(Some(Box::new(OutExpr::Invocation {
                callee: Box::new(OutExpr::MemberAccess { receiver: Box::new(type_name_expr(base)), member: "__ctor__".to_string(), is_colon_call: false }),
                arguments: vec![OutExpr::Identifier("this".to_string())],
                span: None,
            }))),
            None => Ok(None),
        },
    }
}
