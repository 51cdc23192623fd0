//! Expression Transformer (§4.D).

use crate::error::{CompilationError, ErrorCode};
use crate::output::ast::{self, BinaryOp as OutBinaryOp, Expr as OutExpr, FunctionBody, Literal as OutLiteral, TableItem, UnaryOp as OutUnaryOp};
use crate::template::{self, TemplateInputs};
use crate::transform::stmt::lower_block;
use crate::transform::TransformContext;
use semantic::node::{BinaryOp, Expr as InExpr, ExprKind, InitializerEntry, InterpolationPart, LambdaBody, Literal as InLiteral, UnaryOp};
use semantic::symbol::Symbol;
use semantic::types::{ConstantValue, TypeRef};

type R<T> = Result<T, CompilationError>;

pub(crate) fn map_binary_op(op: BinaryOp) -> Option<OutBinaryOp> {
    Some(match op {
        BinaryOp::Add => OutBinaryOp::Add,
        BinaryOp::Sub => OutBinaryOp::Sub,
        BinaryOp::Mul => OutBinaryOp::Mul,
        BinaryOp::Div => OutBinaryOp::Div,
        BinaryOp::Mod => OutBinaryOp::Mod,
        BinaryOp::Eq => OutBinaryOp::Eq,
        BinaryOp::NotEq => OutBinaryOp::NotEq,
        BinaryOp::Lt => OutBinaryOp::Lt,
        BinaryOp::Gt => OutBinaryOp::Gt,
        BinaryOp::Le => OutBinaryOp::Le,
        BinaryOp::Ge => OutBinaryOp::Ge,
        BinaryOp::And => OutBinaryOp::And,
        BinaryOp::Or => OutBinaryOp::Or,
        BinaryOp::BitAnd => OutBinaryOp::BitAnd,
        BinaryOp::BitOr => OutBinaryOp::BitOr,
        BinaryOp::BitXor => OutBinaryOp::BitXor,
        BinaryOp::Shl => OutBinaryOp::Shl,
        BinaryOp::Shr => OutBinaryOp::Shr,
        // `??` has no Lua operator; lowered specially below (the LHS in
        // practice is never a L-dst boolean `false`, so the short-circuit
        // `or` the worked example in §8 uses is safe here).
        BinaryOp::NullCoalesce => return None,
    })
}

fn map_unary_op(op: UnaryOp) -> OutUnaryOp {
    match op {
        UnaryOp::Neg | UnaryOp::Plus => OutUnaryOp::Neg,
        UnaryOp::Not => OutUnaryOp::Not,
        UnaryOp::BitNot => OutUnaryOp::BitNot,
        UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec => {
            unreachable!("inc/dec handled by lower_unary before reaching the plain-operator path")
        }
    }
}

fn one() -> OutExpr {
    OutExpr::Literal(OutLiteral::Number("1".to_string()))
}

/// `++`/`--` have no Lua equivalent and are rewritten through the
/// conditional-temp prelude mechanism: a pre-form updates in place and
/// evaluates to the new value, a post-form captures the old value in a
/// temporary before updating (§4.D).
fn lower_unary(ctx: &mut TransformContext<'_>, op: UnaryOp, operand: &InExpr, span: &semantic::ParseSourceSpan) -> R<OutExpr> {
    match op {
        UnaryOp::Neg | UnaryOp::Plus | UnaryOp::Not | UnaryOp::BitNot => Ok(OutExpr::Unary {
            op: map_unary_op(op),
            operand: Box::new(lower_expr(ctx, operand)?),
            span: Some(span.clone()),
        }),
        UnaryOp::PreInc | UnaryOp::PreDec => {
            let lowered = lower_expr(ctx, operand)?;
            let delta_op = if op == UnaryOp::PreInc { OutBinaryOp::Add } else { OutBinaryOp::Sub };
            let updated = OutExpr::Binary { op: delta_op, left: Box::new(lowered.clone()), right: Box::new(one()), span: None };
            ctx.current_block().prelude.push(ast::Stmt::Assignment { targets: vec![lowered.clone()], values: vec![updated] });
            Ok(lowered)
        }
        UnaryOp::PostInc | UnaryOp::PostDec => {
            let lowered = lower_expr(ctx, operand)?;
            let temp = ctx.fresh_temp();
            ctx.current_block().prelude.push(ast::Stmt::LocalVarDecl { names: vec![temp.clone()], values: vec![lowered.clone()] });
            let delta_op = if op == UnaryOp::PostInc { OutBinaryOp::Add } else { OutBinaryOp::Sub };
            let updated = OutExpr::Binary { op: delta_op, left: Box::new(lowered.clone()), right: Box::new(one()), span: None };
            ctx.current_block().prelude.push(ast::Stmt::Assignment { targets: vec![lowered], values: vec![updated] });
            Ok(OutExpr::Identifier(temp))
        }
    }
}

/// Lowers one L-src expression. Side-effecting guard statements a
/// conditional-access chain or an object-initializer needs are pushed onto
/// [`TransformContext::current_block`]'s prelude; the statement
/// transformer splices that prelude ahead of the statement currently being
/// emitted.
pub fn lower_expr(ctx: &mut TransformContext<'_>, expr: &InExpr) -> R<OutExpr> {
    match &expr.kind {
        ExprKind::Identifier(name) => Ok(OutExpr::Identifier(name.clone())),
        ExprKind::This => Ok(OutExpr::Identifier("this".to_string())),
        ExprKind::Base => Ok(OutExpr::Identifier("base".to_string())),
        ExprKind::Literal(lit) => Ok(lower_literal(lit)),
        ExprKind::Binary { op, left, right } => lower_binary(ctx, *op, left, right),
        ExprKind::Unary { op, operand } => lower_unary(ctx, *op, operand, &expr.span),
        ExprKind::MemberAccess { receiver, member, is_invocation, arguments } => {
            let recv = lower_expr(ctx, receiver)?;
            let access = OutExpr::MemberAccess {
                receiver: Box::new(recv),
                member: member.clone(),
                is_colon_call: *is_invocation,
            };
            if *is_invocation {
                Ok(OutExpr::Invocation {
                    callee: Box::new(access),
                    arguments: lower_args(ctx, arguments)?,
                    span: Some(expr.span.clone()),
                })
            } else {
                Ok(access)
            }
        }
        ExprKind::ConditionalMemberAccess { .. } => lower_conditional_chain(ctx, expr),
        ExprKind::Invocation { callee, arguments } => Ok(OutExpr::Invocation {
            callee: Box::new(lower_expr(ctx, callee)?),
            arguments: lower_args(ctx, arguments)?,
            span: Some(expr.span.clone()),
        }),
        ExprKind::ObjectCreation { ty, constructor, arguments, initializer } => {
            lower_object_creation(ctx, expr, ty, constructor.as_ref(), arguments, initializer)
        }
        ExprKind::ArrayCreation { element_type, rank_sizes, elements } => {
            if !elements.is_empty() {
                let items = elements
                    .iter()
                    .map(|e| lower_expr(ctx, e).map(TableItem::Single))
                    .collect::<R<Vec<_>>>()?;
                return Ok(OutExpr::TableInitializer(items));
            }
            let sizes = rank_sizes
                .iter()
                .map(|s| match s {
                    Some(e) => lower_expr(ctx, e),
                    None => Ok(OutExpr::Literal(OutLiteral::Number("0".to_string()))),
                })
                .collect::<R<Vec<_>>>()?;
            Ok(OutExpr::ArrayTypeAdapter {
                element_type: Box::new(type_name_expr(element_type)),
                rank: rank_sizes.len().max(1) as u32,
                sizes,
            })
        }
        ExprKind::TupleLiteral(elements) => {
            let items = elements
                .iter()
                .map(|e| lower_expr(ctx, e).map(TableItem::Single))
                .collect::<R<Vec<_>>>()?;
            Ok(OutExpr::Invocation {
                callee: Box::new(OutExpr::MemberAccess {
                    receiver: Box::new(OutExpr::Identifier("System.ValueTuple".to_string())),
                    member: "create".to_string(),
                    is_colon_call: false,
                }),
                arguments: vec![OutExpr::TableInitializer(items)],
                span: Some(expr.span.clone()),
            })
        }
        ExprKind::Conditional { condition, when_true, when_false } => {
            // No ternary in Lua; `cond and a or b` is the idiom, safe here
            // because the branches of a C#-level conditional never need to
            // be statically false-like in the way a boolean literal would.
            Ok(OutExpr::Binary {
                op: OutBinaryOp::Or,
                left: Box::new(OutExpr::Binary {
                    op: OutBinaryOp::And,
                    left: Box::new(lower_expr(ctx, condition)?),
                    right: Box::new(lower_expr(ctx, when_true)?),
                    span: None,
                }),
                right: Box::new(lower_expr(ctx, when_false)?),
                span: Some(expr.span.clone()),
            })
        }
        ExprKind::Assign { target, value } => {
            // Assignment-as-statement is rewritten directly by the statement
            // transformer; reaching this arm means the assignment occurs as
            // a sub-expression (`a = (b = c)`), which Lua has no expression
            // form for. Hoist the assignment into the enclosing block's
            // prelude and evaluate to the assigned value.
            let target_lowered = lower_expr(ctx, target)?;
            let value_lowered = lower_expr(ctx, value)?;
            ctx.current_block().prelude.push(ast::Stmt::Assignment { targets: vec![target_lowered.clone()], values: vec![value_lowered] });
            Ok(target_lowered)
        }
        ExprKind::CompoundAssign { op, target, value } => {
            let bin_op = map_binary_op(*op).ok_or_else(|| {
                CompilationError::new(ErrorCode::UnsupportedConstruct, expr.span.clone(), "unsupported compound-assignment operator")
            })?;
            Ok(OutExpr::Binary {
                op: bin_op,
                left: Box::new(lower_expr(ctx, target)?),
                right: Box::new(lower_expr(ctx, value)?),
                span: Some(expr.span.clone()),
            })
        }
        ExprKind::Lambda { parameters, body } => {
            let block = match body {
                LambdaBody::Block(b) => ctx.with_function_scope(|ctx| lower_block(ctx, b))?,
                LambdaBody::Expr(e) => {
                    let value = lower_expr(ctx, e)?;
                    ast::Block::new(vec![ast::Stmt::Return(vec![value])])
                }
            };
            Ok(OutExpr::FunctionLiteral(Box::new(FunctionBody {
                parameters: parameters.clone(),
                is_vararg: false,
                body: block,
            })))
        }
        ExprKind::StringInterpolation(parts) => lower_interpolation(ctx, parts, &expr.span),
        ExprKind::TypeOf(ty) => {
            if ty.is_enum() {
                ctx.logger.debug(&format!("marking enum {} for export", ty.display_name()));
            }
            Ok(OutExpr::Invocation {
                callee: Box::new(OutExpr::MemberAccess {
                    receiver: Box::new(OutExpr::Identifier("System".to_string())),
                    member: "typeof".to_string(),
                    is_colon_call: false,
                }),
                arguments: vec![type_name_expr(ty)],
                span: Some(expr.span.clone()),
            })
        }
        ExprKind::SizeOf(ty) => match ctx.symbols.constant_value_of(expr) {
            Some(value) => Ok(const_to_expr(&value)),
            None => Err(CompilationError::new(
                ErrorCode::ContractViolation,
                expr.span.clone(),
                format!("sizeof({}) has no constant value from the semantic input", ty),
            )),
        },
        ExprKind::Default(ty) => match ctx.symbols.constant_value_of(expr) {
            Some(value) => Ok(const_to_expr(&value)),
            None => Ok(zero_value_for_type(ty)),
        },
        ExprKind::Cast { operand, .. } => lower_expr(ctx, operand),
        ExprKind::IsPattern { subject, target_type, binding } => {
            lower_is_pattern(ctx, expr, subject, target_type, binding.as_deref())
        }
        ExprKind::Parenthesized(inner) => Ok(OutExpr::Parenthesized(Box::new(lower_expr(ctx, inner)?))),
    }
}

fn lower_args(ctx: &mut TransformContext<'_>, args: &[InExpr]) -> R<Vec<OutExpr>> {
    args.iter().map(|a| lower_expr(ctx, a)).collect()
}

fn lower_literal(lit: &InLiteral) -> OutExpr {
    match lit {
        InLiteral::Null => OutExpr::Literal(OutLiteral::Nil),
        InLiteral::Bool(b) => OutExpr::Literal(OutLiteral::Bool(*b)),
        InLiteral::Char(c) => OutExpr::Literal(OutLiteral::Char(c.to_string())),
        InLiteral::Int(i) => OutExpr::Literal(OutLiteral::Number(i.to_string())),
        InLiteral::UInt(u) => OutExpr::Literal(OutLiteral::Number(u.to_string())),
        InLiteral::Float(f) => OutExpr::Literal(OutLiteral::Number(f.to_string())),
        InLiteral::String(s) => OutExpr::Literal(OutLiteral::String(s.clone())),
        InLiteral::Verbatim(s) => OutExpr::Literal(OutLiteral::Verbatim(s.clone())),
    }
}

pub(crate) fn const_to_expr(value: &semantic::types::ConstantValue) -> OutExpr {
    use semantic::types::ConstantValue;
    match value {
        ConstantValue::Null => OutExpr::Literal(OutLiteral::Nil),
        ConstantValue::Bool(b) => OutExpr::Literal(OutLiteral::Bool(*b)),
        ConstantValue::Char(c) => OutExpr::Literal(OutLiteral::Char(c.to_string())),
        ConstantValue::Int(i) => OutExpr::Literal(OutLiteral::Number(i.to_string())),
        ConstantValue::UInt(u) => OutExpr::Literal(OutLiteral::Number(u.to_string())),
        ConstantValue::Float(f) => OutExpr::Literal(OutLiteral::Number(f.to_string())),
        ConstantValue::String(s) => OutExpr::Literal(OutLiteral::String(s.clone())),
    }
}

/// Type-specific zero value when the constant evaluator has nothing to
/// offer for `default(T)` (§4.D "sizeof, default(T)").
fn zero_value_for_type(ty: &TypeRef) -> OutExpr {
    match ty {
        TypeRef::Nullable(_) => OutExpr::Literal(OutLiteral::Nil),
        TypeRef::Named { name, .. } => match name.as_str() {
            "bool" => OutExpr::Literal(OutLiteral::Bool(false)),
            "int" | "uint" | "long" | "ulong" | "short" | "ushort" | "byte" | "sbyte"
            | "float" | "double" | "decimal" => OutExpr::Literal(OutLiteral::Number("0".to_string())),
            "char" => OutExpr::Literal(OutLiteral::Number("0".to_string())),
            _ => OutExpr::Literal(OutLiteral::Nil),
        },
        _ => OutExpr::Literal(OutLiteral::Nil),
    }
}

/// Whether a trailing call-site literal is exactly the parameter's default,
/// so it's safe to drop without perturbing the (already frozen) overload
/// resolution (§4.D "Object creation").
fn literal_equals_default(kind: &ExprKind, default: &ConstantValue) -> bool {
    let ExprKind::Literal(lit) = kind else { return false };
    match (lit, default) {
        (InLiteral::Null, ConstantValue::Null) => true,
        (InLiteral::Bool(a), ConstantValue::Bool(b)) => a == b,
        (InLiteral::Char(a), ConstantValue::Char(b)) => a == b,
        (InLiteral::Int(a), ConstantValue::Int(b)) => a == b,
        (InLiteral::UInt(a), ConstantValue::UInt(b)) => a == b,
        (InLiteral::Float(a), ConstantValue::Float(b)) => a == b,
        (InLiteral::String(a), ConstantValue::String(b)) => a == b,
        _ => false,
    }
}

pub(crate) fn type_name_expr(ty: &TypeRef) -> OutExpr {
    OutExpr::Identifier(crate::naming::type_lua_name(ty))
}

fn lower_binary(ctx: &mut TransformContext<'_>, op: BinaryOp, left: &InExpr, right: &InExpr) -> R<OutExpr> {
    let l = lower_expr(ctx, left)?;
    let r = lower_expr(ctx, right)?;
    match map_binary_op(op) {
        Some(out_op) => Ok(OutExpr::Binary { op: out_op, left: Box::new(l), right: Box::new(r), span: None }),
        None => Ok(OutExpr::Binary { op: OutBinaryOp::Or, left: Box::new(l), right: Box::new(r), span: None }),
    }
}

/// §4.D "Conditional access `a?.b?.c`": flattens the chain, introduces the
/// root temporary, and pushes guarded link updates into the enclosing
/// block's prelude, returning the temporary as the chain's value.
fn lower_conditional_chain(ctx: &mut TransformContext<'_>, expr: &InExpr) -> R<OutExpr> {
    enum Link<'e> {
        Access { member: &'e str, is_invocation: bool, arguments: &'e [InExpr], conditional: bool },
    }

    fn flatten<'e>(expr: &'e InExpr, links: &mut Vec<Link<'e>>) -> &'e InExpr {
        match &expr.kind {
            ExprKind::ConditionalMemberAccess { receiver, member, is_invocation, arguments } => {
                let base = flatten(receiver, links);
                links.push(Link::Access { member, is_invocation: *is_invocation, arguments, conditional: true });
                base
            }
            ExprKind::MemberAccess { receiver, member, is_invocation, arguments } => {
                let base = flatten(receiver, links);
                links.push(Link::Access { member, is_invocation: *is_invocation, arguments, conditional: false });
                base
            }
            _ => expr,
        }
    }

    let mut links = Vec::new();
    let base = flatten(expr, &mut links);

    let base_val = lower_expr(ctx, base)?;
    let temp = ctx.fresh_temp();
    ctx.current_block().prelude.push(ast::Stmt::LocalVarDecl { names: vec![temp.clone()], values: vec![base_val] });

    ctx.with_conditional_temp(temp.clone(), |ctx| -> R<()> {
        for link in &links {
            let Link::Access { member, is_invocation, arguments, conditional } = link;
            let recv = OutExpr::Identifier(temp.clone());
            let access = OutExpr::MemberAccess { receiver: Box::new(recv), member: member.to_string(), is_colon_call: *is_invocation };
            let value = if *is_invocation {
                OutExpr::Invocation { callee: Box::new(access), arguments: lower_args(ctx, arguments)?, span: None }
            } else {
                access
            };
            let assign = ast::Stmt::Assignment { targets: vec![OutExpr::Identifier(temp.clone())], values: vec![value] };
            if *conditional {
                let guard = ast::Stmt::If {
                    arms: vec![ast::IfArm {
                        condition: OutExpr::Binary {
                            op: OutBinaryOp::NotEq,
                            left: Box::new(OutExpr::Identifier(temp.clone())),
                            right: Box::new(OutExpr::Literal(OutLiteral::Nil)),
                            span: None,
                        },
                        body: ast::Block::new(vec![assign]),
                    }],
                    else_block: None,
                };
                ctx.current_block().prelude.push(guard);
            } else {
                ctx.current_block().prelude.push(assign);
            }
        }
        Ok(())
    })?;

    Ok(OutExpr::Identifier(temp))
}

/// §4.D "String interpolation": `(fmt):format(args)`.
fn lower_interpolation(ctx: &mut TransformContext<'_>, parts: &[InterpolationPart], span: &semantic::ParseSourceSpan) -> R<OutExpr> {
    let mut fmt = String::new();
    let mut args = Vec::new();
    for part in parts {
        match part {
            InterpolationPart::Text(text) => fmt.push_str(text),
            InterpolationPart::Hole(expr) => {
                fmt.push('{');
                fmt.push_str(&args.len().to_string());
                fmt.push('}');
                args.push(lower_expr(ctx, expr)?);
            }
        }
    }
    Ok(OutExpr::Invocation {
        callee: Box::new(OutExpr::MemberAccess {
            receiver: Box::new(OutExpr::Parenthesized(Box::new(OutExpr::Literal(OutLiteral::String(fmt))))),
            member: "format".to_string(),
            is_colon_call: true,
        }),
        arguments: args,
        span: Some(span.clone()),
    })
}

/// §4.D "`is`-pattern": binds `subject` to `pattern`, returns
/// `System.is(t, T)`, constant-folding to `true` for a provably-subtype
/// subject (§9 point 1, §8 property invariants).
fn lower_is_pattern(
    ctx: &mut TransformContext<'_>,
    expr: &InExpr,
    subject: &InExpr,
    target_type: &TypeRef,
    binding: Option<&str>,
) -> R<OutExpr> {
    let subject_ty = ctx.symbols.type_of(subject);
    if ctx.symbols.is_subtype(&subject_ty, target_type) {
        if let Some(name) = binding {
            let value = lower_expr(ctx, subject)?;
            ctx.current_block().prelude.push(ast::Stmt::LocalVarDecl { names: vec![name.to_string()], values: vec![value] });
        }
        return Ok(OutExpr::Literal(OutLiteral::Bool(true)));
    }
    let value = lower_expr(ctx, subject)?;
    let binding_name = binding.map(|b| b.to_string()).unwrap_or_else(|| ctx.fresh_temp());
    ctx.current_block().prelude.push(ast::Stmt::LocalVarDecl { names: vec![binding_name.clone()], values: vec![value] });
    Ok(OutExpr::Invocation {
        callee: Box::new(OutExpr::MemberAccess {
            receiver: Box::new(OutExpr::Identifier("System".to_string())),
            member: "is".to_string(),
            is_colon_call: false,
        }),
        arguments: vec![OutExpr::Identifier(binding_name), type_name_expr(target_type)],
        span: Some(expr.span.clone()),
    })
}

/// §4.D "Object creation" and "Initializer expressions".
fn lower_object_creation(
    ctx: &mut TransformContext<'_>,
    expr: &InExpr,
    ty: &TypeRef,
    constructor: Option<&Symbol>,
    arguments: &[InExpr],
    initializer: &[InitializerEntry],
) -> R<OutExpr> {
    if let Some(ctor) = constructor {
        if let Some(tmpl) = ctx.metadata.code_template_for(ctor) {
            let lowered_args = lower_args(ctx, arguments)?;
            let rendered_args: Vec<String> = lowered_args
                .iter()
                .map(|a| {
                    let module = ast::Module { declarations: vec![], top_level: vec![ast::Stmt::ExprStmt(a.clone())] };
                    crate::output::renderer::Renderer::render_module(ctx.config, &module)
                        .trim_end()
                        .trim_end_matches(';')
                        .to_string()
                })
                .collect();
            let inputs = TemplateInputs { this_expr: None, arguments: &rendered_args, rest: None, type_arguments: &[] };
            let text = template::expand(tmpl, &inputs, &expr.span)?;
            return Ok(OutExpr::Literal(OutLiteral::Verbatim(text)));
        }
    }

    if let TypeRef::Nullable(_) = ty {
        if arguments.len() == 1 {
            return lower_expr(ctx, &arguments[0]);
        }
    }

    if ty.is_tuple() {
        let items = arguments.iter().map(|a| lower_expr(ctx, a).map(TableItem::Single)).collect::<R<Vec<_>>>()?;
        return Ok(OutExpr::Invocation {
            callee: Box::new(OutExpr::MemberAccess {
                receiver: Box::new(OutExpr::Identifier("System.ValueTuple".to_string())),
                member: "create".to_string(),
                is_colon_call: false,
            }),
            arguments: vec![OutExpr::TableInitializer(items)],
            span: Some(expr.span.clone()),
        });
    }

    let mut args = arguments.to_vec();
    if let Some(ctor) = constructor {
        // Drop trailing arguments equal to their parameter's default; the
        // overload is already resolved statically so this never changes
        // which constructor is invoked (§4.D "Object creation").
        while args.len() > 0 {
            let Some(param) = ctor.parameters.get(args.len() - 1) else { break };
            let Some(default) = &param.default_value else { break };
            let last_arg = &args[args.len() - 1];
            if literal_equals_default(&last_arg.kind, default) {
                args.pop();
            } else {
                break;
            }
        }
    }
    let lowered_args = lower_args(ctx, &args)?;

    let callee = match constructor.and_then(|c| c.overload_index) {
        Some(idx) if idx > 1 => OutExpr::MemberAccess {
            receiver: Box::new(type_name_expr(ty)),
            member: format!("__ctor__{}", idx),
            is_colon_call: false,
        },
        _ => type_name_expr(ty),
    };
    let creation = OutExpr::Invocation { callee: Box::new(callee), arguments: lowered_args, span: Some(expr.span.clone()) };

    if initializer.is_empty() {
        return Ok(creation);
    }

    // §4.D "Initializer expressions": IIFE over a temporary `t`.
    let temp = "t".to_string();
    let mut stmts = vec![ast::Stmt::LocalVarDecl { names: vec![temp.clone()], values: vec![creation] }];
    for entry in initializer {
        let stmt = match entry {
            InitializerEntry::Member { name, value } => ast::Stmt::Assignment {
                targets: vec![OutExpr::MemberAccess { receiver: Box::new(OutExpr::Identifier(temp.clone())), member: name.clone(), is_colon_call: false }],
                values: vec![lower_expr(ctx, value)?],
            },
            InitializerEntry::Index { index, value } => ast::Stmt::ExprStmt(OutExpr::Invocation {
                callee: Box::new(OutExpr::MemberAccess { receiver: Box::new(OutExpr::Identifier(temp.clone())), member: "set".to_string(), is_colon_call: true }),
                arguments: vec![lower_expr(ctx, index)?, lower_expr(ctx, value)?],
                span: None,
            }),
            InitializerEntry::Element(value) => ast::Stmt::ExprStmt(OutExpr::Invocation {
                callee: Box::new(OutExpr::MemberAccess { receiver: Box::new(OutExpr::Identifier(temp.clone())), member: "Add".to_string(), is_colon_call: true }),
                arguments: vec![lower_expr(ctx, value)?],
                span: None,
            }),
        };
        stmts.push(stmt);
    }
    stmts.push(ast::Stmt::Return(vec![OutExpr::Identifier(temp)]));
    Ok(OutExpr::Invocation {
        callee: Box::new(OutExpr::Parenthesized(Box::new(OutExpr::FunctionLiteral(Box::new(FunctionBody {
            parameters: vec![],
            is_vararg: false,
            body: ast::Block::new(stmts),
        }))))),
        arguments: vec![],
        span: Some(expr.span.clone()),
    })
}
