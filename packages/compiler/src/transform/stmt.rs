//! Statement Transformer (§4.E).
//!
//! Lowers L-src statements, including the control-flow rewrites that have
//! no L-dst counterpart: try/using (return-propagating adapters),
//! foreach, switch/goto-case, continue, and multi-local-function blocks.

use crate::error::{CompilationError, ErrorCode};
use crate::output::ast::{BinaryOp as OutBinaryOp, Block as OutBlock, Expr as OutExpr, FunctionBody, IfArm, Literal as OutLiteral, Stmt as OutStmt, UnaryOp as OutUnaryOp};
use crate::transform::expr::{const_to_expr, lower_expr, type_name_expr};
use crate::transform::TransformContext;
use semantic::node::{
    Block as InBlock, CatchClause, ConstructorInitializerTarget, Expr as InExpr, ExprKind, GotoCaseTarget,
    Stmt as InStmt, StmtKind, SwitchSection,
};

type R<T> = Result<T, CompilationError>;

fn true_lit() -> OutExpr {
    OutExpr::Literal(OutLiteral::Bool(true))
}

fn false_lit() -> OutExpr {
    OutExpr::Literal(OutLiteral::Bool(false))
}

/// Lowers a whole block, splicing each statement's synthesized prelude
/// (temporaries, conditional-access guards) ahead of it. Each source
/// statement gets its own [`crate::transform::BlockFrame`] so a prelude
/// introduced while lowering statement N never leaks ahead of statement
/// N-1 (§4.E "Block stack").
pub fn lower_block(ctx: &mut TransformContext<'_>, block: &InBlock) -> R<OutBlock> {
    let mut out = Vec::new();
    let local_fn_names = predeclare_local_functions(block);
    if !local_fn_names.is_empty() {
        out.push(OutStmt::LocalVarDecl { names: local_fn_names, values: vec![] });
    }
    for stmt in &block.statements {
        let (prelude, lowered) = ctx.with_block_scope(|ctx| -> R<(Vec<OutStmt>, Vec<OutStmt>)> {
            let lowered = lower_stmt(ctx, stmt)?;
            let prelude = std::mem::take(&mut ctx.current_block().prelude);
            Ok((prelude, lowered))
        })?;
        out.extend(prelude);
        out.extend(lowered);
    }
    Ok(OutBlock::new(out))
}

/// Names of every `LocalFunction` declared directly in `block` (not
/// nested inside a sub-block), in source order, so they can all be
/// forward-declared together and assigned in place — permitting mutual
/// recursion whether there's one such function or several (§4.E "Local
/// functions").
fn predeclare_local_functions(block: &InBlock) -> Vec<String> {
    block
        .statements
        .iter()
        .filter_map(|s| match &s.kind {
            StmtKind::LocalFunction { symbol, .. } => Some(symbol.name.clone()),
            _ => None,
        })
        .collect()
}

/// Lowers one source statement into zero or more L-dst statements (not
/// counting its prelude, which the caller splices separately).
pub fn lower_stmt(ctx: &mut TransformContext<'_>, stmt: &InStmt) -> R<Vec<OutStmt>> {
    match &stmt.kind {
        StmtKind::Expr(e) => lower_expr_stmt(ctx, e),
        StmtKind::LocalDecl { names, initializer, .. } => lower_local_decl(ctx, names, initializer.as_ref()),
        StmtKind::If { condition, then_branch, else_branch } => lower_if(ctx, condition, then_branch, else_branch.as_deref()),
        StmtKind::While { condition, body } => {
            let uses_flag = body_has_continue(body);
            let cond = lower_expr(ctx, condition)?;
            let lowered_body = ctx.with_loop_continue(uses_flag, |ctx| lower_block(ctx, body))?;
            let wrapped = wrap_loop_body(lowered_body, Vec::new(), uses_flag);
            Ok(vec![OutStmt::While { condition: cond, body: wrapped }])
        }
        StmtKind::DoWhile { condition, body } => {
            let uses_flag = body_has_continue(body);
            let lowered_body = ctx.with_loop_continue(uses_flag, |ctx| lower_block(ctx, body))?;
            let wrapped = wrap_loop_body(lowered_body, Vec::new(), uses_flag);
            let cond = lower_expr(ctx, condition)?;
            // `do { } while (cond)` repeats while `cond` is true; Lua's
            // `repeat ... until cond` repeats until `cond` is true, so the
            // condition is negated.
            Ok(vec![OutStmt::RepeatUntil { body: wrapped, condition: OutExpr::Unary { op: OutUnaryOp::Not, operand: Box::new(cond), span: None } }])
        }
        StmtKind::For { init, condition, step, body } => lower_for(ctx, init, condition.as_ref(), step, body),
        StmtKind::Foreach { variable, source, body, .. } => {
            let uses_flag = body_has_continue(body);
            let src = lower_expr(ctx, source)?;
            let lowered_body = ctx.with_loop_continue(uses_flag, |ctx| lower_block(ctx, body))?;
            let wrapped = wrap_loop_body(lowered_body, Vec::new(), uses_flag);
            let each_call = OutExpr::Invocation {
                callee: Box::new(OutExpr::MemberAccess {
                    receiver: Box::new(OutExpr::Identifier("System".to_string())),
                    member: "each".to_string(),
                    is_colon_call: false,
                }),
                arguments: vec![src],
                span: None,
            };
            Ok(vec![OutStmt::GenericFor { vars: vec!["_".to_string(), variable.clone()], exprs: vec![each_call], body: wrapped }])
        }
        StmtKind::Block(b) => Ok(vec![OutStmt::Do(lower_block(ctx, b)?)]),
        StmtKind::Break => Ok(lower_break(ctx)),
        StmtKind::Continue => Ok(vec![OutStmt::ContinueAdapter]),
        StmtKind::Return(value) => Ok(vec![lower_return(ctx, value.as_ref())?]),
        StmtKind::Throw(value) => Ok(vec![lower_throw(ctx, value.as_ref())?]),
        StmtKind::Try { body, catches, finally } => lower_try(ctx, body, catches, finally.as_ref()),
        StmtKind::Using { resources, body } => lower_using(ctx, resources, body),
        StmtKind::Lock { guard, body } => {
            let guard_text = render_guard_text(guard);
            let mut out = vec![OutStmt::ShortComment(format!("lock ({})", guard_text))];
            out.push(OutStmt::Do(lower_block(ctx, body)?));
            Ok(out)
        }
        StmtKind::Unsafe(body) => Ok(vec![OutStmt::ShortComment("unsafe".to_string()), OutStmt::Do(lower_block(ctx, body)?)]),
        StmtKind::Fixed { declaration, body } => {
            let mut out = vec![OutStmt::ShortComment("fixed".to_string())];
            out.extend(lower_stmt(ctx, declaration)?);
            out.push(OutStmt::Do(lower_block(ctx, body)?));
            Ok(out)
        }
        StmtKind::Switch { subject, sections } => lower_switch(ctx, subject, sections),
        StmtKind::Goto(label) => Ok(vec![OutStmt::Goto(label.clone())]),
        StmtKind::Labeled { label, statement } => {
            let mut out = vec![OutStmt::Labeled(label.clone())];
            out.extend(lower_stmt(ctx, statement)?);
            Ok(out)
        }
        StmtKind::LocalFunction { symbol, parameters, body } => {
            let fn_body = ctx.with_function_scope(|ctx| lower_block(ctx, body))?;
            let params: Vec<String> = parameters.iter().map(|p| p.name.clone()).collect();
            let literal = OutExpr::FunctionLiteral(Box::new(FunctionBody { parameters: params, is_vararg: false, body: fn_body }));
            Ok(vec![OutStmt::Assignment { targets: vec![OutExpr::Identifier(symbol.name.clone())], values: vec![literal] }])
        }
        StmtKind::Empty => Ok(Vec::new()),
    }
}

/// Best-effort textual rendering of a guard expression for the
/// `lock`/comment passthrough — purely cosmetic, so a plain identifier is
/// enough; anything more complex just prints as `<expr>`.
fn render_guard_text(guard: &InExpr) -> String {
    match &guard.kind {
        ExprKind::Identifier(name) => name.clone(),
        ExprKind::This => "this".to_string(),
        _ => "<expr>".to_string(),
    }
}

/// §4.E statement-position expression lowering: assignment, compound
/// assignment, and `++`/`--` get direct statement forms instead of going
/// through [`lower_expr`]'s generic prelude-based rewriting, which would
/// otherwise leave a pointless trailing expression-statement behind.
fn lower_expr_stmt(ctx: &mut TransformContext<'_>, e: &InExpr) -> R<Vec<OutStmt>> {
    match &e.kind {
        ExprKind::Assign { target, value } => lower_assign_stmt(ctx, target, value),
        ExprKind::CompoundAssign { op, target, value } => {
            // Compound assignment has no dedicated statement lowering here
            // because it needs the same binary-op mapping `lower_expr`
            // already owns; reuse it and assign the result directly.
            let target_lowered = lower_expr(ctx, target)?;
            let value_lowered = lower_compound_rhs(ctx, *op, target, value, &e.span)?;
            Ok(vec![OutStmt::Assignment { targets: vec![target_lowered], values: vec![value_lowered] }])
        }
        ExprKind::Unary { op, operand } => lower_inc_dec_stmt(ctx, *op, operand).unwrap_or_else(|| {
            let lowered = lower_expr(ctx, e)?;
            Ok(vec![OutStmt::ExprStmt(lowered)])
        }),
        // `a?.b?.c();` as a bare statement: only the guard `if`-chain
        // (pushed to the block prelude by `lower_expr`) has any effect.
        // The trailing `t₀` identifier `lower_expr` returns is not a valid
        // Lua expression-statement (`stat ::= functioncall` only), so it's
        // discarded here rather than wrapped in `ExprStmt` (§4.D).
        ExprKind::ConditionalMemberAccess { .. } => {
            lower_expr(ctx, e)?;
            Ok(Vec::new())
        }
        _ => {
            let lowered = lower_expr(ctx, e)?;
            Ok(vec![OutStmt::ExprStmt(lowered)])
        }
    }
}

fn lower_inc_dec_stmt(
    ctx: &mut TransformContext<'_>,
    op: semantic::node::UnaryOp,
    operand: &InExpr,
) -> Option<R<Vec<OutStmt>>> {
    use semantic::node::UnaryOp;
    let is_inc = match op {
        UnaryOp::PreInc | UnaryOp::PostInc => true,
        UnaryOp::PreDec | UnaryOp::PostDec => false,
        _ => return None,
    };
    Some((|| {
        let target = lower_expr(ctx, operand)?;
        let delta_op = if is_inc { OutBinaryOp::Add } else { OutBinaryOp::Sub };
        let updated = OutExpr::Binary {
            op: delta_op,
            left: Box::new(target.clone()),
            right: Box::new(OutExpr::Literal(OutLiteral::Number("1".to_string()))),
            span: None,
        };
        Ok(vec![OutStmt::Assignment { targets: vec![target], values: vec![updated] }])
    })())
}

fn lower_compound_rhs(
    ctx: &mut TransformContext<'_>,
    op: semantic::node::BinaryOp,
    target: &InExpr,
    value: &InExpr,
    span: &semantic::ParseSourceSpan,
) -> R<OutExpr> {
    let bin_op = crate::transform::expr::map_binary_op(op).ok_or_else(|| {
        CompilationError::new(ErrorCode::UnsupportedConstruct, span.clone(), "unsupported compound-assignment operator")
    })?;
    Ok(OutExpr::Binary {
        op: bin_op,
        left: Box::new(lower_expr(ctx, target)?),
        right: Box::new(lower_expr(ctx, value)?),
        span: Some(span.clone()),
    })
}

/// `a = b` / tuple-deconstructing `(a, b) = (1, 2)` as a statement (§8
/// scenario: flattens to a multi-assign, never emitting `System.ValueTuple`
/// machinery when the LHS is itself a tuple).
fn lower_assign_stmt(ctx: &mut TransformContext<'_>, target: &InExpr, value: &InExpr) -> R<Vec<OutStmt>> {
    if let ExprKind::TupleLiteral(target_elems) = &target.kind {
        let targets = target_elems.iter().map(|t| lower_expr(ctx, t)).collect::<R<Vec<_>>>()?;
        let values = if let ExprKind::TupleLiteral(value_elems) = &value.kind {
            value_elems.iter().map(|v| lower_expr(ctx, v)).collect::<R<Vec<_>>>()?
        } else {
            vec![lower_expr(ctx, value)?]
        };
        return Ok(vec![OutStmt::Assignment { targets, values }]);
    }
    let target_lowered = lower_expr(ctx, target)?;
    let value_lowered = lower_expr(ctx, value)?;
    let stmt = match target_lowered {
        OutExpr::PropertyAdapter { receiver, name, field_like: false } => OutStmt::ExprStmt(OutExpr::Invocation {
            callee: Box::new(OutExpr::MemberAccess { receiver, member: format!("set_{}", name), is_colon_call: true }),
            arguments: vec![value_lowered],
            span: None,
        }),
        other => OutStmt::Assignment { targets: vec![other], values: vec![value_lowered] },
    };
    Ok(vec![stmt])
}

/// `var x = expr;` / deconstructing `var (a, b) = t;`. A tuple-typed
/// initializer that is itself a literal tuple flattens element-by-element;
/// any other tuple-valued initializer is unpacked through the runtime's
/// tuple-unpack convention (an Open Question the runtime, not this crate,
/// resolves the exact shape of — see DESIGN.md).
fn lower_local_decl(ctx: &mut TransformContext<'_>, names: &[String], initializer: Option<&InExpr>) -> R<Vec<OutStmt>> {
    if names.len() > 1 {
        let values = match initializer {
            Some(init) => match &init.kind {
                ExprKind::TupleLiteral(elems) => elems.iter().map(|e| lower_expr(ctx, e)).collect::<R<Vec<_>>>()?,
                _ => {
                    let lowered = lower_expr(ctx, init)?;
                    vec![OutExpr::Invocation {
                        callee: Box::new(OutExpr::MemberAccess { receiver: Box::new(lowered), member: "unpack".to_string(), is_colon_call: true }),
                        arguments: vec![],
                        span: None,
                    }]
                }
            },
            None => Vec::new(),
        };
        return Ok(vec![OutStmt::LocalVarDecl { names: names.to_vec(), values }]);
    }
    let values = match initializer {
        Some(init) => vec![lower_expr(ctx, init)?],
        None => Vec::new(),
    };
    Ok(vec![OutStmt::LocalVarDecl { names: names.to_vec(), values }])
}

/// Flattens an `if`/`else if`/`else` chain (nested one-statement
/// `else_branch`es in the source tree) into one `ast::Stmt::If` with all
/// `elseif` arms collected.
fn lower_if(
    ctx: &mut TransformContext<'_>,
    condition: &InExpr,
    then_branch: &InBlock,
    else_branch: Option<&InStmt>,
) -> R<Vec<OutStmt>> {
    let mut arms = vec![IfArm { condition: lower_expr(ctx, condition)?, body: lower_block(ctx, then_branch)? }];
    let mut else_block = None;
    let mut current = else_branch;
    while let Some(stmt) = current {
        match &stmt.kind {
            StmtKind::If { condition, then_branch, else_branch } => {
                arms.push(IfArm { condition: lower_expr(ctx, condition)?, body: lower_block(ctx, then_branch)? });
                current = else_branch.as_deref();
            }
            StmtKind::Block(b) => {
                else_block = Some(lower_block(ctx, b)?);
                current = None;
            }
            _ => {
                let lowered = lower_stmt(ctx, stmt)?;
                else_block = Some(OutBlock::new(lowered));
                current = None;
            }
        }
    }
    Ok(vec![OutStmt::If { arms, else_block }])
}

/// §4.E "continue": whether `block` contains a `continue` reachable
/// without crossing a nested loop or closure boundary (those have their
/// own independent continue target).
fn body_has_continue(block: &InBlock) -> bool {
    block.statements.iter().any(stmt_has_continue)
}

fn stmt_has_continue(stmt: &InStmt) -> bool {
    match &stmt.kind {
        StmtKind::Continue => true,
        StmtKind::If { then_branch, else_branch, .. } => {
            body_has_continue(then_branch) || else_branch.as_deref().map(stmt_has_continue).unwrap_or(false)
        }
        StmtKind::Block(b) => body_has_continue(b),
        StmtKind::Try { body, catches, finally } => {
            body_has_continue(body) || catches.iter().any(|c| body_has_continue(&c.body)) || finally.as_ref().map(body_has_continue).unwrap_or(false)
        }
        StmtKind::Using { body, .. } => body_has_continue(body),
        StmtKind::Lock { body, .. } | StmtKind::Unsafe(body) => body_has_continue(body),
        StmtKind::Fixed { body, .. } => body_has_continue(body),
        StmtKind::Switch { sections, .. } => sections.iter().any(|s| s.body.iter().any(stmt_has_continue)),
        StmtKind::Labeled { statement, .. } => stmt_has_continue(statement),
        // While/DoWhile/For/Foreach/LocalFunction introduce their own loop
        // or closure scope: a `continue` inside them targets that inner
        // construct, not this one.
        _ => false,
    }
}

/// Wraps a lowered loop body in the `__continue__`-flag convention (§4.E):
///
/// ```text
/// local __continue__ = true
/// repeat
///   <body>
/// until true
/// <step, for a C-style `for`>
/// if not __continue__ then break end
/// ```
///
/// `continue` inside `<body>` lowers to `__continue__ = true; break`,
/// exiting just the `repeat/until true` wrapper; an explicit `break` lowers
/// to `__continue__ = false; break`, which additionally breaks the outer
/// loop once the epilogue check runs. Step statements execute every
/// iteration including ones ended by `continue`, matching C-style `for`'s
/// semantics of always running the increment before the next test.
fn wrap_loop_body(body: OutBlock, step: Vec<OutStmt>, uses_flag: bool) -> OutBlock {
    if !uses_flag {
        let mut stmts = body.statements;
        stmts.extend(step);
        return OutBlock::new(stmts);
    }
    let mut stmts = vec![
        OutStmt::LocalVarDecl { names: vec!["__continue__".to_string()], values: vec![true_lit()] },
        OutStmt::RepeatUntil { body, condition: true_lit() },
    ];
    stmts.extend(step);
    stmts.push(OutStmt::If {
        arms: vec![IfArm {
            condition: OutExpr::Unary { op: OutUnaryOp::Not, operand: Box::new(OutExpr::Identifier("__continue__".to_string())), span: None },
            body: OutBlock::new(vec![OutStmt::Break]),
        }],
        else_block: None,
    });
    OutBlock::new(stmts)
}

fn lower_break(ctx: &mut TransformContext<'_>) -> Vec<OutStmt> {
    if ctx.loop_uses_continue_flag() {
        vec![
            OutStmt::Assignment { targets: vec![OutExpr::Identifier("__continue__".to_string())], values: vec![false_lit()] },
            OutStmt::Break,
        ]
    } else {
        vec![OutStmt::Break]
    }
}

/// C-style `for (init; cond; step)`. No native Lua counterpart (no
/// numeric-range proof is attempted here, see DESIGN.md), so it lowers to
/// the init statements followed by a `while` whose body is the loop body
/// plus the step expressions, sharing the same continue-flag wrapping as
/// every other loop kind.
fn lower_for(
    ctx: &mut TransformContext<'_>,
    init: &[InStmt],
    condition: Option<&InExpr>,
    step: &[InExpr],
    body: &InBlock,
) -> R<Vec<OutStmt>> {
    let mut out = Vec::new();
    for s in init {
        out.extend(lower_stmt(ctx, s)?);
    }
    let cond = match condition {
        Some(c) => lower_expr(ctx, c)?,
        None => true_lit(),
    };
    let uses_flag = body_has_continue(body);
    let lowered_body = ctx.with_loop_continue(uses_flag, |ctx| lower_block(ctx, body))?;
    let step_stmts: Vec<OutStmt> = step.iter().map(|e| lower_expr(ctx, e).map(OutStmt::ExprStmt)).collect::<R<Vec<_>>>()?;
    let wrapped = wrap_loop_body(lowered_body, step_stmts, uses_flag);
    out.push(OutStmt::While { condition: cond, body: wrapped });
    Ok(out)
}

/// `return`, rewritten to carry the `(true, value)` handled-marker pair
/// when lowering inside a try/using body that needs return propagation
/// (§4.E, §8 "Return propagation"); a plain `return` everywhere else.
fn lower_return(ctx: &mut TransformContext<'_>, value: Option<&InExpr>) -> R<OutStmt> {
    let lowered_value = value.map(|v| lower_expr(ctx, v)).transpose()?;
    // `ref`/`out` parameters have no Lua counterpart; every `return` in a
    // method that declared them carries their current value as additional
    // trailing multi-return results (§4.F "ref/out parameters").
    let ref_out_extra = ctx.current_method().map(|m| m.ref_out_params.clone()).unwrap_or_default();
    if ctx.in_return_wrap() {
        let mut values = vec![true_lit()];
        values.extend(lowered_value);
        values.extend(ref_out_extra.into_iter().map(OutExpr::Identifier));
        Ok(OutStmt::Return(values))
    } else {
        let mut values: Vec<OutExpr> = lowered_value.into_iter().collect();
        values.extend(ref_out_extra.into_iter().map(OutExpr::Identifier));
        Ok(OutStmt::Return(values))
    }
}

/// `throw expr;` → `System.throw(e)`; bare `throw;` inside a catch
/// rethrows that catch's bound exception local.
fn lower_throw(ctx: &mut TransformContext<'_>, value: Option<&InExpr>) -> R<OutStmt> {
    let arg = match value {
        Some(e) => lower_expr(ctx, e)?,
        None => {
            let name = ctx.current_catch_var().ok_or_else(|| {
                CompilationError::new(
                    ErrorCode::ContractViolation,
                    semantic::ParseSourceSpan::new(dummy_location(), dummy_location()),
                    "bare `throw;` outside a catch clause",
                )
            })?;
            OutExpr::Identifier(name.to_string())
        }
    };
    Ok(OutStmt::ExprStmt(OutExpr::Invocation {
        callee: Box::new(OutExpr::MemberAccess { receiver: Box::new(OutExpr::Identifier("System".to_string())), member: "throw".to_string(), is_colon_call: false }),
        arguments: vec![arg],
        span: None,
    }))
}

fn dummy_location() -> semantic::ParseLocation {
    semantic::ParseLocation::new(semantic::ParseSourceFile::new(String::new(), String::new()), 0, 0, 0)
}

/// Whether a `return` reachable from `block` without crossing a nested
/// closure boundary exists — drives both the call-site `local ok, v =
/// System.try(...); if ok then return v end` wrapping and the in-body
/// return-rewrite (§4.E, §8 property 4).
fn block_contains_return(block: &InBlock) -> bool {
    block.statements.iter().any(stmt_contains_return)
}

fn stmt_contains_return(stmt: &InStmt) -> bool {
    match &stmt.kind {
        StmtKind::Return(_) => true,
        StmtKind::If { then_branch, else_branch, .. } => {
            block_contains_return(then_branch) || else_branch.as_deref().map(stmt_contains_return).unwrap_or(false)
        }
        StmtKind::While { body, .. }
        | StmtKind::DoWhile { body, .. }
        | StmtKind::Foreach { body, .. }
        | StmtKind::Lock { body, .. }
        | StmtKind::Fixed { body, .. }
        | StmtKind::For { body, .. } => block_contains_return(body),
        StmtKind::Block(body) | StmtKind::Unsafe(body) => block_contains_return(body),
        StmtKind::Try { body, catches, finally } => {
            block_contains_return(body) || catches.iter().any(|c| block_contains_return(&c.body)) || finally.as_ref().map(block_contains_return).unwrap_or(false)
        }
        StmtKind::Using { body, .. } => block_contains_return(body),
        StmtKind::Switch { sections, .. } => sections.iter().any(|s| s.body.iter().any(stmt_contains_return)),
        StmtKind::Labeled { statement, .. } => stmt_contains_return(statement),
        _ => false,
    }
}

/// §4.E "Try/catch/finally". Builds the three closures and, when a
/// `return` is reachable from the protected region, the
/// `local ok, v = System.try(...); if ok then return v end` call-site
/// wrapper (§8 scenario: the worked `IOException` example).
fn lower_try(ctx: &mut TransformContext<'_>, body: &InBlock, catches: &[CatchClause], finally: Option<&InBlock>) -> R<Vec<OutStmt>> {
    let has_return = block_contains_return(body) || catches.iter().any(|c| block_contains_return(&c.body));

    let try_block = ctx.with_return_wrap(has_return, |ctx| lower_block(ctx, body))?;
    let try_fn = Box::new(FunctionBody { parameters: vec![], is_vararg: false, body: try_block });

    let catch_fn = if catches.is_empty() {
        None
    } else {
        Some(lower_catch_chain(ctx, catches, has_return)?)
    };

    let finally_fn = match finally {
        Some(f) => Some(Box::new(FunctionBody { parameters: vec![], is_vararg: false, body: lower_block(ctx, f)? })),
        None => None,
    };

    let result_var = if has_return { Some(ctx.fresh_temp()) } else { None };
    Ok(vec![OutStmt::TryAdapter { try_fn, catch_fn, finally_fn, result_var }])
}

/// The single `catchFn` closure: one independent `if System.is(e, T) [and
/// filter] then ... end` per typed clause (falling through to the next
/// check on mismatch), an unconditional bare clause as a trailing
/// else-equivalent, and — when no bare clause closes the chain — an
/// implicit final `return true, e` rethrow arm (§4.E, worked example).
fn lower_catch_chain(ctx: &mut TransformContext<'_>, catches: &[CatchClause], has_return: bool) -> R<Box<FunctionBody>> {
    let mut stmts = Vec::new();
    let mut has_unconditional = false;

    for clause in catches {
        let var_name = clause.binding.clone().unwrap_or_else(|| "e".to_string());
        let clause_body = ctx.with_catch_var(var_name.clone(), |ctx| {
            ctx.with_return_wrap(has_return, |ctx| lower_block(ctx, &clause.body))
        })?;
        let mut body_stmts = vec![OutStmt::LocalVarDecl { names: vec![var_name.clone()], values: vec![OutExpr::Identifier("e".to_string())] }];
        body_stmts.extend(clause_body.statements);
        if !ends_in_return(&body_stmts) {
            body_stmts.push(OutStmt::Return(vec![true_lit()]));
        }

        match (&clause.exception_type, &clause.filter) {
            (None, None) => {
                stmts.extend(body_stmts);
                has_unconditional = true;
                break;
            }
            (ty, filter) => {
                let mut condition = ty
                    .as_ref()
                    .map(|t| OutExpr::Invocation {
                        callee: Box::new(OutExpr::MemberAccess { receiver: Box::new(OutExpr::Identifier("System".to_string())), member: "is".to_string(), is_colon_call: false }),
                        arguments: vec![OutExpr::Identifier("e".to_string()), type_name_expr(t)],
                        span: None,
                    })
                    .unwrap_or_else(true_lit);
                if let Some(filter) = filter {
                    let filter_expr = ctx.with_catch_var(var_name.clone(), |ctx| lower_expr(ctx, filter))?;
                    condition = OutExpr::Binary { op: OutBinaryOp::And, left: Box::new(condition), right: Box::new(filter_expr), span: None };
                }
                stmts.push(OutStmt::If { arms: vec![IfArm { condition, body: OutBlock::new(body_stmts) }], else_block: None });
            }
        }
    }

    if !has_unconditional {
        stmts.push(OutStmt::Return(vec![true_lit(), OutExpr::Identifier("e".to_string())]));
    }

    Ok(Box::new(FunctionBody { parameters: vec!["e".to_string()], is_vararg: false, body: OutBlock::new(stmts) }))
}

fn ends_in_return(stmts: &[OutStmt]) -> bool {
    matches!(stmts.last(), Some(OutStmt::Return(_)))
}

/// §4.E "using": one resource uses `System.using(r, fn)`, several use
/// `System.usingX(fn, a, b, ...)`; both share the try/using return-
/// propagation contract.
fn lower_using(ctx: &mut TransformContext<'_>, resources: &[InStmt], body: &InBlock) -> R<Vec<OutStmt>> {
    let has_return = block_contains_return(body);

    let mut resource_exprs = Vec::new();
    let mut resource_names = Vec::new();
    for r in resources {
        match &r.kind {
            StmtKind::LocalDecl { names, initializer: Some(init), .. } if names.len() == 1 => {
                resource_names.push(names[0].clone());
                resource_exprs.push(lower_expr(ctx, init)?);
            }
            StmtKind::Expr(e) => {
                let name = ctx.fresh_temp();
                resource_names.push(name);
                resource_exprs.push(lower_expr(ctx, e)?);
            }
            _ => {
                return Err(CompilationError::new(
                    ErrorCode::ContractViolation,
                    r.span.clone(),
                    "using-resource must be a single-name local declaration or an expression",
                ))
            }
        }
    }

    let lowered_body = ctx.with_return_wrap(has_return, |ctx| lower_block(ctx, body))?;
    let body_fn = Box::new(FunctionBody { parameters: resource_names, is_vararg: false, body: lowered_body });
    let result_var = if has_return { Some(ctx.fresh_temp()) } else { None };
    Ok(vec![OutStmt::UsingAdapter { resources: resource_exprs, body_fn, result_var }])
}

/// §4.E "switch with goto case": rewritten into a chain of independent
/// `if`s over the selector, each additionally gated by a per-label flag
/// variable so `goto case X` can re-enter at `X` by setting its flag and
/// jumping back to the dispatch label (§4.E, §3 invariant 3 "Every
/// statement adapter for try/using/continue/goto-case expands to a valid
/// L-dst sequence under renderer B alone").
fn lower_switch(ctx: &mut TransformContext<'_>, subject: &InExpr, sections: &[SwitchSection]) -> R<Vec<OutStmt>> {
    let selector_temp = ctx.fresh_temp();
    let selector_value = lower_expr(ctx, subject)?;

    let mut goto_targets: std::collections::HashSet<String> = std::collections::HashSet::new();
    for section in sections {
        if let Some(target) = &section.goto_case {
            goto_targets.insert(goto_case_flag_name(target));
        }
    }

    let dispatch_label = "__switch_dispatch__".to_string();
    let mut out = vec![OutStmt::LocalVarDecl { names: vec![selector_temp.clone()], values: vec![selector_value] }];
    for flag in &goto_targets {
        out.push(OutStmt::LocalVarDecl { names: vec![flag.clone()], values: vec![false_lit()] });
    }
    out.push(OutStmt::Labeled(dispatch_label.clone()));

    let mut arms = Vec::new();
    let mut else_block = None;
    for section in sections {
        let mut body = Vec::new();
        for s in &section.body {
            // A bare trailing `break;` just exits the switch, which the
            // if/elseif/else form already does by falling off the branch
            // end — so it lowers to nothing rather than a loop-break.
            if matches!(s.kind, StmtKind::Break) {
                continue;
            }
            body.extend(lower_stmt(ctx, s)?);
        }
        if let Some(target) = &section.goto_case {
            let flag = goto_case_flag_name(target);
            body.push(OutStmt::GotoCaseAdapter { flag_name: flag, label: dispatch_label.clone() });
        }

        if section.labels.iter().any(|l| l.is_none()) {
            else_block = Some(OutBlock::new(body));
            continue;
        }

        let mut condition: Option<OutExpr> = None;
        for label in &section.labels {
            let Some(value) = label else { continue };
            let check = OutExpr::Binary {
                op: OutBinaryOp::Eq,
                left: Box::new(OutExpr::Identifier(selector_temp.clone())),
                right: Box::new(const_to_expr(value)),
                span: None,
            };
            condition = Some(match condition {
                Some(c) => OutExpr::Binary { op: OutBinaryOp::Or, left: Box::new(c), right: Box::new(check), span: None },
                None => check,
            });
        }
        let section_key = section.labels.first().cloned().flatten();
        let flag_check = section_key
            .map(|v| goto_case_flag_name(&GotoCaseTarget::Case(v)))
            .filter(|name| goto_targets.contains(name));
        let full_condition = match (condition, flag_check) {
            (Some(c), Some(flag)) => OutExpr::Binary { op: OutBinaryOp::Or, left: Box::new(c), right: Box::new(OutExpr::Identifier(flag)), span: None },
            (Some(c), None) => c,
            (None, Some(flag)) => OutExpr::Identifier(flag),
            (None, None) => false_lit(),
        };
        arms.push(IfArm { condition: full_condition, body: OutBlock::new(body) });
    }

    if arms.is_empty() {
        if let Some(else_block) = else_block {
            out.push(OutStmt::Do(else_block));
        }
    } else {
        out.push(OutStmt::If { arms, else_block });
    }
    Ok(out)
}

fn goto_case_flag_name(target: &GotoCaseTarget) -> String {
    match target {
        GotoCaseTarget::Case(value) => format!("__goto_case_{}", const_key(value)),
        GotoCaseTarget::Default => "__goto_case_default".to_string(),
    }
}

fn const_key(value: &semantic::types::ConstantValue) -> String {
    use semantic::types::ConstantValue;
    match value {
        ConstantValue::Null => "null".to_string(),
        ConstantValue::Bool(b) => b.to_string(),
        ConstantValue::Char(c) => (*c as u32).to_string(),
        ConstantValue::Int(i) => i.to_string(),
        ConstantValue::UInt(u) => u.to_string(),
        ConstantValue::Float(f) => f.to_bits().to_string(),
        ConstantValue::String(s) => {
            use std::collections::hash_map::DefaultHasher;
            use std::hash::{Hash, Hasher};
            let mut hasher = DefaultHasher::new();
            s.hash(&mut hasher);
            hasher.finish().to_string()
        }
    }
}

/// Re-exported so [`crate::transform::decl`] can lower an explicit `:
/// base(args)` / `: this(args)` constructor initializer without
/// duplicating argument-lowering logic.
pub fn lower_ctor_initializer_target(target: ConstructorInitializerTarget) -> &'static str {
    match target {
        ConstructorInitializerTarget::Base => "base",
        ConstructorInitializerTarget::This => "this",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn goto_case_flag_names_are_stable_per_constant() {
        let a = goto_case_flag_name(&GotoCaseTarget::Case(semantic::types::ConstantValue::Int(1)));
        let b = goto_case_flag_name(&GotoCaseTarget::Case(semantic::types::ConstantValue::Int(1)));
        let c = goto_case_flag_name(&GotoCaseTarget::Case(semantic::types::ConstantValue::Int(2)));
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn ends_in_return_detects_trailing_return() {
        assert!(ends_in_return(&[OutStmt::Return(vec![])]));
        assert!(!ends_in_return(&[OutStmt::Break]));
    }
}
