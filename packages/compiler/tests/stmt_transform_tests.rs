mod support;

use compiler::output::ast::Stmt as OutStmt;
use compiler::transform::stmt::lower_block;
use semantic::node::{Block as InBlock, ExprKind, StmtKind};
use support::{block, ident, int_lit, int_type, span, stmt, with_ctx};

#[test]
fn tuple_assignment_flattens_to_multi_assign() {
    with_ctx(|ctx| {
        let target = support::expr(ExprKind::TupleLiteral(vec![ident("a", int_type()), ident("b", int_type())]), int_type());
        let value = support::expr(ExprKind::TupleLiteral(vec![int_lit(1), int_lit(2)]), int_type());
        let assign = support::expr(ExprKind::Assign { target: Box::new(target), value: Box::new(value) }, int_type());
        let b = block(vec![stmt(StmtKind::Expr(assign))]);
        let out = lower_block(ctx, &b).unwrap();
        assert_eq!(out.statements.len(), 1);
        match &out.statements[0] {
            OutStmt::Assignment { targets, values } => {
                assert_eq!(targets.len(), 2);
                assert_eq!(values.len(), 2);
            }
            other => panic!("unexpected: {:?}", other),
        }
    });
}

#[test]
fn foreach_lowers_to_generic_for_over_system_each() {
    with_ctx(|ctx| {
        let source = ident("items", int_type());
        let body = InBlock { statements: vec![], span: span() };
        let s = stmt(StmtKind::Foreach { variable: "item".to_string(), variable_type: int_type(), source, body });
        let out = lower_block(ctx, &block(vec![s])).unwrap();
        assert_eq!(out.statements.len(), 1);
        match &out.statements[0] {
            OutStmt::GenericFor { vars, exprs, .. } => {
                assert_eq!(vars, &vec!["_".to_string(), "item".to_string()]);
                assert_eq!(exprs.len(), 1);
            }
            other => panic!("unexpected: {:?}", other),
        }
    });
}

#[test]
fn continue_inside_while_uses_flag_wrapping() {
    with_ctx(|ctx| {
        let body = InBlock { statements: vec![stmt(StmtKind::Continue)], span: span() };
        let s = stmt(StmtKind::While { condition: support::expr(ExprKind::Literal(semantic::node::Literal::Bool(true)), int_type()), body });
        let out = lower_block(ctx, &block(vec![s])).unwrap();
        match &out.statements[0] {
            OutStmt::While { body, .. } => {
                let has_continue_decl = body.statements.iter().any(|s| matches!(s, OutStmt::LocalVarDecl { names, .. } if names == &vec!["__continue__".to_string()]));
                assert!(has_continue_decl);
            }
            other => panic!("unexpected: {:?}", other),
        }
    });
}

#[test]
fn plain_while_without_continue_has_no_flag() {
    with_ctx(|ctx| {
        let body = InBlock { statements: vec![], span: span() };
        let s = stmt(StmtKind::While { condition: support::expr(ExprKind::Literal(semantic::node::Literal::Bool(true)), int_type()), body });
        let out = lower_block(ctx, &block(vec![s])).unwrap();
        match &out.statements[0] {
            OutStmt::While { body, .. } => {
                assert!(body.statements.is_empty());
            }
            other => panic!("unexpected: {:?}", other),
        }
    });
}

#[test]
fn try_with_return_gets_result_var_and_wrapping() {
    with_ctx(|ctx| {
        let try_body = InBlock { statements: vec![stmt(StmtKind::Return(Some(int_lit(1))))], span: span() };
        let s = stmt(StmtKind::Try { body: try_body, catches: vec![], finally: None });
        let out = lower_block(ctx, &block(vec![s])).unwrap();
        match &out.statements[0] {
            OutStmt::TryAdapter { result_var, catch_fn, .. } => {
                assert!(result_var.is_some());
                assert!(catch_fn.is_none());
            }
            other => panic!("unexpected: {:?}", other),
        }
    });
}

#[test]
fn try_without_return_has_no_result_var() {
    with_ctx(|ctx| {
        let try_body = InBlock { statements: vec![stmt(StmtKind::Expr(int_lit(1)))], span: span() };
        let s = stmt(StmtKind::Try { body: try_body, catches: vec![], finally: None });
        let out = lower_block(ctx, &block(vec![s])).unwrap();
        match &out.statements[0] {
            OutStmt::TryAdapter { result_var, .. } => assert!(result_var.is_none()),
            other => panic!("unexpected: {:?}", other),
        }
    });
}

#[test]
fn catch_clause_binds_local_and_checks_type_with_system_is() {
    with_ctx(|ctx| {
        let ty = support::named_type("IOException", semantic::types::TypeKind::Class);
        let catch = semantic::node::CatchClause {
            exception_type: Some(ty),
            binding: Some("ex".to_string()),
            filter: None,
            body: InBlock { statements: vec![], span: span() },
        };
        let try_body = InBlock { statements: vec![], span: span() };
        let s = stmt(StmtKind::Try { body: try_body, catches: vec![catch], finally: None });
        let out = lower_block(ctx, &block(vec![s])).unwrap();
        match &out.statements[0] {
            OutStmt::TryAdapter { catch_fn, .. } => {
                let f = catch_fn.as_ref().unwrap();
                assert_eq!(f.parameters, vec!["e".to_string()]);
                let has_if = f.body.statements.iter().any(|s| matches!(s, OutStmt::If { .. }));
                assert!(has_if);
            }
            other => panic!("unexpected: {:?}", other),
        }
    });
}

#[test]
fn do_while_negates_condition_for_repeat_until() {
    with_ctx(|ctx| {
        let body = InBlock { statements: vec![], span: span() };
        let s = stmt(StmtKind::DoWhile { condition: ident("keepGoing", int_type()), body });
        let out = lower_block(ctx, &block(vec![s])).unwrap();
        match &out.statements[0] {
            OutStmt::RepeatUntil { condition, .. } => {
                assert!(matches!(condition, compiler::output::ast::Expr::Unary { op: compiler::output::ast::UnaryOp::Not, .. }));
            }
            other => panic!("unexpected: {:?}", other),
        }
    });
}

#[test]
fn conditional_access_as_bare_statement_emits_only_guard_no_trailing_identifier() {
    with_ctx(|ctx| {
        let recv = ident("a", int_type());
        let chain = support::expr(
            ExprKind::ConditionalMemberAccess { receiver: Box::new(recv), member: "b".to_string(), is_invocation: true, arguments: vec![] },
            int_type(),
        );
        let out = lower_block(ctx, &block(vec![stmt(StmtKind::Expr(chain))])).unwrap();
        // The guard `if ... ~= nil then ... end` prelude is the only
        // observable effect; Lua has no bare-identifier statement form, so
        // the trailing `__tN` the expression would otherwise evaluate to
        // must never surface as its own `ExprStmt`.
        assert!(out.statements.iter().any(|s| matches!(s, OutStmt::If { .. })));
        assert!(!out.statements.iter().any(|s| matches!(s, OutStmt::ExprStmt(compiler::output::ast::Expr::Identifier(_)))));
    });
}

#[test]
fn local_function_names_are_predeclared_for_mutual_recursion() {
    with_ctx(|ctx| {
        let sym = support::method_symbol("isEven", vec![], false);
        let local_fn = stmt(StmtKind::LocalFunction { symbol: sym, parameters: vec![], body: InBlock { statements: vec![], span: span() } });
        let out = lower_block(ctx, &block(vec![local_fn])).unwrap();
        match &out.statements[0] {
            OutStmt::LocalVarDecl { names, values } => {
                assert_eq!(names, &vec!["isEven".to_string()]);
                assert!(values.is_empty());
            }
            other => panic!("unexpected: {:?}", other),
        }
    });
}
