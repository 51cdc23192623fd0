mod support;

use compiler::output::ast::Decl;
use compiler::output::renderer::Renderer;
use compiler::transform::decl::lower_type_decl;
use compiler::EmitConfig;
use semantic::node::{
    CatchClause, ConstructorInitializer, ConstructorInitializerTarget, ExprKind, InterpolationPart, Literal, StmtKind,
};
use semantic::types::TypeKind;
use support::{block, empty_type_decl, ident, int_lit, int_type, method_symbol, named_type, stmt, with_ctx};

fn render_type(ctx: &mut compiler::TransformContext<'_>, ty: &semantic::node::TypeDecl) -> String {
    let out = lower_type_decl(ctx, ty).unwrap();
    let module = compiler::output::ast::Module { declarations: vec![Decl::Type(out)], top_level: vec![] };
    Renderer::render_module(&EmitConfig::default(), &module)
}

#[test]
fn conditional_access_chain_guards_each_link_with_nil_check() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Program");
        let recv = ident("maybeWidget", int_type());
        let access = support::expr(
            ExprKind::ConditionalMemberAccess { receiver: Box::new(recv), member: "Name".to_string(), is_invocation: false, arguments: vec![] },
            int_type(),
        );
        let body = block(vec![stmt(StmtKind::Return(Some(access)))]);
        ty.methods.push(semantic::node::MethodDecl {
            symbol: method_symbol("GetName", vec![], false),
            body: Some(body),
            initializer: None,
        });
        let out = render_type(ctx, &ty);
        assert!(out.contains("~= nil then"));
        assert!(out.contains(".Name"));
    });
}

#[test]
fn try_catch_return_propagates_through_result_var() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Program");
        let try_body = block(vec![stmt(StmtKind::Return(Some(int_lit(1))))]);
        let catch = CatchClause {
            exception_type: Some(named_type("IOException", TypeKind::Class)),
            binding: Some("ex".to_string()),
            filter: None,
            body: block(vec![stmt(StmtKind::Return(Some(int_lit(0))))]),
        };
        let body = block(vec![stmt(StmtKind::Try { body: try_body, catches: vec![catch], finally: None })]);
        ty.methods.push(semantic::node::MethodDecl { symbol: method_symbol("Run", vec![], false), body: Some(body), initializer: None });
        let out = render_type(ctx, &ty);
        assert!(out.contains("System.try("));
        assert!(out.contains("if ok then return "));
    });
}

#[test]
fn constructor_overload_dispatch_via_this_initializer() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Point");
        ty.constructors.push(support::ctor_decl(method_symbol("Point", vec![], false), None, block(vec![])));
        let init = ConstructorInitializer { target: ConstructorInitializerTarget::This, arguments: vec![] };
        let param = support::param("x", int_type(), semantic::symbol::ParameterModifier::NONE);
        ty.constructors.push(support::ctor_decl(method_symbol("Point", vec![param], false), Some(init), block(vec![])));
        let out = render_type(ctx, &ty);
        assert!(out.contains("__ctor__ = {"));
        assert!(out.contains("Point.__ctor__[1](this)"));
    });
}

#[test]
fn foreach_with_continue_wraps_body_in_continue_flag() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Program");
        let source = ident("items", int_type());
        let loop_body = block(vec![stmt(StmtKind::Continue)]);
        let foreach = stmt(StmtKind::Foreach { variable: "item".to_string(), variable_type: int_type(), source, body: loop_body });
        let body = block(vec![foreach]);
        ty.methods.push(semantic::node::MethodDecl { symbol: method_symbol("Run", vec![], false), body: Some(body), initializer: None });
        let out = render_type(ctx, &ty);
        assert!(out.contains("for _, item in System.each(items) do"));
        assert!(out.contains("__continue__"));
    });
}

#[test]
fn tuple_assignment_flattens_to_parallel_assignment_statement() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Program");
        let target = support::expr(ExprKind::TupleLiteral(vec![ident("a", int_type()), ident("b", int_type())]), int_type());
        let value = support::expr(ExprKind::TupleLiteral(vec![int_lit(1), int_lit(2)]), int_type());
        let assign = support::expr(ExprKind::Assign { target: Box::new(target), value: Box::new(value) }, int_type());
        let body = block(vec![stmt(StmtKind::Expr(assign))]);
        ty.methods.push(semantic::node::MethodDecl { symbol: method_symbol("Run", vec![], false), body: Some(body), initializer: None });
        let out = render_type(ctx, &ty);
        assert!(out.contains("a, b = 1, 2"));
    });
}

#[test]
fn string_interpolation_renders_format_call_over_parenthesized_template() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Program");
        let parts = vec![InterpolationPart::Text("hi ".to_string()), InterpolationPart::Hole(Box::new(ident("name", int_type())))];
        let expr = support::expr(ExprKind::StringInterpolation(parts), int_type());
        let body = block(vec![stmt(StmtKind::Return(Some(expr)))]);
        ty.methods.push(semantic::node::MethodDecl { symbol: method_symbol("Greet", vec![], false), body: Some(body), initializer: None });
        let out = render_type(ctx, &ty);
        assert!(out.contains("):format(name)"));
        assert!(out.contains("hi {0}"));
    });
}

#[test]
fn literal_default_and_null_coalesce_compose_in_one_expression() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Program");
        let lhs = support::expr(ExprKind::Literal(Literal::Null), int_type());
        let rhs = int_lit(5);
        let binary = support::expr(ExprKind::Binary { op: semantic::node::BinaryOp::NullCoalesce, left: Box::new(lhs), right: Box::new(rhs) }, int_type());
        let body = block(vec![stmt(StmtKind::Return(Some(binary)))]);
        ty.methods.push(semantic::node::MethodDecl { symbol: method_symbol("Pick", vec![], false), body: Some(body), initializer: None });
        let out = render_type(ctx, &ty);
        assert!(out.contains("nil or 5"));
    });
}
