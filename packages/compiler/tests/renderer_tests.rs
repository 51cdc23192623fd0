mod support;

use compiler::output::ast::*;
use compiler::output::renderer::Renderer;
use compiler::EmitConfig;

fn render(module: &Module) -> String {
    Renderer::render_module(&EmitConfig::default(), module)
}

#[test]
fn renders_empty_type_with_no_base() {
    let ty = TypeDeclaration {
        name: "Point".to_string(),
        type_parameter_count: 0,
        base_type: None,
        interfaces: vec![],
        fields: vec![],
        methods: vec![],
        constructors: vec![],
        static_constructor: None,
        properties: vec![],
        events: vec![],
        nested_types: vec![],
    };
    let module = Module { declarations: vec![Decl::Type(ty)], top_level: vec![] };
    let out = render(&module);
    assert!(out.contains("System.define(\"Point\", function()"));
    assert!(out.contains("end)"));
    assert!(!out.contains("base ="));
}

#[test]
fn renders_base_and_interfaces() {
    let ty = TypeDeclaration {
        name: "Dog".to_string(),
        type_parameter_count: 0,
        base_type: Some("Animal".to_string()),
        interfaces: vec!["IComparable".to_string(), "IDisposable".to_string()],
        fields: vec![],
        methods: vec![],
        constructors: vec![],
        static_constructor: None,
        properties: vec![],
        events: vec![],
        nested_types: vec![],
    };
    let module = Module { declarations: vec![Decl::Type(ty)], top_level: vec![] };
    let out = render(&module);
    assert!(out.contains("base = Animal,"));
    assert!(out.contains("interfaces = {IComparable, IDisposable},"));
}

#[test]
fn renders_single_constructor_as_bare_function() {
    let ctor = Stmt::ConstructorAdapter {
        overload_index: None,
        parameters: vec!["this".to_string(), "x".to_string()],
        base_call: None,
        body: Block::new(vec![Stmt::Assignment {
            targets: vec![Expr::MemberAccess { receiver: Box::new(Expr::Identifier("this".to_string())), member: "x".to_string(), is_colon_call: false }],
            values: vec![Expr::Identifier("x".to_string())],
        }]),
    };
    let ty = TypeDeclaration {
        name: "Point".to_string(),
        type_parameter_count: 0,
        base_type: None,
        interfaces: vec![],
        fields: vec![],
        methods: vec![],
        constructors: vec![ctor],
        static_constructor: None,
        properties: vec![],
        events: vec![],
        nested_types: vec![],
    };
    let module = Module { declarations: vec![Decl::Type(ty)], top_level: vec![] };
    let out = render(&module);
    assert!(out.contains("__ctor__ = function(this, x)"));
    assert!(out.contains("this.x = x"));
}

#[test]
fn renders_multiple_constructors_as_array() {
    let make = |params: Vec<&str>| Stmt::ConstructorAdapter {
        overload_index: Some(1),
        parameters: params.into_iter().map(String::from).collect(),
        base_call: None,
        body: Block::new(vec![]),
    };
    let ty = TypeDeclaration {
        name: "Point".to_string(),
        type_parameter_count: 0,
        base_type: None,
        interfaces: vec![],
        fields: vec![],
        methods: vec![],
        constructors: vec![make(vec!["this"]), make(vec!["this", "x", "y"])],
        static_constructor: None,
        properties: vec![],
        events: vec![],
        nested_types: vec![],
    };
    let module = Module { declarations: vec![Decl::Type(ty)], top_level: vec![] };
    let out = render(&module);
    assert!(out.contains("__ctor__ = {"));
    assert!(out.contains("function(this)"));
    assert!(out.contains("function(this, x, y)"));
}

#[test]
fn renders_static_constructor_as_cctor() {
    let ty = TypeDeclaration {
        name: "Config".to_string(),
        type_parameter_count: 0,
        base_type: None,
        interfaces: vec![],
        fields: vec![],
        methods: vec![],
        constructors: vec![],
        static_constructor: Some(Block::new(vec![Stmt::Assignment {
            targets: vec![Expr::Identifier("Default".to_string())],
            values: vec![Expr::Literal(Literal::Number("1".to_string()))],
        }])),
        properties: vec![],
        events: vec![],
        nested_types: vec![],
    };
    let module = Module { declarations: vec![Decl::Type(ty)], top_level: vec![] };
    let out = render(&module);
    assert!(out.contains("__cctor__ = function()"));
}

#[test]
fn renders_property_get_set_pair() {
    let ty = TypeDeclaration {
        name: "Box".to_string(),
        type_parameter_count: 0,
        base_type: None,
        interfaces: vec![],
        fields: vec![],
        methods: vec![],
        constructors: vec![],
        static_constructor: None,
        properties: vec![PropertyDecl {
            name: "Value".to_string(),
            getter: Some(Block::new(vec![Stmt::Return(vec![Expr::MemberAccess {
                receiver: Box::new(Expr::Identifier("this".to_string())),
                member: "Value".to_string(),
                is_colon_call: false,
            }])])),
            setter: Some(Block::new(vec![Stmt::Assignment {
                targets: vec![Expr::MemberAccess { receiver: Box::new(Expr::Identifier("this".to_string())), member: "Value".to_string(), is_colon_call: false }],
                values: vec![Expr::Identifier("value".to_string())],
            }])),
        }],
        events: vec![],
        nested_types: vec![],
    };
    let module = Module { declarations: vec![Decl::Type(ty)], top_level: vec![] };
    let out = render(&module);
    assert!(out.contains("get_Value = function(this)"));
    assert!(out.contains("set_Value = function(this, value)"));
}

#[test]
fn try_adapter_renders_result_var_guard() {
    let try_fn = FunctionBody { parameters: vec![], is_vararg: false, body: Block::new(vec![Stmt::Return(vec![Expr::Literal(Literal::Number("1".to_string()))])]) };
    let stmt = Stmt::TryAdapter {
        try_fn: Box::new(try_fn),
        catch_fn: None,
        finally_fn: None,
        result_var: Some("__t1".to_string()),
    };
    let module = Module { declarations: vec![], top_level: vec![stmt] };
    let out = render(&module);
    assert!(out.contains("local ok, __t1 = System.try("));
    assert!(out.contains("if ok then return __t1 end"));
}

#[test]
fn classic_dialect_emits_runtime_call_for_floor_div() {
    let config = EmitConfig { classic_dialect: true, ..EmitConfig::default() };
    let expr = Expr::Binary {
        op: BinaryOp::FloorDiv,
        left: Box::new(Expr::Identifier("a".to_string())),
        right: Box::new(Expr::Identifier("b".to_string())),
        span: None,
    };
    let module = Module { declarations: vec![], top_level: vec![Stmt::ExprStmt(expr)] };
    let out = Renderer::render_module(&config, &module);
    assert!(out.contains("System.idiv(a, b)"));
}

#[test]
fn rendering_is_deterministic_across_calls() {
    let ty = TypeDeclaration {
        name: "Repeatable".to_string(),
        type_parameter_count: 0,
        base_type: None,
        interfaces: vec![],
        fields: vec![FieldDecl { name: "count".to_string(), initializer: None, is_static: false }],
        methods: vec![],
        constructors: vec![],
        static_constructor: None,
        properties: vec![],
        events: vec![],
        nested_types: vec![],
    };
    let module = Module { declarations: vec![Decl::Type(ty)], top_level: vec![] };
    let a = render(&module);
    let b = render(&module);
    assert_eq!(a, b);
}
