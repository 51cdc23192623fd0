mod support;

use compiler::output::ast::Stmt as OutStmt;
use compiler::transform::decl::{lower_compilation_unit, lower_type_decl};
use semantic::node::{
    ConstructorInitializer, ConstructorInitializerTarget, EventDecl, PropertyAccessor, PropertyDecl,
};
use semantic::symbol::{MethodFlags, OperatorKind};
use support::{block, empty_type_decl, method_symbol, with_ctx};

#[test]
fn single_constructor_has_no_overload_index() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Point");
        ty.constructors.push(support::ctor_decl(method_symbol("Point", vec![], false), None, block(vec![])));
        let out = lower_type_decl(ctx, &ty).unwrap();
        match &out.constructors[0] {
            OutStmt::ConstructorAdapter { overload_index, .. } => assert!(overload_index.is_none()),
            other => panic!("unexpected: {:?}", other),
        }
    });
}

#[test]
fn multiple_constructors_get_positional_overload_index() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Point");
        ty.constructors.push(support::ctor_decl(method_symbol("Point", vec![], false), None, block(vec![])));
        ty.constructors.push(support::ctor_decl(
            method_symbol("Point", vec![support::param("x", support::int_type(), semantic::symbol::ParameterModifier::NONE)], false),
            None,
            block(vec![]),
        ));
        let out = lower_type_decl(ctx, &ty).unwrap();
        match (&out.constructors[0], &out.constructors[1]) {
            (OutStmt::ConstructorAdapter { overload_index: Some(1), .. }, OutStmt::ConstructorAdapter { overload_index: Some(2), .. }) => {}
            other => panic!("unexpected: {:?}", other),
        }
    });
}

#[test]
fn multiple_constructors_prefer_resolved_overload_index() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Point");
        let mut sym = method_symbol("Point", vec![], false);
        sym.overload_index = Some(9);
        ty.constructors.push(support::ctor_decl(sym, None, block(vec![])));
        ty.constructors.push(support::ctor_decl(method_symbol("Point", vec![], false), None, block(vec![])));
        let out = lower_type_decl(ctx, &ty).unwrap();
        match &out.constructors[0] {
            OutStmt::ConstructorAdapter { overload_index: Some(9), .. } => {}
            other => panic!("unexpected: {:?}", other),
        }
    });
}

#[test]
fn implicit_base_call_synthesized_when_base_present() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Dog");
        ty.base_type = Some(support::named_type("Animal", semantic::types::TypeKind::Class));
        ty.constructors.push(support::ctor_decl(method_symbol("Dog", vec![], false), None, block(vec![])));
        let out = lower_type_decl(ctx, &ty).unwrap();
        match &out.constructors[0] {
            OutStmt::ConstructorAdapter { base_call: Some(_), .. } => {}
            other => panic!("unexpected: {:?}", other),
        }
    });
}

#[test]
fn no_base_call_when_deriving_directly_from_object() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Widget");
        ty.base_type = Some(support::named_type("Object", semantic::types::TypeKind::Class));
        ty.constructors.push(support::ctor_decl(method_symbol("Widget", vec![], false), None, block(vec![])));
        let out = lower_type_decl(ctx, &ty).unwrap();
        match &out.constructors[0] {
            OutStmt::ConstructorAdapter { base_call: None, .. } => {}
            other => panic!("unexpected: {:?}", other),
        }
    });
}

#[test]
fn explicit_this_initializer_resolves_sibling_by_arity() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Point");
        ty.constructors.push(support::ctor_decl(method_symbol("Point", vec![], false), None, block(vec![])));
        let init = ConstructorInitializer { target: ConstructorInitializerTarget::This, arguments: vec![] };
        ty.constructors.push(support::ctor_decl(
            method_symbol("Point", vec![support::param("x", support::int_type(), semantic::symbol::ParameterModifier::NONE)], false),
            Some(init),
            block(vec![]),
        ));
        let out = lower_type_decl(ctx, &ty).unwrap();
        match &out.constructors[1] {
            OutStmt::ConstructorAdapter { base_call: Some(call), .. } => {
                assert!(matches!(**call, compiler::output::ast::Expr::Invocation { .. }));
            }
            other => panic!("unexpected: {:?}", other),
        }
    });
}

#[test]
fn field_like_property_without_no_field_attribute_is_not_emitted_as_accessor() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Box");
        ty.properties.push(PropertyDecl { symbol: method_symbol("Value", vec![], false), accessor: PropertyAccessor::FieldLike, no_field_attribute: false });
        let out = lower_type_decl(ctx, &ty).unwrap();
        assert!(out.properties.is_empty());
    });
}

#[test]
fn no_field_attribute_forces_trivial_accessor_pair_and_backing_field() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Box");
        ty.properties.push(PropertyDecl { symbol: method_symbol("Value", vec![], false), accessor: PropertyAccessor::FieldLike, no_field_attribute: true });
        let out = lower_type_decl(ctx, &ty).unwrap();
        assert_eq!(out.properties.len(), 1);
        assert!(out.properties[0].getter.is_some());
        assert!(out.properties[0].setter.is_some());
        assert!(out.fields.iter().any(|f| f.name == "Value"));
    });
}

#[test]
fn virtual_event_is_not_field_like() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Button");
        let mut sym = method_symbol("Clicked", vec![], false);
        sym.method_flags = MethodFlags::VIRTUAL;
        ty.events.push(EventDecl { symbol: sym, accessor: PropertyAccessor::FieldLike });
        let out = lower_type_decl(ctx, &ty).unwrap();
        assert_eq!(out.events.len(), 1);
        assert!(out.events[0].getter.is_some());
    });
}

#[test]
fn operator_method_uses_runtime_name() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Vector");
        let mut sym = method_symbol("op_Addition", vec![support::param("other", support::int_type(), semantic::symbol::ParameterModifier::NONE)], true);
        sym.method_flags = MethodFlags::OPERATOR;
        sym.operator_kind = Some(OperatorKind::Addition);
        ty.methods.push(semantic::node::MethodDecl { symbol: sym, body: Some(block(vec![])), initializer: None });
        let out = lower_type_decl(ctx, &ty).unwrap();
        assert_eq!(out.methods[0].name, "op_Addition");
    });
}

#[test]
fn static_constructor_lowers_into_cctor_block() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Config");
        ty.static_constructor = Some(semantic::node::MethodDecl { symbol: method_symbol("__cctor__", vec![], true), body: Some(block(vec![])), initializer: None });
        let out = lower_type_decl(ctx, &ty).unwrap();
        assert!(out.static_constructor.is_some());
    });
}

#[test]
fn nested_types_recurse() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Outer");
        ty.nested_types.push(empty_type_decl("Inner"));
        let out = lower_type_decl(ctx, &ty).unwrap();
        assert_eq!(out.nested_types.len(), 1);
        // Nested-type names are qualified against the outer type so two
        // sibling nested types with the same bare name under different
        // outers never collide in the `System.define` registry.
        assert_eq!(out.nested_types[0].name, "Outer.Inner");
    });
}

#[test]
fn sibling_nested_types_under_different_outers_do_not_collide() {
    with_ctx(|ctx| {
        let mut a = empty_type_decl("A");
        a.nested_types.push(empty_type_decl("Inner"));
        let mut b = empty_type_decl("B");
        b.nested_types.push(empty_type_decl("Inner"));
        let out_a = lower_type_decl(ctx, &a).unwrap();
        let out_b = lower_type_decl(ctx, &b).unwrap();
        assert_ne!(out_a.nested_types[0].name, out_b.nested_types[0].name);
        assert_eq!(out_a.nested_types[0].name, "A.Inner");
        assert_eq!(out_b.nested_types[0].name, "B.Inner");
    });
}

#[test]
fn generic_type_name_gets_arity_suffix_not_angle_brackets() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("Box");
        ty.type_parameters = vec!["T".to_string()];
        let out = lower_type_decl(ctx, &ty).unwrap();
        assert_eq!(out.name, "Box_1");
    });
}

#[test]
fn generic_base_type_reference_gets_arity_suffix_not_angle_brackets() {
    with_ctx(|ctx| {
        let mut ty = empty_type_decl("IntBox");
        let base = semantic::types::TypeRef::Named {
            id: semantic::types::TypeId(5),
            name: "Box".to_string(),
            namespace: None,
            kind: semantic::types::TypeKind::Class,
            type_arguments: vec![support::int_type()],
        };
        ty.base_type = Some(base);
        let out = lower_type_decl(ctx, &ty).unwrap();
        assert_eq!(out.base_type.as_deref(), Some("Box_1"));
        assert!(!out.base_type.unwrap().contains('<'));
    });
}

#[test]
fn ignored_types_are_filtered_from_compilation_unit() {
    with_ctx(|ctx| {
        let kept = empty_type_decl("Kept");
        let mut skipped = empty_type_decl("Skipped");
        skipped.ignored = true;
        let unit = semantic::node::CompilationUnit {
            source_file: semantic::ParseSourceFile::new(String::new(), "t.cs".to_string()),
            namespace: None,
            types: vec![kept, skipped],
        };
        let module = lower_compilation_unit(ctx, &unit).unwrap();
        assert_eq!(module.declarations.len(), 1);
        match &module.declarations[0] {
            compiler::output::ast::Decl::Type(t) => assert_eq!(t.name, "Kept"),
            other => panic!("unexpected: {:?}", other),
        }
    });
}
