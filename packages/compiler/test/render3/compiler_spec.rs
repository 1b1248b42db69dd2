use angular_compiler::output_ast::{self as o, Expression, Statement};
use angular_compiler::render3::{
    compile_factory_function, compile_ng_module, compile_pipe_from_metadata, DepsOrInvalid,
    FactoryTarget, R3ConstructorFactoryMetadata, R3DependencyMetadata, R3FactoryMetadata,
    R3NgModuleMetadata, R3PipeMetadata, R3Reference, R3SelectorScopeMode,
};
use angular_compiler::injectable_compiler_2::{compile_injectable, R3InjectableMetadata};
use angular_compiler::ConstantPool;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reference(name: &str) -> R3Reference {
        R3Reference::new(*o::variable(name), *o::variable(name))
    }

    fn definition_keys(expr: &Expression) -> Vec<String> {
        match expr {
            Expression::InvokeFn(call) => match &call.args[0] {
                Expression::LiteralMap(map) => map.entries.iter().map(|e| e.key.clone()).collect(),
                other => panic!("expected a literal map, got {:?}", other),
            },
            other => panic!("expected a call, got {:?}", other),
        }
    }

    fn callee_name(expr: &Expression) -> String {
        match expr {
            Expression::InvokeFn(call) => match call.fn_.as_ref() {
                Expression::External(ext) => ext.value.name.clone().unwrap_or_default(),
                other => panic!("expected an external callee, got {:?}", other),
            },
            other => panic!("expected a call, got {:?}", other),
        }
    }

    #[test]
    fn should_compile_a_pipe_definition() {
        let compiled = compile_pipe_from_metadata(&R3PipeMetadata {
            name: "UpperPipe".to_string(),
            type_: reference("UpperPipe"),
            pipe_name: "upper".to_string(),
            pure: false,
        });
        assert_eq!(callee_name(&compiled.expression), "ɵɵdefinePipe");
        assert_eq!(definition_keys(&compiled.expression), vec!["name", "type", "pure"]);
        assert!(compiled.statements.is_empty());
    }

    #[test]
    fn should_compile_a_module_with_forward_declared_scope() {
        let compiled = compile_ng_module(&R3NgModuleMetadata {
            type_: reference("AppModule"),
            bootstrap: vec![],
            declarations: vec![reference("AppComponent")],
            imports: vec![],
            exports: vec![],
            selector_scope_mode: R3SelectorScopeMode::Inline,
            contains_forward_decls: true,
            schemas: None,
            id: None,
        });
        assert_eq!(definition_keys(&compiled.expression), vec!["type", "declarations"]);
        match &compiled.expression {
            Expression::InvokeFn(call) => match &call.args[0] {
                Expression::LiteralMap(map) => {
                    assert!(matches!(map.entries[1].value.as_ref(), Expression::Fn(_)))
                }
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn should_compile_a_constructor_factory() {
        let compiled = compile_factory_function(&R3FactoryMetadata::Constructor(
            R3ConstructorFactoryMetadata {
                name: "MyDir".to_string(),
                type_: reference("MyDir"),
                deps: Some(DepsOrInvalid::Valid(vec![R3DependencyMetadata {
                    token: Some(*o::variable("ElementRef")),
                    optional: true,
                    ..Default::default()
                }])),
                target: FactoryTarget::Directive,
            },
        ));
        match &compiled.expression {
            Expression::Fn(f) => {
                assert_eq!(f.name.as_deref(), Some("MyDir_Factory"));
                assert_eq!(f.params.len(), 1);
                assert!(matches!(f.statements[0], Statement::Return(_)));
            }
            other => panic!("expected a function, got {:?}", other),
        }
    }

    #[test]
    fn should_compile_an_injectable_using_a_value() {
        let compiled = compile_injectable(&R3InjectableMetadata {
            name: "Config".to_string(),
            type_: reference("Config"),
            provided_in: *o::literal("root"),
            use_class: None,
            use_factory: None,
            use_existing: None,
            use_value: Some(*o::literal(42.0)),
            deps: None,
        });
        assert_eq!(callee_name(&compiled.expression), "ɵɵdefineInjectable");
        assert_eq!(
            definition_keys(&compiled.expression),
            vec!["token", "factory", "providedIn"]
        );
    }

    #[test]
    fn should_not_share_single_use_literals() {
        let mut pool = ConstantPool::new();
        let first = pool.get_const_literal(*o::literal_arr(vec![*o::literal("a")]), false);
        assert!(pool.statements.is_empty());
        let second = pool.get_const_literal(*o::literal_arr(vec![*o::literal("a")]), false);
        assert_eq!(pool.statements.len(), 1);
        for placeholder in [first, second] {
            match placeholder {
                Expression::Fixup(fixup) => match fixup.resolved() {
                    Expression::ReadVar(var) => assert_eq!(var.name, "_c0"),
                    other => panic!("unexpected {:?}", other),
                },
                other => panic!("unexpected {:?}", other),
            }
        }
    }
}
