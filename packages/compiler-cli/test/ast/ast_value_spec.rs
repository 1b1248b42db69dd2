use angular_linker::linker::ast::AstHost;
use angular_linker::linker::ast_value::{AstObject, AstValue};
use angular_linker::linker::oxc::{OxcAstHost, OxcNode};
use angular_linker::compiler::output_ast as o;
use oxc_allocator::Allocator;
use oxc_ast::ast::Statement;
use oxc_parser::Parser;
use oxc_span::SourceType;

/// Parses `const value = <expression>;` and hands the initializer to `test`.
fn with_expression<R>(
    expression: &str,
    test: impl for<'a> FnOnce(&OxcAstHost<'a>, OxcNode<'a>) -> R,
) -> R {
    let code = format!("const value = {};", expression);
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, &code, SourceType::mjs()).parse();
    assert!(parsed.errors.is_empty(), "failed to parse {}", code);
    let init = match &parsed.program.body[0] {
        Statement::VariableDeclaration(declaration) => declaration.declarations[0]
            .init
            .as_ref()
            .expect("initializer"),
        other => panic!("unexpected statement {:?}", other),
    };
    let host = OxcAstHost::new(&code);
    test(&host, OxcNode::Expression(init))
}

const METADATA: &str = r#"{
    version: 1,
    name: 'pipe',
    pure: !0,
    missing: null,
    items: ['a', "b", `c`],
    nested: {x: 42, 'quoted-key': false},
    type: Foo,
    member: i0.core.Thing,
    factory: function () { return [Bar]; },
    arrow: () => Baz,
    call: forwardRef(() => Qux),
}"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    mod ast_object {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_read_scalars() {
            with_expression(METADATA, |host, node| {
                let obj = AstObject::parse(node, host).unwrap();
                assert_eq!(obj.get_number("version").unwrap(), 1.0);
                assert_eq!(obj.get_string("name").unwrap(), "pipe");
                assert!(obj.get_boolean("pure").unwrap());
                assert!(obj.get_value("missing").unwrap().is_null());
            });
        }

        #[test]
        fn should_keep_properties_in_source_order() {
            with_expression(METADATA, |host, node| {
                let obj = AstObject::parse(node, host).unwrap();
                let keys: Vec<&str> = obj.keys().collect();
                assert_eq!(
                    keys,
                    vec![
                        "version", "name", "pure", "missing", "items", "nested", "type", "member",
                        "factory", "arrow", "call"
                    ]
                );
                let nested = obj
                    .get_object("nested")
                    .unwrap()
                    .to_literal(|value| Ok(host.print_node(&value.expression)))
                    .unwrap();
                assert_eq!(
                    nested.into_iter().collect::<Vec<_>>(),
                    vec![
                        ("x".to_string(), "42".to_string()),
                        ("quoted-key".to_string(), "false".to_string())
                    ]
                );
            });
        }

        #[test]
        fn should_map_properties_by_key() {
            with_expression("{a: 'x', 'b-c': 2}", |host, node| {
                let obj = AstObject::parse(node, host).unwrap();
                let map = obj
                    .to_map(|value| Ok(host.print_node(&value.expression)))
                    .unwrap();
                assert_eq!(map.len(), 2);
                assert_eq!(map["a"], "'x'");
                assert_eq!(map["b-c"], "2");
            });
        }

        #[test]
        fn should_stop_mapping_at_the_first_error() {
            with_expression("{a: 1, b: 'two'}", |host, node| {
                let obj = AstObject::parse(node, host).unwrap();
                let error = obj.to_map(|value| value.get_number()).unwrap_err();
                assert_eq!(error.message, "Unsupported syntax, expected a numeric literal.");
            });
        }

        #[test]
        fn should_read_arrays_of_any_string_literal() {
            with_expression(METADATA, |host, node| {
                let obj = AstObject::parse(node, host).unwrap();
                let items = obj
                    .get_array("items")
                    .unwrap()
                    .iter()
                    .map(AstValue::get_string)
                    .collect::<Result<Vec<_>, _>>()
                    .unwrap();
                assert_eq!(items, vec!["a", "b", "c"]);
            });
        }

        #[test]
        fn should_report_missing_properties_against_the_object() {
            with_expression(METADATA, |host, node| {
                let obj = AstObject::parse(node, host).unwrap();
                let error = obj.get_string("selector").unwrap_err();
                assert_eq!(error.message, "Expected property 'selector' to be present.");
                assert_eq!(
                    host.get_range(&error.node).unwrap().start_pos,
                    "const value = ".len()
                );
            });
        }

        #[test]
        fn should_report_mismatched_types() {
            with_expression(METADATA, |host, node| {
                let obj = AstObject::parse(node, host).unwrap();
                assert_eq!(
                    obj.get_number("name").unwrap_err().message,
                    "Unsupported syntax, expected a numeric literal."
                );
                assert_eq!(
                    obj.get_string("version").unwrap_err().message,
                    "Unsupported syntax, expected a string literal."
                );
                assert_eq!(
                    obj.get_boolean("name").unwrap_err().message,
                    "Unsupported syntax, expected a boolean literal."
                );
                assert_eq!(
                    obj.get_object("items").unwrap_err().message,
                    "Unsupported syntax, expected an object literal."
                );
                assert_eq!(
                    obj.get_array("nested").unwrap_err().message,
                    "Unsupported syntax, expected an array literal."
                );
            });
        }

        #[test]
        fn should_refuse_non_literal_properties() {
            with_expression("{...rest}", |host, node| {
                assert_eq!(
                    AstObject::parse(node, host).unwrap_err().message,
                    "Unsupported syntax, expected a property assignment."
                );
            });
            with_expression("{[key]: 1}", |host, node| {
                assert_eq!(
                    AstObject::parse(node, host).unwrap_err().message,
                    "Unsupported syntax, expected a property name."
                );
            });
        }
    }

    mod ast_value {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_name_identifiers_and_member_accesses() {
            with_expression(METADATA, |host, node| {
                let obj = AstObject::parse(node, host).unwrap();
                assert_eq!(
                    obj.get_value("type").unwrap().get_symbol_name(),
                    Some("Foo".to_string())
                );
                assert_eq!(
                    obj.get_value("member").unwrap().get_symbol_name(),
                    Some("Thing".to_string())
                );
                assert_eq!(obj.get_value("items").unwrap().get_symbol_name(), None);
            });
        }

        #[test]
        fn should_read_function_return_values() {
            with_expression(METADATA, |host, node| {
                let obj = AstObject::parse(node, host).unwrap();
                let factory = obj.get_value("factory").unwrap();
                assert!(factory.is_function());
                let returned = factory.get_function_return_value().unwrap();
                assert_eq!(host.print_node(&returned.expression), "[Bar]");

                let arrow = obj.get_value("arrow").unwrap();
                assert_eq!(
                    host.print_node(&arrow.get_function_return_value().unwrap().expression),
                    "Baz"
                );
            });
        }

        #[test]
        fn should_refuse_function_bodies_without_a_single_return() {
            with_expression("function () { foo(); return 1; }", |host, node| {
                let value = AstValue::new(node, host);
                assert_eq!(
                    value.get_function_return_value().unwrap_err().message,
                    "Unsupported syntax, expected a function body with a single return statement."
                );
            });
            with_expression("42", |host, node| {
                assert_eq!(
                    AstValue::new(node, host)
                        .get_function_return_value()
                        .unwrap_err()
                        .message,
                    "Unsupported syntax, expected a function."
                );
            });
        }

        #[test]
        fn should_read_calls() {
            with_expression(METADATA, |host, node| {
                let obj = AstObject::parse(node, host).unwrap();
                let call = obj.get_value("call").unwrap();
                assert!(call.is_call_expression());
                assert_eq!(
                    call.get_callee().unwrap().get_symbol_name(),
                    Some("forwardRef".to_string())
                );
                assert_eq!(call.get_arguments().unwrap().len(), 1);
            });
        }

        #[test]
        fn should_unwrap_deferred_values_once() {
            with_expression(METADATA, |host, node| {
                let obj = AstObject::parse(node, host).unwrap();
                let deferred = obj.get_value("factory").unwrap().to_deferred().unwrap();
                assert!(deferred.is_deferred());
                assert!(deferred.value().is_array());

                let direct = obj.get_value("type").unwrap().to_deferred().unwrap();
                assert!(!direct.is_deferred());
                assert_eq!(direct.value().get_symbol_name(), Some("Foo".to_string()));
            });
        }

        #[test]
        fn should_round_trip_opaque_values_to_the_same_node() {
            with_expression(METADATA, |host, node| {
                let obj = AstObject::parse(node, host).unwrap();
                let opaque = obj.get_opaque("type").unwrap();
                let wrapped = match &opaque {
                    o::Expression::WrappedNode(wrapped) => wrapped,
                    other => panic!("unexpected {:?}", other),
                };
                let unwrapped = host.unwrap_node(wrapped).unwrap();
                assert_eq!(host.print_node(&unwrapped), "Foo");
                assert!(opaque.is_equivalent(&obj.get_opaque("type").unwrap()));
                assert!(!opaque.is_equivalent(&obj.get_opaque("arrow").unwrap()));
            });
        }

        #[test]
        fn should_compute_ranges() {
            with_expression("{\n  a: 'x',\n  b: [1]\n}", |host, node| {
                let obj = AstObject::parse(node, host).unwrap();
                let range = obj.get_value("b").unwrap().get_range().unwrap();
                assert_eq!(range.start_line, 2);
                assert_eq!(range.start_col, 5);
                assert_eq!(range.end_pos - range.start_pos, "[1]".len());
            });
        }
    }
}
