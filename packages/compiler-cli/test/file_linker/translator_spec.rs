use angular_linker::compiler::output_ast as o;
use angular_linker::linker::linker_import_generator::LinkerImportGenerator;
use angular_linker::linker::oxc::{JsCode, OxcAstFactory, OxcAstHost, OxcNode, Precedence};
use angular_linker::linker::translator::Translator;
use angular_linker::linker::AstHost;
use angular_linker::ngtsc::translator::TranslateError;
use oxc_allocator::Allocator;
use oxc_ast::ast::Statement;
use oxc_parser::Parser;
use oxc_span::SourceType;

fn ng_import<'a>() -> OxcNode<'a> {
    OxcNode::Code(JsCode::new("i0", Precedence::Primary))
}

fn translate_expression(expression: &o::Expression) -> Result<String, TranslateError> {
    let host = OxcAstHost::new("");
    let factory = OxcAstFactory::new("");
    let translator = Translator::new(&factory, &host);
    let imports = LinkerImportGenerator::new(ng_import());
    let node = translator.translate_expression(expression, &imports)?;
    Ok(host.print_node(&node))
}

fn translate_statement(statement: &o::Statement) -> Result<String, TranslateError> {
    let host = OxcAstHost::new("");
    let factory = OxcAstFactory::new("");
    let translator = Translator::new(&factory, &host);
    let imports = LinkerImportGenerator::new(ng_import());
    let node = translator.translate_statement(statement, &imports)?;
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn should_parenthesize_assignments_used_as_expressions() {
        let assignment = o::variable("foo").set(o::literal(42.0));
        assert_eq!(translate_expression(&assignment).unwrap(), "(foo=42)");
    }

    #[test]
    fn should_leave_assignment_statements_bare() {
        let statement = o::variable("foo").set(o::literal(42.0)).to_stmt();
        assert_eq!(translate_statement(&statement).unwrap(), "foo=42;");
    }

    #[test]
    fn should_declare_constants() {
        let statement = o::literal_arr(vec![*o::literal("a"), *o::literal("b")]).to_const_decl("_c0");
        assert_eq!(
            translate_statement(&statement).unwrap(),
            "const _c0=[\"a\",\"b\"];"
        );
    }

    #[test]
    fn should_read_core_symbols_off_ng_import() {
        let call = o::import_expr("@angular/core", "ɵɵdefinePipe").call_fn(vec![], true);
        assert_eq!(
            translate_expression(&call).unwrap(),
            "/*@__PURE__*/i0.ɵɵdefinePipe()"
        );
        let namespace = o::import_ref(o::ExternalReference {
            module_name: Some("@angular/core".to_string()),
            name: None,
        });
        assert_eq!(translate_expression(&namespace).unwrap(), "i0");
    }

    #[test]
    fn should_refuse_imports_from_other_modules() {
        let reference = o::import_expr("@angular/common", "NgIf");
        assert_eq!(
            translate_expression(&reference).unwrap_err(),
            TranslateError::UnsupportedImport {
                allowed: "@angular/core".to_string(),
                requested: "@angular/common".to_string(),
            }
        );
    }

    #[test]
    fn should_reference_globals_by_name() {
        let reference = o::import_ref(o::ExternalReference {
            module_name: None,
            name: Some("Object".to_string()),
        });
        assert_eq!(
            translate_expression(&reference.prop("freeze")).unwrap(),
            "Object.freeze"
        );
    }

    #[test]
    fn should_translate_wrapped_nodes_to_the_original_source() {
        let code = "const value = [Foo, bar.baz];";
        let allocator = Allocator::default();
        let parsed = Parser::new(&allocator, code, SourceType::mjs()).parse();
        let init = match &parsed.program.body[0] {
            Statement::VariableDeclaration(declaration) => {
                declaration.declarations[0].init.as_ref().unwrap()
            }
            other => panic!("unexpected statement {:?}", other),
        };
        let host = OxcAstHost::new(code);
        let factory = OxcAstFactory::new(code);
        let translator = Translator::new(&factory, &host);
        let imports = LinkerImportGenerator::new(ng_import());

        let wrapped = host.wrap_node(&OxcNode::Expression(init));
        let expression = o::Expression::WrappedNode(wrapped).prop("length");
        let node = translator.translate_expression(&expression, &imports).unwrap();
        assert_eq!(host.print_node(&node), "[Foo, bar.baz].length");
    }

    #[test]
    fn should_refuse_wrapped_nodes_of_another_host() {
        let code = "Foo;";
        let allocator = Allocator::default();
        let parsed = Parser::new(&allocator, code, SourceType::mjs()).parse();
        let expression = match &parsed.program.body[0] {
            Statement::ExpressionStatement(statement) => &statement.expression,
            other => panic!("unexpected statement {:?}", other),
        };
        let other_host = OxcAstHost::new(code);
        let wrapped = other_host.wrap_node(&OxcNode::Expression(expression));

        let host = OxcAstHost::new(code);
        let factory = OxcAstFactory::new(code);
        let translator = Translator::new(&factory, &host);
        let imports = LinkerImportGenerator::new(ng_import());
        assert_eq!(
            translator
                .translate_expression(&o::Expression::WrappedNode(wrapped), &imports)
                .unwrap_err(),
            TranslateError::UnresolvedWrappedNode
        );
    }
}
