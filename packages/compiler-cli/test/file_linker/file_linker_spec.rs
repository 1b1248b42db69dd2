use angular_linker::linker::constant_scope_registry::{
    ConstantScopeId, ConstantScopeRegistry, DeclarationScope, UNSUPPORTED_BINDING_LOCATION,
};
use angular_linker::linker::error::FatalLinkerError;
use angular_linker::linker::file_linker::{needs_linking, FileLinker};
use angular_linker::linker::linker_environment::LinkerEnvironment;
use angular_linker::linker::linker_options::LinkerOptions;
use angular_linker::linker::oxc::{OxcAstFactory, OxcAstHost, OxcBindingResolver, OxcNode};
use angular_linker::linker::AstHost;
use angular_linker::ngtsc::logging::NullLogger;
use oxc_allocator::Allocator;
use oxc_ast::ast::{Expression, Statement};
use oxc_ast::AstKind;
use oxc_parser::Parser;
use oxc_semantic::SemanticBuilder;
use oxc_span::SourceType;

/// Declarations keep their constants to themselves.
struct NoSharedScope;

impl<T> DeclarationScope<T> for NoSharedScope {
    fn get_constant_scope_ref(
        &mut self,
        _expression: &T,
    ) -> Result<Option<ConstantScopeId>, FatalLinkerError<T>> {
        Ok(None)
    }
}

/// Every declaration shares one scope.
struct SingleSharedScope;

impl<T> DeclarationScope<T> for SingleSharedScope {
    fn get_constant_scope_ref(
        &mut self,
        _expression: &T,
    ) -> Result<Option<ConstantScopeId>, FatalLinkerError<T>> {
        Ok(Some(ConstantScopeId(0)))
    }
}

#[derive(Debug, Clone, Copy)]
enum Scoping {
    Local,
    Shared,
}

#[derive(Debug, Default)]
struct Linked {
    expressions: Vec<String>,
    constants: Vec<String>,
}

/// Links every top-level `callee(...)` statement of `code`, in order.
fn link_statements(code: &str, scoping: Scoping) -> Result<Linked, String> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, code, SourceType::mjs()).parse();
    assert!(parsed.errors.is_empty(), "failed to parse {}", code);

    let host = OxcAstHost::new(code);
    let factory = OxcAstFactory::new(code);
    let environment = LinkerEnvironment::create(
        &host,
        &factory,
        Box::new(NullLogger::new()),
        LinkerOptions::default(),
    );
    let mut file_linker = FileLinker::new(&environment, "/app/lib.mjs", code);

    let mut linked = Linked::default();
    for statement in &parsed.program.body {
        let Statement::ExpressionStatement(statement) = statement else {
            continue;
        };
        let Expression::CallExpression(call) = &statement.expression else {
            continue;
        };
        let name = match &call.callee {
            Expression::Identifier(identifier) => identifier.name.as_str(),
            Expression::StaticMemberExpression(member) => member.property.name.as_str(),
            _ => continue,
        };
        let args: Vec<OxcNode> = call
            .arguments
            .iter()
            .filter_map(|argument| argument.as_expression())
            .map(OxcNode::Expression)
            .collect();
        let result = match scoping {
            Scoping::Local => file_linker.link_partial_declaration(name, &args, &mut NoSharedScope),
            Scoping::Shared => {
                file_linker.link_partial_declaration(name, &args, &mut SingleSharedScope)
            }
        };
        let expression = result.map_err(|error| error.to_string())?;
        linked.expressions.push(host.print_node(&expression));
    }

    for (_, statements) in file_linker
        .get_constant_statements()
        .map_err(|error| error.to_string())?
    {
        linked.constants.extend(statements);
    }
    Ok(linked)
}

/// Looks up the constant scope of the argument of every `scope(...)` call, in source order,
/// through one registry.
fn scope_refs(code: &str) -> Vec<Result<Option<ConstantScopeId>, String>> {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, code, SourceType::mjs()).parse();
    assert!(parsed.errors.is_empty(), "failed to parse {}", code);
    let semantic = SemanticBuilder::new().build(&parsed.program).semantic;

    let host = OxcAstHost::new(code);
    let mut registry = ConstantScopeRegistry::new(&host, OxcBindingResolver::new(&semantic));
    semantic
        .nodes()
        .iter()
        .filter_map(|node| match node.kind() {
            AstKind::CallExpression(call)
                if matches!(&call.callee, Expression::Identifier(callee) if callee.name.as_str() == "scope") =>
            {
                call.arguments[0].as_expression()
            }
            _ => None,
        })
        .map(|argument| {
            registry
                .get_constant_scope_ref(&OxcNode::Expression(argument))
                .map_err(|error| error.message)
        })
        .collect()
}

fn link_error(code: &str) -> String {
    link_statements(code, Scoping::Shared).unwrap_err()
}

fn directive_with_query(name: &str, predicate: &str) -> String {
    format!(
        "i0.ɵɵngDeclareDirective({{version: 1, ngImport: i0, type: {}, viewQueries: [{{propertyName: 'q', predicate: ['{}']}}]}});",
        name, predicate
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn should_detect_files_that_need_linking() {
        assert!(needs_linking("i0.ɵɵngDeclarePipe({})"));
        assert!(needs_linking("i0.$ngDeclarePipe({})"));
        assert!(!needs_linking("i0.ɵɵdefinePipe({})"));
    }

    #[test]
    fn should_recognize_current_and_legacy_declaration_names() {
        let code = "";
        let host = OxcAstHost::new(code);
        let factory = OxcAstFactory::new(code);
        let environment = LinkerEnvironment::create(
            &host,
            &factory,
            Box::new(NullLogger::new()),
            LinkerOptions::default(),
        );
        let file_linker = FileLinker::new(&environment, "/app/lib.mjs", code);
        assert!(file_linker.is_partial_declaration("ɵɵngDeclareComponent"));
        assert!(file_linker.is_partial_declaration("$ngDeclarePipe"));
        assert!(!file_linker.is_partial_declaration("ɵɵngDeclareUnknown"));
        assert!(!file_linker.is_partial_declaration("ɵɵdefinePipe"));
    }

    #[test]
    fn should_link_a_pipe_declaration() {
        let linked = link_statements(
            "i0.ɵɵngDeclarePipe({version: 1, ngImport: i0, type: FooPipe, name: 'foo'});",
            Scoping::Shared,
        )
        .unwrap();
        assert_eq!(
            linked.expressions,
            vec!["/*@__PURE__*/i0.ɵɵdefinePipe({name:\"foo\",type:FooPipe,pure:true})"]
        );
        assert!(linked.constants.is_empty());
    }

    #[test]
    fn should_read_core_symbols_off_the_declared_ng_import() {
        let linked = link_statements(
            "ɵɵngDeclarePipe({version: 1, ngImport: core.i0, type: FooPipe, name: 'foo', pure: false});",
            Scoping::Local,
        )
        .unwrap();
        assert_eq!(
            linked.expressions,
            vec!["(function(){return /*@__PURE__*/core.i0.ɵɵdefinePipe({name:\"foo\",type:FooPipe,pure:false});})()"]
        );
    }

    #[test]
    fn should_share_constants_between_declarations_of_a_scope() {
        let code = [
            directive_with_query("A", "ref"),
            directive_with_query("B", "ref"),
            directive_with_query("C", "other"),
        ]
        .join("\n");
        let linked = link_statements(&code, Scoping::Shared).unwrap();
        assert_eq!(
            linked.constants,
            vec!["const _c0=[\"ref\"];", "const _c1=[\"other\"];"]
        );
        assert!(linked.expressions[0].contains("i0.ɵɵviewQuery(_c0,"));
        assert!(linked.expressions[1].contains("i0.ɵɵviewQuery(_c0,"));
        assert!(linked.expressions[2].contains("i0.ɵɵviewQuery(_c1,"));
    }

    #[test]
    fn should_keep_constants_local_without_a_shared_scope() {
        let code = [directive_with_query("A", "ref"), directive_with_query("B", "ref")].join("\n");
        let linked = link_statements(&code, Scoping::Local).unwrap();
        assert!(linked.constants.is_empty());
        for expression in &linked.expressions {
            assert!(expression.starts_with("(function(){const _c0=[\"ref\"];return "));
            assert!(expression.ends_with("})()"));
        }
    }

    #[test]
    fn should_require_a_single_argument() {
        assert_eq!(
            link_error("i0.ɵɵngDeclarePipe();"),
            "Invalid function call: It should have only a single object literal argument, but contained 0."
        );
        assert_eq!(
            link_error("i0.ɵɵngDeclarePipe({}, {});"),
            "Invalid function call: It should have only a single object literal argument, but contained 2."
        );
    }

    #[test]
    fn should_require_an_object_literal_argument() {
        assert_eq!(
            link_error("i0.ɵɵngDeclarePipe(meta);"),
            "Invalid declaration argument: Expected argument to be an object expression."
        );
    }

    #[test]
    fn should_require_ng_import() {
        assert_eq!(
            link_error("i0.ɵɵngDeclarePipe({version: 1, type: FooPipe, name: 'foo'});"),
            "Invalid declaration argument: Expected a simple expression property called 'ngImport'."
        );
    }

    #[test]
    fn should_require_a_numeric_version() {
        assert_eq!(
            link_error("i0.ɵɵngDeclarePipe({ngImport: i0, type: FooPipe, name: 'foo'});"),
            "Invalid declaration property: Expected property 'version' to be present."
        );
        assert_eq!(
            link_error("i0.ɵɵngDeclarePipe({version: '1', ngImport: i0, type: FooPipe, name: 'foo'});"),
            "Invalid declaration property: Unsupported syntax, expected a numeric literal."
        );
    }

    #[test]
    fn should_reject_unknown_declarations_and_versions() {
        assert_eq!(
            link_error("i0.ɵɵngDeclareWidget({version: 1, ngImport: i0});"),
            "Unknown partial declaration function ɵɵngDeclareWidget."
        );
        assert_eq!(
            link_error("i0.ɵɵngDeclarePipe({version: 2, ngImport: i0, type: FooPipe, name: 'foo'});"),
            "Unsupported partial declaration version 2 for ɵɵngDeclarePipe."
        );
    }

    #[test]
    fn should_report_linker_errors_from_the_metadata() {
        assert_eq!(
            link_error("i0.ɵɵngDeclarePipe({version: 1, ngImport: i0, type: FooPipe});"),
            "Expected property 'name' to be present."
        );
    }

    mod constant_scope_registry {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_return_the_same_scope_for_every_lookup_of_a_binding() {
            let refs = scope_refs(
                "import * as i0 from '@angular/core';\nscope(i0);\nscope(i0.x);\nscope(i0);",
            );
            assert_eq!(
                refs,
                vec![
                    Ok(Some(ConstantScopeId(0))),
                    Ok(Some(ConstantScopeId(0))),
                    Ok(Some(ConstantScopeId(0)))
                ]
            );
        }

        #[test]
        fn should_create_one_scope_per_declaring_scope() {
            let refs = scope_refs(
                "import * as i0 from '@angular/core';\nscope(i0);\nfunction f(i0) { scope(i0.y); scope(i0); }\nscope(i0.z);",
            );
            assert_eq!(
                refs,
                vec![
                    Ok(Some(ConstantScopeId(0))),
                    Ok(Some(ConstantScopeId(1))),
                    Ok(Some(ConstantScopeId(1))),
                    Ok(Some(ConstantScopeId(0)))
                ]
            );
        }

        #[test]
        fn should_fall_back_for_unbound_or_complex_ng_imports() {
            let refs = scope_refs("scope(i0);\nscope(i0.core);\nscope(load());");
            assert_eq!(refs, vec![Ok(None), Ok(None), Ok(None)]);
        }

        #[test]
        fn should_reject_bindings_declared_in_blocks() {
            let refs = scope_refs("{\n  const i0 = load();\n  scope(i0);\n}");
            assert_eq!(refs, vec![Err(UNSUPPORTED_BINDING_LOCATION.to_string())]);
        }
    }
}
