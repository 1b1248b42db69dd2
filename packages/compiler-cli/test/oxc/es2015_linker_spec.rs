use angular_linker::linker::{link_source, link_source_with, FileLinkError, LinkerOptions, LinkerSetup};
use oxc_allocator::Allocator;
use oxc_parser::Parser;
use oxc_span::SourceType;

const FILENAME: &str = "/app/lib.mjs";

fn link(code: &str) -> String {
    link_source(FILENAME, code, &LinkerOptions::default()).unwrap()
}

fn link_failure(code: &str) -> FileLinkError {
    link_source(FILENAME, code, &LinkerOptions::default()).unwrap_err()
}

fn link_error(code: &str) -> String {
    link_failure(code).to_string()
}

fn assert_parses(code: &str) {
    let allocator = Allocator::default();
    let parsed = Parser::new(&allocator, code, SourceType::mjs()).parse();
    assert!(parsed.errors.is_empty(), "linked output does not parse:\n{}", code);
}

fn directive(ng_import: &str, type_name: &str, predicate: &str) -> String {
    format!(
        "{}.ɵɵngDeclareDirective({{version: 1, ngImport: {}, type: {}, viewQueries: [{{propertyName: 'q', predicate: ['{}']}}]}})",
        ng_import, ng_import, type_name, predicate
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn should_return_files_without_declarations_unchanged() {
        let code = "import * as i0 from '@angular/core';\nexport const x = i0.ɵɵdefinePipe({});\n";
        assert_eq!(link(code), code);
    }

    #[test]
    fn should_replace_declarations_in_place() {
        let code = "import * as i0 from '@angular/core';\nexport class FooPipe {}\nFooPipe.ɵpipe = i0.ɵɵngDeclarePipe({version: 1, ngImport: i0, type: FooPipe, name: 'foo'});\n";
        assert_eq!(
            link(code),
            "import * as i0 from '@angular/core';\nexport class FooPipe {}\nFooPipe.ɵpipe = /*@__PURE__*/i0.ɵɵdefinePipe({name:\"foo\",type:FooPipe,pure:true});\n"
        );
    }

    #[test]
    fn should_link_legacy_declaration_names() {
        let code = "import * as i0 from '@angular/core';\nFooPipe.ɵpipe = i0.$ngDeclarePipe({version: 1, ngImport: i0, type: FooPipe, name: 'foo'});";
        assert!(link(code).ends_with("FooPipe.ɵpipe = /*@__PURE__*/i0.ɵɵdefinePipe({name:\"foo\",type:FooPipe,pure:true});"));
    }

    #[test]
    fn should_hoist_constants_after_the_last_import() {
        let code = format!(
            "import * as i0 from '@angular/core';\nimport {{ x }} from './x';\nexport class Dir {{}}\nDir.ɵdir = {};\n",
            directive("i0", "Dir", "ref")
        );
        let linked = link(&code);
        assert!(linked.starts_with(
            "import * as i0 from '@angular/core';\nimport { x } from './x';\nconst _c0=[\"ref\"];\nexport class Dir {}\nDir.ɵdir = /*@__PURE__*/i0.ɵɵdefineDirective({type:Dir,viewQuery:function Dir_Query(rf,ctx){"
        ));
        assert!(linked.contains("i0.ɵɵviewQuery(_c0,"));
        assert!(!linked.contains("ɵɵngDeclare"));
    }

    #[test]
    fn should_number_constants_across_declarations_of_a_file() {
        let code = format!(
            "import * as i0 from '@angular/core';\nA.ɵdir = {};\nB.ɵdir = {};\nC.ɵdir = {};\n",
            directive("i0", "A", "one"),
            directive("i0", "B", "two"),
            directive("i0", "C", "one")
        );
        let linked = link(&code);
        assert!(linked.starts_with(
            "import * as i0 from '@angular/core';\nconst _c0=[\"one\"];\nconst _c1=[\"two\"];\nA.ɵdir = "
        ));
        assert_eq!(linked.matches("const _c").count(), 2);
        let b_start = linked.find("B.ɵdir").unwrap();
        let c_start = linked.find("C.ɵdir").unwrap();
        assert!(linked[b_start..c_start].contains("i0.ɵɵviewQuery(_c1,"));
        assert!(linked[c_start..].contains("i0.ɵɵviewQuery(_c0,"));
    }

    #[test]
    fn should_hoist_to_the_top_of_files_without_imports() {
        let code = format!(
            "const i0 = require('@angular/core');\nDir.ɵdir = {};\n",
            directive("i0", "Dir", "ref")
        );
        let linked = link(&code);
        assert!(linked.starts_with(
            "const _c0=[\"ref\"];\nconst i0 = require('@angular/core');\nDir.ɵdir = /*@__PURE__*/i0.ɵɵdefineDirective("
        ));
    }

    #[test]
    fn should_hoist_after_the_directive_prologue() {
        let code = format!(
            "'use strict';\nconst i0 = require('@angular/core');\nDir.ɵdir = {};\n",
            directive("i0", "Dir", "ref")
        );
        let linked = link(&code);
        assert!(linked.starts_with(
            "'use strict';\nconst _c0=[\"ref\"];\nconst i0 = require('@angular/core');\n"
        ));
    }

    #[test]
    fn should_hoist_into_the_function_declaring_ng_import() {
        let code = format!(
            "import {{ x }} from './x';\nexport function define(i0) {{\n  return {};\n}}\n",
            directive("i0", "Dir", "ref")
        );
        let linked = link(&code);
        assert!(linked.starts_with(
            "import { x } from './x';\nexport function define(i0) {const _c0=[\"ref\"];\n  return /*@__PURE__*/i0.ɵɵdefineDirective("
        ));
        assert_eq!(linked.matches("const _c0").count(), 1);
    }

    #[test]
    fn should_keep_constants_local_when_ng_import_is_not_bound() {
        let code = format!("Dir.ɵdir = {};\n", directive("i0", "Dir", "ref"));
        let linked = link(&code);
        assert!(linked.starts_with(
            "Dir.ɵdir = (function(){const _c0=[\"ref\"];return /*@__PURE__*/i0.ɵɵdefineDirective({type:Dir,"
        ));
        assert!(linked.ends_with("})();\n"));
    }

    #[test]
    fn should_only_link_the_outermost_declaration() {
        let code = "import * as i0 from '@angular/core';\nDir.ɵdir = i0.ɵɵngDeclareDirective({version: 1, ngImport: i0, type: Dir, providers: [make(i0.ɵɵngDeclarePipe({version: 1, ngImport: i0, type: P, name: 'p'}))]});\n";
        let linked = link(code);
        assert!(linked.contains("/*@__PURE__*/i0.ɵɵdefineDirective({type:Dir,"));
        assert!(linked.contains("make(i0.ɵɵngDeclarePipe({version: 1, ngImport: i0, type: P, name: 'p'}))"));
        assert!(!linked.contains("ɵɵdefinePipe"));
    }

    #[test]
    fn should_leave_calls_with_spread_arguments_alone() {
        let code = "import * as i0 from '@angular/core';\nFooPipe.ɵpipe = i0.ɵɵngDeclarePipe(...args);\n";
        assert_eq!(link(code), code);
    }

    #[test]
    fn should_report_metadata_errors_with_a_code_frame() {
        let code = "import * as i0 from '@angular/core';\nFooPipe.ɵpipe = i0.ɵɵngDeclarePipe({version: 1, ngImport: i0, type: FooPipe});\n";
        let error = link_failure(code);
        assert_eq!(
            error.to_string(),
            "/app/lib.mjs: Expected property 'name' to be present."
        );
        let object_start = code.find("{version").unwrap();
        assert_eq!(error.span().map(|span| span.offset()), Some(object_start));
        let report = error.render();
        assert!(report.contains("[/app/lib.mjs:2:"));
        assert!(report.contains(
            "2 | FooPipe.ɵpipe = i0.ɵɵngDeclarePipe({version: 1, ngImport: i0, type: FooPipe});"
        ));
    }

    #[test]
    fn should_report_unsupported_versions_against_the_call() {
        let code = "import * as i0 from '@angular/core';\n\nFooPipe.ɵpipe = i0.ɵɵngDeclarePipe({version: 3, ngImport: i0, type: FooPipe, name: 'foo'});\n";
        let error = link_failure(code);
        assert_eq!(
            error.to_string(),
            "/app/lib.mjs: Unsupported partial declaration version 3 for ɵɵngDeclarePipe."
        );
        assert_eq!(
            error.span().map(|span| span.offset()),
            Some(code.find("i0.ɵɵngDeclarePipe").unwrap())
        );
        assert!(error.render().contains("3 | FooPipe.ɵpipe"));
    }

    #[test]
    fn should_report_parse_errors_with_a_code_frame() {
        let error = link_failure("i0.ɵɵngDeclarePipe({version: 1,");
        assert!(error.to_string().starts_with("/app/lib.mjs: "));
        assert!(error.span().is_some());
        let report = error.render();
        assert!(report.contains("[/app/lib.mjs:1:"));
        assert!(report.contains("1 | i0.ɵɵngDeclarePipe({version: 1,"));
    }

    #[test]
    fn should_start_a_new_line_after_a_function_prologue_without_semicolon() {
        let code = format!(
            "export function define(i0) {{\n  'use strict'\n  return {};\n}}\n",
            directive("i0", "Dir", "ref")
        );
        let linked = link(&code);
        assert!(linked.starts_with(
            "export function define(i0) {\n  'use strict'\nconst _c0=[\"ref\"];\n  return /*@__PURE__*/i0.ɵɵdefineDirective("
        ));
        assert_parses(&linked);
    }

    #[test]
    fn should_keep_factories_called_at_the_start_of_a_statement_as_calls() {
        let code = "import * as i0 from '@angular/core';\ni0.ɵɵngDeclareFactory({version: 1, ngImport: i0, type: Foo, deps: [], target: i0.ɵɵFactoryTarget.Injectable})(null);\n";
        let linked = link(code);
        assert_eq!(
            linked,
            "import * as i0 from '@angular/core';\n(function Foo_Factory(t){return new (t||Foo)();})(null);\n"
        );
        assert_parses(&linked);
    }

    #[test]
    fn should_leave_factories_in_expression_position_bare() {
        let code = "import * as i0 from '@angular/core';\nFoo.ɵfac = i0.ɵɵngDeclareFactory({version: 1, ngImport: i0, type: Foo, deps: [], target: i0.ɵɵFactoryTarget.Injectable});\n";
        assert_eq!(
            link(code),
            "import * as i0 from '@angular/core';\nFoo.ɵfac = function Foo_Factory(t){return new (t||Foo)();};\n"
        );
    }

    #[test]
    fn should_share_one_pool_between_ng_imports_of_the_same_binding() {
        let code = format!(
            "import * as i0 from '@angular/core';\nA.ɵdir = {};\nB.ɵdir = {};\n",
            directive("i0", "A", "ref"),
            directive("i0.x", "B", "ref")
        );
        let linked = link(&code);
        assert!(linked.starts_with(
            "import * as i0 from '@angular/core';\nconst _c0=[\"ref\"];\nA.ɵdir = "
        ));
        assert_eq!(linked.matches("const _c").count(), 1);
        assert!(linked.contains("i0.ɵɵviewQuery(_c0,"));
        assert!(linked.contains("i0.x.ɵɵviewQuery(_c0,"));
        assert_parses(&linked);
    }

    #[test]
    fn should_not_share_constants_between_unbound_ng_imports() {
        let code = format!(
            "A.ɵdir = {};\nB.ɵdir = {};\n",
            directive("i0", "A", "ref"),
            directive("i0", "B", "ref")
        );
        let linked = link(&code);
        assert!(linked.starts_with("A.ɵdir = (function(){const _c0=[\"ref\"];return "));
        assert_eq!(
            linked.matches("(function(){const _c0=[\"ref\"];return ").count(),
            2
        );
        assert_eq!(linked.matches("const _c").count(), 2);
        assert_parses(&linked);
    }

    #[test]
    fn should_fail_for_block_scoped_ng_imports() {
        let code = format!(
            "{{\n  const i0 = require('@angular/core');\n  Dir.ɵdir = {};\n}}\n",
            directive("i0", "Dir", "ref")
        );
        let error = link_failure(&code);
        assert_eq!(
            error.to_string(),
            "/app/lib.mjs: Unsupported binding location. It was not possible to identify where to insert constant pool statements based on this binding expression."
        );
        assert!(error.render().contains("3 |   Dir.ɵdir = i0.ɵɵngDeclareDirective("));
    }

    #[test]
    fn should_fail_components_without_a_template_compiler() {
        let code = "import * as i0 from '@angular/core';\nCmp.ɵcmp = i0.ɵɵngDeclareComponent({version: 1, ngImport: i0, type: Cmp, selector: 'cmp', template: '<b></b>'});\n";
        let error = link_source_with(FILENAME, code, LinkerSetup::default())
            .unwrap_err()
            .to_string();
        assert!(error.starts_with("/app/lib.mjs: "));
        assert!(error.contains("requires a template compiler"));
    }
}
