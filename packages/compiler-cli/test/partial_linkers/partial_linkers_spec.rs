use std::cell::RefCell;
use std::rc::Rc;

use angular_linker::compiler::constant_pool::ConstantPool;
use angular_linker::compiler::output_ast as o;
use angular_linker::compiler::render3::view::api::{
    CompiledHostBindings, CompiledTemplate, R3HostMetadata, R3TemplateSource, TemplateCompiler,
    TemplateErrors,
};
use angular_linker::linker::{link_source_with, LinkerOptions, LinkerSetup};

/// What the linker handed to the template compiler for one template.
#[derive(Debug, Clone, PartialEq)]
struct TemplateRequest {
    component: String,
    text: String,
    interpolation: (String, String),
    preserve_whitespaces: bool,
    start_line: usize,
    start_col: usize,
}

/// Records template requests and emits empty render functions.
#[derive(Default)]
struct RecordingTemplateCompiler {
    requests: RefCell<Vec<TemplateRequest>>,
}

impl TemplateCompiler for RecordingTemplateCompiler {
    fn compile_template(
        &self,
        component_name: &str,
        template: &R3TemplateSource,
        _constant_pool: &mut ConstantPool,
    ) -> Result<CompiledTemplate, TemplateErrors> {
        let text = template.code[template.range.start_pos..template.range.end_pos].to_string();
        if text.contains("<invalid") {
            return Err(TemplateErrors(vec![format!("Unexpected tag in {}", component_name)]));
        }
        self.requests.borrow_mut().push(TemplateRequest {
            component: component_name.to_string(),
            text,
            interpolation: template.interpolation.clone(),
            preserve_whitespaces: template.preserve_whitespaces,
            start_line: template.range.start_line,
            start_col: template.range.start_col,
        });
        Ok(CompiledTemplate {
            template_fn: *o::fn_expr(
                vec![o::FnParam::new("rf"), o::FnParam::new("ctx")],
                vec![],
                Some(format!("{}_Template", component_name)),
            ),
            decls: 1,
            vars: 0,
            consts: vec![],
            ng_content_selectors: vec![],
        })
    }

    fn compile_host_bindings(
        &self,
        directive_name: &str,
        host: &R3HostMetadata,
        _constant_pool: &mut ConstantPool,
    ) -> Result<CompiledHostBindings, TemplateErrors> {
        Ok(CompiledHostBindings {
            host_bindings_fn: *o::fn_expr(
                vec![o::FnParam::new("rf"), o::FnParam::new("ctx")],
                vec![],
                Some(format!("{}_HostBindings", directive_name)),
            ),
            host_vars: (host.properties.len() + host.listeners.len()) as u32,
        })
    }

    fn shim_styles(
        &self,
        styles: &[String],
        _content_attr: &str,
        _host_attr: &str,
    ) -> Result<Vec<String>, TemplateErrors> {
        Ok(styles.iter().map(|style| format!("scoped({})", style)).collect())
    }
}

const PRELUDE: &str = "import * as i0 from '@angular/core';\n";

/// Links `X = <declaration>;` and returns the linked declaration.
fn link_with(
    declaration: &str,
    options: LinkerOptions,
    template_compiler: Rc<RecordingTemplateCompiler>,
) -> Result<String, String> {
    let code = format!("{}X = {};\n", PRELUDE, declaration);
    let setup = LinkerSetup::new(options).with_template_compiler(template_compiler);
    let linked = link_source_with("/lib/x.mjs", &code, setup).map_err(|error| error.message)?;
    let body = linked
        .strip_prefix(PRELUDE)
        .unwrap_or(&linked)
        .trim_end()
        .to_string();
    Ok(body
        .strip_prefix("X = ")
        .and_then(|body| body.strip_suffix(';'))
        .unwrap_or(&body)
        .to_string())
}

fn link(declaration: &str) -> String {
    link_with(
        declaration,
        LinkerOptions::default(),
        Rc::new(RecordingTemplateCompiler::default()),
    )
    .unwrap()
}

fn link_error(declaration: &str) -> String {
    link_with(
        declaration,
        LinkerOptions::default(),
        Rc::new(RecordingTemplateCompiler::default()),
    )
    .unwrap_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    mod component {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_link_a_component_with_its_dependencies() {
            let compiler = Rc::new(RecordingTemplateCompiler::default());
            let linked = link_with(
                "i0.ɵɵngDeclareComponent({version: 1, ngImport: i0, type: Cmp, selector: 'app-cmp', template: '<b>{{x}}</b>', directives: [{type: Dir, selector: '[dir]'}], pipes: {foo: FooPipe}})",
                LinkerOptions::default(),
                compiler.clone(),
            )
            .unwrap();
            assert!(linked.starts_with("/*@__PURE__*/i0.ɵɵdefineComponent({type:Cmp,selectors:"));
            assert!(linked.ends_with(
                "decls:1,vars:0,template:function Cmp_Template(rf,ctx){},directives:[Dir],pipes:[FooPipe],encapsulation:2})"
            ));
            assert_eq!(
                compiler.requests.borrow().clone(),
                vec![TemplateRequest {
                    component: "Cmp".to_string(),
                    text: "<b>{{x}}</b>".to_string(),
                    interpolation: ("{{".to_string(), "}}".to_string()),
                    preserve_whitespaces: false,
                    start_line: 1,
                    start_col: "X = i0.ɵɵngDeclareComponent({version: 1, ngImport: i0, type: Cmp, selector: 'app-cmp', template: '".len(),
                }]
            );
        }

        #[test]
        fn should_wrap_forward_declared_dependencies_in_a_closure() {
            let linked = link(
                "i0.ɵɵngDeclareComponent({version: 1, ngImport: i0, type: Cmp, template: '', directives: [{type: function () { return Dir; }, selector: '[dir]'}], pipes: {foo: FooPipe}})",
            );
            assert!(linked.contains("directives:function(){return [Dir];},pipes:function(){return [FooPipe];}"));
        }

        #[test]
        fn should_pass_the_raw_template_text_between_the_quotes() {
            let compiler = Rc::new(RecordingTemplateCompiler::default());
            link_with(
                "i0.ɵɵngDeclareComponent({version: 1, ngImport: i0, type: Cmp, template: \"<b title='a'>it\\\"s</b>\", preserveWhitespaces: true, interpolation: ['[[', ']]']})",
                LinkerOptions::default(),
                compiler.clone(),
            )
            .unwrap();
            let request = compiler.requests.borrow()[0].clone();
            assert_eq!(request.text, "<b title='a'>it\\\"s</b>");
            assert_eq!(request.interpolation, ("[[".to_string(), "]]".to_string()));
            assert!(request.preserve_whitespaces);
        }

        #[test]
        fn should_accept_template_literals() {
            let compiler = Rc::new(RecordingTemplateCompiler::default());
            link_with(
                "i0.ɵɵngDeclareComponent({version: 1, ngImport: i0, type: Cmp, template: `<p>\n  {{x}}\n</p>`})",
                LinkerOptions::default(),
                compiler.clone(),
            )
            .unwrap();
            assert_eq!(compiler.requests.borrow()[0].text, "<p>\n  {{x}}\n</p>");
        }

        #[test]
        fn should_refuse_templates_that_are_not_string_literals() {
            assert_eq!(
                link_error("i0.ɵɵngDeclareComponent({version: 1, ngImport: i0, type: Cmp, template: tpl})"),
                "Expected the template string to be wrapped in quotes but got: tpl"
            );
        }

        #[test]
        fn should_refuse_incomplete_interpolation_markers() {
            assert_eq!(
                link_error("i0.ɵɵngDeclareComponent({version: 1, ngImport: i0, type: Cmp, template: '', interpolation: ['[[']})"),
                "Unsupported interpolation config, expected an array containing exactly two strings"
            );
        }

        #[test]
        fn should_report_template_errors() {
            assert_eq!(
                link_error("i0.ɵɵngDeclareComponent({version: 1, ngImport: i0, type: Cmp, template: '<invalid>'})"),
                "Errors found in the template:\nUnexpected tag in Cmp"
            );
        }

        #[test]
        fn should_scope_styles_for_emulated_encapsulation() {
            let linked = link(
                "i0.ɵɵngDeclareComponent({version: 1, ngImport: i0, type: Cmp, template: '', styles: ['b{}']})",
            );
            assert!(linked.ends_with("styles:[\"scoped(b{})\"]})"));
        }

        #[test]
        fn should_read_encapsulation_and_change_detection_off_the_runtime_enums() {
            let linked = link(
                "i0.ɵɵngDeclareComponent({version: 1, ngImport: i0, type: Cmp, template: '', styles: ['b{}'], encapsulation: i0.ViewEncapsulation.ShadowDom, changeDetection: i0.ChangeDetectionStrategy.OnPush})",
            );
            assert!(linked.ends_with("styles:[\"b{}\"],encapsulation:3,changeDetection:0})"));
        }

        #[test]
        fn should_refuse_unknown_enum_members() {
            assert_eq!(
                link_error("i0.ɵɵngDeclareComponent({version: 1, ngImport: i0, type: Cmp, template: '', encapsulation: i0.ViewEncapsulation.Native})"),
                "Unsupported encapsulation"
            );
            assert_eq!(
                link_error("i0.ɵɵngDeclareComponent({version: 1, ngImport: i0, type: Cmp, template: '', changeDetection: i0.ChangeDetectionStrategy.Never})"),
                "Unsupported change detection strategy"
            );
        }

        #[test]
        fn should_hoist_selector_attributes() {
            let code = format!(
                "{}X = i0.ɵɵngDeclareComponent({{version: 1, ngImport: i0, type: Cmp, selector: 'button[mat-button]', template: ''}});\n",
                PRELUDE
            );
            let setup = LinkerSetup::default()
                .with_template_compiler(Rc::new(RecordingTemplateCompiler::default()));
            let linked = link_source_with("/lib/x.mjs", &code, setup).unwrap();
            assert!(linked.starts_with(&format!(
                "{}const _c0=[\"mat-button\",\"\"];\nX = ",
                PRELUDE
            )));
            assert!(linked.contains(",attrs:_c0,"));
        }
    }

    mod directive {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_link_inputs_outputs_and_export_names() {
            let linked = link(
                "i0.ɵɵngDeclareDirective({version: 1, ngImport: i0, type: Dir, inputs: {value: 'value', size: ['dirSize', 'size']}, outputs: {changed: 'dirChanged'}, exportAs: ['dir', 'd']})",
            );
            assert!(linked.starts_with("/*@__PURE__*/i0.ɵɵdefineDirective({type:Dir,inputs:{"));
            assert!(linked.contains("outputs:{changed:\"dirChanged\"}"));
            assert!(linked.ends_with("exportAs:[\"dir\",\"d\"]})"));
        }

        #[test]
        fn should_compile_host_bindings_through_the_template_compiler() {
            let linked = link(
                "i0.ɵɵngDeclareDirective({version: 1, ngImport: i0, type: Dir, host: {attributes: {role: 'button'}, listeners: {click: 'onClick()'}, properties: {'class.active': 'active'}}})",
            );
            assert_eq!(
                linked,
                "/*@__PURE__*/i0.ɵɵdefineDirective({type:Dir,hostAttrs:[\"role\",'button'],hostVars:2,hostBindings:function Dir_HostBindings(rf,ctx){}})"
            );
        }

        #[test]
        fn should_add_features_in_order() {
            let linked = link(
                "i0.ɵɵngDeclareDirective({version: 1, ngImport: i0, type: Dir, providers: [Svc], usesInheritance: true, usesOnChanges: true})",
            );
            assert!(linked.ends_with(
                "features:[i0.ɵɵProvidersFeature([Svc]),i0.ɵɵInheritDefinitionFeature,i0.ɵɵNgOnChangesFeature]})"
            ));
        }
    }

    mod ng_module {
        use super::*;
        use pretty_assertions::assert_eq;

        const MODULE: &str = "i0.ɵɵngDeclareNgModule({version: 1, ngImport: i0, type: AppModule, bootstrap: [AppCmp], declarations: [AppCmp], imports: [Common], exports: [AppCmp]})";

        #[test]
        fn should_omit_the_selector_scope_by_default() {
            assert_eq!(
                link(MODULE),
                "/*@__PURE__*/i0.ɵɵdefineNgModule({type:AppModule,bootstrap:[AppCmp]})"
            );
        }

        #[test]
        fn should_inline_the_selector_scope_in_jit_mode() {
            let options = LinkerOptions {
                linker_jit_mode: true,
                ..LinkerOptions::default()
            };
            let linked = link_with(MODULE, options, Rc::new(RecordingTemplateCompiler::default()))
                .unwrap();
            assert_eq!(
                linked,
                "/*@__PURE__*/i0.ɵɵdefineNgModule({type:AppModule,bootstrap:[AppCmp],declarations:[AppCmp],imports:[Common],exports:[AppCmp]})"
            );
        }

        #[test]
        fn should_wrap_forward_declared_references() {
            assert_eq!(
                link("i0.ɵɵngDeclareNgModule({version: 1, ngImport: i0, type: AppModule, bootstrap: function () { return [AppCmp]; }, id: 'app'})"),
                "/*@__PURE__*/i0.ɵɵdefineNgModule({type:AppModule,bootstrap:function(){return [AppCmp];},id:'app'})"
            );
        }
    }

    mod injector {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_link_providers_and_imports() {
            assert_eq!(
                link("i0.ɵɵngDeclareInjector({version: 1, ngImport: i0, type: AppModule, providers: [Svc], imports: [Common]})"),
                "/*@__PURE__*/i0.ɵɵdefineInjector({providers:[Svc],imports:[Common]})"
            );
        }
    }

    mod injectable {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_delegate_to_the_type_factory() {
            assert_eq!(
                link("i0.ɵɵngDeclareInjectable({version: 1, ngImport: i0, type: Svc, providedIn: 'root'})"),
                "i0.ɵɵdefineInjectable({token:Svc,factory:function(t){return Svc.ɵfac(t);},providedIn:'root'})"
            );
        }

        #[test]
        fn should_unwrap_forward_refs() {
            assert_eq!(
                link("i0.ɵɵngDeclareInjectable({version: 1, ngImport: i0, type: Svc, providedIn: i0.forwardRef(function () { return AppModule; }), useClass: forwardRef(() => Other)})"),
                "i0.ɵɵdefineInjectable({token:Svc,factory:function(t){return Other.ɵfac(t);},providedIn:AppModule})"
            );
        }

        #[test]
        fn should_refuse_calls_other_than_forward_ref() {
            assert_eq!(
                link_error("i0.ɵɵngDeclareInjectable({version: 1, ngImport: i0, type: Svc, useExisting: make(Other)})"),
                "Unsupported expression, expected a `forwardRef()` call or a type reference"
            );
        }

        #[test]
        fn should_default_provided_in_to_null() {
            assert!(link("i0.ɵɵngDeclareInjectable({version: 1, ngImport: i0, type: Svc})")
                .ends_with("providedIn:null})"));
        }
    }

    mod factory {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn should_inject_dependencies_for_the_target() {
            assert_eq!(
                link("i0.ɵɵngDeclareFactory({version: 1, ngImport: i0, type: Svc, deps: [{token: Dep, optional: true}], target: i0.ɵɵFactoryTarget.Injectable})"),
                "function Svc_Factory(t){return new (t||Svc)(i0.ɵɵinject(Dep,8));}"
            );
            assert_eq!(
                link("i0.ɵɵngDeclareFactory({version: 1, ngImport: i0, type: Dir, deps: [{token: Dep}, {token: 'role', attribute: true}], target: i0.ɵɵFactoryTarget.Directive})"),
                "function Dir_Factory(t){return new (t||Dir)(i0.ɵɵdirectiveInject(Dep),i0.ɵɵinjectAttribute('role'));}"
            );
        }

        #[test]
        fn should_render_an_invalid_factory_for_invalid_deps() {
            assert_eq!(
                link("i0.ɵɵngDeclareFactory({version: 1, ngImport: i0, type: Svc, deps: 'invalid', target: i0.ɵɵFactoryTarget.Injectable})"),
                "function Svc_Factory(t){i0.ɵɵinvalidFactory();}"
            );
        }

        #[test]
        fn should_inherit_the_base_factory_without_deps() {
            let linked = link(
                "i0.ɵɵngDeclareFactory({version: 1, ngImport: i0, type: Child, target: i0.ɵɵFactoryTarget.Pipe})",
            );
            assert!(linked.starts_with("/*@__PURE__*/(function(){let ɵChild_BaseFactory;return function Child_Factory(t){"));
            assert!(linked.contains("i0.ɵɵgetInheritedFactory(Child)"));
        }

        #[test]
        fn should_refuse_unknown_targets() {
            assert_eq!(
                link_error("i0.ɵɵngDeclareFactory({version: 1, ngImport: i0, type: Svc, target: i0.ɵɵFactoryTarget.Service})"),
                "Unsupported enum value for FactoryTarget"
            );
        }
    }
}
