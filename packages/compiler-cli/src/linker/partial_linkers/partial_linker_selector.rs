use std::collections::BTreeMap;
use std::rc::Rc;

use angular_compiler::render3::view::api::TemplateCompiler;
use indexmap::IndexMap;

use crate::linker::ast::AstNode;
use crate::linker::linker_options::LinkerOptions;
use crate::linker::partial_linker::PartialLinker;

use super::partial_component_linker_1::PartialComponentLinker1;
use super::partial_directive_linker_1::PartialDirectiveLinker1;
use super::partial_factory_linker_1::PartialFactoryLinker1;
use super::partial_injectable_linker_1::PartialInjectableLinker1;
use super::partial_injector_linker_1::PartialInjectorLinker1;
use super::partial_ng_module_linker_1::PartialNgModuleLinker1;
use super::partial_pipe_linker_1::PartialPipeLinker1;

pub const DECLARE_DIRECTIVE: &str = "ɵɵngDeclareDirective";
pub const DECLARE_COMPONENT: &str = "ɵɵngDeclareComponent";
pub const DECLARE_FACTORY: &str = "ɵɵngDeclareFactory";
pub const DECLARE_INJECTABLE: &str = "ɵɵngDeclareInjectable";
pub const DECLARE_INJECTOR: &str = "ɵɵngDeclareInjector";
pub const DECLARE_NG_MODULE: &str = "ɵɵngDeclareNgModule";
pub const DECLARE_PIPE: &str = "ɵɵngDeclarePipe";

/// Every declaration function, under its current name.
pub const DECLARATION_FUNCTIONS: [&str; 7] = [
    DECLARE_DIRECTIVE,
    DECLARE_COMPONENT,
    DECLARE_FACTORY,
    DECLARE_INJECTABLE,
    DECLARE_INJECTOR,
    DECLARE_NG_MODULE,
    DECLARE_PIPE,
];

/// Prefix of the declaration functions emitted by early partial compilations.
const LEGACY_PREFIX: &str = "$ngDeclare";

pub type VersionedLinkers<TExpression> = BTreeMap<u32, Rc<dyn PartialLinker<TExpression>>>;

/// Registers every linker under every name it answers to, keyed by declaration version.
pub fn create_linker_map<TExpression: AstNode>(
    options: &LinkerOptions,
    template_compiler: Rc<dyn TemplateCompiler>,
) -> IndexMap<String, VersionedLinkers<TExpression>> {
    let linkers: [(&str, Rc<dyn PartialLinker<TExpression>>); 7] = [
        (
            DECLARE_DIRECTIVE,
            Rc::new(PartialDirectiveLinker1::new(template_compiler.clone())),
        ),
        (
            DECLARE_COMPONENT,
            Rc::new(PartialComponentLinker1::new(options.clone(), template_compiler)),
        ),
        (DECLARE_FACTORY, Rc::new(PartialFactoryLinker1::new())),
        (DECLARE_INJECTABLE, Rc::new(PartialInjectableLinker1::new())),
        (DECLARE_INJECTOR, Rc::new(PartialInjectorLinker1::new())),
        (
            DECLARE_NG_MODULE,
            Rc::new(PartialNgModuleLinker1::new(options.linker_jit_mode)),
        ),
        (DECLARE_PIPE, Rc::new(PartialPipeLinker1::new())),
    ];

    let mut map = IndexMap::new();
    for (name, linker) in linkers {
        let legacy_name = name.replacen("ɵɵngDeclare", LEGACY_PREFIX, 1);
        map.insert(name.to_string(), BTreeMap::from([(1, linker.clone())]));
        map.insert(legacy_name, BTreeMap::from([(1, linker)]));
    }
    map
}

/// Finds the linker for a declaration function and version.
pub struct PartialLinkerSelector<TExpression: AstNode> {
    linkers: IndexMap<String, VersionedLinkers<TExpression>>,
}

impl<TExpression: AstNode> PartialLinkerSelector<TExpression> {
    pub fn new(options: &LinkerOptions, template_compiler: Rc<dyn TemplateCompiler>) -> Self {
        Self::from_linkers(create_linker_map(options, template_compiler))
    }

    pub fn from_linkers(linkers: IndexMap<String, VersionedLinkers<TExpression>>) -> Self {
        Self { linkers }
    }

    /// Returns true if there is a linker for the given function name.
    pub fn supports_declaration(&self, function_name: &str) -> bool {
        self.linkers.contains_key(function_name)
    }

    /// Returns the linker that handles the given function name and version.
    pub fn get_linker(
        &self,
        function_name: &str,
        version: f64,
    ) -> Result<&dyn PartialLinker<TExpression>, String> {
        let versions = self
            .linkers
            .get(function_name)
            .ok_or_else(|| format!("Unknown partial declaration function {}.", function_name))?;

        let linker = if version.fract() == 0.0 && version >= 0.0 && version <= u32::MAX as f64 {
            versions.get(&(version as u32))
        } else {
            None
        };
        linker.map(|linker| linker.as_ref()).ok_or_else(|| {
            format!(
                "Unsupported partial declaration version {} for {}.",
                format_version(version),
                function_name
            )
        })
    }
}

/// Whole versions print without a fractional part, as they were written in the source.
fn format_version(version: f64) -> String {
    if version.fract() == 0.0 && version.is_finite() {
        format!("{}", version as i64)
    } else {
        version.to_string()
    }
}
