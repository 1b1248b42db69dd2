//! Render3 View API
//!
//! Metadata shapes consumed by the directive and component compilers, and the seam through
//! which template and host-binding code generation is injected.

use indexmap::IndexMap;
use thiserror::Error;

use crate::constant_pool::ConstantPool;
use crate::core::{ChangeDetectionStrategy, ViewEncapsulation};
use crate::output::output_ast::Expression;
use crate::render3::util::R3Reference;

use super::util::InputMapping;

/// Information needed to compile a directive for the render3 runtime.
#[derive(Debug, Clone)]
pub struct R3DirectiveMetadata {
    /// Name of the directive type.
    pub name: String,
    /// An expression representing a reference to the directive itself.
    pub type_: R3Reference,
    /// Unparsed selector of the directive, or `None` if there was no selector.
    pub selector: Option<String>,
    /// Information about the content queries made by the directive.
    pub queries: Vec<R3QueryMetadata>,
    /// Information about the view queries made by the directive.
    pub view_queries: Vec<R3QueryMetadata>,
    /// Mappings indicating how the directive interacts with its host element.
    pub host: R3HostMetadata,
    /// Whether the directive implements `ngOnChanges`.
    pub uses_on_changes: bool,
    /// A mapping of inputs from class property names to binding property names.
    pub inputs: IndexMap<String, InputMapping>,
    /// A mapping of outputs from class property names to binding property names.
    pub outputs: IndexMap<String, String>,
    /// Whether or not the component or directive inherits from another class.
    pub uses_inheritance: bool,
    /// Whether or not the component or directive inherits its entire decorator from its base class.
    pub full_inheritance: bool,
    /// Reference name under which to export the directive's type in a template.
    pub export_as: Option<Vec<String>>,
    /// The list of providers defined in the directive.
    pub providers: Option<Expression>,
}

/// Where the template text lives and how it should be parsed.
#[derive(Debug, Clone)]
pub struct R3TemplateSource {
    /// Full text of the file containing the template.
    pub code: String,
    pub source_url: String,
    /// Span of the template contents within `code`, quotes excluded.
    pub range: TemplateRange,
    /// Whether the template text is an escaped string literal.
    pub escaped_string: bool,
    pub interpolation: (String, String),
    pub preserve_whitespaces: bool,
    pub enable_i18n_legacy_message_id_format: bool,
    pub i18n_normalize_line_endings_in_icus: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateRange {
    pub start_pos: usize,
    pub end_pos: usize,
    pub start_line: usize,
    pub start_col: usize,
}

/// A directive that may be used by a component template.
#[derive(Debug, Clone)]
pub struct R3UsedDirectiveMetadata {
    pub selector: String,
    pub expression: Expression,
}

/// Information needed to compile a component for the render3 runtime.
#[derive(Debug, Clone)]
pub struct R3ComponentMetadata {
    /// Base directive metadata.
    pub directive: R3DirectiveMetadata,
    /// Information about the component's template.
    pub template: R3TemplateSource,
    /// Directives available to the template.
    pub directives: Vec<R3UsedDirectiveMetadata>,
    /// Pipes available to the template, keyed by pipe name.
    pub pipes: IndexMap<String, Expression>,
    /// Whether `directives` and `pipes` must be emitted behind a closure.
    pub wrap_directives_and_pipes_in_closure: bool,
    /// A collection of styling data.
    pub styles: Vec<String>,
    /// An encapsulation policy for the component's styling.
    pub encapsulation: ViewEncapsulation,
    /// A collection of animation triggers.
    pub animations: Option<Expression>,
    /// The list of view providers defined in the component.
    pub view_providers: Option<Expression>,
    /// Strategy used for detecting changes in the component.
    pub change_detection: ChangeDetectionStrategy,
    /// Path to the file declaring the component.
    pub relative_context_file_path: String,
    /// Whether translation variable name should contain external message id.
    pub i18n_use_external_ids: bool,
}

/// Information needed to compile a query (view or content).
#[derive(Debug, Clone)]
pub struct R3QueryMetadata {
    /// Name of the property on the class to update with query results.
    pub property_name: String,
    /// Whether to read only the first matching result.
    pub first: bool,
    /// The predicate for the query.
    pub predicate: R3QueryPredicate,
    /// Whether to include only direct children or all descendants.
    pub descendants: bool,
    /// If the `QueryList` should fire change event only if actual change was computed.
    pub emit_distinct_changes_only: bool,
    /// An expression representing a type to read from each matched node.
    pub read: Option<Expression>,
    /// Whether or not this query should collect only static results.
    pub static_: bool,
}

/// Query predicate - either an expression or string selectors
#[derive(Debug, Clone)]
pub enum R3QueryPredicate {
    Expression(Expression),
    Selectors(Vec<String>),
}

/// Mappings indicating how the class interacts with its host element.
#[derive(Debug, Clone, Default)]
pub struct R3HostMetadata {
    /// A mapping of attribute binding keys to expressions.
    pub attributes: IndexMap<String, Expression>,
    /// A mapping of event binding keys to unparsed expressions.
    pub listeners: IndexMap<String, String>,
    /// A mapping of property binding keys to unparsed expressions.
    pub properties: IndexMap<String, String>,
    pub special_attributes: R3HostSpecialAttributes,
}

#[derive(Debug, Clone, Default)]
pub struct R3HostSpecialAttributes {
    pub style_attr: Option<String>,
    pub class_attr: Option<String>,
}

/// Output of template code generation.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    /// `function Cmp_Template(rf, ctx) {...}`
    pub template_fn: Expression,
    pub decls: u32,
    pub vars: u32,
    pub consts: Vec<Expression>,
    pub ng_content_selectors: Vec<String>,
}

/// Output of host-binding code generation.
#[derive(Debug, Clone)]
pub struct CompiledHostBindings {
    /// `function Dir_HostBindings(rf, ctx) {...}`
    pub host_bindings_fn: Expression,
    pub host_vars: u32,
}

/// Diagnostics produced while parsing or compiling a template.
#[derive(Debug, Clone, Error)]
#[error("{}", .0.join("\n"))]
pub struct TemplateErrors(pub Vec<String>);

/// Template parsing and view code generation.
///
/// Implementations may register shared constants in the provided pool; the linker hoists
/// them with every other constant of the declaration's scope.
pub trait TemplateCompiler {
    fn compile_template(
        &self,
        component_name: &str,
        template: &R3TemplateSource,
        constant_pool: &mut ConstantPool,
    ) -> Result<CompiledTemplate, TemplateErrors>;

    /// Compiles `host.properties` and `host.listeners`. Only called when at least one of them
    /// is present.
    fn compile_host_bindings(
        &self,
        directive_name: &str,
        host: &R3HostMetadata,
        constant_pool: &mut ConstantPool,
    ) -> Result<CompiledHostBindings, TemplateErrors>;

    /// Scopes styles for emulated encapsulation using the given content/host attributes.
    fn shim_styles(
        &self,
        styles: &[String],
        content_attr: &str,
        host_attr: &str,
    ) -> Result<Vec<String>, TemplateErrors>;
}

/// A `TemplateCompiler` for builds without view code generation.
///
/// Declarations that need a template, host bindings or scoped styles fail to link.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedTemplateCompiler;

impl UnsupportedTemplateCompiler {
    fn unsupported(what: &str, name: &str) -> TemplateErrors {
        TemplateErrors(vec![format!(
            "{} of {} requires a template compiler, but none is configured.",
            what, name
        )])
    }
}

impl TemplateCompiler for UnsupportedTemplateCompiler {
    fn compile_template(
        &self,
        component_name: &str,
        _template: &R3TemplateSource,
        _constant_pool: &mut ConstantPool,
    ) -> Result<CompiledTemplate, TemplateErrors> {
        Err(Self::unsupported("Compiling the template", component_name))
    }

    fn compile_host_bindings(
        &self,
        directive_name: &str,
        _host: &R3HostMetadata,
        _constant_pool: &mut ConstantPool,
    ) -> Result<CompiledHostBindings, TemplateErrors> {
        Err(Self::unsupported("Compiling host bindings", directive_name))
    }

    fn shim_styles(
        &self,
        _styles: &[String],
        content_attr: &str,
        _host_attr: &str,
    ) -> Result<Vec<String>, TemplateErrors> {
        Err(Self::unsupported("Scoping styles", content_attr))
    }
}
