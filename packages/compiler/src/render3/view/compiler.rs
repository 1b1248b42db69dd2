//! Render3 View Compiler
//!
//! Builds `ɵɵdefineDirective` / `ɵɵdefineComponent` calls from directive and component metadata.

use crate::constant_pool::ConstantPool;
use crate::core::{
    parse_selector_to_r3_selector, AttributeMarker, ChangeDetectionStrategy, R3SelectorPart,
    ViewEncapsulation,
};
use crate::directive_matching::CssSelector;
use crate::output::output_ast::{self as o, Expression, LiteralMapEntry};
use crate::render3::r3_identifiers::Identifiers as R3;
use crate::render3::util::{closure_returning, R3CompiledExpression};

use super::api::{
    R3ComponentMetadata, R3DirectiveMetadata, R3HostMetadata, TemplateCompiler, TemplateErrors,
};
use super::query_generation::{create_content_queries_function, create_view_queries_function};
use super::util::{
    as_literal, conditionally_create_input_map, conditionally_create_string_map, parse_style,
    DefinitionMap,
};

const COMPONENT_VARIABLE: &str = "%COMP%";
const HOST_ATTR: &str = "_nghost-%COMP%";
const CONTENT_ATTR: &str = "_ngcontent-%COMP%";

/// Compile a directive for the render3 runtime.
pub fn compile_directive_from_metadata(
    meta: &R3DirectiveMetadata,
    constant_pool: &mut ConstantPool,
    template_compiler: &dyn TemplateCompiler,
) -> Result<R3CompiledExpression, TemplateErrors> {
    let mut definition_map = base_directive_fields(meta, constant_pool, template_compiler)?;
    add_features(&mut definition_map, meta, None);

    let expression =
        o::import_ref(R3::define_directive()).call_fn(vec![definition_map.to_literal_map()], true);
    Ok(R3CompiledExpression::new(*expression, vec![]))
}

/// Compile a component for the render3 runtime.
pub fn compile_component_from_metadata(
    meta: &R3ComponentMetadata,
    constant_pool: &mut ConstantPool,
    template_compiler: &dyn TemplateCompiler,
) -> Result<R3CompiledExpression, TemplateErrors> {
    let directive = &meta.directive;
    let mut definition_map = base_directive_fields(directive, constant_pool, template_compiler)?;
    add_features(&mut definition_map, directive, meta.view_providers.as_ref());

    // e.g. `attrs: ["class", ".my.app"]`
    let first_selector = match directive.selector.as_deref() {
        Some(selector) if !selector.is_empty() => CssSelector::parse(selector)
            .map_err(|err| TemplateErrors(vec![err]))?
            .into_iter()
            .next(),
        _ => None,
    };
    if let Some(first_selector) = first_selector {
        let selector_attributes = first_selector.get_attrs();
        if !selector_attributes.is_empty() {
            let attrs = *o::literal_arr(selector_attributes.iter().map(|v| as_literal(v)).collect());
            definition_map.set("attrs", Some(constant_pool.get_const_literal(attrs, true)));
        }
    }

    let template = template_compiler.compile_template(&directive.name, &meta.template, constant_pool)?;

    // We need to provide this so that dynamically generated components know what
    // projected content blocks to pass through to the component when it is instantiated.
    if !template.ng_content_selectors.is_empty() {
        let selectors: Vec<Expression> = template
            .ng_content_selectors
            .iter()
            .map(|s| as_literal(s))
            .collect();
        definition_map.set(
            "ngContentSelectors",
            Some(constant_pool.get_const_literal(*o::literal_arr(selectors), true)),
        );
    }

    // e.g. `decls: 2`
    definition_map.set("decls", Some(*o::literal(template.decls)));
    // e.g. `vars: 2`
    definition_map.set("vars", Some(*o::literal(template.vars)));
    if !template.consts.is_empty() {
        definition_map.set("consts", Some(*o::literal_arr(template.consts.clone())));
    }
    definition_map.set("template", Some(template.template_fn.clone()));

    // e.g. `directives: [MyDirective]`
    if !meta.directives.is_empty() {
        let list = *o::literal_arr(meta.directives.iter().map(|d| d.expression.clone()).collect());
        definition_map.set(
            "directives",
            Some(wrap_in_closure_if(list, meta.wrap_directives_and_pipes_in_closure)),
        );
    }

    // e.g. `pipes: [MyPipe]`
    if !meta.pipes.is_empty() {
        let list = *o::literal_arr(meta.pipes.values().cloned().collect());
        definition_map.set(
            "pipes",
            Some(wrap_in_closure_if(list, meta.wrap_directives_and_pipes_in_closure)),
        );
    }

    // e.g. `styles: [str1, str2]`
    let mut encapsulation = meta.encapsulation;
    if !meta.styles.is_empty() {
        let style_values = if encapsulation == ViewEncapsulation::Emulated {
            template_compiler.shim_styles(&meta.styles, CONTENT_ATTR, HOST_ATTR)?
        } else {
            meta.styles.clone()
        };
        let strings: Vec<Expression> = style_values
            .into_iter()
            .map(|style| constant_pool.get_const_literal(*o::literal(style), false))
            .collect();
        definition_map.set("styles", Some(*o::literal_arr(strings)));
    } else if encapsulation == ViewEncapsulation::Emulated {
        // If there is no style, don't generate css selectors on elements
        encapsulation = ViewEncapsulation::None;
    }

    // Only set view encapsulation if it's not the default value
    if encapsulation != ViewEncapsulation::Emulated {
        definition_map.set("encapsulation", Some(*o::literal(encapsulation as u32)));
    }

    // e.g. `animation: [trigger('123', [])]`
    if let Some(animations) = &meta.animations {
        definition_map.set(
            "data",
            Some(*o::literal_map(vec![LiteralMapEntry::new(
                "animation",
                animations.clone(),
                false,
            )])),
        );
    }

    // Only set the change detection flag if it's not the default.
    if meta.change_detection != ChangeDetectionStrategy::Default {
        definition_map.set(
            "changeDetection",
            Some(*o::literal(meta.change_detection as u32)),
        );
    }

    let expression =
        o::import_ref(R3::define_component()).call_fn(vec![definition_map.to_literal_map()], true);
    Ok(R3CompiledExpression::new(*expression, vec![]))
}

fn wrap_in_closure_if(list: Expression, wrap: bool) -> Expression {
    if wrap {
        closure_returning(list)
    } else {
        list
    }
}

fn selector_part_literal(part: &R3SelectorPart) -> Expression {
    match part {
        R3SelectorPart::Text(text) => as_literal(text),
        R3SelectorPart::Flags(flags) => *o::literal(*flags),
    }
}

fn base_directive_fields(
    meta: &R3DirectiveMetadata,
    constant_pool: &mut ConstantPool,
    template_compiler: &dyn TemplateCompiler,
) -> Result<DefinitionMap, TemplateErrors> {
    let mut definition_map = DefinitionMap::new();
    let selectors = parse_selector_to_r3_selector(meta.selector.as_deref())
        .map_err(|err| TemplateErrors(vec![err]))?;

    // e.g. `type: MyDirective`
    definition_map.set("type", Some(meta.type_.value.clone()));

    // e.g. `selectors: [['', 'someDir', '']]`
    if !selectors.is_empty() {
        let selector_arrays = selectors
            .iter()
            .map(|selector| *o::literal_arr(selector.iter().map(selector_part_literal).collect()))
            .collect();
        definition_map.set("selectors", Some(*o::literal_arr(selector_arrays)));
    }

    // e.g. `contentQueries: (rf, ctx, dirIndex) => { ... }
    if !meta.queries.is_empty() {
        definition_map.set(
            "contentQueries",
            Some(create_content_queries_function(&meta.queries, constant_pool, Some(&meta.name))),
        );
    }

    if !meta.view_queries.is_empty() {
        definition_map.set(
            "viewQuery",
            Some(create_view_queries_function(&meta.view_queries, constant_pool, Some(&meta.name))),
        );
    }

    // e.g. `hostAttrs: ['role', 'listbox']`, `hostVars: 2`, `hostBindings: (rf, ctx) => { ... }`
    create_host_bindings(&meta.host, &meta.name, constant_pool, template_compiler, &mut definition_map)?;

    // e.g 'inputs: {a: 'a'}`
    definition_map.set("inputs", conditionally_create_input_map(&meta.inputs));

    // e.g 'outputs: {a: 'a'}`
    definition_map.set("outputs", conditionally_create_string_map(&meta.outputs));

    if let Some(export_as) = &meta.export_as {
        definition_map.set(
            "exportAs",
            Some(*o::literal_arr(export_as.iter().map(|e| as_literal(e)).collect())),
        );
    }

    Ok(definition_map)
}

fn create_host_bindings(
    host: &R3HostMetadata,
    name: &str,
    constant_pool: &mut ConstantPool,
    template_compiler: &dyn TemplateCompiler,
    definition_map: &mut DefinitionMap,
) -> Result<(), TemplateErrors> {
    let mut host_attrs: Vec<Expression> = Vec::new();
    for (key, value) in &host.attributes {
        host_attrs.push(as_literal(key));
        host_attrs.push(value.clone());
    }
    if let Some(class_attr) = &host.special_attributes.class_attr {
        let classes: Vec<&str> = class_attr.split_whitespace().collect();
        if !classes.is_empty() {
            host_attrs.push(*o::literal(AttributeMarker::Classes as u32));
            host_attrs.extend(classes.into_iter().map(as_literal));
        }
    }
    if let Some(style_attr) = &host.special_attributes.style_attr {
        let styles = parse_style(style_attr);
        if !styles.is_empty() {
            host_attrs.push(*o::literal(AttributeMarker::Styles as u32));
            host_attrs.extend(styles.iter().map(|s| as_literal(s)));
        }
    }
    if !host_attrs.is_empty() {
        definition_map.set("hostAttrs", Some(*o::literal_arr(host_attrs)));
    }

    if host.properties.is_empty() && host.listeners.is_empty() {
        return Ok(());
    }
    let compiled = template_compiler.compile_host_bindings(name, host, constant_pool)?;
    if compiled.host_vars > 0 {
        definition_map.set("hostVars", Some(*o::literal(compiled.host_vars)));
    }
    definition_map.set("hostBindings", Some(compiled.host_bindings_fn));
    Ok(())
}

fn add_features(
    definition_map: &mut DefinitionMap,
    meta: &R3DirectiveMetadata,
    view_providers: Option<&Expression>,
) {
    let mut features: Vec<Expression> = vec![];

    if meta.providers.is_some() || view_providers.is_some() {
        let mut args = vec![meta
            .providers
            .clone()
            .unwrap_or_else(|| *o::literal_arr(vec![]))];
        if let Some(view_providers) = view_providers {
            args.push(view_providers.clone());
        }
        features.push(*o::import_ref(R3::providers_feature()).call_fn(args, false));
    }

    if meta.uses_inheritance {
        features.push(*o::import_ref(R3::inherit_definition_feature()));
    }
    if meta.full_inheritance {
        features.push(*o::import_ref(R3::copy_definition_feature()));
    }
    if meta.uses_on_changes {
        features.push(*o::import_ref(R3::ng_on_changes_feature()));
    }

    if !features.is_empty() {
        definition_map.set("features", Some(*o::literal_arr(features)));
    }
}

/// Replaces the component placeholder in the encapsulation attributes with `component_id`.
pub fn encapsulation_attrs(component_id: &str) -> (String, String) {
    (
        CONTENT_ATTR.replace(COMPONENT_VARIABLE, component_id),
        HOST_ATTR.replace(COMPONENT_VARIABLE, component_id),
    )
}
