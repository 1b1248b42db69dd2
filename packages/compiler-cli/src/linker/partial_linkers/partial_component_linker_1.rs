use std::rc::Rc;

use angular_compiler::constant_pool::ConstantPool;
use angular_compiler::core::{ChangeDetectionStrategy, ViewEncapsulation};
use angular_compiler::output::output_ast as o;
use angular_compiler::render3::view::api::{
    R3ComponentMetadata, R3TemplateSource, R3UsedDirectiveMetadata, TemplateCompiler,
    TemplateRange,
};
use angular_compiler::render3::view::compiler::compile_component_from_metadata;
use indexmap::IndexMap;

use crate::linker::ast::{AstNode, HostResult};
use crate::linker::ast_value::{AstObject, AstValue};
use crate::linker::error::FatalLinkerError;
use crate::linker::linker_options::LinkerOptions;
use crate::linker::partial_linker::PartialLinker;

use super::partial_directive_linker_1::to_r3_directive_meta;

const DEFAULT_INTERPOLATION: (&str, &str) = ("{{", "}}");

/// Links `ɵɵngDeclareComponent()` calls into `ɵɵdefineComponent()` calls.
pub struct PartialComponentLinker1 {
    options: LinkerOptions,
    template_compiler: Rc<dyn TemplateCompiler>,
}

impl PartialComponentLinker1 {
    pub fn new(options: LinkerOptions, template_compiler: Rc<dyn TemplateCompiler>) -> Self {
        Self {
            options,
            template_compiler,
        }
    }
}

impl<TExpression: AstNode> PartialLinker<TExpression> for PartialComponentLinker1 {
    fn link_partial_declaration(
        &self,
        source_url: &str,
        code: &str,
        constant_pool: &mut ConstantPool,
        meta_obj: &AstObject<'_, TExpression>,
    ) -> Result<o::Expression, FatalLinkerError<TExpression>> {
        let meta = to_r3_component_meta(meta_obj, code, source_url, &self.options)?;
        let def = compile_component_from_metadata(&meta, constant_pool, self.template_compiler.as_ref())
            .map_err(|errors| {
                FatalLinkerError::new(
                    meta_obj.get_node("template").unwrap_or_else(|_| meta_obj.expression.clone()),
                    format!("Errors found in the template:\n{}", errors),
                )
            })?;
        Ok(def.expression)
    }
}

/// Derives the `R3ComponentMetadata` from the metadata object.
pub fn to_r3_component_meta<TExpression: AstNode>(
    meta_obj: &AstObject<'_, TExpression>,
    code: &str,
    source_url: &str,
    options: &LinkerOptions,
) -> HostResult<R3ComponentMetadata, TExpression> {
    let interpolation = get_interpolation(meta_obj)?;
    let template_node = meta_obj.get_value("template")?;
    let range = get_template_range(&template_node, code)?;
    let preserve_whitespaces = if meta_obj.has("preserveWhitespaces") {
        meta_obj.get_boolean("preserveWhitespaces")?
    } else {
        false
    };

    let mut wrap_directives_and_pipes_in_closure = false;

    let mut directives = Vec::new();
    if meta_obj.has("directives") {
        for directive in meta_obj.get_array("directives")? {
            let directive_expr = directive.get_object()?;
            let type_ = directive_expr.get_value("type")?.to_deferred()?;
            wrap_directives_and_pipes_in_closure |= type_.is_deferred();
            directives.push(R3UsedDirectiveMetadata {
                selector: directive_expr.get_string("selector")?,
                expression: type_.value().get_opaque(),
            });
        }
    }

    let pipes = if meta_obj.has("pipes") {
        meta_obj.get_object("pipes")?.to_literal(|value| {
            let pipe = value.to_deferred()?;
            wrap_directives_and_pipes_in_closure |= pipe.is_deferred();
            Ok(pipe.value().get_opaque())
        })?
    } else {
        IndexMap::new()
    };

    let styles = if meta_obj.has("styles") {
        meta_obj
            .get_array("styles")?
            .iter()
            .map(AstValue::get_string)
            .collect::<HostResult<Vec<_>, TExpression>>()?
    } else {
        Vec::new()
    };

    Ok(R3ComponentMetadata {
        directive: to_r3_directive_meta(meta_obj)?,
        template: R3TemplateSource {
            code: code.to_string(),
            source_url: source_url.to_string(),
            range,
            escaped_string: true,
            interpolation,
            preserve_whitespaces,
            enable_i18n_legacy_message_id_format: options.enable_i18n_legacy_message_id_format,
            i18n_normalize_line_endings_in_icus: options.i18n_normalize_line_endings_in_icus,
        },
        directives,
        pipes,
        wrap_directives_and_pipes_in_closure,
        styles,
        encapsulation: if meta_obj.has("encapsulation") {
            parse_encapsulation(&meta_obj.get_value("encapsulation")?)?
        } else {
            ViewEncapsulation::Emulated
        },
        animations: if meta_obj.has("animations") {
            Some(meta_obj.get_opaque("animations")?)
        } else {
            None
        },
        view_providers: if meta_obj.has("viewProviders") {
            Some(meta_obj.get_opaque("viewProviders")?)
        } else {
            None
        },
        change_detection: if meta_obj.has("changeDetection") {
            parse_change_detection_strategy(&meta_obj.get_value("changeDetection")?)?
        } else {
            ChangeDetectionStrategy::Default
        },
        relative_context_file_path: source_url.to_string(),
        i18n_use_external_ids: true,
    })
}

fn get_interpolation<TExpression: AstNode>(
    meta_obj: &AstObject<'_, TExpression>,
) -> HostResult<(String, String), TExpression> {
    if !meta_obj.has("interpolation") {
        return Ok((
            DEFAULT_INTERPOLATION.0.to_string(),
            DEFAULT_INTERPOLATION.1.to_string(),
        ));
    }
    let markers = meta_obj
        .get_array("interpolation")?
        .iter()
        .map(AstValue::get_string)
        .collect::<HostResult<Vec<_>, TExpression>>()?;
    match <[String; 2]>::try_from(markers) {
        Ok([start, end]) => Ok((start, end)),
        Err(_) => Err(FatalLinkerError::new(
            meta_obj.get_node("interpolation")?,
            "Unsupported interpolation config, expected an array containing exactly two strings",
        )),
    }
}

fn parse_encapsulation<TExpression: AstNode>(
    encapsulation: &AstValue<'_, TExpression>,
) -> HostResult<ViewEncapsulation, TExpression> {
    let symbol_name = encapsulation.get_symbol_name().ok_or_else(|| {
        FatalLinkerError::new(
            encapsulation.expression.clone(),
            "Expected encapsulation to have a symbol name",
        )
    })?;
    ViewEncapsulation::from_symbol_name(&symbol_name).ok_or_else(|| {
        FatalLinkerError::new(encapsulation.expression.clone(), "Unsupported encapsulation")
    })
}

fn parse_change_detection_strategy<TExpression: AstNode>(
    change_detection_strategy: &AstValue<'_, TExpression>,
) -> HostResult<ChangeDetectionStrategy, TExpression> {
    let symbol_name = change_detection_strategy.get_symbol_name().ok_or_else(|| {
        FatalLinkerError::new(
            change_detection_strategy.expression.clone(),
            "Expected change detection strategy to have a symbol name",
        )
    })?;
    ChangeDetectionStrategy::from_symbol_name(&symbol_name).ok_or_else(|| {
        FatalLinkerError::new(
            change_detection_strategy.expression.clone(),
            "Unsupported change detection strategy",
        )
    })
}

/// The range of the template contents, without the quotes around the literal.
fn get_template_range<TExpression: AstNode>(
    template_node: &AstValue<'_, TExpression>,
    code: &str,
) -> HostResult<TemplateRange, TExpression> {
    let range = template_node.get_range()?;
    let literal = code.get(range.start_pos..range.end_pos).unwrap_or("");

    let quote = literal.chars().next();
    let is_quoted = literal.len() >= 2
        && matches!(quote, Some('"') | Some('\'') | Some('`'))
        && literal.chars().last() == quote;
    if !is_quoted {
        return Err(FatalLinkerError::new(
            template_node.expression.clone(),
            format!(
                "Expected the template string to be wrapped in quotes but got: {}",
                literal
            ),
        ));
    }

    Ok(TemplateRange {
        start_pos: range.start_pos + 1,
        end_pos: range.end_pos - 1,
        start_line: range.start_line,
        start_col: range.start_col + 1,
    })
}
