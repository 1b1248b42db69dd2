use std::rc::Rc;

use angular_compiler::constant_pool::ConstantPool;
use angular_compiler::output::output_ast as o;
use angular_compiler::render3::view::api::{
    R3DirectiveMetadata, R3HostMetadata, R3HostSpecialAttributes, R3QueryMetadata,
    R3QueryPredicate, TemplateCompiler,
};
use angular_compiler::render3::view::compiler::compile_directive_from_metadata;
use angular_compiler::render3::view::util::InputMapping;
use indexmap::IndexMap;

use crate::linker::ast::{AstNode, HostResult};
use crate::linker::ast_value::{AstObject, AstValue};
use crate::linker::error::FatalLinkerError;
use crate::linker::partial_linker::PartialLinker;

use super::util::{get_type, wrap_reference};

/// Links `ɵɵngDeclareDirective()` calls into `ɵɵdefineDirective()` calls.
pub struct PartialDirectiveLinker1 {
    template_compiler: Rc<dyn TemplateCompiler>,
}

impl PartialDirectiveLinker1 {
    pub fn new(template_compiler: Rc<dyn TemplateCompiler>) -> Self {
        Self { template_compiler }
    }
}

impl<TExpression: AstNode> PartialLinker<TExpression> for PartialDirectiveLinker1 {
    fn link_partial_declaration(
        &self,
        _source_url: &str,
        _code: &str,
        constant_pool: &mut ConstantPool,
        meta_obj: &AstObject<'_, TExpression>,
    ) -> Result<o::Expression, FatalLinkerError<TExpression>> {
        let meta = to_r3_directive_meta(meta_obj)?;
        let def = compile_directive_from_metadata(&meta, constant_pool, self.template_compiler.as_ref())
            .map_err(|errors| {
                FatalLinkerError::new(meta_obj.expression.clone(), errors.to_string())
            })?;
        Ok(def.expression)
    }
}

/// Derives the `R3DirectiveMetadata` from the metadata object. Components reuse this for the
/// fields they share with directives.
pub fn to_r3_directive_meta<TExpression: AstNode>(
    meta_obj: &AstObject<'_, TExpression>,
) -> HostResult<R3DirectiveMetadata, TExpression> {
    let (type_name, type_expr) = get_type(meta_obj)?;

    let inputs = if meta_obj.has("inputs") {
        meta_obj.get_object("inputs")?.to_literal(|value| to_input_mapping(&value))?
    } else {
        IndexMap::new()
    };
    let outputs = if meta_obj.has("outputs") {
        meta_obj.get_object("outputs")?.to_literal(|value| value.get_string())?
    } else {
        IndexMap::new()
    };
    let export_as = if meta_obj.has("exportAs") {
        Some(
            meta_obj
                .get_array("exportAs")?
                .iter()
                .map(AstValue::get_string)
                .collect::<HostResult<Vec<_>, TExpression>>()?,
        )
    } else {
        None
    };

    Ok(R3DirectiveMetadata {
        name: type_name,
        type_: wrap_reference(&type_expr),
        selector: if meta_obj.has("selector") {
            Some(meta_obj.get_string("selector")?)
        } else {
            None
        },
        queries: get_queries(meta_obj, "queries")?,
        view_queries: get_queries(meta_obj, "viewQueries")?,
        host: to_host_metadata(meta_obj)?,
        uses_on_changes: get_optional_boolean(meta_obj, "usesOnChanges")?,
        inputs,
        outputs,
        uses_inheritance: get_optional_boolean(meta_obj, "usesInheritance")?,
        full_inheritance: false,
        export_as,
        providers: if meta_obj.has("providers") {
            Some(meta_obj.get_opaque("providers")?)
        } else {
            None
        },
    })
}

fn get_optional_boolean<TExpression: AstNode>(
    meta_obj: &AstObject<'_, TExpression>,
    property_name: &str,
) -> HostResult<bool, TExpression> {
    if meta_obj.has(property_name) {
        meta_obj.get_boolean(property_name)
    } else {
        Ok(false)
    }
}

/// `inputs` entries are either `"publicName"` or `["publicName", "declaredName"]`.
fn to_input_mapping<TExpression: AstNode>(
    value: &AstValue<'_, TExpression>,
) -> HostResult<InputMapping, TExpression> {
    if value.is_string() {
        return Ok(InputMapping::Simple(value.get_string()?));
    }

    let values = value
        .get_array()?
        .iter()
        .map(AstValue::get_string)
        .collect::<HostResult<Vec<_>, TExpression>>()?;
    match <[String; 2]>::try_from(values) {
        Ok([public_name, declared_name]) => Ok(InputMapping::Aliased {
            public_name,
            declared_name,
        }),
        Err(_) => Err(FatalLinkerError::new(
            value.expression.clone(),
            "Unsupported input, expected a string or an array containing exactly two strings",
        )),
    }
}

fn get_queries<TExpression: AstNode>(
    meta_obj: &AstObject<'_, TExpression>,
    property_name: &str,
) -> HostResult<Vec<R3QueryMetadata>, TExpression> {
    if !meta_obj.has(property_name) {
        return Ok(Vec::new());
    }
    meta_obj
        .get_array(property_name)?
        .iter()
        .map(|entry| to_query_metadata(&entry.get_object()?))
        .collect()
}

fn to_query_metadata<TExpression: AstNode>(
    obj: &AstObject<'_, TExpression>,
) -> HostResult<R3QueryMetadata, TExpression> {
    let predicate_expr = obj.get_value("predicate")?;
    let predicate = if predicate_expr.is_array() {
        R3QueryPredicate::Selectors(
            predicate_expr
                .get_array()?
                .iter()
                .map(AstValue::get_string)
                .collect::<HostResult<Vec<_>, TExpression>>()?,
        )
    } else {
        R3QueryPredicate::Expression(predicate_expr.get_opaque())
    };

    Ok(R3QueryMetadata {
        property_name: obj.get_string("propertyName")?,
        first: get_optional_boolean(obj, "first")?,
        predicate,
        descendants: get_optional_boolean(obj, "descendants")?,
        emit_distinct_changes_only: if obj.has("emitDistinctChangesOnly") {
            obj.get_boolean("emitDistinctChangesOnly")?
        } else {
            true
        },
        read: if obj.has("read") {
            Some(obj.get_opaque("read")?)
        } else {
            None
        },
        static_: get_optional_boolean(obj, "static")?,
    })
}

fn to_host_metadata<TExpression: AstNode>(
    meta_obj: &AstObject<'_, TExpression>,
) -> HostResult<R3HostMetadata, TExpression> {
    if !meta_obj.has("host") {
        return Ok(R3HostMetadata::default());
    }
    let host = meta_obj.get_object("host")?;

    let mut special_attributes = R3HostSpecialAttributes::default();
    if host.has("styleAttribute") {
        special_attributes.style_attr = Some(host.get_string("styleAttribute")?);
    }
    if host.has("classAttribute") {
        special_attributes.class_attr = Some(host.get_string("classAttribute")?);
    }

    Ok(R3HostMetadata {
        attributes: if host.has("attributes") {
            host.get_object("attributes")?.to_literal(|value| Ok(value.get_opaque()))?
        } else {
            IndexMap::new()
        },
        listeners: if host.has("listeners") {
            host.get_object("listeners")?.to_literal(|value| value.get_string())?
        } else {
            IndexMap::new()
        },
        properties: if host.has("properties") {
            host.get_object("properties")?.to_literal(|value| value.get_string())?
        } else {
            IndexMap::new()
        },
        special_attributes,
    })
}
