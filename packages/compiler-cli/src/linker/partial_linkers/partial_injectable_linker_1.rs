use angular_compiler::constant_pool::ConstantPool;
use angular_compiler::injectable_compiler_2::{compile_injectable, R3InjectableMetadata};
use angular_compiler::output::output_ast as o;

use crate::linker::ast::{AstNode, HostResult};
use crate::linker::ast_value::AstObject;
use crate::linker::error::FatalLinkerError;
use crate::linker::partial_linker::PartialLinker;

use super::util::{extract_forward_ref, get_dependency, get_type, wrap_reference};

/// Links `ɵɵngDeclareInjectable()` calls into `ɵɵdefineInjectable()` calls.
#[derive(Debug, Default)]
pub struct PartialInjectableLinker1;

impl PartialInjectableLinker1 {
    pub fn new() -> Self {
        Self
    }
}

impl<TExpression: AstNode> PartialLinker<TExpression> for PartialInjectableLinker1 {
    fn link_partial_declaration(
        &self,
        _source_url: &str,
        _code: &str,
        _constant_pool: &mut ConstantPool,
        meta_obj: &AstObject<'_, TExpression>,
    ) -> Result<o::Expression, FatalLinkerError<TExpression>> {
        let meta = to_r3_injectable_meta(meta_obj)?;
        Ok(compile_injectable(&meta).expression)
    }
}

/// Derives the `R3InjectableMetadata` from the metadata object.
pub fn to_r3_injectable_meta<TExpression: AstNode>(
    meta_obj: &AstObject<'_, TExpression>,
) -> HostResult<R3InjectableMetadata, TExpression> {
    let (name, type_expr) = get_type(meta_obj)?;

    let forward_ref = |property_name: &str| -> HostResult<Option<o::Expression>, TExpression> {
        if meta_obj.has(property_name) {
            Ok(Some(extract_forward_ref(&meta_obj.get_value(property_name)?)?))
        } else {
            Ok(None)
        }
    };

    Ok(R3InjectableMetadata {
        name,
        type_: wrap_reference(&type_expr),
        provided_in: forward_ref("providedIn")?.unwrap_or_else(|| *o::literal(o::LiteralValue::Null)),
        use_class: forward_ref("useClass")?,
        use_factory: if meta_obj.has("useFactory") {
            Some(meta_obj.get_opaque("useFactory")?)
        } else {
            None
        },
        use_existing: forward_ref("useExisting")?,
        use_value: forward_ref("useValue")?,
        deps: if meta_obj.has("deps") {
            Some(
                meta_obj
                    .get_array("deps")?
                    .iter()
                    .map(|dep| get_dependency(&dep.get_object()?))
                    .collect::<HostResult<Vec<_>, TExpression>>()?,
            )
        } else {
            None
        },
    })
}
