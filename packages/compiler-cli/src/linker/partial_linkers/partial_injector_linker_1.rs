use angular_compiler::constant_pool::ConstantPool;
use angular_compiler::output::output_ast as o;
use angular_compiler::render3::r3_injector_compiler::{compile_injector, R3InjectorMetadata};

use crate::linker::ast::{AstNode, HostResult};
use crate::linker::ast_value::{AstObject, AstValue};
use crate::linker::error::FatalLinkerError;
use crate::linker::partial_linker::PartialLinker;

use super::util::{get_type, wrap_reference};

/// Links `ɵɵngDeclareInjector()` calls into `ɵɵdefineInjector()` calls.
#[derive(Debug, Default)]
pub struct PartialInjectorLinker1;

impl PartialInjectorLinker1 {
    pub fn new() -> Self {
        Self
    }
}

impl<TExpression: AstNode> PartialLinker<TExpression> for PartialInjectorLinker1 {
    fn link_partial_declaration(
        &self,
        _source_url: &str,
        _code: &str,
        _constant_pool: &mut ConstantPool,
        meta_obj: &AstObject<'_, TExpression>,
    ) -> Result<o::Expression, FatalLinkerError<TExpression>> {
        let meta = to_r3_injector_meta(meta_obj)?;
        Ok(compile_injector(&meta).expression)
    }
}

/// Derives the `R3InjectorMetadata` from the metadata object.
pub fn to_r3_injector_meta<TExpression: AstNode>(
    meta_obj: &AstObject<'_, TExpression>,
) -> HostResult<R3InjectorMetadata, TExpression> {
    let (name, type_expr) = get_type(meta_obj)?;
    Ok(R3InjectorMetadata {
        name,
        type_: wrap_reference(&type_expr),
        providers: if meta_obj.has("providers") {
            Some(meta_obj.get_opaque("providers")?)
        } else {
            None
        },
        imports: if meta_obj.has("imports") {
            meta_obj
                .get_array("imports")?
                .iter()
                .map(AstValue::get_opaque)
                .collect()
        } else {
            Vec::new()
        },
    })
}
