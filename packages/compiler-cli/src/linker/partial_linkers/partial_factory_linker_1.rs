use angular_compiler::constant_pool::ConstantPool;
use angular_compiler::output::output_ast as o;
use angular_compiler::render3::r3_factory::{
    compile_factory_function, FactoryTarget, R3ConstructorFactoryMetadata, R3FactoryMetadata,
};

use crate::linker::ast::{AstNode, HostResult};
use crate::linker::ast_value::AstObject;
use crate::linker::error::FatalLinkerError;
use crate::linker::partial_linker::PartialLinker;

use super::util::{get_dependencies, get_type, parse_enum, wrap_reference};

/// Links `ɵɵngDeclareFactory()` calls into factory functions.
#[derive(Debug, Default)]
pub struct PartialFactoryLinker1;

impl PartialFactoryLinker1 {
    pub fn new() -> Self {
        Self
    }
}

impl<TExpression: AstNode> PartialLinker<TExpression> for PartialFactoryLinker1 {
    fn link_partial_declaration(
        &self,
        _source_url: &str,
        _code: &str,
        _constant_pool: &mut ConstantPool,
        meta_obj: &AstObject<'_, TExpression>,
    ) -> Result<o::Expression, FatalLinkerError<TExpression>> {
        let meta = to_r3_factory_meta(meta_obj)?;
        Ok(compile_factory_function(&R3FactoryMetadata::Constructor(meta)).expression)
    }
}

/// Derives the `R3ConstructorFactoryMetadata` from the metadata object.
pub fn to_r3_factory_meta<TExpression: AstNode>(
    meta_obj: &AstObject<'_, TExpression>,
) -> HostResult<R3ConstructorFactoryMetadata, TExpression> {
    let (name, type_expr) = get_type(meta_obj)?;
    Ok(R3ConstructorFactoryMetadata {
        name,
        type_: wrap_reference(&type_expr),
        deps: get_dependencies(meta_obj, "deps")?,
        target: parse_enum(
            &meta_obj.get_value("target")?,
            "FactoryTarget",
            FactoryTarget::from_symbol_name,
        )?,
    })
}
