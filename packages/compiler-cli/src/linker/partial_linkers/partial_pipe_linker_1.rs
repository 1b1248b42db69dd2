use angular_compiler::constant_pool::ConstantPool;
use angular_compiler::output::output_ast as o;
use angular_compiler::render3::r3_pipe_compiler::{compile_pipe_from_metadata, R3PipeMetadata};

use crate::linker::ast::{AstNode, HostResult};
use crate::linker::ast_value::AstObject;
use crate::linker::error::FatalLinkerError;
use crate::linker::partial_linker::PartialLinker;

use super::util::{get_type, wrap_reference};

/// Links `ɵɵngDeclarePipe()` calls into `ɵɵdefinePipe()` calls.
#[derive(Debug, Default)]
pub struct PartialPipeLinker1;

impl PartialPipeLinker1 {
    pub fn new() -> Self {
        Self
    }
}

impl<TExpression: AstNode> PartialLinker<TExpression> for PartialPipeLinker1 {
    fn link_partial_declaration(
        &self,
        _source_url: &str,
        _code: &str,
        _constant_pool: &mut ConstantPool,
        meta_obj: &AstObject<'_, TExpression>,
    ) -> Result<o::Expression, FatalLinkerError<TExpression>> {
        let meta = to_r3_pipe_meta(meta_obj)?;
        Ok(compile_pipe_from_metadata(&meta).expression)
    }
}

/// Derives the `R3PipeMetadata` from the metadata object; pipes are pure unless stated
/// otherwise.
pub fn to_r3_pipe_meta<TExpression: AstNode>(
    meta_obj: &AstObject<'_, TExpression>,
) -> HostResult<R3PipeMetadata, TExpression> {
    let (name, type_expr) = get_type(meta_obj)?;
    let pure = if meta_obj.has("pure") {
        meta_obj.get_boolean("pure")?
    } else {
        true
    };
    Ok(R3PipeMetadata {
        name,
        type_: wrap_reference(&type_expr),
        pipe_name: meta_obj.get_string("name")?,
        pure,
    })
}
