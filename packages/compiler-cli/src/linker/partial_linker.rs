use angular_compiler::constant_pool::ConstantPool;
use angular_compiler::output::output_ast as o;

use crate::linker::ast::AstNode;
use crate::linker::ast_value::AstObject;
use crate::linker::error::FatalLinkerError;

/// Turns the metadata object of one declaration kind and version into a definition expression.
///
/// Implementations are stateless: everything a link depends on arrives through the arguments.
/// Constants the definition needs are registered in `constant_pool` rather than inlined.
pub trait PartialLinker<TExpression: AstNode> {
    fn link_partial_declaration(
        &self,
        source_url: &str,
        code: &str,
        constant_pool: &mut ConstantPool,
        meta_obj: &AstObject<'_, TExpression>,
    ) -> Result<o::Expression, FatalLinkerError<TExpression>>;
}
