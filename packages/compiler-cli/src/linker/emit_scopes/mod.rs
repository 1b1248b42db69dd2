//! Emit Scopes
//!
//! Where the constants of linked declarations end up.

pub mod emit_scope;
pub mod local_emit_scope;

use angular_compiler::constant_pool::ConstantPool;
use angular_compiler::output::output_ast as o;

use crate::linker::ast::AstNode;
use crate::linker::error::LinkerError;
use crate::linker::linker_environment::LinkerEnvironment;

pub use emit_scope::EmitScope;
pub use local_emit_scope::LocalEmitScope;

/// What a partial linker needs from the scope it links into.
pub trait Emit<TStatement, TExpression: AstNode> {
    fn constant_pool_mut(&mut self) -> &mut ConstantPool;

    fn translate_definition(
        &self,
        environment: &LinkerEnvironment<'_, TStatement, TExpression>,
        definition: &o::Expression,
    ) -> Result<TExpression, LinkerError<TExpression>>;
}
