use angular_compiler::constant_pool::ConstantPool;
use angular_compiler::output::output_ast as o;

use crate::linker::ast::AstNode;
use crate::linker::error::LinkerError;
use crate::linker::linker_environment::LinkerEnvironment;

use super::emit_scope::EmitScope;
use super::Emit;

/// An emit scope for a declaration whose constants have nowhere to go.
///
/// The definition is wrapped in an immediately invoked function that declares its own
/// constants: `(function(){const _c0=[...];return <definition>;})()`.
pub struct LocalEmitScope<TExpression> {
    scope: EmitScope<TExpression>,
}

impl<TExpression: AstNode> LocalEmitScope<TExpression> {
    pub fn new(ng_import: TExpression) -> Self {
        Self {
            scope: EmitScope::new(ng_import),
        }
    }

    pub fn translate_definition<TStatement>(
        &self,
        environment: &LinkerEnvironment<'_, TStatement, TExpression>,
        definition: &o::Expression,
    ) -> Result<TExpression, LinkerError<TExpression>> {
        let factory = environment.factory;
        let mut statements = self.scope.get_constant_statements(environment)?;
        let value = self.scope.translate_definition(environment, definition)?;
        statements.push(factory.create_return_statement(Some(value)));
        let body = factory.create_block(statements);
        let function = factory.create_function_expression(None, vec![], body);
        Ok(factory.create_call_expression(function, vec![], false))
    }

    /// Constants never leave the wrapper function, so asking for them is a driver bug.
    pub fn get_constant_statements<TStatement>(
        &self,
    ) -> Result<Vec<TStatement>, LinkerError<TExpression>> {
        Err(LinkerError::Invariant(
            "LocalEmitScope should not expose any constant statements".to_string(),
        ))
    }
}

impl<TStatement, TExpression: AstNode> Emit<TStatement, TExpression>
    for LocalEmitScope<TExpression>
{
    fn constant_pool_mut(&mut self) -> &mut ConstantPool {
        &mut self.scope.constant_pool
    }

    fn translate_definition(
        &self,
        environment: &LinkerEnvironment<'_, TStatement, TExpression>,
        definition: &o::Expression,
    ) -> Result<TExpression, LinkerError<TExpression>> {
        LocalEmitScope::translate_definition(self, environment, definition)
    }
}
