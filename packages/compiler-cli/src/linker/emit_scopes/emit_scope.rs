use angular_compiler::constant_pool::ConstantPool;
use angular_compiler::output::output_ast as o;

use crate::linker::ast::AstNode;
use crate::linker::error::{FatalLinkerError, LinkerError};
use crate::linker::linker_environment::LinkerEnvironment;
use crate::linker::linker_import_generator::LinkerImportGenerator;
use crate::ngtsc::translator::TranslateError;

use super::Emit;

/// Collects the constants of every declaration linked within one lexical scope, so they can be
/// emitted together at the scope's insertion point.
pub struct EmitScope<TExpression> {
    pub ng_import: TExpression,
    pub constant_pool: ConstantPool,
}

impl<TExpression: AstNode> EmitScope<TExpression> {
    pub fn new(ng_import: TExpression) -> Self {
        Self {
            ng_import,
            constant_pool: ConstantPool::new(),
        }
    }

    /// Translates a linked definition; `@angular/core` symbols are read off `ngImport`.
    pub fn translate_definition<TStatement>(
        &self,
        environment: &LinkerEnvironment<'_, TStatement, TExpression>,
        definition: &o::Expression,
    ) -> Result<TExpression, LinkerError<TExpression>> {
        let imports = LinkerImportGenerator::new(self.ng_import.clone());
        environment
            .translator
            .translate_expression(definition, &imports)
            .map_err(|error| translation_error(&self.ng_import, error))
    }

    /// The pool's statements translated for the host, in declaration order.
    pub fn get_constant_statements<TStatement>(
        &self,
        environment: &LinkerEnvironment<'_, TStatement, TExpression>,
    ) -> Result<Vec<TStatement>, LinkerError<TExpression>> {
        let imports = LinkerImportGenerator::new(self.ng_import.clone());
        self.constant_pool
            .statements
            .iter()
            .map(|statement| {
                environment
                    .translator
                    .translate_statement(statement, &imports)
                    .map_err(|error| translation_error(&self.ng_import, error))
            })
            .collect()
    }
}

impl<TStatement, TExpression: AstNode> Emit<TStatement, TExpression> for EmitScope<TExpression> {
    fn constant_pool_mut(&mut self) -> &mut ConstantPool {
        &mut self.constant_pool
    }

    fn translate_definition(
        &self,
        environment: &LinkerEnvironment<'_, TStatement, TExpression>,
        definition: &o::Expression,
    ) -> Result<TExpression, LinkerError<TExpression>> {
        EmitScope::translate_definition(self, environment, definition)
    }
}

/// Import failures are the declaration's fault, so they are reported against its `ngImport`.
pub(super) fn translation_error<TExpression: AstNode>(
    ng_import: &TExpression,
    error: TranslateError,
) -> LinkerError<TExpression> {
    match error {
        TranslateError::UnsupportedImport { .. } => {
            FatalLinkerError::new(ng_import.clone(), error.to_string()).into()
        }
        other => LinkerError::Translate(other),
    }
}
