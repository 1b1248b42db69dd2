//! Output AST to host AST translation for linked definitions.

use angular_compiler::output::output_ast as o;

use crate::linker::ast::{AstHost, AstNode};
use crate::ngtsc::translator::{
    AstFactory, Context, ExpressionTranslatorVisitor, ImportGenerator, TranslateError,
    TranslatorOptions,
};

/// Translates output AST through the environment's factory, resolving wrapped nodes through the
/// host that wrapped them.
pub struct Translator<'e, TStatement, TExpression: AstNode> {
    factory: &'e dyn AstFactory<Statement = TStatement, Expression = TExpression>,
    host: &'e dyn AstHost<TExpression>,
}

impl<'e, TStatement, TExpression: AstNode> Translator<'e, TStatement, TExpression> {
    pub fn new(
        factory: &'e dyn AstFactory<Statement = TStatement, Expression = TExpression>,
        host: &'e dyn AstHost<TExpression>,
    ) -> Self {
        Self { factory, host }
    }

    pub fn translate_expression(
        &self,
        expression: &o::Expression,
        imports: &dyn ImportGenerator<TExpression>,
    ) -> Result<TExpression, TranslateError> {
        let visitor = ExpressionTranslatorVisitor::new(self.factory, imports, self.options());
        visitor.visit_expression(expression, Context::new(false))
    }

    pub fn translate_statement(
        &self,
        statement: &o::Statement,
        imports: &dyn ImportGenerator<TExpression>,
    ) -> Result<TStatement, TranslateError> {
        let visitor = ExpressionTranslatorVisitor::new(self.factory, imports, self.options());
        visitor.visit_statement(statement, Context::new(true))
    }

    fn options(&self) -> TranslatorOptions<'e, TExpression> {
        let host = self.host;
        TranslatorOptions {
            downlevel_variable_declarations: false,
            record_wrapped_node: Some(Box::new(move |wrapped: &o::WrappedNodeExpr| {
                host.unwrap_node(wrapped)
            })),
        }
    }
}
