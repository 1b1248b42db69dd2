use angular_compiler::output::output_ast as o;
use thiserror::Error;

use crate::ngtsc::translator::src::api::ast_factory::{
    ArrowFunctionBody, AstFactory, BinaryOperator, LiteralValue, ObjectLiteralProperty,
    UnaryOperator, VariableDeclarationType,
};
use crate::ngtsc::translator::src::api::import_generator::ImportGenerator;
use crate::ngtsc::translator::src::context::Context;

/// Output AST that cannot be expressed in the target host AST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    #[error("Invalid import without name nor moduleName")]
    InvalidImport,
    #[error("Unable to import from anything other than '{allowed}'")]
    UnsupportedImport { allowed: String, requested: String },
    #[error("Unable to translate a wrapped node that the host did not record")]
    UnresolvedWrappedNode,
}

pub type RecordWrappedNodeFn<'a, TExpression> =
    Box<dyn Fn(&o::WrappedNodeExpr) -> Option<TExpression> + 'a>;

pub struct TranslatorOptions<'a, TExpression> {
    pub downlevel_variable_declarations: bool,
    pub record_wrapped_node: Option<RecordWrappedNodeFn<'a, TExpression>>,
}

impl<'a, TExpression> Default for TranslatorOptions<'a, TExpression> {
    fn default() -> Self {
        Self {
            downlevel_variable_declarations: false,
            record_wrapped_node: None,
        }
    }
}

type TranslateResult<T> = Result<T, TranslateError>;

pub struct ExpressionTranslatorVisitor<'a, A: AstFactory + ?Sized> {
    factory: &'a A,
    imports: &'a dyn ImportGenerator<A::Expression>,
    downlevel_variable_declarations: bool,
    record_wrapped_node: Option<RecordWrappedNodeFn<'a, A::Expression>>,
}

impl<'a, A: AstFactory + ?Sized> ExpressionTranslatorVisitor<'a, A> {
    pub fn new(
        factory: &'a A,
        imports: &'a dyn ImportGenerator<A::Expression>,
        options: TranslatorOptions<'a, A::Expression>,
    ) -> Self {
        Self {
            factory,
            imports,
            downlevel_variable_declarations: options.downlevel_variable_declarations,
            record_wrapped_node: options.record_wrapped_node,
        }
    }

    // Main entry points matching on Enums
    pub fn visit_statement(
        &self,
        stmt: &o::Statement,
        context: Context,
    ) -> TranslateResult<A::Statement> {
        match stmt {
            o::Statement::DeclareVar(s) => self.visit_declare_var_stmt(s, context),
            o::Statement::DeclareFn(s) => self.visit_declare_fn_stmt(s, context),
            o::Statement::Expression(s) => self.visit_expression_stmt(s, context),
            o::Statement::Return(s) => self.visit_return_stmt(s, context),
            o::Statement::IfStmt(s) => self.visit_if_stmt(s, context),
        }
    }

    pub fn visit_expression(
        &self,
        expr: &o::Expression,
        context: Context,
    ) -> TranslateResult<A::Expression> {
        match expr {
            o::Expression::ReadVar(e) => Ok(self.factory.create_identifier(&e.name)),
            o::Expression::InvokeFn(e) => self.visit_invoke_fn_expr(e, context),
            o::Expression::Instantiate(e) => self.visit_instantiate_expr(e, context),
            o::Expression::Literal(e) => Ok(self.visit_literal_expr(e)),
            o::Expression::External(e) => self.visit_external_expr(e),
            o::Expression::Conditional(e) => self.visit_conditional_expr(e, context),
            o::Expression::NotExpr(e) => Ok(self.factory.create_unary_expression(
                UnaryOperator::Not,
                self.visit_expression(&e.condition, context.with_expression_mode())?,
            )),
            o::Expression::Fn(e) => self.visit_function_expr(e, context),
            o::Expression::ArrowFn(e) => self.visit_arrow_function_expr(e, context),
            o::Expression::BinaryOp(e) => self.visit_binary_operator_expr(e, context),
            o::Expression::ReadProp(e) => Ok(self.factory.create_property_access(
                self.visit_expression(&e.receiver, context.with_expression_mode())?,
                &e.name,
            )),
            o::Expression::ReadKey(e) => Ok(self.factory.create_element_access(
                self.visit_expression(&e.receiver, context.with_expression_mode())?,
                self.visit_expression(&e.index, context.with_expression_mode())?,
            )),
            o::Expression::LiteralArray(e) => Ok(self
                .factory
                .create_array_literal(self.visit_expressions(&e.entries, context)?)),
            o::Expression::LiteralMap(e) => self.visit_literal_map_expr(e, context),
            o::Expression::WrappedNode(e) => self.visit_wrapped_node_expr(e),
            o::Expression::TypeOf(e) => Ok(self.factory.create_type_of_expression(
                self.visit_expression(&e.expr, context.with_expression_mode())?,
            )),
            o::Expression::Unary(e) => self.visit_unary_operator_expr(e, context),
            // Pool placeholders translate to whatever the pool settled on.
            o::Expression::Fixup(e) => self.visit_expression(&e.resolved(), context),
        }
    }

    fn visit_declare_var_stmt(
        &self,
        stmt: &o::DeclareVarStmt,
        context: Context,
    ) -> TranslateResult<A::Statement> {
        let var_type = if self.downlevel_variable_declarations {
            VariableDeclarationType::Var
        } else if stmt.modifiers == o::StmtModifier::Final {
            VariableDeclarationType::Const
        } else {
            VariableDeclarationType::Let
        };

        let initializer = match &stmt.value {
            Some(value) => Some(self.visit_expression(value, context.with_expression_mode())?),
            None => None,
        };

        Ok(self
            .factory
            .create_variable_declaration(&stmt.name, initializer, var_type))
    }

    fn visit_declare_fn_stmt(
        &self,
        stmt: &o::DeclareFunctionStmt,
        context: Context,
    ) -> TranslateResult<A::Statement> {
        let body = self
            .factory
            .create_block(self.visit_statements(&stmt.statements, context.with_statement_mode())?);
        let params = stmt.params.iter().map(|p| p.name.clone()).collect();
        Ok(self
            .factory
            .create_function_declaration(&stmt.name, params, body))
    }

    fn visit_expression_stmt(
        &self,
        stmt: &o::ExpressionStatement,
        context: Context,
    ) -> TranslateResult<A::Statement> {
        Ok(self.factory.create_expression_statement(
            self.visit_expression(&stmt.expr, context.with_statement_mode())?,
        ))
    }

    fn visit_return_stmt(
        &self,
        stmt: &o::ReturnStatement,
        context: Context,
    ) -> TranslateResult<A::Statement> {
        Ok(self.factory.create_return_statement(Some(
            self.visit_expression(&stmt.value, context.with_expression_mode())?,
        )))
    }

    fn visit_if_stmt(&self, stmt: &o::IfStmt, context: Context) -> TranslateResult<A::Statement> {
        let condition = self.visit_expression(&stmt.condition, context.with_expression_mode())?;
        let true_case = self
            .factory
            .create_block(self.visit_statements(&stmt.true_case, context.with_statement_mode())?);
        let false_case = if !stmt.false_case.is_empty() {
            Some(self.factory.create_block(
                self.visit_statements(&stmt.false_case, context.with_statement_mode())?,
            ))
        } else {
            None
        };
        Ok(self
            .factory
            .create_if_statement(condition, true_case, false_case))
    }

    fn visit_invoke_fn_expr(
        &self,
        ast: &o::InvokeFunctionExpr,
        context: Context,
    ) -> TranslateResult<A::Expression> {
        let callee = self.visit_expression(&ast.fn_, context.with_expression_mode())?;
        let args = self.visit_expressions(&ast.args, context)?;
        Ok(self.factory.create_call_expression(callee, args, ast.pure))
    }

    fn visit_instantiate_expr(
        &self,
        ast: &o::InstantiateExpr,
        context: Context,
    ) -> TranslateResult<A::Expression> {
        let class_expr = self.visit_expression(&ast.class_expr, context.with_expression_mode())?;
        let args = self.visit_expressions(&ast.args, context)?;
        Ok(self.factory.create_new_expression(class_expr, args))
    }

    fn visit_literal_expr(&self, ast: &o::LiteralExpr) -> A::Expression {
        let value = match &ast.value {
            o::LiteralValue::Null => LiteralValue::Null,
            o::LiteralValue::Undefined => LiteralValue::Undefined,
            o::LiteralValue::String(s) => LiteralValue::String(s),
            o::LiteralValue::Number(n) => LiteralValue::Number(*n),
            o::LiteralValue::Bool(b) => LiteralValue::Boolean(*b),
        };
        self.factory.create_literal(value)
    }

    fn visit_external_expr(&self, ast: &o::ExternalExpr) -> TranslateResult<A::Expression> {
        let module_name = match &ast.value.module_name {
            Some(module_name) => module_name,
            // No module name means an ambient global.
            None => {
                return match &ast.value.name {
                    Some(name) => Ok(self.factory.create_identifier(name)),
                    None => Err(TranslateError::InvalidImport),
                }
            }
        };

        let name = match &ast.value.name {
            Some(name) => name,
            None => return self.imports.generate_namespace_import(module_name),
        };

        let named = self.imports.generate_named_import(module_name, name)?;
        Ok(match named.module_import {
            Some(module_import) => self
                .factory
                .create_property_access(module_import, &named.symbol),
            None => self.factory.create_identifier(&named.symbol),
        })
    }

    fn visit_conditional_expr(
        &self,
        ast: &o::ConditionalExpr,
        context: Context,
    ) -> TranslateResult<A::Expression> {
        let context = context.with_expression_mode();
        let else_expression = match &ast.false_case {
            Some(false_case) => self.visit_expression(false_case, context)?,
            None => self.factory.create_literal(LiteralValue::Null),
        };
        Ok(self.factory.create_conditional(
            self.visit_expression(&ast.condition, context)?,
            self.visit_expression(&ast.true_case, context)?,
            else_expression,
        ))
    }

    fn visit_function_expr(
        &self,
        ast: &o::FunctionExpr,
        context: Context,
    ) -> TranslateResult<A::Expression> {
        let body = self
            .factory
            .create_block(self.visit_statements(&ast.statements, context.with_statement_mode())?);
        let params = ast.params.iter().map(|p| p.name.clone()).collect();
        Ok(self
            .factory
            .create_function_expression(ast.name.as_deref(), params, body))
    }

    fn visit_arrow_function_expr(
        &self,
        ast: &o::ArrowFunctionExpr,
        context: Context,
    ) -> TranslateResult<A::Expression> {
        let params = ast.params.iter().map(|p| p.name.clone()).collect();
        let body = match &ast.body {
            o::ArrowFunctionBody::Expression(expr) => {
                ArrowFunctionBody::Expr(self.visit_expression(expr, context.with_expression_mode())?)
            }
            o::ArrowFunctionBody::Statements(statements) => ArrowFunctionBody::Stmt(
                self.factory
                    .create_block(self.visit_statements(statements, context.with_statement_mode())?),
            ),
        };
        Ok(self.factory.create_arrow_function_expression(params, body))
    }

    fn visit_binary_operator_expr(
        &self,
        ast: &o::BinaryOperatorExpr,
        context: Context,
    ) -> TranslateResult<A::Expression> {
        let lhs = self.visit_expression(&ast.lhs, context.with_expression_mode())?;
        let rhs = self.visit_expression(&ast.rhs, context.with_expression_mode())?;
        let operator = map_binary_operator(ast.operator);
        if operator == BinaryOperator::Assign {
            let assignment = self.factory.create_assignment(lhs, operator, rhs);
            return Ok(if context.is_statement {
                assignment
            } else {
                self.factory.create_parenthesized_expression(assignment)
            });
        }
        Ok(self.factory.create_binary_expression(lhs, operator, rhs))
    }

    fn visit_literal_map_expr(
        &self,
        ast: &o::LiteralMapExpr,
        context: Context,
    ) -> TranslateResult<A::Expression> {
        let mut properties = Vec::with_capacity(ast.entries.len());
        for entry in &ast.entries {
            properties.push(ObjectLiteralProperty {
                property_name: entry.key.clone(),
                value: self.visit_expression(&entry.value, context.with_expression_mode())?,
                quoted: entry.quoted,
            });
        }
        Ok(self.factory.create_object_literal(properties))
    }

    fn visit_unary_operator_expr(
        &self,
        ast: &o::UnaryOperatorExpr,
        context: Context,
    ) -> TranslateResult<A::Expression> {
        let operator = match ast.operator {
            o::UnaryOperator::Minus => UnaryOperator::Minus,
            o::UnaryOperator::Plus => UnaryOperator::Plus,
        };
        let expr = self.factory.create_unary_expression(
            operator,
            self.visit_expression(&ast.expr, context.with_expression_mode())?,
        );
        Ok(if ast.parens {
            self.factory.create_parenthesized_expression(expr)
        } else {
            expr
        })
    }

    fn visit_wrapped_node_expr(&self, e: &o::WrappedNodeExpr) -> TranslateResult<A::Expression> {
        self.record_wrapped_node
            .as_ref()
            .and_then(|record| record(e))
            .ok_or(TranslateError::UnresolvedWrappedNode)
    }

    fn visit_expressions(
        &self,
        expressions: &[o::Expression],
        context: Context,
    ) -> TranslateResult<Vec<A::Expression>> {
        expressions
            .iter()
            .map(|e| self.visit_expression(e, context.with_expression_mode()))
            .collect()
    }

    // Helper to visit statements
    fn visit_statements(
        &self,
        statements: &[o::Statement],
        context: Context,
    ) -> TranslateResult<Vec<A::Statement>> {
        statements
            .iter()
            .map(|s| self.visit_statement(s, context))
            .collect()
    }
}

fn map_binary_operator(op: o::BinaryOperator) -> BinaryOperator {
    match op {
        o::BinaryOperator::Equals => BinaryOperator::Equals,
        o::BinaryOperator::NotEquals => BinaryOperator::NotEquals,
        o::BinaryOperator::Assign => BinaryOperator::Assign,
        o::BinaryOperator::Identical => BinaryOperator::IdentityEquals,
        o::BinaryOperator::NotIdentical => BinaryOperator::IdentityNotEquals,
        o::BinaryOperator::Minus => BinaryOperator::Minus,
        o::BinaryOperator::Plus => BinaryOperator::Plus,
        o::BinaryOperator::Divide => BinaryOperator::Divide,
        o::BinaryOperator::Multiply => BinaryOperator::Multiply,
        o::BinaryOperator::Modulo => BinaryOperator::Modulo,
        o::BinaryOperator::And => BinaryOperator::And,
        o::BinaryOperator::Or => BinaryOperator::Or,
        o::BinaryOperator::BitwiseOr => BinaryOperator::BitOr,
        o::BinaryOperator::BitwiseAnd => BinaryOperator::BitAnd,
        o::BinaryOperator::Lower => BinaryOperator::Less,
        o::BinaryOperator::LowerEquals => BinaryOperator::LessEquals,
        o::BinaryOperator::Bigger => BinaryOperator::Greater,
        o::BinaryOperator::BiggerEquals => BinaryOperator::GreaterEquals,
        o::BinaryOperator::NullishCoalesce => BinaryOperator::NullishCoalesce,
    }
}
