//! OXC AST Host Implementation
//!
//! Implements the `AstHost` trait over expressions parsed by `oxc_parser`, plus the source text
//! produced for replacements.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use angular_compiler::output::output_ast as o;
use indexmap::IndexMap;
use oxc_ast::ast::{
    ArrayExpressionElement, Expression, FunctionBody, ObjectPropertyKind, PropertyKey,
    PropertyKind, Statement,
};
use oxc_span::{GetSpan, Span};
use oxc_syntax::operator::UnaryOperator;

use crate::linker::ast::{AstHost, AstNode, ExpressionKind, HostResult, Range};
use crate::linker::error::FatalLinkerError;

/// Operator precedence of printed JavaScript, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    Sequence,
    Assignment,
    Conditional,
    Nullish,
    LogicalOr,
    LogicalAnd,
    BitOr,
    BitXor,
    BitAnd,
    Equality,
    Relational,
    Shift,
    Additive,
    Multiplicative,
    Exponent,
    Unary,
    Postfix,
    Call,
    Member,
    Primary,
}

/// JavaScript source built by `OxcAstFactory`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsCode {
    pub text: String,
    pub precedence: Precedence,
}

impl JsCode {
    pub fn new(text: impl Into<String>, precedence: Precedence) -> Self {
        Self {
            text: text.into(),
            precedence,
        }
    }
}

/// An expression of the linked file: either parsed from the source, or generated.
#[derive(Debug, Clone)]
pub enum OxcNode<'a> {
    Expression(&'a Expression<'a>),
    Code(JsCode),
}

impl<'a> AstNode for OxcNode<'a> {}

impl<'a> OxcNode<'a> {
    pub fn as_expression(&self) -> Option<&'a Expression<'a>> {
        match self {
            OxcNode::Expression(expression) => Some(expression),
            OxcNode::Code(_) => None,
        }
    }
}

/// What a `WrappedNodeExpr` created by `OxcAstHost` carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NodeHandle {
    host_id: usize,
    index: usize,
}

static NEXT_HOST_ID: AtomicUsize = AtomicUsize::new(0);

pub struct OxcAstHost<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
    host_id: usize,
    wrapped_nodes: RefCell<Vec<OxcNode<'a>>>,
    /// Wrapping the same source node twice yields the same `WrappedNodeExpr`.
    wrapped_by_address: RefCell<HashMap<usize, o::WrappedNodeExpr>>,
}

impl<'a> OxcAstHost<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(index, _)| index + 1))
            .collect();
        Self {
            source,
            line_starts,
            host_id: NEXT_HOST_ID.fetch_add(1, Ordering::Relaxed),
            wrapped_nodes: RefCell::new(Vec::new()),
            wrapped_by_address: RefCell::new(HashMap::new()),
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    /// 0-based line and column of a byte offset.
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next_line) => next_line - 1,
        };
        (line, offset - self.line_starts[line])
    }

    /// The range covered by a span of the source.
    pub fn span_range(&self, span: Span) -> Range {
        let (start_line, start_col) = self.line_col(span.start as usize);
        Range {
            start_pos: span.start as usize,
            start_line,
            start_col,
            end_pos: span.end as usize,
        }
    }

    fn expression(
        &self,
        node: &OxcNode<'a>,
        expected: &str,
    ) -> HostResult<&'a Expression<'a>, OxcNode<'a>> {
        node.as_expression()
            .ok_or_else(|| unsupported_syntax(node.clone(), expected))
    }
}

fn unsupported_syntax<'a>(node: OxcNode<'a>, expected: &str) -> FatalLinkerError<OxcNode<'a>> {
    FatalLinkerError::new(node, format!("Unsupported syntax, expected {}.", expected))
}

/// `!0` and `!1`, as minifiers write `true` and `false`.
fn minified_boolean(expression: &Expression<'_>) -> Option<bool> {
    match expression {
        Expression::UnaryExpression(unary) if unary.operator == UnaryOperator::LogicalNot => {
            match &unary.argument {
                Expression::NumericLiteral(num) if num.value == 0.0 => Some(true),
                Expression::NumericLiteral(num) if num.value == 1.0 => Some(false),
                _ => None,
            }
        }
        _ => None,
    }
}

/// The single `return` of a function body.
fn single_return_value<'a>(body: &'a FunctionBody<'a>) -> Option<&'a Expression<'a>> {
    match body.statements.as_slice() {
        [Statement::ReturnStatement(statement)] => statement.argument.as_ref(),
        _ => None,
    }
}

impl<'a> AstHost<OxcNode<'a>> for OxcAstHost<'a> {
    fn kind(&self, node: &OxcNode<'a>) -> ExpressionKind {
        let expression = match node {
            OxcNode::Expression(expression) => *expression,
            OxcNode::Code(_) => return ExpressionKind::Other,
        };
        if minified_boolean(expression).is_some() {
            return ExpressionKind::BooleanLiteral;
        }
        match expression {
            Expression::StringLiteral(_) => ExpressionKind::StringLiteral,
            Expression::TemplateLiteral(template) if template.expressions.is_empty() => {
                ExpressionKind::StringLiteral
            }
            Expression::NumericLiteral(_) => ExpressionKind::NumericLiteral,
            Expression::BooleanLiteral(_) => ExpressionKind::BooleanLiteral,
            Expression::NullLiteral(_) => ExpressionKind::Null,
            Expression::ArrayExpression(_) => ExpressionKind::ArrayLiteral,
            Expression::ObjectExpression(_) => ExpressionKind::ObjectLiteral,
            Expression::FunctionExpression(_) | Expression::ArrowFunctionExpression(_) => {
                ExpressionKind::Function
            }
            Expression::CallExpression(_) => ExpressionKind::Call,
            Expression::Identifier(_) => ExpressionKind::Identifier,
            Expression::StaticMemberExpression(_) => ExpressionKind::MemberAccess,
            _ => ExpressionKind::Other,
        }
    }

    fn get_symbol_name(&self, node: &OxcNode<'a>) -> Option<String> {
        match node.as_expression()? {
            Expression::Identifier(identifier) => Some(identifier.name.to_string()),
            Expression::StaticMemberExpression(member) => Some(member.property.name.to_string()),
            _ => None,
        }
    }

    fn parse_string_literal(&self, str: &OxcNode<'a>) -> HostResult<String, OxcNode<'a>> {
        match self.expression(str, "a string literal")? {
            Expression::StringLiteral(literal) => Ok(literal.value.to_string()),
            Expression::TemplateLiteral(template) if template.expressions.is_empty() => {
                Ok(template
                    .quasis
                    .iter()
                    .map(|quasi| {
                        quasi
                            .value
                            .cooked
                            .as_ref()
                            .map_or_else(|| quasi.value.raw.as_str(), |cooked| cooked.as_str())
                    })
                    .collect())
            }
            _ => Err(unsupported_syntax(str.clone(), "a string literal")),
        }
    }

    fn parse_numeric_literal(&self, num: &OxcNode<'a>) -> HostResult<f64, OxcNode<'a>> {
        match self.expression(num, "a numeric literal")? {
            Expression::NumericLiteral(literal) => Ok(literal.value),
            _ => Err(unsupported_syntax(num.clone(), "a numeric literal")),
        }
    }

    fn parse_boolean_literal(&self, bool: &OxcNode<'a>) -> HostResult<bool, OxcNode<'a>> {
        let expression = self.expression(bool, "a boolean literal")?;
        if let Expression::BooleanLiteral(literal) = expression {
            return Ok(literal.value);
        }
        minified_boolean(expression).ok_or_else(|| unsupported_syntax(bool.clone(), "a boolean literal"))
    }

    fn parse_array_literal(&self, array: &OxcNode<'a>) -> HostResult<Vec<OxcNode<'a>>, OxcNode<'a>> {
        let elements = match self.expression(array, "an array literal")? {
            Expression::ArrayExpression(array) => &array.elements,
            _ => return Err(unsupported_syntax(array.clone(), "an array literal")),
        };
        elements
            .iter()
            .map(|element| match element {
                ArrayExpressionElement::SpreadElement(_) => Err(unsupported_syntax(
                    array.clone(),
                    "element in array not to use spread syntax",
                )),
                ArrayExpressionElement::Elision(_) => Err(unsupported_syntax(
                    array.clone(),
                    "element in array not to be empty",
                )),
                _ => element
                    .as_expression()
                    .map(OxcNode::Expression)
                    .ok_or_else(|| unsupported_syntax(array.clone(), "an expression")),
            })
            .collect()
    }

    fn parse_object_literal(
        &self,
        obj: &OxcNode<'a>,
    ) -> HostResult<IndexMap<String, OxcNode<'a>>, OxcNode<'a>> {
        let properties = match self.expression(obj, "an object literal")? {
            Expression::ObjectExpression(object) => &object.properties,
            _ => return Err(unsupported_syntax(obj.clone(), "an object literal")),
        };

        let mut result = IndexMap::with_capacity(properties.len());
        for property in properties {
            let property = match property {
                ObjectPropertyKind::ObjectProperty(property)
                    if property.kind == PropertyKind::Init && !property.method =>
                {
                    property
                }
                _ => return Err(unsupported_syntax(obj.clone(), "a property assignment")),
            };
            let key = match &property.key {
                _ if property.computed => None,
                PropertyKey::StaticIdentifier(identifier) => Some(identifier.name.to_string()),
                PropertyKey::StringLiteral(literal) => Some(literal.value.to_string()),
                PropertyKey::NumericLiteral(literal) => Some(literal.value.to_string()),
                _ => None,
            };
            let key = key.ok_or_else(|| unsupported_syntax(obj.clone(), "a property name"))?;
            result.insert(key, OxcNode::Expression(&property.value));
        }
        Ok(result)
    }

    fn parse_return_value(&self, fn_node: &OxcNode<'a>) -> HostResult<OxcNode<'a>, OxcNode<'a>> {
        let value = match self.expression(fn_node, "a function")? {
            Expression::ArrowFunctionExpression(arrow) if arrow.expression => {
                match arrow.body.statements.first() {
                    Some(Statement::ExpressionStatement(statement)) => Some(&statement.expression),
                    _ => None,
                }
            }
            Expression::ArrowFunctionExpression(arrow) => single_return_value(&arrow.body),
            Expression::FunctionExpression(function) => function
                .body
                .as_ref()
                .and_then(|body| single_return_value(body)),
            _ => return Err(unsupported_syntax(fn_node.clone(), "a function")),
        };
        value.map(OxcNode::Expression).ok_or_else(|| {
            unsupported_syntax(fn_node.clone(), "a function body with a single return statement")
        })
    }

    fn parse_parameters(&self, fn_node: &OxcNode<'a>) -> HostResult<Vec<OxcNode<'a>>, OxcNode<'a>> {
        let params = match self.expression(fn_node, "a function")? {
            Expression::ArrowFunctionExpression(arrow) => &arrow.params,
            Expression::FunctionExpression(function) => &function.params,
            _ => return Err(unsupported_syntax(fn_node.clone(), "a function")),
        };
        // Parameters are patterns, not expressions; they are exposed as their source text.
        Ok(params
            .items
            .iter()
            .map(|param| {
                let span = param.span;
                OxcNode::Code(JsCode::new(
                    &self.source[span.start as usize..span.end as usize],
                    Precedence::Primary,
                ))
            })
            .collect())
    }

    fn parse_callee(&self, call: &OxcNode<'a>) -> HostResult<OxcNode<'a>, OxcNode<'a>> {
        match self.expression(call, "a call expression")? {
            Expression::CallExpression(call) => Ok(OxcNode::Expression(&call.callee)),
            _ => Err(unsupported_syntax(call.clone(), "a call expression")),
        }
    }

    fn parse_arguments(&self, call: &OxcNode<'a>) -> HostResult<Vec<OxcNode<'a>>, OxcNode<'a>> {
        let arguments = match self.expression(call, "a call expression")? {
            Expression::CallExpression(call) => &call.arguments,
            _ => return Err(unsupported_syntax(call.clone(), "a call expression")),
        };
        arguments
            .iter()
            .map(|argument| {
                argument
                    .as_expression()
                    .map(OxcNode::Expression)
                    .ok_or_else(|| {
                        unsupported_syntax(call.clone(), "argument not to use spread syntax")
                    })
            })
            .collect()
    }

    fn get_member_object(&self, node: &OxcNode<'a>) -> Option<OxcNode<'a>> {
        match node.as_expression()? {
            Expression::StaticMemberExpression(member) => Some(OxcNode::Expression(&member.object)),
            Expression::ComputedMemberExpression(member) => {
                Some(OxcNode::Expression(&member.object))
            }
            _ => None,
        }
    }

    fn get_range(&self, node: &OxcNode<'a>) -> HostResult<Range, OxcNode<'a>> {
        match node {
            OxcNode::Expression(expression) => Ok(self.span_range(expression.span())),
            OxcNode::Code(_) => Err(FatalLinkerError::new(
                node.clone(),
                "Unable to read range for node - it is missing location information.",
            )),
        }
    }

    fn print_node(&self, node: &OxcNode<'a>) -> String {
        match node {
            OxcNode::Expression(expression) => {
                let span = expression.span();
                self.source[span.start as usize..span.end as usize].to_string()
            }
            OxcNode::Code(code) => code.text.clone(),
        }
    }

    fn wrap_node(&self, node: &OxcNode<'a>) -> o::WrappedNodeExpr {
        let address = node
            .as_expression()
            .map(|expression| expression as *const Expression<'a> as usize);
        if let Some(wrapped) = address.and_then(|address| self.wrapped_by_address.borrow().get(&address).cloned()) {
            return wrapped;
        }

        let mut nodes = self.wrapped_nodes.borrow_mut();
        let wrapped = o::WrappedNodeExpr::new(NodeHandle {
            host_id: self.host_id,
            index: nodes.len(),
        });
        nodes.push(node.clone());
        if let Some(address) = address {
            self.wrapped_by_address
                .borrow_mut()
                .insert(address, wrapped.clone());
        }
        wrapped
    }

    fn unwrap_node(&self, wrapped: &o::WrappedNodeExpr) -> Option<OxcNode<'a>> {
        let handle = wrapped.downcast_ref::<NodeHandle>()?;
        if handle.host_id != self.host_id {
            return None;
        }
        self.wrapped_nodes.borrow().get(handle.index).cloned()
    }
}
