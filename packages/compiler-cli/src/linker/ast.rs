//! Linker AST Abstraction
//!
//! Defines the interface for interacting with different AST implementations.

use std::fmt::Debug;

use angular_compiler::output::output_ast as o;
use indexmap::IndexMap;

use crate::linker::error::FatalLinkerError;

/// Location range in the source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    /// 0-based byte offset of the range start.
    pub start_pos: usize,
    /// 0-based line index of the range start.
    pub start_line: usize,
    /// 0-based column position of the range start.
    pub start_col: usize,
    /// 0-based byte offset of the range end.
    pub end_pos: usize,
}

/// Helper trait for AST nodes that can be used by the linker.
pub trait AstNode: Debug + Clone {}

/// The closed set of expression shapes the linker distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionKind {
    StringLiteral,
    NumericLiteral,
    BooleanLiteral,
    Null,
    ArrayLiteral,
    ObjectLiteral,
    /// A function expression or an arrow function.
    Function,
    Call,
    Identifier,
    MemberAccess,
    Other,
}

pub type HostResult<T, TExpression> = Result<T, FatalLinkerError<TExpression>>;

/// An abstraction for getting information from an AST while being agnostic to the underlying AST implementation.
pub trait AstHost<TExpression: AstNode> {
    /// Classify the given expression.
    fn kind(&self, node: &TExpression) -> ExpressionKind;

    /// Get the name of the symbol represented by the given expression node, or `None` if it is
    /// not a symbol. For a member access this is the name of the accessed property.
    fn get_symbol_name(&self, node: &TExpression) -> Option<String>;

    /// Parse the string value from the given expression, or fail if it is not a string literal.
    fn parse_string_literal(&self, str: &TExpression) -> HostResult<String, TExpression>;

    /// Parse the numeric value from the given expression, or fail if it is not a numeric literal.
    fn parse_numeric_literal(&self, num: &TExpression) -> HostResult<f64, TExpression>;

    /// Parse the boolean value from the given expression.
    fn parse_boolean_literal(&self, bool: &TExpression) -> HostResult<bool, TExpression>;

    /// Parse an array of expressions from the given expression.
    fn parse_array_literal(&self, array: &TExpression) -> HostResult<Vec<TExpression>, TExpression>;

    /// Parse the given expression into a map of object property names to property expressions,
    /// in source order.
    fn parse_object_literal(
        &self,
        obj: &TExpression,
    ) -> HostResult<IndexMap<String, TExpression>, TExpression>;

    /// Compute the "value" of a function expression by parsing its body for a single `return` statement.
    fn parse_return_value(&self, fn_node: &TExpression) -> HostResult<TExpression, TExpression>;

    /// Returns the parameter expressions for the function.
    fn parse_parameters(&self, fn_node: &TExpression) -> HostResult<Vec<TExpression>, TExpression>;

    /// Returns the expression that is called.
    fn parse_callee(&self, call: &TExpression) -> HostResult<TExpression, TExpression>;

    /// Returns the argument expressions for the provided call expression.
    fn parse_arguments(&self, call: &TExpression) -> HostResult<Vec<TExpression>, TExpression>;

    /// Returns the object of a member access, or `None` for any other expression.
    fn get_member_object(&self, node: &TExpression) -> Option<TExpression>;

    /// Compute the location range of the expression in the source file.
    fn get_range(&self, node: &TExpression) -> HostResult<Range, TExpression>;

    /// Print the source code representation of the node.
    fn print_node(&self, node: &TExpression) -> String;

    /// Makes a node opaque to the compiler so it can travel through the output AST.
    fn wrap_node(&self, node: &TExpression) -> o::WrappedNodeExpr;

    /// Recovers a node previously handed out by `wrap_node`.
    fn unwrap_node(&self, wrapped: &o::WrappedNodeExpr) -> Option<TExpression>;

    fn is_string_literal(&self, node: &TExpression) -> bool {
        self.kind(node) == ExpressionKind::StringLiteral
    }

    fn is_numeric_literal(&self, node: &TExpression) -> bool {
        self.kind(node) == ExpressionKind::NumericLiteral
    }

    fn is_boolean_literal(&self, node: &TExpression) -> bool {
        self.kind(node) == ExpressionKind::BooleanLiteral
    }

    /// Returns `true` if the value corresponds to `null`.
    fn is_null(&self, node: &TExpression) -> bool {
        self.kind(node) == ExpressionKind::Null
    }

    fn is_array_literal(&self, node: &TExpression) -> bool {
        self.kind(node) == ExpressionKind::ArrayLiteral
    }

    fn is_object_literal(&self, node: &TExpression) -> bool {
        self.kind(node) == ExpressionKind::ObjectLiteral
    }

    fn is_function_expression(&self, node: &TExpression) -> bool {
        self.kind(node) == ExpressionKind::Function
    }

    fn is_call_expression(&self, node: &TExpression) -> bool {
        self.kind(node) == ExpressionKind::Call
    }

    fn is_identifier(&self, node: &TExpression) -> bool {
        self.kind(node) == ExpressionKind::Identifier
    }
}
