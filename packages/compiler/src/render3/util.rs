//! Render3 Utilities
//!
//! Shared shapes for the definition compilers.

use crate::output::output_ast::{self as o, Expression, Statement};
use std::any::Any;

/// Reference containing both value and type expressions
#[derive(Debug, Clone)]
pub struct R3Reference {
    pub value: Expression,
    pub type_expr: Expression,
}

impl R3Reference {
    pub fn new(value: Expression, type_expr: Expression) -> Self {
        R3Reference { value, type_expr }
    }
}

/// Result of compilation of a render3 code unit (component, directive, pipe, etc.)
#[derive(Debug, Clone)]
pub struct R3CompiledExpression {
    pub expression: Expression,
    pub statements: Vec<Statement>,
}

impl R3CompiledExpression {
    pub fn new(expression: Expression, statements: Vec<Statement>) -> Self {
        R3CompiledExpression {
            expression,
            statements,
        }
    }
}

/// Wraps a host node in an R3Reference; value and type share the same wrapped node.
pub fn wrap_reference<T: Any>(value: T) -> R3Reference {
    let wrapped = *o::wrapped_node(value);
    R3Reference {
        value: wrapped.clone(),
        type_expr: wrapped,
    }
}

/// Converts references to an array expression, optionally behind a closure
/// (`function () { return [...]; }`) so forward declarations resolve lazily.
pub fn refs_to_array(refs: &[R3Reference], should_forward_declare: bool) -> Expression {
    let values: Vec<Expression> = refs.iter().map(|r| r.value.clone()).collect();
    let array = *o::literal_arr(values);
    if should_forward_declare {
        *o::fn_expr(vec![], vec![o::return_stmt(array)], None)
    } else {
        array
    }
}

/// `function () { return expr; }`
pub fn closure_returning(expr: Expression) -> Expression {
    *o::fn_expr(vec![], vec![o::return_stmt(expr)], None)
}
