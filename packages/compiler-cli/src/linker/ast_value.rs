//! Typed views over declaration metadata.
//!
//! `AstObject` and `AstValue` read literal values out of an opaque host AST through an
//! `AstHost`, reporting every schema violation as a `FatalLinkerError` anchored on the
//! offending node.

use std::collections::HashMap;
use std::fmt;

use angular_compiler::output::output_ast as o;
use indexmap::IndexMap;

use crate::linker::ast::{AstHost, AstNode, HostResult, Range};
use crate::linker::error::FatalLinkerError;

/// An object literal whose properties can be read by name.
#[derive(Clone)]
pub struct AstObject<'h, TExpression: AstNode> {
    /// The object literal this view was parsed from.
    pub expression: TExpression,
    obj: IndexMap<String, TExpression>,
    pub host: &'h dyn AstHost<TExpression>,
}

impl<'h, TExpression: AstNode> AstObject<'h, TExpression> {
    /// Create a new `AstObject` from the given `expression`, which must be an object literal.
    pub fn parse(
        expression: TExpression,
        host: &'h dyn AstHost<TExpression>,
    ) -> HostResult<Self, TExpression> {
        let obj = host.parse_object_literal(&expression)?;
        Ok(Self {
            expression,
            obj,
            host,
        })
    }

    /// Returns true if the object has a property called `property_name`.
    pub fn has(&self, property_name: &str) -> bool {
        self.obj.contains_key(property_name)
    }

    /// The property names in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.obj.keys().map(String::as_str)
    }

    pub fn get_number(&self, property_name: &str) -> HostResult<f64, TExpression> {
        self.host
            .parse_numeric_literal(self.get_required_property(property_name)?)
    }

    pub fn get_string(&self, property_name: &str) -> HostResult<String, TExpression> {
        self.host
            .parse_string_literal(self.get_required_property(property_name)?)
    }

    pub fn get_boolean(&self, property_name: &str) -> HostResult<bool, TExpression> {
        self.host
            .parse_boolean_literal(self.get_required_property(property_name)?)
    }

    /// Parses the property as a nested object literal.
    pub fn get_object(&self, property_name: &str) -> HostResult<AstObject<'h, TExpression>, TExpression> {
        let expression = self.get_required_property(property_name)?.clone();
        AstObject::parse(expression, self.host)
    }

    pub fn get_array(&self, property_name: &str) -> HostResult<Vec<AstValue<'h, TExpression>>, TExpression> {
        let items = self
            .host
            .parse_array_literal(self.get_required_property(property_name)?)?;
        Ok(items
            .into_iter()
            .map(|item| AstValue::new(item, self.host))
            .collect())
    }

    /// The property as an opaque output-AST expression, to be emitted back unchanged.
    pub fn get_opaque(&self, property_name: &str) -> HostResult<o::Expression, TExpression> {
        let node = self.get_required_property(property_name)?;
        Ok(o::Expression::WrappedNode(self.host.wrap_node(node)))
    }

    /// The raw host node of the property.
    pub fn get_node(&self, property_name: &str) -> HostResult<TExpression, TExpression> {
        self.get_required_property(property_name).cloned()
    }

    pub fn get_value(&self, property_name: &str) -> HostResult<AstValue<'h, TExpression>, TExpression> {
        let node = self.get_required_property(property_name)?.clone();
        Ok(AstValue::new(node, self.host))
    }

    /// Applies `mapper` to every property, keeping source order.
    pub fn to_literal<T, F>(&self, mut mapper: F) -> HostResult<IndexMap<String, T>, TExpression>
    where
        F: FnMut(AstValue<'h, TExpression>) -> HostResult<T, TExpression>,
    {
        let mut result = IndexMap::with_capacity(self.obj.len());
        for (key, expression) in &self.obj {
            result.insert(key.clone(), mapper(AstValue::new(expression.clone(), self.host))?);
        }
        Ok(result)
    }

    /// Like `to_literal`, for callers that only look values up by key.
    pub fn to_map<T, F>(&self, mapper: F) -> HostResult<HashMap<String, T>, TExpression>
    where
        F: FnMut(AstValue<'h, TExpression>) -> HostResult<T, TExpression>,
    {
        Ok(self.to_literal(mapper)?.into_iter().collect())
    }

    fn get_required_property(&self, property_name: &str) -> HostResult<&TExpression, TExpression> {
        self.obj.get(property_name).ok_or_else(|| {
            FatalLinkerError::new(
                self.expression.clone(),
                format!("Expected property '{}' to be present.", property_name),
            )
        })
    }
}

impl<'h, TExpression: AstNode> fmt::Debug for AstObject<'h, TExpression> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AstObject")
            .field("expression", &self.expression)
            .field("keys", &self.obj.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// A single expression whose shape is checked on access.
#[derive(Clone)]
pub struct AstValue<'h, TExpression: AstNode> {
    pub expression: TExpression,
    host: &'h dyn AstHost<TExpression>,
}

impl<'h, TExpression: AstNode> AstValue<'h, TExpression> {
    pub fn new(expression: TExpression, host: &'h dyn AstHost<TExpression>) -> Self {
        Self { expression, host }
    }

    /// The identifier name, or the accessed property name of a member access.
    pub fn get_symbol_name(&self) -> Option<String> {
        self.host.get_symbol_name(&self.expression)
    }

    pub fn is_number(&self) -> bool {
        self.host.is_numeric_literal(&self.expression)
    }

    pub fn get_number(&self) -> HostResult<f64, TExpression> {
        self.host.parse_numeric_literal(&self.expression)
    }

    pub fn is_string(&self) -> bool {
        self.host.is_string_literal(&self.expression)
    }

    pub fn get_string(&self) -> HostResult<String, TExpression> {
        self.host.parse_string_literal(&self.expression)
    }

    pub fn is_boolean(&self) -> bool {
        self.host.is_boolean_literal(&self.expression)
    }

    pub fn get_boolean(&self) -> HostResult<bool, TExpression> {
        self.host.parse_boolean_literal(&self.expression)
    }

    pub fn is_object(&self) -> bool {
        self.host.is_object_literal(&self.expression)
    }

    pub fn get_object(&self) -> HostResult<AstObject<'h, TExpression>, TExpression> {
        AstObject::parse(self.expression.clone(), self.host)
    }

    pub fn is_array(&self) -> bool {
        self.host.is_array_literal(&self.expression)
    }

    pub fn get_array(&self) -> HostResult<Vec<AstValue<'h, TExpression>>, TExpression> {
        let items = self.host.parse_array_literal(&self.expression)?;
        Ok(items
            .into_iter()
            .map(|item| AstValue::new(item, self.host))
            .collect())
    }

    pub fn is_function(&self) -> bool {
        self.host.is_function_expression(&self.expression)
    }

    /// The value returned by a function whose body is a single `return` statement.
    pub fn get_function_return_value(&self) -> HostResult<AstValue<'h, TExpression>, TExpression> {
        let value = self.host.parse_return_value(&self.expression)?;
        Ok(AstValue::new(value, self.host))
    }

    pub fn is_call_expression(&self) -> bool {
        self.host.is_call_expression(&self.expression)
    }

    pub fn get_callee(&self) -> HostResult<AstValue<'h, TExpression>, TExpression> {
        let callee = self.host.parse_callee(&self.expression)?;
        Ok(AstValue::new(callee, self.host))
    }

    pub fn get_arguments(&self) -> HostResult<Vec<AstValue<'h, TExpression>>, TExpression> {
        let args = self.host.parse_arguments(&self.expression)?;
        Ok(args
            .into_iter()
            .map(|arg| AstValue::new(arg, self.host))
            .collect())
    }

    pub fn is_null(&self) -> bool {
        self.host.is_null(&self.expression)
    }

    /// The value as an opaque output-AST expression.
    pub fn get_opaque(&self) -> o::Expression {
        o::Expression::WrappedNode(self.host.wrap_node(&self.expression))
    }

    pub fn get_range(&self) -> HostResult<Range, TExpression> {
        self.host.get_range(&self.expression)
    }

    /// Unwraps one level of `function () { return value; }`.
    pub fn to_deferred(&self) -> HostResult<DeferredValue<'h, TExpression>, TExpression> {
        if self.is_function() {
            Ok(DeferredValue::Deferred(self.get_function_return_value()?))
        } else {
            Ok(DeferredValue::Direct(self.clone()))
        }
    }
}

impl<'h, TExpression: AstNode> fmt::Debug for AstValue<'h, TExpression> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AstValue").field(&self.expression).finish()
    }
}

/// A value that may have been written behind a closure so it can reference classes declared
/// later in the file.
#[derive(Debug, Clone)]
pub enum DeferredValue<'h, TExpression: AstNode> {
    Direct(AstValue<'h, TExpression>),
    Deferred(AstValue<'h, TExpression>),
}

impl<'h, TExpression: AstNode> DeferredValue<'h, TExpression> {
    pub fn value(&self) -> &AstValue<'h, TExpression> {
        match self {
            DeferredValue::Direct(value) | DeferredValue::Deferred(value) => value,
        }
    }

    pub fn is_deferred(&self) -> bool {
        matches!(self, DeferredValue::Deferred(_))
    }
}
