//! OXC AST Factory Implementation
//!
//! Builds the JavaScript source that replaces linked declarations. Parsed expressions are
//! reused verbatim from the source text; everything else is printed compactly, with
//! parentheses inserted where precedence requires them.

use oxc_ast::ast::Expression;
use oxc_span::GetSpan;

use crate::ngtsc::translator::{
    ArrowFunctionBody, AstFactory, BinaryOperator, LiteralValue, ObjectLiteralProperty,
    UnaryOperator, VariableDeclarationType,
};

use super::oxc_ast_host::{JsCode, OxcNode, Precedence};

const PURE_ANNOTATION: &str = "/*@__PURE__*/";

pub struct OxcAstFactory<'a> {
    source: &'a str,
}

impl<'a> OxcAstFactory<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// The source text and precedence of a node.
    pub fn to_code(&self, node: OxcNode<'a>) -> JsCode {
        match node {
            OxcNode::Code(code) => code,
            OxcNode::Expression(expression) => {
                let span = expression.span();
                JsCode::new(
                    &self.source[span.start as usize..span.end as usize],
                    expression_precedence(expression),
                )
            }
        }
    }

    /// Prints `node`, parenthesized when it binds looser than `min`.
    fn operand(&self, node: OxcNode<'a>, min: Precedence) -> String {
        let code = self.to_code(node);
        if code.precedence < min {
            format!("({})", code.text)
        } else {
            code.text
        }
    }

    /// A callee or member object, which may not start a function expression or a number.
    fn receiver(&self, node: OxcNode<'a>, min: Precedence) -> String {
        let code = self.to_code(node);
        let needs_parens = code.precedence < min
            || starts_with_keyword(&code.text, "function")
            || starts_with_keyword(&code.text, "class")
            || code.text.starts_with(|c: char| c.is_ascii_digit() || c == '.');
        if needs_parens {
            format!("({})", code.text)
        } else {
            code.text
        }
    }

    fn list(&self, nodes: Vec<OxcNode<'a>>) -> String {
        nodes
            .into_iter()
            .map(|node| self.operand(node, Precedence::Assignment))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn code<'a>(text: String, precedence: Precedence) -> OxcNode<'a> {
    OxcNode::Code(JsCode { text, precedence })
}

fn starts_with_keyword(text: &str, keyword: &str) -> bool {
    text.strip_prefix(keyword).is_some_and(|rest| {
        !rest
            .chars()
            .next()
            .is_some_and(|c| c.is_alphanumeric() || c == '_' || c == '$')
    })
}

/// Whether an expression printed at the start of a statement would be read as a declaration or
/// a block instead.
pub(crate) fn opens_declaration_or_block(text: &str) -> bool {
    text.starts_with('{')
        || starts_with_keyword(text, "function")
        || starts_with_keyword(text, "class")
}

fn is_identifier_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Joins an operator and its operand without fusing them into a different token.
fn join_operator(operator: &str, operand: &str) -> String {
    let fuses = match (operator.chars().last(), operand.chars().next()) {
        (Some(last), Some(first)) => {
            (last == first && (last == '+' || last == '-'))
                || ((last.is_alphanumeric() || last == '_' || last == '$')
                    && (first.is_alphanumeric() || first == '_' || first == '$'))
        }
        _ => false,
    };
    if fuses {
        format!("{} {}", operator, operand)
    } else {
        format!("{}{}", operator, operand)
    }
}

fn binary_precedence(operator: BinaryOperator) -> Precedence {
    match operator {
        BinaryOperator::Assign => Precedence::Assignment,
        BinaryOperator::NullishCoalesce => Precedence::Nullish,
        BinaryOperator::Or => Precedence::LogicalOr,
        BinaryOperator::And => Precedence::LogicalAnd,
        BinaryOperator::BitOr => Precedence::BitOr,
        BinaryOperator::BitAnd => Precedence::BitAnd,
        BinaryOperator::Equals
        | BinaryOperator::NotEquals
        | BinaryOperator::IdentityEquals
        | BinaryOperator::IdentityNotEquals => Precedence::Equality,
        BinaryOperator::Less
        | BinaryOperator::LessEquals
        | BinaryOperator::Greater
        | BinaryOperator::GreaterEquals => Precedence::Relational,
        BinaryOperator::Plus | BinaryOperator::Minus => Precedence::Additive,
        BinaryOperator::Multiply | BinaryOperator::Divide | BinaryOperator::Modulo => {
            Precedence::Multiplicative
        }
    }
}

/// A lower bound for the precedence of a parsed expression.
fn expression_precedence(expression: &Expression<'_>) -> Precedence {
    match expression {
        Expression::Identifier(_)
        | Expression::StringLiteral(_)
        | Expression::NumericLiteral(_)
        | Expression::BooleanLiteral(_)
        | Expression::NullLiteral(_)
        | Expression::BigIntLiteral(_)
        | Expression::RegExpLiteral(_)
        | Expression::TemplateLiteral(_)
        | Expression::ArrayExpression(_)
        | Expression::ObjectExpression(_)
        | Expression::ThisExpression(_)
        | Expression::FunctionExpression(_)
        | Expression::ClassExpression(_)
        | Expression::ParenthesizedExpression(_) => Precedence::Primary,
        Expression::StaticMemberExpression(_)
        | Expression::ComputedMemberExpression(_)
        | Expression::PrivateFieldExpression(_)
        | Expression::NewExpression(_) => Precedence::Member,
        Expression::CallExpression(_)
        | Expression::ImportExpression(_)
        | Expression::TaggedTemplateExpression(_)
        | Expression::ChainExpression(_) => Precedence::Call,
        Expression::UpdateExpression(_) => Precedence::Postfix,
        Expression::UnaryExpression(_) | Expression::AwaitExpression(_) => Precedence::Unary,
        Expression::BinaryExpression(_) | Expression::LogicalExpression(_) => Precedence::Nullish,
        Expression::ConditionalExpression(_) => Precedence::Conditional,
        Expression::AssignmentExpression(_)
        | Expression::ArrowFunctionExpression(_)
        | Expression::YieldExpression(_) => Precedence::Assignment,
        _ => Precedence::Sequence,
    }
}

fn print_number(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else if value.is_infinite() {
        if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else {
        value.to_string()
    }
}

impl<'a> AstFactory for OxcAstFactory<'a> {
    type Statement = String;
    type Expression = OxcNode<'a>;

    fn create_array_literal(&self, elements: Vec<OxcNode<'a>>) -> OxcNode<'a> {
        code(format!("[{}]", self.list(elements)), Precedence::Primary)
    }

    fn create_assignment(
        &self,
        target: OxcNode<'a>,
        operator: BinaryOperator,
        value: OxcNode<'a>,
    ) -> OxcNode<'a> {
        code(
            format!(
                "{}{}{}",
                self.operand(target, Precedence::Call),
                operator.as_str(),
                self.operand(value, Precedence::Assignment)
            ),
            Precedence::Assignment,
        )
    }

    fn create_binary_expression(
        &self,
        left_operand: OxcNode<'a>,
        operator: BinaryOperator,
        right_operand: OxcNode<'a>,
    ) -> OxcNode<'a> {
        let precedence = binary_precedence(operator);
        let (left, right) = if operator == BinaryOperator::NullishCoalesce {
            // `??` cannot be mixed with `||` or `&&` without parentheses.
            (
                self.operand(left_operand, Precedence::BitOr),
                self.operand(right_operand, Precedence::BitOr),
            )
        } else {
            let right = self.to_code(right_operand);
            // Operators are left-associative, so an equal right operand keeps its parentheses.
            let right = if right.precedence <= precedence {
                format!("({})", right.text)
            } else {
                right.text
            };
            (self.operand(left_operand, precedence), right)
        };
        let left_and_operator = format!("{}{}", left, operator.as_str());
        code(join_operator(&left_and_operator, &right), precedence)
    }

    fn create_block(&self, body: Vec<String>) -> String {
        format!("{{{}}}", body.concat())
    }

    fn create_call_expression(
        &self,
        callee: OxcNode<'a>,
        args: Vec<OxcNode<'a>>,
        pure: bool,
    ) -> OxcNode<'a> {
        let call = format!(
            "{}({})",
            self.receiver(callee, Precedence::Call),
            self.list(args)
        );
        if pure {
            code(format!("{}{}", PURE_ANNOTATION, call), Precedence::Call)
        } else {
            code(call, Precedence::Call)
        }
    }

    fn create_conditional(
        &self,
        condition: OxcNode<'a>,
        then_expression: OxcNode<'a>,
        else_expression: OxcNode<'a>,
    ) -> OxcNode<'a> {
        code(
            format!(
                "{}?{}:{}",
                self.operand(condition, Precedence::Nullish),
                self.operand(then_expression, Precedence::Assignment),
                self.operand(else_expression, Precedence::Assignment)
            ),
            Precedence::Conditional,
        )
    }

    fn create_element_access(&self, expression: OxcNode<'a>, element: OxcNode<'a>) -> OxcNode<'a> {
        code(
            format!(
                "{}[{}]",
                self.receiver(expression, Precedence::Call),
                self.to_code(element).text
            ),
            Precedence::Member,
        )
    }

    fn create_expression_statement(&self, expression: OxcNode<'a>) -> String {
        let text = self.to_code(expression).text;
        if opens_declaration_or_block(&text) {
            format!("({});", text)
        } else {
            format!("{};", text)
        }
    }

    fn create_function_declaration(
        &self,
        function_name: &str,
        parameters: Vec<String>,
        body: String,
    ) -> String {
        format!("function {}({}){}", function_name, parameters.join(","), body)
    }

    fn create_function_expression(
        &self,
        function_name: Option<&str>,
        parameters: Vec<String>,
        body: String,
    ) -> OxcNode<'a> {
        let name = function_name.map(|name| format!(" {}", name)).unwrap_or_default();
        code(
            format!("function{}({}){}", name, parameters.join(","), body),
            Precedence::Primary,
        )
    }

    fn create_arrow_function_expression(
        &self,
        parameters: Vec<String>,
        body: ArrowFunctionBody<String, OxcNode<'a>>,
    ) -> OxcNode<'a> {
        let body = match body {
            ArrowFunctionBody::Stmt(block) => block,
            ArrowFunctionBody::Expr(expression) => {
                let body = self.to_code(expression);
                if body.text.starts_with('{') || body.precedence < Precedence::Assignment {
                    format!("({})", body.text)
                } else {
                    body.text
                }
            }
        };
        code(
            format!("({})=>{}", parameters.join(","), body),
            Precedence::Assignment,
        )
    }

    fn create_identifier(&self, name: &str) -> OxcNode<'a> {
        code(name.to_string(), Precedence::Primary)
    }

    fn create_if_statement(
        &self,
        condition: OxcNode<'a>,
        then_statement: String,
        else_statement: Option<String>,
    ) -> String {
        let condition = self.to_code(condition).text;
        match else_statement {
            Some(else_statement) => {
                format!("if({}){}else{}", condition, then_statement, else_statement)
            }
            None => format!("if({}){}", condition, then_statement),
        }
    }

    fn create_literal(&self, value: LiteralValue<'_>) -> OxcNode<'a> {
        match value {
            LiteralValue::String(value) => code(
                serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value)),
                Precedence::Primary,
            ),
            LiteralValue::Number(value) => {
                let text = print_number(value);
                let precedence = if text.starts_with('-') {
                    Precedence::Unary
                } else {
                    Precedence::Primary
                };
                code(text, precedence)
            }
            LiteralValue::Boolean(value) => code(value.to_string(), Precedence::Primary),
            LiteralValue::Null => code("null".to_string(), Precedence::Primary),
            LiteralValue::Undefined => code("undefined".to_string(), Precedence::Primary),
        }
    }

    fn create_new_expression(&self, expression: OxcNode<'a>, args: Vec<OxcNode<'a>>) -> OxcNode<'a> {
        code(
            format!(
                "new {}({})",
                self.receiver(expression, Precedence::Member),
                self.list(args)
            ),
            Precedence::Member,
        )
    }

    fn create_object_literal(&self, properties: Vec<ObjectLiteralProperty<OxcNode<'a>>>) -> OxcNode<'a> {
        let properties = properties
            .into_iter()
            .map(|property| {
                let key = if property.quoted || !is_identifier_name(&property.property_name) {
                    serde_json::to_string(&property.property_name)
                        .unwrap_or_else(|_| format!("{:?}", property.property_name))
                } else {
                    property.property_name
                };
                format!(
                    "{}:{}",
                    key,
                    self.operand(property.value, Precedence::Assignment)
                )
            })
            .collect::<Vec<_>>();
        code(format!("{{{}}}", properties.join(",")), Precedence::Primary)
    }

    fn create_parenthesized_expression(&self, expression: OxcNode<'a>) -> OxcNode<'a> {
        code(format!("({})", self.to_code(expression).text), Precedence::Primary)
    }

    fn create_property_access(&self, expression: OxcNode<'a>, property_name: &str) -> OxcNode<'a> {
        code(
            format!(
                "{}.{}",
                self.receiver(expression, Precedence::Call),
                property_name
            ),
            Precedence::Member,
        )
    }

    fn create_return_statement(&self, expression: Option<OxcNode<'a>>) -> String {
        match expression {
            Some(expression) => {
                format!("return {};", self.to_code(expression).text)
            }
            None => "return;".to_string(),
        }
    }

    fn create_type_of_expression(&self, expression: OxcNode<'a>) -> OxcNode<'a> {
        code(
            join_operator("typeof", &self.operand(expression, Precedence::Unary)),
            Precedence::Unary,
        )
    }

    fn create_unary_expression(&self, operator: UnaryOperator, operand: OxcNode<'a>) -> OxcNode<'a> {
        let operator = match operator {
            UnaryOperator::Plus => "+",
            UnaryOperator::Minus => "-",
            UnaryOperator::Not => "!",
        };
        code(
            join_operator(operator, &self.operand(operand, Precedence::Unary)),
            Precedence::Unary,
        )
    }

    fn create_variable_declaration(
        &self,
        variable_name: &str,
        initializer: Option<OxcNode<'a>>,
        type_: VariableDeclarationType,
    ) -> String {
        let keyword = match type_ {
            VariableDeclarationType::Const => "const",
            VariableDeclarationType::Let => "let",
            VariableDeclarationType::Var => "var",
        };
        match initializer {
            Some(initializer) => format!(
                "{} {}={};",
                keyword,
                variable_name,
                self.operand(initializer, Precedence::Assignment)
            ),
            None => format!("{} {};", keyword, variable_name),
        }
    }
}
