#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableDeclarationType {
    Const,
    Let,
    Var,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    And,
    Greater,
    GreaterEquals,
    BitAnd,
    BitOr,
    Divide,
    Equals,
    IdentityEquals,
    Less,
    LessEquals,
    Minus,
    Modulo,
    Multiply,
    NotEquals,
    IdentityNotEquals,
    Or,
    Plus,
    NullishCoalesce,
    Assign,
}

impl BinaryOperator {
    /// The JavaScript spelling of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::And => "&&",
            BinaryOperator::Greater => ">",
            BinaryOperator::GreaterEquals => ">=",
            BinaryOperator::BitAnd => "&",
            BinaryOperator::BitOr => "|",
            BinaryOperator::Divide => "/",
            BinaryOperator::Equals => "==",
            BinaryOperator::IdentityEquals => "===",
            BinaryOperator::Less => "<",
            BinaryOperator::LessEquals => "<=",
            BinaryOperator::Minus => "-",
            BinaryOperator::Modulo => "%",
            BinaryOperator::Multiply => "*",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::IdentityNotEquals => "!==",
            BinaryOperator::Or => "||",
            BinaryOperator::Plus => "+",
            BinaryOperator::NullishCoalesce => "??",
            BinaryOperator::Assign => "=",
        }
    }
}

pub struct ObjectLiteralProperty<TExpression> {
    pub property_name: String,
    pub value: TExpression,
    pub quoted: bool,
}

/// Builds statements and expressions of a concrete host AST.
pub trait AstFactory {
    type Statement;
    type Expression;

    fn create_array_literal(&self, elements: Vec<Self::Expression>) -> Self::Expression;

    fn create_assignment(
        &self,
        target: Self::Expression,
        operator: BinaryOperator,
        value: Self::Expression,
    ) -> Self::Expression;

    fn create_binary_expression(
        &self,
        left_operand: Self::Expression,
        operator: BinaryOperator,
        right_operand: Self::Expression,
    ) -> Self::Expression;

    fn create_block(&self, body: Vec<Self::Statement>) -> Self::Statement;

    fn create_call_expression(
        &self,
        callee: Self::Expression,
        args: Vec<Self::Expression>,
        pure: bool,
    ) -> Self::Expression;

    fn create_conditional(
        &self,
        condition: Self::Expression,
        then_expression: Self::Expression,
        else_expression: Self::Expression,
    ) -> Self::Expression;

    fn create_element_access(
        &self,
        expression: Self::Expression,
        element: Self::Expression,
    ) -> Self::Expression;

    fn create_expression_statement(&self, expression: Self::Expression) -> Self::Statement;

    fn create_function_declaration(
        &self,
        function_name: &str,
        parameters: Vec<String>,
        body: Self::Statement,
    ) -> Self::Statement;

    fn create_function_expression(
        &self,
        function_name: Option<&str>,
        parameters: Vec<String>,
        body: Self::Statement,
    ) -> Self::Expression;

    // body can be expression or statement
    fn create_arrow_function_expression(
        &self,
        parameters: Vec<String>,
        body: ArrowFunctionBody<Self::Statement, Self::Expression>,
    ) -> Self::Expression;

    fn create_identifier(&self, name: &str) -> Self::Expression;

    fn create_if_statement(
        &self,
        condition: Self::Expression,
        then_statement: Self::Statement,
        else_statement: Option<Self::Statement>,
    ) -> Self::Statement;

    fn create_literal(&self, value: LiteralValue<'_>) -> Self::Expression;

    fn create_new_expression(
        &self,
        expression: Self::Expression,
        args: Vec<Self::Expression>,
    ) -> Self::Expression;

    fn create_object_literal(
        &self,
        properties: Vec<ObjectLiteralProperty<Self::Expression>>,
    ) -> Self::Expression;

    fn create_parenthesized_expression(&self, expression: Self::Expression) -> Self::Expression;

    fn create_property_access(
        &self,
        expression: Self::Expression,
        property_name: &str,
    ) -> Self::Expression;

    fn create_return_statement(&self, expression: Option<Self::Expression>) -> Self::Statement;

    fn create_type_of_expression(&self, expression: Self::Expression) -> Self::Expression;

    fn create_unary_expression(
        &self,
        operator: UnaryOperator,
        operand: Self::Expression,
    ) -> Self::Expression;

    fn create_variable_declaration(
        &self,
        variable_name: &str,
        initializer: Option<Self::Expression>,
        type_: VariableDeclarationType,
    ) -> Self::Statement;
}

pub enum ArrowFunctionBody<S, E> {
    Stmt(S),
    Expr(E),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LiteralValue<'a> {
    String(&'a str),
    Number(f64),
    Boolean(bool),
    Null,
    Undefined,
}
