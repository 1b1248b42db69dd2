//! Output AST
//!
//! The language-neutral expression/statement IR produced by the definition compilers.
//! Translators turn it into a concrete host AST.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

///// Expressions

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Minus,
    Plus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperator {
    Equals,
    NotEquals,
    Assign,
    Identical,
    NotIdentical,
    Minus,
    Plus,
    Divide,
    Multiply,
    Modulo,
    And,
    Or,
    BitwiseOr,
    BitwiseAnd,
    Lower,
    LowerEquals,
    Bigger,
    BiggerEquals,
    NullishCoalesce,
}

#[derive(Debug, Clone)]
pub enum Expression {
    ReadVar(ReadVarExpr),
    InvokeFn(InvokeFunctionExpr),
    Instantiate(InstantiateExpr),
    Literal(LiteralExpr),
    External(ExternalExpr),
    Conditional(ConditionalExpr),
    NotExpr(NotExpr),
    Fn(FunctionExpr),
    ArrowFn(ArrowFunctionExpr),
    BinaryOp(BinaryOperatorExpr),
    ReadProp(ReadPropExpr),
    ReadKey(ReadKeyExpr),
    LiteralArray(LiteralArrayExpr),
    LiteralMap(LiteralMapExpr),
    WrappedNode(WrappedNodeExpr),
    TypeOf(TypeofExpr),
    Unary(UnaryOperatorExpr),
    Fixup(FixupExpr),
}

#[derive(Debug, Clone)]
pub struct ReadVarExpr {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct InvokeFunctionExpr {
    pub fn_: Box<Expression>,
    pub args: Vec<Expression>,
    pub pure: bool,
}

#[derive(Debug, Clone)]
pub struct InstantiateExpr {
    pub class_expr: Box<Expression>,
    pub args: Vec<Expression>,
}

#[derive(Debug, Clone)]
pub struct LiteralExpr {
    pub value: LiteralValue,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Null,
    Undefined,
    String(String),
    Number(f64),
    Bool(bool),
}

#[derive(Debug, Clone)]
pub struct ExternalExpr {
    pub value: ExternalReference,
}

/// A symbol exported from a module, e.g. `ɵɵdefineDirective` from `@angular/core`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalReference {
    pub module_name: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ConditionalExpr {
    pub condition: Box<Expression>,
    pub true_case: Box<Expression>,
    pub false_case: Option<Box<Expression>>,
}

#[derive(Debug, Clone)]
pub struct NotExpr {
    pub condition: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FnParam {
    pub name: String,
}

impl FnParam {
    pub fn new(name: impl Into<String>) -> Self {
        FnParam { name: name.into() }
    }
}

#[derive(Debug, Clone)]
pub struct FunctionExpr {
    pub params: Vec<FnParam>,
    pub statements: Vec<Statement>,
    pub name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ArrowFunctionExpr {
    pub params: Vec<FnParam>,
    pub body: ArrowFunctionBody,
}

#[derive(Debug, Clone)]
pub enum ArrowFunctionBody {
    Expression(Box<Expression>),
    Statements(Vec<Statement>),
}

#[derive(Debug, Clone)]
pub struct BinaryOperatorExpr {
    pub operator: BinaryOperator,
    pub lhs: Box<Expression>,
    pub rhs: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct ReadPropExpr {
    pub receiver: Box<Expression>,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct ReadKeyExpr {
    pub receiver: Box<Expression>,
    pub index: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct LiteralArrayExpr {
    pub entries: Vec<Expression>,
}

#[derive(Debug, Clone)]
pub struct LiteralMapEntry {
    pub key: String,
    pub value: Box<Expression>,
    pub quoted: bool,
}

impl LiteralMapEntry {
    pub fn new(key: impl Into<String>, value: Expression, quoted: bool) -> Self {
        LiteralMapEntry {
            key: key.into(),
            value: Box::new(value),
            quoted,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LiteralMapExpr {
    pub entries: Vec<LiteralMapEntry>,
}

/// An expression that is already in the host's own AST representation.
///
/// The wrapped node is opaque to the compiler; only the translator for the matching host
/// can unwrap it again.
#[derive(Clone)]
pub struct WrappedNodeExpr {
    pub node: Rc<dyn Any>,
}

impl WrappedNodeExpr {
    pub fn new<T: Any>(node: T) -> Self {
        WrappedNodeExpr {
            node: Rc::new(node),
        }
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.node.downcast_ref::<T>()
    }

    /// Identity of the wrapped node, stable across clones of this expression.
    pub fn node_id(&self) -> usize {
        Rc::as_ptr(&self.node) as *const () as usize
    }
}

impl fmt::Debug for WrappedNodeExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WrappedNodeExpr(#{:x})", self.node_id())
    }
}

#[derive(Debug, Clone)]
pub struct TypeofExpr {
    pub expr: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct UnaryOperatorExpr {
    pub operator: UnaryOperator,
    pub expr: Box<Expression>,
    pub parens: bool,
}

/// A placeholder handed out by the constant pool.
///
/// All clones share one slot: once the pool decides to hoist the literal, every
/// previously returned placeholder resolves to the shared variable.
#[derive(Debug, Clone)]
pub struct FixupExpr {
    state: Rc<RefCell<FixupState>>,
}

#[derive(Debug)]
struct FixupState {
    resolved: Expression,
    shared: bool,
}

impl FixupExpr {
    pub fn new(original: Expression) -> Self {
        FixupExpr {
            state: Rc::new(RefCell::new(FixupState {
                resolved: original,
                shared: false,
            })),
        }
    }

    pub fn resolved(&self) -> Expression {
        self.state.borrow().resolved.clone()
    }

    pub fn is_shared(&self) -> bool {
        self.state.borrow().shared
    }

    pub fn fixup(&self, expression: Expression) {
        let mut state = self.state.borrow_mut();
        state.resolved = expression;
        state.shared = true;
    }
}

///// Statements

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StmtModifier {
    None = 0,
    Final = 1,
}

#[derive(Debug, Clone)]
pub enum Statement {
    DeclareVar(DeclareVarStmt),
    DeclareFn(DeclareFunctionStmt),
    Expression(ExpressionStatement),
    Return(ReturnStatement),
    IfStmt(IfStmt),
}

#[derive(Debug, Clone)]
pub struct DeclareVarStmt {
    pub name: String,
    pub value: Option<Box<Expression>>,
    pub modifiers: StmtModifier,
}

#[derive(Debug, Clone)]
pub struct DeclareFunctionStmt {
    pub name: String,
    pub params: Vec<FnParam>,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub expr: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct ReturnStatement {
    pub value: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: Box<Expression>,
    pub true_case: Vec<Statement>,
    pub false_case: Vec<Statement>,
}

// Helper functions for creating common expressions
pub fn variable(name: impl Into<String>) -> Box<Expression> {
    Box::new(Expression::ReadVar(ReadVarExpr { name: name.into() }))
}

pub fn literal(value: impl Into<LiteralValue>) -> Box<Expression> {
    Box::new(Expression::Literal(LiteralExpr {
        value: value.into(),
    }))
}

pub fn literal_arr(values: Vec<Expression>) -> Box<Expression> {
    Box::new(Expression::LiteralArray(LiteralArrayExpr { entries: values }))
}

pub fn literal_map(entries: Vec<LiteralMapEntry>) -> Box<Expression> {
    Box::new(Expression::LiteralMap(LiteralMapExpr { entries }))
}

pub fn import_ref(id: ExternalReference) -> Box<Expression> {
    Box::new(Expression::External(ExternalExpr { value: id }))
}

pub fn import_expr(module_name: impl Into<String>, name: impl Into<String>) -> Box<Expression> {
    import_ref(ExternalReference {
        module_name: Some(module_name.into()),
        name: Some(name.into()),
    })
}

pub fn not(expr: Box<Expression>) -> Box<Expression> {
    Box::new(Expression::NotExpr(NotExpr { condition: expr }))
}

pub fn fn_expr(
    params: Vec<FnParam>,
    statements: Vec<Statement>,
    name: Option<String>,
) -> Box<Expression> {
    Box::new(Expression::Fn(FunctionExpr {
        params,
        statements,
        name,
    }))
}

pub fn null_expr() -> Box<Expression> {
    literal(LiteralValue::Null)
}

pub fn wrapped_node<T: Any>(node: T) -> Box<Expression> {
    Box::new(Expression::WrappedNode(WrappedNodeExpr::new(node)))
}

pub fn return_stmt(value: Expression) -> Statement {
    Statement::Return(ReturnStatement {
        value: Box::new(value),
    })
}

pub fn declare_var(name: impl Into<String>, value: Option<Expression>, modifiers: StmtModifier) -> Statement {
    Statement::DeclareVar(DeclareVarStmt {
        name: name.into(),
        value: value.map(Box::new),
        modifiers,
    })
}

impl From<String> for LiteralValue {
    fn from(s: String) -> Self {
        LiteralValue::String(s)
    }
}

impl From<&str> for LiteralValue {
    fn from(s: &str) -> Self {
        LiteralValue::String(s.to_string())
    }
}

impl From<f64> for LiteralValue {
    fn from(n: f64) -> Self {
        LiteralValue::Number(n)
    }
}

impl From<usize> for LiteralValue {
    fn from(n: usize) -> Self {
        LiteralValue::Number(n as f64)
    }
}

impl From<u32> for LiteralValue {
    fn from(n: u32) -> Self {
        LiteralValue::Number(f64::from(n))
    }
}

impl From<bool> for LiteralValue {
    fn from(b: bool) -> Self {
        LiteralValue::Bool(b)
    }
}

impl Expression {
    pub fn prop(&self, name: impl Into<String>) -> Box<Expression> {
        Box::new(Expression::ReadProp(ReadPropExpr {
            receiver: Box::new(self.clone()),
            name: name.into(),
        }))
    }

    pub fn key(&self, index: Box<Expression>) -> Box<Expression> {
        Box::new(Expression::ReadKey(ReadKeyExpr {
            receiver: Box::new(self.clone()),
            index,
        }))
    }

    pub fn call_fn(&self, params: Vec<Expression>, pure: bool) -> Box<Expression> {
        Box::new(Expression::InvokeFn(InvokeFunctionExpr {
            fn_: Box::new(self.clone()),
            args: params,
            pure,
        }))
    }

    pub fn instantiate(&self, params: Vec<Expression>) -> Box<Expression> {
        Box::new(Expression::Instantiate(InstantiateExpr {
            class_expr: Box::new(self.clone()),
            args: params,
        }))
    }

    pub fn conditional(
        &self,
        true_case: Box<Expression>,
        false_case: Option<Box<Expression>>,
    ) -> Box<Expression> {
        Box::new(Expression::Conditional(ConditionalExpr {
            condition: Box::new(self.clone()),
            true_case,
            false_case,
        }))
    }

    pub fn to_stmt(&self) -> Statement {
        Statement::Expression(ExpressionStatement {
            expr: Box::new(self.clone()),
        })
    }

    pub fn to_const_decl(&self, name: impl Into<String>) -> Statement {
        declare_var(name, Some(self.clone()), StmtModifier::Final)
    }

    fn binary(&self, operator: BinaryOperator, rhs: Box<Expression>) -> Box<Expression> {
        Box::new(Expression::BinaryOp(BinaryOperatorExpr {
            operator,
            lhs: Box::new(self.clone()),
            rhs,
        }))
    }

    /// Creates a binary OR expression (||)
    pub fn or(&self, rhs: Box<Expression>) -> Box<Expression> {
        self.binary(BinaryOperator::Or, rhs)
    }

    pub fn and(&self, rhs: Box<Expression>) -> Box<Expression> {
        self.binary(BinaryOperator::And, rhs)
    }

    pub fn bitwise_and(&self, rhs: Box<Expression>) -> Box<Expression> {
        self.binary(BinaryOperator::BitwiseAnd, rhs)
    }

    pub fn identical(&self, rhs: Box<Expression>) -> Box<Expression> {
        self.binary(BinaryOperator::Identical, rhs)
    }

    /// Creates an assignment with `self` as the target.
    pub fn set(&self, value: Box<Expression>) -> Box<Expression> {
        self.binary(BinaryOperator::Assign, value)
    }

    /// Shallow equivalence: same variable, same external symbol, same literal or the same
    /// wrapped host node. Composite expressions are never equivalent.
    pub fn is_equivalent(&self, other: &Expression) -> bool {
        match (self, other) {
            (Expression::ReadVar(a), Expression::ReadVar(b)) => a.name == b.name,
            (Expression::External(a), Expression::External(b)) => a.value == b.value,
            (Expression::Literal(a), Expression::Literal(b)) => a.value == b.value,
            (Expression::WrappedNode(a), Expression::WrappedNode(b)) => a.node_id() == b.node_id(),
            _ => false,
        }
    }
}
