//! Translator Module
//!
//! Turns the compiler's output AST into a host AST through an `AstFactory`.

pub mod src;

pub use src::api::ast_factory::{
    ArrowFunctionBody, AstFactory, BinaryOperator, LiteralValue, ObjectLiteralProperty,
    UnaryOperator, VariableDeclarationType,
};
pub use src::api::import_generator::{ImportGenerator, NamedImport};
pub use src::context::Context;
pub use src::translator::{
    ExpressionTranslatorVisitor, RecordWrappedNodeFn, TranslateError, TranslatorOptions,
};
