//! Angular Linker
//!
//! The linker turns partial declarations (`ɵɵngDeclareComponent()`, `ɵɵngDeclarePipe()`, ...)
//! published in library code into full definitions, compiled against the application's Angular
//! version. It is polymorphic over the AST it rewrites; `oxc` provides the bundled host.

pub mod ast;
pub mod ast_value;
pub mod constant_scope_registry;
pub mod emit_scopes;
pub mod error;
pub mod file_linker;
pub mod linker_environment;
pub mod linker_import_generator;
pub mod linker_options;
#[cfg(feature = "napi-bindings")]
pub mod napi;
pub mod oxc;
pub mod partial_linker;
pub mod partial_linkers;
pub mod translator;

pub use ast::{AstHost, AstNode, ExpressionKind, Range};
pub use ast_value::{AstObject, AstValue, DeferredValue};
pub use constant_scope_registry::{ConstantScopeId, ConstantScopeRegistry, DeclarationScope};
pub use error::{FatalLinkerError, FileLinkError, LinkerError};
pub use file_linker::{needs_linking, FileLinker};
pub use linker_environment::LinkerEnvironment;
pub use linker_options::LinkerOptions;
pub use oxc::{link_source, link_source_with, LinkerSetup};
