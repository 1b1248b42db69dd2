//! OXC Host
//!
//! The linker over JavaScript parsed with `oxc_parser`: an `AstHost`, a source-text
//! `AstFactory`, binding resolution from `oxc_semantic` and the per-file driver.

pub mod es2015_linker;
pub mod oxc_ast_factory;
pub mod oxc_ast_host;
pub mod oxc_binding_resolver;

pub use es2015_linker::{link_source, link_source_with, LinkerSetup};
pub use oxc_ast_factory::OxcAstFactory;
pub use oxc_ast_host::{JsCode, OxcAstHost, OxcNode, Precedence};
pub use oxc_binding_resolver::OxcBindingResolver;
