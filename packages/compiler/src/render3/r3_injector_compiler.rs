//! Render3 Injector Compiler

use crate::output::output_ast::{self as o, Expression};

use super::r3_identifiers::Identifiers as R3;
use super::util::{R3CompiledExpression, R3Reference};
use super::view::util::DefinitionMap;

/// Metadata for injector compilation
#[derive(Debug, Clone)]
pub struct R3InjectorMetadata {
    pub name: String,
    pub type_: R3Reference,
    pub providers: Option<Expression>,
    pub imports: Vec<Expression>,
}

/// Compile an injector definition
pub fn compile_injector(meta: &R3InjectorMetadata) -> R3CompiledExpression {
    let mut definition_map = DefinitionMap::new();

    if let Some(ref providers) = meta.providers {
        definition_map.set("providers", Some(providers.clone()));
    }

    if !meta.imports.is_empty() {
        definition_map.set("imports", Some(*o::literal_arr(meta.imports.clone())));
    }

    let expression =
        o::import_ref(R3::define_injector()).call_fn(vec![definition_map.to_literal_map()], true);
    R3CompiledExpression::new(*expression, vec![])
}
