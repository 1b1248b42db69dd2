//! Render3 Module Compiler
//!
//! NgModule definition compilation.

use crate::output::output_ast::{self as o, Expression};

use super::r3_identifiers::Identifiers as R3;
use super::util::{refs_to_array, R3CompiledExpression, R3Reference};
use super::view::util::DefinitionMap;

/// How the selector scope of an NgModule should be emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum R3SelectorScopeMode {
    /// Emit the declarations inline into the module definition.
    Inline,
    /// Don't generate selector scopes at all.
    Omit,
}

/// Metadata for an NgModule definition
#[derive(Debug, Clone)]
pub struct R3NgModuleMetadata {
    pub type_: R3Reference,
    pub bootstrap: Vec<R3Reference>,
    pub declarations: Vec<R3Reference>,
    pub imports: Vec<R3Reference>,
    pub exports: Vec<R3Reference>,
    pub selector_scope_mode: R3SelectorScopeMode,
    /// Whether the reference arrays must be wrapped in closures
    pub contains_forward_decls: bool,
    pub schemas: Option<Vec<R3Reference>>,
    pub id: Option<Expression>,
}

/// Construct an NgModule definition for the given metadata
pub fn compile_ng_module(meta: &R3NgModuleMetadata) -> R3CompiledExpression {
    let mut definition_map = DefinitionMap::new();

    definition_map.set("type", Some(meta.type_.value.clone()));

    if !meta.bootstrap.is_empty() {
        definition_map.set(
            "bootstrap",
            Some(refs_to_array(&meta.bootstrap, meta.contains_forward_decls)),
        );
    }

    if meta.selector_scope_mode == R3SelectorScopeMode::Inline {
        for (key, refs) in [
            ("declarations", &meta.declarations),
            ("imports", &meta.imports),
            ("exports", &meta.exports),
        ] {
            if !refs.is_empty() {
                definition_map.set(key, Some(refs_to_array(refs, meta.contains_forward_decls)));
            }
        }
    }

    if let Some(schemas) = &meta.schemas {
        if !schemas.is_empty() {
            let schema_exprs: Vec<Expression> = schemas.iter().map(|r| r.value.clone()).collect();
            definition_map.set("schemas", Some(*o::literal_arr(schema_exprs)));
        }
    }

    if let Some(id) = &meta.id {
        definition_map.set("id", Some(id.clone()));
    }

    let expression =
        o::import_ref(R3::define_ng_module()).call_fn(vec![definition_map.to_literal_map()], true);
    R3CompiledExpression::new(*expression, vec![])
}
