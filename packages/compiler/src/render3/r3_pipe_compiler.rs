//! Render3 Pipe Compiler

use super::r3_identifiers::Identifiers as R3;
use super::util::{R3CompiledExpression, R3Reference};
use super::view::util::DefinitionMap;
use crate::output::output_ast as o;

/// Metadata for pipe compilation
#[derive(Debug, Clone)]
pub struct R3PipeMetadata {
    /// Name of the pipe type
    pub name: String,
    /// An expression representing a reference to the pipe itself
    pub type_: R3Reference,
    /// Name under which the pipe is used in templates
    pub pipe_name: String,
    /// Whether the pipe is marked as pure
    pub pure: bool,
}

/// `ɵɵdefinePipe({name: "myPipe", type: MyPipe, pure: true})`
pub fn compile_pipe_from_metadata(metadata: &R3PipeMetadata) -> R3CompiledExpression {
    let mut definition_map = DefinitionMap::new();

    // e.g. `name: 'myPipe'`
    definition_map.set("name", Some(*o::literal(metadata.pipe_name.as_str())));

    // e.g. `type: MyPipe`
    definition_map.set("type", Some(metadata.type_.value.clone()));

    // e.g. `pure: true`
    definition_map.set("pure", Some(*o::literal(metadata.pure)));

    let expression = o::import_ref(R3::define_pipe()).call_fn(vec![definition_map.to_literal_map()], true);
    R3CompiledExpression::new(*expression, vec![])
}
