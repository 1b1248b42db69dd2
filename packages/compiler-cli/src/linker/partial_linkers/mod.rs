//! Partial Linkers
//!
//! One linker per declaration kind and version, plus the selector that dispatches to them.

pub mod partial_component_linker_1;
pub mod partial_directive_linker_1;
pub mod partial_factory_linker_1;
pub mod partial_injectable_linker_1;
pub mod partial_injector_linker_1;
pub mod partial_linker_selector;
pub mod partial_ng_module_linker_1;
pub mod partial_pipe_linker_1;
pub mod util;

pub use partial_linker_selector::{
    create_linker_map, PartialLinkerSelector, DECLARATION_FUNCTIONS,
};
