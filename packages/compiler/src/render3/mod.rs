//! Render3 Module
//!
//! Definition compilers targeting the Ivy (render3) runtime.

pub mod r3_factory;
pub mod r3_identifiers;
pub mod r3_injector_compiler;
pub mod r3_module_compiler;
pub mod r3_pipe_compiler;
pub mod util;
pub mod view;

// Re-exports
pub use r3_factory::*;
pub use r3_identifiers::Identifiers;
pub use r3_injector_compiler::*;
pub use r3_module_compiler::*;
pub use r3_pipe_compiler::*;
pub use util::*;
