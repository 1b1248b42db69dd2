#![deny(clippy::all)]

/**
 * Angular Compiler - Definition Compilers
 *
 * Output IR, constant pool and the render3 definition compilers used by the linker
 */

// Core modules
pub mod constant_pool;
pub mod core;
pub mod directive_matching;
pub mod injectable_compiler_2;

// Compilation modules
pub mod output;
pub mod render3;

// Re-exports
pub use constant_pool::ConstantPool;
pub use output::output_ast;
