//! Angular TypeScript Compiler (ngtsc)
//!
//! Corresponds to packages/compiler-cli/src/ngtsc
//! The infrastructure the linker shares with the full compiler: output AST translation and
//! logging.

pub mod logging;
pub mod translator;
