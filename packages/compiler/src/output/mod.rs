//! Output Module
//!
//! The output IR shared by the definition compilers and the translators.

pub mod output_ast;
