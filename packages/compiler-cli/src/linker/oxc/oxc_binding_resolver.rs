//! Binding resolution over `oxc_semantic` scoping data.

use oxc_ast::ast::{Expression, FunctionBody, Program, Statement};
use oxc_ast::AstKind;
use oxc_semantic::{ScopeId, Semantic};

use crate::linker::constant_scope_registry::{
    BindingResolver, InsertionKind, InsertionPoint, UNSUPPORTED_BINDING_LOCATION,
};

use super::oxc_ast_host::OxcNode;

pub struct OxcBindingResolver<'s, 'a> {
    semantic: &'s Semantic<'a>,
}

impl<'s, 'a> OxcBindingResolver<'s, 'a> {
    pub fn new(semantic: &'s Semantic<'a>) -> Self {
        Self { semantic }
    }
}

impl<'s, 'a> BindingResolver<OxcNode<'a>> for OxcBindingResolver<'s, 'a> {
    type Scope = ScopeId;

    fn resolve_binding_scope(&self, identifier: &OxcNode<'a>) -> Option<ScopeId> {
        let identifier = match identifier.as_expression()? {
            Expression::Identifier(identifier) => identifier,
            _ => return None,
        };
        let scoping = self.semantic.scoping();
        let symbol_id = scoping
            .get_reference(identifier.reference_id.get()?)
            .symbol_id()?;
        Some(scoping.symbol_scope_id(symbol_id))
    }

    fn get_insertion_point(&self, scope: ScopeId) -> Result<InsertionPoint, String> {
        let node_id = self.semantic.scoping().get_node_id(scope);
        match self.semantic.nodes().get_node(node_id).kind() {
            AstKind::Program(program) => Ok(program_insertion_point(program)),
            AstKind::Function(function) => function
                .body
                .as_ref()
                .map(|body| function_body_insertion_point(body))
                .ok_or_else(|| UNSUPPORTED_BINDING_LOCATION.to_string()),
            AstKind::ArrowFunctionExpression(arrow) if !arrow.expression => {
                Ok(function_body_insertion_point(&arrow.body))
            }
            _ => Err(UNSUPPORTED_BINDING_LOCATION.to_string()),
        }
    }
}

fn program_insertion_point(program: &Program<'_>) -> InsertionPoint {
    let last_import = program
        .body
        .iter()
        .filter_map(|statement| match statement {
            Statement::ImportDeclaration(import) => Some(import.span.end),
            _ => None,
        })
        .max();
    if let Some(end) = last_import {
        return InsertionPoint::new(end as usize, InsertionKind::AfterImports);
    }

    let prologue_end = program
        .directives
        .last()
        .map(|directive| directive.span.end)
        .or_else(|| program.hashbang.as_ref().map(|hashbang| hashbang.span.end))
        .unwrap_or(0);
    InsertionPoint::new(prologue_end as usize, InsertionKind::ProgramStart)
}

fn function_body_insertion_point(body: &FunctionBody<'_>) -> InsertionPoint {
    match body.directives.last() {
        Some(directive) => {
            InsertionPoint::new(directive.span.end as usize, InsertionKind::FunctionPrologue)
        }
        None => InsertionPoint::new(body.span.start as usize + 1, InsertionKind::FunctionBody),
    }
}
