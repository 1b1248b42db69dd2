//! Constant Scope Registry
//!
//! Maps the `ngImport` expression of a declaration to the lexical scope its constants are
//! hoisted into.

use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexMap;

use crate::linker::ast::{AstHost, AstNode};
use crate::linker::error::FatalLinkerError;

/// Identity of a shared constant scope within one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConstantScopeId(pub usize);

/// How constant statements are spliced into the source at an insertion point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionKind {
    /// Directly after the last top-level import.
    AfterImports,
    /// At the top of a file without imports, after any directive prologue or hashbang.
    ProgramStart,
    /// Directly after the opening brace of a function body.
    FunctionBody,
    /// After the directive prologue of a function body, which may lack its semicolon.
    FunctionPrologue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsertionPoint {
    /// Byte offset in the original source.
    pub offset: usize,
    pub kind: InsertionKind,
}

impl InsertionPoint {
    pub fn new(offset: usize, kind: InsertionKind) -> Self {
        Self { offset, kind }
    }

    /// The text to insert for the given printed statements.
    pub fn render(&self, statements: &[String]) -> String {
        if statements.is_empty() {
            return String::new();
        }
        match self.kind {
            InsertionKind::FunctionBody => statements.concat(),
            InsertionKind::FunctionPrologue => format!("\n{}", statements.concat()),
            InsertionKind::ProgramStart if self.offset == 0 => {
                format!("{}\n", statements.join("\n"))
            }
            InsertionKind::AfterImports | InsertionKind::ProgramStart => {
                format!("\n{}", statements.join("\n"))
            }
        }
    }
}

/// Binding resolution provided by the host.
pub trait BindingResolver<TExpression> {
    type Scope: Copy + Eq + Hash + Debug;

    /// The scope that declares the given identifier, or `None` when it is not bound in the file.
    fn resolve_binding_scope(&self, identifier: &TExpression) -> Option<Self::Scope>;

    /// Where constants of the scope go; an error message when the scope cannot hold them.
    fn get_insertion_point(&self, scope: Self::Scope) -> Result<InsertionPoint, String>;
}

/// Resolves the constant scope for a declaration.
pub trait DeclarationScope<TExpression> {
    /// `Ok(None)` means no shared scope could be derived and the declaration must carry its own
    /// constants.
    fn get_constant_scope_ref(
        &mut self,
        expression: &TExpression,
    ) -> Result<Option<ConstantScopeId>, FatalLinkerError<TExpression>>;
}

/// One shared constant scope per distinct lexical scope, created on first use.
pub struct ConstantScopeRegistry<'h, TExpression: AstNode, R: BindingResolver<TExpression>> {
    host: &'h dyn AstHost<TExpression>,
    resolver: R,
    scopes: IndexMap<R::Scope, ConstantScopeId>,
    insertion_points: Vec<InsertionPoint>,
}

pub const UNSUPPORTED_BINDING_LOCATION: &str = "Unsupported binding location. It was not possible to identify where to insert constant pool statements based on this binding expression.";

impl<'h, TExpression: AstNode, R: BindingResolver<TExpression>>
    ConstantScopeRegistry<'h, TExpression, R>
{
    pub fn new(host: &'h dyn AstHost<TExpression>, resolver: R) -> Self {
        Self {
            host,
            resolver,
            scopes: IndexMap::new(),
            insertion_points: Vec::new(),
        }
    }

    pub fn insertion_point(&self, id: ConstantScopeId) -> Option<InsertionPoint> {
        self.insertion_points.get(id.0).copied()
    }
}

impl<'h, TExpression: AstNode, R: BindingResolver<TExpression>> DeclarationScope<TExpression>
    for ConstantScopeRegistry<'h, TExpression, R>
{
    fn get_constant_scope_ref(
        &mut self,
        expression: &TExpression,
    ) -> Result<Option<ConstantScopeId>, FatalLinkerError<TExpression>> {
        // `i0.core` binds through `i0`.
        let mut binding_expression = expression.clone();
        while let Some(object) = self.host.get_member_object(&binding_expression) {
            binding_expression = object;
        }
        if !self.host.is_identifier(&binding_expression) {
            return Ok(None);
        }

        let scope = match self.resolver.resolve_binding_scope(&binding_expression) {
            Some(scope) => scope,
            None => return Ok(None),
        };
        if let Some(id) = self.scopes.get(&scope) {
            return Ok(Some(*id));
        }

        let insertion_point = self.resolver.get_insertion_point(scope).map_err(|message| {
            FatalLinkerError::new(expression.clone(), message)
        })?;
        let id = ConstantScopeId(self.insertion_points.len());
        self.insertion_points.push(insertion_point);
        self.scopes.insert(scope, id);
        Ok(Some(id))
    }
}
