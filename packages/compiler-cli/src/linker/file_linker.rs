//! File Linker
//!
//! Links every partial declaration found in a single file and collects the constants they
//! share.

use indexmap::IndexMap;

use crate::linker::ast::AstNode;
use crate::linker::ast_value::AstObject;
use crate::linker::constant_scope_registry::{ConstantScopeId, DeclarationScope};
use crate::linker::emit_scopes::{Emit, EmitScope, LocalEmitScope};
use crate::linker::error::{FatalLinkerError, LinkerError};
use crate::linker::linker_environment::LinkerEnvironment;
use crate::linker::partial_linker::PartialLinker;
use crate::linker::partial_linkers::PartialLinkerSelector;

const NG_IMPORT: &str = "ngImport";

/// Whether `code` may contain partial declarations. Files without any are passed through
/// untouched, without parsing.
pub fn needs_linking(code: &str) -> bool {
    code.contains("ɵɵngDeclare") || code.contains("$ngDeclare")
}

pub struct FileLinker<'e, TStatement, TExpression: AstNode> {
    linker_environment: &'e LinkerEnvironment<'e, TStatement, TExpression>,
    linker_selector: PartialLinkerSelector<TExpression>,
    source_url: String,
    code: &'e str,
    emit_scopes: IndexMap<ConstantScopeId, EmitScope<TExpression>>,
}

impl<'e, TStatement, TExpression: AstNode> FileLinker<'e, TStatement, TExpression> {
    pub fn new(
        linker_environment: &'e LinkerEnvironment<'e, TStatement, TExpression>,
        source_url: &str,
        code: &'e str,
    ) -> Self {
        let linker_selector = PartialLinkerSelector::new(
            &linker_environment.options,
            linker_environment.template_compiler.clone(),
        );
        Self::with_selector(linker_environment, linker_selector, source_url, code)
    }

    /// Links with a caller-provided set of partial linkers.
    pub fn with_selector(
        linker_environment: &'e LinkerEnvironment<'e, TStatement, TExpression>,
        linker_selector: PartialLinkerSelector<TExpression>,
        source_url: &str,
        code: &'e str,
    ) -> Self {
        Self {
            linker_environment,
            linker_selector,
            source_url: source_url.to_string(),
            code,
            emit_scopes: IndexMap::new(),
        }
    }

    /// Return true if the given callee name matches a partial declaration that can be linked.
    pub fn is_partial_declaration(&self, callee_name: &str) -> bool {
        self.linker_selector.supports_declaration(callee_name)
    }

    /// Links the arguments of a call to the partial declaration function `declaration_fn`,
    /// returning the expression that replaces the call.
    ///
    /// Constants of the definition are hoisted into the scope `declaration_scope` resolves for
    /// the `ngImport` expression, or kept local to the replacement when there is none.
    pub fn link_partial_declaration(
        &mut self,
        declaration_fn: &str,
        args: &[TExpression],
        declaration_scope: &mut dyn DeclarationScope<TExpression>,
    ) -> Result<TExpression, LinkerError<TExpression>> {
        if args.len() != 1 {
            return Err(LinkerError::Declaration(format!(
                "Invalid function call: It should have only a single object literal argument, but contained {}.",
                args.len()
            )));
        }

        let host = self.linker_environment.host;
        let declaration_arg = &args[0];
        if !host.is_object_literal(declaration_arg) {
            return Err(FatalLinkerError::new(
                declaration_arg.clone(),
                "Invalid declaration argument: Expected argument to be an object expression.",
            )
            .into());
        }
        let meta_obj = AstObject::parse(declaration_arg.clone(), host)
            .map_err(|error| error.with_prefix("Invalid argument: "))?;
        if !meta_obj.has(NG_IMPORT) {
            return Err(FatalLinkerError::new(
                declaration_arg.clone(),
                "Invalid declaration argument: Expected a simple expression property called 'ngImport'.",
            )
            .into());
        }
        let ng_import = meta_obj.get_node(NG_IMPORT)?;
        let version = meta_obj.get_number("version").map_err(|error| {
            FatalLinkerError::new(
                meta_obj.expression.clone(),
                format!("Invalid declaration property: {}", error.message),
            )
        })?;

        let linker = self
            .linker_selector
            .get_linker(declaration_fn, version)
            .map_err(LinkerError::Declaration)?;

        match declaration_scope.get_constant_scope_ref(&ng_import)? {
            Some(scope_id) => {
                let emit_scope = self
                    .emit_scopes
                    .entry(scope_id)
                    .or_insert_with(|| EmitScope::new(ng_import));
                link_into(
                    self.linker_environment,
                    emit_scope,
                    linker,
                    declaration_fn,
                    &self.source_url,
                    self.code,
                    &meta_obj,
                )
            }
            None => {
                let mut emit_scope = LocalEmitScope::new(ng_import);
                link_into(
                    self.linker_environment,
                    &mut emit_scope,
                    linker,
                    declaration_fn,
                    &self.source_url,
                    self.code,
                    &meta_obj,
                )
            }
        }
    }

    /// The translated constant statements of every shared scope, in the order the scopes were
    /// first used.
    pub fn get_constant_statements(
        &self,
    ) -> Result<Vec<(ConstantScopeId, Vec<TStatement>)>, LinkerError<TExpression>> {
        let mut results = Vec::with_capacity(self.emit_scopes.len());
        for (scope_id, emit_scope) in &self.emit_scopes {
            let statements = emit_scope.get_constant_statements(self.linker_environment)?;
            self.linker_environment.logger.debug(&format!(
                "{}: hoisting {} constant statement(s) into scope {}",
                self.source_url,
                statements.len(),
                scope_id.0
            ));
            results.push((*scope_id, statements));
        }
        Ok(results)
    }
}

fn link_into<TStatement, TExpression: AstNode>(
    linker_environment: &LinkerEnvironment<'_, TStatement, TExpression>,
    emit_scope: &mut dyn Emit<TStatement, TExpression>,
    linker: &dyn PartialLinker<TExpression>,
    declaration_fn: &str,
    source_url: &str,
    code: &str,
    meta_obj: &AstObject<'_, TExpression>,
) -> Result<TExpression, LinkerError<TExpression>> {
    let definition = linker.link_partial_declaration(
        source_url,
        code,
        emit_scope.constant_pool_mut(),
        meta_obj,
    )?;
    linker_environment
        .logger
        .debug(&format!("{}: linked {}", source_url, declaration_fn));
    emit_scope.translate_definition(linker_environment, &definition)
}
