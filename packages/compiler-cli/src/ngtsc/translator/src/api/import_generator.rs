use super::super::translator::TranslateError;

/// The result of importing a named symbol.
#[derive(Debug, Clone)]
pub struct NamedImport<TExpression> {
    /// The expression the symbol is read from, or `None` if the symbol should be referenced
    /// directly by name.
    pub module_import: Option<TExpression>,

    /// Name of the symbol to read from `module_import`.
    pub symbol: String,
}

/// Produces expressions that refer to symbols exported by other modules.
pub trait ImportGenerator<TExpression> {
    /// An expression evaluating to the whole module, as `import * as ns from 'module'` would.
    fn generate_namespace_import(&self, module_name: &str) -> Result<TExpression, TranslateError>;

    fn generate_named_import(
        &self,
        module_name: &str,
        original_symbol: &str,
    ) -> Result<NamedImport<TExpression>, TranslateError>;
}
