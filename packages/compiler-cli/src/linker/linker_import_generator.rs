//! Import generation bound to a declaration's `ngImport` expression.

use crate::ngtsc::translator::{ImportGenerator, NamedImport, TranslateError};

const CORE_MODULE: &str = "@angular/core";

/// Resolves every import through the `ngImport` expression of a declaration.
///
/// Linked code may only reference `@angular/core`: a namespace import is the `ngImport`
/// expression itself and a named import reads the symbol off it (`i0.ɵɵdefinePipe`).
pub struct LinkerImportGenerator<TExpression> {
    ng_import: TExpression,
}

impl<TExpression: Clone> LinkerImportGenerator<TExpression> {
    pub fn new(ng_import: TExpression) -> Self {
        Self { ng_import }
    }

    fn assert_module_name(&self, module_name: &str) -> Result<(), TranslateError> {
        if module_name != CORE_MODULE {
            return Err(TranslateError::UnsupportedImport {
                allowed: CORE_MODULE.to_string(),
                requested: module_name.to_string(),
            });
        }
        Ok(())
    }
}

impl<TExpression: Clone> ImportGenerator<TExpression> for LinkerImportGenerator<TExpression> {
    fn generate_namespace_import(&self, module_name: &str) -> Result<TExpression, TranslateError> {
        self.assert_module_name(module_name)?;
        Ok(self.ng_import.clone())
    }

    fn generate_named_import(
        &self,
        module_name: &str,
        original_symbol: &str,
    ) -> Result<NamedImport<TExpression>, TranslateError> {
        self.assert_module_name(module_name)?;
        Ok(NamedImport {
            module_import: Some(self.ng_import.clone()),
            symbol: original_symbol.to_string(),
        })
    }
}
