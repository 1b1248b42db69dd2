use angular_compiler::constant_pool::ConstantPool;
use angular_compiler::output::output_ast as o;
use angular_compiler::render3::r3_module_compiler::{
    compile_ng_module, R3NgModuleMetadata, R3SelectorScopeMode,
};
use angular_compiler::render3::util::R3Reference;

use crate::linker::ast::{AstNode, HostResult};
use crate::linker::ast_value::{AstObject, AstValue};
use crate::linker::error::FatalLinkerError;
use crate::linker::partial_linker::PartialLinker;

use super::util::wrap_reference;

/// Links `ɵɵngDeclareNgModule()` calls into `ɵɵdefineNgModule()` calls.
pub struct PartialNgModuleLinker1 {
    /// Whether the selector scope (`declarations`, `imports`, `exports`) is emitted inline so
    /// the module can be compiled in JIT mode.
    emit_inline: bool,
}

impl PartialNgModuleLinker1 {
    pub fn new(emit_inline: bool) -> Self {
        Self { emit_inline }
    }
}

impl<TExpression: AstNode> PartialLinker<TExpression> for PartialNgModuleLinker1 {
    fn link_partial_declaration(
        &self,
        _source_url: &str,
        _code: &str,
        _constant_pool: &mut ConstantPool,
        meta_obj: &AstObject<'_, TExpression>,
    ) -> Result<o::Expression, FatalLinkerError<TExpression>> {
        let meta = to_r3_ng_module_meta(meta_obj, self.emit_inline)?;
        Ok(compile_ng_module(&meta).expression)
    }
}

/// Derives the `R3NgModuleMetadata` from the metadata object.
pub fn to_r3_ng_module_meta<TExpression: AstNode>(
    meta_obj: &AstObject<'_, TExpression>,
    supports_jit: bool,
) -> HostResult<R3NgModuleMetadata, TExpression> {
    let mut contains_forward_decls = false;
    let mut get_references = |property_name: &str| -> HostResult<Vec<R3Reference>, TExpression> {
        if !meta_obj.has(property_name) {
            return Ok(Vec::new());
        }
        let field = meta_obj.get_value(property_name)?.to_deferred()?;
        contains_forward_decls |= field.is_deferred();
        wrap_references(field.value())
    };

    let bootstrap = get_references("bootstrap")?;
    let declarations = get_references("declarations")?;
    let imports = get_references("imports")?;
    let exports = get_references("exports")?;

    Ok(R3NgModuleMetadata {
        type_: wrap_reference(&meta_obj.get_value("type")?),
        bootstrap,
        declarations,
        imports,
        exports,
        selector_scope_mode: if supports_jit {
            R3SelectorScopeMode::Inline
        } else {
            R3SelectorScopeMode::Omit
        },
        contains_forward_decls,
        schemas: if meta_obj.has("schemas") {
            Some(wrap_references(&meta_obj.get_value("schemas")?)?)
        } else {
            None
        },
        id: if meta_obj.has("id") {
            Some(meta_obj.get_opaque("id")?)
        } else {
            None
        },
    })
}

fn wrap_references<TExpression: AstNode>(
    values: &AstValue<'_, TExpression>,
) -> HostResult<Vec<R3Reference>, TExpression> {
    Ok(values.get_array()?.iter().map(wrap_reference).collect())
}
