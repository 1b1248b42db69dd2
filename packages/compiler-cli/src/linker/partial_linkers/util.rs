//! Metadata readers shared by the versioned linkers.

use angular_compiler::output::output_ast as o;
use angular_compiler::render3::r3_factory::{DepsOrInvalid, R3DependencyMetadata};
use angular_compiler::render3::util::R3Reference;

use crate::linker::ast::{AstNode, HostResult};
use crate::linker::ast_value::{AstObject, AstValue};
use crate::linker::error::FatalLinkerError;

/// The same opaque node serves as both the value and the type of the reference.
pub fn wrap_reference<TExpression: AstNode>(value: &AstValue<'_, TExpression>) -> R3Reference {
    let wrapped = value.get_opaque();
    R3Reference::new(wrapped.clone(), wrapped)
}

/// Reads the `type` property, which must name the declared class.
pub fn get_type<'h, TExpression: AstNode>(
    meta_obj: &AstObject<'h, TExpression>,
) -> HostResult<(String, AstValue<'h, TExpression>), TExpression> {
    let type_expr = meta_obj.get_value("type")?;
    match type_expr.get_symbol_name() {
        Some(type_name) => Ok((type_name, type_expr)),
        None => Err(FatalLinkerError::new(
            type_expr.expression,
            "Unsupported type, its name could not be determined",
        )),
    }
}

/// Resolves a member of a runtime enum, written as `i0.ɵɵFactoryTarget.Pipe`, by its name.
pub fn parse_enum<T, TExpression: AstNode>(
    value: &AstValue<'_, TExpression>,
    enum_name: &str,
    from_symbol_name: impl Fn(&str) -> Option<T>,
) -> HostResult<T, TExpression> {
    let symbol_name = value.get_symbol_name().ok_or_else(|| {
        FatalLinkerError::new(value.expression.clone(), "Expected value to have a symbol name")
    })?;
    from_symbol_name(&symbol_name).ok_or_else(|| {
        FatalLinkerError::new(
            value.expression.clone(),
            format!("Unsupported enum value for {}", enum_name),
        )
    })
}

fn get_flag<TExpression: AstNode>(
    obj: &AstObject<'_, TExpression>,
    property_name: &str,
) -> HostResult<bool, TExpression> {
    if obj.has(property_name) {
        obj.get_boolean(property_name)
    } else {
        Ok(false)
    }
}

/// Reads one entry of a `deps` array.
pub fn get_dependency<TExpression: AstNode>(
    dep_obj: &AstObject<'_, TExpression>,
) -> HostResult<R3DependencyMetadata, TExpression> {
    Ok(R3DependencyMetadata {
        token: Some(dep_obj.get_opaque("token")?),
        attribute: get_flag(dep_obj, "attribute")?,
        host: get_flag(dep_obj, "host")?,
        optional: get_flag(dep_obj, "optional")?,
        self_: get_flag(dep_obj, "self")?,
        skip_self: get_flag(dep_obj, "skipSelf")?,
    })
}

/// Reads a `deps` property: absent means the constructor is inherited, an array lists the
/// dependencies and the string `"invalid"` marks a constructor that cannot be injected.
pub fn get_dependencies<TExpression: AstNode>(
    meta_obj: &AstObject<'_, TExpression>,
    property_name: &str,
) -> HostResult<Option<DepsOrInvalid>, TExpression> {
    if !meta_obj.has(property_name) {
        return Ok(None);
    }
    let deps = meta_obj.get_value(property_name)?;
    if deps.is_array() {
        let deps = deps
            .get_array()?
            .iter()
            .map(|dep| get_dependency(&dep.get_object()?))
            .collect::<HostResult<Vec<_>, TExpression>>()?;
        Ok(Some(DepsOrInvalid::Valid(deps)))
    } else if deps.is_string() {
        Ok(Some(DepsOrInvalid::Invalid))
    } else {
        Ok(None)
    }
}

/// Unwraps `forwardRef(function () { return X; })` to `X`; any other non-call value is kept
/// as is.
pub fn extract_forward_ref<TExpression: AstNode>(
    expr: &AstValue<'_, TExpression>,
) -> HostResult<o::Expression, TExpression> {
    if !expr.is_call_expression() {
        return Ok(expr.get_opaque());
    }

    let callee = expr.get_callee()?;
    if callee.get_symbol_name().as_deref() != Some("forwardRef") {
        return Err(FatalLinkerError::new(
            callee.expression,
            "Unsupported expression, expected a `forwardRef()` call or a type reference",
        ));
    }

    let args = expr.get_arguments()?;
    if args.len() != 1 {
        return Err(FatalLinkerError::new(
            expr.expression.clone(),
            "Unsupported `forwardRef(fn)` call, expected a single argument",
        ));
    }

    let wrapper_fn = &args[0];
    if !wrapper_fn.is_function() {
        return Err(FatalLinkerError::new(
            wrapper_fn.expression.clone(),
            "Unsupported `forwardRef(fn)` call, expected its argument to be a function",
        ));
    }

    Ok(wrapper_fn.get_function_return_value()?.get_opaque())
}
