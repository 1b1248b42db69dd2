//! Injectable Compiler
//!
//! Compiles `@Injectable` metadata into an `ɵɵdefineInjectable` call.

use crate::output::output_ast::{self as o, Expression, FnParam};
use crate::render3::r3_factory::{
    compile_factory_function, DepsOrInvalid, FactoryTarget, R3ConstructorFactoryMetadata,
    R3DelegatedFnOrClassMetadata, R3DependencyMetadata, R3ExpressionFactoryMetadata,
    R3FactoryDelegateType, R3FactoryMetadata,
};
use crate::render3::r3_identifiers::Identifiers;
use crate::render3::util::{R3CompiledExpression, R3Reference};
use crate::render3::view::util::DefinitionMap;

/// Injectable metadata for compilation
#[derive(Debug, Clone)]
pub struct R3InjectableMetadata {
    pub name: String,
    pub type_: R3Reference,
    pub provided_in: Expression,
    pub use_class: Option<Expression>,
    pub use_factory: Option<Expression>,
    pub use_existing: Option<Expression>,
    pub use_value: Option<Expression>,
    pub deps: Option<Vec<R3DependencyMetadata>>,
}

pub fn compile_injectable(meta: &R3InjectableMetadata) -> R3CompiledExpression {
    let factory_meta = R3ConstructorFactoryMetadata {
        name: meta.name.clone(),
        type_: meta.type_.clone(),
        deps: Some(DepsOrInvalid::Valid(vec![])),
        target: FactoryTarget::Injectable,
    };

    let mut statements = Vec::new();
    let factory = if let Some(use_class) = &meta.use_class {
        // `useClass` with the type itself and no deps means the injectable is constructed
        // by its own factory.
        let use_class_on_self = use_class.is_equivalent(&meta.type_.value);
        match &meta.deps {
            Some(deps) => {
                let compiled = compile_factory_function(&R3FactoryMetadata::Delegated(
                    R3DelegatedFnOrClassMetadata {
                        base: factory_meta,
                        delegate: use_class.clone(),
                        delegate_type: R3FactoryDelegateType::Class,
                        delegate_deps: deps.clone(),
                    },
                ));
                statements.extend(compiled.statements);
                compiled.expression
            }
            None if use_class_on_self => {
                let compiled = compile_factory_function(&R3FactoryMetadata::Constructor(factory_meta));
                statements.extend(compiled.statements);
                compiled.expression
            }
            None => delegate_to_factory(use_class),
        }
    } else if let Some(use_factory) = &meta.use_factory {
        match &meta.deps {
            Some(deps) => {
                let compiled = compile_factory_function(&R3FactoryMetadata::Delegated(
                    R3DelegatedFnOrClassMetadata {
                        base: factory_meta,
                        delegate: use_factory.clone(),
                        delegate_type: R3FactoryDelegateType::Function,
                        delegate_deps: deps.clone(),
                    },
                ));
                statements.extend(compiled.statements);
                compiled.expression
            }
            None => *o::fn_expr(
                vec![],
                vec![o::return_stmt(*use_factory.call_fn(vec![], false))],
                None,
            ),
        }
    } else if let Some(use_value) = &meta.use_value {
        // Even though `useValue` cannot depend on a constructor, the factory still has to be
        // built so the `t` parameter can construct subclasses.
        let compiled = compile_factory_function(&R3FactoryMetadata::Expression(
            R3ExpressionFactoryMetadata {
                base: factory_meta,
                expression: use_value.clone(),
            },
        ));
        statements.extend(compiled.statements);
        compiled.expression
    } else if let Some(use_existing) = &meta.use_existing {
        let compiled = compile_factory_function(&R3FactoryMetadata::Expression(
            R3ExpressionFactoryMetadata {
                base: factory_meta,
                expression: *o::import_ref(Identifiers::inject()).call_fn(vec![use_existing.clone()], false),
            },
        ));
        statements.extend(compiled.statements);
        compiled.expression
    } else {
        delegate_to_factory(&meta.type_.value)
    };

    let mut definition_map = DefinitionMap::new();
    definition_map.set("token", Some(meta.type_.value.clone()));
    definition_map.set("factory", Some(factory));
    definition_map.set("providedIn", Some(meta.provided_in.clone()));

    let expression = o::import_ref(Identifiers::define_injectable())
        .call_fn(vec![definition_map.to_literal_map()], false);
    R3CompiledExpression::new(*expression, statements)
}

/// `function (t) { return type.ɵfac(t); }`
fn delegate_to_factory(type_: &Expression) -> Expression {
    *o::fn_expr(
        vec![FnParam::new("t")],
        vec![o::return_stmt(*type_.prop("ɵfac").call_fn(vec![*o::variable("t")], false))],
        None,
    )
}
