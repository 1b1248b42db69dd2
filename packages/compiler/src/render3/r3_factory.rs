//! Render3 Factory
//!
//! Factory function generation for directives, components, pipes, injectables and NgModules.

use super::r3_identifiers::Identifiers as R3;
use super::util::{R3CompiledExpression, R3Reference};
use crate::core::InjectFlags;
use crate::output::output_ast::{
    self as o, Expression, ExternalReference, FnParam, Statement, StmtModifier,
};

/// Name of the factory parameter carrying an optional subclass type.
const FACTORY_TYPE_PARAM: &str = "t";

/// Name of the local holding the result of a conditional factory.
const CONDITIONAL_FACTORY_VAR: &str = "r";

/// Target types for factory generation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactoryTarget {
    Directive = 0,
    Component = 1,
    Injectable = 2,
    Pipe = 3,
    NgModule = 4,
}

impl FactoryTarget {
    /// Looks up a member by the name it has on the runtime enum.
    pub fn from_symbol_name(name: &str) -> Option<Self> {
        match name {
            "Directive" => Some(FactoryTarget::Directive),
            "Component" => Some(FactoryTarget::Component),
            "Injectable" => Some(FactoryTarget::Injectable),
            "Pipe" => Some(FactoryTarget::Pipe),
            "NgModule" => Some(FactoryTarget::NgModule),
            _ => None,
        }
    }
}

/// Metadata required by the factory generator
#[derive(Debug, Clone)]
pub struct R3ConstructorFactoryMetadata {
    /// String name of the type being generated (used to name the factory function)
    pub name: String,
    /// An expression representing the type being constructed
    pub type_: R3Reference,
    /// Constructor dependencies, `None` when the type inherits its constructor
    pub deps: Option<DepsOrInvalid>,
    /// Type of the target being created by the factory
    pub target: FactoryTarget,
}

/// Dependencies can be valid or invalid (unresolvable)
#[derive(Debug, Clone)]
pub enum DepsOrInvalid {
    Valid(Vec<R3DependencyMetadata>),
    Invalid,
}

/// Factory delegate type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum R3FactoryDelegateType {
    Class = 0,
    Function = 1,
}

/// Metadata for delegated factory
#[derive(Debug, Clone)]
pub struct R3DelegatedFnOrClassMetadata {
    pub base: R3ConstructorFactoryMetadata,
    pub delegate: Expression,
    pub delegate_type: R3FactoryDelegateType,
    pub delegate_deps: Vec<R3DependencyMetadata>,
}

/// Metadata for expression factory
#[derive(Debug, Clone)]
pub struct R3ExpressionFactoryMetadata {
    pub base: R3ConstructorFactoryMetadata,
    pub expression: Expression,
}

/// Union of all factory metadata types
#[derive(Debug, Clone)]
pub enum R3FactoryMetadata {
    Constructor(R3ConstructorFactoryMetadata),
    Delegated(R3DelegatedFnOrClassMetadata),
    Expression(R3ExpressionFactoryMetadata),
}

impl R3FactoryMetadata {
    pub fn base(&self) -> &R3ConstructorFactoryMetadata {
        match self {
            R3FactoryMetadata::Constructor(m) => m,
            R3FactoryMetadata::Delegated(m) => &m.base,
            R3FactoryMetadata::Expression(m) => &m.base,
        }
    }
}

/// Dependency metadata for DI
#[derive(Debug, Clone, Default)]
pub struct R3DependencyMetadata {
    /// Token or value to be injected, or None if unresolvable
    pub token: Option<Expression>,
    /// Whether the dependency is an `@Attribute()` injection of the named attribute
    pub attribute: bool,
    pub host: bool,
    pub optional: bool,
    pub self_: bool,
    pub skip_self: bool,
}

/// Construct a factory function expression for the given R3FactoryMetadata
///
/// ```js
/// function Foo_Factory(t) { return new (t || Foo)(ɵɵdirectiveInject(Bar)); }
/// ```
pub fn compile_factory_function(meta: &R3FactoryMetadata) -> R3CompiledExpression {
    let base = meta.base();
    let t = *o::variable(FACTORY_TYPE_PARAM);
    let mut base_factory_var: Option<String> = None;

    // The type to instantiate via constructor invocation. If there is no delegated factory,
    // then this is the type parameter `t` (when present) or the type itself.
    let type_for_ctor = if matches!(meta, R3FactoryMetadata::Delegated(_)) {
        t.clone()
    } else {
        *t.or(Box::new(base.type_.value.clone()))
    };

    let ctor_expr: Option<Expression> = match &base.deps {
        Some(DepsOrInvalid::Valid(deps)) => {
            Some(*type_for_ctor.instantiate(inject_dependencies(deps, base.target)))
        }
        Some(DepsOrInvalid::Invalid) => None,
        None => {
            // No constructor of its own, reuse the factory inherited from the base class.
            let var_name = format!("ɵ{}_BaseFactory", base.name);
            let call = o::variable(var_name.clone()).call_fn(vec![type_for_ctor.clone()], false);
            base_factory_var = Some(var_name);
            Some(*call)
        }
    };

    let mut body: Vec<Statement> = Vec::new();

    let ret_expr = match meta {
        R3FactoryMetadata::Delegated(delegated) => {
            let delegate_args = inject_dependencies(&delegated.delegate_deps, base.target);
            let factory_expr = match delegated.delegate_type {
                R3FactoryDelegateType::Class => *delegated.delegate.instantiate(delegate_args),
                R3FactoryDelegateType::Function => *delegated.delegate.call_fn(delegate_args, false),
            };
            Some(make_conditional_factory(&mut body, &t, ctor_expr, factory_expr))
        }
        R3FactoryMetadata::Expression(expr_meta) => Some(make_conditional_factory(
            &mut body,
            &t,
            ctor_expr,
            expr_meta.expression.clone(),
        )),
        R3FactoryMetadata::Constructor(_) => ctor_expr,
    };

    match (ret_expr, &base_factory_var) {
        (None, _) => {
            // Cannot form an expression, render an invalidFactory() call.
            body.push(o::import_ref(R3::invalid_factory()).call_fn(vec![], false).to_stmt());
        }
        (Some(_), Some(base_var)) => {
            // ɵFoo_BaseFactory || (ɵFoo_BaseFactory = ɵɵgetInheritedFactory(Foo))
            let get_inherited = o::import_ref(R3::get_inherited_factory())
                .call_fn(vec![base.type_.value.clone()], false);
            let memoized = o::variable(base_var.clone()).or(o::variable(base_var.clone()).set(get_inherited));
            body.push(o::return_stmt(*memoized.call_fn(vec![type_for_ctor], false)));
        }
        (Some(ret), None) => body.push(o::return_stmt(ret)),
    }

    let mut factory_fn = *o::fn_expr(
        vec![FnParam::new(FACTORY_TYPE_PARAM)],
        body,
        Some(format!("{}_Factory", base.name)),
    );

    if let Some(base_var) = base_factory_var {
        // There is a base factory variable so wrap its declaration along with the factory
        // function in an IIFE.
        factory_fn = *o::fn_expr(
            vec![],
            vec![
                o::declare_var(base_var, None, StmtModifier::None),
                o::return_stmt(factory_fn),
            ],
            None,
        )
        .call_fn(vec![], true);
    }

    R3CompiledExpression::new(factory_fn, vec![])
}

/// `let r = null; if (t) { r = new t(); } else { r = nonCtorExpr; } return r;`
fn make_conditional_factory(
    body: &mut Vec<Statement>,
    t: &Expression,
    ctor_expr: Option<Expression>,
    non_ctor_expr: Expression,
) -> Expression {
    let r = o::variable(CONDITIONAL_FACTORY_VAR);
    body.push(o::declare_var(
        CONDITIONAL_FACTORY_VAR,
        Some(*o::null_expr()),
        StmtModifier::None,
    ));
    let ctor_stmt = match ctor_expr {
        Some(ctor) => r.set(Box::new(ctor)).to_stmt(),
        None => o::import_ref(R3::invalid_factory()).call_fn(vec![], false).to_stmt(),
    };
    body.push(Statement::IfStmt(o::IfStmt {
        condition: Box::new(t.clone()),
        true_case: vec![ctor_stmt],
        false_case: vec![r.set(Box::new(non_ctor_expr)).to_stmt()],
    }));
    *r
}

fn inject_dependencies(deps: &[R3DependencyMetadata], target: FactoryTarget) -> Vec<Expression> {
    deps.iter()
        .enumerate()
        .map(|(index, dep)| compile_inject_dependency(dep, target, index))
        .collect()
}

fn compile_inject_dependency(
    dep: &R3DependencyMetadata,
    target: FactoryTarget,
    index: usize,
) -> Expression {
    let token = match &dep.token {
        Some(token) => token.clone(),
        None => {
            return *o::import_ref(R3::invalid_factory_dep())
                .call_fn(vec![*o::literal(index)], false);
        }
    };

    if dep.attribute {
        return *o::import_ref(R3::inject_attribute()).call_fn(vec![token], false);
    }

    let mut flags = InjectFlags::Default as u32;
    if dep.self_ {
        flags |= InjectFlags::Self_ as u32;
    }
    if dep.skip_self {
        flags |= InjectFlags::SkipSelf as u32;
    }
    if dep.host {
        flags |= InjectFlags::Host as u32;
    }
    if dep.optional {
        flags |= InjectFlags::Optional as u32;
    }

    let mut inject_args = vec![token];
    if flags != InjectFlags::Default as u32 {
        inject_args.push(*o::literal(flags));
    }
    *o::import_ref(get_inject_fn(target)).call_fn(inject_args, false)
}

fn get_inject_fn(target: FactoryTarget) -> ExternalReference {
    match target {
        FactoryTarget::Component | FactoryTarget::Directive | FactoryTarget::Pipe => {
            R3::directive_inject()
        }
        FactoryTarget::NgModule | FactoryTarget::Injectable => R3::inject(),
    }
}
