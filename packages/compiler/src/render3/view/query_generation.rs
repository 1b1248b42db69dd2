//! Render3 Query Generation
//!
//! Content and view query functions for directive definitions.

use crate::constant_pool::ConstantPool;
use crate::core::RenderFlags;
use crate::output::output_ast::{
    self as o, Expression, ExternalReference, FnParam, Statement, StmtModifier,
};
use crate::render3::r3_identifiers::Identifiers as R3;

use super::api::{R3QueryMetadata, R3QueryPredicate};
use super::util::{CONTEXT_NAME, DIRECTIVE_INDEX, RENDER_FLAGS, TEMPORARY_NAME};

/// A set of flags to be used with Queries.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryFlags {
    None = 0b0000,
    /// Whether or not the query should descend into children.
    Descendants = 0b0001,
    /// The query can be computed statically.
    IsStatic = 0b0010,
    /// If the `QueryList` should fire change event only if actual change was computed.
    EmitDistinctChangesOnly = 0b0100,
}

fn to_query_flags(query: &R3QueryMetadata) -> u32 {
    let mut flags = QueryFlags::None as u32;
    if query.descendants {
        flags |= QueryFlags::Descendants as u32;
    }
    if query.static_ {
        flags |= QueryFlags::IsStatic as u32;
    }
    if query.emit_distinct_changes_only {
        flags |= QueryFlags::EmitDistinctChangesOnly as u32;
    }
    flags
}

/// String predicates may hold comma separated refs (`'a, b'`); each ref becomes its own entry
/// and the resulting array is always shared through the pool.
fn get_query_predicate(query: &R3QueryMetadata, constant_pool: &mut ConstantPool) -> Expression {
    match &query.predicate {
        R3QueryPredicate::Selectors(selectors) => {
            let predicate: Vec<Expression> = selectors
                .iter()
                .flat_map(|selector| selector.split(','))
                .map(|token| *o::literal(token.trim()))
                .collect();
            constant_pool.get_const_literal(*o::literal_arr(predicate), true)
        }
        R3QueryPredicate::Expression(expr) => expr.clone(),
    }
}

fn prepare_query_params(query: &R3QueryMetadata, constant_pool: &mut ConstantPool) -> Vec<Expression> {
    let mut parameters = vec![
        get_query_predicate(query, constant_pool),
        *o::literal(to_query_flags(query)),
    ];
    if let Some(read) = &query.read {
        parameters.push(read.clone());
    }
    parameters
}

/// `if (rf & flags) { ... }`
fn render_flag_check_if_stmt(flags: RenderFlags, statements: Vec<Statement>) -> Statement {
    Statement::IfStmt(o::IfStmt {
        condition: o::variable(RENDER_FLAGS).bitwise_and(o::literal(flags as u32)),
        true_case: statements,
        false_case: vec![],
    })
}

/// `ɵɵqueryRefresh(_t = ɵɵloadQuery()) && (ctx.prop = _t.first)`
fn query_update_statement(query: &R3QueryMetadata) -> Statement {
    let temporary = o::variable(TEMPORARY_NAME);
    let get_query_list = o::import_ref(R3::load_query()).call_fn(vec![], false);
    let refresh = o::import_ref(R3::query_refresh()).call_fn(vec![*temporary.set(get_query_list)], false);
    let value = if query.first {
        temporary.prop("first")
    } else {
        temporary
    };
    let update_directive = o::variable(CONTEXT_NAME).prop(query.property_name.clone()).set(value);
    refresh.and(update_directive).to_stmt()
}

fn build_query_function(
    queries: &[R3QueryMetadata],
    constant_pool: &mut ConstantPool,
    create_fn: ExternalReference,
    prepend_params: &[Expression],
    params: Vec<FnParam>,
    name: Option<String>,
) -> Expression {
    let mut create_statements: Vec<Statement> = vec![];
    let mut update_statements: Vec<Statement> = vec![];

    for query in queries {
        let mut args = prepend_params.to_vec();
        args.extend(prepare_query_params(query, constant_pool));
        create_statements.push(o::import_ref(create_fn.clone()).call_fn(args, false).to_stmt());
        update_statements.push(query_update_statement(query));
    }

    if !queries.is_empty() {
        update_statements.insert(0, o::declare_var(TEMPORARY_NAME, None, StmtModifier::None));
    }

    *o::fn_expr(
        params,
        vec![
            render_flag_check_if_stmt(RenderFlags::Create, create_statements),
            render_flag_check_if_stmt(RenderFlags::Update, update_statements),
        ],
        name,
    )
}

/// Define and update any view queries.
pub fn create_view_queries_function(
    view_queries: &[R3QueryMetadata],
    constant_pool: &mut ConstantPool,
    name: Option<&str>,
) -> Expression {
    build_query_function(
        view_queries,
        constant_pool,
        R3::view_query(),
        &[],
        vec![FnParam::new(RENDER_FLAGS), FnParam::new(CONTEXT_NAME)],
        name.map(|n| format!("{}_Query", n)),
    )
}

/// Define and update any content queries.
pub fn create_content_queries_function(
    queries: &[R3QueryMetadata],
    constant_pool: &mut ConstantPool,
    name: Option<&str>,
) -> Expression {
    build_query_function(
        queries,
        constant_pool,
        R3::content_query(),
        &[*o::variable(DIRECTIVE_INDEX)],
        vec![
            FnParam::new(RENDER_FLAGS),
            FnParam::new(CONTEXT_NAME),
            FnParam::new(DIRECTIVE_INDEX),
        ],
        name.map(|n| format!("{}_ContentQueries", n)),
    )
}
