//! ES2015 Linker
//!
//! Links every partial declaration of a JavaScript file parsed with `oxc_parser`, returning the
//! rewritten source text.

use std::collections::HashSet;
use std::rc::Rc;

use angular_compiler::render3::view::api::{TemplateCompiler, UnsupportedTemplateCompiler};
use oxc_allocator::Allocator;
use oxc_ast::ast::{CallExpression, Expression};
use oxc_ast::AstKind;
use oxc_parser::{ParseOptions, Parser};
use oxc_semantic::{Semantic, SemanticBuilder};
use oxc_span::{GetSpan, SourceType, Span};

use crate::linker::ast::AstHost;
use crate::linker::constant_scope_registry::ConstantScopeRegistry;
use crate::linker::error::{FileLinkError, LinkerError};
use crate::linker::file_linker::{needs_linking, FileLinker};
use crate::linker::linker_environment::LinkerEnvironment;
use crate::linker::linker_options::LinkerOptions;
use crate::ngtsc::logging::{Logger, NullLogger};

use super::oxc_ast_factory::{opens_declaration_or_block, OxcAstFactory};
use super::oxc_ast_host::{OxcAstHost, OxcNode, Precedence};
use super::oxc_binding_resolver::OxcBindingResolver;

/// Everything a file is linked with besides its source.
pub struct LinkerSetup {
    pub options: LinkerOptions,
    pub logger: Box<dyn Logger>,
    pub template_compiler: Rc<dyn TemplateCompiler>,
}

impl LinkerSetup {
    pub fn new(options: LinkerOptions) -> Self {
        Self {
            options,
            logger: Box::new(NullLogger::new()),
            template_compiler: Rc::new(UnsupportedTemplateCompiler),
        }
    }

    pub fn with_logger(mut self, logger: Box<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_template_compiler(mut self, template_compiler: Rc<dyn TemplateCompiler>) -> Self {
        self.template_compiler = template_compiler;
        self
    }
}

impl Default for LinkerSetup {
    fn default() -> Self {
        Self::new(LinkerOptions::default())
    }
}

/// Links `code` with the default setup for `options`.
pub fn link_source(
    filename: &str,
    code: &str,
    options: &LinkerOptions,
) -> Result<String, FileLinkError> {
    link_source_with(filename, code, LinkerSetup::new(options.clone()))
}

pub fn link_source_with(
    filename: &str,
    code: &str,
    setup: LinkerSetup,
) -> Result<String, FileLinkError> {
    if !needs_linking(code) {
        setup
            .logger
            .debug(&format!("{}: no partial declarations", filename));
        return Ok(code.to_string());
    }

    let allocator = Allocator::default();
    let source_type = SourceType::from_path(filename)
        .unwrap_or_default()
        .with_module(setup.options.is_es_module);
    let parsed = Parser::new(&allocator, code, source_type)
        .with_options(ParseOptions {
            preserve_parens: false,
            ..ParseOptions::default()
        })
        .parse();
    if let Some(error) = parsed.errors.first() {
        let file_error = FileLinkError::new(filename, error.to_string());
        return Err(
            match error.labels.as_ref().and_then(|labels| labels.first()) {
                Some(label) => {
                    file_error.with_source(code, label.offset(), label.offset() + label.len())
                }
                None => file_error,
            },
        );
    }
    let semantic = SemanticBuilder::new().build(&parsed.program).semantic;

    let host = OxcAstHost::new(code);
    let factory = OxcAstFactory::new(code);
    let environment = LinkerEnvironment::create(&host, &factory, setup.logger, setup.options)
        .with_template_compiler(setup.template_compiler);

    let mut plugin = Es2015LinkerPlugin::new(&environment, &semantic, filename, code);
    plugin
        .enter_program()
        .map_err(|error| file_link_error(filename, &host, error, None))?;
    for node in semantic.nodes().iter() {
        if let AstKind::CallExpression(call) = node.kind() {
            plugin
                .visit_call_expression(call)
                .map_err(|error| file_link_error(filename, &host, error, Some(call.span)))?;
        }
    }
    plugin
        .exit_program()
        .map_err(|error| file_link_error(filename, &host, error, None))
}

/// A pending change to the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    start: usize,
    end: usize,
    text: String,
}

/// Per-file linking state: a file linker and its constant scope registry exist exactly between
/// `enter_program` and `exit_program`.
struct Es2015LinkerPlugin<'e, 's, 'a> {
    environment: &'e LinkerEnvironment<'e, String, OxcNode<'a>>,
    semantic: &'s Semantic<'a>,
    source_url: &'e str,
    code: &'e str,
    file_linker: Option<FileLinker<'e, String, OxcNode<'a>>>,
    registry: Option<ConstantScopeRegistry<'e, OxcNode<'a>, OxcBindingResolver<'s, 'a>>>,
    edits: Vec<Edit>,
    /// Offsets where an expression begins a statement.
    statement_starts: HashSet<u32>,
    /// End of the last replaced call; calls nested in it were replaced along with it.
    linked_until: u32,
}

type PluginResult<'a, T> = Result<T, LinkerError<OxcNode<'a>>>;

impl<'e, 's, 'a> Es2015LinkerPlugin<'e, 's, 'a> {
    fn new(
        environment: &'e LinkerEnvironment<'e, String, OxcNode<'a>>,
        semantic: &'s Semantic<'a>,
        source_url: &'e str,
        code: &'e str,
    ) -> Self {
        Self {
            environment,
            semantic,
            source_url,
            code,
            file_linker: None,
            registry: None,
            edits: Vec::new(),
            statement_starts: statement_starts(semantic),
            linked_until: 0,
        }
    }

    fn enter_program(&mut self) -> PluginResult<'a, ()> {
        if self.file_linker.is_some() {
            return Err(invariant("expected `file_linker` to be null"));
        }
        if self.registry.is_some() {
            return Err(invariant("expected `registry` to be null"));
        }
        self.file_linker = Some(FileLinker::new(self.environment, self.source_url, self.code));
        self.registry = Some(ConstantScopeRegistry::new(
            self.environment.host,
            OxcBindingResolver::new(self.semantic),
        ));
        Ok(())
    }

    fn visit_call_expression(&mut self, call: &'a CallExpression<'a>) -> PluginResult<'a, ()> {
        if call.span.start < self.linked_until {
            return Ok(());
        }
        let file_linker = self
            .file_linker
            .as_mut()
            .ok_or_else(|| invariant("expected `file_linker` not to be null"))?;
        let registry = self
            .registry
            .as_mut()
            .ok_or_else(|| invariant("expected `registry` not to be null"))?;

        let callee_name = match callee_name(&call.callee) {
            Some(name) if file_linker.is_partial_declaration(name) => name,
            _ => return Ok(()),
        };
        // Spread arguments cannot be linked.
        let args = match call
            .arguments
            .iter()
            .map(|argument| argument.as_expression().map(OxcNode::Expression))
            .collect::<Option<Vec<_>>>()
        {
            Some(args) => args,
            None => return Ok(()),
        };

        let replacement = file_linker.link_partial_declaration(callee_name, &args, registry)?;
        let text = match &replacement {
            OxcNode::Code(code)
                if code.precedence < Precedence::Call
                    || (self.statement_starts.contains(&call.span.start)
                        && opens_declaration_or_block(&code.text)) =>
            {
                format!("({})", code.text)
            }
            _ => self.environment.host.print_node(&replacement),
        };
        self.edits.push(Edit {
            start: call.span.start as usize,
            end: call.span.end as usize,
            text,
        });
        self.linked_until = call.span.end;
        Ok(())
    }

    fn exit_program(&mut self) -> PluginResult<'a, String> {
        let file_linker = self
            .file_linker
            .take()
            .ok_or_else(|| invariant("expected `file_linker` not to be null"))?;
        let registry = self
            .registry
            .take()
            .ok_or_else(|| invariant("expected `registry` not to be null"))?;

        for (scope_id, statements) in file_linker.get_constant_statements()? {
            let insertion_point = registry.insertion_point(scope_id).ok_or_else(|| {
                invariant(&format!("expected constant scope {} to be registered", scope_id.0))
            })?;
            let text = insertion_point.render(&statements);
            if !text.is_empty() {
                self.edits.push(Edit {
                    start: insertion_point.offset,
                    end: insertion_point.offset,
                    text,
                });
            }
        }

        let linked = self.edits.iter().filter(|edit| edit.start != edit.end).count();
        if linked > 0 {
            self.environment.logger.info(&format!(
                "{}: linked {} partial declaration(s)",
                self.source_url, linked
            ));
        }
        Ok(apply_edits(self.code, std::mem::take(&mut self.edits)))
    }
}

fn statement_starts(semantic: &Semantic<'_>) -> HashSet<u32> {
    semantic
        .nodes()
        .iter()
        .filter_map(|node| match node.kind() {
            AstKind::ExpressionStatement(statement) => Some(statement.span.start),
            AstKind::ExportDefaultDeclaration(declaration) => declaration
                .declaration
                .as_expression()
                .map(|expression| expression.span().start),
            _ => None,
        })
        .collect()
}

fn invariant<'a>(message: &str) -> LinkerError<OxcNode<'a>> {
    LinkerError::Invariant(message.to_string())
}

/// `fn(...)` and `ns.fn(...)` both call `fn`.
fn callee_name<'a>(callee: &'a Expression<'a>) -> Option<&'a str> {
    match callee {
        Expression::Identifier(identifier) => Some(identifier.name.as_str()),
        Expression::StaticMemberExpression(member) => Some(member.property.name.as_str()),
        _ => None,
    }
}

/// Applies non-overlapping edits in source order; insertions at a position go before a
/// replacement starting there.
fn apply_edits(code: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| (edit.start, edit.end));
    let mut output = String::with_capacity(code.len());
    let mut cursor = 0;
    for edit in edits {
        if edit.start < cursor {
            continue;
        }
        output.push_str(&code[cursor..edit.start]);
        output.push_str(&edit.text);
        cursor = edit.end;
    }
    output.push_str(&code[cursor..]);
    output
}

fn file_link_error<'a>(
    filename: &str,
    host: &OxcAstHost<'a>,
    error: LinkerError<OxcNode<'a>>,
    fallback: Option<Span>,
) -> FileLinkError {
    let location = error
        .node()
        .and_then(|node| host.get_range(node).ok())
        .map(|range| (range.start_pos, range.end_pos))
        .or_else(|| fallback.map(|span| (span.start as usize, span.end as usize)));
    let file_error = FileLinkError::new(filename, error.to_string());
    match location {
        Some((start, end)) => file_error.with_source(host.source(), start, end),
        None => file_error,
    }
}
