//! Everything a `FileLinker` needs from its surroundings.

use std::rc::Rc;

use angular_compiler::render3::view::api::{TemplateCompiler, UnsupportedTemplateCompiler};

use crate::linker::ast::{AstHost, AstNode};
use crate::linker::linker_options::LinkerOptions;
use crate::linker::translator::Translator;
use crate::ngtsc::logging::Logger;
use crate::ngtsc::translator::AstFactory;

pub struct LinkerEnvironment<'e, TStatement, TExpression: AstNode> {
    pub host: &'e dyn AstHost<TExpression>,
    pub factory: &'e dyn AstFactory<Statement = TStatement, Expression = TExpression>,
    pub translator: Translator<'e, TStatement, TExpression>,
    pub options: LinkerOptions,
    pub logger: Box<dyn Logger>,
    /// Template parsing and view code generation for component and directive linkers.
    pub template_compiler: Rc<dyn TemplateCompiler>,
}

impl<'e, TStatement, TExpression: AstNode> LinkerEnvironment<'e, TStatement, TExpression> {
    pub fn create(
        host: &'e dyn AstHost<TExpression>,
        factory: &'e dyn AstFactory<Statement = TStatement, Expression = TExpression>,
        logger: Box<dyn Logger>,
        options: LinkerOptions,
    ) -> Self {
        Self {
            host,
            factory,
            translator: Translator::new(factory, host),
            options,
            logger,
            template_compiler: Rc::new(UnsupportedTemplateCompiler),
        }
    }

    pub fn with_template_compiler(mut self, template_compiler: Rc<dyn TemplateCompiler>) -> Self {
        self.template_compiler = template_compiler;
        self
    }
}
