//! Linker Errors

use std::fmt;

use miette::{Diagnostic, GraphicalReportHandler, GraphicalTheme, NamedSource, SourceSpan};
use thiserror::Error;

use crate::ngtsc::translator::TranslateError;

/// An error that occurred during linking, anchored on the node that caused it so the source
/// location can be recovered.
#[derive(Debug, Clone)]
pub struct FatalLinkerError<TExpression> {
    pub node: TExpression,
    pub message: String,
}

impl<TExpression> FatalLinkerError<TExpression> {
    pub fn new(node: TExpression, message: impl Into<String>) -> Self {
        Self {
            node,
            message: message.into(),
        }
    }

    /// Prefixes the message, keeping the anchor node.
    pub fn with_prefix(self, prefix: &str) -> Self {
        Self {
            node: self.node,
            message: format!("{}{}", prefix, self.message),
        }
    }
}

impl<TExpression> fmt::Display for FatalLinkerError<TExpression> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl<TExpression: fmt::Debug> std::error::Error for FatalLinkerError<TExpression> {}

/// Anything that can stop a declaration from being linked.
#[derive(Debug, Error)]
pub enum LinkerError<TExpression: fmt::Debug> {
    /// A problem with the linked source, reported against a node.
    #[error("{0}")]
    Fatal(FatalLinkerError<TExpression>),
    /// The declaration itself cannot be dispatched (unknown function or version).
    #[error("{0}")]
    Declaration(String),
    #[error(transparent)]
    Translate(#[from] TranslateError),
    /// The linker was driven in an order it does not support.
    #[error("BUG - {0}")]
    Invariant(String),
}

impl<TExpression: fmt::Debug> From<FatalLinkerError<TExpression>> for LinkerError<TExpression> {
    fn from(error: FatalLinkerError<TExpression>) -> Self {
        LinkerError::Fatal(error)
    }
}

impl<TExpression: fmt::Debug> LinkerError<TExpression> {
    /// The node the error is anchored on, when there is one.
    pub fn node(&self) -> Option<&TExpression> {
        match self {
            LinkerError::Fatal(error) => Some(&error.node),
            _ => None,
        }
    }
}

/// A linking failure for a whole file, ready to be reported to the user.
#[derive(Debug, Clone, Error, Diagnostic)]
#[error("{filename}: {message}")]
pub struct FileLinkError {
    pub filename: String,
    pub message: String,
    #[source_code]
    source_code: Option<NamedSource<String>>,
    #[label]
    span: Option<SourceSpan>,
}

impl FileLinkError {
    pub fn new(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            message: message.into(),
            source_code: None,
            span: None,
        }
    }

    /// Anchors the error on the byte range `start..end` of the file's source.
    pub fn with_source(mut self, source: &str, start: usize, end: usize) -> Self {
        let start = start.min(source.len());
        let end = end.clamp(start, source.len());
        self.source_code = Some(NamedSource::new(&self.filename, source.to_string()));
        self.span = Some(SourceSpan::from(start..end));
        self
    }

    pub fn span(&self) -> Option<SourceSpan> {
        self.span
    }

    /// The error with a code frame of its source, without colors.
    pub fn render(&self) -> String {
        let handler = GraphicalReportHandler::new_themed(GraphicalTheme::none())
            .with_context_lines(2)
            .with_width(200);
        let mut report = String::new();
        match handler.render_report(&mut report, self) {
            Ok(()) => report.trim_end().to_string(),
            Err(_) => self.to_string(),
        }
    }
}
