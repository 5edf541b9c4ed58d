//! Diagnostics for the Red syntax toolkit.
//!
//! Two error families exist: [`GrammarLoadError`] for artifact problems
//! surfaced at parser construction, and [`ParseError`] for problems in the
//! source text being parsed. Both render through `miette`; parse errors
//! carry the offending span and the named source they came from.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

use crate::syntax::Span;

// ============================================================================
// SOURCE CONTEXT
// ============================================================================

/// Source text plus a display name, for error reporting.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context from real file content.
    pub fn from_file(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Create a fallback when real source is unavailable.
    pub fn fallback(context: &str) -> Self {
        Self {
            name: "fallback".to_string(),
            content: format!("; {}", context),
        }
    }

    /// Convert to a NamedSource for use with miette error reporting.
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

impl Default for SourceContext {
    fn default() -> Self {
        Self::fallback("default context")
    }
}

/// Converts a syntax [`Span`] to a miette `SourceSpan`.
pub fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::from(span.start..span.end)
}

// ============================================================================
// GRAMMAR LOAD ERRORS
// ============================================================================

/// Any failure while binding a grammar artifact to the parsing engine.
///
/// A structurally valid artifact never produces one of these; they exist for
/// artifacts from a different engine generation or with corrupt tables.
#[derive(Debug, Error, Diagnostic)]
pub enum GrammarLoadError {
    #[error("grammar ABI version {found} is outside the supported range {min}..={max}")]
    #[diagnostic(code(carmine::grammar::abi_mismatch))]
    AbiMismatch { min: u16, max: u16, found: u16 },

    #[error("grammar '{grammar}' declares no node kinds")]
    #[diagnostic(code(carmine::grammar::empty_node_table))]
    EmptyNodeTable { grammar: String },

    #[error("grammar '{grammar}' declares node kind id {id} more than once")]
    #[diagnostic(code(carmine::grammar::duplicate_kind))]
    DuplicateKind { grammar: String, id: u16 },

    #[error("grammar '{grammar}' has a gap below node kind id {id}")]
    #[diagnostic(code(carmine::grammar::sparse_node_table))]
    SparseNodeTable { grammar: String, id: u16 },

    #[error("grammar '{grammar}' has no '{root}' node kind")]
    #[diagnostic(code(carmine::grammar::missing_root))]
    MissingRoot {
        grammar: String,
        root: &'static str,
    },
}

// ============================================================================
// PARSE ERRORS
// ============================================================================

/// What went wrong while parsing source text.
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken { expected: String, found: String },
    UnclosedDelimiter { delimiter: char },
    MalformedLiteral { literal_type: String, value: String },
}

impl ParseErrorKind {
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnexpectedToken { .. } => "unexpected_token",
            Self::UnclosedDelimiter { .. } => "unclosed_delimiter",
            Self::MalformedLiteral { .. } => "malformed_literal",
        }
    }
}

/// A parse failure with the span it occurred at.
#[derive(Debug)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    source: Arc<NamedSource<String>>,
    primary_span: SourceSpan,
    help: Option<String>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, context: &SourceContext, span: Span) -> Self {
        Self {
            kind,
            source: context.to_named_source(),
            primary_span: to_source_span(span),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Byte span the error points at.
    pub fn span(&self) -> Span {
        Span::new(
            self.primary_span.offset(),
            self.primary_span.offset() + self.primary_span.len(),
        )
    }

    fn primary_label(&self) -> String {
        match &self.kind {
            ParseErrorKind::UnexpectedToken { .. } => "unexpected token".into(),
            ParseErrorKind::UnclosedDelimiter { .. } => "opened here".into(),
            ParseErrorKind::MalformedLiteral { .. } => "invalid literal".into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParseErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "Parse error: expected {}, found {}", expected, found)
            }
            ParseErrorKind::UnclosedDelimiter { delimiter } => {
                write!(f, "Parse error: unclosed '{}'", delimiter)
            }
            ParseErrorKind::MalformedLiteral {
                literal_type,
                value,
            } => {
                write!(f, "Parse error: invalid {} '{}'", literal_type, value)
            }
        }
    }
}

impl std::error::Error for ParseError {}

impl Diagnostic for ParseError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!(
            "carmine::parse::{}",
            self.kind.code_suffix()
        )))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.primary_label()),
            self.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source)
    }
}

// ============================================================================
// UMBRELLA ERROR
// ============================================================================

/// Any error the toolkit can surface to a caller.
#[derive(Debug, Error, Diagnostic)]
pub enum CarmineError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Grammar(#[from] GrammarLoadError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Prints an error with full miette diagnostics.
///
/// Use for user-facing error display in CLI contexts.
pub fn print_error(error: CarmineError) {
    use miette::Report;
    let report = Report::new(error);
    eprintln!("{report:?}");
}
