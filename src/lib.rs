pub use crate::diagnostics::{CarmineError, GrammarLoadError, ParseError, SourceContext};
pub use crate::grammar::{language, Grammar, Language};
pub use crate::syntax::{Parser, Span, Spanned, SyntaxKind, SyntaxNode, Tree};

pub mod cli;
pub mod diagnostics;
pub mod grammar;
pub mod syntax;

/// Parse Red source text with the bundled grammar.
///
/// Convenience wrapper over [`Parser`] for callers that do not need to hold
/// a parser across inputs.
pub fn parse(source: &str) -> Result<Tree, CarmineError> {
    let mut parser = Parser::new(Language::red())?;
    let tree = parser.parse(source, SourceContext::from_file("<input>", source))?;
    Ok(tree)
}
