//! Red parser.
//!
//! Converts Red source text into a concrete syntax tree with source spans.
//! Purely syntactic; no evaluation or word binding happens here.
//!
//! Construction validates the grammar artifact behind the supplied
//! [`Language`]: a descriptor over an incompatible or corrupt artifact is
//! rejected with [`GrammarLoadError`], and a valid one never fails. Parsing
//! itself is recursive descent over the lexer's value stream; the only
//! backtracking points are point-vs-paren after `(`, construct keywords
//! that turn out to be plain words, and infix operators with no right
//! operand.

use std::sync::Arc;

use crate::diagnostics::{GrammarLoadError, ParseError, ParseErrorKind, SourceContext};
use crate::grammar::{Grammar, Language, ABI_VERSION, MIN_COMPATIBLE_ABI};
use crate::syntax::lexer::{Item, Lexer};
use crate::syntax::{Span, SyntaxKind, SyntaxNode, Tree};

/// A parser bound to one language descriptor.
#[derive(Debug)]
pub struct Parser {
    language: Language,
}

impl Parser {
    /// Binds a parser to `language`, validating the artifact behind it.
    ///
    /// For a structurally valid artifact this never fails, no matter how
    /// many times it is repeated; construction holds no one-shot state.
    pub fn new(language: Language) -> Result<Self, GrammarLoadError> {
        let grammar = language.grammar();
        let found = grammar.abi_version;
        if !(MIN_COMPATIBLE_ABI..=ABI_VERSION).contains(&found) {
            return Err(GrammarLoadError::AbiMismatch {
                min: MIN_COMPATIBLE_ABI,
                max: ABI_VERSION,
                found,
            });
        }
        grammar.validate()?;
        Ok(Self { language })
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Parses `source` into a syntax tree.
    pub fn parse(
        &mut self,
        source: &str,
        context: SourceContext,
    ) -> Result<Tree, ParseError> {
        let grammar = self.language.grammar();
        let mut session = Session {
            lexer: Lexer::new(source, &context, grammar.months),
            src: source,
            grammar,
            context: &context,
        };
        let root = session.parse_source_file()?;
        Ok(Tree::new(Arc::from(source), root))
    }
}

struct Session<'s> {
    lexer: Lexer<'s>,
    src: &'s str,
    grammar: &'static Grammar,
    context: &'s SourceContext,
}

impl<'s> Session<'s> {
    // ------------------------------------------------------------------------
    // Error helpers
    // ------------------------------------------------------------------------

    fn unexpected_item(&self, expected: &str, item: &Item) -> ParseError {
        ParseError::new(
            ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: item.describe(),
            },
            self.context,
            item.span(),
        )
    }

    fn unexpected_end(&self, expected: &str) -> ParseError {
        let end = self.src.len();
        ParseError::new(
            ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found: "end of input".to_string(),
            },
            self.context,
            Span::new(end, end),
        )
    }

    fn unclosed(&self, delimiter: char, open: Span) -> ParseError {
        ParseError::new(
            ParseErrorKind::UnclosedDelimiter { delimiter },
            self.context,
            open,
        )
    }

    // ------------------------------------------------------------------------
    // Grammar productions
    // ------------------------------------------------------------------------

    fn parse_source_file(&mut self) -> Result<SyntaxNode, ParseError> {
        let mut children = Vec::new();
        while let Some(item) = self.lexer.next_item()? {
            match item {
                Item::Include(span) => children.push(self.parse_include(span)?),
                Item::CloseBlock(_) | Item::CloseParen(_) | Item::Comma(_) => {
                    return Err(self.unexpected_item("a value", &item))
                }
                other => children.push(self.parse_expression(other)?),
            }
        }
        Ok(SyntaxNode::new(
            SyntaxKind::SourceFile,
            Span::new(0, self.src.len()),
            children,
        ))
    }

    /// `#include %file`.
    fn parse_include(&mut self, keyword: Span) -> Result<SyntaxNode, ParseError> {
        match self.lexer.next_item()? {
            Some(Item::Value(file)) if file.kind == SyntaxKind::File => {
                let span = keyword.cover(file.span);
                Ok(SyntaxNode::new(SyntaxKind::Include, span, vec![file]))
            }
            Some(other) => Err(self.unexpected_item("a file", &other)),
            None => Err(self.unexpected_end("a file")),
        }
    }

    fn parse_expression(&mut self, item: Item) -> Result<SyntaxNode, ParseError> {
        match item {
            Item::Value(node) if node.kind == SyntaxKind::Comment => Ok(node),
            Item::Value(node) if node.kind == SyntaxKind::Word => {
                let text = node.text(self.src).to_string();
                if let Some(kind) = self.grammar.construct_kind(&text) {
                    if let Some(construct) = self.try_construct(&node, kind)? {
                        return Ok(construct);
                    }
                }
                self.fold_infix(node)
            }
            Item::Value(node) => self.fold_infix(node),
            Item::OpenBlock(span) => self.parse_block(span),
            Item::OpenParen(span) => {
                let node = self.parse_point_or_paren(span)?;
                if node.kind == SyntaxKind::Point {
                    self.fold_infix(node)
                } else {
                    Ok(node)
                }
            }
            Item::OpenMap(span) => {
                let map = self.parse_map(span)?;
                self.fold_infix(map)
            }
            other => Err(self.unexpected_item("a value", &other)),
        }
    }

    /// `[` expression* `]`.
    fn parse_block(&mut self, open: Span) -> Result<SyntaxNode, ParseError> {
        let mut children = Vec::new();
        loop {
            match self.lexer.next_item()? {
                None => return Err(self.unclosed('[', open)),
                Some(Item::CloseBlock(close)) => {
                    return Ok(SyntaxNode::new(
                        SyntaxKind::Block,
                        open.cover(close),
                        children,
                    ))
                }
                Some(item) => children.push(self.parse_expression(item)?),
            }
        }
    }

    /// `(` number `,` number [`,` number] `)`, or `(` simple-expression* `)`.
    fn parse_point_or_paren(&mut self, open: Span) -> Result<SyntaxNode, ParseError> {
        if let Some(point) = self.try_parse_point(open)? {
            return Ok(point);
        }
        let mut children = Vec::new();
        loop {
            match self.lexer.next_item()? {
                None => return Err(self.unclosed('(', open)),
                Some(Item::CloseParen(close)) => {
                    return Ok(SyntaxNode::new(
                        SyntaxKind::Paren,
                        open.cover(close),
                        children,
                    ))
                }
                Some(Item::Value(node)) if node.kind == SyntaxKind::Comment => {
                    children.push(node)
                }
                Some(Item::Value(node)) => children.push(self.fold_infix(node)?),
                Some(Item::OpenMap(span)) => {
                    let map = self.parse_map(span)?;
                    children.push(self.fold_infix(map)?);
                }
                Some(item @ Item::OpenParen(_)) => {
                    let span = item.span();
                    match self.try_parse_point(span)? {
                        Some(point) => children.push(self.fold_infix(point)?),
                        None => {
                            return Err(self.unexpected_item("a value or ')'", &item))
                        }
                    }
                }
                Some(other) => {
                    return Err(self.unexpected_item("a value or ')'", &other))
                }
            }
        }
    }

    /// Attempts the point form after an already-consumed `(`. Restores the
    /// lexer and returns `None` when the contents are not a point.
    fn try_parse_point(&mut self, open: Span) -> Result<Option<SyntaxNode>, ParseError> {
        let save = self.lexer.clone();
        let mut numbers = Vec::new();

        macro_rules! bail {
            () => {{
                self.lexer = save;
                return Ok(None);
            }};
        }

        match self.lexer.next_item()? {
            Some(Item::Value(n)) if n.kind == SyntaxKind::Number => numbers.push(n),
            _ => bail!(),
        }
        match self.lexer.next_item()? {
            Some(Item::Comma(_)) => {}
            _ => bail!(),
        }
        match self.lexer.next_item()? {
            Some(Item::Value(n)) if n.kind == SyntaxKind::Number => numbers.push(n),
            _ => bail!(),
        }
        let close = match self.lexer.next_item()? {
            Some(Item::CloseParen(close)) => close,
            Some(Item::Comma(_)) => {
                match self.lexer.next_item()? {
                    Some(Item::Value(n)) if n.kind == SyntaxKind::Number => {
                        numbers.push(n)
                    }
                    _ => bail!(),
                }
                match self.lexer.next_item()? {
                    Some(Item::CloseParen(close)) => close,
                    _ => bail!(),
                }
            }
            _ => bail!(),
        };
        Ok(Some(SyntaxNode::new(
            SyntaxKind::Point,
            open.cover(close),
            numbers,
        )))
    }

    /// `#[` (literal literal)* `]`.
    fn parse_map(&mut self, open: Span) -> Result<SyntaxNode, ParseError> {
        let mut children = Vec::new();
        let mut literals = 0usize;
        loop {
            match self.lexer.next_item()? {
                None => return Err(self.unclosed('[', open)),
                Some(Item::CloseBlock(close)) => {
                    if literals % 2 != 0 {
                        return Err(ParseError::new(
                            ParseErrorKind::UnexpectedToken {
                                expected: "a map value".to_string(),
                                found: "']'".to_string(),
                            },
                            self.context,
                            close,
                        ));
                    }
                    return Ok(SyntaxNode::new(
                        SyntaxKind::Map,
                        open.cover(close),
                        children,
                    ));
                }
                Some(Item::Value(node)) if node.kind == SyntaxKind::Comment => {
                    children.push(node)
                }
                Some(Item::Value(node)) if node.kind.is_literal() => {
                    literals += 1;
                    children.push(node);
                }
                Some(Item::OpenMap(span)) => {
                    let nested = self.parse_map(span)?;
                    literals += 1;
                    children.push(nested);
                }
                Some(item @ Item::OpenParen(_)) => {
                    let span = item.span();
                    match self.try_parse_point(span)? {
                        Some(point) => {
                            literals += 1;
                            children.push(point);
                        }
                        None => {
                            return Err(self.unexpected_item("a literal or ']'", &item))
                        }
                    }
                }
                Some(other) => {
                    return Err(self.unexpected_item("a literal or ']'", &other))
                }
            }
        }
    }

    /// Folds whitespace-delimited operators into left-associative `infix`
    /// nodes. An operator with no usable right operand is left for the
    /// next value scan.
    fn fold_infix(&mut self, mut left: SyntaxNode) -> Result<SyntaxNode, ParseError> {
        loop {
            let save = self.lexer.clone();
            let op = match self.lexer.try_infix() {
                Some(op) => op,
                None => return Ok(left),
            };
            let right = match self.lexer.next_item()? {
                Some(item) => match self.parse_simple_operand(item)? {
                    Some(node) => node,
                    None => {
                        self.lexer = save;
                        return Ok(left);
                    }
                },
                None => {
                    self.lexer = save;
                    return Ok(left);
                }
            };
            let span = left.span.cover(right.span);
            left = SyntaxNode::new(
                SyntaxKind::Infix,
                span,
                vec![
                    left.with_field("left"),
                    op.with_field("operator"),
                    right.with_field("right"),
                ],
            );
        }
    }

    /// An operand for infix and `loop`: any literal value. Returns `None`
    /// for structure that cannot be an operand.
    fn parse_simple_operand(
        &mut self,
        item: Item,
    ) -> Result<Option<SyntaxNode>, ParseError> {
        match item {
            Item::Value(node) if node.kind == SyntaxKind::Comment => Ok(None),
            Item::Value(node) => Ok(Some(node)),
            Item::OpenMap(span) => self.parse_map(span).map(Some),
            Item::OpenParen(span) => self.try_parse_point(span),
            _ => Ok(None),
        }
    }

    /// Attempts `while`/`loop`/`func` after their keyword word. Restores
    /// the lexer and returns `None` when the construct shape is absent, in
    /// which case the keyword is an ordinary word.
    fn try_construct(
        &mut self,
        keyword: &SyntaxNode,
        kind: SyntaxKind,
    ) -> Result<Option<SyntaxNode>, ParseError> {
        let save = self.lexer.clone();

        macro_rules! bail {
            () => {{
                self.lexer = save;
                return Ok(None);
            }};
        }

        match kind {
            SyntaxKind::While | SyntaxKind::Function => {
                let first = match self.lexer.next_item()? {
                    Some(Item::OpenBlock(span)) => self.parse_block(span)?,
                    _ => bail!(),
                };
                let second = match self.lexer.next_item()? {
                    Some(Item::OpenBlock(span)) => self.parse_block(span)?,
                    _ => bail!(),
                };
                let span = keyword.span.cover(second.span);
                Ok(Some(SyntaxNode::new(kind, span, vec![first, second])))
            }
            SyntaxKind::Loop => {
                let seed = match self.lexer.next_item()? {
                    Some(item) => match self.parse_simple_operand(item)? {
                        Some(node) => node,
                        None => bail!(),
                    },
                    None => bail!(),
                };
                let count = self.fold_infix(seed)?;
                let body = match self.lexer.next_item()? {
                    Some(Item::OpenBlock(span)) => self.parse_block(span)?,
                    _ => bail!(),
                };
                let span = keyword.span.cover(body.span);
                Ok(Some(SyntaxNode::new(kind, span, vec![count, body])))
            }
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar;

    fn parse(source: &str) -> Tree {
        let mut parser = Parser::new(Language::red()).expect("load grammar");
        parser
            .parse(source, SourceContext::from_file("test", source))
            .expect("parse ok")
    }

    fn parse_err(source: &str) -> ParseError {
        let mut parser = Parser::new(Language::red()).expect("load grammar");
        parser
            .parse(source, SourceContext::from_file("test", source))
            .expect_err("parse should fail")
    }

    #[test]
    fn empty_input_parses_to_bare_root() {
        let tree = parse("");
        assert_eq!(tree.pretty(), "(source_file)");
    }

    #[test]
    fn infix_is_left_associative() {
        let tree = parse("1 + 2 * 3");
        assert_eq!(
            tree.pretty(),
            "(source_file (infix left: (infix left: (number) operator: (operator) \
             right: (number)) operator: (operator) right: (number)))"
        );
    }

    #[test]
    fn operator_without_right_operand_stays_a_word() {
        let tree = parse("1 +");
        assert_eq!(tree.pretty(), "(source_file (number) (word))");
    }

    #[test]
    fn point_versus_paren() {
        let tree = parse("(1, 2)");
        assert_eq!(
            tree.pretty(),
            "(source_file (point (number) (number)))"
        );
        let tree = parse("(1, 2, 3)");
        assert_eq!(
            tree.pretty(),
            "(source_file (point (number) (number) (number)))"
        );
        let tree = parse("(print x)");
        assert_eq!(tree.pretty(), "(source_file (paren (word) (word)))");
    }

    #[test]
    fn constructs_take_their_blocks() {
        let tree = parse("while [x] [print x]");
        assert_eq!(
            tree.pretty(),
            "(source_file (while (block (word)) (block (word) (word))))"
        );
        let tree = parse("loop 3 [print x]");
        assert_eq!(
            tree.pretty(),
            "(source_file (loop (number) (block (word) (word))))"
        );
        let tree = parse("FUNC [a b] [a + b]");
        assert_eq!(
            tree.pretty(),
            "(source_file (function (block (word) (word)) (block (infix \
             left: (word) operator: (operator) right: (word)))))"
        );
    }

    #[test]
    fn construct_keyword_alone_is_a_word() {
        let tree = parse("while");
        assert_eq!(tree.pretty(), "(source_file (word))");
        let tree = parse("loop 3");
        assert_eq!(tree.pretty(), "(source_file (word) (number))");
    }

    #[test]
    fn include_at_top_level() {
        let tree = parse("#include %lib.red");
        assert_eq!(
            tree.pretty(),
            "(source_file (include (file (file_content))))"
        );
    }

    #[test]
    fn include_without_file_fails() {
        let err = parse_err("#include 42");
        assert!(matches!(
            err.kind,
            ParseErrorKind::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn unclosed_block_reports_open_span() {
        let err = parse_err("[1 2");
        assert!(matches!(
            err.kind,
            ParseErrorKind::UnclosedDelimiter { delimiter: '[' }
        ));
        assert_eq!(err.span(), Span::new(0, 1));
    }

    #[test]
    fn map_requires_pairs() {
        let tree = parse("#[a: 1 b: 2]");
        assert_eq!(
            tree.pretty(),
            "(source_file (map (set_word (word)) (number) (set_word (word)) (number)))"
        );
        let err = parse_err("#[a: 1 b:]");
        assert!(matches!(
            err.kind,
            ParseErrorKind::UnexpectedToken { .. }
        ));
    }

    #[test]
    fn comments_appear_in_the_tree() {
        let tree = parse("; header\n1");
        assert_eq!(tree.pretty(), "(source_file (comment) (number))");
        let tree = parse("[1 ; inner\n]");
        assert_eq!(
            tree.pretty(),
            "(source_file (block (number) (comment)))"
        );
    }

    #[test]
    fn parser_construction_is_idempotent() {
        for _ in 0..8 {
            assert!(Parser::new(Language::new(grammar::language())).is_ok());
        }
    }
}
