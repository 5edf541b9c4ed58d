//! Tokenizer for Red source text.
//!
//! Red has no reserved words at the lexical level; almost everything is a
//! literal value, and the interesting work is deciding *which* literal a
//! stretch of text is. At each value start the lexer tries every candidate
//! form and keeps the longest match, breaking ties by the priority order of
//! the original grammar. The `hexa` form preempts this contest outright,
//! mirroring the external-scanner behavior it was ported from.
//!
//! The lexer produces complete [`SyntaxNode`]s for literal values (strings
//! and files carry their content children, paths carry their elements) and
//! plain [`Item`]s for structural punctuation. Construct keywords such as
//! `while` are emitted as ordinary words; the parser decides what they mean.

use crate::diagnostics::{ParseError, ParseErrorKind, SourceContext};
use crate::syntax::scanner;
use crate::syntax::{Span, Spanned, SyntaxKind, SyntaxNode};

/// One scanned item: a complete value node or a piece of structure.
#[derive(Debug, Clone)]
pub enum Item {
    /// A literal value or comment, with all of its children.
    Value(SyntaxNode),
    OpenBlock(Span),
    CloseBlock(Span),
    OpenParen(Span),
    CloseParen(Span),
    /// `#[`, opening a map.
    OpenMap(Span),
    Comma(Span),
    /// The `#include` keyword.
    Include(Span),
}

impl Item {
    pub fn span(&self) -> Span {
        match self {
            Item::Value(node) => node.span,
            Item::OpenBlock(span)
            | Item::CloseBlock(span)
            | Item::OpenParen(span)
            | Item::CloseParen(span)
            | Item::OpenMap(span)
            | Item::Comma(span)
            | Item::Include(span) => *span,
        }
    }

    /// Short description for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Item::Value(node) => node.kind.name().to_string(),
            Item::OpenBlock(_) => "'['".to_string(),
            Item::CloseBlock(_) => "']'".to_string(),
            Item::OpenParen(_) => "'('".to_string(),
            Item::CloseParen(_) => "')'".to_string(),
            Item::OpenMap(_) => "'#['".to_string(),
            Item::Comma(_) => "','".to_string(),
            Item::Include(_) => "'#include'".to_string(),
        }
    }
}

// ============================================================================
// CHARACTER CLASSES
// ============================================================================

fn is_word_start(c: char) -> bool {
    !c.is_whitespace()
        && !c.is_ascii_digit()
        && !matches!(
            c,
            '\'' | '/'
                | '\\'
                | ','
                | '['
                | ']'
                | '('
                | ')'
                | '{'
                | '}'
                | '"'
                | '#'
                | '%'
                | '$'
                | '@'
                | ':'
                | ';'
        )
}

fn is_word_continue(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '/' | '\\'
                | ','
                | '['
                | ']'
                | '('
                | ')'
                | '{'
                | '}'
                | '"'
                | '#'
                | '%'
                | '$'
                | '@'
                | ':'
                | ';'
        )
}

fn is_email_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '[' | ']' | '(' | ')' | '{' | '}' | '@' | ';' | ':' | '<' | '"'
        )
}

fn is_issue_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '[' | ']' | '(' | ')' | '{' | '}' | '@' | ';' | '"' | '<' | '>' | ':'
        )
}

fn is_ref_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '[' | ']'
                | '('
                | ')'
                | '{'
                | '}'
                | '@'
                | '#'
                | '$'
                | ';'
                | ','
                | '\''
                | '"'
                | '='
                | '<'
                | '>'
                | '^'
        )
}

fn is_refinement_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '/' | '\\'
                | ','
                | '['
                | ']'
                | '('
                | ')'
                | '{'
                | '}'
                | '"'
                | '#'
                | '%'
                | '$'
                | '@'
                | ':'
                | ';'
                | '<'
                | '>'
        )
}

// The original grammar lets bare file names run through spaces; real Red
// files end at whitespace, so the whitespace exclusion is deliberate here.
fn is_file_content_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '[' | ']' | '(' | ')' | '{' | '}' | '@' | ':' | ';' | '"'
        )
}

fn is_tag_start_char(c: char) -> bool {
    !c.is_whitespace()
        && !matches!(
            c,
            '[' | ']' | '(' | ')' | '{' | '}' | ';' | '"' | '<' | '>' | '='
        )
}

fn is_escaped_value_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '!' || c == '-'
}

// ============================================================================
// CURSOR
// ============================================================================

/// A cheap scanning position; matchers clone it freely and commit by
/// returning the advanced copy.
#[derive(Debug, Clone, Copy)]
struct Cursor<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Cursor<'s> {
    fn peek(&self) -> Option<char> {
        scanner::char_at(self.src, self.pos)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_str_ci(&mut self, expected: &str) -> bool {
        match self.src.get(self.pos..self.pos + expected.len()) {
            Some(chunk) if chunk.eq_ignore_ascii_case(expected) => {
                self.pos += expected.len();
                true
            }
            _ => false,
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> usize {
        let mut count = 0;
        while let Some(c) = self.peek() {
            if pred(c) {
                self.pos += c.len_utf8();
                count += 1;
            } else {
                break;
            }
        }
        count
    }

    fn eat_digits(&mut self) -> usize {
        self.eat_while(|c| c.is_ascii_digit())
    }

    fn eat_digits_max(&mut self, max: usize) -> usize {
        let mut count = 0;
        while count < max {
            match self.peek() {
                Some(c) if c.is_ascii_digit() => {
                    self.pos += 1;
                    count += 1;
                }
                _ => break,
            }
        }
        count
    }
}

fn eat_sign(c: &mut Cursor) {
    if matches!(c.peek(), Some('+') | Some('-')) {
        c.bump();
    }
}

/// `repeat1` digits, with `'` group separators.
fn eat_digits_sep(c: &mut Cursor) -> bool {
    if c.eat_digits() == 0 {
        return false;
    }
    loop {
        let save = *c;
        if c.eat('\'') {
            if c.eat_digits() == 0 {
                *c = save;
                break;
            }
        } else {
            break;
        }
    }
    true
}

// ============================================================================
// LEXER
// ============================================================================

#[derive(Clone)]
pub struct Lexer<'s> {
    src: &'s str,
    context: &'s SourceContext,
    months: &'static [&'static str],
    pos: usize,
}

impl<'s> Lexer<'s> {
    pub fn new(
        src: &'s str,
        context: &'s SourceContext,
        months: &'static [&'static str],
    ) -> Self {
        Self {
            src,
            context,
            months,
            pos: 0,
        }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    fn error(&self, kind: ParseErrorKind, span: Span) -> ParseError {
        ParseError::new(kind, self.context, span)
    }

    fn unexpected(&self, expected: &str, span: Span) -> ParseError {
        let found = if span.start >= self.src.len() {
            "end of input".to_string()
        } else {
            format!("'{}'", &self.src[span.start..span.end.min(self.src.len())])
        };
        self.error(
            ParseErrorKind::UnexpectedToken {
                expected: expected.to_string(),
                found,
            },
            span,
        )
    }

    fn cursor(&self) -> Cursor<'s> {
        Cursor {
            src: self.src,
            pos: self.pos,
        }
    }

    fn skip_whitespace(&mut self) {
        let mut c = self.cursor();
        c.eat_while(|ch| ch.is_whitespace());
        self.pos = c.pos;
    }

    /// An infix operator at the current position, if the surrounding
    /// whitespace permits one. Consumes it on success.
    pub fn try_infix(&mut self) -> Option<SyntaxNode> {
        let (span, end) = scanner::scan_infix_op(self.src, self.pos)?;
        self.pos = end;
        Some(SyntaxNode::leaf(SyntaxKind::Operator, span))
    }

    /// The next value or punctuation item, or `None` at end of input.
    pub fn next_item(&mut self) -> Result<Option<Item>, ParseError> {
        self.skip_whitespace();
        let start = self.pos;
        let first = match scanner::char_at(self.src, self.pos) {
            Some(c) => c,
            None => return Ok(None),
        };

        let item = match first {
            ';' => {
                let mut c = self.cursor();
                c.eat_while(|ch| ch != '\n');
                self.pos = c.pos;
                Item::Value(SyntaxNode::leaf(
                    SyntaxKind::Comment,
                    Span::new(start, self.pos),
                ))
            }
            '[' => {
                self.pos += 1;
                Item::OpenBlock(Span::new(start, self.pos))
            }
            ']' => {
                self.pos += 1;
                Item::CloseBlock(Span::new(start, self.pos))
            }
            '(' => {
                self.pos += 1;
                Item::OpenParen(Span::new(start, self.pos))
            }
            ')' => {
                self.pos += 1;
                Item::CloseParen(Span::new(start, self.pos))
            }
            ',' => {
                self.pos += 1;
                Item::Comma(Span::new(start, self.pos))
            }
            '{' => {
                let end = scanner::scan_multiline_string(self.src, start)
                    .expect("brace at start position");
                self.pos = end;
                Item::Value(SyntaxNode::leaf(
                    SyntaxKind::MultilineString,
                    Span::new(start, end),
                ))
            }
            '"' => Item::Value(self.scan_string_node()?),
            '%' => {
                if let Some(end) = scanner::scan_raw_string(self.src, start) {
                    self.pos = end;
                    Item::Value(SyntaxNode::leaf(
                        SyntaxKind::RawString,
                        Span::new(start, end),
                    ))
                } else {
                    Item::Value(self.scan_file_node()?)
                }
            }
            '@' => {
                let mut c = self.cursor();
                c.bump();
                c.eat_while(is_ref_char);
                self.pos = c.pos;
                Item::Value(SyntaxNode::leaf(SyntaxKind::Ref, Span::new(start, self.pos)))
            }
            '#' => self.scan_hash()?,
            '$' => {
                let c = self.cursor();
                match scan_money(c) {
                    Some(end) => {
                        self.pos = end.pos;
                        Item::Value(SyntaxNode::leaf(
                            SyntaxKind::Money,
                            Span::new(start, self.pos),
                        ))
                    }
                    None => {
                        return Err(
                            self.unexpected("a value", Span::new(start, start + 1))
                        )
                    }
                }
            }
            '\'' => Item::Value(self.scan_quoted_word(SyntaxKind::LitWord)?),
            ':' => Item::Value(self.scan_quoted_word(SyntaxKind::GetWord)?),
            '/' => Item::Value(self.scan_slash()?),
            c if c.is_ascii_digit() || c == '+' || c == '-' => self.scan_numeric_pool()?,
            c if is_word_start(c) => self.scan_word_pool()?,
            c => {
                return Err(self.unexpected(
                    "a value",
                    Span::new(start, start + c.len_utf8()),
                ))
            }
        };
        Ok(Some(item))
    }

    // ------------------------------------------------------------------------
    // Dispatch pools
    // ------------------------------------------------------------------------

    /// Values starting with a digit or a sign. Hexa preempts; everything
    /// else competes on match length.
    fn scan_numeric_pool(&mut self) -> Result<Item, ParseError> {
        let start = self.pos;
        let first = scanner::char_at(self.src, start).expect("digit pool start");

        if first.is_ascii_digit() {
            if let Some(end) = scanner::scan_hexa(self.src, start) {
                self.pos = end;
                return Ok(Item::Value(SyntaxNode::leaf(
                    SyntaxKind::Hexa,
                    Span::new(start, end),
                )));
            }
        }

        let c = self.cursor();
        let mut best: Option<(usize, SyntaxKind, Vec<SyntaxNode>)> = None;
        if first.is_ascii_digit() {
            if let Some((end, children)) = self.scan_binary_body(c) {
                best = Some((end.pos, SyntaxKind::Binary, children));
            }
            upgrade(&mut best, scan_date(c, self.months), SyntaxKind::Date);
            upgrade(&mut best, scan_time(c), SyntaxKind::Time);
        }
        upgrade(&mut best, scan_pair(c), SyntaxKind::Pair);
        if first.is_ascii_digit() {
            upgrade(&mut best, scan_tuple(c), SyntaxKind::Tuple);
        }
        upgrade(&mut best, scan_money(c), SyntaxKind::Money);
        upgrade(&mut best, scan_number(c), SyntaxKind::Number);
        upgrade(&mut best, scan_email(c), SyntaxKind::Email);

        match best {
            Some((end, kind, children)) => {
                self.pos = end;
                let span = Span::new(start, end);
                let node = if children.is_empty() {
                    SyntaxNode::leaf(kind, span)
                } else {
                    SyntaxNode::new(kind, span, children)
                };
                Ok(Item::Value(node))
            }
            // A bare sign is an ordinary word.
            None => Ok(Item::Value(self.scan_word_family()?)),
        }
    }

    /// Values starting with a word character.
    fn scan_word_pool(&mut self) -> Result<Item, ParseError> {
        let start = self.pos;
        let first = scanner::char_at(self.src, start).expect("word pool start");

        if first.is_ascii_hexdigit() {
            if let Some(end) = scanner::scan_hexa(self.src, start) {
                self.pos = end;
                return Ok(Item::Value(SyntaxNode::leaf(
                    SyntaxKind::Hexa,
                    Span::new(start, end),
                )));
            }
        }

        if first == '<' {
            if let Some(end) = scan_tag(self.cursor()) {
                self.pos = end.pos;
                return Ok(Item::Value(SyntaxNode::leaf(
                    SyntaxKind::Tag,
                    Span::new(start, self.pos),
                )));
            }
        }

        // Currency-prefixed money and emails both start with word
        // characters and outrun any word they share a prefix with.
        let mut best: Option<(usize, SyntaxKind, Vec<SyntaxNode>)> = None;
        upgrade(&mut best, scan_money(self.cursor()), SyntaxKind::Money);
        upgrade(&mut best, scan_email(self.cursor()), SyntaxKind::Email);
        if let Some((end, kind, _)) = best {
            self.pos = end;
            return Ok(Item::Value(SyntaxNode::leaf(kind, Span::new(start, end))));
        }

        Ok(Item::Value(self.scan_word_family()?))
    }

    // ------------------------------------------------------------------------
    // `#` forms
    // ------------------------------------------------------------------------

    fn scan_hash(&mut self) -> Result<Item, ParseError> {
        let start = self.pos;
        match scanner::char_at(self.src, start + 1) {
            Some('"') => Ok(Item::Value(self.scan_char_node()?)),
            Some('(') => Ok(Item::Value(self.scan_escaped_value()?)),
            Some('[') => {
                self.pos += 2;
                Ok(Item::OpenMap(Span::new(start, self.pos)))
            }
            Some('{') => match self.scan_binary_body(self.cursor()) {
                Some((end, children)) => {
                    self.pos = end.pos;
                    let span = Span::new(start, self.pos);
                    let node = if children.is_empty() {
                        SyntaxNode::leaf(SyntaxKind::Binary, span)
                    } else {
                        SyntaxNode::new(SyntaxKind::Binary, span, children)
                    };
                    Ok(Item::Value(node))
                }
                None => Err(self.error(
                    ParseErrorKind::MalformedLiteral {
                        literal_type: "binary".to_string(),
                        value: preview(self.src, start),
                    },
                    Span::new(start, start + 2),
                )),
            },
            _ => {
                let mut c = self.cursor();
                c.bump();
                let count = c.eat_while(is_issue_char);
                if count == 0 {
                    return Err(self.unexpected("a value", Span::new(start, start + 1)));
                }
                let span = Span::new(start, c.pos);
                self.pos = c.pos;
                if &self.src[start + 1..c.pos] == "include" {
                    Ok(Item::Include(span))
                } else {
                    Ok(Item::Value(SyntaxNode::leaf(SyntaxKind::Issue, span)))
                }
            }
        }
    }

    fn scan_escaped_value(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.pos;
        let mut c = self.cursor();
        c.bump(); // '#'
        c.bump(); // '('
        let count = c.eat_while(is_escaped_value_char);
        if (3..=20).contains(&count) && c.eat(')') {
            self.pos = c.pos;
            Ok(SyntaxNode::leaf(
                SyntaxKind::EscapedValue,
                Span::new(start, self.pos),
            ))
        } else {
            Err(self.error(
                ParseErrorKind::MalformedLiteral {
                    literal_type: "escaped value".to_string(),
                    value: preview(self.src, start),
                },
                Span::new(start, c.pos),
            ))
        }
    }

    // ------------------------------------------------------------------------
    // Strings, chars, files
    // ------------------------------------------------------------------------

    fn scan_string_node(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.pos;
        let mut c = self.cursor();
        c.bump(); // '"'
        let mut children = Vec::new();
        let mut content_start = c.pos;

        loop {
            match c.peek() {
                None | Some('\n') => {
                    return Err(self.error(
                        ParseErrorKind::UnclosedDelimiter { delimiter: '"' },
                        Span::new(start, start + 1),
                    ))
                }
                Some('"') => {
                    if c.pos > content_start {
                        children.push(SyntaxNode::leaf(
                            SyntaxKind::StringContent,
                            Span::new(content_start, c.pos),
                        ));
                    }
                    c.bump();
                    self.pos = c.pos;
                    return Ok(SyntaxNode::new(
                        SyntaxKind::String,
                        Span::new(start, self.pos),
                        children,
                    ));
                }
                Some('^') => {
                    if c.pos > content_start {
                        children.push(SyntaxNode::leaf(
                            SyntaxKind::StringContent,
                            Span::new(content_start, c.pos),
                        ));
                    }
                    let escape = self.scan_escaped_char(&mut c)?;
                    children.push(escape);
                    content_start = c.pos;
                }
                Some('\\') => {
                    return Err(self.error(
                        ParseErrorKind::MalformedLiteral {
                            literal_type: "string".to_string(),
                            value: "\\".to_string(),
                        },
                        Span::new(c.pos, c.pos + 1),
                    ))
                }
                Some(_) => {
                    c.bump();
                }
            }
        }
    }

    /// `^`-escape inside strings and chars. The cursor sits on the caret.
    fn scan_escaped_char(
        &self,
        c: &mut Cursor<'s>,
    ) -> Result<SyntaxNode, ParseError> {
        let start = c.pos;
        c.bump(); // '^'
        let ok = match c.peek() {
            Some('/') | Some('-') | Some('~') | Some('^') | Some('{') | Some('}')
            | Some('"') => {
                c.bump();
                true
            }
            Some(ch) if ch.is_ascii_alphabetic() && ch.to_ascii_lowercase() <= 'f' => {
                c.bump();
                true
            }
            Some('(') => {
                c.bump();
                let name_start = c.pos;
                c.eat_while(|ch| ch != ')' && ch != '\n');
                let name = &self.src[name_start..c.pos];
                let named = matches!(
                    name,
                    "null" | "back" | "tab" | "line" | "page" | "esc" | "del"
                );
                let hex = (1..=6).contains(&name.len())
                    && name.chars().all(|ch| ch.is_ascii_hexdigit());
                (named || hex) && c.eat(')')
            }
            _ => false,
        };
        if !ok {
            return Err(self.error(
                ParseErrorKind::MalformedLiteral {
                    literal_type: "escape sequence".to_string(),
                    value: preview(self.src, start),
                },
                Span::new(start, c.pos.max(start + 1)),
            ));
        }
        Ok(SyntaxNode::leaf(
            SyntaxKind::EscapedChar,
            Span::new(start, c.pos),
        ))
    }

    fn scan_char_node(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.pos;
        let mut c = self.cursor();
        c.bump(); // '#'
        c.bump(); // '"'
        let mut children = Vec::new();
        match c.peek() {
            Some('^') => {
                let escape = self.scan_escaped_char(&mut c)?;
                children.push(escape);
            }
            Some(ch) if ch != '"' => {
                c.bump();
            }
            _ => {
                return Err(self.error(
                    ParseErrorKind::MalformedLiteral {
                        literal_type: "char".to_string(),
                        value: preview(self.src, start),
                    },
                    Span::new(start, c.pos),
                ))
            }
        }
        if !c.eat('"') {
            return Err(self.error(
                ParseErrorKind::MalformedLiteral {
                    literal_type: "char".to_string(),
                    value: preview(self.src, start),
                },
                Span::new(start, c.pos),
            ));
        }
        self.pos = c.pos;
        Ok(SyntaxNode::new(
            SyntaxKind::Char,
            Span::new(start, self.pos),
            children,
        ))
    }

    fn scan_file_node(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.pos;
        self.pos += 1; // '%'
        if scanner::char_at(self.src, self.pos) == Some('"') {
            let string = self.scan_string_node()?;
            return Ok(SyntaxNode::new(
                SyntaxKind::File,
                Span::new(start, self.pos),
                vec![string],
            ));
        }
        let mut c = self.cursor();
        let count = c.eat_while(is_file_content_char);
        if count == 0 {
            return Err(self.error(
                ParseErrorKind::MalformedLiteral {
                    literal_type: "file".to_string(),
                    value: preview(self.src, start),
                },
                Span::new(start, start + 1),
            ));
        }
        let content = SyntaxNode::leaf(SyntaxKind::FileContent, Span::new(self.pos, c.pos));
        self.pos = c.pos;
        Ok(SyntaxNode::new(
            SyntaxKind::File,
            Span::new(start, self.pos),
            vec![content],
        ))
    }

    // ------------------------------------------------------------------------
    // Binary
    // ------------------------------------------------------------------------

    /// `2#{...}`, `#{...}`, `16#{...}`, or `64#{...}`; embedded comments
    /// become children, whitespace is allowed between elements.
    fn scan_binary_body(
        &self,
        mut c: Cursor<'s>,
    ) -> Option<(Cursor<'s>, Vec<SyntaxNode>)> {
        let base = if c.eat_str_ci("2#{") {
            2
        } else if c.eat_str_ci("16#{") || c.eat_str_ci("#{") {
            16
        } else if c.eat_str_ci("64#{") {
            64
        } else {
            return None;
        };

        let mut children = Vec::new();
        let mut bits = 0usize;
        let mut padding = 0usize;
        loop {
            c.eat_while(|ch| ch.is_whitespace());
            match c.peek()? {
                ';' => {
                    let comment_start = c.pos;
                    c.eat_while(|ch| ch != '\n');
                    children.push(SyntaxNode::leaf(
                        SyntaxKind::Comment,
                        Span::new(comment_start, c.pos),
                    ));
                }
                '}' => {
                    c.bump();
                    if base == 2 && bits % 8 != 0 {
                        return None;
                    }
                    return Some((c, children));
                }
                '=' if base == 64 && padding < 2 => {
                    c.bump();
                    padding += 1;
                }
                ch => {
                    if padding > 0 {
                        return None;
                    }
                    match base {
                        2 => {
                            if ch == '0' || ch == '1' {
                                c.bump();
                                bits += 1;
                            } else {
                                return None;
                            }
                        }
                        16 => {
                            if ch.is_ascii_hexdigit() {
                                c.bump();
                                match c.peek() {
                                    Some(second) if second.is_ascii_hexdigit() => {
                                        c.bump();
                                    }
                                    _ => return None,
                                }
                            } else {
                                return None;
                            }
                        }
                        _ => {
                            if ch.is_ascii_alphanumeric() || ch == '+' || ch == '/' {
                                c.bump();
                            } else {
                                return None;
                            }
                        }
                    }
                }
            }
        }
    }

    // ------------------------------------------------------------------------
    // Words and paths
    // ------------------------------------------------------------------------

    /// `'word`, `'a/b`, `:word`, `:a/b`.
    fn scan_quoted_word(&mut self, base: SyntaxKind) -> Result<SyntaxNode, ParseError> {
        let start = self.pos;
        let mut c = self.cursor();
        c.bump(); // the quote or colon
        let word = match scan_plain_word(&mut c) {
            Some(span) => SyntaxNode::leaf(SyntaxKind::Word, span),
            None => {
                return Err(self.unexpected("a word", Span::new(start, start + 1)));
            }
        };
        let mut children = vec![word];
        let took_parts = self.scan_path_parts(&mut c, &mut children)?;
        self.pos = c.pos;
        let kind = match (base, took_parts) {
            (SyntaxKind::LitWord, false) => SyntaxKind::LitWord,
            (SyntaxKind::LitWord, true) => SyntaxKind::LitPath,
            (_, false) => SyntaxKind::GetWord,
            (_, true) => SyntaxKind::GetPath,
        };
        Ok(SyntaxNode::new(kind, Span::new(start, self.pos), children))
    }

    /// `/refinement`, or a run of slashes as a word (optionally `:`-suffixed
    /// into a set-word).
    fn scan_slash(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.pos;
        let mut c = self.cursor();
        let after_slash = scanner::char_at(self.src, start + 1);
        if after_slash.map_or(false, is_refinement_char) {
            c.bump();
            c.eat_while(is_refinement_char);
            self.pos = c.pos;
            return Ok(SyntaxNode::leaf(
                SyntaxKind::Refinement,
                Span::new(start, self.pos),
            ));
        }
        c.eat_while(|ch| ch == '/');
        let word = SyntaxNode::leaf(SyntaxKind::Word, Span::new(start, c.pos));
        if c.eat(':') {
            self.pos = c.pos;
            return Ok(SyntaxNode::new(
                SyntaxKind::SetWord,
                Span::new(start, self.pos),
                vec![word],
            ));
        }
        self.pos = c.pos;
        Ok(word)
    }

    /// A plain word, possibly extended into a path, set-word, or set-path.
    /// `true` and `false` become boolean leaves.
    fn scan_word_family(&mut self) -> Result<SyntaxNode, ParseError> {
        let start = self.pos;
        let mut c = self.cursor();
        let word_span = match scan_plain_word(&mut c) {
            Some(span) => span,
            None => {
                let len = c.peek().map_or(1, |ch| ch.len_utf8());
                return Err(self.unexpected("a value", Span::new(start, start + len)));
            }
        };

        let word = SyntaxNode::leaf(SyntaxKind::Word, word_span);
        let mut children = vec![word];
        let took_parts = self.scan_path_parts(&mut c, &mut children)?;

        if took_parts {
            if c.eat(':') {
                self.pos = c.pos;
                return Ok(SyntaxNode::new(
                    SyntaxKind::SetPath,
                    Span::new(start, self.pos),
                    children,
                ));
            }
            self.pos = c.pos;
            return Ok(SyntaxNode::new(
                SyntaxKind::Path,
                Span::new(start, self.pos),
                children,
            ));
        }

        if c.eat(':') {
            self.pos = c.pos;
            return Ok(SyntaxNode::new(
                SyntaxKind::SetWord,
                Span::new(start, self.pos),
                children,
            ));
        }

        self.pos = c.pos;
        let text = &self.src[word_span.start..word_span.end];
        if text == "true" || text == "false" {
            return Ok(SyntaxNode::leaf(SyntaxKind::Boolean, word_span));
        }
        Ok(children.pop().expect("word child"))
    }

    /// Consumes `/element` parts directly adjacent to a word. Returns
    /// whether any part was taken; elements are appended as children.
    fn scan_path_parts(
        &self,
        c: &mut Cursor<'s>,
        children: &mut Vec<SyntaxNode>,
    ) -> Result<bool, ParseError> {
        let mut took = false;
        loop {
            let save = *c;
            if !c.eat('/') {
                break;
            }
            match self.scan_path_element(c)? {
                Some(element) => {
                    children.push(element);
                    took = true;
                }
                None => {
                    *c = save;
                    break;
                }
            }
        }
        Ok(took)
    }

    /// One path element; the cursor sits just past a `/`.
    fn scan_path_element(
        &self,
        c: &mut Cursor<'s>,
    ) -> Result<Option<SyntaxNode>, ParseError> {
        let start = c.pos;
        let first = match c.peek() {
            Some(ch) => ch,
            None => return Ok(None),
        };

        if first.is_ascii_digit() || first == '+' || first == '-' {
            let probe = *c;
            let mut best: Option<(Cursor, SyntaxKind)> = None;
            for (end, kind) in [
                (scan_pair(probe), SyntaxKind::Pair),
                (scan_tuple(probe), SyntaxKind::Tuple),
                (scan_number(probe), SyntaxKind::Number),
            ] {
                if let Some(end) = end {
                    if best.as_ref().map_or(true, |(b, _)| end.pos > b.pos) {
                        best = Some((end, kind));
                    }
                }
            }
            return Ok(best.map(|(end, kind)| {
                *c = end;
                SyntaxNode::leaf(kind, Span::new(start, end.pos))
            }));
        }

        match first {
            '\'' => {
                c.bump();
                match scan_plain_word(c) {
                    Some(span) => Ok(Some(SyntaxNode::new(
                        SyntaxKind::LitWord,
                        Span::new(start, c.pos),
                        vec![SyntaxNode::leaf(SyntaxKind::Word, span)],
                    ))),
                    None => Ok(None),
                }
            }
            ':' => {
                c.bump();
                match scan_plain_word(c) {
                    Some(span) => Ok(Some(SyntaxNode::new(
                        SyntaxKind::GetWord,
                        Span::new(start, c.pos),
                        vec![SyntaxNode::leaf(SyntaxKind::Word, span)],
                    ))),
                    None => Ok(None),
                }
            }
            '"' => {
                let mut lexer_at = self.clone();
                lexer_at.pos = c.pos;
                let string = lexer_at.scan_string_node()?;
                c.pos = lexer_at.pos;
                Ok(Some(string))
            }
            '#' => match scanner::char_at(self.src, c.pos + 1) {
                Some('"') => {
                    let mut lexer_at = self.clone();
                    lexer_at.pos = c.pos;
                    let node = lexer_at.scan_char_node()?;
                    c.pos = lexer_at.pos;
                    Ok(Some(node))
                }
                Some('{') => match self.scan_binary_body(*c) {
                    Some((end, children)) => {
                        let span = Span::new(start, end.pos);
                        *c = end;
                        Ok(Some(if children.is_empty() {
                            SyntaxNode::leaf(SyntaxKind::Binary, span)
                        } else {
                            SyntaxNode::new(SyntaxKind::Binary, span, children)
                        }))
                    }
                    None => Ok(None),
                },
                _ => {
                    let mut probe = *c;
                    probe.bump();
                    if probe.eat_while(is_issue_char) > 0 {
                        let span = Span::new(start, probe.pos);
                        *c = probe;
                        Ok(Some(SyntaxNode::leaf(SyntaxKind::Issue, span)))
                    } else {
                        Ok(None)
                    }
                }
            },
            '%' => {
                let mut lexer_at = self.clone();
                lexer_at.pos = c.pos;
                match lexer_at.scan_file_node() {
                    Ok(node) => {
                        c.pos = lexer_at.pos;
                        Ok(Some(node))
                    }
                    Err(_) => Ok(None),
                }
            }
            '<' => match scan_tag(*c) {
                Some(end) => {
                    let span = Span::new(start, end.pos);
                    *c = end;
                    Ok(Some(SyntaxNode::leaf(SyntaxKind::Tag, span)))
                }
                None => Ok(None),
            },
            '@' => {
                c.bump();
                c.eat_while(is_ref_char);
                Ok(Some(SyntaxNode::leaf(
                    SyntaxKind::Ref,
                    Span::new(start, c.pos),
                )))
            }
            ch if ch == '/' => Ok(None),
            ch if is_word_start(ch) => match scan_plain_word(c) {
                Some(span) => {
                    let text = &self.src[span.start..span.end];
                    let kind = if text == "true" || text == "false" {
                        SyntaxKind::Boolean
                    } else {
                        SyntaxKind::Word
                    };
                    Ok(Some(SyntaxNode::leaf(kind, span)))
                }
                None => Ok(None),
            },
            _ => Ok(None),
        }
    }
}

/// A `_word` or a run of slashes.
fn scan_plain_word(c: &mut Cursor) -> Option<Span> {
    let start = c.pos;
    match c.peek()? {
        '/' => {
            c.eat_while(|ch| ch == '/');
        }
        ch if is_word_start(ch) => {
            c.bump();
            c.eat_while(is_word_continue);
        }
        _ => return None,
    }
    Some(Span::new(start, c.pos))
}

// ============================================================================
// FREESTANDING MATCHERS
// ============================================================================

fn scan_number(mut c: Cursor) -> Option<Cursor> {
    {
        let mut t = c;
        eat_sign(&mut t);
        if t.eat_str_ci("1.#inf") || t.eat_str_ci("1.#nan") {
            t.eat('%');
            return Some(t);
        }
    }
    eat_sign(&mut c);
    if !eat_digits_sep(&mut c) {
        return None;
    }
    {
        let mut t = c;
        if t.eat('.') && eat_digits_sep(&mut t) {
            c = t;
        }
    }
    if matches!(c.peek(), Some('e') | Some('E')) {
        c.bump();
        let mut t = c;
        eat_sign(&mut t);
        if t.eat_digits() > 0 {
            c = t;
        }
    }
    c.eat('%');
    Some(c)
}

fn scan_pair(mut c: Cursor) -> Option<Cursor> {
    eat_sign(&mut c);
    if !eat_digits_sep(&mut c) {
        return None;
    }
    if !matches!(c.peek(), Some('x') | Some('X')) {
        return None;
    }
    c.bump();
    eat_sign(&mut c);
    if !eat_digits_sep(&mut c) {
        return None;
    }
    Some(c)
}

/// One tuple byte: up to three digits, value at most 255. Backs off to two
/// digits when three would overflow, matching the token-level alternatives
/// of the original grammar.
fn eat_tuple_byte(c: &mut Cursor) -> bool {
    let mut value = 0u32;
    let mut digits = 0;
    let mut last = *c;
    while digits < 3 {
        match c.peek() {
            Some(ch) if ch.is_ascii_digit() => {
                last = *c;
                value = value * 10 + ch.to_digit(10).expect("ascii digit");
                c.bump();
                digits += 1;
            }
            _ => break,
        }
    }
    if digits == 0 {
        return false;
    }
    if value > 255 {
        *c = last;
    }
    true
}

fn scan_tuple(mut c: Cursor) -> Option<Cursor> {
    if !eat_tuple_byte(&mut c) {
        return None;
    }
    let mut count = 1;
    while count < 12 {
        let save = c;
        if c.eat('.') && eat_tuple_byte(&mut c) {
            count += 1;
        } else {
            c = save;
            break;
        }
    }
    if count >= 3 {
        Some(c)
    } else {
        None
    }
}

fn scan_time(mut c: Cursor) -> Option<Cursor> {
    if c.eat_digits() == 0 {
        return None;
    }
    if !c.eat(':') {
        return None;
    }
    if c.eat_digits() == 0 {
        return None;
    }
    let save = c;
    if c.eat('.') {
        if c.eat_digits_max(9) == 0 {
            c = save;
        }
    } else if c.eat(':') {
        if c.eat_digits() == 0 {
            c = save;
        } else {
            let frac = c;
            if c.eat('.') && c.eat_digits_max(9) == 0 {
                c = frac;
            }
        }
    }
    Some(c)
}

fn scan_money(mut c: Cursor) -> Option<Cursor> {
    eat_sign(&mut c);
    {
        let mut t = c;
        let mut letters = 0;
        while letters < 3 {
            match t.peek() {
                Some(ch) if ch.is_ascii_alphabetic() => {
                    t.bump();
                    letters += 1;
                }
                _ => break,
            }
        }
        if letters == 3 && t.peek() == Some('$') {
            c = t;
        }
    }
    if !c.eat('$') {
        return None;
    }
    if c.eat_digits() == 0 {
        return None;
    }
    loop {
        let save = c;
        if c.eat('\'') {
            if c.eat_digits() == 0 {
                c = save;
                break;
            }
        } else {
            break;
        }
    }
    let save = c;
    if c.eat('.') && c.eat_digits() == 0 {
        c = save;
    }
    Some(c)
}

fn scan_email(mut c: Cursor) -> Option<Cursor> {
    if c.eat_while(is_email_char) == 0 {
        return None;
    }
    if !c.eat('@') {
        return None;
    }
    c.eat_while(is_email_char);
    Some(c)
}

fn scan_tag(mut c: Cursor) -> Option<Cursor> {
    if !c.eat('<') {
        return None;
    }
    match c.peek() {
        Some(ch) if is_tag_start_char(ch) => {
            c.bump();
        }
        _ => return None,
    }
    loop {
        match c.peek()? {
            '>' => {
                c.bump();
                return Some(c);
            }
            quote @ ('"' | '\'') => {
                let mut t = c;
                t.bump();
                t.eat_while(|ch| ch != quote && ch != '\n');
                if t.eat(quote) {
                    c = t;
                } else {
                    c.bump();
                }
            }
            _ => {
                c.bump();
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Dates
// ----------------------------------------------------------------------------

fn eat_exact_digits(c: &mut Cursor, min: usize, max: usize) -> bool {
    let count = c.eat_digits();
    (min..=max).contains(&count)
}

fn eat_month(c: &mut Cursor, months: &[&str]) -> bool {
    {
        let mut t = *c;
        if eat_exact_digits(&mut t, 1, 2) {
            *c = t;
            return true;
        }
    }
    for month in months {
        if c.eat_str_ci(month) {
            return true;
        }
    }
    if c.eat_str_ci("sept") {
        return true;
    }
    for month in months {
        if c.eat_str_ci(&month[..3]) {
            return true;
        }
    }
    false
}

fn eat_timezone(c: &mut Cursor) -> bool {
    if c.eat('Z') {
        return true;
    }
    let save = *c;
    if !matches!(c.peek(), Some('+') | Some('-')) {
        return false;
    }
    c.bump();
    let digits = c.eat_digits_max(4);
    match digits {
        4 => true,
        1 | 2 => {
            let t = *c;
            if c.eat(':') && c.eat_digits_max(2) == 2 {
                return true;
            }
            *c = t;
            true
        }
        _ => {
            *c = save;
            false
        }
    }
}

/// `T`- or `/`-introduced clock time with optional fraction and timezone.
fn eat_date_time(c: &mut Cursor) -> bool {
    let save = *c;
    if !matches!(c.peek(), Some('T') | Some('/')) {
        return false;
    }
    c.bump();
    if c.eat_digits() == 0 || !c.eat(':') || c.eat_digits() == 0 {
        *c = save;
        return false;
    }
    let after_minutes = *c;
    if c.eat('.') {
        if c.eat_digits_max(9) == 0 {
            *c = after_minutes;
        }
    } else if c.eat(':') {
        if c.eat_digits() == 0 {
            *c = after_minutes;
        } else {
            let frac = *c;
            if c.eat('.') && c.eat_digits_max(9) == 0 {
                *c = frac;
            }
        }
    }
    let tz = *c;
    if !eat_timezone(c) {
        *c = tz;
    }
    true
}

fn scan_date<'s>(c: Cursor<'s>, months: &[&str]) -> Option<Cursor<'s>> {
    let mut best: Option<Cursor> = None;
    let mut consider = |end: Option<Cursor<'s>>| {
        if let Some(end) = end {
            if best.map_or(true, |b| end.pos > b.pos) {
                best = Some(end);
            }
        }
    };

    consider(scan_separated_date(c, months, '-'));
    consider(scan_separated_date(c, months, '/'));
    consider(scan_week_date(c));
    consider(scan_compact_date(c));
    best
}

/// Longest-wins candidate bookkeeping for the dispatch pools.
fn upgrade(
    best: &mut Option<(usize, SyntaxKind, Vec<SyntaxNode>)>,
    end: Option<Cursor>,
    kind: SyntaxKind,
) {
    if let Some(end) = end {
        if best.as_ref().map_or(true, |(b, _, _)| end.pos > *b) {
            *best = Some((end.pos, kind, Vec::new()));
        }
    }
}

/// `yyyy-mm-dd` / `dd-mm-yyyy` (and the `/` variants), month numeric or by
/// name, with an optional trailing time.
fn scan_separated_date<'s>(
    mut c: Cursor<'s>,
    months: &[&str],
    sep: char,
) -> Option<Cursor<'s>> {
    let digits = c.eat_digits();
    let is_ymd = (3..=4).contains(&digits);
    if !is_ymd && !(1..=2).contains(&digits) {
        return None;
    }
    if !c.eat(sep) {
        return None;
    }
    if !eat_month(&mut c, months) {
        return None;
    }
    if !c.eat(sep) {
        return None;
    }
    let tail = c.eat_digits();
    // ymd ends in a day; dmy ends in a year or a day.
    let tail_ok = if is_ymd {
        (1..=2).contains(&tail)
    } else {
        (1..=4).contains(&tail)
    };
    if !tail_ok {
        return None;
    }
    let time = c;
    if !eat_date_time(&mut c) {
        c = time;
    }
    Some(c)
}

/// `yyyy-Www[-d]` and `yyyy-ddd` ordinal dates.
fn scan_week_date(mut c: Cursor) -> Option<Cursor> {
    if !eat_exact_digits(&mut c, 3, 4) {
        return None;
    }
    if !c.eat('-') {
        return None;
    }
    if c.eat('W') {
        if c.eat_digits_max(2) != 2 {
            return None;
        }
        let save = c;
        if c.eat('-') {
            match c.peek() {
                Some(ch) if ('1'..='9').contains(&ch) => {
                    c.bump();
                }
                _ => c = save,
            }
        }
        Some(c)
    } else if c.eat_digits_max(3) == 3 {
        Some(c)
    } else {
        None
    }
}

/// ISO compact form `yyyymmddThhmmss[.frac][tz]` or `yyyymmddThhmmZ`.
fn scan_compact_date(mut c: Cursor) -> Option<Cursor> {
    if c.eat_digits_max(8) != 8 {
        return None;
    }
    if !c.eat('T') {
        return None;
    }
    let digits_start = c;
    let digits = c.eat_digits_max(6);
    if digits == 6 {
        let frac = c;
        if c.eat('.') && c.eat_digits_max(9) == 0 {
            c = frac;
        }
        let tz = c;
        if !eat_timezone(&mut c) {
            c = tz;
        }
        Some(c)
    } else if digits >= 4 {
        c = digits_start;
        c.eat_digits_max(4);
        if c.eat('Z') {
            Some(c)
        } else {
            None
        }
    } else {
        None
    }
}

fn preview(src: &str, start: usize) -> String {
    src[start..].chars().take(12).collect()
}

// ============================================================================
// VALUE LISTING
// ============================================================================

/// Scans the whole input into a flat listing of items, for the `tokens`
/// CLI command and debugging.
pub fn scan_values(
    source: &str,
    context: &SourceContext,
    months: &'static [&'static str],
) -> Result<Vec<Spanned<String>>, ParseError> {
    let mut lexer = Lexer::new(source, context, months);
    let mut out = Vec::new();
    while let Some(item) = lexer.next_item()? {
        out.push(Spanned {
            value: item.describe(),
            span: item.span(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar;

    fn kind_of(source: &str) -> SyntaxKind {
        let context = SourceContext::from_file("test", source);
        let mut lexer = Lexer::new(source, &context, grammar::language().months);
        match lexer.next_item().expect("lex ok").expect("one item") {
            Item::Value(node) => node.kind,
            other => panic!("expected value for {:?}, got {:?}", source, other),
        }
    }

    fn full_value(source: &str) -> SyntaxNode {
        let context = SourceContext::from_file("test", source);
        let mut lexer = Lexer::new(source, &context, grammar::language().months);
        let node = match lexer.next_item().expect("lex ok").expect("one item") {
            Item::Value(node) => node,
            other => panic!("expected value for {:?}, got {:?}", source, other),
        };
        assert_eq!(
            node.span.end,
            source.len(),
            "value should cover all of {:?}",
            source
        );
        node
    }

    #[test]
    fn classifies_numeric_forms() {
        assert_eq!(kind_of("42"), SyntaxKind::Number);
        assert_eq!(kind_of("-3.14"), SyntaxKind::Number);
        assert_eq!(kind_of("100'000"), SyntaxKind::Number);
        assert_eq!(kind_of("50%"), SyntaxKind::Number);
        assert_eq!(kind_of("1.#INF"), SyntaxKind::Number);
        assert_eq!(kind_of("10x20"), SyntaxKind::Pair);
        assert_eq!(kind_of("-1x-2"), SyntaxKind::Pair);
        assert_eq!(kind_of("1.2.3"), SyntaxKind::Tuple);
        assert_eq!(kind_of("255.255.255.0"), SyntaxKind::Tuple);
        assert_eq!(kind_of("12:30"), SyntaxKind::Time);
        assert_eq!(kind_of("0:0:0.5"), SyntaxKind::Time);
        assert_eq!(kind_of("$100"), SyntaxKind::Money);
        assert_eq!(kind_of("USD$12'000.50"), SyntaxKind::Money);
        assert_eq!(kind_of("-EUR$5"), SyntaxKind::Money);
    }

    #[test]
    fn classifies_dates() {
        assert_eq!(kind_of("2025-08-07"), SyntaxKind::Date);
        assert_eq!(kind_of("2025/08/07"), SyntaxKind::Date);
        assert_eq!(kind_of("5-May-2025"), SyntaxKind::Date);
        assert_eq!(kind_of("7-Aug-25"), SyntaxKind::Date);
        assert_eq!(kind_of("2025-W32-4"), SyntaxKind::Date);
        assert_eq!(kind_of("2025-219"), SyntaxKind::Date);
        assert_eq!(kind_of("2025-08-07T10:30:00Z"), SyntaxKind::Date);
        assert_eq!(kind_of("20250807T103000Z"), SyntaxKind::Date);
        let node = full_value("2025-08-07/10:30+02:00");
        assert_eq!(node.kind, SyntaxKind::Date);
    }

    #[test]
    fn hexa_preempts_words_and_numbers() {
        assert_eq!(kind_of("FFh"), SyntaxKind::Hexa);
        assert_eq!(kind_of("DEADBEEFh"), SyntaxKind::Hexa);
        assert_eq!(kind_of("12h"), SyntaxKind::Hexa);
        // Not hexa: too few digits, or no `h`.
        assert_eq!(kind_of("Ah"), SyntaxKind::Word);
        assert_eq!(kind_of("beef"), SyntaxKind::Word);
    }

    #[test]
    fn classifies_word_forms() {
        assert_eq!(kind_of("print"), SyntaxKind::Word);
        assert_eq!(kind_of("+"), SyntaxKind::Word);
        assert_eq!(kind_of("true"), SyntaxKind::Boolean);
        assert_eq!(kind_of("'foo"), SyntaxKind::LitWord);
        assert_eq!(kind_of(":foo"), SyntaxKind::GetWord);
        assert_eq!(kind_of("foo:"), SyntaxKind::SetWord);
        assert_eq!(kind_of("a/b"), SyntaxKind::Path);
        assert_eq!(kind_of("a/b:"), SyntaxKind::SetPath);
        assert_eq!(kind_of("'a/b"), SyntaxKind::LitPath);
        assert_eq!(kind_of(":a/b"), SyntaxKind::GetPath);
        assert_eq!(kind_of("/local"), SyntaxKind::Refinement);
        assert_eq!(kind_of("//"), SyntaxKind::Word);
    }

    #[test]
    fn path_elements_become_children() {
        let node = full_value("a/2/b");
        assert_eq!(node.kind, SyntaxKind::Path);
        let kinds: Vec<_> = node.children.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![SyntaxKind::Word, SyntaxKind::Number, SyntaxKind::Word]
        );
    }

    #[test]
    fn classifies_hash_forms() {
        assert_eq!(kind_of("#fff"), SyntaxKind::Issue);
        assert_eq!(kind_of("#\"a\""), SyntaxKind::Char);
        assert_eq!(kind_of("#\"^(tab)\""), SyntaxKind::Char);
        assert_eq!(kind_of("#(true)"), SyntaxKind::EscapedValue);
        assert_eq!(kind_of("#{DEADBEEF}"), SyntaxKind::Binary);
        assert_eq!(kind_of("2#{11110000}"), SyntaxKind::Binary);
        assert_eq!(kind_of("64#{aGVsbG8=}"), SyntaxKind::Binary);
    }

    #[test]
    fn classifies_strings_and_files() {
        assert_eq!(kind_of("\"hello\""), SyntaxKind::String);
        assert_eq!(kind_of("{multi\nline}"), SyntaxKind::MultilineString);
        assert_eq!(kind_of("%{raw}%"), SyntaxKind::RawString);
        assert_eq!(kind_of("%foo.red"), SyntaxKind::File);
        assert_eq!(kind_of("%\"with space\""), SyntaxKind::File);
        assert_eq!(kind_of("<div class=\"x\">"), SyntaxKind::Tag);
        assert_eq!(kind_of("@user"), SyntaxKind::Ref);
        assert_eq!(kind_of("bob@example.com"), SyntaxKind::Email);
    }

    #[test]
    fn string_children_split_content_and_escapes() {
        let node = full_value("\"a^/b\"");
        assert_eq!(node.kind, SyntaxKind::String);
        let kinds: Vec<_> = node.children.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::StringContent,
                SyntaxKind::EscapedChar,
                SyntaxKind::StringContent
            ]
        );
    }

    #[test]
    fn longest_match_beats_shorter_literals() {
        // Each left side would otherwise scan as the shorter right side.
        assert_eq!(kind_of("1x2"), SyntaxKind::Pair); // not number 1
        assert_eq!(kind_of("1.2.3"), SyntaxKind::Tuple); // not number 1.2
        assert_eq!(kind_of("1-2-3"), SyntaxKind::Date); // not number 1
        assert_eq!(kind_of("12@host"), SyntaxKind::Email); // not number 12
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let source = "\"abc";
        let context = SourceContext::from_file("test", source);
        let mut lexer = Lexer::new(source, &context, grammar::language().months);
        let err = lexer.next_item().expect_err("unterminated");
        assert!(matches!(
            err.kind,
            ParseErrorKind::UnclosedDelimiter { delimiter: '"' }
        ));
    }

    #[test]
    fn include_is_its_own_item() {
        let source = "#include %lib.red";
        let context = SourceContext::from_file("test", source);
        let mut lexer = Lexer::new(source, &context, grammar::language().months);
        assert!(matches!(
            lexer.next_item().unwrap().unwrap(),
            Item::Include(_)
        ));
        assert!(matches!(
            lexer.next_item().unwrap().unwrap(),
            Item::Value(node) if node.kind == SyntaxKind::File
        ));
        // But a longer issue is not an include.
        let source2 = "#included";
        let context2 = SourceContext::from_file("test", source2);
        let mut lexer2 = Lexer::new(source2, &context2, grammar::language().months);
        assert!(matches!(
            lexer2.next_item().unwrap().unwrap(),
            Item::Value(node) if node.kind == SyntaxKind::Issue
        ));
    }

    #[test]
    fn comments_are_values() {
        let source = "; note\n42";
        let context = SourceContext::from_file("test", source);
        let mut lexer = Lexer::new(source, &context, grammar::language().months);
        assert!(matches!(
            lexer.next_item().unwrap().unwrap(),
            Item::Value(node) if node.kind == SyntaxKind::Comment
        ));
        assert!(matches!(
            lexer.next_item().unwrap().unwrap(),
            Item::Value(node) if node.kind == SyntaxKind::Number
        ));
    }
}
