//! Syntax module for the Red language toolkit.
//!
//! Defines source spans, the syntax-node vocabulary, and the concrete syntax
//! tree produced by parsing. Tree shape follows the Red grammar: one
//! `source_file` root whose descendants are the literal, path, and construct
//! nodes of the language.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub mod lexer;
pub mod parser;
pub mod scanner;

pub use parser::Parser;

/// Represents a byte span in the source code.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn cover(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Wrapper for carrying source span information with any value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

/// Every node kind the Red syntax tree can contain.
///
/// Discriminants are the node-kind ids recorded in the grammar artifact;
/// names (via [`SyntaxKind::name`]) match the grammar's node names.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u16)]
pub enum SyntaxKind {
    SourceFile = 0,
    Include = 1,
    Comment = 2,
    Infix = 3,
    Operator = 4,
    Hexa = 5,
    RawString = 6,
    MultilineString = 7,
    Word = 8,
    LitWord = 9,
    GetWord = 10,
    SetWord = 11,
    Path = 12,
    LitPath = 13,
    GetPath = 14,
    SetPath = 15,
    Boolean = 16,
    Number = 17,
    Pair = 18,
    Tuple = 19,
    Char = 20,
    EscapedChar = 21,
    File = 22,
    FileContent = 23,
    String = 24,
    StringContent = 25,
    Issue = 26,
    Binary = 27,
    Map = 28,
    Refinement = 29,
    Tag = 30,
    Ref = 31,
    Email = 32,
    Point = 33,
    Money = 34,
    Time = 35,
    Date = 36,
    EscapedValue = 37,
    Block = 38,
    Paren = 39,
    While = 40,
    Loop = 41,
    Function = 42,
}

impl SyntaxKind {
    /// Number of node kinds in the vocabulary.
    pub const COUNT: usize = 43;

    /// The grammar-facing name of this kind.
    pub const fn name(self) -> &'static str {
        use SyntaxKind::*;
        match self {
            SourceFile => "source_file",
            Include => "include",
            Comment => "comment",
            Infix => "infix",
            Operator => "operator",
            Hexa => "hexa",
            RawString => "raw_string",
            MultilineString => "multiline_string",
            Word => "word",
            LitWord => "lit_word",
            GetWord => "get_word",
            SetWord => "set_word",
            Path => "path",
            LitPath => "lit_path",
            GetPath => "get_path",
            SetPath => "set_path",
            Boolean => "boolean",
            Number => "number",
            Pair => "pair",
            Tuple => "tuple",
            Char => "char",
            EscapedChar => "escaped_char",
            File => "file",
            FileContent => "file_content",
            String => "string",
            StringContent => "string_content",
            Issue => "issue",
            Binary => "binary",
            Map => "map",
            Refinement => "refinement",
            Tag => "tag",
            Ref => "ref",
            Email => "email",
            Point => "point",
            Money => "money",
            Time => "time",
            Date => "date",
            EscapedValue => "escaped_value",
            Block => "block",
            Paren => "paren",
            While => "while",
            Loop => "loop",
            Function => "function",
        }
    }

    /// Looks up a kind by its node-kind id.
    pub fn from_id(id: u16) -> Option<SyntaxKind> {
        use SyntaxKind::*;
        const TABLE: [SyntaxKind; SyntaxKind::COUNT] = [
            SourceFile,
            Include,
            Comment,
            Infix,
            Operator,
            Hexa,
            RawString,
            MultilineString,
            Word,
            LitWord,
            GetWord,
            SetWord,
            Path,
            LitPath,
            GetPath,
            SetPath,
            Boolean,
            Number,
            Pair,
            Tuple,
            Char,
            EscapedChar,
            File,
            FileContent,
            String,
            StringContent,
            Issue,
            Binary,
            Map,
            Refinement,
            Tag,
            Ref,
            Email,
            Point,
            Money,
            Time,
            Date,
            EscapedValue,
            Block,
            Paren,
            While,
            Loop,
            Function,
        ];
        TABLE.get(id as usize).copied()
    }

    /// Whether this kind is one of the grammar's literal forms, and may
    /// therefore appear as an infix operand, a map key or value, or a
    /// statement on its own.
    pub const fn is_literal(self) -> bool {
        use SyntaxKind::*;
        matches!(
            self,
            Hexa | EscapedValue
                | RawString
                | MultilineString
                | Word
                | LitWord
                | GetWord
                | SetWord
                | Path
                | LitPath
                | GetPath
                | SetPath
                | Boolean
                | Number
                | Pair
                | Tuple
                | Char
                | File
                | String
                | Issue
                | Binary
                | Map
                | Refinement
                | Tag
                | Ref
                | Email
                | Point
                | Money
                | Time
                | Date
        )
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A node in the concrete syntax tree.
///
/// Leaves cover a single token; interior nodes cover their children.
/// `field` labels a child's role within its parent (the grammar labels the
/// three children of `infix` as `left`, `operator`, and `right`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    pub span: Span,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn leaf(kind: SyntaxKind, span: Span) -> Self {
        Self {
            kind,
            span,
            field: None,
            children: Vec::new(),
        }
    }

    pub fn new(kind: SyntaxKind, span: Span, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind,
            span,
            field: None,
            children,
        }
    }

    pub fn with_field(mut self, field: &'static str) -> Self {
        self.field = Some(field);
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// First child carrying the given field label.
    pub fn child_by_field(&self, field: &str) -> Option<&SyntaxNode> {
        self.children.iter().find(|c| c.field == Some(field))
    }

    /// The source text this node covers.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.start..self.span.end]
    }

    /// Renders the node as a single-line s-expression outline of kinds,
    /// with field labels where present.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.write_pretty(&mut out);
        out
    }

    fn write_pretty(&self, out: &mut String) {
        if let Some(field) = self.field {
            out.push_str(field);
            out.push_str(": ");
        }
        out.push('(');
        out.push_str(self.kind.name());
        for child in &self.children {
            out.push(' ');
            child.write_pretty(out);
        }
        out.push(')');
    }
}

/// A parsed syntax tree together with the source it was parsed from.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    source: Arc<str>,
    root: SyntaxNode,
}

impl Tree {
    pub(crate) fn new(source: Arc<str>, root: SyntaxNode) -> Self {
        Self { source, root }
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// The source text covered by `node`.
    pub fn text(&self, node: &SyntaxNode) -> &str {
        node.text(&self.source)
    }

    pub fn pretty(&self) -> String {
        self.root.pretty()
    }
}
