//! The compiled grammar artifact for the Red language.
//!
//! The artifact is a static, immutable table: node kinds, construct keyword
//! spellings, and the month names the date scanner recognizes. Everything the
//! parser needs to know about Red-the-language lives here; the parser itself
//! only knows how to walk tables. [`language`] is the zero-argument accessor
//! through which consumers obtain the artifact, and [`Language`] is the thin
//! descriptor that binds an artifact to the engine ABI.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::diagnostics::GrammarLoadError;
use crate::syntax::SyntaxKind;

/// ABI version the engine in this crate was built against.
pub const ABI_VERSION: u16 = 3;

/// Oldest artifact ABI version the engine still accepts.
pub const MIN_COMPATIBLE_ABI: u16 = 2;

/// One entry in a grammar's node-kind table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeKind {
    pub id: u16,
    pub name: &'static str,
    /// Named nodes appear in pretty-printed trees; unnamed ones are
    /// punctuation-level detail.
    pub named: bool,
}

const fn node(kind: SyntaxKind, named: bool) -> NodeKind {
    NodeKind {
        id: kind as u16,
        name: kind.name(),
        named,
    }
}

/// A compiled grammar: plain data, owned for the process lifetime, never
/// mutated. Fields are public so tooling and tests can inspect (or
/// fabricate) artifacts; the engine validates every artifact it is handed.
#[derive(Debug, Clone, Copy)]
pub struct Grammar {
    pub name: &'static str,
    pub abi_version: u16,
    pub node_kinds: &'static [NodeKind],
    /// Keyword spelling -> construct kind, one entry per accepted casing.
    pub construct_keywords: &'static [(&'static str, SyntaxKind)],
    /// Lowercase English month names, January first.
    pub months: &'static [&'static str],
}

impl Grammar {
    pub fn node_kind_count(&self) -> usize {
        self.node_kinds.len()
    }

    /// Name of a kind according to this artifact's table.
    pub fn kind_name(&self, kind: SyntaxKind) -> Option<&'static str> {
        self.node_kinds
            .iter()
            .find(|n| n.id == kind as u16)
            .map(|n| n.name)
    }

    /// The construct kind a word spells, if any (`while`, `loop`, `func`,
    /// `function` in their accepted casings).
    pub fn construct_kind(&self, word: &str) -> Option<SyntaxKind> {
        self.construct_keywords
            .iter()
            .find(|(kw, _)| *kw == word)
            .map(|(_, kind)| *kind)
    }

    /// Checks the artifact's structural integrity: ids dense and unique,
    /// table non-empty, root kind present. The bundled artifact always
    /// passes; fabricated or truncated tables do not.
    pub fn validate(&self) -> Result<(), GrammarLoadError> {
        if self.node_kinds.is_empty() {
            return Err(GrammarLoadError::EmptyNodeTable {
                grammar: self.name.to_string(),
            });
        }
        let mut seen = vec![false; self.node_kinds.len()];
        for kind in self.node_kinds {
            match seen.get_mut(kind.id as usize) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(GrammarLoadError::DuplicateKind {
                        grammar: self.name.to_string(),
                        id: kind.id,
                    })
                }
                // An id at or past the table length means the table cannot
                // be dense.
                None => {
                    return Err(GrammarLoadError::SparseNodeTable {
                        grammar: self.name.to_string(),
                        id: kind.id,
                    })
                }
            }
        }
        if !self.node_kinds.iter().any(|n| n.name == ROOT_KIND) {
            return Err(GrammarLoadError::MissingRoot {
                grammar: self.name.to_string(),
                root: ROOT_KIND,
            });
        }
        Ok(())
    }
}

/// Name of the kind every tree is rooted at.
pub const ROOT_KIND: &str = "source_file";

const NODE_KINDS: &[NodeKind] = &[
    node(SyntaxKind::SourceFile, true),
    node(SyntaxKind::Include, true),
    node(SyntaxKind::Comment, true),
    node(SyntaxKind::Infix, true),
    node(SyntaxKind::Operator, false),
    node(SyntaxKind::Hexa, true),
    node(SyntaxKind::RawString, true),
    node(SyntaxKind::MultilineString, true),
    node(SyntaxKind::Word, true),
    node(SyntaxKind::LitWord, true),
    node(SyntaxKind::GetWord, true),
    node(SyntaxKind::SetWord, true),
    node(SyntaxKind::Path, true),
    node(SyntaxKind::LitPath, true),
    node(SyntaxKind::GetPath, true),
    node(SyntaxKind::SetPath, true),
    node(SyntaxKind::Boolean, true),
    node(SyntaxKind::Number, true),
    node(SyntaxKind::Pair, true),
    node(SyntaxKind::Tuple, true),
    node(SyntaxKind::Char, true),
    node(SyntaxKind::EscapedChar, true),
    node(SyntaxKind::File, true),
    node(SyntaxKind::FileContent, false),
    node(SyntaxKind::String, true),
    node(SyntaxKind::StringContent, false),
    node(SyntaxKind::Issue, true),
    node(SyntaxKind::Binary, true),
    node(SyntaxKind::Map, true),
    node(SyntaxKind::Refinement, true),
    node(SyntaxKind::Tag, true),
    node(SyntaxKind::Ref, true),
    node(SyntaxKind::Email, true),
    node(SyntaxKind::Point, true),
    node(SyntaxKind::Money, true),
    node(SyntaxKind::Time, true),
    node(SyntaxKind::Date, true),
    node(SyntaxKind::EscapedValue, true),
    node(SyntaxKind::Block, true),
    node(SyntaxKind::Paren, true),
    node(SyntaxKind::While, true),
    node(SyntaxKind::Loop, true),
    node(SyntaxKind::Function, true),
];

const CONSTRUCT_KEYWORDS: &[(&str, SyntaxKind)] = &[
    ("while", SyntaxKind::While),
    ("While", SyntaxKind::While),
    ("WHILE", SyntaxKind::While),
    ("loop", SyntaxKind::Loop),
    ("Loop", SyntaxKind::Loop),
    ("LOOP", SyntaxKind::Loop),
    ("func", SyntaxKind::Function),
    ("Func", SyntaxKind::Function),
    ("FUNC", SyntaxKind::Function),
    ("function", SyntaxKind::Function),
    ("Function", SyntaxKind::Function),
    ("FUNCTION", SyntaxKind::Function),
];

const MONTHS: &[&str] = &[
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

static RED: Grammar = Grammar {
    name: "red",
    abi_version: ABI_VERSION,
    node_kinds: NODE_KINDS,
    construct_keywords: CONSTRUCT_KEYWORDS,
    months: MONTHS,
};

/// The compiled grammar for the Red language.
pub fn language() -> &'static Grammar {
    &RED
}

/// Looks up a kind in the bundled grammar by its node name.
pub fn kind_for_name(name: &str) -> Option<SyntaxKind> {
    static INDEX: Lazy<HashMap<&'static str, SyntaxKind>> = Lazy::new(|| {
        RED.node_kinds
            .iter()
            .filter_map(|n| SyntaxKind::from_id(n.id).map(|k| (n.name, k)))
            .collect()
    });
    INDEX.get(name).copied()
}

/// Binds a grammar artifact to the engine's expected ABI version.
///
/// Descriptors are cheap and created fresh per use; they carry no state
/// beyond the artifact reference.
#[derive(Debug, Clone, Copy)]
pub struct Language {
    grammar: &'static Grammar,
}

impl Language {
    pub fn new(grammar: &'static Grammar) -> Self {
        Self { grammar }
    }

    /// Descriptor over the bundled Red grammar.
    pub fn red() -> Self {
        Self::new(language())
    }

    pub fn grammar(&self) -> &'static Grammar {
        self.grammar
    }

    /// ABI version the underlying artifact was compiled with.
    pub fn version(&self) -> u16 {
        self.grammar.abi_version
    }
}
