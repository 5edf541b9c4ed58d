//! Grammar loading checks.
//!
//! The bundled Red grammar must always bind to the engine: constructing a
//! language descriptor and then a parser from it never fails, no matter how
//! often it is repeated. Fabricated artifacts with stale ABI versions or
//! corrupt node tables must be rejected with the matching load error.

use carmine::grammar::{self, NodeKind, ABI_VERSION, MIN_COMPATIBLE_ABI};
use carmine::{Grammar, GrammarLoadError, Language, Parser};

#[test]
fn can_load_grammar() {
    let language = Language::new(grammar::language());
    assert!(Parser::new(language).is_ok(), "Error loading Red grammar");
}

#[test]
fn grammar_load_is_idempotent() {
    for _ in 0..16 {
        let language = Language::new(grammar::language());
        assert!(Parser::new(language).is_ok(), "Error loading Red grammar");
    }
}

#[test]
fn descriptor_reports_artifact_version() {
    let language = Language::red();
    assert_eq!(language.version(), ABI_VERSION);
    assert_eq!(language.grammar().name, "red");
}

#[test]
fn loaded_parser_parses() {
    let mut parser = Parser::new(Language::red()).expect("load Red grammar");
    let source = "while [x < 10] [x: x + 1]";
    let tree = parser
        .parse(source, carmine::SourceContext::from_file("snippet", source))
        .expect("parse ok");
    assert!(tree.pretty().starts_with("(source_file (while"));
}

// ----------------------------------------------------------------------------
// Negative cases: fabricated artifacts
// ----------------------------------------------------------------------------

const MINIMAL_KINDS: &[NodeKind] = &[NodeKind {
    id: 0,
    name: "source_file",
    named: true,
}];

fn fabricate(abi_version: u16, node_kinds: &'static [NodeKind]) -> &'static Grammar {
    Box::leak(Box::new(Grammar {
        name: "fabricated",
        abi_version,
        node_kinds,
        construct_keywords: &[],
        months: &[],
    }))
}

#[test]
fn stale_abi_is_rejected() {
    let grammar = fabricate(MIN_COMPATIBLE_ABI - 1, MINIMAL_KINDS);
    let err = Parser::new(Language::new(grammar)).expect_err("stale ABI");
    assert!(matches!(
        err,
        GrammarLoadError::AbiMismatch { found, .. } if found == MIN_COMPATIBLE_ABI - 1
    ));
}

#[test]
fn future_abi_is_rejected() {
    let grammar = fabricate(ABI_VERSION + 1, MINIMAL_KINDS);
    let err = Parser::new(Language::new(grammar)).expect_err("future ABI");
    assert!(matches!(err, GrammarLoadError::AbiMismatch { .. }));
}

#[test]
fn empty_node_table_is_rejected() {
    let grammar = fabricate(ABI_VERSION, &[]);
    let err = Parser::new(Language::new(grammar)).expect_err("empty table");
    assert!(matches!(err, GrammarLoadError::EmptyNodeTable { .. }));
}

#[test]
fn duplicate_kind_ids_are_rejected() {
    static DUPLICATED: &[NodeKind] = &[
        NodeKind {
            id: 0,
            name: "source_file",
            named: true,
        },
        NodeKind {
            id: 0,
            name: "comment",
            named: true,
        },
    ];
    let grammar = fabricate(ABI_VERSION, DUPLICATED);
    let err = Parser::new(Language::new(grammar)).expect_err("duplicate ids");
    assert!(matches!(
        err,
        GrammarLoadError::DuplicateKind { id: 0, .. }
    ));
}

#[test]
fn sparse_node_table_is_rejected() {
    static SPARSE: &[NodeKind] = &[NodeKind {
        id: 7,
        name: "source_file",
        named: true,
    }];
    let grammar = fabricate(ABI_VERSION, SPARSE);
    let err = Parser::new(Language::new(grammar)).expect_err("sparse table");
    assert!(matches!(
        err,
        GrammarLoadError::SparseNodeTable { id: 7, .. }
    ));
}

#[test]
fn missing_root_kind_is_rejected() {
    static ROOTLESS: &[NodeKind] = &[NodeKind {
        id: 0,
        name: "comment",
        named: true,
    }];
    let grammar = fabricate(ABI_VERSION, ROOTLESS);
    let err = Parser::new(Language::new(grammar)).expect_err("missing root");
    assert!(matches!(err, GrammarLoadError::MissingRoot { .. }));
}

#[test]
fn load_errors_carry_diagnostic_codes() {
    use miette::Diagnostic;
    let grammar = fabricate(ABI_VERSION, &[]);
    let err = Parser::new(Language::new(grammar)).expect_err("empty table");
    let code = err.code().expect("diagnostic code").to_string();
    assert!(code.starts_with("carmine::grammar::"), "code was {code}");
}
