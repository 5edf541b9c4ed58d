// tests/parser_tests.rs

use carmine::diagnostics::ParseErrorKind;
use carmine::{parse, Language, Parser, SourceContext, SyntaxKind};

// A helper asserting the pretty outline of a parse.
fn assert_outline(source: &str, expected: &str) {
    let tree = parse(source).unwrap_or_else(|e| panic!("parse failed for {source:?}: {e}"));
    assert_eq!(tree.pretty(), expected, "outline for {source:?}");
}

// ---
// Literal forms at statement level
// ---

#[test]
fn test_parse_scalar_literals() {
    assert_outline("42", "(source_file (number))");
    assert_outline("10x20", "(source_file (pair))");
    assert_outline("1.2.3", "(source_file (tuple))");
    assert_outline("12:30:45", "(source_file (time))");
    assert_outline("2025-08-07", "(source_file (date))");
    assert_outline("$100", "(source_file (money))");
    assert_outline("FFh", "(source_file (hexa))");
    assert_outline("true", "(source_file (boolean))");
    assert_outline("#fff", "(source_file (issue))");
    assert_outline("@handle", "(source_file (ref))");
    assert_outline("bob@example.com", "(source_file (email))");
    assert_outline("<br/>", "(source_file (tag))");
    assert_outline("#{CAFE}", "(source_file (binary))");
    assert_outline("#(none!)", "(source_file (escaped_value))");
}

#[test]
fn test_parse_word_forms() {
    assert_outline("print", "(source_file (word))");
    assert_outline("x:", "(source_file (set_word (word)))");
    assert_outline(":x", "(source_file (get_word (word)))");
    assert_outline("'x", "(source_file (lit_word (word)))");
    assert_outline("/local", "(source_file (refinement))");
    assert_outline(
        "obj/size/x",
        "(source_file (path (word) (word) (word)))",
    );
    assert_outline(
        "obj/1:",
        "(source_file (set_path (word) (number)))",
    );
}

#[test]
fn test_parse_string_forms() {
    assert_outline("\"hi\"", "(source_file (string (string_content)))");
    assert_outline(
        "\"a^/b\"",
        "(source_file (string (string_content) (escaped_char) (string_content)))",
    );
    assert_outline("{line one\nline two}", "(source_file (multiline_string))");
    assert_outline("%%{no ^ escapes here}%%", "(source_file (raw_string))");
    assert_outline("%config.red", "(source_file (file (file_content)))");
    assert_outline(
        "%\"spaced name.red\"",
        "(source_file (file (string (string_content))))",
    );
    assert_outline("#\"z\"", "(source_file (char))");
    assert_outline("#\"^(line)\"", "(source_file (char (escaped_char)))");
}

// ---
// Structure
// ---

#[test]
fn test_parse_nested_blocks() {
    assert_outline(
        "[1 [2 [3]]]",
        "(source_file (block (number) (block (number) (block (number)))))",
    );
}

#[test]
fn test_parse_infix_chain() {
    assert_outline(
        "1 + 2 - 3",
        "(source_file (infix left: (infix left: (number) operator: (operator) \
         right: (number)) operator: (operator) right: (number)))",
    );
}

#[test]
fn test_infix_requires_surrounding_whitespace() {
    // `-1` binds as a negative number, not as subtraction.
    assert_outline("x -1", "(source_file (word) (number))");
    assert_outline(
        "x - 1",
        "(source_file (infix left: (word) operator: (operator) right: (number)))",
    );
}

#[test]
fn test_parse_constructs() {
    assert_outline(
        "while [not done] [step]",
        "(source_file (while (block (word) (word)) (block (word))))",
    );
    assert_outline(
        "Loop 10 [emit]",
        "(source_file (loop (number) (block (word))))",
    );
    assert_outline(
        "function [n] [n * n]",
        "(source_file (function (block (word)) (block (infix left: (word) \
         operator: (operator) right: (word)))))",
    );
}

#[test]
fn test_parse_include_then_code() {
    assert_outline(
        "#include %core.red\nmain",
        "(source_file (include (file (file_content))) (word))",
    );
}

#[test]
fn test_parse_map_and_point() {
    assert_outline(
        "#[name: \"red\" size: 10x20]",
        "(source_file (map (set_word (word)) (string (string_content)) \
         (set_word (word)) (pair)))",
    );
    assert_outline("(3, 4)", "(source_file (point (number) (number)))");
    assert_outline(
        "(0, 0, 255)",
        "(source_file (point (number) (number) (number)))",
    );
}

#[test]
fn test_parse_with_comments() {
    assert_outline(
        "; banner\nx: 1 ; trailing\n",
        "(source_file (comment) (set_word (word)) (number) (comment))",
    );
}

#[test]
fn test_parse_realistic_script() {
    let source = r#"
; fizz counter
count: 0
while [count < 15] [
    count: count + 1
    print count
]
"#;
    let tree = parse(source).expect("script parses");
    let root = tree.root();
    assert_eq!(root.kind, SyntaxKind::SourceFile);
    let kinds: Vec<_> = root.children.iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::Comment,
            SyntaxKind::SetWord,
            SyntaxKind::Number,
            SyntaxKind::While,
        ]
    );
}

// ---
// Spans and node access
// ---

#[test]
fn test_span_coverage_and_text() {
    let source = "x: 10x20";
    let tree = parse(source).expect("parse ok");
    let root = tree.root();
    assert_eq!(root.span.start, 0);
    assert_eq!(root.span.end, source.len());
    let pair = &root.children[1];
    assert_eq!(tree.text(pair), "10x20");
}

#[test]
fn test_infix_field_access() {
    let source = "a + b";
    let tree = parse(source).expect("parse ok");
    let infix = &tree.root().children[0];
    assert_eq!(infix.kind, SyntaxKind::Infix);
    let op = infix.child_by_field("operator").expect("operator child");
    assert_eq!(tree.text(op), "+");
    assert_eq!(
        tree.text(infix.child_by_field("left").expect("left child")),
        "a"
    );
}

#[test]
fn test_tree_serializes_to_json() {
    let tree = parse("print 1").expect("parse ok");
    let value = serde_json::to_value(tree.root()).expect("serialize");
    assert_eq!(value["kind"], "source_file");
    assert_eq!(value["children"][0]["kind"], "word");
}

// ---
// Errors
// ---

#[test]
fn test_unclosed_delimiters_fail() {
    for (source, delimiter) in [("[1 2", '['), ("(1 2", '('), ("#[a: 1", '[')] {
        let err = parse(source).expect_err(source);
        match err {
            carmine::CarmineError::Parse(parse_err) => {
                assert!(
                    matches!(
                        parse_err.kind,
                        ParseErrorKind::UnclosedDelimiter { delimiter: d } if d == delimiter
                    ),
                    "wrong kind for {source:?}: {:?}",
                    parse_err.kind
                );
            }
            other => panic!("expected parse error for {source:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_stray_closers_fail() {
    for source in ["]", ")", "1 ]", ","] {
        assert!(parse(source).is_err(), "should fail: {source:?}");
    }
}

#[test]
fn test_unterminated_string_has_span() {
    let err = parse("\"abc").expect_err("unterminated string");
    if let carmine::CarmineError::Parse(parse_err) = err {
        assert_eq!(parse_err.span().start, 0);
    } else {
        panic!("expected parse error");
    }
}

// ---
// Parser reuse
// ---

#[test]
fn test_parser_reuse_across_inputs() {
    let mut parser = Parser::new(Language::red()).expect("load grammar");
    for source in ["1", "[a b]", "x: y + 1"] {
        let tree = parser
            .parse(source, SourceContext::from_file("reuse", source))
            .expect(source);
        assert_eq!(tree.root().kind, SyntaxKind::SourceFile);
    }
}
