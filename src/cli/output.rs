//! Handles all user-facing output for the CLI.
//!
//! Tree outlines and value listings are colorized through `termcolor`; the
//! `--json` path serializes nodes with `serde_json`. Centralizing output
//! here keeps the command handlers free of formatting concerns.

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::syntax::{Spanned, SyntaxKind, SyntaxNode, Tree};

/// Prints an indented, colorized outline of the tree with one node per
/// line: kind, span, and the source text of leaves.
pub fn print_tree(tree: &Tree) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    print_node(&mut stdout, tree.root(), tree.source(), 0);
}

fn kind_color(kind: SyntaxKind) -> Option<Color> {
    use SyntaxKind::*;
    match kind {
        Comment => Some(Color::Green),
        String | StringContent | RawString | MultilineString | Char | File
        | FileContent | Tag => Some(Color::Yellow),
        Number | Pair | Tuple | Time | Date | Money | Point | Hexa | Binary => {
            Some(Color::Cyan)
        }
        While | Loop | Function | Include => Some(Color::Magenta),
        Infix | Operator => Some(Color::Blue),
        _ => None,
    }
}

fn print_node(stdout: &mut StandardStream, node: &SyntaxNode, source: &str, depth: usize) {
    let mut spec = ColorSpec::new();
    spec.set_fg(kind_color(node.kind));
    let _ = stdout.set_color(&spec);
    print!("{:indent$}{}", "", node.kind.name(), indent = depth * 2);
    let _ = stdout.reset();
    if let Some(field) = node.field {
        print!(" ({})", field);
    }
    print!(" [{}..{}]", node.span.start, node.span.end);
    if node.is_leaf() {
        print!(" {:?}", node.text(source));
    }
    println!();
    for child in &node.children {
        print_node(stdout, child, source, depth + 1);
    }
}

/// Serializes the tree's root node as pretty-printed JSON.
pub fn print_tree_json(tree: &Tree) -> serde_json::Result<()> {
    let rendered = serde_json::to_string_pretty(tree.root())?;
    println!("{}", rendered);
    Ok(())
}

/// Prints the flat value listing produced by the lexer.
pub fn print_values(values: &[Spanned<String>], source: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    for item in values {
        let _ = stdout.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)));
        print!("{:>5}..{:<5}", item.span.start, item.span.end);
        let _ = stdout.reset();
        println!(
            " {:<18} {:?}",
            item.value,
            &source[item.span.start..item.span.end]
        );
    }
}
