//! Context-sensitive scans the token grammar cannot express.
//!
//! Four of Red's lexical forms depend on surrounding context rather than a
//! fixed token shape: infix operators (whitespace-delimited on both sides),
//! base-16 `h` literals, raw strings with counted `%` delimiters, and
//! multiline brace strings with nesting and caret escapes. The lexer calls
//! into these; each scan takes a byte position and returns the position one
//! past the scanned form, or `None` when the form is absent.

use crate::syntax::Span;

pub(crate) fn char_at(src: &str, pos: usize) -> Option<char> {
    src.get(pos..).and_then(|rest| rest.chars().next())
}

/// Scans a `hexa` literal: 2 to 8 hex digits followed by `h`.
///
/// No boundary is required after the `h`; `FFhx` yields the hexa `FFh` and
/// leaves `x` for the next token.
pub fn scan_hexa(src: &str, start: usize) -> Option<usize> {
    let mut pos = start;
    let mut count = 0;
    while count < 8 {
        match char_at(src, pos) {
            Some(c) if c.is_ascii_hexdigit() => {
                pos += 1;
                count += 1;
            }
            _ => break,
        }
    }
    if count >= 2 && char_at(src, pos) == Some('h') {
        Some(pos + 1)
    } else {
        None
    }
}

/// Scans a raw string: one or more `%`, `{`, arbitrary content, `}` followed
/// by the same number of `%`. Content that never terminates runs to the end
/// of input and is still accepted as a (truncated) raw string.
pub fn scan_raw_string(src: &str, start: usize) -> Option<usize> {
    let bytes = src.as_bytes();
    let mut pos = start;
    let mut left = 0;
    while bytes.get(pos) == Some(&b'%') {
        pos += 1;
        left += 1;
    }
    if left == 0 || bytes.get(pos) != Some(&b'{') {
        return None;
    }
    pos += 1;

    let mut i = pos;
    while i < bytes.len() {
        if bytes[i] == b'}' {
            let mut j = i + 1;
            let mut matched = 0;
            while matched < left && bytes.get(j) == Some(&b'%') {
                j += 1;
                matched += 1;
            }
            if matched == left {
                return Some(j);
            }
        }
        i += 1;
    }
    Some(bytes.len())
}

/// Scans a multiline string: `{` to the matching `}` with nesting. The
/// sequences `^^`, `^{`, and `^}` are escapes and do not affect nesting.
/// Unterminated input ends the string at EOF.
pub fn scan_multiline_string(src: &str, start: usize) -> Option<usize> {
    if char_at(src, start) != Some('{') {
        return None;
    }
    let mut pos = start + 1;
    let mut depth = 1u32;
    loop {
        match char_at(src, pos) {
            None => return Some(src.len()),
            Some('{') => {
                depth += 1;
                pos += 1;
            }
            Some('}') => {
                depth -= 1;
                pos += 1;
                if depth == 0 {
                    return Some(pos);
                }
            }
            Some('^') => {
                pos += 1;
                if matches!(char_at(src, pos), Some('^') | Some('{') | Some('}')) {
                    pos += 1;
                }
            }
            Some(c) => pos += c.len_utf8(),
        }
    }
}

/// Scans an infix operator at `pos`, which must sit on whitespace following
/// the left operand. The operator itself must be followed by whitespace.
/// Returns the operator span and the position after it.
pub fn scan_infix_op(src: &str, pos: usize) -> Option<(Span, usize)> {
    match char_at(src, pos) {
        Some(c) if c.is_whitespace() => {}
        _ => return None,
    }
    let mut p = pos;
    while let Some(c) = char_at(src, p) {
        if c.is_whitespace() {
            p += c.len_utf8();
        } else {
            break;
        }
    }

    let op_start = p;
    match char_at(src, p)? {
        '=' => {
            p += 1;
            if char_at(src, p) == Some('=') {
                p += 1;
            }
        }
        '<' => {
            p += 1;
            if matches!(char_at(src, p), Some('=') | Some('<') | Some('>')) {
                p += 1;
            }
        }
        '>' => {
            p += 1;
            match char_at(src, p) {
                Some('=') => p += 1,
                Some('>') => {
                    p += 1;
                    if char_at(src, p) == Some('>') {
                        p += 1;
                    }
                }
                _ => {}
            }
        }
        '+' | '-' | '*' | '/' => p += 1,
        _ => return None,
    }

    match char_at(src, p) {
        Some(c) if c.is_whitespace() => Some((Span::new(op_start, p), p)),
        _ => None,
    }
}
