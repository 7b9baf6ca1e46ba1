//! Identifier quoting and literal escaping for the MySQL-like dialect.

/// Quote one identifier with backticks, doubling embedded backticks.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    out.push('`');
    for ch in name.chars() {
        if ch == '`' {
            out.push('`');
        }
        out.push(ch);
    }
    out.push('`');
    out
}

/// Backslash-escape the body of a single-quoted string literal.
///
/// Covers the control set MySQL's own escaping covers: backslash, both
/// quote kinds, NUL, newline, carriage return, and ^Z.
#[must_use]
pub fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\0' => out.push_str("\\0"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{1a}' => out.push_str("\\Z"),
            other => out.push(other),
        }
    }
    out
}

/// Single-quoted, escaped text literal.
#[must_use]
pub fn text_literal(raw: &str) -> String {
    format!("'{}'", escape_text(raw))
}

///
/// TESTS
///
