//! Shared utility functions
//!
//! Text helpers used by the chain walker and the rule tables.

use regex::Regex;
use std::sync::OnceLock;

/// Prefix every line of `text`, except after a final trailing newline
///
/// # Examples
/// ```
/// use blockgen::util::prefix_lines;
/// assert_eq!(prefix_lines("a\nb\n", "  "), "  a\n  b\n");
/// assert_eq!(prefix_lines("note", "# "), "# note");
/// ```
pub fn prefix_lines(text: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(text.len() + prefix.len() * 4);
    out.push_str(prefix);
    for (i, ch) in text.char_indices() {
        out.push(ch);
        if ch == '\n' && i + 1 < text.len() {
            out.push_str(prefix);
        }
    }
    out
}

/// Greedy word wrap, applied to each line of `text` separately
///
/// Words longer than `limit` are kept whole on their own line.
///
/// # Examples
/// ```
/// use blockgen::util::wrap;
/// assert_eq!(wrap("one two three", 7), "one two\nthree");
/// ```
pub fn wrap(text: &str, limit: usize) -> String {
    let limit = limit.max(1);
    text.split('\n')
        .map(|line| wrap_line(line, limit))
        .collect::<Vec<_>>()
        .join("\n")
}

fn wrap_line(line: &str, limit: usize) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in line.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= limit {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    lines.push(current);
    lines.join("\n")
}

/// Whether generated code is a plain numeric literal
///
/// # Examples
/// ```
/// use blockgen::util::is_number;
/// assert!(is_number("-12.5"));
/// assert!(!is_number("x + 1"));
/// ```
pub fn is_number(code: &str) -> bool {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    NUMBER
        .get_or_init(|| Regex::new(r"^\s*-?\d+(\.\d+)?\s*$").expect("valid number regex"))
        .is_match(code)
}

/// Whether generated code is a bare identifier or literal word (`\w+`)
pub fn is_word(code: &str) -> bool {
    !code.is_empty() && code.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Format a number the way the target expects it in source
///
/// # Examples
/// ```
/// use blockgen::util::format_number;
/// assert_eq!(format_number(5.0), "5");
/// assert_eq!(format_number(-0.25), "-0.25");
/// assert_eq!(format_number(f64::INFINITY), "Inf");
/// ```
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        "NaN".into()
    } else if n.is_infinite() {
        if n > 0.0 { "Inf".into() } else { "-Inf".into() }
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}
