//! Target language data
//!
//! Everything the engine needs to know about a target that is not an
//! emission rule: the reserved words, the precedence overrides and the line
//! comment marker. The engine algorithm itself is target independent.

use crate::names::ReservedWords;
use crate::precedence::PrecedenceTable;

/// Per-target data bundle
#[derive(Debug, Clone)]
pub struct Language {
    pub name: &'static str,
    pub reserved_words: ReservedWords,
    pub precedence: PrecedenceTable,
    /// Prefix for each comment line, including the trailing space
    pub line_comment: &'static str,
}

impl Language {
    pub fn r() -> Self {
        Self {
            name: "R",
            reserved_words: ReservedWords::r(),
            precedence: PrecedenceTable::r(),
            line_comment: "# ",
        }
    }

    /// Quote `text` as a string literal
    ///
    /// Backslashes and newlines are escaped. Double quotes delimit text that
    /// contains a single quote but no double quote; otherwise single quotes
    /// are escaped and used as delimiters.
    ///
    /// # Examples
    /// ```
    /// use blockgen::Language;
    /// let r = Language::r();
    /// assert_eq!(r.quote("hello"), "'hello'");
    /// assert_eq!(r.quote("it's"), "\"it's\"");
    /// assert_eq!(r.quote("it's \"x\""), r#"'it\'s "x"'"#);
    /// ```
    pub fn quote(&self, text: &str) -> String {
        let escaped = text.replace('\\', "\\\\").replace('\n', "\\n");
        if escaped.contains('\'') {
            if !escaped.contains('"') {
                return format!("\"{}\"", escaped);
            }
            return format!("'{}'", escaped.replace('\'', "\\'"));
        }
        format!("'{}'", escaped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_escapes_backslash_and_newline() {
        let r = Language::r();
        assert_eq!(r.quote("a\\b"), r"'a\\b'");
        assert_eq!(r.quote("line1\nline2"), r"'line1\nline2'");
    }

    #[test]
    fn test_quote_empty() {
        assert_eq!(Language::r().quote(""), "''");
    }

    #[test]
    fn test_r_bundle() {
        let r = Language::r();
        assert_eq!(r.name, "R");
        assert!(r.reserved_words.contains("NULL"));
        assert_eq!(r.line_comment, "# ");
    }
}
