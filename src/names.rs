//! Name Registry - legal, collision-free identifiers
//!
//! Maps abstract keys (variable ids, developer variable names, helper
//! function names) to identifiers that are legal in the target language,
//! never equal a reserved word, and never collide with each other within one
//! generation pass.

use std::collections::{HashMap, HashSet};

/// What a name is being allocated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameKind {
    /// User variable, keyed by its id
    Variable,
    /// Compiler-internal variable (loop counters, guard counters)
    Developer,
    /// Helper function
    Procedure,
}

/// Immutable set of words no generated identifier may take
#[derive(Debug, Clone, Default)]
pub struct ReservedWords {
    words: HashSet<String>,
}

impl ReservedWords {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            words: words.into_iter().map(Into::into).collect(),
        }
    }

    /// R keywords plus built-ins the R rules call
    pub fn r() -> Self {
        Self::new(R_KEYWORDS.iter().chain(R_BUILTINS).copied())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

// https://cran.r-project.org/doc/manuals/r-release/R-lang.html#Reserved-words
const R_KEYWORDS: &[&str] = &[
    "if", "else", "repeat", "while", "function", "for", "in", "next", "break", "TRUE", "FALSE",
    "NULL", "Inf", "NaN", "NA", "NA_integer_", "NA_real_", "NA_complex_", "NA_character_", "...",
];

const R_BUILTINS: &[&str] = &[
    "pi", "T", "F", "c", "list", "print", "paste", "paste0", "length", "seq", "seq_along", "rev",
    "rep", "append", "sum", "min", "max", "mean", "median", "sd", "round", "ceiling", "floor",
    "sqrt", "abs", "log", "log10", "exp", "sin", "cos", "tan", "asin", "acos", "atan", "atan2",
    "nchar", "substr", "substring", "toupper", "tolower", "trimws", "readline", "stop", "sample",
    "runif", "which", "match", "unlist", "strsplit", "table", "names", "sort", "rgb", "col2rgb",
    "letters", "LETTERS", "return",
];

/// Per-pass identifier allocator
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    reserved: ReservedWords,
    /// Variable id -> display name, for `NameKind::Variable` lookups
    variable_names: HashMap<String, String>,
    assigned: HashMap<(NameKind, String), String>,
    taken: HashSet<String>,
}

impl NameRegistry {
    pub fn new(reserved: ReservedWords) -> Self {
        Self {
            reserved,
            ..Default::default()
        }
    }

    /// Forget every assigned name and the variable map
    pub fn reset(&mut self) {
        self.variable_names.clear();
        self.assigned.clear();
        self.taken.clear();
    }

    /// Nothing assigned and no variable map loaded
    pub fn is_empty(&self) -> bool {
        self.variable_names.is_empty() && self.assigned.is_empty() && self.taken.is_empty()
    }

    pub fn reserved(&self) -> &ReservedWords {
        &self.reserved
    }

    /// Load the id -> display name map used for `NameKind::Variable`
    pub fn set_variable_map<I, K, V>(&mut self, variables: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.variable_names = variables
            .into_iter()
            .map(|(id, name)| (id.into(), name.into()))
            .collect();
    }

    /// Identifier for `key`, allocating one on first use
    ///
    /// Variable keys are ids, resolved to display names through the variable
    /// map (an unknown id is used as its own name). Keys are case-sensitive,
    /// like R identifiers and editor block ids.
    pub fn get_name(&mut self, key: &str, kind: NameKind) -> String {
        let lookup = (kind, key.to_string());
        if let Some(name) = self.assigned.get(&lookup) {
            return name.clone();
        }
        let proposed = match kind {
            NameKind::Variable => self
                .variable_names
                .get(key)
                .cloned()
                .unwrap_or_else(|| key.to_string()),
            _ => key.to_string(),
        };
        let name = self.get_distinct_name(&proposed, kind);
        self.assigned.insert(lookup, name.clone());
        name
    }

    /// Fresh identifier derived from `proposed`, never handed out before
    pub fn get_distinct_name(&mut self, proposed: &str, _kind: NameKind) -> String {
        let base = Self::safe_name(proposed);
        let mut candidate = base.clone();
        let mut suffix = 1u64;
        while self.taken.contains(&candidate) || self.reserved.contains(&candidate) {
            suffix += 1;
            candidate = format!("{}{}", base, suffix);
        }
        self.taken.insert(candidate.clone());
        candidate
    }

    /// Make `name` a legal R identifier
    ///
    /// # Examples
    /// ```
    /// use blockgen::NameRegistry;
    /// assert_eq!(NameRegistry::safe_name("my var"), "my_var");
    /// assert_eq!(NameRegistry::safe_name("2nd"), "my_2nd");
    /// assert_eq!(NameRegistry::safe_name(""), "unnamed");
    /// ```
    pub fn safe_name(name: &str) -> String {
        if name.is_empty() {
            return "unnamed".into();
        }
        let cleaned: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        match cleaned.chars().next() {
            Some(c) if c.is_ascii_digit() || c == '_' => format!("my_{}", cleaned),
            _ => cleaned,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> NameRegistry {
        NameRegistry::new(ReservedWords::r())
    }

    #[test]
    fn test_same_key_same_name() {
        let mut names = registry();
        let first = names.get_name("counter", NameKind::Developer);
        let second = names.get_name("counter", NameKind::Developer);
        assert_eq!(first, "counter");
        assert_eq!(first, second);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let mut names = registry();
        let upper = names.get_name("Tmp", NameKind::Developer);
        let lower = names.get_name("tmp", NameKind::Developer);
        assert_eq!(upper, "Tmp");
        assert_eq!(lower, "tmp");
        assert_eq!(names.get_name("Tmp", NameKind::Developer), "Tmp");
    }

    #[test]
    fn test_reserved_word_gets_suffix() {
        let mut names = registry();
        assert_eq!(names.get_name("if", NameKind::Developer), "if2");
        assert_eq!(names.get_name("pi", NameKind::Developer), "pi2");
    }

    #[test]
    fn test_variable_resolved_through_map() {
        let mut names = registry();
        names.set_variable_map([("v1", "total"), ("v2", "total")]);
        assert_eq!(names.get_name("v1", NameKind::Variable), "total");
        assert_eq!(names.get_name("v2", NameKind::Variable), "total2");
        assert_eq!(names.get_name("v1", NameKind::Variable), "total");
    }

    #[test]
    fn test_distinct_name_never_repeats() {
        let mut names = registry();
        let a = names.get_distinct_name("count", NameKind::Developer);
        let b = names.get_distinct_name("count", NameKind::Developer);
        let c = names.get_distinct_name("count", NameKind::Developer);
        assert_eq!((a.as_str(), b.as_str(), c.as_str()), ("count", "count2", "count3"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut names = registry();
        names.set_variable_map([("v1", "x")]);
        names.get_name("v1", NameKind::Variable);
        assert!(!names.is_empty());

        names.reset();
        assert!(names.is_empty());
        assert_eq!(names.get_distinct_name("x", NameKind::Variable), "x");
    }

    #[test]
    fn test_safe_name() {
        assert_eq!(NameRegistry::safe_name("a.b-c"), "a_b_c");
        assert_eq!(NameRegistry::safe_name("_hidden"), "my__hidden");
        assert_eq!(NameRegistry::safe_name("ok_1"), "ok_1");
    }
}
