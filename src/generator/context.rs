//! Per-pass scratch state
//!
//! Declaration buckets, the helper-function name map and the Name Registry.
//! Created empty, filled during one pass, emptied again when the pass ends.

use crate::names::{NameRegistry, ReservedWords};
use indexmap::IndexMap;
use std::collections::HashMap;

/// Bucket holding the pre-declared variables
pub const VARIABLES_BUCKET: &str = "variables";

/// Bucket holding loop guard counters
pub const LOOP_GUARDS_BUCKET: &str = "loop_guards";

#[derive(Debug, Clone, Default)]
pub struct GenerationContext {
    /// Declaration text by bucket, in first-insertion order
    pub(crate) definitions: IndexMap<String, String>,
    /// Desired helper name -> assigned name
    pub(crate) function_names: HashMap<String, String>,
    pub(crate) names: NameRegistry,
}

impl GenerationContext {
    pub fn new(reserved: ReservedWords) -> Self {
        Self {
            definitions: IndexMap::new(),
            function_names: HashMap::new(),
            names: NameRegistry::new(reserved),
        }
    }

    pub fn reset(&mut self) {
        self.definitions.clear();
        self.function_names.clear();
        self.names.reset();
    }

    /// True when nothing from a previous pass is left behind
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty() && self.function_names.is_empty() && self.names.is_empty()
    }

    pub fn definition(&self, bucket: &str) -> Option<&str> {
        self.definitions.get(bucket).map(String::as_str)
    }

    pub fn definitions(&self) -> impl Iterator<Item = (&str, &str)> {
        self.definitions
            .iter()
            .map(|(bucket, text)| (bucket.as_str(), text.as_str()))
    }

    pub fn names(&self) -> &NameRegistry {
        &self.names
    }

    /// Replace a bucket's text
    pub(crate) fn set_definition(&mut self, bucket: &str, text: String) {
        self.definitions.insert(bucket.to_string(), text);
    }

    /// Add a line to a bucket unless it is already there
    pub(crate) fn append_definition(&mut self, bucket: &str, line: &str) {
        let text = self.definitions.entry(bucket.to_string()).or_default();
        if text.lines().any(|existing| existing == line) {
            return;
        }
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(line);
    }

    /// All buckets joined by a blank line
    pub(crate) fn joined_definitions(&self) -> String {
        self.definitions
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
