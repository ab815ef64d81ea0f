//! Emission rules - one per block type
//!
//! A rule turns a single block into code, calling back into the
//! [`Generator`] for its children (`emit_value`, `emit_statement`), for names
//! and for helper definitions. Value blocks return an [`Expr`] with the order
//! the code binds at; statement blocks return newline-terminated text.
//!
//! The R rule tables are split by editor category:
//! - `colour` - colour literals and mixing
//! - `lists` - list construction, indexing, slicing
//! - `logic` - conditionals, comparisons, boolean operators
//! - `loops` - count, while/until, for, for-each, break/next
//! - `math` - arithmetic, functions, aggregates, random numbers
//! - `text` - string literals and string operations
//! - `variables` - variable get and set

mod colour;
mod lists;
mod logic;
mod loops;
mod math;
mod text;
mod variables;

use crate::block::Block;
use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::precedence::{Expr, Order};
use indexmap::IndexMap;
use std::sync::Arc;

/// Output of one rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    /// Expression plus the order it binds at
    Value(Expr),
    /// Statement text, terminated by a newline
    Statement(String),
}

impl Code {
    pub fn value(code: impl Into<String>, order: Order) -> Self {
        Code::Value(Expr::new(code, order))
    }

    pub fn statement(code: impl Into<String>) -> Self {
        Code::Statement(code.into())
    }
}

/// Translation of one block type
pub trait EmissionRule: Send + Sync {
    fn emit(&self, block: &Block, gen: &mut Generator) -> Result<Code>;
}

impl<F> EmissionRule for F
where
    F: Fn(&Block, &mut Generator) -> Result<Code> + Send + Sync,
{
    fn emit(&self, block: &Block, gen: &mut Generator) -> Result<Code> {
        self(block, gen)
    }
}

/// Registry from type tag to rule
#[derive(Clone, Default)]
pub struct RuleSet {
    rules: IndexMap<String, Arc<dyn EmissionRule>>,
}

impl std::fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleSet")
            .field("tags", &self.rules.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The complete R rule table
    pub fn r() -> Result<Self> {
        let mut rules = Self::new();
        colour::register(&mut rules)?;
        lists::register(&mut rules)?;
        logic::register(&mut rules)?;
        loops::register(&mut rules)?;
        math::register(&mut rules)?;
        text::register(&mut rules)?;
        variables::register(&mut rules)?;
        Ok(rules)
    }

    /// Register a rule; a tag may only be registered once
    pub fn register(&mut self, tag: &str, rule: impl EmissionRule + 'static) -> Result<()> {
        self.register_arc(tag, Arc::new(rule))
    }

    pub fn register_arc(&mut self, tag: &str, rule: Arc<dyn EmissionRule>) -> Result<()> {
        if self.rules.contains_key(tag) {
            return Err(Error::DuplicateRule(tag.to_string()));
        }
        self.rules.insert(tag.to_string(), rule);
        Ok(())
    }

    /// Make `alias` dispatch to the rule already registered for `target`
    pub fn alias(&mut self, alias: &str, target: &str) -> Result<()> {
        let rule = self
            .rules
            .get(target)
            .cloned()
            .ok_or_else(|| Error::Other(format!("Cannot alias '{}' to unregistered '{}'", alias, target)))?;
        self.register_arc(alias, rule)
    }

    /// Rule for a block, failing hard when its type has none
    pub fn get(&self, block: &Block) -> Result<Arc<dyn EmissionRule>> {
        self.rules
            .get(&block.kind)
            .cloned()
            .ok_or_else(|| Error::UnknownNodeType {
                block_type: block.kind.clone(),
                block_id: block.id.clone(),
            })
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.rules.contains_key(tag)
    }

    /// Registered tags in registration order
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.rules.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Field value that must come from a fixed set of codes
pub(crate) fn dropdown<'a>(block: &Block, field: &str, choices: &[&'a str]) -> Result<&'a str> {
    let value = block.required_field(field)?;
    choices
        .iter()
        .find(|choice| **choice == value)
        .copied()
        .ok_or_else(|| Error::unknown_enum(&block.kind, field, value))
}
