//! Block program types: the input data model
//!
//! A `Program` is what the visual editor hands over: the workspace variables
//! and the top-level blocks in workspace order. Each `Block` carries a type
//! tag (used for rule dispatch), literal fields, value sockets, statement
//! sockets and an optional `next` link to the following statement.
//!
//! Children are owned, so a block tree can never contain a cycle.
//!
//! ## Example Program
//!
//! ```yaml
//! variables:
//!   - id: v1
//!     name: greeting
//! blocks:
//!   - id: b1
//!     type: variables_set
//!     fields:
//!       VAR: { variable: v1 }
//!     values:
//!       VALUE: { id: b2, type: text, fields: { TEXT: hello } }
//!     next:
//!       id: b3
//!       type: text_print
//!       values:
//!         TEXT:
//!           id: b4
//!           type: variables_get
//!           fields:
//!             VAR: { variable: v1 }
//! ```

use crate::error::{Error, Result};
use crate::util::format_number;
use indexmap::{IndexMap, IndexSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A complete block program
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "blockgen Program", description = "Block workspace to translate")]
pub struct Program {
    /// User variables known to the workspace
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub variables: Vec<VariableModel>,

    /// Compiler-internal variables (the name is the key)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub developer_variables: Vec<String>,

    /// Top-level blocks in workspace order
    #[serde(default)]
    pub blocks: Vec<Block>,
}

/// A user variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VariableModel {
    /// Stable identifier referenced from `{variable: id}` fields
    pub id: String,
    /// Display name chosen by the user
    pub name: String,
}

/// One block in the program tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Block {
    /// Stable identity (used for loop guards and error messages)
    #[serde(default)]
    pub id: String,

    /// Type tag used to look up the emission rule
    #[serde(rename = "type")]
    pub kind: String,

    /// Literal field values (numbers, dropdown codes, text, variable refs)
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub fields: IndexMap<String, FieldValue>,

    /// Value sockets; `None` is a declared but empty socket
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub values: IndexMap<String, Option<Box<Block>>>,

    /// Statement sockets holding the head of a nested chain
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub statements: IndexMap<String, Option<Box<Block>>>,

    /// Following statement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<Box<Block>>,

    /// Comment attached in the editor
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    /// Disabled blocks generate no code
    #[serde(default, skip_serializing_if = "is_false")]
    pub disabled: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Literal field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Bool(bool),
    Number(f64),
    Variable { variable: String },
    Text(String),
}

impl FieldValue {
    /// Render the value the way dropdown codes and literals are compared
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Bool(true) => "TRUE".into(),
            FieldValue::Bool(false) => "FALSE".into(),
            FieldValue::Number(n) => format_number(*n),
            FieldValue::Variable { variable } => variable.clone(),
            FieldValue::Text(s) => s.clone(),
        }
    }

    /// Numeric view of the value, parsing text if needed
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl Block {
    /// Create a block with the given id and type
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            ..Default::default()
        }
    }

    /// Builder: set a field
    pub fn with_field(mut self, name: &str, value: FieldValue) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }

    /// Builder: set a text field
    pub fn with_text(self, name: &str, value: impl Into<String>) -> Self {
        self.with_field(name, FieldValue::Text(value.into()))
    }

    /// Builder: attach a value child (or declare an empty socket)
    pub fn with_value(mut self, socket: &str, child: Option<Block>) -> Self {
        self.values.insert(socket.to_string(), child.map(Box::new));
        self
    }

    /// Builder: attach a statement chain (or declare an empty socket)
    pub fn with_statement(mut self, socket: &str, head: Option<Block>) -> Self {
        self.statements.insert(socket.to_string(), head.map(Box::new));
        self
    }

    /// Builder: set the next statement
    pub fn with_next(mut self, next: Block) -> Self {
        self.next = Some(Box::new(next));
        self
    }

    /// Builder: attach a comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn is_enabled(&self) -> bool {
        !self.disabled
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn field_text(&self, name: &str) -> Option<String> {
        self.fields.get(name).map(FieldValue::as_text)
    }

    /// Field that the rule cannot do without
    pub fn required_field(&self, name: &str) -> Result<String> {
        self.field_text(name).ok_or_else(|| Error::MissingField {
            block_type: self.kind.clone(),
            field: name.to_string(),
        })
    }

    /// Child connected to a value socket
    pub fn value_input(&self, socket: &str) -> Option<&Block> {
        self.values.get(socket).and_then(|child| child.as_deref())
    }

    /// Head of the chain connected to a statement socket
    pub fn statement_input(&self, socket: &str) -> Option<&Block> {
        self.statements.get(socket).and_then(|head| head.as_deref())
    }

    /// Whether a socket is declared on this block, connected or not
    pub fn has_input(&self, socket: &str) -> bool {
        self.values.contains_key(socket) || self.statements.contains_key(socket)
    }

    /// Number of consecutive declared value sockets `prefix0`, `prefix1`, ...
    pub fn item_count(&self, prefix: &str) -> usize {
        (0..)
            .take_while(|i| self.values.contains_key(&format!("{}{}", prefix, i)))
            .count()
    }

    pub fn next_block(&self) -> Option<&Block> {
        self.next.as_deref()
    }

    /// Collect ids referenced by `{variable: id}` fields in this subtree
    pub fn collect_variable_refs(&self, refs: &mut HashSet<String>) {
        for value in self.fields.values() {
            if let FieldValue::Variable { variable } = value {
                refs.insert(variable.clone());
            }
        }
        for child in self.values.values().chain(self.statements.values()).flatten() {
            child.collect_variable_refs(refs);
        }
        if let Some(next) = &self.next {
            next.collect_variable_refs(refs);
        }
    }

    /// Collect type tags in this subtree, first occurrence first
    pub fn collect_kinds(&self, kinds: &mut IndexSet<String>) {
        kinds.insert(self.kind.clone());
        for child in self.values.values().chain(self.statements.values()).flatten() {
            child.collect_kinds(kinds);
        }
        if let Some(next) = &self.next {
            next.collect_kinds(kinds);
        }
    }
}

impl Program {
    /// Parse program from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_norway::from_str(yaml)?)
    }

    /// Serialize program to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_norway::to_string(self)?)
    }

    /// Parse program from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse from either format, picking JSON when the text starts with `{`
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim_start().starts_with('{') {
            Self::from_json(text)
        } else {
            Self::from_yaml(text)
        }
    }

    /// Variables referenced somewhere in the block tree, in declaration order
    pub fn used_variables(&self) -> Vec<&VariableModel> {
        let mut refs = HashSet::new();
        for block in &self.blocks {
            block.collect_variable_refs(&mut refs);
        }
        self.variables
            .iter()
            .filter(|v| refs.contains(&v.id))
            .collect()
    }

    /// Distinct block type tags used anywhere in the program
    pub fn block_types(&self) -> Vec<String> {
        let mut kinds = IndexSet::new();
        for block in &self.blocks {
            block.collect_kinds(&mut kinds);
        }
        kinds.into_iter().collect()
    }

    /// Compute hash of program for provenance headers
    pub fn hash(&self) -> String {
        use sha2::{Digest, Sha256};
        let content = self.to_yaml().unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("sha256:{}", hex::encode(&hasher.finalize()[..8]))
    }
}
