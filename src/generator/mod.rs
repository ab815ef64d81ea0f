//! Generation engine
//!
//! The [`Generator`] owns a target [`Language`], a [`RuleSet`] and a
//! [`GeneratorConfig`], plus the scratch state of the pass in progress.
//!
//! ```text
//! IDLE --begin_generation--> GENERATING --finish_generation--> FINALIZED --> IDLE
//!                                 |
//!                                 +--- any error: abort, state cleared ---> IDLE
//! ```
//!
//! Only while GENERATING may rules emit children, allocate names or add
//! definitions. One generator runs one pass at a time; concurrent passes
//! need one generator each.

mod chain;
mod context;
mod loop_guard;

pub use context::{GenerationContext, LOOP_GUARDS_BUCKET, VARIABLES_BUCKET};

use crate::block::{Block, Program};
use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::language::Language;
use crate::names::NameKind;
use crate::precedence::Order;
use crate::rules::{Code, EmissionRule, RuleSet};
use crate::util::{is_number, prefix_lines};
use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, trace, warn};

/// Placeholder for the assigned name inside [`Generator::provide_function`] lines
pub const FUNCTION_NAME_PLACEHOLDER: &str = "{{function_name}}";

/// Lifecycle state of a generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationState {
    Idle,
    Generating,
    Finalized,
}

/// Block tree to source text translator
#[derive(Debug)]
pub struct Generator {
    language: Language,
    rules: RuleSet,
    config: GeneratorConfig,
    state: GenerationState,
    ctx: GenerationContext,
    source_name: Option<String>,
}

impl Generator {
    pub fn new(language: Language, rules: RuleSet, config: GeneratorConfig) -> Self {
        let ctx = GenerationContext::new(language.reserved_words.clone());
        Self {
            language,
            rules,
            config,
            state: GenerationState::Idle,
            ctx,
            source_name: None,
        }
    }

    /// R generator with the full R rule table
    pub fn r(config: GeneratorConfig) -> Result<Self> {
        Ok(Self::new(Language::r(), RuleSet::r()?, config))
    }

    /// Name shown in the provenance header
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = Some(name.into());
        self
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn state(&self) -> GenerationState {
        self.state
    }

    pub fn context(&self) -> &GenerationContext {
        &self.ctx
    }

    /// Add a rule; not allowed while a pass is running
    pub fn register_rule(&mut self, tag: &str, rule: impl EmissionRule + 'static) -> Result<()> {
        if self.state != GenerationState::Idle {
            return Err(Error::AlreadyGenerating);
        }
        self.rules.register(tag, rule)
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// IDLE -> GENERATING, with fresh scratch state
    pub fn begin_generation(&mut self) -> Result<()> {
        if self.state != GenerationState::Idle {
            return Err(Error::AlreadyGenerating);
        }
        self.ctx.reset();
        self.state = GenerationState::Generating;
        debug!(language = self.language.name, "generation started");
        Ok(())
    }

    /// Prepend the declaration buckets to `body`, then clear all state
    pub fn finish_generation(&mut self, body: &str) -> Result<String> {
        self.ensure_generating()?;
        self.state = GenerationState::Finalized;
        let definitions = self.ctx.joined_definitions();
        let buckets = self.ctx.definitions.len();
        self.ctx.reset();
        self.state = GenerationState::Idle;
        debug!(buckets, body_len = body.len(), "generation finished");
        Ok(format!("{}\n\n\n{}", definitions, body))
    }

    /// Drop the pass in progress
    pub fn abort_generation(&mut self) {
        if self.state != GenerationState::Idle {
            warn!("generation aborted");
        }
        self.ctx.reset();
        self.state = GenerationState::Idle;
    }

    fn ensure_generating(&self) -> Result<()> {
        if self.state == GenerationState::Generating {
            Ok(())
        } else {
            Err(Error::NotGenerating)
        }
    }

    /// Translate a whole program
    ///
    /// Any error aborts the pass and leaves the generator IDLE.
    pub fn generate(&mut self, program: &Program) -> Result<String> {
        self.begin_generation()?;
        let body = match self.generate_body(program) {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "generation failed");
                self.abort_generation();
                return Err(e);
            }
        };
        let code = clean_whitespace(&self.finish_generation(&body)?);

        if self.config.provenance {
            Ok(format!("{}{}", self.provenance_header(program), code))
        } else {
            Ok(code)
        }
    }

    fn generate_body(&mut self, program: &Program) -> Result<String> {
        self.ctx.names.set_variable_map(
            program
                .variables
                .iter()
                .map(|v| (v.id.as_str(), v.name.as_str())),
        );
        self.declare_variables(program)?;

        let mut chunks = Vec::new();
        for block in &program.blocks {
            let code = self.emit_chain(block, false)?;
            if !code.is_empty() {
                chunks.push(code);
            }
        }
        Ok(chunks.join("\n"))
    }

    /// Declare developer variables, then the user variables the tree uses
    pub fn declare_variables(&mut self, program: &Program) -> Result<()> {
        self.ensure_generating()?;
        let init = self.config.variable_initializer.clone();
        let mut lines = Vec::new();
        for name in &program.developer_variables {
            let name = self.ctx.names.get_name(name, NameKind::Developer);
            lines.push(format!("{} <- {}", name, init));
        }
        for variable in program.used_variables() {
            let name = self.ctx.names.get_name(&variable.id, NameKind::Variable);
            lines.push(format!("{} <- {}", name, init));
        }
        self.ctx.set_definition(VARIABLES_BUCKET, lines.join("\n"));
        Ok(())
    }

    fn provenance_header(&self, program: &Program) -> String {
        format!(
            "# GENERATED FROM: {}\n# PROGRAM HASH: {}\n# GENERATED: {}\n# DO NOT EDIT - regenerate from the block program\n\n",
            self.source_name.as_deref().unwrap_or("<program>"),
            program.hash(),
            chrono::Utc::now().to_rfc3339()
        )
    }

    // ------------------------------------------------------------------
    // Dispatch
    // ------------------------------------------------------------------

    /// Run the rule for one block; disabled blocks give `None`
    pub(crate) fn emit_block(&mut self, block: &Block) -> Result<Option<Code>> {
        self.ensure_generating()?;
        if !block.is_enabled() {
            trace!(block = %block.id, "skipping disabled block");
            return Ok(None);
        }
        let rule = self.rules.get(block)?;
        trace!(block = %block.id, kind = %block.kind, "emitting");
        rule.emit(block, self).map(Some)
    }

    /// Code for the child in a value socket, grouped for the `outer` slot
    ///
    /// `None` when the socket is absent, empty or holds a disabled block.
    pub fn emit_value(&mut self, block: &Block, socket: &str, outer: Order) -> Result<Option<String>> {
        self.ensure_generating()?;
        let Some(child) = block.value_input(socket) else {
            return Ok(None);
        };
        match self.emit_block(child)? {
            None => Ok(None),
            Some(Code::Value(expr)) => Ok(Some(self.language.precedence.parenthesize(outer, expr))),
            Some(Code::Statement(_)) => Err(Error::UnexpectedCode {
                block_type: child.kind.clone(),
                expected: "value",
            }),
        }
    }

    /// [`emit_value`](Self::emit_value) with a caller default for a missing child
    pub fn emit_value_or(
        &mut self,
        block: &Block,
        socket: &str,
        outer: Order,
        default: &str,
    ) -> Result<String> {
        Ok(self
            .emit_value(block, socket, outer)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Indented code for the chain in a statement socket; empty if none
    pub fn emit_statement(&mut self, block: &Block, socket: &str) -> Result<String> {
        self.ensure_generating()?;
        let Some(head) = block.statement_input(socket) else {
            return Ok(String::new());
        };
        let code = self.walk_chain(head, false, false)?;
        if code.is_empty() {
            return Ok(code);
        }
        Ok(prefix_lines(&code, &self.config.indent))
    }

    // ------------------------------------------------------------------
    // Names and definitions
    // ------------------------------------------------------------------

    pub fn get_name(&mut self, key: &str, kind: NameKind) -> Result<String> {
        self.ensure_generating()?;
        Ok(self.ctx.names.get_name(key, kind))
    }

    pub fn get_distinct_name(&mut self, proposed: &str, kind: NameKind) -> Result<String> {
        self.ensure_generating()?;
        Ok(self.ctx.names.get_distinct_name(proposed, kind))
    }

    /// Identifier of the user variable referenced by `field`
    pub fn variable_name(&mut self, block: &Block, field: &str) -> Result<String> {
        let id = block.required_field(field)?;
        self.get_name(&id, NameKind::Variable)
    }

    /// Define a helper function once per pass and return its name
    ///
    /// `lines` may use [`FUNCTION_NAME_PLACEHOLDER`] wherever the helper
    /// refers to itself.
    pub fn provide_function(&mut self, desired: &str, lines: &[&str]) -> Result<String> {
        self.ensure_generating()?;
        if let Some(name) = self.ctx.function_names.get(desired) {
            return Ok(name.clone());
        }
        let name = self.ctx.names.get_distinct_name(desired, NameKind::Procedure);
        let code = lines.join("\n").replace(FUNCTION_NAME_PLACEHOLDER, &name);
        self.ctx.function_names.insert(desired.to_string(), name.clone());
        self.ctx.set_definition(desired, code);
        trace!(helper = %name, "provided function");
        Ok(name)
    }

    pub fn set_definition(&mut self, bucket: &str, text: impl Into<String>) -> Result<()> {
        self.ensure_generating()?;
        self.ctx.set_definition(bucket, text.into());
        Ok(())
    }

    pub fn append_definition(&mut self, bucket: &str, line: &str) -> Result<()> {
        self.ensure_generating()?;
        self.ctx.append_definition(bucket, line);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Helpers for rules
    // ------------------------------------------------------------------

    pub fn quote_string_literal(&self, text: &str) -> String {
        self.language.quote(text)
    }

    /// Index expression from `socket`, shifted by `delta`
    ///
    /// With 1-based indexing one more is subtracted. Literal indices are
    /// folded now, dynamic ones are adjusted in the generated code.
    pub fn adjusted_index(
        &mut self,
        block: &Block,
        socket: &str,
        delta: i64,
        negate: bool,
    ) -> Result<String> {
        let delta = if self.config.one_based_index { delta - 1 } else { delta };
        let default = if self.config.one_based_index { "1" } else { "0" };
        let order = if delta != 0 { Order::ADDITIVE } else { Order::NONE };
        let at = self.emit_value_or(block, socket, order, default)?;

        if let Some(literal) = fold_index(&at, delta, negate) {
            return Ok(literal.to_string());
        }

        let at = if delta > 0 {
            format!("as.numeric({} + {})", at, delta)
        } else if delta < 0 {
            format!("as.numeric({} - {})", at, -delta)
        } else {
            format!("as.numeric({})", at)
        };
        Ok(if negate { format!("-{}", at) } else { at })
    }
}

/// Literal index shifted at generation time; `None` when `code` is not a
/// literal or the result does not fit an `i64`
fn fold_index(code: &str, delta: i64, negate: bool) -> Option<i64> {
    if !is_number(code) {
        return None;
    }
    let value = code.trim().parse::<f64>().ok()?.trunc();
    if !value.is_finite() || value.abs() >= i64::MAX as f64 {
        return None;
    }
    let shifted = (value as i64).checked_add(delta)?;
    if negate {
        shifted.checked_neg()
    } else {
        Some(shifted)
    }
}

/// Drop leading blank lines, collapse trailing whitespace and strip
/// trailing spaces on every line
pub fn clean_whitespace(code: &str) -> String {
    static LEADING: OnceLock<Regex> = OnceLock::new();
    static TRAILING: OnceLock<Regex> = OnceLock::new();
    static LINE_END: OnceLock<Regex> = OnceLock::new();

    let leading = LEADING.get_or_init(|| Regex::new(r"\A\s+\n").expect("valid regex"));
    let trailing = TRAILING.get_or_init(|| Regex::new(r"\n\s+\z").expect("valid regex"));
    let line_end = LINE_END.get_or_init(|| Regex::new(r"[ \t]+\n").expect("valid regex"));

    let code = leading.replace(code, "");
    let code = trailing.replace(&code, "\n");
    line_end.replace_all(&code, "\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::FieldValue;

    fn generator() -> Generator {
        Generator::r(GeneratorConfig::default()).unwrap()
    }

    fn number(id: &str, n: f64) -> Block {
        Block::new(id, "math_number").with_field("NUM", FieldValue::Number(n))
    }

    #[test]
    fn test_lifecycle() {
        let mut gen = generator();
        assert_eq!(gen.state(), GenerationState::Idle);

        gen.begin_generation().unwrap();
        assert_eq!(gen.state(), GenerationState::Generating);
        assert!(matches!(gen.begin_generation(), Err(Error::AlreadyGenerating)));

        let out = gen.finish_generation("x\n").unwrap();
        assert_eq!(out, "\n\n\nx\n");
        assert_eq!(gen.state(), GenerationState::Idle);
        assert!(gen.context().is_empty());
    }

    #[test]
    fn test_emission_requires_pass() {
        let mut gen = generator();
        let block = Block::new("b", "text_print");
        assert!(matches!(gen.emit_statement(&block, "DO"), Err(Error::NotGenerating)));
        assert!(matches!(gen.get_name("x", NameKind::Developer), Err(Error::NotGenerating)));
        assert!(matches!(gen.finish_generation(""), Err(Error::NotGenerating)));
    }

    #[test]
    fn test_register_rule_rejected_while_generating() {
        fn nothing(_: &Block, _: &mut Generator) -> Result<Code> {
            Ok(Code::statement(""))
        }
        let mut gen = generator();
        gen.begin_generation().unwrap();
        assert!(matches!(gen.register_rule("custom", nothing), Err(Error::AlreadyGenerating)));
        gen.abort_generation();
        gen.register_rule("custom", nothing).unwrap();
        assert!(matches!(gen.register_rule("custom", nothing), Err(Error::DuplicateRule(_))));
    }

    #[test]
    fn test_definitions_joined_by_blank_line() {
        let mut gen = generator();
        gen.begin_generation().unwrap();
        gen.set_definition("variables", "x <- NA\ny <- NA").unwrap();
        gen.append_definition("extra", "z <- 0").unwrap();
        let out = gen.finish_generation("body\n").unwrap();
        assert_eq!(out, "x <- NA\ny <- NA\n\nz <- 0\n\n\nbody\n");
    }

    #[test]
    fn test_provide_function_once() {
        let mut gen = generator();
        gen.begin_generation().unwrap();
        let first = gen
            .provide_function("math_isPrime", &["{{function_name}} <- function(n) {", "}"])
            .unwrap();
        let second = gen.provide_function("math_isPrime", &["ignored"]).unwrap();
        assert_eq!(first, "math_isPrime");
        assert_eq!(first, second);
        assert_eq!(
            gen.context().definition("math_isPrime"),
            Some("math_isPrime <- function(n) {\n}")
        );
    }

    #[test]
    fn test_adjusted_index_literal_and_dynamic() {
        let mut gen = generator();
        gen.begin_generation().unwrap();

        let literal = Block::new("b", "lists_getIndex").with_value("AT", Some(number("n", 3.0)));
        assert_eq!(gen.adjusted_index(&literal, "AT", 0, false).unwrap(), "2");
        assert_eq!(gen.adjusted_index(&literal, "AT", 1, false).unwrap(), "3");
        assert_eq!(gen.adjusted_index(&literal, "AT", 0, true).unwrap(), "-2");

        let empty = Block::new("b", "lists_getIndex");
        assert_eq!(gen.adjusted_index(&empty, "AT", 0, false).unwrap(), "0");

        let dynamic = Block::new("b", "lists_getIndex").with_value(
            "AT",
            Some(Block::new("v", "variables_get").with_text("VAR", "i")),
        );
        assert_eq!(gen.adjusted_index(&dynamic, "AT", 0, false).unwrap(), "as.numeric(i - 1)");
        assert_eq!(gen.adjusted_index(&dynamic, "AT", 1, false).unwrap(), "as.numeric(i)");
        assert_eq!(gen.adjusted_index(&dynamic, "AT", 3, true).unwrap(), "-as.numeric(i + 2)");
    }

    #[test]
    fn test_adjusted_index_zero_based() {
        let config = GeneratorConfig {
            one_based_index: false,
            ..GeneratorConfig::default()
        };
        let mut gen = Generator::r(config).unwrap();
        gen.begin_generation().unwrap();
        let literal = Block::new("b", "lists_getIndex").with_value("AT", Some(number("n", 3.0)));
        assert_eq!(gen.adjusted_index(&literal, "AT", 1, false).unwrap(), "4");
    }

    #[test]
    fn test_adjusted_index_out_of_range_literal_stays_in_code() {
        let mut gen = generator();
        gen.begin_generation().unwrap();
        let huge = Block::new("b", "lists_getIndex").with_value("AT", Some(number("n", -1e20)));
        assert_eq!(
            gen.adjusted_index(&huge, "AT", 0, false).unwrap(),
            "as.numeric(-100000000000000000000 - 1)"
        );
        assert_eq!(
            gen.adjusted_index(&huge, "AT", 1, false).unwrap(),
            "as.numeric(-100000000000000000000)"
        );
        assert_eq!(
            gen.adjusted_index(&huge, "AT", 2, true).unwrap(),
            "-as.numeric(-100000000000000000000 + 1)"
        );
        assert_eq!(fold_index("9223372036854775807", 0, false), None);
        assert_eq!(fold_index("12", 3, true), Some(-15));
    }

    #[test]
    fn test_code_kind_mismatch_is_error() {
        let mut gen = generator();
        gen.begin_generation().unwrap();
        let block = Block::new("b", "controls_whileUntil")
            .with_statement("DO", Some(number("n", 1.0)));
        assert!(matches!(
            gen.emit_statement(&block, "DO"),
            Err(Error::UnexpectedCode { expected: "statement", .. })
        ));

        let flow = Block::new("c", "controls_flow_statements").with_text("FLOW", "BREAK");
        let print = Block::new("p", "text_print").with_value("TEXT", Some(flow));
        assert!(matches!(
            gen.emit_value(&print, "TEXT", Order::NONE),
            Err(Error::UnexpectedCode { expected: "value", .. })
        ));
    }

    #[test]
    fn test_clean_whitespace() {
        assert_eq!(clean_whitespace("\n\n\nx <- 1  \ny\n\n\n"), "x <- 1\ny\n");
        assert_eq!(clean_whitespace("\n\n\n"), "");
    }
}
