//! Statement chain walker
//!
//! Walks a `next`-linked run of statements, putting each block's comments
//! in front of its code. The walk is iterative, so long chains do not grow
//! the stack; nesting depth is bounded by the input tree.

use super::Generator;
use crate::block::Block;
use crate::error::{Error, Result};
use crate::rules::Code;
use crate::util::{prefix_lines, wrap};

impl Generator {
    /// Code for `head` and, unless `this_only`, every statement after it
    ///
    /// Value blocks found in the chain are emitted as naked values on their
    /// own line. Disabled blocks are skipped and the walk continues.
    pub fn emit_chain(&mut self, head: &Block, this_only: bool) -> Result<String> {
        self.walk_chain(head, this_only, true)
    }

    pub(super) fn walk_chain(
        &mut self,
        head: &Block,
        this_only: bool,
        allow_naked_values: bool,
    ) -> Result<String> {
        let mut out = String::new();
        let mut current = Some(head);
        while let Some(block) = current {
            current = if this_only { None } else { block.next_block() };

            let code = match self.emit_block(block)? {
                None => continue,
                Some(Code::Statement(code)) => code,
                Some(Code::Value(expr)) if allow_naked_values => expr.code + "\n",
                Some(Code::Value(_)) => {
                    return Err(Error::UnexpectedCode {
                        block_type: block.kind.clone(),
                        expected: "statement",
                    })
                }
            };
            out.push_str(&self.comment_prefix(block));
            out.push_str(&code);
        }
        Ok(out)
    }

    /// Comment lines for a statement: its own comment, wrapped, then the
    /// comments of everything plugged into its value sockets
    fn comment_prefix(&self, block: &Block) -> String {
        let marker = self.language.line_comment;
        let mut out = String::new();

        if let Some(comment) = block.comment.as_deref().filter(|c| !c.is_empty()) {
            let width = self.config.comment_wrap.saturating_sub(3);
            out.push_str(&prefix_lines(&format!("{}\n", wrap(comment, width)), marker));
        }

        for child in block.values.values().flatten() {
            let mut nested = Vec::new();
            collect_value_comments(child, &mut nested);
            if !nested.is_empty() {
                out.push_str(&prefix_lines(&format!("{}\n", nested.join("\n")), marker));
            }
        }
        out
    }
}

/// Comments of `block` and its value-socket descendants, depth first
///
/// Statement sockets are not entered: those chains print their own comments
/// when the walker reaches them.
fn collect_value_comments<'a>(block: &'a Block, out: &mut Vec<&'a str>) {
    if let Some(comment) = block.comment.as_deref().filter(|c| !c.is_empty()) {
        out.push(comment);
    }
    for child in block.values.values().flatten() {
        collect_value_comments(child, out);
    }
}

#[cfg(test)]
mod tests {
    use crate::block::{Block, FieldValue};
    use crate::config::GeneratorConfig;
    use crate::generator::Generator;
    use pretty_assertions::assert_eq;

    fn text(id: &str, value: &str) -> Block {
        Block::new(id, "text").with_text("TEXT", value)
    }

    fn print(id: &str, value: &str) -> Block {
        Block::new(id, "text_print").with_value("TEXT", Some(text(&format!("{}_t", id), value)))
    }

    fn walk(head: &Block, this_only: bool) -> String {
        let mut gen = Generator::r(GeneratorConfig::default()).unwrap();
        gen.begin_generation().unwrap();
        let code = gen.emit_chain(head, this_only).unwrap();
        gen.abort_generation();
        code
    }

    #[test]
    fn test_chain_in_order() {
        let chain = print("a", "one").with_next(print("b", "two").with_next(print("c", "three")));
        assert_eq!(walk(&chain, false), "print('one')\nprint('two')\nprint('three')\n");
        assert_eq!(walk(&chain, true), "print('one')\n");
    }

    #[test]
    fn test_disabled_block_skipped() {
        let mut middle = print("b", "two");
        middle.disabled = true;
        let chain = print("a", "one").with_next(middle.with_next(print("c", "three")));
        assert_eq!(walk(&chain, false), "print('one')\nprint('three')\n");
    }

    #[test]
    fn test_comments_prefixed() {
        let value = text("t", "hi").with_comment("inner note");
        let block = Block::new("p", "text_print")
            .with_value("TEXT", Some(value))
            .with_comment("say hi");
        assert_eq!(walk(&block, false), "# say hi\n# inner note\nprint('hi')\n");
    }

    #[test]
    fn test_long_comment_wrapped() {
        let comment = "word ".repeat(20);
        let block = print("p", "x").with_comment(comment.trim());
        let code = walk(&block, false);
        let comment_lines: Vec<_> = code.lines().filter(|l| l.starts_with("# ")).collect();
        assert!(comment_lines.len() > 1);
        for line in comment_lines {
            assert!(line.len() <= 60, "too long: {:?}", line);
        }
    }

    #[test]
    fn test_nested_statement_comments_not_hoisted() {
        let inner = print("i", "inside").with_comment("inner statement");
        let loop_block = Block::new("w", "controls_whileUntil")
            .with_text("MODE", "WHILE")
            .with_value(
                "BOOL",
                Some(Block::new("c", "logic_boolean").with_field("BOOL", FieldValue::Bool(true))),
            )
            .with_statement("DO", Some(inner))
            .with_comment("outer");
        let code = walk(&loop_block, false);
        assert!(code.starts_with("# outer\nwhile (TRUE) {\n"));
        assert!(code.contains("  # inner statement\n  print('inside')\n"));
    }

    #[test]
    fn test_naked_value_gets_newline() {
        let value = Block::new("n", "math_number").with_field("NUM", FieldValue::Number(7.0));
        assert_eq!(walk(&value, false), "7\n");
    }
}
