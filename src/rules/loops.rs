//! Loop blocks
//!
//! Every loop body passes through [`Generator::guard_loop_body`] before it
//! is wrapped in the loop construct.

use super::{dropdown, Code, RuleSet};
use crate::block::Block;
use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::names::NameKind;
use crate::precedence::Order;
use crate::util::{format_number, is_number, is_word};

pub(super) fn register(rules: &mut RuleSet) -> Result<()> {
    rules.register("controls_repeat_ext", controls_repeat)?;
    rules.alias("controls_repeat", "controls_repeat_ext")?;
    rules.register("controls_whileUntil", controls_while_until)?;
    rules.register("controls_for", controls_for)?;
    rules.register("controls_forEach", controls_for_each)?;
    rules.register("controls_flow_statements", controls_flow_statements)?;
    Ok(())
}

/// Repeat n times: `for (count in 0:n)`
fn controls_repeat(block: &Block, gen: &mut Generator) -> Result<Code> {
    let repeats = match block.field("TIMES") {
        Some(field) => {
            let n = field
                .as_number()
                .ok_or_else(|| Error::unknown_enum(&block.kind, "TIMES", field.as_text()))?;
            format_number(n)
        }
        None => gen.emit_value_or(block, "TIMES", Order::NONE, "0")?,
    };

    let branch = gen.emit_statement(block, "DO")?;
    let branch = gen.guard_loop_body(&branch, &block.id)?;

    let mut code = String::new();
    let loop_var = gen.get_distinct_name("count", NameKind::Variable)?;
    let end = if is_word(&repeats) || is_number(&repeats) {
        repeats
    } else {
        let end_var = gen.get_distinct_name("repeat_end", NameKind::Variable)?;
        code.push_str(&format!("{} <- {}\n", end_var, repeats));
        end_var
    };
    code.push_str(&format!("for ({} in 0:{}){{\n{}}}\n", loop_var, end, branch));
    Ok(Code::statement(code))
}

/// `while (cond)`, or `while (!cond)` for UNTIL
fn controls_while_until(block: &Block, gen: &mut Generator) -> Result<Code> {
    let until = dropdown(block, "MODE", &["WHILE", "UNTIL"])? == "UNTIL";
    let order = if until { Order::LOGICAL_NOT } else { Order::NONE };
    let condition = gen.emit_value_or(block, "BOOL", order, "FALSE")?;
    let branch = gen.emit_statement(block, "DO")?;
    let branch = gen.guard_loop_body(&branch, &block.id)?;
    let condition = if until { format!("!{}", condition) } else { condition };
    Ok(Code::statement(format!("while ({}) {{\n{}}}\n", condition, branch)))
}

/// Count from FROM to TO by BY, stepping down when FROM > TO
fn controls_for(block: &Block, gen: &mut Generator) -> Result<Code> {
    let variable = gen.variable_name(block, "VAR")?;
    let from = gen.emit_value_or(block, "FROM", Order::NONE, "0")?;
    let to = gen.emit_value_or(block, "TO", Order::NONE, "0")?;
    let step = gen.emit_value_or(block, "BY", Order::NONE, "1")?;
    let branch = gen.emit_statement(block, "DO")?;
    let branch = gen.guard_loop_body(&branch, &block.id)?;

    let by = match (literal(&from), literal(&to), literal(&step)) {
        (Some(f), Some(t), Some(s)) => {
            let s = s.abs();
            format_number(if f <= t { s } else { -s })
        }
        _ => format!("if ({} <= {}) abs({}) else -abs({})", from, to, step, step),
    };
    Ok(Code::statement(format!(
        "for ({} in seq({}, {}, by = {})) {{\n{}}}\n",
        variable, from, to, by, branch
    )))
}

fn literal(code: &str) -> Option<f64> {
    if is_number(code) {
        code.trim().parse().ok()
    } else {
        None
    }
}

/// `for (x in list)`
fn controls_for_each(block: &Block, gen: &mut Generator) -> Result<Code> {
    let variable = gen.variable_name(block, "VAR")?;
    let list = gen.emit_value_or(block, "LIST", Order::NONE, "list()")?;
    let branch = gen.emit_statement(block, "DO")?;
    let branch = gen.guard_loop_body(&branch, &block.id)?;
    Ok(Code::statement(format!(
        "for ({} in {}) {{\n{}}}\n",
        variable, list, branch
    )))
}

fn controls_flow_statements(block: &Block, _gen: &mut Generator) -> Result<Code> {
    match dropdown(block, "FLOW", &["BREAK", "CONTINUE"])? {
        "BREAK" => Ok(Code::statement("break\n")),
        _ => Ok(Code::statement("next\n")),
    }
}
