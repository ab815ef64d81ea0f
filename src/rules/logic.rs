//! Logic blocks: conditionals, comparisons, boolean operators

use super::{dropdown, Code, RuleSet};
use crate::block::Block;
use crate::error::Result;
use crate::generator::Generator;
use crate::precedence::Order;

pub(super) fn register(rules: &mut RuleSet) -> Result<()> {
    rules.register("controls_if", controls_if)?;
    rules.alias("controls_ifelse", "controls_if")?;
    rules.register("logic_compare", logic_compare)?;
    rules.register("logic_operation", logic_operation)?;
    rules.register("logic_negate", logic_negate)?;
    rules.register("logic_boolean", logic_boolean)?;
    rules.register("logic_null", logic_null)?;
    rules.register("logic_ternary", logic_ternary)?;
    Ok(())
}

/// if / else if / else
fn controls_if(block: &Block, gen: &mut Generator) -> Result<Code> {
    let mut code = String::new();
    let mut n = 0;
    loop {
        let condition = gen.emit_value_or(block, &format!("IF{}", n), Order::NONE, "FALSE")?;
        let branch = gen.emit_statement(block, &format!("DO{}", n))?;
        if n > 0 {
            code.push_str(" else ");
        }
        code.push_str(&format!("if ({}) {{\n{}}}", condition, branch));
        n += 1;
        if !block.has_input(&format!("IF{}", n)) {
            break;
        }
    }
    if block.has_input("ELSE") {
        let branch = gen.emit_statement(block, "ELSE")?;
        code.push_str(&format!(" else {{\n{}}}", branch));
    }
    Ok(Code::statement(code + "\n"))
}

fn logic_compare(block: &Block, gen: &mut Generator) -> Result<Code> {
    let operator = match dropdown(block, "OP", &["EQ", "NEQ", "LT", "LTE", "GT", "GTE"])? {
        "EQ" => "==",
        "NEQ" => "!=",
        "LT" => "<",
        "LTE" => "<=",
        "GT" => ">",
        _ => ">=",
    };
    let order = Order::RELATIONAL;
    let a = gen.emit_value_or(block, "A", order, "0")?;
    let b = gen.emit_value_or(block, "B", order, "0")?;
    Ok(Code::value(format!("{} {} {}", a, operator, b), order))
}

/// `&&` / `||`; a lone missing operand takes the operator's identity value
fn logic_operation(block: &Block, gen: &mut Generator) -> Result<Code> {
    let (operator, order, identity) = match dropdown(block, "OP", &["AND", "OR"])? {
        "AND" => ("&&", Order::LOGICAL_AND, "TRUE"),
        _ => ("||", Order::LOGICAL_OR, "FALSE"),
    };
    let a = gen.emit_value(block, "A", order)?;
    let b = gen.emit_value(block, "B", order)?;
    let (a, b) = match (a, b) {
        (None, None) => ("FALSE".to_string(), "FALSE".to_string()),
        (a, b) => (
            a.unwrap_or_else(|| identity.to_string()),
            b.unwrap_or_else(|| identity.to_string()),
        ),
    };
    Ok(Code::value(format!("{} {} {}", a, operator, b), order))
}

fn logic_negate(block: &Block, gen: &mut Generator) -> Result<Code> {
    let argument = gen.emit_value_or(block, "BOOL", Order::LOGICAL_NOT, "TRUE")?;
    Ok(Code::value(format!("!{}", argument), Order::LOGICAL_NOT))
}

fn logic_boolean(block: &Block, _gen: &mut Generator) -> Result<Code> {
    let value = dropdown(block, "BOOL", &["TRUE", "FALSE"])?;
    Ok(Code::value(value, Order::ATOMIC))
}

fn logic_null(_block: &Block, _gen: &mut Generator) -> Result<Code> {
    Ok(Code::value("NA", Order::ATOMIC))
}

/// `if (c) a else b` as an expression
fn logic_ternary(block: &Block, gen: &mut Generator) -> Result<Code> {
    let condition = gen.emit_value_or(block, "IF", Order::NONE, "FALSE")?;
    let then = gen.emit_value_or(block, "THEN", Order::CONDITIONAL, "NA")?;
    let otherwise = gen.emit_value_or(block, "ELSE", Order::CONDITIONAL, "NA")?;
    Ok(Code::value(
        format!("if ({}) {} else {}", condition, then, otherwise),
        Order::CONDITIONAL,
    ))
}
