//! List blocks
//!
//! Lists are R `list()` values indexed with `[[ ]]`. Positions arrive in the
//! editor's convention and go through [`Generator::adjusted_index`].

use super::{dropdown, Code, RuleSet};
use crate::block::Block;
use crate::error::Result;
use crate::generator::Generator;
use crate::precedence::Order;

pub(super) fn register(rules: &mut RuleSet) -> Result<()> {
    rules.register("lists_create_empty", lists_create_empty)?;
    rules.register("lists_create_with", lists_create_with)?;
    rules.register("lists_repeat", lists_repeat)?;
    rules.register("lists_length", lists_length)?;
    rules.register("lists_isEmpty", lists_is_empty)?;
    rules.register("lists_indexOf", lists_index_of)?;
    rules.register("lists_getIndex", lists_get_index)?;
    rules.register("lists_setIndex", lists_set_index)?;
    rules.register("lists_getSublist", lists_get_sublist)?;
    rules.register("lists_split", lists_split)?;
    rules.register("lists_reverse", lists_reverse)?;
    Ok(())
}

const INDEX_OF: &[&str] = &[
    "{{function_name}} <- function(values, item, last = FALSE) {",
    "  hits <- which(vapply(values, identical, logical(1), item))",
    "  if (length(hits) == 0) {",
    "    return(0)",
    "  }",
    "  if (last) max(hits) else min(hits)",
    "}",
];

const GET_REMOVE: &[&str] = &[
    "{{function_name}} <- function(values, at) {",
    "  item <- values[[at]]",
    "  eval.parent(substitute(target <- target[-index], list(target = substitute(values), index = at)))",
    "  item",
    "}",
];

const SUBLIST: &[&str] = &[
    "{{function_name}} <- function(values, start, end) {",
    "  if (start > end) {",
    "    return(list())",
    "  }",
    "  values[start:end]",
    "}",
];

const WHERE: &[&str] = &["FIRST", "LAST", "FROM_START", "FROM_END", "RANDOM"];

fn lists_create_empty(_block: &Block, _gen: &mut Generator) -> Result<Code> {
    Ok(Code::value("list()", Order::ATOMIC))
}

fn lists_create_with(block: &Block, gen: &mut Generator) -> Result<Code> {
    let elements = (0..block.item_count("ADD"))
        .map(|i| gen.emit_value_or(block, &format!("ADD{}", i), Order::NONE, "NULL"))
        .collect::<Result<Vec<_>>>()?;
    Ok(Code::value(
        format!("list({})", elements.join(", ")),
        Order::FUNCTION_CALL,
    ))
}

fn lists_repeat(block: &Block, gen: &mut Generator) -> Result<Code> {
    let item = gen.emit_value_or(block, "ITEM", Order::NONE, "NULL")?;
    let times = gen.emit_value_or(block, "NUM", Order::NONE, "0")?;
    Ok(Code::value(
        format!("rep(list({}), {})", item, times),
        Order::FUNCTION_CALL,
    ))
}

fn lists_length(block: &Block, gen: &mut Generator) -> Result<Code> {
    let list = gen.emit_value_or(block, "VALUE", Order::NONE, "list()")?;
    Ok(Code::value(format!("length({})", list), Order::FUNCTION_CALL))
}

fn lists_is_empty(block: &Block, gen: &mut Generator) -> Result<Code> {
    let list = gen.emit_value_or(block, "VALUE", Order::NONE, "list()")?;
    Ok(Code::value(format!("length({}) == 0", list), Order::RELATIONAL))
}

fn lists_index_of(block: &Block, gen: &mut Generator) -> Result<Code> {
    let last = dropdown(block, "END", &["FIRST", "LAST"])? == "LAST";
    let list = gen.emit_value_or(block, "VALUE", Order::NONE, "list()")?;
    let item = gen.emit_value_or(block, "FIND", Order::NONE, "NULL")?;
    let function = gen.provide_function("lists_indexOf", INDEX_OF)?;
    let call = if last {
        format!("{}({}, {}, last = TRUE)", function, list, item)
    } else {
        format!("{}({}, {})", function, list, item)
    };
    if gen.config().one_based_index {
        Ok(Code::value(call, Order::FUNCTION_CALL))
    } else {
        Ok(Code::value(format!("{} - 1", call), Order::SUBTRACTION))
    }
}

/// 1-based R position for a WHERE choice on `list`
fn position(block: &Block, gen: &mut Generator, place: &str, list: &str) -> Result<String> {
    Ok(match place {
        "FIRST" => "1".to_string(),
        "LAST" => format!("length({})", list),
        "FROM_START" => gen.adjusted_index(block, "AT", 1, false)?,
        "FROM_END" => {
            let k = gen.adjusted_index(block, "AT", 1, false)?;
            format!("length({}) - {} + 1", list, k)
        }
        _ => format!("sample(length({}), 1)", list),
    })
}

/// Get, get-and-remove, or remove an item
fn lists_get_index(block: &Block, gen: &mut Generator) -> Result<Code> {
    let mode = dropdown(block, "MODE", &["GET", "GET_REMOVE", "REMOVE"])?;
    let place = dropdown(block, "WHERE", WHERE)?;
    let list = gen.emit_value_or(block, "VALUE", Order::MEMBER, "list()")?;

    match mode {
        "GET" if place == "RANDOM" => Ok(Code::value(
            format!("sample({}, 1)[[1]]", list),
            Order::MEMBER,
        )),
        "GET" => {
            let at = position(block, gen, place, &list)?;
            Ok(Code::value(format!("{}[[{}]]", list, at), Order::MEMBER))
        }
        "GET_REMOVE" => {
            let at = position(block, gen, place, &list)?;
            let function = gen.provide_function("lists_getRemove", GET_REMOVE)?;
            Ok(Code::value(
                format!("{}({}, {})", function, list, at),
                Order::FUNCTION_CALL,
            ))
        }
        _ => {
            let at = position(block, gen, place, &list)?;
            Ok(Code::statement(format!("{} <- {}[-{}]\n", list, list, group(&at))))
        }
    }
}

/// Set an item, or insert before it
fn lists_set_index(block: &Block, gen: &mut Generator) -> Result<Code> {
    let mode = dropdown(block, "MODE", &["SET", "INSERT"])?;
    let place = dropdown(block, "WHERE", WHERE)?;
    let list = gen.emit_value_or(block, "LIST", Order::MEMBER, "list()")?;
    let value = gen.emit_value_or(block, "TO", Order::NONE, "NULL")?;

    if mode == "SET" {
        let at = position(block, gen, place, &list)?;
        return Ok(Code::statement(format!("{}[[{}]] <- {}\n", list, at, value)));
    }

    let after = match place {
        "FIRST" => "0".to_string(),
        "LAST" => format!("length({})", list),
        "FROM_START" => gen.adjusted_index(block, "AT", 0, false)?,
        "FROM_END" => {
            let k = gen.adjusted_index(block, "AT", 1, false)?;
            format!("length({}) - {}", list, k)
        }
        _ => format!("sample(length({}), 1) - 1", list),
    };
    Ok(Code::statement(format!(
        "{l} <- append({l}, list({v}), after = {a})\n",
        l = list,
        v = value,
        a = after
    )))
}

fn lists_get_sublist(block: &Block, gen: &mut Generator) -> Result<Code> {
    let where1 = dropdown(block, "WHERE1", &["FROM_START", "FROM_END", "FIRST"])?;
    let where2 = dropdown(block, "WHERE2", &["FROM_START", "FROM_END", "LAST"])?;
    let list = gen.emit_value_or(block, "LIST", Order::NONE, "list()")?;

    if where1 == "FIRST" && where2 == "LAST" {
        return Ok(Code::value(list, Order::NONE));
    }

    let start = match where1 {
        "FIRST" => "1".to_string(),
        "FROM_START" => gen.adjusted_index(block, "AT1", 1, false)?,
        _ => {
            let k = gen.adjusted_index(block, "AT1", 1, false)?;
            format!("length({}) - {} + 1", list, k)
        }
    };
    let end = match where2 {
        "LAST" => format!("length({})", list),
        "FROM_START" => gen.adjusted_index(block, "AT2", 1, false)?,
        _ => {
            let k = gen.adjusted_index(block, "AT2", 1, false)?;
            format!("length({}) - {} + 1", list, k)
        }
    };
    let function = gen.provide_function("lists_sublist", SUBLIST)?;
    Ok(Code::value(
        format!("{}({}, {}, {})", function, list, start, end),
        Order::FUNCTION_CALL,
    ))
}

/// Split text into a list, or join a list into text
fn lists_split(block: &Block, gen: &mut Generator) -> Result<Code> {
    let mode = dropdown(block, "MODE", &["SPLIT", "JOIN"])?;
    let delimiter = gen.emit_value_or(block, "DELIM", Order::NONE, "''")?;
    let code = if mode == "SPLIT" {
        let input = gen.emit_value_or(block, "INPUT", Order::NONE, "''")?;
        format!("as.list(strsplit({}, {}, fixed = TRUE)[[1]])", input, delimiter)
    } else {
        let input = gen.emit_value_or(block, "INPUT", Order::NONE, "list()")?;
        format!("paste(unlist({}), collapse = {})", input, delimiter)
    };
    Ok(Code::value(code, Order::FUNCTION_CALL))
}

fn lists_reverse(block: &Block, gen: &mut Generator) -> Result<Code> {
    let list = gen.emit_value_or(block, "LIST", Order::NONE, "list()")?;
    Ok(Code::value(format!("rev({})", list), Order::FUNCTION_CALL))
}

/// Parenthesize a position that is more than a single token
fn group(code: &str) -> String {
    if crate::util::is_word(code) {
        code.to_string()
    } else {
        format!("({})", code)
    }
}
