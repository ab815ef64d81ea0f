//! Text blocks

use super::{dropdown, Code, RuleSet};
use crate::block::Block;
use crate::error::Result;
use crate::generator::Generator;
use crate::precedence::Order;
use regex::Regex;
use std::sync::OnceLock;

pub(super) fn register(rules: &mut RuleSet) -> Result<()> {
    rules.register("text", text)?;
    rules.register("text_join", text_join)?;
    rules.register("text_append", text_append)?;
    rules.register("text_length", text_length)?;
    rules.register("text_isEmpty", text_is_empty)?;
    rules.register("text_indexOf", text_index_of)?;
    rules.register("text_charAt", text_char_at)?;
    rules.register("text_getSubstring", text_get_substring)?;
    rules.register("text_changeCase", text_change_case)?;
    rules.register("text_trim", text_trim)?;
    rules.register("text_print", text_print)?;
    rules.register("text_prompt_ext", text_prompt)?;
    rules.alias("text_prompt", "text_prompt_ext")?;
    rules.register("text_count", text_count)?;
    rules.register("text_replace", text_replace)?;
    rules.register("text_reverse", text_reverse)?;
    Ok(())
}

const INDEX_OF: &[&str] = &[
    "{{function_name}} <- function(text, find, last = FALSE) {",
    "  hits <- gregexpr(find, text, fixed = TRUE)[[1]]",
    "  if (hits[1] == -1) {",
    "    return(0)",
    "  }",
    "  if (last) hits[length(hits)] else hits[1]",
    "}",
];

const CHAR_FROM_END: &[&str] = &[
    "{{function_name}} <- function(text, k) {",
    "  at <- nchar(text) - k + 1",
    "  substr(text, at, at)",
    "}",
];

const RANDOM_LETTER: &[&str] = &[
    "{{function_name}} <- function(text) {",
    "  k <- sample(nchar(text), 1)",
    "  substr(text, k, k)",
    "}",
];

const TITLE_CASE: &[&str] = &[
    "{{function_name}} <- function(text) {",
    "  words <- strsplit(text, ' ', fixed = TRUE)[[1]]",
    "  words <- paste0(toupper(substr(words, 1, 1)), tolower(substring(words, 2)))",
    "  paste(words, collapse = ' ')",
    "}",
];

const COUNT: &[&str] = &[
    "{{function_name}} <- function(haystack, needle) {",
    "  if (nchar(needle) == 0) {",
    "    return(nchar(haystack) + 1)",
    "  }",
    "  hits <- gregexpr(needle, haystack, fixed = TRUE)[[1]]",
    "  sum(hits > 0)",
    "}",
];

/// Already a string literal, so no conversion is needed
fn is_string_literal(code: &str) -> bool {
    static LITERAL: OnceLock<Regex> = OnceLock::new();
    LITERAL
        .get_or_init(|| {
            Regex::new(r#"^\s*('([^'\\]|\\.)*'|"([^"\\]|\\.)*")\s*$"#).expect("valid literal regex")
        })
        .is_match(code)
}

fn force_string(code: String) -> String {
    if is_string_literal(&code) {
        code
    } else {
        format!("as.character({})", code)
    }
}

fn text(block: &Block, gen: &mut Generator) -> Result<Code> {
    let value = block.field_text("TEXT").unwrap_or_default();
    Ok(Code::value(gen.quote_string_literal(&value), Order::ATOMIC))
}

/// Join any number of items into one string
fn text_join(block: &Block, gen: &mut Generator) -> Result<Code> {
    match block.item_count("ADD") {
        0 => Ok(Code::value("''", Order::ATOMIC)),
        1 => {
            let element = gen.emit_value_or(block, "ADD0", Order::NONE, "''")?;
            Ok(Code::value(force_string(element), Order::FUNCTION_CALL))
        }
        count => {
            let elements = (0..count)
                .map(|i| gen.emit_value_or(block, &format!("ADD{}", i), Order::NONE, "''"))
                .collect::<Result<Vec<_>>>()?;
            Ok(Code::value(
                format!("paste0({})", elements.join(", ")),
                Order::FUNCTION_CALL,
            ))
        }
    }
}

fn text_append(block: &Block, gen: &mut Generator) -> Result<Code> {
    let variable = gen.variable_name(block, "VAR")?;
    let value = gen.emit_value_or(block, "TEXT", Order::NONE, "''")?;
    Ok(Code::statement(format!(
        "{} <- paste0({}, {})\n",
        variable,
        variable,
        force_string(value)
    )))
}

fn text_length(block: &Block, gen: &mut Generator) -> Result<Code> {
    let text = gen.emit_value_or(block, "VALUE", Order::NONE, "''")?;
    Ok(Code::value(format!("nchar({})", text), Order::FUNCTION_CALL))
}

fn text_is_empty(block: &Block, gen: &mut Generator) -> Result<Code> {
    let text = gen.emit_value_or(block, "VALUE", Order::NONE, "''")?;
    Ok(Code::value(format!("nchar({}) == 0", text), Order::RELATIONAL))
}

/// Position of the first or last occurrence; 0 (or -1 zero-based) if absent
fn text_index_of(block: &Block, gen: &mut Generator) -> Result<Code> {
    let last = dropdown(block, "END", &["FIRST", "LAST"])? == "LAST";
    let text = gen.emit_value_or(block, "VALUE", Order::NONE, "''")?;
    let find = gen.emit_value_or(block, "FIND", Order::NONE, "''")?;
    let function = gen.provide_function("text_indexOf", INDEX_OF)?;
    let call = if last {
        format!("{}({}, {}, last = TRUE)", function, text, find)
    } else {
        format!("{}({}, {})", function, text, find)
    };
    if gen.config().one_based_index {
        Ok(Code::value(call, Order::FUNCTION_CALL))
    } else {
        Ok(Code::value(format!("{} - 1", call), Order::SUBTRACTION))
    }
}

fn text_char_at(block: &Block, gen: &mut Generator) -> Result<Code> {
    let position = dropdown(
        block,
        "WHERE",
        &["FIRST", "LAST", "FROM_START", "FROM_END", "RANDOM"],
    )?;
    let text = gen.emit_value_or(block, "VALUE", Order::NONE, "''")?;

    let code = match position {
        "FIRST" => format!("substr({}, 1, 1)", text),
        "LAST" => format!("substr({t}, nchar({t}), nchar({t}))", t = text),
        "FROM_START" => {
            let at = gen.adjusted_index(block, "AT", 1, false)?;
            format!("substr({}, {}, {})", text, at, at)
        }
        "FROM_END" => {
            let at = gen.adjusted_index(block, "AT", 1, false)?;
            let function = gen.provide_function("text_charFromEnd", CHAR_FROM_END)?;
            format!("{}({}, {})", function, text, at)
        }
        _ => {
            let function = gen.provide_function("text_randomLetter", RANDOM_LETTER)?;
            format!("{}({})", function, text)
        }
    };
    Ok(Code::value(code, Order::FUNCTION_CALL))
}

/// Substring between two positions, each counted from start or end
fn text_get_substring(block: &Block, gen: &mut Generator) -> Result<Code> {
    let where1 = dropdown(block, "WHERE1", &["FROM_START", "FROM_END", "FIRST"])?;
    let where2 = dropdown(block, "WHERE2", &["FROM_START", "FROM_END", "LAST"])?;
    let text = gen.emit_value_or(block, "STRING", Order::NONE, "''")?;

    if where1 == "FIRST" && where2 == "LAST" {
        return Ok(Code::value(text, Order::NONE));
    }

    let start = match where1 {
        "FIRST" => "1".to_string(),
        "FROM_START" => gen.adjusted_index(block, "AT1", 1, false)?,
        _ => {
            let k = gen.adjusted_index(block, "AT1", 1, false)?;
            format!("nchar({}) - {} + 1", text, k)
        }
    };
    let end = match where2 {
        "LAST" => format!("nchar({})", text),
        "FROM_START" => gen.adjusted_index(block, "AT2", 1, false)?,
        _ => {
            let k = gen.adjusted_index(block, "AT2", 1, false)?;
            format!("nchar({}) - {} + 1", text, k)
        }
    };
    Ok(Code::value(
        format!("substr({}, {}, {})", text, start, end),
        Order::FUNCTION_CALL,
    ))
}

fn text_change_case(block: &Block, gen: &mut Generator) -> Result<Code> {
    let case = dropdown(block, "CASE", &["UPPERCASE", "LOWERCASE", "TITLECASE"])?;
    let text = gen.emit_value_or(block, "TEXT", Order::NONE, "''")?;
    let function = match case {
        "UPPERCASE" => "toupper".to_string(),
        "LOWERCASE" => "tolower".to_string(),
        _ => gen.provide_function("text_toTitleCase", TITLE_CASE)?,
    };
    Ok(Code::value(format!("{}({})", function, text), Order::FUNCTION_CALL))
}

fn text_trim(block: &Block, gen: &mut Generator) -> Result<Code> {
    let mode = dropdown(block, "MODE", &["BOTH", "LEFT", "RIGHT"])?;
    let text = gen.emit_value_or(block, "TEXT", Order::NONE, "''")?;
    let code = match mode {
        "BOTH" => format!("trimws({})", text),
        "LEFT" => format!("trimws({}, which = 'left')", text),
        _ => format!("trimws({}, which = 'right')", text),
    };
    Ok(Code::value(code, Order::FUNCTION_CALL))
}

fn text_print(block: &Block, gen: &mut Generator) -> Result<Code> {
    let message = gen.emit_value_or(block, "TEXT", Order::NONE, "''")?;
    Ok(Code::statement(format!("print({})\n", message)))
}

/// Prompt for text or a number; the message is a field or a value socket
fn text_prompt(block: &Block, gen: &mut Generator) -> Result<Code> {
    let message = match block.field_text("TEXT") {
        Some(text) => gen.quote_string_literal(&text),
        None => gen.emit_value_or(block, "TEXT", Order::NONE, "''")?,
    };
    let code = match dropdown(block, "TYPE", &["TEXT", "NUMBER"])? {
        "NUMBER" => format!("as.numeric(readline({}))", message),
        _ => format!("readline({})", message),
    };
    Ok(Code::value(code, Order::FUNCTION_CALL))
}

fn text_count(block: &Block, gen: &mut Generator) -> Result<Code> {
    let text = gen.emit_value_or(block, "TEXT", Order::NONE, "''")?;
    let sub = gen.emit_value_or(block, "SUB", Order::NONE, "''")?;
    let function = gen.provide_function("text_count", COUNT)?;
    Ok(Code::value(
        format!("{}({}, {})", function, text, sub),
        Order::FUNCTION_CALL,
    ))
}

fn text_replace(block: &Block, gen: &mut Generator) -> Result<Code> {
    let text = gen.emit_value_or(block, "TEXT", Order::NONE, "''")?;
    let from = gen.emit_value_or(block, "FROM", Order::NONE, "''")?;
    let to = gen.emit_value_or(block, "TO", Order::NONE, "''")?;
    Ok(Code::value(
        format!("gsub({}, {}, {}, fixed = TRUE)", from, to, text),
        Order::FUNCTION_CALL,
    ))
}

fn text_reverse(block: &Block, gen: &mut Generator) -> Result<Code> {
    let text = gen.emit_value_or(block, "TEXT", Order::NONE, "''")?;
    Ok(Code::value(
        format!("paste(rev(strsplit({}, '')[[1]]), collapse = '')", text),
        Order::FUNCTION_CALL,
    ))
}

#[cfg(test)]
mod tests {
    use super::is_string_literal;
    use crate::block::{Block, FieldValue};
    use crate::config::GeneratorConfig;
    use crate::generator::Generator;
    use crate::precedence::Order;
    use pretty_assertions::assert_eq;

    fn text(id: &str, value: &str) -> Block {
        Block::new(id, "text").with_text("TEXT", value)
    }

    fn number(id: &str, n: f64) -> Block {
        Block::new(id, "math_number").with_field("NUM", FieldValue::Number(n))
    }

    fn value_with(config: GeneratorConfig, block: Block) -> String {
        let holder = Block::new("holder", "text_print").with_value("X", Some(block));
        let mut gen = Generator::r(config).unwrap();
        gen.begin_generation().unwrap();
        gen.emit_value(&holder, "X", Order::NONE).unwrap().unwrap()
    }

    fn value_of(block: Block) -> String {
        value_with(GeneratorConfig::default(), block)
    }

    #[test]
    fn test_literal_quoting() {
        assert_eq!(value_of(text("t", "hello")), "'hello'");
        assert_eq!(value_of(text("t", "it's")), "\"it's\"");
        assert_eq!(value_of(text("t", "it's \"quoted\"")), r#"'it\'s "quoted"'"#);
    }

    #[test]
    fn test_string_literal_detection() {
        assert!(is_string_literal("'abc'"));
        assert!(is_string_literal(r"'it\'s'"));
        assert!(is_string_literal("\"x\""));
        assert!(!is_string_literal("x"));
        assert!(!is_string_literal("'a' + 'b'"));
    }

    #[test]
    fn test_join() {
        let empty = Block::new("j", "text_join");
        assert_eq!(value_of(empty), "''");

        let single = Block::new("j", "text_join").with_value("ADD0", Some(number("n", 4.0)));
        assert_eq!(value_of(single), "as.character(4)");

        let many = Block::new("j", "text_join")
            .with_value("ADD0", Some(text("a", "x = ")))
            .with_value("ADD1", Some(number("n", 4.0)))
            .with_value("ADD2", None);
        assert_eq!(value_of(many), "paste0('x = ', 4, '')");
    }

    #[test]
    fn test_char_at_from_start() {
        let block = Block::new("c", "text_charAt")
            .with_text("WHERE", "FROM_START")
            .with_value("VALUE", Some(text("t", "abc")))
            .with_value("AT", Some(number("n", 2.0)));
        assert_eq!(value_of(block.clone()), "substr('abc', 2, 2)");

        let zero_based = GeneratorConfig {
            one_based_index: false,
            ..GeneratorConfig::default()
        };
        assert_eq!(value_with(zero_based, block), "substr('abc', 3, 3)");
    }

    #[test]
    fn test_get_substring() {
        let block = Block::new("s", "text_getSubstring")
            .with_text("WHERE1", "FROM_START")
            .with_text("WHERE2", "FROM_END")
            .with_value("STRING", Some(text("t", "abcdef")))
            .with_value("AT1", Some(number("a", 2.0)))
            .with_value("AT2", Some(number("b", 1.0)));
        assert_eq!(
            value_of(block),
            "substr('abcdef', 2, nchar('abcdef') - 1 + 1)"
        );

        let whole = Block::new("s", "text_getSubstring")
            .with_text("WHERE1", "FIRST")
            .with_text("WHERE2", "LAST")
            .with_value("STRING", Some(text("t", "abc")));
        assert_eq!(value_of(whole), "'abc'");
    }

    #[test]
    fn test_index_of() {
        let block = Block::new("i", "text_indexOf")
            .with_text("END", "LAST")
            .with_value("VALUE", Some(text("t", "banana")))
            .with_value("FIND", Some(text("f", "a")));
        assert_eq!(value_of(block), "text_indexOf('banana', 'a', last = TRUE)");
    }

    #[test]
    fn test_change_case_and_trim() {
        let upper = Block::new("c", "text_changeCase")
            .with_text("CASE", "UPPERCASE")
            .with_value("TEXT", Some(text("t", "a")));
        assert_eq!(value_of(upper), "toupper('a')");

        let title = Block::new("c", "text_changeCase")
            .with_text("CASE", "TITLECASE")
            .with_value("TEXT", Some(text("t", "a b")));
        assert_eq!(value_of(title), "text_toTitleCase('a b')");

        let trim = Block::new("t", "text_trim")
            .with_text("MODE", "LEFT")
            .with_value("TEXT", Some(text("t", " a ")));
        assert_eq!(value_of(trim), "trimws(' a ', which = 'left')");
    }

    #[test]
    fn test_prompt_forms() {
        let field = Block::new("p", "text_prompt")
            .with_text("TYPE", "NUMBER")
            .with_text("TEXT", "How many?");
        assert_eq!(value_of(field), "as.numeric(readline('How many?'))");

        let socket = Block::new("p", "text_prompt_ext")
            .with_text("TYPE", "TEXT")
            .with_value("TEXT", Some(text("t", "Name?")));
        assert_eq!(value_of(socket), "readline('Name?')");
    }

    #[test]
    fn test_append_statement() {
        let mut gen = Generator::r(GeneratorConfig::default()).unwrap();
        gen.begin_generation().unwrap();
        let block = Block::new("a", "text_append")
            .with_field("VAR", FieldValue::Variable { variable: "msg".into() })
            .with_value("TEXT", Some(text("t", "!")));
        assert_eq!(gen.emit_chain(&block, false).unwrap(), "msg <- paste0(msg, '!')\n");
    }
}
