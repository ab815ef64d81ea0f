//! Math blocks
//!
//! Trigonometry works in degrees, like the editor.

use super::{dropdown, Code, RuleSet};
use crate::block::Block;
use crate::error::{Error, Result};
use crate::generator::Generator;
use crate::precedence::Order;
use crate::util::format_number;

pub(super) fn register(rules: &mut RuleSet) -> Result<()> {
    rules.register("math_number", math_number)?;
    rules.register("math_arithmetic", math_arithmetic)?;
    rules.register("math_single", math_single)?;
    rules.alias("math_round", "math_single")?;
    rules.alias("math_trig", "math_single")?;
    rules.register("math_constant", math_constant)?;
    rules.register("math_number_property", math_number_property)?;
    rules.register("math_change", math_change)?;
    rules.register("math_on_list", math_on_list)?;
    rules.register("math_modulo", math_modulo)?;
    rules.register("math_constrain", math_constrain)?;
    rules.register("math_random_int", math_random_int)?;
    rules.register("math_random_float", math_random_float)?;
    rules.register("math_atan2", math_atan2)?;
    Ok(())
}

const IS_PRIME: &[&str] = &[
    "{{function_name}} <- function(n) {",
    "  # https://en.wikipedia.org/wiki/Primality_test#Naive_methods",
    "  if (n == 2 || n == 3) {",
    "    return(TRUE)",
    "  }",
    "  # FALSE if n is NA, not above 1, not whole, or divisible by 2 or 3",
    "  if (is.na(n) || n <= 1 || n %% 1 != 0 || n %% 2 == 0 || n %% 3 == 0) {",
    "    return(FALSE)",
    "  }",
    "  # Check all the numbers of form 6k +/- 1, up to sqrt(n)",
    "  x <- 6",
    "  while (x - 1 <= sqrt(n)) {",
    "    if (n %% (x - 1) == 0 || n %% (x + 1) == 0) {",
    "      return(FALSE)",
    "    }",
    "    x <- x + 6",
    "  }",
    "  TRUE",
    "}",
];

const MODES: &[&str] = &[
    "{{function_name}} <- function(values) {",
    "  values <- unlist(values)",
    "  counts <- table(values)",
    "  modes <- names(counts)[counts == max(counts)]",
    "  if (is.numeric(values)) as.numeric(modes) else modes",
    "}",
];

const RANDOM_INT: &[&str] = &[
    "{{function_name}} <- function(a, b) {",
    "  if (a > b) {",
    "    # Swap a and b to ensure a is smaller",
    "    c <- a",
    "    a <- b",
    "    b <- c",
    "  }",
    "  floor(runif(1, a, b + 1))",
    "}",
];

fn math_number(block: &Block, _gen: &mut Generator) -> Result<Code> {
    let field = block
        .field("NUM")
        .ok_or_else(|| Error::MissingField {
            block_type: block.kind.clone(),
            field: "NUM".into(),
        })?;
    let n = field
        .as_number()
        .ok_or_else(|| Error::unknown_enum(&block.kind, "NUM", field.as_text()))?;
    let order = if n >= 0.0 { Order::ATOMIC } else { Order::UNARY_SIGN };
    Ok(Code::value(format_number(n), order))
}

fn math_arithmetic(block: &Block, gen: &mut Generator) -> Result<Code> {
    let (operator, order) =
        match dropdown(block, "OP", &["ADD", "MINUS", "MULTIPLY", "DIVIDE", "POWER"])? {
            "ADD" => (" + ", Order::ADDITION),
            "MINUS" => (" - ", Order::SUBTRACTION),
            "MULTIPLY" => (" * ", Order::MULTIPLICATION),
            "DIVIDE" => (" / ", Order::DIVISION),
            _ => (" ** ", Order::EXPONENTIATION),
        };
    let a = gen.emit_value_or(block, "A", order, "0")?;
    let b = gen.emit_value_or(block, "B", order, "0")?;
    Ok(Code::value(format!("{}{}{}", a, operator, b), order))
}

/// Single-operand functions, rounding and trigonometry
fn math_single(block: &Block, gen: &mut Generator) -> Result<Code> {
    const OPERATORS: &[&str] = &[
        "NEG", "ABS", "ROOT", "LN", "LOG10", "EXP", "POW10", "ROUND", "ROUNDUP", "ROUNDDOWN",
        "SIN", "COS", "TAN", "ASIN", "ACOS", "ATAN",
    ];
    let operator = dropdown(block, "OP", OPERATORS)?;

    match operator {
        "NEG" => {
            let arg = gen.emit_value_or(block, "NUM", Order::UNARY_SIGN, "0")?;
            return Ok(Code::value(format!("-{}", arg), Order::UNARY_SIGN));
        }
        "POW10" => {
            let arg = gen.emit_value_or(block, "NUM", Order::EXPONENTIATION, "0")?;
            return Ok(Code::value(format!("10 ** {}", arg), Order::EXPONENTIATION));
        }
        "SIN" | "COS" | "TAN" => {
            let arg = gen.emit_value_or(block, "NUM", Order::DIVISION, "0")?;
            let function = operator.to_lowercase();
            return Ok(Code::value(
                format!("{}({} / 180 * pi)", function, arg),
                Order::FUNCTION_CALL,
            ));
        }
        "ASIN" | "ACOS" | "ATAN" => {
            let arg = gen.emit_value_or(block, "NUM", Order::NONE, "0")?;
            let function = operator.to_lowercase();
            return Ok(Code::value(
                format!("{}({}) / pi * 180", function, arg),
                Order::MULTIPLICATION,
            ));
        }
        _ => {}
    }

    let function = match operator {
        "ABS" => "abs",
        "ROOT" => "sqrt",
        "LN" => "log",
        "LOG10" => "log10",
        "EXP" => "exp",
        "ROUND" => "round",
        "ROUNDUP" => "ceiling",
        _ => "floor",
    };
    let arg = gen.emit_value_or(block, "NUM", Order::NONE, "0")?;
    Ok(Code::value(format!("{}({})", function, arg), Order::FUNCTION_CALL))
}

fn math_constant(block: &Block, _gen: &mut Generator) -> Result<Code> {
    let constant = dropdown(
        block,
        "CONSTANT",
        &["PI", "E", "GOLDEN_RATIO", "SQRT2", "SQRT1_2", "INFINITY"],
    )?;
    Ok(match constant {
        "PI" => Code::value("pi", Order::ATOMIC),
        "E" => Code::value("exp(1)", Order::FUNCTION_CALL),
        "GOLDEN_RATIO" => Code::value("(1 + sqrt(5)) / 2", Order::DIVISION),
        "SQRT2" => Code::value("sqrt(2)", Order::FUNCTION_CALL),
        "SQRT1_2" => Code::value("sqrt(1 / 2)", Order::FUNCTION_CALL),
        _ => Code::value("Inf", Order::ATOMIC),
    })
}

/// Even, odd, prime, whole, positive, negative, divisible by
fn math_number_property(block: &Block, gen: &mut Generator) -> Result<Code> {
    let property = dropdown(
        block,
        "PROPERTY",
        &["EVEN", "ODD", "PRIME", "WHOLE", "POSITIVE", "NEGATIVE", "DIVISIBLE_BY"],
    )?;

    if property == "PRIME" {
        let number = gen.emit_value_or(block, "NUMBER_TO_CHECK", Order::NONE, "0")?;
        let function = gen.provide_function("math_isPrime", IS_PRIME)?;
        return Ok(Code::value(format!("{}({})", function, number), Order::FUNCTION_CALL));
    }

    let code = match property {
        "POSITIVE" | "NEGATIVE" => {
            let number =
                gen.emit_value_or(block, "NUMBER_TO_CHECK", Order::RELATIONAL, "0")?;
            let operator = if property == "POSITIVE" { ">" } else { "<" };
            format!("{} {} 0", number, operator)
        }
        _ => {
            let number = gen.emit_value_or(block, "NUMBER_TO_CHECK", Order::MODULUS, "0")?;
            match property {
                "EVEN" => format!("{} %% 2 == 0", number),
                "ODD" => format!("{} %% 2 == 1", number),
                "WHOLE" => format!("{} %% 1 == 0", number),
                _ => {
                    let divisor = gen.emit_value_or(block, "DIVISOR", Order::MODULUS, "0")?;
                    format!("{} %% {} == 0", number, divisor)
                }
            }
        }
    };
    Ok(Code::value(code, Order::RELATIONAL))
}

/// Add to a variable in place, treating a non-number as 0
fn math_change(block: &Block, gen: &mut Generator) -> Result<Code> {
    let delta = gen.emit_value_or(block, "DELTA", Order::ADDITION, "0")?;
    let variable = gen.variable_name(block, "VAR")?;
    Ok(Code::statement(format!(
        "{v} <- (if (is.numeric({v})) {v} else 0) + {d}\n",
        v = variable,
        d = delta
    )))
}

/// Aggregates over a list
fn math_on_list(block: &Block, gen: &mut Generator) -> Result<Code> {
    let operator = dropdown(
        block,
        "OP",
        &["SUM", "MIN", "MAX", "AVERAGE", "MEDIAN", "MODE", "STD_DEV", "RANDOM"],
    )?;
    let list = gen.emit_value_or(block, "LIST", Order::NONE, "list()")?;

    let code = match operator {
        "SUM" => format!("sum(unlist({}))", list),
        "MIN" => format!("min(unlist({}))", list),
        "MAX" => format!("max(unlist({}))", list),
        "AVERAGE" => format!("mean(unlist({}))", list),
        "MEDIAN" => format!("median(unlist({}))", list),
        "STD_DEV" => format!("sd(unlist({}))", list),
        "MODE" => {
            let function = gen.provide_function("math_modes", MODES)?;
            format!("{}({})", function, list)
        }
        _ => return Ok(Code::value(format!("sample({}, 1)[[1]]", list), Order::MEMBER)),
    };
    Ok(Code::value(code, Order::FUNCTION_CALL))
}

fn math_modulo(block: &Block, gen: &mut Generator) -> Result<Code> {
    let dividend = gen.emit_value_or(block, "DIVIDEND", Order::MODULUS, "0")?;
    let divisor = gen.emit_value_or(block, "DIVISOR", Order::MODULUS, "0")?;
    Ok(Code::value(
        format!("{} %% {}", dividend, divisor),
        Order::MODULUS,
    ))
}

fn math_constrain(block: &Block, gen: &mut Generator) -> Result<Code> {
    let value = gen.emit_value_or(block, "VALUE", Order::NONE, "0")?;
    let low = gen.emit_value_or(block, "LOW", Order::NONE, "0")?;
    let high = gen.emit_value_or(block, "HIGH", Order::NONE, "Inf")?;
    Ok(Code::value(
        format!("min(max({}, {}), {})", value, low, high),
        Order::FUNCTION_CALL,
    ))
}

fn math_random_int(block: &Block, gen: &mut Generator) -> Result<Code> {
    let from = gen.emit_value_or(block, "FROM", Order::NONE, "0")?;
    let to = gen.emit_value_or(block, "TO", Order::NONE, "0")?;
    let function = gen.provide_function("math_random_int", RANDOM_INT)?;
    Ok(Code::value(
        format!("{}({}, {})", function, from, to),
        Order::FUNCTION_CALL,
    ))
}

fn math_random_float(_block: &Block, _gen: &mut Generator) -> Result<Code> {
    Ok(Code::value("runif(1)", Order::FUNCTION_CALL))
}

/// Angle of point (X, Y) in degrees, -180 to 180
fn math_atan2(block: &Block, gen: &mut Generator) -> Result<Code> {
    let x = gen.emit_value_or(block, "X", Order::NONE, "0")?;
    let y = gen.emit_value_or(block, "Y", Order::NONE, "0")?;
    Ok(Code::value(
        format!("atan2({}, {}) / pi * 180", y, x),
        Order::MULTIPLICATION,
    ))
}
