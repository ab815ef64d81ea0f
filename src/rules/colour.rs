//! Colour blocks
//!
//! Colours are `#rrggbb` strings. Mixing goes through `col2rgb` and back
//! through `rgb(..., maxColorValue = 255)`.

use super::{Code, RuleSet};
use crate::block::Block;
use crate::error::Result;
use crate::generator::Generator;
use crate::precedence::Order;

pub(super) fn register(rules: &mut RuleSet) -> Result<()> {
    rules.register("colour_picker", colour_picker)?;
    rules.register("colour_random", colour_random)?;
    rules.register("colour_rgb", colour_rgb)?;
    rules.register("colour_blend", colour_blend)?;
    Ok(())
}

const RANDOM: &[&str] = &[
    "{{function_name}} <- function() {",
    "  values <- sample(0:255, 3, replace = TRUE)",
    "  tolower(rgb(values[1], values[2], values[3], maxColorValue = 255))",
    "}",
];

const RGB: &[&str] = &[
    "{{function_name}} <- function(r, g, b) {",
    "  channels <- round(pmin(100, pmax(0, c(r, g, b))) * 2.55)",
    "  tolower(rgb(channels[1], channels[2], channels[3], maxColorValue = 255))",
    "}",
];

const BLEND: &[&str] = &[
    "{{function_name}} <- function(c1, c2, ratio) {",
    "  ratio <- min(1, max(0, ratio))",
    "  mixed <- round(col2rgb(c1) * (1 - ratio) + col2rgb(c2) * ratio)",
    "  tolower(rgb(mixed[1], mixed[2], mixed[3], maxColorValue = 255))",
    "}",
];

fn colour_picker(block: &Block, gen: &mut Generator) -> Result<Code> {
    let colour = block.field_text("COLOUR").unwrap_or_else(|| "#000000".to_string());
    Ok(Code::value(gen.quote_string_literal(&colour), Order::ATOMIC))
}

fn colour_random(_block: &Block, gen: &mut Generator) -> Result<Code> {
    let function = gen.provide_function("colour_random", RANDOM)?;
    Ok(Code::value(format!("{}()", function), Order::FUNCTION_CALL))
}

/// Channels are percentages, clamped to 0..100
fn colour_rgb(block: &Block, gen: &mut Generator) -> Result<Code> {
    let red = gen.emit_value_or(block, "RED", Order::NONE, "0")?;
    let green = gen.emit_value_or(block, "GREEN", Order::NONE, "0")?;
    let blue = gen.emit_value_or(block, "BLUE", Order::NONE, "0")?;
    let function = gen.provide_function("colour_rgb", RGB)?;
    Ok(Code::value(
        format!("{}({}, {}, {})", function, red, green, blue),
        Order::FUNCTION_CALL,
    ))
}

fn colour_blend(block: &Block, gen: &mut Generator) -> Result<Code> {
    let first = gen.emit_value_or(block, "COLOUR1", Order::NONE, "'#000000'")?;
    let second = gen.emit_value_or(block, "COLOUR2", Order::NONE, "'#000000'")?;
    let ratio = gen.emit_value_or(block, "RATIO", Order::NONE, "0.5")?;
    let function = gen.provide_function("colour_blend", BLEND)?;
    Ok(Code::value(
        format!("{}({}, {}, {})", function, first, second, ratio),
        Order::FUNCTION_CALL,
    ))
}
