//! Render, check and rules commands

use super::util::{load_config, parse_output_arg, positional, read_program, write_output};
use blockgen::*;
use std::path::Path;

pub fn cmd_render(args: &[String]) -> Result<()> {
    let Some(path) = positional(args) else {
        return Err(
            "Usage: blockgen render <program.yaml|json> [--config file] [--output file] [--zero-based]"
                .into(),
        );
    };

    let program = read_program(path)?;
    let config = load_config(args, path)?;
    let source = Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    let mut generator = Generator::r(config)?.with_source_name(source);
    let code = generator.generate(&program)?;
    write_output(&parse_output_arg(args), &code)
}

pub fn cmd_check(args: &[String]) -> Result<()> {
    let Some(path) = positional(args) else {
        return Err("Usage: blockgen check <program.yaml|json> [--config file]".into());
    };

    let program = read_program(path)?;
    let config = load_config(args, path)?;
    let mut generator = Generator::r(config)?;

    let missing: Vec<String> = program
        .block_types()
        .into_iter()
        .filter(|kind| !generator.rules().contains(kind))
        .collect();
    if !missing.is_empty() {
        println!("✗ No rule for block types:");
        for kind in &missing {
            println!("  - {}", kind);
        }
        return Err(format!("{} unsupported block type(s)", missing.len()).into());
    }

    let code = generator.generate(&program)?;
    println!(
        "✓ {} translates ({} top-level block(s), {} line(s) of R)",
        path,
        program.blocks.len(),
        code.lines().count()
    );
    Ok(())
}

pub fn cmd_rules() -> Result<()> {
    let rules = RuleSet::r()?;
    for tag in rules.tags() {
        println!("{}", tag);
    }
    Ok(())
}
