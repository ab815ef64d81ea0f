//! Variable get and set

use super::{Code, RuleSet};
use crate::block::Block;
use crate::error::Result;
use crate::generator::Generator;
use crate::precedence::Order;

pub(super) fn register(rules: &mut RuleSet) -> Result<()> {
    rules.register("variables_get", variables_get)?;
    rules.register("variables_set", variables_set)?;
    Ok(())
}

fn variables_get(block: &Block, gen: &mut Generator) -> Result<Code> {
    let name = gen.variable_name(block, "VAR")?;
    Ok(Code::value(name, Order::ATOMIC))
}

fn variables_set(block: &Block, gen: &mut Generator) -> Result<Code> {
    let value = gen.emit_value_or(block, "VALUE", Order::NONE, "0")?;
    let name = gen.variable_name(block, "VAR")?;
    Ok(Code::statement(format!("{} <- {}\n", name, value)))
}

#[cfg(test)]
mod tests {
    use crate::block::{Block, FieldValue};
    use crate::config::GeneratorConfig;
    use crate::error::Error;
    use crate::generator::Generator;
    use pretty_assertions::assert_eq;

    fn set(id: &str, variable: &str) -> Block {
        Block::new(id, "variables_set").with_field(
            "VAR",
            FieldValue::Variable {
                variable: variable.into(),
            },
        )
    }

    #[test]
    fn test_set_uses_resolved_name() {
        let mut gen = Generator::r(GeneratorConfig::default()).unwrap();
        gen.begin_generation().unwrap();
        let block = set("s", "v1").with_value(
            "VALUE",
            Some(Block::new("t", "text").with_text("TEXT", "hi")),
        );
        assert_eq!(gen.emit_chain(&block, true).unwrap(), "v1 <- 'hi'\n");
        assert_eq!(gen.emit_chain(&set("s2", "v1"), true).unwrap(), "v1 <- 0\n");
    }

    #[test]
    fn test_missing_variable_field() {
        let mut gen = Generator::r(GeneratorConfig::default()).unwrap();
        gen.begin_generation().unwrap();
        let block = Block::new("s", "variables_set");
        assert!(matches!(
            gen.emit_chain(&block, true),
            Err(Error::MissingField { .. })
        ));
    }
}
