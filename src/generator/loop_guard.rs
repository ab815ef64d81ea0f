//! Loop-termination guard
//!
//! Loop rules hand their body to [`Generator::guard_loop_body`], which
//! prepends a counter check so that a runaway loop in the generated program
//! stops with an error instead of hanging. One counter per loop block id.

use super::{Generator, LOOP_GUARDS_BUCKET};
use crate::error::Result;
use crate::names::NameKind;
use crate::util::prefix_lines;

impl Generator {
    /// Body of loop `loop_id` with the iteration check in front
    ///
    /// Returns `body` untouched when guards are disabled.
    pub fn guard_loop_body(&mut self, body: &str, loop_id: &str) -> Result<String> {
        self.ensure_generating()?;
        if !self.config.loop_guard.enabled {
            return Ok(body.to_string());
        }

        let counter = self
            .ctx
            .names
            .get_name(&format!("loop_guard_{}", loop_id), NameKind::Developer);
        self.ctx
            .append_definition(LOOP_GUARDS_BUCKET, &format!("{} <- 0", counter));

        let max = self.config.loop_guard.max_iterations;
        let quoted_id = self.language.quote(loop_id);
        let fragment = match &self.config.loop_guard.template {
            Some(template) => {
                let mut text = template
                    .replace("%1", &quoted_id)
                    .replace("%2", &counter)
                    .replace("%3", &max.to_string());
                if !text.ends_with('\n') {
                    text.push('\n');
                }
                text
            }
            None => format!(
                "{c} <- {c} + 1\nif ({c} > {max}) stop(paste0('Loop iteration limit exceeded in block ', {id}))\n",
                c = counter,
                max = max,
                id = quoted_id
            ),
        };

        Ok(format!("{}{}", prefix_lines(&fragment, &self.config.indent), body))
    }
}
