//! Generator configuration
//!
//! Handles loading of `.blockgen.yaml` files. Every field has a default, so
//! an empty file (or no file at all) gives the standard R output.

use crate::error::{Error, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name looked up by [`GeneratorConfig::load_from_dir`]
pub const CONFIG_FILE: &str = ".blockgen.yaml";

/// Settings for one generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "blockgen Config")]
pub struct GeneratorConfig {
    /// Indices in the program are 1-based (the editor convention)
    #[serde(default = "default_true")]
    pub one_based_index: bool,

    /// Indentation for nested statement chains
    #[serde(default = "default_indent")]
    pub indent: String,

    /// Column at which attached comments are wrapped
    #[serde(default = "default_comment_wrap")]
    pub comment_wrap: usize,

    /// Initial value given to declared variables
    #[serde(default = "default_variable_initializer")]
    pub variable_initializer: String,

    /// Runaway-loop protection in generated code
    #[serde(default)]
    pub loop_guard: LoopGuardConfig,

    /// Prepend a provenance header to generated code
    #[serde(default)]
    pub provenance: bool,
}

/// Loop-termination guard settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LoopGuardConfig {
    /// Inject guards into loop bodies
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Iterations allowed per loop before the generated program stops
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u64,

    /// Custom guard code: %1 quoted block id, %2 counter name, %3 limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_indent() -> String {
    "  ".to_string()
}

fn default_comment_wrap() -> usize {
    60
}

fn default_variable_initializer() -> String {
    "NA".to_string()
}

fn default_max_iterations() -> u64 {
    10_000
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            one_based_index: true,
            indent: default_indent(),
            comment_wrap: default_comment_wrap(),
            variable_initializer: default_variable_initializer(),
            loop_guard: LoopGuardConfig::default(),
            provenance: false,
        }
    }
}

impl Default for LoopGuardConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_iterations: default_max_iterations(),
            template: None,
        }
    }
}

impl GeneratorConfig {
    /// Parse configuration from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: GeneratorConfig = serde_norway::from_str(yaml)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(Error::Io)?;
        Self::from_yaml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load `.blockgen.yaml` from a directory
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_file = dir.join(CONFIG_FILE);
        if !config_file.exists() {
            return Ok(None);
        }
        Self::load_from_file(&config_file).map(Some)
    }

    fn validate(&self) -> Result<()> {
        if self.comment_wrap <= 3 {
            return Err(Error::Config(format!(
                "comment_wrap must be greater than 3, got {}",
                self.comment_wrap
            )));
        }
        if self.loop_guard.enabled && self.loop_guard.max_iterations == 0 {
            return Err(Error::Config(
                "loop_guard.max_iterations must be at least 1".to_string(),
            ));
        }
        if self.indent.chars().any(|c| c != ' ' && c != '\t') {
            return Err(Error::Config(
                "indent may only contain spaces and tabs".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config = GeneratorConfig::from_yaml("{}").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert!(config.one_based_index);
        assert_eq!(config.loop_guard.max_iterations, 10_000);
    }

    #[test]
    fn test_partial_override() {
        let config = GeneratorConfig::from_yaml(
            r#"
one_based_index: false
loop_guard:
  max_iterations: 50
"#,
        )
        .unwrap();
        assert!(!config.one_based_index);
        assert!(config.loop_guard.enabled); // default kept
        assert_eq!(config.loop_guard.max_iterations, 50);
        assert_eq!(config.indent, "  ");
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            GeneratorConfig::from_yaml("comment_wrap: 2"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_yaml("indent: '--'"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            GeneratorConfig::from_yaml("loop_guard: { max_iterations: 0 }"),
            Err(Error::Config(_))
        ));
    }
}
