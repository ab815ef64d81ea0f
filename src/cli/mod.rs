//! CLI command implementations
//!
//! - `render`: render, check and rules commands
//! - `config`: schema command
//! - `util`: shared argument and output helpers

pub mod config;
pub mod render;
pub mod util;

pub use config::cmd_schema;
pub use render::{cmd_check, cmd_render, cmd_rules};
