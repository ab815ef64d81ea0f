// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # blockgen - block programs to R source
//!
//! Translates the block tree produced by a visual editor into R code.
//!
//! ## Core Concept
//!
//! Every block type has an **emission rule**. A rule turns one block into
//! code and asks the engine for the code of its children. The engine takes
//! care of the parts that are easy to get subtly wrong:
//!
//! - **Precedence**: child expressions are parenthesized only when needed
//! - **Names**: identifiers are legal, never reserved words, never collide
//! - **Sequencing**: statements are emitted in order with their comments
//! - **Definitions**: variables and helper functions are declared up front
//! - **Loop guards**: generated loops stop after a configurable iteration count
//!
//! ## Quick Start
//!
//! ```rust
//! use blockgen::{Generator, GeneratorConfig, Program};
//!
//! let program = Program::from_yaml(r#"
//! blocks:
//!   - id: b1
//!     type: text_print
//!     values:
//!       TEXT: { id: b2, type: text, fields: { TEXT: hello } }
//! "#)?;
//!
//! let mut generator = Generator::r(GeneratorConfig::default())?;
//! let code = generator.generate(&program)?;
//! assert_eq!(code, "print('hello')\n");
//! # Ok::<(), blockgen::Error>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                                                             │
//! │  PROGRAM (YAML / JSON)                                      │
//! │       │                                                     │
//! │       └──► Generator::generate                              │
//! │               │                                             │
//! │               ├──► begin_generation   (reset context)       │
//! │               ├──► declare_variables  (NameRegistry)        │
//! │               ├──► emit_chain ──► RuleSet ──► EmissionRule  │
//! │               │        ▲                        │           │
//! │               │        └── emit_value / emit_statement      │
//! │               │             (PrecedenceTable)               │
//! │               └──► finish_generation  (definitions + body)  │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod block;
pub mod config;
pub mod error;
pub mod generator;
pub mod language;
pub mod names;
pub mod precedence;
pub mod rules;
pub mod tracing_config;
pub mod util;

// Re-exports
pub use block::{Block, FieldValue, Program, VariableModel};
pub use config::{GeneratorConfig, LoopGuardConfig};
pub use error::{Error, Result};
pub use generator::{
    clean_whitespace, GenerationContext, GenerationState, Generator, FUNCTION_NAME_PLACEHOLDER,
};
pub use language::Language;
pub use names::{NameKind, NameRegistry, ReservedWords};
pub use precedence::{Expr, Order, PrecedenceTable};
pub use rules::{Code, EmissionRule, RuleSet};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
