//! Diagnostic logging for the `blockgen` binary
//!
//! Output format is picked by `BLOCKGEN_LOG_FORMAT`:
//!
//! - `text` (default): flat `tracing-subscriber` lines
//! - `json`: one JSON object per event
//!
//! ```bash
//! BLOCKGEN_LOG=debug blockgen render program.yaml
//! BLOCKGEN_LOG=blockgen::generator=trace BLOCKGEN_LOG_FORMAT=json blockgen render program.yaml
//! ```
//!
//! Nothing is installed unless `BLOCKGEN_LOG` or `RUST_LOG` is set.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter, Registry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    fn from_env() -> Self {
        Self::parse(&std::env::var("BLOCKGEN_LOG_FORMAT").unwrap_or_default())
    }
}

/// `BLOCKGEN_LOG` wins over `RUST_LOG`
fn build_filter() -> EnvFilter {
    match std::env::var("BLOCKGEN_LOG") {
        Ok(value) => EnvFilter::builder().parse_lossy(value),
        Err(_) => EnvFilter::from_default_env(),
    }
}

/// Install the global subscriber, writing to stderr
///
/// Generated code goes to stdout, so logs never mix with it.
pub fn init_tracing() {
    if std::env::var("BLOCKGEN_LOG").is_err() && std::env::var("RUST_LOG").is_err() {
        return;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Json => {
            let layer = fmt::layer().json().with_writer(std::io::stderr);
            Registry::default().with(filter).with(layer).init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}
