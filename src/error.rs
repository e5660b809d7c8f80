//! Error handling for the day-trade tax engine
//!
//! The computation stages never fail: missing numbers are coalesced to zero.
//! Errors only come from the edges (month strings, config files, trade files),
//! so the enum stays small and the outer layers use anyhow for context chaining.

use thiserror::Error;

/// Error types raised at the boundaries of the engine
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TaxError {
    #[error("invalid month '{0}': expected YYYY-MM")]
    InvalidMonth(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("import error: {0}")]
    Import(String),
}

/// Result type alias for config loading, imports and the CLI
pub type Result<T> = anyhow::Result<T>;
