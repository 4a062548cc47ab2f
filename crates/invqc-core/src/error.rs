//! Error types for the invqc-core library.
//!
//! Data-quality findings are not errors: they are reported as
//! [`ErrorToken`](crate::models::report::ErrorToken)s in validation
//! results. The variants here cover only the input boundary, where a
//! batch fails to decode before it ever reaches the engine.

use thiserror::Error;

/// Main error type for the invqc library.
#[derive(Error, Debug)]
pub enum InvqcError {
    /// Input could not be decoded as a list of invoice records.
    #[error("invalid batch input: {0}")]
    Decode(#[from] serde_json::Error),

    /// I/O error while reading batch input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the invqc library.
pub type Result<T> = std::result::Result<T, InvqcError>;
