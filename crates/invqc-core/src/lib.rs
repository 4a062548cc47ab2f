//! Core library for invoice batch data-quality validation.
//!
//! This crate provides:
//! - Key normalization reconciling synonym field spellings into one
//!   canonical record shape
//! - A deterministic rule engine flagging missing fields, malformed
//!   values, and arithmetic inconsistencies as structured error tokens
//! - Batch-wide duplicate detection and aggregate statistics

pub mod error;
pub mod models;
pub mod normalize;
pub mod validate;

pub use error::{InvqcError, Result};
pub use models::invoice::{InvoiceRecord, LineItem};
pub use models::report::{BatchResult, BatchSummary, ErrorToken, ValidationResult};
pub use normalize::{normalize_batch, normalize_invoice, RawInvoice, RawLineItem};
pub use validate::{parse_date, validate_batch, validate_invoice, Validator, ValidatorConfig};
