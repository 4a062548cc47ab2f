//! Validation verdict types returned by the engine.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A single validation finding, shaped as `family:specific`.
///
/// Tokens are plain tagged strings rather than a closed enum so new
/// rule families can be added without breaking consumers that already
/// parse the taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorToken(String);

impl ErrorToken {
    /// Build a token from an arbitrary family and specific part.
    pub fn new(family: &str, specific: &str) -> Self {
        Self(format!("{family}:{specific}"))
    }

    /// A required field is absent or empty.
    pub fn missing_field(field: &str) -> Self {
        Self::new("missing_field", field)
    }

    /// A field is present but malformed.
    pub fn invalid_format(field: &str) -> Self {
        Self::new("invalid_format", field)
    }

    /// A field holds a value outside its accepted set.
    pub fn invalid_value(field: &str) -> Self {
        Self::new("invalid_value", field)
    }

    /// A cross-field business rule is violated.
    pub fn business_rule(rule: &str) -> Self {
        Self::new("business_rule", rule)
    }

    /// A sanity bound is violated.
    pub fn sanity(check: &str) -> Self {
        Self::new("sanity", check)
    }

    /// A batch-level anomaly, e.g. a duplicate submission.
    pub fn anomaly(kind: &str) -> Self {
        Self::new("anomaly", kind)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Family prefix, the part before the first colon.
    pub fn family(&self) -> &str {
        self.0.split(':').next().unwrap_or(&self.0)
    }

    /// The part after the first colon, if any.
    pub fn specific(&self) -> Option<&str> {
        self.0.split_once(':').map(|(_, s)| s)
    }
}

impl fmt::Display for ErrorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validation verdict for a single invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Supplied or derived invoice identifier.
    pub invoice_id: String,

    /// True iff `errors` is empty.
    pub is_valid: bool,

    /// Findings in fixed rule order; the duplicate token, if present,
    /// is always last.
    pub errors: Vec<ErrorToken>,
}

/// Verdicts and aggregate statistics for a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    /// One result per input record, index-aligned with the batch.
    pub per_invoice: Vec<ValidationResult>,

    /// Aggregate counts over the batch.
    pub summary: BatchSummary,
}

/// Aggregate counts for one validated batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_invoices: usize,

    /// Records whose error list came out empty.
    pub valid_count: usize,

    /// Always `total_invoices - valid_count`.
    pub invalid_count: usize,

    /// Occurrences per token across the batch. Ordered map so report
    /// serialization is deterministic.
    pub error_counts: BTreeMap<ErrorToken, usize>,

    /// Distinct duplicate-key groups found, not duplicate records.
    pub duplicate_groups: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_shape() {
        let token = ErrorToken::missing_field("invoice_number");
        assert_eq!(token.as_str(), "missing_field:invoice_number");
        assert_eq!(token.family(), "missing_field");
        assert_eq!(token.specific(), Some("invoice_number"));
    }

    #[test]
    fn test_token_serializes_as_bare_string() {
        let token = ErrorToken::anomaly("duplicate_invoice");
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, r#""anomaly:duplicate_invoice""#);
    }

    #[test]
    fn test_error_counts_serialize_with_token_keys() {
        let mut summary = BatchSummary::default();
        summary
            .error_counts
            .insert(ErrorToken::sanity("negative_gross"), 2);

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["error_counts"]["sanity:negative_gross"], 2);
    }
}
