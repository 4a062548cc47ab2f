//! Deterministic validation and duplicate-detection engine.
//!
//! The engine is a pure function over an in-memory batch: no I/O, no
//! clock, no state between calls. Per-record findings come from five
//! independent rule families; batch validation adds a duplicate scan
//! and aggregate statistics.

mod dates;
mod patterns;
mod rules;

pub use dates::parse_date;

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::debug;

use crate::models::invoice::InvoiceRecord;
use crate::models::report::{BatchResult, BatchSummary, ErrorToken, ValidationResult};

/// Relative tolerance applied when comparing monetary amounts: 0.5%.
pub const DEFAULT_TOLERANCE: f64 = 0.005;

/// Currency codes accepted by the currency rule.
pub const ACCEPTED_CURRENCIES: [&str; 15] = [
    "EUR", "USD", "INR", "GBP", "JPY", "CAD", "AUD", "CHF", "CNY", "SGD", "HKD", "NZD", "MXN",
    "BRL", "ZAR",
];

/// Rule configuration injected into the engine, so tests and embedders
/// can substitute alternate rule sets without ambient globals.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Relative tolerance for monetary comparisons.
    pub tolerance: f64,

    /// Accepted currency codes, upper-cased.
    pub currencies: HashSet<String>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            currencies: ACCEPTED_CURRENCIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// The validation engine.
///
/// Cheap to clone and safe to share: it holds only its configuration,
/// never mutates its input, and allocates only per-call state.
#[derive(Debug, Clone, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    /// Create a validator with the default rule configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with an explicit configuration.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Override the monetary comparison tolerance.
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.config.tolerance = tolerance;
        self
    }

    /// Override the accepted currency set.
    pub fn with_currencies<I, S>(mut self, currencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.currencies = currencies.into_iter().map(Into::into).collect();
        self
    }

    /// Validate a single invoice against every rule family.
    ///
    /// All families run unconditionally; token order within the result
    /// follows the fixed family order.
    pub fn validate_invoice(&self, record: &InvoiceRecord) -> ValidationResult {
        let invoice_id = match record.invoice_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => derive_invoice_id(record),
        };

        let mut errors = Vec::new();
        errors.extend(rules::check_missing_fields(record));
        errors.extend(rules::check_date_format(record));
        errors.extend(rules::check_currency(record, &self.config));
        errors.extend(rules::check_business_rules(record, &self.config));
        errors.extend(rules::check_sanity(record));

        ValidationResult {
            invoice_id,
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// Validate a batch: per-invoice rules plus the duplicate scan,
    /// folded into aggregate statistics.
    ///
    /// `per_invoice` is index-aligned with the input; duplicate members
    /// get `anomaly:duplicate_invoice` appended after their rule tokens
    /// and are forced invalid.
    pub fn validate_batch(&self, records: &[InvoiceRecord]) -> BatchResult {
        debug!(count = records.len(), "validating invoice batch");

        let duplicates = find_duplicate_groups(records);
        let duplicate_members: HashSet<usize> =
            duplicates.values().flatten().copied().collect();

        let mut per_invoice = Vec::with_capacity(records.len());
        for (idx, record) in records.iter().enumerate() {
            let mut result = self.validate_invoice(record);
            if duplicate_members.contains(&idx) {
                result.errors.push(ErrorToken::anomaly("duplicate_invoice"));
                result.is_valid = false;
            }
            per_invoice.push(result);
        }

        let valid_count = per_invoice.iter().filter(|r| r.is_valid).count();

        let mut error_counts: BTreeMap<ErrorToken, usize> = BTreeMap::new();
        for result in &per_invoice {
            for token in &result.errors {
                *error_counts.entry(token.clone()).or_insert(0) += 1;
            }
        }

        let summary = BatchSummary {
            total_invoices: records.len(),
            valid_count,
            invalid_count: records.len() - valid_count,
            error_counts,
            duplicate_groups: duplicates.len(),
        };

        debug!(
            invalid = summary.invalid_count,
            duplicate_groups = summary.duplicate_groups,
            "batch validation complete"
        );

        BatchResult {
            per_invoice,
            summary,
        }
    }
}

/// Validate a single invoice with the default rule configuration.
pub fn validate_invoice(record: &InvoiceRecord) -> ValidationResult {
    Validator::new().validate_invoice(record)
}

/// Validate a batch with the default rule configuration.
pub fn validate_batch(records: &[InvoiceRecord]) -> BatchResult {
    Validator::new().validate_batch(records)
}

/// Fallback identifier: `{seller}_{number}_{date}` with the seller
/// component normalized. Display convenience only, no uniqueness
/// guarantee; duplicate detection does not use it.
fn derive_invoice_id(record: &InvoiceRecord) -> String {
    let seller = component_or_unknown(&record.seller_name);
    let number = component_or_unknown(&record.invoice_number);
    let date = component_or_unknown(&record.invoice_date);

    format!("{}_{}_{}", normalize_id_component(seller), number, date)
}

fn component_or_unknown(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.is_empty() => v,
        _ => "UNKNOWN",
    }
}

/// Uppercase; whitespace runs collapse to one underscore; every other
/// character outside alphanumeric/hyphen/underscore becomes an
/// underscore.
fn normalize_id_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut in_whitespace = false;

    for c in value.chars().flat_map(char::to_uppercase) {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            in_whitespace = false;
            if c.is_alphanumeric() || c == '-' || c == '_' {
                out.push(c);
            } else {
                out.push('_');
            }
        }
    }

    out
}

type DuplicateKey = (String, String, String);

/// Grouping key for duplicate detection. Invoices without an invoice
/// number are never grouped.
fn duplicate_key(record: &InvoiceRecord) -> Option<DuplicateKey> {
    let number = record.invoice_number.as_deref().filter(|n| !n.is_empty())?;
    let tax_id = record.supplier_tax_id.clone().unwrap_or_default();
    let date = record.invoice_date.clone().unwrap_or_default();

    Some((number.to_string(), tax_id, date))
}

/// One linear pass building key -> member indices, keeping only keys
/// shared by two or more invoices.
fn find_duplicate_groups(records: &[InvoiceRecord]) -> HashMap<DuplicateKey, Vec<usize>> {
    let mut groups: HashMap<DuplicateKey, Vec<usize>> = HashMap::new();

    for (idx, record) in records.iter().enumerate() {
        if let Some(key) = duplicate_key(record) {
            groups.entry(key).or_default().push(idx);
        }
    }

    groups.retain(|_, members| members.len() > 1);
    groups
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn complete_record(number: &str) -> InvoiceRecord {
        InvoiceRecord {
            invoice_number: Some(number.to_string()),
            invoice_date: Some("2024-01-15".into()),
            due_date: Some("2024-02-15".into()),
            seller_name: Some("Acme GmbH".into()),
            buyer_name: Some("Widget Corp".into()),
            supplier_tax_id: Some("DE123456789".into()),
            currency: Some("EUR".into()),
            net_total: Some(100.0),
            tax_amount: Some(19.0),
            gross_total: Some(119.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_record_is_valid() {
        let result = validate_invoice(&complete_record("INV-1"));
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert_eq!(result.invoice_id, "ACME_GMBH_INV-1_2024-01-15");
    }

    #[test]
    fn test_validation_is_idempotent() {
        let record = complete_record("INV-1");
        assert_eq!(validate_invoice(&record), validate_invoice(&record));
    }

    #[test]
    fn test_supplied_invoice_id_is_kept() {
        let record = InvoiceRecord {
            invoice_id: Some("external-7".into()),
            ..complete_record("INV-1")
        };
        assert_eq!(validate_invoice(&record).invoice_id, "external-7");
    }

    #[test]
    fn test_derived_id_uses_unknown_for_missing_parts() {
        let result = validate_invoice(&InvoiceRecord::default());
        assert_eq!(result.invoice_id, "UNKNOWN_UNKNOWN_UNKNOWN");
    }

    #[test]
    fn test_id_normalization() {
        assert_eq!(normalize_id_component("Acme & Co.  Ltd"), "ACME___CO__LTD");
        assert_eq!(normalize_id_component("a-b_c"), "A-B_C");
    }

    #[test]
    fn test_empty_record_yields_exactly_missing_field_tokens() {
        let result = validate_invoice(&InvoiceRecord::default());
        assert_eq!(
            result.errors,
            vec![
                ErrorToken::missing_field("invoice_number"),
                ErrorToken::missing_field("invoice_date"),
                ErrorToken::missing_field("seller_name"),
                ErrorToken::missing_field("buyer_name"),
            ]
        );
        assert!(!result.is_valid);
    }

    #[test]
    fn test_totals_tolerance_boundary() {
        let mut record = complete_record("INV-1");
        record.net_total = Some(100.0);
        record.tax_amount = Some(10.0);

        record.gross_total = Some(110.55);
        assert!(validate_invoice(&record).is_valid);

        record.gross_total = Some(110.56);
        let result = validate_invoice(&record);
        assert_eq!(
            result.errors,
            vec![ErrorToken::business_rule("totals_mismatch")]
        );
    }

    #[test]
    fn test_negative_gross_flagged_alongside_other_findings() {
        let mut record = complete_record("INV-1");
        record.net_total = None;
        record.tax_amount = None;
        record.gross_total = Some(-5.0);

        let result = validate_invoice(&record);
        assert_eq!(result.errors, vec![ErrorToken::sanity("negative_gross")]);
    }

    #[test]
    fn test_batch_index_correspondence_and_additivity() {
        let batch = vec![
            complete_record("INV-1"),
            InvoiceRecord::default(),
            complete_record("INV-3"),
        ];

        let result = validate_batch(&batch);
        assert_eq!(result.per_invoice.len(), batch.len());
        assert_eq!(result.per_invoice[0].invoice_id, "ACME_GMBH_INV-1_2024-01-15");
        assert_eq!(result.per_invoice[1].invoice_id, "UNKNOWN_UNKNOWN_UNKNOWN");

        let summary = &result.summary;
        assert_eq!(summary.total_invoices, 3);
        assert_eq!(summary.valid_count + summary.invalid_count, summary.total_invoices);
        assert_eq!(summary.valid_count, 2);
    }

    #[test]
    fn test_duplicate_pair_flags_both_members() {
        let batch = vec![complete_record("INV-1"), complete_record("INV-1")];

        let result = validate_batch(&batch);
        for entry in &result.per_invoice {
            assert!(!entry.is_valid);
            assert_eq!(
                entry.errors,
                vec![ErrorToken::anomaly("duplicate_invoice")]
            );
        }
        assert_eq!(result.summary.duplicate_groups, 1);
        assert_eq!(result.summary.invalid_count, 2);
    }

    #[test]
    fn test_triplicate_counts_one_group_three_occurrences() {
        let batch = vec![
            complete_record("INV-1"),
            complete_record("INV-1"),
            complete_record("INV-1"),
        ];

        let result = validate_batch(&batch);
        assert_eq!(result.summary.duplicate_groups, 1);
        assert_eq!(
            result.summary.error_counts[&ErrorToken::anomaly("duplicate_invoice")],
            3
        );
    }

    #[test]
    fn test_differing_tax_id_splits_the_group() {
        let mut second = complete_record("INV-1");
        second.supplier_tax_id = Some("FR987654321".into());

        let result = validate_batch(&[complete_record("INV-1"), second]);
        assert_eq!(result.summary.duplicate_groups, 0);
        assert_eq!(result.summary.valid_count, 2);
    }

    #[test]
    fn test_no_invoice_number_never_flags_duplicates() {
        let mut record = complete_record("");
        record.invoice_number = None;

        let result = validate_batch(&[record.clone(), record]);
        assert_eq!(result.summary.duplicate_groups, 0);
        for entry in &result.per_invoice {
            assert_eq!(
                entry.errors,
                vec![ErrorToken::missing_field("invoice_number")]
            );
        }
    }

    #[test]
    fn test_duplicate_token_appended_after_rule_tokens() {
        let mut record = complete_record("INV-1");
        record.gross_total = Some(-119.0);

        let result = validate_batch(&[record.clone(), record]);
        assert_eq!(
            result.per_invoice[0].errors,
            vec![
                ErrorToken::business_rule("totals_mismatch"),
                ErrorToken::sanity("negative_gross"),
                ErrorToken::anomaly("duplicate_invoice"),
            ]
        );
    }

    #[test]
    fn test_error_counts_sum_occurrences_not_invoices() {
        let batch = vec![InvoiceRecord::default(), InvoiceRecord::default()];
        let result = validate_batch(&batch);

        assert_eq!(
            result.summary.error_counts[&ErrorToken::missing_field("invoice_number")],
            2
        );
        let total: usize = result.summary.error_counts.values().sum();
        assert_eq!(total, 8);
    }

    #[test]
    fn test_empty_batch_yields_zeroed_summary() {
        let result = validate_batch(&[]);
        assert!(result.per_invoice.is_empty());
        assert_eq!(result.summary, BatchSummary::default());
    }

    #[test]
    fn test_injected_config_replaces_rule_constants() {
        let validator = Validator::new()
            .with_tolerance(0.5)
            .with_currencies(["XTS"]);

        let mut record = complete_record("INV-1");
        record.gross_total = Some(150.0);
        record.currency = Some("XTS".into());
        // Half the gross is within a 50% tolerance, and XTS is accepted.
        assert!(validator.validate_invoice(&record).is_valid);

        record.currency = Some("EUR".into());
        let result = validator.validate_invoice(&record);
        assert_eq!(result.errors, vec![ErrorToken::invalid_value("currency")]);
    }
}
