//! Single-invoice rule families.
//!
//! Each check inspects the canonical record independently and returns
//! zero or more tokens; nothing short-circuits, so one invoice can
//! collect findings from every family at once.

use crate::models::invoice::InvoiceRecord;
use crate::models::report::ErrorToken;

use super::dates::parse_date;
use super::ValidatorConfig;

/// Absent or zero-length. Whitespace-only strings count as present.
fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(str::is_empty)
}

/// Required-field presence.
pub(super) fn check_missing_fields(record: &InvoiceRecord) -> Vec<ErrorToken> {
    let mut errors = Vec::new();

    if is_blank(&record.invoice_number) {
        errors.push(ErrorToken::missing_field("invoice_number"));
    }
    if is_blank(&record.invoice_date) {
        errors.push(ErrorToken::missing_field("invoice_date"));
    }
    if is_blank(&record.seller_name) {
        errors.push(ErrorToken::missing_field("seller_name"));
    }
    if is_blank(&record.buyer_name) {
        errors.push(ErrorToken::missing_field("buyer_name"));
    }

    errors
}

/// Date-format validity. Absence is the missing-field rule's concern.
pub(super) fn check_date_format(record: &InvoiceRecord) -> Vec<ErrorToken> {
    let mut errors = Vec::new();

    if let Some(invoice_date) = record.invoice_date.as_deref() {
        if !invoice_date.is_empty() && parse_date(invoice_date).is_none() {
            errors.push(ErrorToken::invalid_format("invoice_date"));
        }
    }

    errors
}

/// Currency-code membership in the accepted set.
pub(super) fn check_currency(record: &InvoiceRecord, config: &ValidatorConfig) -> Vec<ErrorToken> {
    let mut errors = Vec::new();

    if let Some(currency) = record.currency.as_deref() {
        if !currency.is_empty() && !config.currencies.contains(&currency.to_uppercase()) {
            errors.push(ErrorToken::invalid_value("currency"));
        }
    }

    errors
}

/// Cross-field business rules: totals arithmetic, line-item sums, date
/// ordering. A rule with an absent operand is skipped, not failed.
pub(super) fn check_business_rules(
    record: &InvoiceRecord,
    config: &ValidatorConfig,
) -> Vec<ErrorToken> {
    let mut errors = Vec::new();

    if let (Some(net), Some(tax), Some(gross)) =
        (record.net_total, record.tax_amount, record.gross_total)
    {
        if !within_tolerance(gross, net + tax, config.tolerance) {
            errors.push(ErrorToken::business_rule("totals_mismatch"));
        }
    }

    if let Some(net) = record.net_total {
        if !record.line_items.is_empty() {
            let line_sum: f64 = record.line_items.iter().filter_map(|i| i.line_total).sum();
            if line_sum > 0.0 && !within_tolerance(net, line_sum, config.tolerance) {
                errors.push(ErrorToken::business_rule("linesum_mismatch"));
            }
        }
    }

    if let (Some(invoice_date), Some(due_date)) =
        (record.invoice_date.as_deref(), record.due_date.as_deref())
    {
        if let (Some(invoiced), Some(due)) = (parse_date(invoice_date), parse_date(due_date)) {
            if due < invoiced {
                errors.push(ErrorToken::business_rule("due_before_invoice"));
            }
        }
    }

    errors
}

/// Sanity bounds.
pub(super) fn check_sanity(record: &InvoiceRecord) -> Vec<ErrorToken> {
    let mut errors = Vec::new();

    if let Some(gross) = record.gross_total {
        if gross < 0.0 {
            errors.push(ErrorToken::sanity("negative_gross"));
        }
    }

    errors
}

/// Relative tolerance: `|a - b| <= max(|a|, |b|) * tolerance`.
///
/// When both values are exactly zero only exact equality passes.
pub(super) fn within_tolerance(a: f64, b: f64, tolerance: f64) -> bool {
    let diff = (a - b).abs();
    let max_val = a.abs().max(b.abs());

    if max_val == 0.0 {
        return diff == 0.0;
    }

    diff <= max_val * tolerance
}
