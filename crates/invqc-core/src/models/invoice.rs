//! Canonical invoice record model shared by the normalizer and the
//! validation engine.

use serde::{Deserialize, Serialize};

/// A single invoice record after key normalization.
///
/// Every field is optional: absence is a legitimate state that the
/// validation rules report as findings, never as failures. Dates are
/// kept as the raw strings supplied upstream and parsed lazily by the
/// date rules, so an unparseable date can be flagged rather than
/// rejected at the boundary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoiceRecord {
    /// Opaque identifier; derived by the engine when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<String>,

    /// Free-text invoice identifier as printed on the document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Issue date, unparsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<String>,

    /// Payment due date, unparsed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    /// Seller legal name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_name: Option<String>,

    /// Buyer legal name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_name: Option<String>,

    /// Seller tax identification number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_tax_id: Option<String>,

    /// Buyer tax identification number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer_tax_id: Option<String>,

    /// Currency code, free text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Total before tax.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_total: Option<f64>,

    /// Tax amount.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_amount: Option<f64>,

    /// Total after tax.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gross_total: Option<f64>,

    /// Line items, in document order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line_items: Vec<LineItem>,

    /// Raw extracted text, kept for diagnostics only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_text: Option<String>,

    /// Source document path, kept for diagnostics only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

/// A single line item on an invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineItem {
    /// Product/service description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Quantity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<f64>,

    /// Price per unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,

    /// Total for this line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_total: Option<f64>,
}
