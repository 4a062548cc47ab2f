//! Key normalization: reconciles alternate field-name spellings from
//! upstream extractors into the canonical record shape.
//!
//! Each canonical field has one explicit precedence table, applied once
//! here, so the validation rules only ever see canonical names. "First
//! non-absent wins": a present-but-zero amount or present-but-empty
//! string claims its slot.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::invoice::{InvoiceRecord, LineItem};

/// An invoice record as produced upstream, before key normalization.
///
/// Carries every synonym spelling as its own field; unknown keys are
/// ignored at decode time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInvoice {
    pub invoice_id: Option<String>,
    pub invoice_number: Option<String>,

    pub invoice_date: Option<String>,
    pub due_date: Option<String>,

    pub seller_name: Option<String>,
    pub supplier_name: Option<String>,
    pub seller: Option<String>,

    pub buyer_name: Option<String>,
    pub buyer: Option<String>,

    pub supplier_tax_id: Option<String>,
    pub seller_tax_id: Option<String>,
    pub buyer_tax_id: Option<String>,

    pub currency: Option<String>,

    pub net_total: Option<f64>,
    pub subtotal: Option<f64>,
    pub net: Option<f64>,

    pub tax_amount: Option<f64>,
    pub tax: Option<f64>,

    pub gross_total: Option<f64>,
    pub total_amount: Option<f64>,
    pub amount_due: Option<f64>,

    pub line_items: Vec<RawLineItem>,

    pub raw_text: Option<String>,
    pub source_file: Option<String>,
}

/// A line item before key normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawLineItem {
    pub description: Option<String>,
    pub quantity: Option<f64>,
    pub unit_price: Option<f64>,

    pub line_total: Option<f64>,
    pub amount: Option<f64>,
}

/// Decode a JSON batch into raw records.
///
/// Rejects input that is not a JSON array of objects (or that carries
/// non-numeric amount fields). This is the caller-side contract check
/// that keeps the validator itself infallible.
pub fn batch_from_str(json: &str) -> Result<Vec<RawInvoice>> {
    Ok(serde_json::from_str(json)?)
}

/// Read and decode a JSON batch file.
pub fn batch_from_file(path: &Path) -> Result<Vec<RawInvoice>> {
    let content = fs::read_to_string(path)?;
    batch_from_str(&content)
}

/// Normalize one raw record into the canonical shape.
///
/// Never fails; absent inputs propagate as absent outputs. The input is
/// not consumed or mutated.
pub fn normalize_invoice(raw: &RawInvoice) -> InvoiceRecord {
    InvoiceRecord {
        invoice_id: raw.invoice_id.clone(),
        invoice_number: first_present(&[&raw.invoice_number, &raw.invoice_id]),
        invoice_date: raw.invoice_date.clone(),
        due_date: raw.due_date.clone(),
        seller_name: first_present(&[&raw.seller_name, &raw.supplier_name, &raw.seller]),
        buyer_name: first_present(&[&raw.buyer_name, &raw.buyer]),
        supplier_tax_id: first_present(&[&raw.supplier_tax_id, &raw.seller_tax_id]),
        buyer_tax_id: raw.buyer_tax_id.clone(),
        currency: raw.currency.clone(),
        net_total: first_present(&[&raw.net_total, &raw.subtotal, &raw.net]),
        tax_amount: first_present(&[&raw.tax_amount, &raw.tax]),
        gross_total: first_present(&[&raw.gross_total, &raw.total_amount, &raw.amount_due]),
        line_items: raw.line_items.iter().map(normalize_line_item).collect(),
        raw_text: raw.raw_text.clone(),
        source_file: raw.source_file.clone(),
    }
}

/// Normalize a whole batch, preserving order.
pub fn normalize_batch(raw: &[RawInvoice]) -> Vec<InvoiceRecord> {
    raw.iter().map(normalize_invoice).collect()
}

fn normalize_line_item(raw: &RawLineItem) -> LineItem {
    LineItem {
        description: raw.description.clone(),
        quantity: raw.quantity,
        unit_price: raw.unit_price,
        line_total: first_present(&[&raw.line_total, &raw.amount]),
    }
}

fn first_present<T: Clone>(candidates: &[&Option<T>]) -> Option<T> {
    candidates.iter().find_map(|c| (*c).clone())
}
