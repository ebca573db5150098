//! Invoice drafting and finalisation.
//!
//! A draft is produced from the client's available challans and stays
//! editable (rate, description, HSN) until it is finalised. Finalising
//! validates the header, recomputes every line and the totals from scratch,
//! and re-checks that none of the billed challans reached another invoice in
//! the meantime.

use std::collections::HashSet;
use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditTrace, AuditWarning, Challan, Invoice, InvoiceItem, InvoiceTotals, InvoiceType,
    MAX_PROCESS_RATE, TaxRates, TaxType,
};

/// The most meters accepted on one finalized invoice line.
pub const MAX_ITEM_METERS: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

use super::challan_availability::{invoiced_challan_numbers, is_available_for_invoicing};
use super::invoice_aggregation::{AggregationOptions, aggregate_challans};
use super::invoice_totals::{calculate_invoice_totals, recalculate_items};
use super::rates::{RateSource, resolve_process_rate};

/// Warning code for a selected challan that can no longer be invoiced.
pub const CHALLAN_UNAVAILABLE_WARNING: &str = "CHALLAN_UNAVAILABLE";

/// An invoice that has been calculated but not yet saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceDraft {
    /// The invoice number, entered by the user before saving.
    #[serde(default)]
    pub invoice_number: String,
    /// The invoice date, entered by the user before saving.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// The billed client.
    pub client_name: String,
    /// How the items were grouped.
    #[serde(default)]
    pub invoice_type: InvoiceType,
    /// The tax treatment.
    #[serde(default)]
    pub tax_type: TaxType,
    /// Editable billing lines.
    pub items: Vec<InvoiceItem>,
    /// Totals over `items` as last calculated.
    #[serde(flatten)]
    pub totals: InvoiceTotals,
}

/// A draft together with the audit trace of how it was built.
#[derive(Debug, Clone)]
pub struct InvoiceDraftResult {
    /// The calculated draft.
    pub draft: InvoiceDraft,
    /// Rate resolutions, aggregation and totals steps plus warnings.
    pub audit_trace: AuditTrace,
}

/// Builds an invoice draft for one client.
///
/// Challans that are not available for invoicing (wrong status or already
/// billed on one of `existing_invoices`) are left out with a warning.
///
/// # Errors
///
/// - `Validation` when a challan has pieces or meters out of range
/// - `Validation` when a selected challan's process resolves to a rate out
///   of range
pub fn prepare_invoice_draft<R: RateSource + ?Sized>(
    client_name: &str,
    challans: &[Challan],
    existing_invoices: &[Invoice],
    rates: &R,
    options: &AggregationOptions<'_>,
) -> EngineResult<InvoiceDraftResult> {
    let start = Instant::now();
    let mut trace = AuditTrace::default();

    for challan in challans {
        challan.validate()?;
    }

    let mut selected = Vec::with_capacity(challans.len());
    for challan in challans {
        if is_available_for_invoicing(challan, existing_invoices) {
            for process in challan.billing_processes() {
                resolve_process_rate(rates, process).validate()?;
            }
            selected.push(challan.clone());
        } else {
            warn!(
                challan_number = %challan.challan_number,
                status = %challan.status,
                "Skipping challan that is not available for invoicing"
            );
            trace.warnings.push(AuditWarning::new(
                CHALLAN_UNAVAILABLE_WARNING,
                format!(
                    "Challan '{}' ({}) is not available for invoicing and was left out",
                    challan.challan_number, challan.status
                ),
                "medium",
            ));
        }
    }

    let aggregation = aggregate_challans(&selected, rates, options, trace.next_step_number());
    trace.steps.extend(aggregation.audit_steps);
    trace.warnings.extend(aggregation.warnings);

    let totals = calculate_invoice_totals(&aggregation.items, trace.next_step_number());
    trace.steps.push(totals.audit_step);
    trace.duration_us = start.elapsed().as_micros() as u64;

    Ok(InvoiceDraftResult {
        draft: InvoiceDraft {
            invoice_number: String::new(),
            date: None,
            client_name: client_name.trim().to_string(),
            invoice_type: options.invoice_type,
            tax_type: options.tax_type,
            items: aggregation.items,
            totals: totals.totals,
        },
        audit_trace: trace,
    })
}

/// Validates a draft and turns it into a saveable invoice.
///
/// Line arithmetic and totals are recomputed from each item's `mtr` and
/// `rate`, so stale amounts on an edited draft never reach the invoice.
///
/// # Errors
///
/// - `Validation` when the invoice number, date or client name is missing,
///   when there are no items, or when an item's rate or meters are negative
///   or above [`MAX_PROCESS_RATE`] and [`MAX_ITEM_METERS`]
/// - `AlreadyInvoiced` when a challan on the draft is already billed on one
///   of `existing_invoices`
pub fn finalize_invoice(
    draft: InvoiceDraft,
    tax_rates: &TaxRates,
    existing_invoices: &[Invoice],
) -> EngineResult<Invoice> {
    let invoice_number = draft.invoice_number.trim();
    if invoice_number.is_empty() {
        return Err(EngineError::validation(
            "invoice_number",
            "invoice number is required",
        ));
    }
    let date = draft
        .date
        .ok_or_else(|| EngineError::validation("date", "invoice date is required"))?;
    let client_name = draft.client_name.trim();
    if client_name.is_empty() {
        return Err(EngineError::validation("client_name", "client is required"));
    }
    if draft.items.is_empty() {
        return Err(EngineError::validation(
            "items",
            "an invoice needs at least one item",
        ));
    }
    if let Some(item) = draft.items.iter().find(|i| {
        i.rate < Decimal::ZERO
            || i.mtr < Decimal::ZERO
            || i.rate > MAX_PROCESS_RATE
            || i.mtr > MAX_ITEM_METERS
    }) {
        return Err(EngineError::validation(
            "items",
            format!(
                "item '{}' has rate {} and meters {}; rate must be 0 to {} and meters 0 to {}",
                item.description, item.rate, item.mtr, MAX_PROCESS_RATE, MAX_ITEM_METERS
            ),
        ));
    }
    if existing_invoices
        .iter()
        .any(|i| i.invoice_number.trim() == invoice_number)
    {
        return Err(EngineError::validation(
            "invoice_number",
            format!("invoice number '{}' is already used", invoice_number),
        ));
    }

    let billed = invoiced_challan_numbers(existing_invoices);
    let mut seen = HashSet::new();
    for item in &draft.items {
        for number in item.challan_numbers() {
            if !seen.insert(number) {
                continue;
            }
            if let Some(invoice) = billed.get(number) {
                return Err(EngineError::AlreadyInvoiced {
                    challan_number: number.to_string(),
                    invoice_number: invoice.to_string(),
                });
            }
        }
    }

    let invoice_number = invoice_number.to_string();
    let client_name = client_name.to_string();
    let mut items = draft.items;
    recalculate_items(&mut items, draft.tax_type, tax_rates);
    let totals = calculate_invoice_totals(&items, 1).totals;

    info!(
        invoice_number = %invoice_number,
        client = %client_name,
        items = items.len(),
        total_amount = %totals.total_amount,
        "Finalized invoice"
    );

    Ok(Invoice {
        invoice_number,
        date,
        client_name,
        invoice_type: draft.invoice_type,
        tax_type: draft.tax_type,
        items,
        totals,
    })
}
