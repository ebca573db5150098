//! Invoice aggregation.
//!
//! This module turns selected delivery challans into invoice items. Every
//! (challan, process) occurrence is priced with its own resolved rate and
//! merged into an item keyed by `(process, rate)`, plus the design number
//! for design-wise invoices.
//!
//! A challan that lists several processes contributes its full meterage to
//! each process item. Billing is per process on the full meterage; meters
//! are never pro-rated across processes.

use std::collections::HashMap;

use rust_decimal::Decimal;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::models::{
    AuditStep, AuditWarning, Challan, InvoiceItem, InvoiceType, TaxRates, TaxType,
};

use super::rates::{RateResolution, RateSource, resolve_process_rate};

/// Warning code emitted when a process resolves to a zero rate.
pub const ZERO_RATE_WARNING: &str = "ZERO_RATE";

/// Settings that shape how challans are aggregated and taxed.
#[derive(Debug, Clone, Copy)]
pub struct AggregationOptions<'a> {
    /// Process-wise or design-wise grouping.
    pub invoice_type: InvoiceType,
    /// GST or no GST.
    pub tax_type: TaxType,
    /// HSN/SAC code given to every new item.
    pub hsn_code: &'a str,
    /// CGST/SGST rates applied under GST.
    pub tax_rates: TaxRates,
}

/// The result of aggregating challans, including items and audit data.
#[derive(Debug, Clone)]
pub struct InvoiceAggregationResult {
    /// Aggregated, taxed invoice items in first-seen order.
    pub items: Vec<InvoiceItem>,
    /// One step per distinct rate resolution, then a summary step.
    pub audit_steps: Vec<AuditStep>,
    /// Zero-rate warnings, one per affected process.
    pub warnings: Vec<AuditWarning>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AggregationKey {
    process: String,
    rate: Decimal,
    design_no: Option<String>,
}

/// Builds the printed description of an item.
///
/// ```
/// use textile_billing::calculation::item_description;
/// use textile_billing::models::InvoiceType;
///
/// assert_eq!(item_description(InvoiceType::Process, "DYEING", "D-7"), "DYEING");
/// assert_eq!(item_description(InvoiceType::Design, "DYEING", "D-7"), "Design: D-7 (DYEING)");
/// ```
pub fn item_description(invoice_type: InvoiceType, process: &str, design_no: &str) -> String {
    match invoice_type {
        InvoiceType::Process => process.to_string(),
        InvoiceType::Design => format!("Design: {} ({})", design_no, process),
    }
}

/// Aggregates challans into taxed invoice items.
///
/// An empty selection yields no items; it is not an error. Quantities and
/// rates are not range-checked here; [`prepare_invoice_draft`] checks them
/// before aggregating.
///
/// [`prepare_invoice_draft`]: super::prepare_invoice_draft
///
/// # Arguments
///
/// * `challans` - The challans selected for one client
/// * `rates` - Client-then-master rate lookup
/// * `options` - Invoice type, tax type, HSN code and tax rates
/// * `step_number` - The step number for audit trail sequencing
///
/// # Example
///
/// ```
/// use textile_billing::calculation::{AggregationOptions, RateSource, aggregate_challans};
/// use textile_billing::models::{Challan, ChallanStatus, InvoiceType, TaxRates, TaxType};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// struct Flat;
/// impl RateSource for Flat {
///     fn client_rate(&self, _p: &str) -> Option<Decimal> { Some(Decimal::new(5, 0)) }
///     fn master_rate(&self, _p: &str) -> Option<Decimal> { None }
/// }
///
/// let challan = Challan {
///     challan_number: "DC-1".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
///     party_name: "Shree Textiles".to_string(),
///     process: vec!["DYEING".to_string()],
///     split_process: None,
///     design_no: "D-7".to_string(),
///     pcs: 4,
///     mtr: Decimal::new(100, 0),
///     status: ChallanStatus::ReadyToInvoice,
///     remarks: None,
/// };
///
/// let result = aggregate_challans(
///     &[challan],
///     &Flat,
///     &AggregationOptions {
///         invoice_type: InvoiceType::Process,
///         tax_type: TaxType::Gst,
///         hsn_code: "998821",
///         tax_rates: TaxRates::default(),
///     },
///     1,
/// );
///
/// assert_eq!(result.items.len(), 1);
/// assert_eq!(result.items[0].amount, Decimal::new(525, 0));
/// ```
pub fn aggregate_challans<R: RateSource + ?Sized>(
    challans: &[Challan],
    rates: &R,
    options: &AggregationOptions<'_>,
    step_number: u32,
) -> InvoiceAggregationResult {
    let mut items: Vec<InvoiceItem> = Vec::new();
    let mut index: HashMap<AggregationKey, usize> = HashMap::new();
    let mut resolved: HashMap<String, RateResolution> = HashMap::new();
    let mut audit_steps = Vec::new();
    let mut warnings = Vec::new();
    let mut occurrences: u32 = 0;
    let mut step = step_number;

    for challan in challans {
        for raw_process in challan.billing_processes() {
            let process = raw_process.trim();
            if process.is_empty() {
                continue;
            }
            occurrences += 1;

            let resolution = resolved
                .entry(process.to_string())
                .or_insert_with(|| {
                    let resolution = resolve_process_rate(rates, process);
                    audit_steps.push(rate_resolution_step(step, &resolution));
                    step += 1;
                    if resolution.is_default() {
                        warn!(process = %process, "No client or master rate; billing at zero");
                        warnings.push(AuditWarning::new(
                            ZERO_RATE_WARNING,
                            format!(
                                "No client or master rate found for process '{}'; billed at 0",
                                process
                            ),
                            "high",
                        ));
                    }
                    resolution
                })
                .clone();

            let design_no = match options.invoice_type {
                InvoiceType::Process => None,
                InvoiceType::Design => Some(challan.design_no.trim().to_string()),
            };
            let key = AggregationKey {
                process: process.to_string(),
                rate: resolution.rate,
                design_no: design_no.clone(),
            };

            match index.get(&key) {
                Some(&position) => {
                    let item = &mut items[position];
                    item.pcs += challan.pcs;
                    item.mtr += challan.mtr;
                    item.add_challan_number(&challan.challan_number);
                }
                None => {
                    index.insert(key, items.len());
                    items.push(InvoiceItem {
                        id: Uuid::new_v4(),
                        description: item_description(
                            options.invoice_type,
                            process,
                            challan.design_no.trim(),
                        ),
                        process: process.to_string(),
                        design_no,
                        challan_number: challan.challan_number.trim().to_string(),
                        hsn_code: options.hsn_code.to_string(),
                        pcs: challan.pcs,
                        mtr: challan.mtr,
                        rate: resolution.rate,
                        subtotal: Decimal::ZERO,
                        cgst: Decimal::ZERO,
                        sgst: Decimal::ZERO,
                        amount: Decimal::ZERO,
                    });
                }
            }
        }
    }

    for item in &mut items {
        item.apply_tax(options.tax_type, &options.tax_rates);
    }

    debug!(
        challans = challans.len(),
        occurrences,
        items = items.len(),
        "Aggregated challans into invoice items"
    );

    audit_steps.push(AuditStep {
        step_number: step,
        rule_id: "invoice_aggregation".to_string(),
        rule_name: "Challan Aggregation".to_string(),
        input: serde_json::json!({
            "challan_count": challans.len(),
            "process_occurrences": occurrences,
            "invoice_type": options.invoice_type,
            "tax_type": options.tax_type
        }),
        output: serde_json::json!({
            "item_count": items.len(),
            "items": items.iter().map(|i| serde_json::json!({
                "description": i.description,
                "challan_number": i.challan_number,
                "mtr": i.mtr.normalize().to_string(),
                "rate": i.rate.normalize().to_string(),
                "subtotal": i.subtotal.normalize().to_string()
            })).collect::<Vec<_>>()
        }),
        reasoning: format!(
            "{} process occurrences from {} challans merged into {} items by {}",
            occurrences,
            challans.len(),
            items.len(),
            match options.invoice_type {
                InvoiceType::Process => "(process, rate)",
                InvoiceType::Design => "(process, rate, design)",
            }
        ),
    });

    InvoiceAggregationResult {
        items,
        audit_steps,
        warnings,
    }
}

fn rate_resolution_step(step_number: u32, resolution: &RateResolution) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: "rate_resolution".to_string(),
        rule_name: "Process Rate Resolution".to_string(),
        input: serde_json::json!({
            "process": resolution.process
        }),
        output: serde_json::json!({
            "rate": resolution.rate.normalize().to_string(),
            "source": resolution.origin
        }),
        reasoning: format!(
            "Rate for '{}' is {} ({:?})",
            resolution.process,
            resolution.rate.normalize(),
            resolution.origin
        ),
    }
}
