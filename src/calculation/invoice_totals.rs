//! Invoice totals and rounding.
//!
//! Line tax is kept at full precision. Only the invoice total is rounded,
//! half away from zero to whole currency units, and the difference is
//! recorded as `rounded_off` so that
//! `sub_total + total_tax_amount + rounded_off == total_amount` always holds.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::{AuditStep, InvoiceItem, InvoiceTotals, TaxRates, TaxType};

/// Result of the totals pass.
#[derive(Debug, Clone)]
pub struct InvoiceTotalsResult {
    /// The calculated totals.
    pub totals: InvoiceTotals,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Rounds an amount to the nearest whole unit, halves away from zero.
///
/// ```
/// use textile_billing::calculation::round_to_whole;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_to_whole(Decimal::new(10245, 1)), Decimal::new(1025, 0));
/// assert_eq!(round_to_whole(Decimal::new(10244, 1)), Decimal::new(1024, 0));
/// ```
pub fn round_to_whole(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Re-applies line arithmetic to every item.
///
/// Used after rates or tax type change on a draft.
pub fn recalculate_items(items: &mut [InvoiceItem], tax_type: TaxType, rates: &TaxRates) {
    for item in items {
        item.apply_tax(tax_type, rates);
    }
}

/// Sums item amounts into invoice totals and rounds the grand total.
///
/// An empty item list gives all-zero totals.
///
/// # Example
///
/// ```
/// use textile_billing::calculation::calculate_invoice_totals;
///
/// let result = calculate_invoice_totals(&[], 1);
/// assert!(result.totals.total_amount.is_zero());
/// assert!(result.totals.rounded_off.is_zero());
/// ```
pub fn calculate_invoice_totals(items: &[InvoiceItem], step_number: u32) -> InvoiceTotalsResult {
    let sub_total: Decimal = items.iter().map(|i| i.subtotal).sum();
    let total_cgst: Decimal = items.iter().map(|i| i.cgst).sum();
    let total_sgst: Decimal = items.iter().map(|i| i.sgst).sum();
    let total_tax_amount = total_cgst + total_sgst;
    let gross = sub_total + total_tax_amount;
    let total_amount = round_to_whole(gross);
    let rounded_off = total_amount - gross;

    let totals = InvoiceTotals {
        sub_total,
        total_cgst,
        total_sgst,
        total_tax_amount,
        rounded_off,
        total_amount,
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "invoice_totals".to_string(),
        rule_name: "Invoice Totals and Round-off".to_string(),
        input: serde_json::json!({
            "item_count": items.len(),
            "sub_total": sub_total.normalize().to_string(),
            "total_tax_amount": total_tax_amount.normalize().to_string()
        }),
        output: serde_json::json!({
            "total_amount": total_amount.normalize().to_string(),
            "rounded_off": rounded_off.normalize().to_string()
        }),
        reasoning: format!(
            "{} + {} = {} rounded to {} (round-off {})",
            sub_total.normalize(),
            total_tax_amount.normalize(),
            gross.normalize(),
            total_amount.normalize(),
            rounded_off.normalize()
        ),
    };

    InvoiceTotalsResult { totals, audit_step }
}
