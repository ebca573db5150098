//! Invoice models.
//!
//! This module contains the [`Invoice`] document, its aggregated
//! [`InvoiceItem`] lines, and the tax settings that drive line arithmetic.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Separator used when challan numbers are joined on an invoice item.
pub const CHALLAN_NUMBER_SEPARATOR: &str = ", ";

/// How challan lines are grouped into invoice items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceType {
    /// One item per (process, rate).
    #[default]
    Process,
    /// One item per (process, rate, design number).
    Design,
}

/// The tax treatment of an invoice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxType {
    /// Intra-state GST, split into CGST and SGST halves.
    #[default]
    #[serde(rename = "GST")]
    Gst,
    /// No GST charged.
    #[serde(rename = "NGST")]
    Ngst,
}

/// CGST and SGST rates applied under [`TaxType::Gst`], as fractions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRates {
    /// Central GST rate (e.g. `0.025` for 2.5%).
    pub cgst: Decimal,
    /// State GST rate (e.g. `0.025` for 2.5%).
    pub sgst: Decimal,
}

impl Default for TaxRates {
    /// 2.5% CGST + 2.5% SGST, the rate for textile job work.
    fn default() -> Self {
        Self {
            cgst: Decimal::new(25, 3),
            sgst: Decimal::new(25, 3),
        }
    }
}

/// One aggregated billing line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Synthetic identifier of the line.
    pub id: Uuid,
    /// Text printed on the invoice (editable before save).
    pub description: String,
    /// The process this line bills.
    pub process: String,
    /// The design number, set only for design-wise invoices.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub design_no: Option<String>,
    /// Contributing challan numbers, comma-joined and de-duplicated.
    pub challan_number: String,
    /// HSN/SAC tax classification code.
    pub hsn_code: String,
    /// Total pieces across contributing challans.
    pub pcs: u64,
    /// Total meters across contributing challans.
    pub mtr: Decimal,
    /// Unit rate per meter.
    pub rate: Decimal,
    /// `mtr * rate`.
    pub subtotal: Decimal,
    /// Central GST on the subtotal.
    pub cgst: Decimal,
    /// State GST on the subtotal.
    pub sgst: Decimal,
    /// `subtotal + cgst + sgst`.
    pub amount: Decimal,
}

impl InvoiceItem {
    /// Returns the individual challan numbers on this line.
    ///
    /// ```
    /// use textile_billing::models::InvoiceItem;
    /// use rust_decimal::Decimal;
    /// use uuid::Uuid;
    ///
    /// let item = InvoiceItem {
    ///     id: Uuid::nil(),
    ///     description: "DYEING".to_string(),
    ///     process: "DYEING".to_string(),
    ///     design_no: None,
    ///     challan_number: "DC-1, DC-2,DC-3".to_string(),
    ///     hsn_code: "9988".to_string(),
    ///     pcs: 0,
    ///     mtr: Decimal::ZERO,
    ///     rate: Decimal::ZERO,
    ///     subtotal: Decimal::ZERO,
    ///     cgst: Decimal::ZERO,
    ///     sgst: Decimal::ZERO,
    ///     amount: Decimal::ZERO,
    /// };
    /// assert_eq!(item.challan_numbers(), vec!["DC-1", "DC-2", "DC-3"]);
    /// ```
    pub fn challan_numbers(&self) -> Vec<&str> {
        parse_challan_numbers(&self.challan_number)
    }

    /// Returns true if the given challan number is on this line.
    pub fn contains_challan(&self, challan_number: &str) -> bool {
        let wanted = challan_number.trim();
        self.challan_numbers().iter().any(|n| *n == wanted)
    }

    /// Appends a challan number unless it is already listed.
    pub fn add_challan_number(&mut self, challan_number: &str) {
        let number = challan_number.trim();
        if number.is_empty() || self.contains_challan(number) {
            return;
        }
        if self.challan_number.trim().is_empty() {
            self.challan_number = number.to_string();
        } else {
            self.challan_number.push_str(CHALLAN_NUMBER_SEPARATOR);
            self.challan_number.push_str(number);
        }
    }

    /// Recomputes subtotal, tax and amount from `mtr` and `rate`.
    pub fn apply_tax(&mut self, tax_type: TaxType, rates: &TaxRates) {
        self.subtotal = self.mtr * self.rate;
        let (cgst, sgst) = match tax_type {
            TaxType::Gst => (self.subtotal * rates.cgst, self.subtotal * rates.sgst),
            TaxType::Ngst => (Decimal::ZERO, Decimal::ZERO),
        };
        self.cgst = cgst;
        self.sgst = sgst;
        self.amount = self.subtotal + self.cgst + self.sgst;
    }

    /// Changes the rate of this line and recomputes only this line.
    ///
    /// Invoice-level totals are not touched; run the totals pass afterwards.
    pub fn set_rate(&mut self, rate: Decimal, tax_type: TaxType, rates: &TaxRates) {
        self.rate = rate;
        self.apply_tax(tax_type, rates);
    }
}

/// Splits a comma-joined challan number list into trimmed, non-empty tokens.
pub fn parse_challan_numbers(joined: &str) -> Vec<&str> {
    joined
        .split(',')
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .collect()
}

/// Invoice-level totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of item subtotals.
    pub sub_total: Decimal,
    /// Sum of item CGST.
    pub total_cgst: Decimal,
    /// Sum of item SGST.
    pub total_sgst: Decimal,
    /// `total_cgst + total_sgst`.
    pub total_tax_amount: Decimal,
    /// `total_amount - (sub_total + total_tax_amount)`.
    pub rounded_off: Decimal,
    /// The gross total rounded to the nearest whole currency unit.
    pub total_amount: Decimal,
}

/// A finalized invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// The invoice number.
    pub invoice_number: String,
    /// The invoice date.
    pub date: NaiveDate,
    /// The billed client.
    pub client_name: String,
    /// How the items were grouped.
    pub invoice_type: InvoiceType,
    /// The tax treatment.
    pub tax_type: TaxType,
    /// Billing lines, in aggregation order.
    pub items: Vec<InvoiceItem>,
    /// Totals over `items`.
    #[serde(flatten)]
    pub totals: InvoiceTotals,
}

impl Invoice {
    /// Returns true if any item on this invoice lists the challan number.
    pub fn contains_challan(&self, challan_number: &str) -> bool {
        self.items
            .iter()
            .any(|item| item.contains_challan(challan_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_item(challans: &str, mtr: &str, rate: &str) -> InvoiceItem {
        InvoiceItem {
            id: Uuid::nil(),
            description: "DYEING".to_string(),
            process: "DYEING".to_string(),
            design_no: None,
            challan_number: challans.to_string(),
            hsn_code: "998821".to_string(),
            pcs: 4,
            mtr: dec(mtr),
            rate: dec(rate),
            subtotal: Decimal::ZERO,
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            amount: Decimal::ZERO,
        }
    }

    #[test]
    fn test_parse_challan_numbers_trims_and_skips_blanks() {
        assert_eq!(
            parse_challan_numbers(" DC-1 ,, DC-2 ,"),
            vec!["DC-1", "DC-2"]
        );
        assert!(parse_challan_numbers("").is_empty());
    }

    #[test]
    fn test_contains_challan_matches_whole_tokens() {
        let item = make_item("DC-10, DC-11", "1", "1");
        assert!(item.contains_challan("DC-10"));
        assert!(!item.contains_challan("DC-1"));
    }

    #[test]
    fn test_add_challan_number_deduplicates() {
        let mut item = make_item("DC-1", "1", "1");
        item.add_challan_number("DC-2");
        item.add_challan_number("DC-1");
        item.add_challan_number(" DC-2 ");
        assert_eq!(item.challan_number, "DC-1, DC-2");
    }

    #[test]
    fn test_add_challan_number_to_empty_item() {
        let mut item = make_item("", "1", "1");
        item.add_challan_number("DC-9");
        assert_eq!(item.challan_number, "DC-9");
    }

    #[test]
    fn test_apply_tax_gst() {
        let mut item = make_item("DC-1", "100", "5");
        item.apply_tax(TaxType::Gst, &TaxRates::default());
        assert_eq!(item.subtotal, dec("500"));
        assert_eq!(item.cgst, dec("12.5"));
        assert_eq!(item.sgst, dec("12.5"));
        assert_eq!(item.amount, dec("525"));
    }

    #[test]
    fn test_apply_tax_ngst() {
        let mut item = make_item("DC-1", "100", "5");
        item.apply_tax(TaxType::Ngst, &TaxRates::default());
        assert_eq!(item.subtotal, dec("500"));
        assert_eq!(item.cgst, Decimal::ZERO);
        assert_eq!(item.sgst, Decimal::ZERO);
        assert_eq!(item.amount, dec("500"));
    }

    #[test]
    fn test_set_rate_recomputes_line() {
        let mut item = make_item("DC-1", "80", "5");
        item.apply_tax(TaxType::Gst, &TaxRates::default());
        item.set_rate(dec("6.25"), TaxType::Gst, &TaxRates::default());
        assert_eq!(item.subtotal, dec("500"));
        assert_eq!(item.amount, dec("525"));
    }

    #[test]
    fn test_tax_type_serialization() {
        assert_eq!(serde_json::to_string(&TaxType::Gst).unwrap(), "\"GST\"");
        assert_eq!(serde_json::to_string(&TaxType::Ngst).unwrap(), "\"NGST\"");
        let parsed: InvoiceType = serde_json::from_str("\"design\"").unwrap();
        assert_eq!(parsed, InvoiceType::Design);
    }

    #[test]
    fn test_invoice_serializes_totals_flat() {
        let invoice = Invoice {
            invoice_number: "INV-1".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 4, 1).unwrap(),
            client_name: "Shree Textiles".to_string(),
            invoice_type: InvoiceType::Process,
            tax_type: TaxType::Gst,
            items: vec![],
            totals: InvoiceTotals::default(),
        };
        let json = serde_json::to_string(&invoice).unwrap();
        assert!(json.contains("\"total_amount\":\"0\""));
        assert!(json.contains("\"invoice_number\":\"INV-1\""));
        assert!(!json.contains("\"totals\""));
    }
}
