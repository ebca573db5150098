//! Challan availability for invoicing.
//!
//! A challan can be billed when its status is billable and its number does
//! not already appear on an existing invoice. Invoice items store challan
//! numbers comma-joined, so membership is tested on parsed tokens.

use std::collections::HashMap;

use crate::models::{Challan, Invoice};

/// Maps every challan number already billed to the invoice that carries it.
///
/// When a challan appears on more than one invoice the first invoice wins.
pub fn invoiced_challan_numbers(invoices: &[Invoice]) -> HashMap<&str, &str> {
    let mut billed = HashMap::new();
    for invoice in invoices {
        for item in &invoice.items {
            for number in item.challan_numbers() {
                billed
                    .entry(number)
                    .or_insert(invoice.invoice_number.as_str());
            }
        }
    }
    billed
}

/// Returns the invoice number that already bills this challan, if any.
pub fn find_billing_invoice<'a>(challan_number: &str, invoices: &'a [Invoice]) -> Option<&'a str> {
    let wanted = challan_number.trim();
    invoices
        .iter()
        .find(|invoice| invoice.contains_challan(wanted))
        .map(|invoice| invoice.invoice_number.as_str())
}

/// Checks whether a single challan can still be invoiced.
///
/// # Example
///
/// ```
/// use textile_billing::calculation::is_available_for_invoicing;
/// use textile_billing::models::{Challan, ChallanStatus};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let challan = Challan {
///     challan_number: "DC-5".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
///     party_name: "Shree Textiles".to_string(),
///     process: vec!["DYEING".to_string()],
///     split_process: None,
///     design_no: "D-1".to_string(),
///     pcs: 2,
///     mtr: Decimal::new(50, 0),
///     status: ChallanStatus::ReadyToInvoice,
///     remarks: None,
/// };
/// assert!(is_available_for_invoicing(&challan, &[]));
/// ```
pub fn is_available_for_invoicing(challan: &Challan, invoices: &[Invoice]) -> bool {
    challan.status.is_billable() && find_billing_invoice(&challan.challan_number, invoices).is_none()
}

/// Filters challans down to those that can still be invoiced.
///
/// Order is preserved.
pub fn available_challans<'a>(challans: &'a [Challan], invoices: &[Invoice]) -> Vec<&'a Challan> {
    let billed = invoiced_challan_numbers(invoices);
    challans
        .iter()
        .filter(|c| c.status.is_billable() && !billed.contains_key(c.challan_number.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChallanStatus, InvoiceItem, InvoiceTotals, InvoiceType, TaxType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn make_challan(number: &str, status: ChallanStatus) -> Challan {
        Challan {
            challan_number: number.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
            party_name: "Shree Textiles".to_string(),
            process: vec!["DYEING".to_string()],
            split_process: None,
            design_no: "D-1".to_string(),
            pcs: 2,
            mtr: Decimal::new(50, 0),
            status,
            remarks: None,
        }
    }

    fn make_invoice(number: &str, challan_lists: &[&str]) -> Invoice {
        Invoice {
            invoice_number: number.to_string(),
            date: NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
            client_name: "Shree Textiles".to_string(),
            invoice_type: InvoiceType::Process,
            tax_type: TaxType::Gst,
            items: challan_lists
                .iter()
                .map(|list| InvoiceItem {
                    id: Uuid::new_v4(),
                    description: "DYEING".to_string(),
                    process: "DYEING".to_string(),
                    design_no: None,
                    challan_number: list.to_string(),
                    hsn_code: "998821".to_string(),
                    pcs: 0,
                    mtr: Decimal::ZERO,
                    rate: Decimal::ZERO,
                    subtotal: Decimal::ZERO,
                    cgst: Decimal::ZERO,
                    sgst: Decimal::ZERO,
                    amount: Decimal::ZERO,
                })
                .collect(),
            totals: InvoiceTotals::default(),
        }
    }

    #[test]
    fn test_ready_to_invoice_is_available() {
        let challan = make_challan("DC-1", ChallanStatus::ReadyToInvoice);
        assert!(is_available_for_invoicing(&challan, &[]));
    }

    #[test]
    fn test_legacy_delivered_is_available() {
        let challan = make_challan("DC-1", ChallanStatus::Delivered);
        assert!(is_available_for_invoicing(&challan, &[]));
    }

    #[test]
    fn test_non_billable_statuses_are_excluded() {
        for status in [
            ChallanStatus::NotDelivered,
            ChallanStatus::Rework,
            ChallanStatus::Invoiced,
            ChallanStatus::Other("On Hold".to_string()),
        ] {
            let challan = make_challan("DC-1", status);
            assert!(!is_available_for_invoicing(&challan, &[]));
        }
    }

    #[test]
    fn test_challan_on_joined_item_is_excluded() {
        let challan = make_challan("DC-2", ChallanStatus::ReadyToInvoice);
        let invoices = vec![make_invoice("INV-1", &["DC-1, DC-2,DC-3"])];
        assert!(!is_available_for_invoicing(&challan, &invoices));
        assert_eq!(find_billing_invoice("DC-2", &invoices), Some("INV-1"));
    }

    #[test]
    fn test_prefix_number_is_not_a_match() {
        let challan = make_challan("DC-1", ChallanStatus::ReadyToInvoice);
        let invoices = vec![make_invoice("INV-1", &["DC-10, DC-11"])];
        assert!(is_available_for_invoicing(&challan, &invoices));
    }

    #[test]
    fn test_available_challans_filters_and_keeps_order() {
        let challans = vec![
            make_challan("DC-3", ChallanStatus::ReadyToInvoice),
            make_challan("DC-1", ChallanStatus::ReadyToInvoice),
            make_challan("DC-2", ChallanStatus::NotDelivered),
            make_challan("DC-4", ChallanStatus::Delivered),
        ];
        let invoices = vec![make_invoice("INV-1", &["DC-1"])];

        let available: Vec<&str> = available_challans(&challans, &invoices)
            .iter()
            .map(|c| c.challan_number.as_str())
            .collect();
        assert_eq!(available, vec!["DC-3", "DC-4"]);
    }

    #[test]
    fn test_invoiced_numbers_first_invoice_wins() {
        let invoices = vec![
            make_invoice("INV-1", &["DC-1"]),
            make_invoice("INV-2", &["DC-1, DC-5"]),
        ];
        let billed = invoiced_challan_numbers(&invoices);
        assert_eq!(billed.get("DC-1"), Some(&"INV-1"));
        assert_eq!(billed.get("DC-5"), Some(&"INV-2"));
        assert_eq!(billed.len(), 2);
    }
}
