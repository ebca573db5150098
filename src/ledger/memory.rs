//! In-memory ledger.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, Challan, EmployeeAdvance, Invoice, PayPeriod, Payslip};

use super::traits::{AdvanceSource, AttendanceSource, ChallanSource, InvoiceSink, PayslipSink};

/// A single-owner store implementing every collaborator contract.
///
/// Invoices and payslips are append-only: nothing here edits or removes a
/// saved document.
///
/// # Example
///
/// ```
/// use textile_billing::ledger::{InvoiceSink, MemoryLedger};
///
/// let ledger = MemoryLedger::new();
/// assert!(ledger.invoices().unwrap().is_empty());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLedger {
    challans: Vec<Challan>,
    invoices: Vec<(Uuid, Invoice)>,
    attendance: Vec<AttendanceRecord>,
    advances: Vec<EmployeeAdvance>,
    payslips: Vec<(Uuid, Payslip)>,
}

impl MemoryLedger {
    /// Creates an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a challan.
    pub fn add_challan(&mut self, challan: Challan) {
        self.challans.push(challan);
    }

    /// Records an attendance entry, replacing any entry for the same
    /// employee and date.
    pub fn record_attendance(&mut self, record: AttendanceRecord) {
        self.attendance
            .retain(|r| !(r.employee_id == record.employee_id && r.date == record.date));
        self.attendance.push(record);
    }

    /// Records an advance.
    pub fn add_advance(&mut self, advance: EmployeeAdvance) {
        self.advances.push(advance);
    }

    /// Looks up a saved invoice by the id assigned at save time.
    pub fn invoice(&self, id: Uuid) -> EngineResult<&Invoice> {
        self.invoices
            .iter()
            .find(|(saved, _)| *saved == id)
            .map(|(_, invoice)| invoice)
            .ok_or_else(|| EngineError::NotFound {
                entity: "invoice".to_string(),
                id: id.to_string(),
            })
    }

    /// Looks up an advance by id.
    pub fn advance(&self, advance_id: &str) -> EngineResult<&EmployeeAdvance> {
        self.advances
            .iter()
            .find(|a| a.id == advance_id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "advance".to_string(),
                id: advance_id.to_string(),
            })
    }
}

impl ChallanSource for MemoryLedger {
    fn challans_for_client(
        &self,
        client_name: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<Challan>> {
        let client = client_name.trim();
        let mut found: Vec<Challan> = self
            .challans
            .iter()
            .filter(|c| c.party_name.trim().eq_ignore_ascii_case(client))
            .filter(|c| c.date >= from && c.date <= to)
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.challan_number.cmp(&b.challan_number))
        });
        Ok(found)
    }
}

impl InvoiceSink for MemoryLedger {
    fn invoices(&self) -> EngineResult<Vec<Invoice>> {
        Ok(self.invoices.iter().map(|(_, i)| i.clone()).collect())
    }

    fn save_invoice(&mut self, invoice: Invoice) -> EngineResult<Uuid> {
        let id = Uuid::new_v4();
        debug!(id = %id, invoice_number = %invoice.invoice_number, "Saved invoice");
        self.invoices.push((id, invoice));
        Ok(id)
    }
}

impl AttendanceSource for MemoryLedger {
    fn attendance_for(
        &self,
        employee_id: &str,
        period: &PayPeriod,
    ) -> EngineResult<Vec<AttendanceRecord>> {
        Ok(self
            .attendance
            .iter()
            .filter(|r| r.employee_id == employee_id && period.contains_date(r.date))
            .cloned()
            .collect())
    }
}

impl AdvanceSource for MemoryLedger {
    fn advances_for(&self, employee_id: &str) -> EngineResult<Vec<EmployeeAdvance>> {
        Ok(self
            .advances
            .iter()
            .filter(|a| a.employee_id == employee_id)
            .cloned()
            .collect())
    }

    fn update_paid_amount(&mut self, advance_id: &str, paid_amount: Decimal) -> EngineResult<()> {
        let advance = self
            .advances
            .iter_mut()
            .find(|a| a.id == advance_id)
            .ok_or_else(|| EngineError::NotFound {
                entity: "advance".to_string(),
                id: advance_id.to_string(),
            })?;
        if paid_amount < Decimal::ZERO || paid_amount > advance.amount {
            return Err(EngineError::validation(
                "paid_amount",
                format!(
                    "paid amount {} must be between 0 and {}",
                    paid_amount, advance.amount
                ),
            ));
        }
        advance.paid_amount = paid_amount;
        Ok(())
    }
}

impl PayslipSink for MemoryLedger {
    fn payslips_for(&self, employee_id: &str) -> EngineResult<Vec<Payslip>> {
        Ok(self
            .payslips
            .iter()
            .filter(|(_, p)| p.employee_id == employee_id)
            .map(|(_, p)| p.clone())
            .collect())
    }

    fn save_payslip(&mut self, payslip: Payslip) -> EngineResult<Uuid> {
        let id = Uuid::new_v4();
        debug!(
            id = %id,
            employee_id = %payslip.employee_id,
            period = %payslip.pay_period,
            "Saved payslip"
        );
        self.payslips.push((id, payslip));
        Ok(id)
    }
}
