//! Collaborator contracts.
//!
//! The calculators never touch storage. These traits describe what a store
//! has to offer so that the finalize workflows can re-validate against the
//! latest persisted state before writing.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::error::EngineResult;
use crate::models::{AttendanceRecord, Challan, EmployeeAdvance, Invoice, PayPeriod, Payslip};

/// Supplies delivery challans.
pub trait ChallanSource {
    /// Challans of one client dated within `[from, to]`, in any status.
    fn challans_for_client(
        &self,
        client_name: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<Challan>>;
}

/// Stores finalized invoices.
pub trait InvoiceSink {
    /// Every saved invoice.
    fn invoices(&self) -> EngineResult<Vec<Invoice>>;
    /// Persists an invoice and returns the id the store assigned.
    fn save_invoice(&mut self, invoice: Invoice) -> EngineResult<Uuid>;
}

/// Supplies attendance records.
pub trait AttendanceSource {
    /// One employee's records dated within the period.
    fn attendance_for(
        &self,
        employee_id: &str,
        period: &PayPeriod,
    ) -> EngineResult<Vec<AttendanceRecord>>;
}

/// Supplies and maintains employee advances.
pub trait AdvanceSource {
    /// Every advance of one employee.
    fn advances_for(&self, employee_id: &str) -> EngineResult<Vec<EmployeeAdvance>>;
    /// Sets the repaid amount of one advance.
    fn update_paid_amount(&mut self, advance_id: &str, paid_amount: Decimal) -> EngineResult<()>;
}

/// Stores finalized payslips.
pub trait PayslipSink {
    /// Every saved payslip of one employee.
    fn payslips_for(&self, employee_id: &str) -> EngineResult<Vec<Payslip>>;
    /// Persists a payslip and returns the id the store assigned.
    fn save_payslip(&mut self, payslip: Payslip) -> EngineResult<Uuid>;
}
