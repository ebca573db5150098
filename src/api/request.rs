//! Request types for the billing API.
//!
//! This module defines the JSON request bodies of the calculation endpoints.
//! Every request carries the records the calculation needs; the API holds
//! no stored data of its own.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{
    AttendanceRecord, Challan, Client, DeductionPolicy, Employee, EmployeeAdvance, Invoice,
    InvoiceType, PayPeriod, Payslip, TaxType,
};

/// Request body for `POST /invoices/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceCalculationRequest {
    /// The client being billed, with any client-specific rates.
    pub client: Client,
    /// The challans selected for the invoice.
    pub challans: Vec<Challan>,
    /// Invoices already saved, used to exclude billed challans.
    #[serde(default)]
    pub existing_invoices: Vec<Invoice>,
    /// Process-wise or design-wise grouping.
    #[serde(default)]
    pub invoice_type: InvoiceType,
    /// GST or NGST.
    #[serde(default)]
    pub tax_type: TaxType,
    /// HSN/SAC code for new items; the company default when absent.
    #[serde(default)]
    pub hsn_code: Option<String>,
}

/// Request body for `POST /statements/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementRequest {
    /// The client the statement is for.
    pub client: Client,
    /// The client's challans.
    pub challans: Vec<Challan>,
}

/// Request body for `POST /payslips/calculate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayslipCalculationRequest {
    /// The employee being paid.
    pub employee: Employee,
    /// The inclusive pay period.
    pub pay_period: PayPeriod,
    /// The employee's attendance records.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    /// The employee's advances.
    #[serde(default)]
    pub advances: Vec<EmployeeAdvance>,
    /// How the advance deduction is determined.
    #[serde(default = "default_deduction_policy")]
    pub deduction_policy: DeductionPolicy,
    /// Payslips already saved for the employee, checked for overlap.
    #[serde(default)]
    pub existing_payslips: Vec<Payslip>,
}

fn default_deduction_policy() -> DeductionPolicy {
    DeductionPolicy::AdvancesInPeriod
}

/// Request body for `POST /attendance/grid`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceGridRequest {
    /// Employees to show, in display order.
    pub employees: Vec<Employee>,
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1 to 12.
    pub month: u32,
    /// Last day to show; the server's current date when absent.
    #[serde(default)]
    pub today: Option<NaiveDate>,
    /// Persisted attendance records.
    #[serde(default)]
    pub records: Vec<AttendanceRecord>,
}
