//! Core data models for the billing engine.
//!
//! This module contains the input records (challans, clients, attendance,
//! employees, advances) and the documents the calculators produce.

mod attendance;
mod calculation_result;
mod challan;
mod client;
mod employee;
mod invoice;
mod pay_period;
mod payslip;

pub use attendance::{AttendanceRecord, AttendanceStatus};
pub use calculation_result::{AuditStep, AuditTrace, AuditWarning, CalculationResult};
pub use challan::{Challan, ChallanStatus, MAX_CHALLAN_METERS, MAX_CHALLAN_PIECES};
pub use client::{Client, ClientProcessRate, MAX_PROCESS_RATE, process_key};
pub use employee::{Employee, EmployeeAdvance};
pub use invoice::{
    CHALLAN_NUMBER_SEPARATOR, Invoice, InvoiceItem, InvoiceTotals, InvoiceType, TaxRates, TaxType,
    parse_challan_numbers,
};
pub use pay_period::PayPeriod;
pub use payslip::{DeductionPolicy, Payslip};
