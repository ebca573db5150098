//! Persistence seam for the calculators.
//!
//! This module defines the collaborator traits a store implements, an
//! in-memory implementation, and the finalize workflows that re-validate
//! against stored state before saving invoices and payslips.
//!
//! # Example
//!
//! ```
//! use textile_billing::ledger::{MemoryLedger, PayslipSink, commit_payslip};
//! use textile_billing::models::{DeductionPolicy, Employee, PayPeriod};
//! use chrono::NaiveDate;
//! use rust_decimal::Decimal;
//!
//! let mut ledger = MemoryLedger::new();
//! let employee = Employee {
//!     id: "emp_001".to_string(),
//!     name: "Ramesh".to_string(),
//!     daily_wage: Decimal::new(500, 0),
//!     rate_per_meter: Decimal::ZERO,
//! };
//! let period = PayPeriod::new(
//!     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
//! ).unwrap();
//!
//! commit_payslip(&mut ledger, &employee, &period, DeductionPolicy::AdvancesInPeriod, false).unwrap();
//! assert_eq!(ledger.payslips_for("emp_001").unwrap().len(), 1);
//! ```

mod memory;
mod traits;
mod workflows;

pub use memory::MemoryLedger;
pub use traits::{AdvanceSource, AttendanceSource, ChallanSource, InvoiceSink, PayslipSink};
pub use workflows::{FinalizedPayslip, commit_invoice, commit_payslip, invoiceable_challans};
