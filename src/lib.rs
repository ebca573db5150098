//! Billing and payroll calculation engine for textile process houses.
//!
//! This crate turns operational records (delivery challans, attendance,
//! employee advances) into financial documents (invoices, client statements,
//! payslips). The calculators are pure functions; persistence and HTTP are
//! thin adapters in [`ledger`] and [`api`].

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ledger;
pub mod models;
