//! Calculation logic for the billing engine.
//!
//! This module contains the pure calculators: process rate resolution,
//! challan availability, invoice aggregation and totals, invoice drafting
//! and finalisation, client statements, attendance summaries and the monthly
//! attendance grid, advance bookkeeping, payslip calculation and payslip
//! overlap detection.

mod advances;
mod attendance_grid;
mod attendance_summary;
mod challan_availability;
mod client_statement;
mod invoice_aggregation;
mod invoice_builder;
mod invoice_totals;
mod payroll;
mod payslip_overlap;
mod rates;

pub use advances::{
    AdvanceRepayment, DeductionAllocation, advances_in_period_total, allocate_deduction,
    outstanding_balance,
};
pub use attendance_grid::{
    AttendanceCell, AttendanceGrid, AttendanceRow, build_attendance_grid, default_status,
};
pub use attendance_summary::{
    AttendanceSummary, AttendanceSummaryResult, HALF_DAY_CREDIT, HalfDayCounts, day_credit,
    summarize_attendance,
};
pub use challan_availability::{
    available_challans, find_billing_invoice, invoiced_challan_numbers,
    is_available_for_invoicing,
};
pub use client_statement::{
    ClientStatement, ClientStatementResult, StatementLine, build_client_statement,
};
pub use invoice_aggregation::{
    AggregationOptions, InvoiceAggregationResult, ZERO_RATE_WARNING, aggregate_challans,
    item_description,
};
pub use invoice_builder::{
    CHALLAN_UNAVAILABLE_WARNING, InvoiceDraft, InvoiceDraftResult, MAX_ITEM_METERS,
    finalize_invoice, prepare_invoice_draft,
};
pub use invoice_totals::{
    InvoiceTotalsResult, calculate_invoice_totals, recalculate_items, round_to_whole,
};
pub use payroll::{
    DEDUCTION_CAPPED_WARNING, DEDUCTION_EXCEEDS_GROSS_WARNING,
    DEDUCTION_EXCEEDS_OUTSTANDING_WARNING, PayslipResult, calculate_payslip, deduction_cap,
};
pub use payslip_overlap::{check_payslip_overlap, find_overlapping_payslip};
pub use rates::{
    RateBook, RateOrigin, RateResolution, RateSource, resolve_process_rate,
    resolve_statement_rate,
};
