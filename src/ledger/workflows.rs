//! Finalize workflows.
//!
//! Each workflow reloads what it needs from the store and runs every check
//! that guards its writes before the first write. Nothing is written when a
//! check fails. A store error raised during the writes is returned as is;
//! writes already made by then are kept.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::calculation::{
    DeductionAllocation, InvoiceDraft, PayslipResult, allocate_deduction, available_challans,
    calculate_payslip, check_payslip_overlap, finalize_invoice,
};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Challan, DeductionPolicy, Employee, EmployeeAdvance, Invoice, PayPeriod, TaxRates,
};

use super::traits::{AdvanceSource, AttendanceSource, ChallanSource, InvoiceSink, PayslipSink};

/// Challans of a client within a date range that can still be invoiced.
///
/// Re-querying after an invoice is saved no longer returns its challans.
pub fn invoiceable_challans<L>(
    ledger: &L,
    client_name: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> EngineResult<Vec<Challan>>
where
    L: ChallanSource + InvoiceSink + ?Sized,
{
    let challans = ledger.challans_for_client(client_name, from, to)?;
    let invoices = ledger.invoices()?;
    Ok(available_challans(&challans, &invoices)
        .into_iter()
        .cloned()
        .collect())
}

/// Finalizes a draft against the invoices currently saved and persists it.
///
/// # Errors
///
/// Any error from [`finalize_invoice`], or from the store.
pub fn commit_invoice<S>(
    sink: &mut S,
    draft: InvoiceDraft,
    tax_rates: &TaxRates,
) -> EngineResult<(Uuid, Invoice)>
where
    S: InvoiceSink + ?Sized,
{
    let existing = sink.invoices()?;
    let invoice = finalize_invoice(draft, tax_rates, &existing)?;
    let id = sink.save_invoice(invoice.clone())?;
    Ok((id, invoice))
}

/// A saved payslip and what it did to the employee's advances.
#[derive(Debug, Clone)]
pub struct FinalizedPayslip {
    /// The id the store assigned.
    pub id: Uuid,
    /// The calculated, saved payslip and its audit trace.
    pub result: PayslipResult,
    /// Repayments booked against advances, when requested.
    pub allocation: Option<DeductionAllocation>,
}

/// Calculates, re-validates and saves a payslip.
///
/// The employee's payslips are reloaded and checked for overlap right
/// before the save. When `apply_to_advances` is set the deduction is booked
/// against the employee's advances, oldest first. The repayments are worked
/// out and checked before the payslip is saved, then written after it.
///
/// # Errors
///
/// - `Validation` for a missing employee, inverted period or negative deduction
/// - `Validation` for invalid stored attendance or advances
/// - `OverlappingPayslip` when a saved payslip overlaps the period
/// - any error from the store
pub fn commit_payslip<L>(
    ledger: &mut L,
    employee: &Employee,
    period: &PayPeriod,
    policy: DeductionPolicy,
    apply_to_advances: bool,
) -> EngineResult<FinalizedPayslip>
where
    L: AttendanceSource + AdvanceSource + PayslipSink + ?Sized,
{
    employee.validate()?;
    period.validate()?;

    let existing = ledger.payslips_for(&employee.id)?;
    check_payslip_overlap(&employee.id, period, &existing)?;

    let attendance = ledger.attendance_for(&employee.id, period)?;
    let mut advances = ledger.advances_for(&employee.id)?;
    let result = calculate_payslip(employee, period, &attendance, &advances, policy)?;

    let allocation = if apply_to_advances {
        let allocation = allocate_deduction(
            &employee.id,
            result.payslip.advance_deduction,
            &mut advances,
        );
        for repayment in &allocation.repayments {
            advance_after(&advances, &repayment.advance_id)?.validate()?;
        }
        Some(allocation)
    } else {
        None
    };

    let id = ledger.save_payslip(result.payslip.clone())?;
    if let Some(allocation) = &allocation {
        for repayment in &allocation.repayments {
            let advance = advance_after(&advances, &repayment.advance_id)?;
            ledger.update_paid_amount(&advance.id, advance.paid_amount)?;
        }
    }

    info!(
        id = %id,
        employee_id = %employee.id,
        period = %period,
        net = %result.payslip.net_salary,
        applied_to_advances = apply_to_advances,
        "Finalized payslip"
    );

    Ok(FinalizedPayslip {
        id,
        result,
        allocation,
    })
}

fn advance_after<'a>(
    advances: &'a [EmployeeAdvance],
    advance_id: &str,
) -> EngineResult<&'a EmployeeAdvance> {
    advances
        .iter()
        .find(|a| a.id == advance_id)
        .ok_or_else(|| EngineError::NotFound {
            entity: "advance".to_string(),
            id: advance_id.to_string(),
        })
}
