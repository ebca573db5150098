//! Payslip calculation.
//!
//! Earnings come from the attendance summary of the pay period: paid
//! half-days at the daily wage plus meters at the rate per meter. The advance
//! deduction follows the chosen [`DeductionPolicy`] and is taken from gross
//! to give net pay.

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AuditStep, AuditTrace, AuditWarning, DeductionPolicy, Employee,
    EmployeeAdvance, PayPeriod, Payslip,
};

use super::advances::{advances_in_period_total, outstanding_balance};
use super::attendance_summary::{AttendanceSummary, summarize_attendance};

/// Warning code when a manual deduction was reduced to its cap.
pub const DEDUCTION_CAPPED_WARNING: &str = "DEDUCTION_CAPPED";
/// Warning code when the in-period advances exceed gross pay.
pub const DEDUCTION_EXCEEDS_GROSS_WARNING: &str = "DEDUCTION_EXCEEDS_GROSS";
/// Warning code when the in-period advances exceed what is still owed.
pub const DEDUCTION_EXCEEDS_OUTSTANDING_WARNING: &str = "DEDUCTION_EXCEEDS_OUTSTANDING";

/// A calculated payslip with its attendance summary and audit trace.
#[derive(Debug, Clone)]
pub struct PayslipResult {
    /// The calculated payslip.
    pub payslip: Payslip,
    /// The attendance figures the payslip was built from.
    pub attendance: AttendanceSummary,
    /// Every step of the calculation plus warnings.
    pub audit_trace: AuditTrace,
}

/// The largest manual deduction allowed: `min(gross, outstanding)`, not below zero.
pub fn deduction_cap(gross_salary: Decimal, outstanding_before: Decimal) -> Decimal {
    gross_salary.min(outstanding_before).max(Decimal::ZERO)
}

/// Calculates a payslip for one employee and period.
///
/// Attendance records of other employees are ignored, as are days without
/// a record. No rounding is applied.
///
/// # Errors
///
/// - `Validation` when the employee is missing or has negative pay rates
/// - `Validation` when the period starts after it ends
/// - `Validation` when a manual deduction is negative
/// - `Validation` when one of the employee's attendance records has negative
///   meters or overtime
/// - `Validation` when one of the employee's advances has a non-positive
///   amount or a paid amount outside `0..=amount`
///
/// # Example
///
/// ```
/// use textile_billing::calculation::calculate_payslip;
/// use textile_billing::models::{DeductionPolicy, Employee, PayPeriod};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employee = Employee {
///     id: "emp_001".to_string(),
///     name: "Ramesh".to_string(),
///     daily_wage: Decimal::new(500, 0),
///     rate_per_meter: Decimal::new(2, 0),
/// };
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
/// ).unwrap();
///
/// let result = calculate_payslip(&employee, &period, &[], &[], DeductionPolicy::AdvancesInPeriod).unwrap();
/// assert!(result.payslip.gross_salary.is_zero());
/// ```
pub fn calculate_payslip(
    employee: &Employee,
    period: &PayPeriod,
    attendance: &[AttendanceRecord],
    advances: &[EmployeeAdvance],
    policy: DeductionPolicy,
) -> EngineResult<PayslipResult> {
    let start = Instant::now();
    employee.validate()?;
    period.validate()?;
    if let DeductionPolicy::Manual { amount } = policy {
        if amount < Decimal::ZERO {
            return Err(EngineError::validation(
                "advance_deduction",
                "deduction must not be negative",
            ));
        }
    }
    for record in attendance.iter().filter(|r| r.employee_id == employee.id) {
        record.validate()?;
    }
    for advance in advances.iter().filter(|a| a.employee_id == employee.id) {
        advance.validate()?;
    }

    let mut trace = AuditTrace::default();

    let summary = summarize_attendance(&employee.id, period, attendance, trace.next_step_number());
    trace.steps.push(summary.audit_step);
    let summary = summary.summary;

    let wage_earnings = summary.working_days * employee.daily_wage;
    let production_earnings = summary.meters_produced * employee.rate_per_meter;
    let gross_salary = wage_earnings + production_earnings;
    let step_number = trace.next_step_number();
    trace.steps.push(AuditStep {
        step_number,
        rule_id: "earnings".to_string(),
        rule_name: "Wage and Production Earnings".to_string(),
        input: serde_json::json!({
            "working_days": summary.working_days.normalize().to_string(),
            "daily_wage": employee.daily_wage.normalize().to_string(),
            "meters_produced": summary.meters_produced.normalize().to_string(),
            "rate_per_meter": employee.rate_per_meter.normalize().to_string()
        }),
        output: serde_json::json!({
            "wage_earnings": wage_earnings.normalize().to_string(),
            "production_earnings": production_earnings.normalize().to_string(),
            "gross_salary": gross_salary.normalize().to_string()
        }),
        reasoning: format!(
            "{} days x {} + {} m x {} = {}",
            summary.working_days.normalize(),
            employee.daily_wage.normalize(),
            summary.meters_produced.normalize(),
            employee.rate_per_meter.normalize(),
            gross_salary.normalize()
        ),
    });

    let outstanding_before = outstanding_balance(&employee.id, advances);
    let advance_deduction = match policy {
        DeductionPolicy::AdvancesInPeriod => {
            let total = advances_in_period_total(&employee.id, period, advances);
            if total > gross_salary {
                warn!(
                    employee_id = %employee.id,
                    deduction = %total,
                    gross = %gross_salary,
                    "Advances in period exceed gross salary"
                );
                trace.warnings.push(AuditWarning::new(
                    DEDUCTION_EXCEEDS_GROSS_WARNING,
                    format!(
                        "Advances dated in {} total {} which exceeds gross salary {}",
                        period,
                        total.normalize(),
                        gross_salary.normalize()
                    ),
                    "high",
                ));
            }
            if total > outstanding_before {
                warn!(
                    employee_id = %employee.id,
                    deduction = %total,
                    outstanding = %outstanding_before,
                    "Advances in period exceed outstanding balance"
                );
                trace.warnings.push(AuditWarning::new(
                    DEDUCTION_EXCEEDS_OUTSTANDING_WARNING,
                    format!(
                        "Advances dated in {} total {} but only {} is still outstanding",
                        period,
                        total.normalize(),
                        outstanding_before.normalize()
                    ),
                    "medium",
                ));
            }
            total
        }
        DeductionPolicy::Manual { amount } => {
            let cap = deduction_cap(gross_salary, outstanding_before);
            if amount > cap {
                trace.warnings.push(AuditWarning::new(
                    DEDUCTION_CAPPED_WARNING,
                    format!(
                        "Requested deduction {} reduced to {} (lower of gross salary and outstanding advances)",
                        amount.normalize(),
                        cap.normalize()
                    ),
                    "medium",
                ));
                cap
            } else {
                amount
            }
        }
    };
    let net_salary = gross_salary - advance_deduction;
    let outstanding_after = outstanding_before - advance_deduction;

    let step_number = trace.next_step_number();
    trace.steps.push(AuditStep {
        step_number,
        rule_id: "advance_deduction".to_string(),
        rule_name: "Advance Deduction".to_string(),
        input: serde_json::json!({
            "policy": policy,
            "outstanding_before": outstanding_before.normalize().to_string(),
            "gross_salary": gross_salary.normalize().to_string()
        }),
        output: serde_json::json!({
            "advance_deduction": advance_deduction.normalize().to_string(),
            "net_salary": net_salary.normalize().to_string(),
            "outstanding_after": outstanding_after.normalize().to_string()
        }),
        reasoning: match policy {
            DeductionPolicy::AdvancesInPeriod => format!(
                "Deducted advances dated {} totalling {}",
                period,
                advance_deduction.normalize()
            ),
            DeductionPolicy::Manual { .. } => format!(
                "Deducted {} as entered, capped at {}",
                advance_deduction.normalize(),
                deduction_cap(gross_salary, outstanding_before).normalize()
            ),
        },
    });
    trace.duration_us = start.elapsed().as_micros() as u64;

    info!(
        employee_id = %employee.id,
        period = %period,
        gross = %gross_salary,
        net = %net_salary,
        "Calculated payslip"
    );

    Ok(PayslipResult {
        payslip: Payslip {
            employee_id: employee.id.clone(),
            pay_period: *period,
            total_working_days: summary.working_days,
            total_overtime_hours: summary.overtime_hours,
            total_meters: summary.meters_produced,
            wage_earnings,
            production_earnings,
            gross_salary,
            deduction_policy: policy,
            advance_deduction,
            net_salary,
            outstanding_advance_before: outstanding_before,
            outstanding_advance_after: outstanding_after,
        },
        attendance: summary,
        audit_trace: trace,
    })
}
