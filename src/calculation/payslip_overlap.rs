//! Payslip overlap detection.

use tracing::warn;

use crate::error::{EngineError, EngineResult};
use crate::models::{PayPeriod, Payslip};

/// Finds the first existing payslip of the employee whose period overlaps.
pub fn find_overlapping_payslip<'a>(
    employee_id: &str,
    period: &PayPeriod,
    existing: &'a [Payslip],
) -> Option<&'a Payslip> {
    existing
        .iter()
        .filter(|p| p.employee_id == employee_id)
        .find(|p| p.pay_period.overlaps(period))
}

/// Rejects a pay period that overlaps one of the employee's payslips.
///
/// Adjacent periods such as the 1st to the 15th and the 16th to the 31st do
/// not overlap.
///
/// # Errors
///
/// Returns `OverlappingPayslip` naming the conflicting period.
pub fn check_payslip_overlap(
    employee_id: &str,
    period: &PayPeriod,
    existing: &[Payslip],
) -> EngineResult<()> {
    match find_overlapping_payslip(employee_id, period, existing) {
        Some(conflict) => {
            warn!(
                employee_id = %employee_id,
                requested = %period,
                existing = %conflict.pay_period,
                "Rejected overlapping payslip period"
            );
            Err(EngineError::OverlappingPayslip {
                employee_id: employee_id.to_string(),
                existing_start: conflict.pay_period.start_date,
                existing_end: conflict.pay_period.end_date,
            })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DeductionPolicy;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn period(start: u32, end: u32) -> PayPeriod {
        PayPeriod::new(
            NaiveDate::from_ymd_opt(2026, 3, start).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, end).unwrap(),
        )
        .unwrap()
    }

    fn payslip(employee_id: &str, pay_period: PayPeriod) -> Payslip {
        Payslip {
            employee_id: employee_id.to_string(),
            pay_period,
            total_working_days: Decimal::ZERO,
            total_overtime_hours: Decimal::ZERO,
            total_meters: Decimal::ZERO,
            wage_earnings: Decimal::ZERO,
            production_earnings: Decimal::ZERO,
            gross_salary: Decimal::ZERO,
            deduction_policy: DeductionPolicy::AdvancesInPeriod,
            advance_deduction: Decimal::ZERO,
            net_salary: Decimal::ZERO,
            outstanding_advance_before: Decimal::ZERO,
            outstanding_advance_after: Decimal::ZERO,
        }
    }

    #[test]
    fn test_adjacent_periods_are_accepted() {
        let existing = vec![payslip("emp_001", period(1, 15))];
        assert!(check_payslip_overlap("emp_001", &period(16, 31), &existing).is_ok());
    }

    #[test]
    fn test_overlapping_period_names_conflict() {
        let existing = vec![payslip("emp_001", period(1, 15))];
        match check_payslip_overlap("emp_001", &period(10, 20), &existing) {
            Err(EngineError::OverlappingPayslip {
                existing_start,
                existing_end,
                ..
            }) => {
                assert_eq!(existing_start, NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
                assert_eq!(existing_end, NaiveDate::from_ymd_opt(2026, 3, 15).unwrap());
            }
            other => panic!("Expected OverlappingPayslip, got {:?}", other),
        }
    }

    #[test]
    fn test_shared_boundary_day_overlaps() {
        let existing = vec![payslip("emp_001", period(1, 15))];
        assert!(check_payslip_overlap("emp_001", &period(15, 31), &existing).is_err());
    }

    #[test]
    fn test_contained_period_overlaps() {
        let existing = vec![payslip("emp_001", period(1, 31))];
        assert!(check_payslip_overlap("emp_001", &period(5, 6), &existing).is_err());
    }

    #[test]
    fn test_other_employee_does_not_conflict() {
        let existing = vec![payslip("emp_002", period(1, 31))];
        assert!(check_payslip_overlap("emp_001", &period(1, 31), &existing).is_ok());
    }
}
