//! Advance balance bookkeeping.
//!
//! Outstanding balances are always taken over all of an employee's advances.
//! Repayments are allocated to the oldest advances first and never raise an
//! advance's `paid_amount` above its principal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{EmployeeAdvance, PayPeriod};

/// Amount applied to one advance by a deduction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceRepayment {
    /// The advance repaid.
    pub advance_id: String,
    /// The amount applied to it.
    pub applied: Decimal,
    /// Its outstanding balance afterwards.
    pub remaining: Decimal,
}

/// The outcome of applying a deduction to advances.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionAllocation {
    /// Repayments in the order they were applied.
    pub repayments: Vec<AdvanceRepayment>,
    /// Part of the deduction that found no outstanding advance.
    pub unallocated: Decimal,
}

/// Sum of `amount - paid_amount` over every advance of the employee.
///
/// ```
/// use textile_billing::calculation::outstanding_balance;
/// use textile_billing::models::EmployeeAdvance;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let advances = vec![EmployeeAdvance {
///     id: "adv_1".to_string(),
///     employee_id: "emp_001".to_string(),
///     date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
///     amount: Decimal::new(1500, 0),
///     paid_amount: Decimal::new(500, 0),
///     reason: None,
/// }];
/// assert_eq!(outstanding_balance("emp_001", &advances), Decimal::new(1000, 0));
/// assert_eq!(outstanding_balance("emp_002", &advances), Decimal::ZERO);
/// ```
pub fn outstanding_balance(employee_id: &str, advances: &[EmployeeAdvance]) -> Decimal {
    advances
        .iter()
        .filter(|a| a.employee_id == employee_id)
        .map(EmployeeAdvance::outstanding)
        .sum()
}

/// Sum of the principal of the employee's advances dated inside the period.
pub fn advances_in_period_total(
    employee_id: &str,
    period: &PayPeriod,
    advances: &[EmployeeAdvance],
) -> Decimal {
    advances
        .iter()
        .filter(|a| a.employee_id == employee_id && period.contains_date(a.date))
        .map(|a| a.amount)
        .sum()
}

/// Applies a deduction to the employee's advances, oldest first.
///
/// Advances are ordered by date, then id. Each one absorbs at most its
/// outstanding balance; anything left over is reported as `unallocated`.
pub fn allocate_deduction(
    employee_id: &str,
    deduction: Decimal,
    advances: &mut [EmployeeAdvance],
) -> DeductionAllocation {
    let mut allocation = DeductionAllocation::default();
    if deduction <= Decimal::ZERO {
        return allocation;
    }

    let mut order: Vec<usize> = (0..advances.len())
        .filter(|&i| advances[i].employee_id == employee_id)
        .collect();
    order.sort_by(|&a, &b| {
        advances[a]
            .date
            .cmp(&advances[b].date)
            .then_with(|| advances[a].id.cmp(&advances[b].id))
    });

    let mut remaining = deduction;
    for i in order {
        if remaining.is_zero() {
            break;
        }
        let advance = &mut advances[i];
        let outstanding = advance.outstanding();
        if outstanding <= Decimal::ZERO {
            continue;
        }
        let applied = remaining.min(outstanding);
        advance.paid_amount += applied;
        remaining -= applied;
        allocation.repayments.push(AdvanceRepayment {
            advance_id: advance.id.clone(),
            applied,
            remaining: advance.outstanding(),
        });
    }

    allocation.unallocated = remaining;
    debug!(
        employee_id = %employee_id,
        deduction = %deduction,
        repayments = allocation.repayments.len(),
        unallocated = %allocation.unallocated,
        "Allocated deduction to advances"
    );
    allocation
}
