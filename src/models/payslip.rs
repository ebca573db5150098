//! Payslip model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::PayPeriod;

/// How the advance deduction on a payslip was decided.
///
/// # Example
///
/// ```
/// use textile_billing::models::DeductionPolicy;
///
/// let policy: DeductionPolicy = serde_json::from_str(r#"{"mode":"manual","amount":"300"}"#).unwrap();
/// assert!(matches!(policy, DeductionPolicy::Manual { .. }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DeductionPolicy {
    /// Deduct the principal of every advance dated inside the pay period.
    AdvancesInPeriod,
    /// Deduct an amount entered by the operator, capped at
    /// `min(gross salary, outstanding balance)`.
    Manual {
        /// The requested deduction.
        amount: Decimal,
    },
}

/// The earnings and deductions of one employee for one pay period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payslip {
    /// The employee paid.
    pub employee_id: String,
    /// The period covered (inclusive).
    pub pay_period: PayPeriod,
    /// Sum of half-day credits.
    pub total_working_days: Decimal,
    /// Sum of morning and evening overtime hours.
    pub total_overtime_hours: Decimal,
    /// Meters produced in the period.
    pub total_meters: Decimal,
    /// `total_working_days * daily_wage`.
    pub wage_earnings: Decimal,
    /// `total_meters * rate_per_meter`.
    pub production_earnings: Decimal,
    /// `wage_earnings + production_earnings`.
    pub gross_salary: Decimal,
    /// The mode used to decide `advance_deduction`.
    pub deduction_policy: DeductionPolicy,
    /// Advance repayment taken from this payslip.
    pub advance_deduction: Decimal,
    /// `gross_salary - advance_deduction`.
    pub net_salary: Decimal,
    /// Outstanding advances before this deduction.
    pub outstanding_advance_before: Decimal,
    /// Outstanding advances after this deduction.
    pub outstanding_advance_after: Decimal,
}
