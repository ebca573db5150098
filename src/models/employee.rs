//! Employee and advance models.
//!
//! This module defines the [`Employee`] wage parameters used by payroll and
//! the [`EmployeeAdvance`] records that payroll deducts from.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Represents a mill worker paid by the day and by production.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// The employee's name.
    pub name: String,
    /// Wage paid for one full working day.
    pub daily_wage: Decimal,
    /// Production incentive per meter produced.
    #[serde(default)]
    pub rate_per_meter: Decimal,
}

impl Employee {
    /// Checks that the employee can be used for a payroll run.
    ///
    /// # Examples
    ///
    /// ```
    /// use textile_billing::models::Employee;
    /// use rust_decimal::Decimal;
    ///
    /// let employee = Employee {
    ///     id: "emp_001".to_string(),
    ///     name: "Ramesh".to_string(),
    ///     daily_wage: Decimal::new(500, 0),
    ///     rate_per_meter: Decimal::new(2, 0),
    /// };
    /// assert!(employee.validate().is_ok());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::validation("employee_id", "no employee selected"));
        }
        if self.daily_wage.is_sign_negative() {
            return Err(EngineError::validation(
                "daily_wage",
                "must not be negative",
            ));
        }
        if self.rate_per_meter.is_sign_negative() {
            return Err(EngineError::validation(
                "rate_per_meter",
                "must not be negative",
            ));
        }
        Ok(())
    }
}

/// Money advanced to an employee, repaid through payroll deductions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeAdvance {
    /// Unique identifier of the advance.
    pub id: String,
    /// The employee who received the advance.
    pub employee_id: String,
    /// The date the advance was paid out.
    pub date: NaiveDate,
    /// Principal amount.
    pub amount: Decimal,
    /// Amount repaid so far.
    #[serde(default)]
    pub paid_amount: Decimal,
    /// Why the advance was given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl EmployeeAdvance {
    /// The amount still owed on this advance.
    ///
    /// ```
    /// use textile_billing::models::EmployeeAdvance;
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let advance = EmployeeAdvance {
    ///     id: "adv_1".to_string(),
    ///     employee_id: "emp_001".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
    ///     amount: Decimal::new(1000, 0),
    ///     paid_amount: Decimal::new(250, 0),
    ///     reason: None,
    /// };
    /// assert_eq!(advance.outstanding(), Decimal::new(750, 0));
    /// ```
    pub fn outstanding(&self) -> Decimal {
        self.amount - self.paid_amount
    }

    /// Checks that the principal is positive and the repaid amount lies
    /// between zero and the principal.
    pub fn validate(&self) -> EngineResult<()> {
        if self.amount <= Decimal::ZERO {
            return Err(EngineError::validation(
                "amount",
                format!("advance '{}' must have a positive amount", self.id),
            ));
        }
        if self.paid_amount < Decimal::ZERO || self.paid_amount > self.amount {
            return Err(EngineError::validation(
                "paid_amount",
                format!(
                    "advance '{}' has paid amount {} outside 0 to {}",
                    self.id, self.paid_amount, self.amount
                ),
            ));
        }
        Ok(())
    }
}
