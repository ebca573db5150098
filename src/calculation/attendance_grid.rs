//! Monthly attendance grid for the editing screen.
//!
//! Every employee gets one cell per day of the month up to `today`. A day
//! with no persisted record is filled with a default (`Holiday` on Sundays,
//! `Present` otherwise) and flagged as synthesized. These defaults exist for
//! editing only; payroll never sees them.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AttendanceStatus, Employee};

/// One employee on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceCell {
    /// The day.
    pub date: NaiveDate,
    /// Morning half status.
    pub morning_status: AttendanceStatus,
    /// Evening half status.
    pub evening_status: AttendanceStatus,
    /// Morning overtime hours.
    pub morning_overtime_hours: Decimal,
    /// Evening overtime hours.
    pub evening_overtime_hours: Decimal,
    /// Meters produced.
    pub meters_produced: Decimal,
    /// True when no record exists and the cell holds the default.
    pub synthesized: bool,
}

/// One employee's row of cells.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRow {
    /// The employee id.
    pub employee_id: String,
    /// The employee name.
    pub employee_name: String,
    /// One cell per displayed day.
    pub cells: Vec<AttendanceCell>,
}

/// The attendance grid for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceGrid {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1 to 12.
    pub month: u32,
    /// Displayed days, from the 1st up to `today` or month end.
    pub days: Vec<NaiveDate>,
    /// One row per employee, in input order.
    pub rows: Vec<AttendanceRow>,
}

/// The default status for a day with no record.
pub fn default_status(date: NaiveDate) -> AttendanceStatus {
    if date.weekday() == Weekday::Sun {
        AttendanceStatus::Holiday
    } else {
        AttendanceStatus::Present
    }
}

/// Builds the monthly grid.
///
/// When an employee has two records for the same date, the first is shown.
///
/// # Errors
///
/// Returns a validation error when `month` is not a calendar month.
///
/// # Example
///
/// ```
/// use textile_billing::calculation::build_attendance_grid;
/// use textile_billing::models::{AttendanceStatus, Employee};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let employees = vec![Employee {
///     id: "emp_001".to_string(),
///     name: "Ramesh".to_string(),
///     daily_wage: Decimal::new(500, 0),
///     rate_per_meter: Decimal::ZERO,
/// }];
/// let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
///
/// let grid = build_attendance_grid(&employees, 2026, 3, today, &[]).unwrap();
/// assert_eq!(grid.days.len(), 2);
/// // 2026-03-01 is a Sunday
/// assert_eq!(grid.rows[0].cells[0].morning_status, AttendanceStatus::Holiday);
/// assert!(grid.rows[0].cells[1].synthesized);
/// ```
pub fn build_attendance_grid(
    employees: &[Employee],
    year: i32,
    month: u32,
    today: NaiveDate,
    records: &[AttendanceRecord],
) -> EngineResult<AttendanceGrid> {
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
        EngineError::validation("month", format!("{}-{} is not a calendar month", year, month))
    })?;

    let days: Vec<NaiveDate> = first
        .iter_days()
        .take_while(|d| d.month() == month && *d <= today)
        .collect();

    let mut by_key: HashMap<(&str, NaiveDate), &AttendanceRecord> = HashMap::new();
    for record in records {
        by_key
            .entry((record.employee_id.as_str(), record.date))
            .or_insert(record);
    }

    let rows = employees
        .iter()
        .map(|employee| AttendanceRow {
            employee_id: employee.id.clone(),
            employee_name: employee.name.clone(),
            cells: days
                .iter()
                .map(|&date| match by_key.get(&(employee.id.as_str(), date)) {
                    Some(record) => AttendanceCell {
                        date,
                        morning_status: record.morning_status,
                        evening_status: record.evening_status,
                        morning_overtime_hours: record.morning_overtime_hours,
                        evening_overtime_hours: record.evening_overtime_hours,
                        meters_produced: record.meters_produced,
                        synthesized: false,
                    },
                    None => {
                        let status = default_status(date);
                        AttendanceCell {
                            date,
                            morning_status: status,
                            evening_status: status,
                            morning_overtime_hours: Decimal::ZERO,
                            evening_overtime_hours: Decimal::ZERO,
                            meters_produced: Decimal::ZERO,
                            synthesized: true,
                        }
                    }
                })
                .collect(),
        })
        .collect();

    Ok(AttendanceGrid {
        year,
        month,
        days,
        rows,
    })
}
