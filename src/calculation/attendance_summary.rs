//! Attendance credit and summary over a date range.
//!
//! Every calendar date in the period is visited once. A date with no
//! persisted record contributes nothing: it is not treated as present.
//! Each half-day marked `Present` or `Holiday` earns half a working day.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{AttendanceRecord, AttendanceStatus, AuditStep, PayPeriod};

/// Working-day credit for one paid half-day.
pub const HALF_DAY_CREDIT: Decimal = Decimal::from_parts(5, 0, 0, false, 1);

/// Half-day counts by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HalfDayCounts {
    /// Half-days marked present.
    pub present: u32,
    /// Half-days marked absent.
    pub absent: u32,
    /// Half-days marked as leave.
    pub leave: u32,
    /// Half-days marked as holiday.
    pub holiday: u32,
}

impl HalfDayCounts {
    fn add(&mut self, status: AttendanceStatus) {
        match status {
            AttendanceStatus::Present => self.present += 1,
            AttendanceStatus::Absent => self.absent += 1,
            AttendanceStatus::Leave => self.leave += 1,
            AttendanceStatus::Holiday => self.holiday += 1,
        }
    }
}

/// Attendance totals for one employee over one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceSummary {
    /// The employee summarised.
    pub employee_id: String,
    /// The period summarised.
    pub period: PayPeriod,
    /// Paid half-days times 0.5.
    pub working_days: Decimal,
    /// Morning plus evening overtime.
    pub overtime_hours: Decimal,
    /// Meters produced.
    pub meters_produced: Decimal,
    /// Half-day counts by status.
    pub half_days: HalfDayCounts,
    /// Dates in the period that had a record.
    pub recorded_days: u32,
    /// Dates in the period with no record.
    pub missing_days: u32,
}

/// Result of summarising attendance.
#[derive(Debug, Clone)]
pub struct AttendanceSummaryResult {
    /// The calculated summary.
    pub summary: AttendanceSummary,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Working-day credit of a single record: 0, 0.5 or 1.
pub fn day_credit(record: &AttendanceRecord) -> Decimal {
    [record.morning_status, record.evening_status]
        .into_iter()
        .filter(|s| s.is_paid())
        .map(|_| HALF_DAY_CREDIT)
        .sum()
}

/// Summarises one employee's attendance over a period.
///
/// Records for other employees or outside the period are ignored. When the
/// same date is recorded twice, the first record is used.
///
/// # Example
///
/// ```
/// use textile_billing::calculation::summarize_attendance;
/// use textile_billing::models::PayPeriod;
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let period = PayPeriod::new(
///     NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2026, 3, 31).unwrap(),
/// ).unwrap();
///
/// let result = summarize_attendance("emp_001", &period, &[], 1);
/// assert_eq!(result.summary.working_days, Decimal::ZERO);
/// assert_eq!(result.summary.missing_days, 31);
/// ```
pub fn summarize_attendance(
    employee_id: &str,
    period: &PayPeriod,
    records: &[AttendanceRecord],
    step_number: u32,
) -> AttendanceSummaryResult {
    let mut by_date: HashMap<NaiveDate, &AttendanceRecord> = HashMap::new();
    for record in records.iter().filter(|r| r.employee_id == employee_id) {
        by_date.entry(record.date).or_insert(record);
    }

    let mut working_days = Decimal::ZERO;
    let mut overtime_hours = Decimal::ZERO;
    let mut meters_produced = Decimal::ZERO;
    let mut half_days = HalfDayCounts::default();
    let mut recorded_days = 0;
    let mut missing_days = 0;

    for date in period.days() {
        let Some(record) = by_date.get(&date) else {
            missing_days += 1;
            continue;
        };
        recorded_days += 1;
        half_days.add(record.morning_status);
        half_days.add(record.evening_status);
        working_days += day_credit(record);
        overtime_hours += record.overtime_hours();
        meters_produced += record.meters_produced;
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "attendance_credit".to_string(),
        rule_name: "Attendance Working-Day Credit".to_string(),
        input: serde_json::json!({
            "employee_id": employee_id,
            "start_date": period.start_date.to_string(),
            "end_date": period.end_date.to_string(),
            "records_supplied": records.len()
        }),
        output: serde_json::json!({
            "working_days": working_days.normalize().to_string(),
            "overtime_hours": overtime_hours.normalize().to_string(),
            "meters_produced": meters_produced.normalize().to_string(),
            "recorded_days": recorded_days,
            "missing_days": missing_days
        }),
        reasoning: format!(
            "{} recorded days earned {} working days; {} days had no record and earned nothing",
            recorded_days,
            working_days.normalize(),
            missing_days
        ),
    };

    AttendanceSummaryResult {
        summary: AttendanceSummary {
            employee_id: employee_id.to_string(),
            period: *period,
            working_days,
            overtime_hours,
            meters_produced,
            half_days,
            recorded_days,
            missing_days,
        },
        audit_step,
    }
}
