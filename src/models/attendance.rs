//! Attendance records.
//!
//! Each record covers one employee on one date, split into a morning and an
//! evening half.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Status of one half-day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttendanceStatus {
    /// Worked the half-day.
    Present,
    /// Did not come in.
    Absent,
    /// On approved leave.
    Leave,
    /// Paid holiday.
    Holiday,
}

impl AttendanceStatus {
    /// Returns true if the half-day earns wage credit.
    ///
    /// ```
    /// use textile_billing::models::AttendanceStatus;
    ///
    /// assert!(AttendanceStatus::Holiday.is_paid());
    /// assert!(!AttendanceStatus::Leave.is_paid());
    /// ```
    pub fn is_paid(self) -> bool {
        matches!(self, AttendanceStatus::Present | AttendanceStatus::Holiday)
    }
}

/// A persisted attendance record for one employee and date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee this record belongs to.
    pub employee_id: String,
    /// The attendance date.
    pub date: NaiveDate,
    /// Morning half status.
    pub morning_status: AttendanceStatus,
    /// Evening half status.
    pub evening_status: AttendanceStatus,
    /// Overtime hours worked in the morning.
    #[serde(default)]
    pub morning_overtime_hours: Decimal,
    /// Overtime hours worked in the evening.
    #[serde(default)]
    pub evening_overtime_hours: Decimal,
    /// Meters of fabric produced that day.
    #[serde(default)]
    pub meters_produced: Decimal,
    /// When the record was created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// When the record was last edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl AttendanceRecord {
    /// Total overtime hours for the day.
    pub fn overtime_hours(&self) -> Decimal {
        self.morning_overtime_hours + self.evening_overtime_hours
    }

    /// Rejects negative meters or overtime.
    pub fn validate(&self) -> EngineResult<()> {
        let fields = [
            ("morning_overtime_hours", self.morning_overtime_hours),
            ("evening_overtime_hours", self.evening_overtime_hours),
            ("meters_produced", self.meters_produced),
        ];
        for (field, value) in fields {
            if value < Decimal::ZERO {
                return Err(EngineError::validation(
                    field,
                    format!("{} on {} must not be negative", value, self.date),
                ));
            }
        }
        Ok(())
    }
}
