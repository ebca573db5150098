//! Pay period model.
//!
//! This module contains the [`PayPeriod`] type: the inclusive date range a
//! payslip covers.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// An inclusive date range that a payslip covers.
///
/// # Example
///
/// ```
/// use textile_billing::models::PayPeriod;
/// use chrono::NaiveDate;
///
/// let period = PayPeriod {
///     start_date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
///     end_date: NaiveDate::from_ymd_opt(2026, 3, 15).unwrap(),
/// };
///
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2026, 3, 15).unwrap()));
/// assert_eq!(period.days().count(), 15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// The first day of the period (inclusive).
    pub start_date: NaiveDate,
    /// The last day of the period (inclusive).
    pub end_date: NaiveDate,
}

impl PayPeriod {
    /// Creates a pay period, rejecting an inverted range.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> EngineResult<Self> {
        let period = Self {
            start_date,
            end_date,
        };
        period.validate()?;
        Ok(period)
    }

    /// Rejects a period whose start is after its end.
    pub fn validate(&self) -> EngineResult<()> {
        if self.start_date > self.end_date {
            return Err(EngineError::validation(
                "start_date",
                format!(
                    "start date {} is after end date {}",
                    self.start_date, self.end_date
                ),
            ));
        }
        Ok(())
    }

    /// Checks if a given date falls within this pay period (inclusive).
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Checks if two periods share at least one day.
    ///
    /// ```
    /// use textile_billing::models::PayPeriod;
    /// use chrono::NaiveDate;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2026, 3, day).unwrap();
    /// let first = PayPeriod { start_date: d(1), end_date: d(15) };
    /// let second = PayPeriod { start_date: d(16), end_date: d(31) };
    /// let straddling = PayPeriod { start_date: d(15), end_date: d(20) };
    ///
    /// assert!(!first.overlaps(&second));
    /// assert!(first.overlaps(&straddling));
    /// ```
    pub fn overlaps(&self, other: &PayPeriod) -> bool {
        other.start_date <= self.end_date && self.start_date <= other.end_date
    }

    /// Iterates every calendar date in the period, in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.start_date
            .iter_days()
            .take_while(move |d| *d <= self.end_date)
    }
}

impl std::fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} to {}", self.start_date, self.end_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn period(start: NaiveDate, end: NaiveDate) -> PayPeriod {
        PayPeriod {
            start_date: start,
            end_date: end,
        }
    }

    #[test]
    fn test_new_rejects_inverted_range() {
        let result = PayPeriod::new(d(2026, 3, 10), d(2026, 3, 1));
        match result {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "start_date"),
            other => panic!("Expected Validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_single_day_period_is_valid() {
        let p = PayPeriod::new(d(2026, 3, 1), d(2026, 3, 1)).unwrap();
        assert_eq!(p.days().collect::<Vec<_>>(), vec![d(2026, 3, 1)]);
    }

    #[test]
    fn test_days_cross_month_boundary() {
        let p = period(d(2026, 2, 27), d(2026, 3, 2));
        let days: Vec<_> = p.days().collect();
        assert_eq!(
            days,
            vec![d(2026, 2, 27), d(2026, 2, 28), d(2026, 3, 1), d(2026, 3, 2)]
        );
    }

    #[test]
    fn test_contains_date_bounds() {
        let p = period(d(2026, 3, 1), d(2026, 3, 15));
        assert!(p.contains_date(d(2026, 3, 1)));
        assert!(p.contains_date(d(2026, 3, 15)));
        assert!(!p.contains_date(d(2026, 2, 28)));
        assert!(!p.contains_date(d(2026, 3, 16)));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = period(d(2026, 3, 1), d(2026, 3, 15));
        let b = period(d(2026, 3, 10), d(2026, 3, 25));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
    }

    #[test]
    fn test_contained_period_overlaps() {
        let outer = period(d(2026, 3, 1), d(2026, 3, 31));
        let inner = period(d(2026, 3, 5), d(2026, 3, 6));
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_display() {
        let p = period(d(2026, 3, 1), d(2026, 3, 15));
        assert_eq!(p.to_string(), "2026-03-01 to 2026-03-15");
    }

    #[test]
    fn test_deserialize_pay_period() {
        let json = r#"{ "start_date": "2026-03-01", "end_date": "2026-03-31" }"#;
        let p: PayPeriod = serde_json::from_str(json).unwrap();
        assert_eq!(p.start_date, d(2026, 3, 1));
        assert_eq!(p.end_date, d(2026, 3, 31));
    }
}
