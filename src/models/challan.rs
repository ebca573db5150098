//! Delivery challan model.
//!
//! A challan records goods sent through one or more processes for a party.
//! Challans are read-only inputs to the billing engine.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{EngineError, EngineResult};

/// The most pieces accepted on one challan.
pub const MAX_CHALLAN_PIECES: u64 = 1_000_000_000;

/// The most meters accepted on one challan.
pub const MAX_CHALLAN_METERS: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// The delivery status of a challan.
///
/// Serialized with the labels used on the data-entry screens
/// (`"Ready to Invoice"`, `"Not Delivered"`, ...). Unknown labels are kept
/// verbatim in [`ChallanStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChallanStatus {
    /// Goods have not left the mill yet.
    NotDelivered,
    /// Processing is complete and the challan can be billed.
    ReadyToInvoice,
    /// Legacy label that predates `ReadyToInvoice`; treated the same way.
    Delivered,
    /// Goods came back for rework.
    Rework,
    /// The challan has been billed.
    Invoiced,
    /// Any other status label.
    Other(String),
}

impl ChallanStatus {
    /// Returns the display label for this status.
    pub fn label(&self) -> &str {
        match self {
            ChallanStatus::NotDelivered => "Not Delivered",
            ChallanStatus::ReadyToInvoice => "Ready to Invoice",
            ChallanStatus::Delivered => "Delivered",
            ChallanStatus::Rework => "Rework",
            ChallanStatus::Invoiced => "Invoiced",
            ChallanStatus::Other(label) => label,
        }
    }

    /// Returns true if a challan in this status may be put on an invoice.
    ///
    /// ```
    /// use textile_billing::models::ChallanStatus;
    ///
    /// assert!(ChallanStatus::ReadyToInvoice.is_billable());
    /// assert!(ChallanStatus::Delivered.is_billable());
    /// assert!(!ChallanStatus::Rework.is_billable());
    /// ```
    pub fn is_billable(&self) -> bool {
        matches!(self, ChallanStatus::ReadyToInvoice | ChallanStatus::Delivered)
    }
}

impl From<&str> for ChallanStatus {
    fn from(label: &str) -> Self {
        match label.trim() {
            "Not Delivered" => ChallanStatus::NotDelivered,
            "Ready to Invoice" => ChallanStatus::ReadyToInvoice,
            "Delivered" => ChallanStatus::Delivered,
            "Rework" => ChallanStatus::Rework,
            "Invoiced" => ChallanStatus::Invoiced,
            other => ChallanStatus::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ChallanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for ChallanStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ChallanStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Ok(ChallanStatus::from(label.as_str()))
    }
}

/// A delivery challan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challan {
    /// Unique challan number.
    pub challan_number: String,
    /// The challan date.
    pub date: NaiveDate,
    /// The party (client) the goods belong to.
    pub party_name: String,
    /// Processes applied to the goods, in order.
    #[serde(default)]
    pub process: Vec<String>,
    /// Split processes; override `process` when present and non-empty.
    #[serde(default)]
    pub split_process: Option<Vec<String>>,
    /// The design number of the fabric.
    #[serde(default)]
    pub design_no: String,
    /// Piece count.
    pub pcs: u64,
    /// Meters of fabric.
    pub mtr: Decimal,
    /// Delivery status.
    pub status: ChallanStatus,
    /// Free-text remarks from the data-entry screen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl Challan {
    /// Returns the processes this challan is billed for.
    ///
    /// `split_process` wins when it is present and non-empty; otherwise the
    /// regular `process` list is used.
    ///
    /// ```
    /// use textile_billing::models::{Challan, ChallanStatus};
    /// use chrono::NaiveDate;
    /// use rust_decimal::Decimal;
    ///
    /// let challan = Challan {
    ///     challan_number: "DC-1".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
    ///     party_name: "Shree Textiles".to_string(),
    ///     process: vec!["DYEING".to_string()],
    ///     split_process: Some(vec!["BLEACHING".to_string(), "PRINTING".to_string()]),
    ///     design_no: "D-77".to_string(),
    ///     pcs: 10,
    ///     mtr: Decimal::new(1000, 1),
    ///     status: ChallanStatus::ReadyToInvoice,
    ///     remarks: None,
    /// };
    /// assert_eq!(challan.billing_processes(), &["BLEACHING", "PRINTING"]);
    /// ```
    pub fn billing_processes(&self) -> &[String] {
        match &self.split_process {
            Some(split) if !split.is_empty() => split,
            _ => &self.process,
        }
    }

    /// Returns the first billing process, trimmed, if any.
    pub fn first_process(&self) -> Option<&str> {
        self.billing_processes()
            .iter()
            .map(|p| p.trim())
            .find(|p| !p.is_empty())
    }

    /// Checks that pieces and meters are within the accepted range.
    ///
    /// Meters must lie in `0..=MAX_CHALLAN_METERS` and pieces must not
    /// exceed [`MAX_CHALLAN_PIECES`].
    pub fn validate(&self) -> EngineResult<()> {
        if self.pcs > MAX_CHALLAN_PIECES {
            return Err(EngineError::validation(
                "pcs",
                format!(
                    "challan '{}' has {} pieces, above the limit of {}",
                    self.challan_number, self.pcs, MAX_CHALLAN_PIECES
                ),
            ));
        }
        if self.mtr < Decimal::ZERO || self.mtr > MAX_CHALLAN_METERS {
            return Err(EngineError::validation(
                "mtr",
                format!(
                    "challan '{}' has {} meters, outside 0 to {}",
                    self.challan_number, self.mtr, MAX_CHALLAN_METERS
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_challan(process: Vec<&str>, split: Option<Vec<&str>>) -> Challan {
        Challan {
            challan_number: "DC-001".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 2, 3).unwrap(),
            party_name: "Shree Textiles".to_string(),
            process: process.into_iter().map(String::from).collect(),
            split_process: split.map(|s| s.into_iter().map(String::from).collect()),
            design_no: "D-77".to_string(),
            pcs: 12,
            mtr: Decimal::new(1500, 1),
            status: ChallanStatus::ReadyToInvoice,
            remarks: None,
        }
    }

    #[test]
    fn test_billing_processes_uses_process_without_split() {
        let challan = make_challan(vec!["DYEING", "FINISHING"], None);
        assert_eq!(challan.billing_processes(), &["DYEING", "FINISHING"]);
    }

    #[test]
    fn test_billing_processes_ignores_empty_split() {
        let challan = make_challan(vec!["DYEING"], Some(vec![]));
        assert_eq!(challan.billing_processes(), &["DYEING"]);
    }

    #[test]
    fn test_billing_processes_prefers_split() {
        let challan = make_challan(vec!["DYEING"], Some(vec!["PRINTING"]));
        assert_eq!(challan.billing_processes(), &["PRINTING"]);
    }

    #[test]
    fn test_first_process_skips_blank_names() {
        let challan = make_challan(vec!["  ", " WASHING "], None);
        assert_eq!(challan.first_process(), Some("WASHING"));
    }

    #[test]
    fn test_first_process_none_when_empty() {
        let challan = make_challan(vec![], None);
        assert_eq!(challan.first_process(), None);
    }

    #[test]
    fn test_status_serializes_with_labels() {
        assert_eq!(
            serde_json::to_string(&ChallanStatus::ReadyToInvoice).unwrap(),
            "\"Ready to Invoice\""
        );
        assert_eq!(
            serde_json::to_string(&ChallanStatus::NotDelivered).unwrap(),
            "\"Not Delivered\""
        );
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: ChallanStatus = serde_json::from_str("\"On Hold\"").unwrap();
        assert_eq!(status, ChallanStatus::Other("On Hold".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"On Hold\"");
        assert!(!status.is_billable());
    }

    #[test]
    fn test_deserialize_challan() {
        let json = r#"{
            "challan_number": "DC-204",
            "date": "2026-02-10",
            "party_name": "Shree Textiles",
            "process": ["DYEING"],
            "design_no": "D-12",
            "pcs": 8,
            "mtr": "240.5",
            "status": "Delivered"
        }"#;

        let challan: Challan = serde_json::from_str(json).unwrap();
        assert_eq!(challan.challan_number, "DC-204");
        assert_eq!(challan.mtr, Decimal::new(2405, 1));
        assert_eq!(challan.status, ChallanStatus::Delivered);
        assert!(challan.split_process.is_none());
        assert!(challan.status.is_billable());
    }

    #[test]
    fn test_validate_accepts_limits() {
        let mut challan = make_challan(vec!["DYEING"], None);
        challan.pcs = MAX_CHALLAN_PIECES;
        challan.mtr = MAX_CHALLAN_METERS;
        assert!(challan.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_huge_pieces() {
        let mut challan = make_challan(vec!["DYEING"], None);
        challan.pcs = u64::MAX;
        match challan.validate() {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "pcs"),
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_meters() {
        let mut challan = make_challan(vec!["DYEING"], None);
        challan.mtr = Decimal::MAX;
        match challan.validate() {
            Err(EngineError::Validation { field, .. }) => assert_eq!(field, "mtr"),
            other => panic!("Expected validation error, got {:?}", other),
        }

        challan.mtr = Decimal::new(-1, 1);
        assert!(challan.validate().is_err());
    }
}
