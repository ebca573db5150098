//! Client (party) model with client-specific process rates.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The highest rate per meter accepted for a process.
pub const MAX_PROCESS_RATE: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// The lookup key for a process name: trimmed and lower-cased.
///
/// Client rates and master rates are both matched on this key.
pub fn process_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A negotiated rate for one process, agreed with a specific client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProcessRate {
    /// The process name, matched by [`process_key`].
    pub process_name: String,
    /// The unit rate per meter.
    pub rate: Decimal,
}

/// A client the mill bills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// The client name, as written on challans.
    pub name: String,
    /// GST identification number, if registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gstin: Option<String>,
    /// Client-specific process rates that override the master table.
    #[serde(default)]
    pub processes: Vec<ClientProcessRate>,
}

impl Client {
    /// Returns the client's own rate for a process, if one was agreed.
    ///
    /// Names are compared by [`process_key`], so case and surrounding
    /// whitespace are ignored.
    ///
    /// ```
    /// use textile_billing::models::{Client, ClientProcessRate};
    /// use rust_decimal::Decimal;
    ///
    /// let client = Client {
    ///     name: "Shree Textiles".to_string(),
    ///     gstin: None,
    ///     processes: vec![ClientProcessRate {
    ///         process_name: "Dyeing".to_string(),
    ///         rate: Decimal::new(5, 0),
    ///     }],
    /// };
    /// assert_eq!(client.process_rate(" DYEING "), Some(Decimal::new(5, 0)));
    /// assert_eq!(client.process_rate("PRINTING"), None);
    /// ```
    pub fn process_rate(&self, process: &str) -> Option<Decimal> {
        let key = process_key(process);
        self.processes
            .iter()
            .find(|p| process_key(&p.process_name) == key)
            .map(|p| p.rate)
    }

    /// Rejects client rates that are negative or above [`MAX_PROCESS_RATE`].
    pub fn validate(&self) -> EngineResult<()> {
        for process in &self.processes {
            if process.rate < Decimal::ZERO || process.rate > MAX_PROCESS_RATE {
                return Err(EngineError::validation(
                    "rate",
                    format!(
                        "client '{}' rate {} for '{}' must be between 0 and {}",
                        self.name, process.rate, process.process_name, MAX_PROCESS_RATE
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_client_without_processes() {
        let json = r#"{ "name": "Laxmi Fabrics" }"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.name, "Laxmi Fabrics");
        assert!(client.processes.is_empty());
        assert_eq!(client.process_rate("DYEING"), None);
    }

    #[test]
    fn test_first_matching_rate_wins() {
        let client = Client {
            name: "Laxmi Fabrics".to_string(),
            gstin: Some("24ABCDE1234F1Z5".to_string()),
            processes: vec![
                ClientProcessRate {
                    process_name: "dyeing".to_string(),
                    rate: Decimal::new(45, 1),
                },
                ClientProcessRate {
                    process_name: "DYEING".to_string(),
                    rate: Decimal::new(9, 0),
                },
            ],
        };
        assert_eq!(client.process_rate("Dyeing"), Some(Decimal::new(45, 1)));
    }

    #[test]
    fn test_non_ascii_names_match_ignoring_case() {
        let client = Client {
            name: "Laxmi Fabrics".to_string(),
            gstin: None,
            processes: vec![ClientProcessRate {
                process_name: "RÉSINE".to_string(),
                rate: Decimal::new(6, 0),
            }],
        };
        assert_eq!(client.process_rate(" résine "), Some(Decimal::new(6, 0)));
        assert_eq!(process_key(" RÉSINE "), process_key("résine"));
    }

    #[test]
    fn test_validate_rate_bounds() {
        let mut client = Client {
            name: "Laxmi Fabrics".to_string(),
            gstin: None,
            processes: vec![ClientProcessRate {
                process_name: "DYEING".to_string(),
                rate: MAX_PROCESS_RATE,
            }],
        };
        assert!(client.validate().is_ok());

        client.processes[0].rate = MAX_PROCESS_RATE + Decimal::ONE;
        assert!(matches!(
            client.validate(),
            Err(EngineError::Validation { ref field, .. }) if field == "rate"
        ));

        client.processes[0].rate = Decimal::new(-1, 0);
        assert!(client.validate().is_err());
    }
}
