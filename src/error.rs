//! Error types for the billing engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every condition that rejects a calculation or a save. Data-consistency
//! problems that do not stop a calculation (for example a process with no
//! known rate) are reported as [`AuditWarning`](crate::models::AuditWarning)s
//! instead.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the billing engine.
///
/// # Example
///
/// ```
/// use textile_billing::error::EngineError;
///
/// let error = EngineError::Validation {
///     field: "invoice_number".to_string(),
///     message: "is required".to_string(),
/// };
/// assert_eq!(error.to_string(), "Invalid field 'invoice_number': is required");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An input field failed validation.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A payslip already covers part of the requested pay period.
    #[error(
        "Employee '{employee_id}' already has a payslip for {existing_start} to {existing_end}"
    )]
    OverlappingPayslip {
        /// The employee the payslips belong to.
        employee_id: String,
        /// Start of the conflicting payslip period.
        existing_start: NaiveDate,
        /// End of the conflicting payslip period.
        existing_end: NaiveDate,
    },

    /// A challan selected for invoicing is already on a saved invoice.
    #[error("Challan '{challan_number}' is already billed on invoice '{invoice_number}'")]
    AlreadyInvoiced {
        /// The challan number that was billed twice.
        challan_number: String,
        /// The invoice that already carries it.
        invoice_number: String,
    },

    /// A record looked up through a ledger did not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// The kind of record (e.g. "employee").
        entity: String,
        /// The identifier that was looked up.
        id: String,
    },
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
