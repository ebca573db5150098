//! Calculation result models.
//!
//! This module contains the audit trace types recorded by every calculator
//! and the [`CalculationResult`] envelope that wraps a calculated document
//! with its identifier, timestamp and audit trace.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag results a human reviewer should look at, such as a process
/// billed at a zero rate. They never stop a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for a calculation.
///
/// # Example
///
/// ```
/// use textile_billing::models::AuditTrace;
///
/// let trace = AuditTrace::default();
/// assert!(trace.steps.is_empty());
/// assert!(trace.warnings.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// The number the next appended step should carry.
    pub fn next_step_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }
}

/// A calculated document together with its provenance.
///
/// The calculators themselves are pure and return bare documents plus audit
/// data; adapters wrap them in this envelope when handing them out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationResult<T> {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The calculated document.
    pub document: T,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl<T> CalculationResult<T> {
    /// Wraps a document with a fresh id, the current time and the crate version.
    pub fn new(document: T, audit_trace: AuditTrace) -> Self {
        Self {
            calculation_id: Uuid::new_v4(),
            timestamp: Utc::now(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            document,
            audit_trace,
        }
    }
}
