//! Client statement calculation.
//!
//! A statement lists a client's challans with one approximate rate per line,
//! resolved from the challan's first process only. It is a read-only report
//! and is never used to build invoices.

use std::time::Instant;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::EngineResult;
use crate::models::{AuditStep, AuditTrace, AuditWarning, Challan, ChallanStatus};

use super::invoice_aggregation::ZERO_RATE_WARNING;
use super::rates::{RateOrigin, RateSource, resolve_statement_rate};

/// One challan line on a client statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// The challan number.
    pub challan_number: String,
    /// The challan date.
    pub date: NaiveDate,
    /// The first billing process, or empty when the challan has none.
    pub process: String,
    /// The design number.
    pub design_no: String,
    /// Pieces on the challan.
    pub pcs: u64,
    /// Meters on the challan.
    pub mtr: Decimal,
    /// The first-process rate.
    pub rate: Decimal,
    /// Where the rate came from.
    pub rate_origin: RateOrigin,
    /// `mtr * rate`.
    pub amount: Decimal,
    /// The challan status.
    pub status: ChallanStatus,
}

/// A client statement over a set of challans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientStatement {
    /// The client the statement is for.
    pub client_name: String,
    /// Lines sorted by date, then challan number.
    pub lines: Vec<StatementLine>,
    /// Sum of pieces.
    pub total_pcs: u64,
    /// Sum of meters.
    pub total_mtr: Decimal,
    /// Sum of line amounts.
    pub total_amount: Decimal,
}

/// A statement and its audit trace.
#[derive(Debug, Clone)]
pub struct ClientStatementResult {
    /// The calculated statement.
    pub statement: ClientStatement,
    /// Audit steps and zero-rate warnings.
    pub audit_trace: AuditTrace,
}

/// Builds a client statement from the client's challans.
///
/// # Errors
///
/// - `Validation` when a challan has pieces or meters out of range
/// - `Validation` when a first-process rate is out of range
///
/// # Example
///
/// ```
/// use textile_billing::calculation::{RateSource, build_client_statement};
/// use rust_decimal::Decimal;
///
/// struct NoRates;
/// impl RateSource for NoRates {
///     fn client_rate(&self, _p: &str) -> Option<Decimal> { None }
///     fn master_rate(&self, _p: &str) -> Option<Decimal> { None }
/// }
///
/// let result = build_client_statement("Shree Textiles", &[], &NoRates).unwrap();
/// assert!(result.statement.lines.is_empty());
/// assert!(result.statement.total_amount.is_zero());
/// ```
pub fn build_client_statement<R: RateSource + ?Sized>(
    client_name: &str,
    challans: &[Challan],
    rates: &R,
) -> EngineResult<ClientStatementResult> {
    let start = Instant::now();
    let mut trace = AuditTrace::default();

    let mut lines: Vec<StatementLine> = Vec::with_capacity(challans.len());
    for challan in challans {
        challan.validate()?;
        let resolution = resolve_statement_rate(rates, challan);
        resolution.validate()?;
        if resolution.is_default() {
            trace.warnings.push(AuditWarning::new(
                ZERO_RATE_WARNING,
                format!(
                    "Challan '{}' has no rate for '{}'; shown at 0",
                    challan.challan_number, resolution.process
                ),
                "medium",
            ));
        }
        lines.push(StatementLine {
            challan_number: challan.challan_number.clone(),
            date: challan.date,
            process: resolution.process,
            design_no: challan.design_no.clone(),
            pcs: challan.pcs,
            mtr: challan.mtr,
            rate: resolution.rate,
            rate_origin: resolution.origin,
            amount: challan.mtr * resolution.rate,
            status: challan.status.clone(),
        });
    }

    lines.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then_with(|| a.challan_number.cmp(&b.challan_number))
    });

    let total_pcs: u64 = lines.iter().map(|l| l.pcs).sum();
    let total_mtr: Decimal = lines.iter().map(|l| l.mtr).sum();
    let total_amount: Decimal = lines.iter().map(|l| l.amount).sum();

    debug!(
        client = %client_name,
        lines = lines.len(),
        total_amount = %total_amount,
        "Built client statement"
    );

    let step_number = trace.next_step_number();
    trace.steps.push(AuditStep {
        step_number,
        rule_id: "statement_first_process_rate".to_string(),
        rule_name: "Statement Rate (First Process)".to_string(),
        input: serde_json::json!({
            "client": client_name,
            "challan_count": challans.len()
        }),
        output: serde_json::json!({
            "total_pcs": total_pcs,
            "total_mtr": total_mtr.normalize().to_string(),
            "total_amount": total_amount.normalize().to_string()
        }),
        reasoning: "Each challan priced at the rate of its first process".to_string(),
    });
    trace.duration_us = start.elapsed().as_micros() as u64;

    Ok(ClientStatementResult {
        statement: ClientStatement {
            client_name: client_name.trim().to_string(),
            lines,
            total_pcs,
            total_mtr,
            total_amount,
        },
        audit_trace: trace,
    })
}
