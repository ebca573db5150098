//! HTTP request handlers for the billing API.
//!
//! This module contains the handler functions for all API endpoints.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    AggregationOptions, RateBook, build_attendance_grid, build_client_statement,
    calculate_payslip, check_payslip_overlap, prepare_invoice_draft,
};
use crate::error::EngineError;
use crate::models::CalculationResult;

use super::request::{
    AttendanceGridRequest, InvoiceCalculationRequest, PayslipCalculationRequest, StatementRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/invoices/calculate", post(invoice_handler))
        .route("/statements/calculate", post(statement_handler))
        .route("/payslips/calculate", post(payslip_handler))
        .route("/attendance/grid", post(attendance_grid_handler))
        .with_state(state)
}

/// Handler for POST /invoices/calculate.
///
/// Aggregates the client's available challans into an invoice draft.
async fn invoice_handler(
    State(state): State<AppState>,
    payload: Result<Json<InvoiceCalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing invoice calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let config = state.config();
    let rates = RateBook::new(Some(&request.client), config);
    let hsn_code = request
        .hsn_code
        .as_deref()
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .unwrap_or(config.default_hsn_code());
    let options = AggregationOptions {
        invoice_type: request.invoice_type,
        tax_type: request.tax_type,
        hsn_code,
        tax_rates: *config.tax_rates(),
    };

    let outcome = request.client.validate().and_then(|()| {
        prepare_invoice_draft(
            &request.client.name,
            &request.challans,
            &request.existing_invoices,
            &rates,
            &options,
        )
    });
    let result = match outcome {
        Ok(result) => result,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    info!(
        correlation_id = %correlation_id,
        client = %request.client.name,
        challans_count = request.challans.len(),
        items_count = result.draft.items.len(),
        total_amount = %result.draft.totals.total_amount,
        warnings = result.audit_trace.warnings.len(),
        duration_us = result.audit_trace.duration_us,
        "Invoice calculation completed successfully"
    );
    json_ok(CalculationResult::new(result.draft, result.audit_trace))
}

/// Handler for POST /statements/calculate.
async fn statement_handler(
    State(state): State<AppState>,
    payload: Result<Json<StatementRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing statement request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let rates = RateBook::new(Some(&request.client), state.config());
    let outcome = request
        .client
        .validate()
        .and_then(|()| build_client_statement(&request.client.name, &request.challans, &rates));
    let result = match outcome {
        Ok(result) => result,
        Err(err) => return engine_error_response(correlation_id, err),
    };

    info!(
        correlation_id = %correlation_id,
        client = %request.client.name,
        lines = result.statement.lines.len(),
        total_amount = %result.statement.total_amount,
        "Statement completed successfully"
    );
    json_ok(CalculationResult::new(result.statement, result.audit_trace))
}

/// Handler for POST /payslips/calculate.
///
/// Rejects with 409 when one of the supplied payslips overlaps the period.
async fn payslip_handler(
    State(_state): State<AppState>,
    payload: Result<Json<PayslipCalculationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing payslip calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let outcome = request
        .employee
        .validate()
        .and_then(|()| request.pay_period.validate())
        .and_then(|()| {
            check_payslip_overlap(
                &request.employee.id,
                &request.pay_period,
                &request.existing_payslips,
            )
        })
        .and_then(|()| {
            calculate_payslip(
                &request.employee,
                &request.pay_period,
                &request.attendance,
                &request.advances,
                request.deduction_policy,
            )
        });

    match outcome {
        Ok(result) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %request.employee.id,
                gross = %result.payslip.gross_salary,
                net = %result.payslip.net_salary,
                duration_us = result.audit_trace.duration_us,
                "Payslip calculation completed successfully"
            );
            json_ok(CalculationResult::new(result.payslip, result.audit_trace))
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for POST /attendance/grid.
async fn attendance_grid_handler(
    State(_state): State<AppState>,
    payload: Result<Json<AttendanceGridRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing attendance grid request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let today = request.today.unwrap_or_else(|| Utc::now().date_naive());
    match build_attendance_grid(
        &request.employees,
        request.year,
        request.month,
        today,
        &request.records,
    ) {
        Ok(grid) => {
            info!(
                correlation_id = %correlation_id,
                employees = grid.rows.len(),
                days = grid.days.len(),
                "Attendance grid built"
            );
            json_ok(grid)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

fn json_ok<T: Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Calculation failed"
    );
    ApiErrorResponse::from(err).into_response()
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error).into_response()
}
