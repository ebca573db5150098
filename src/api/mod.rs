//! HTTP API module for the billing engine.
//!
//! This module exposes the calculators as JSON endpoints:
//!
//! - `POST /invoices/calculate` builds an invoice draft from challans
//! - `POST /statements/calculate` builds a client statement
//! - `POST /payslips/calculate` calculates a payslip, rejecting overlaps
//! - `POST /attendance/grid` builds the monthly attendance grid

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AttendanceGridRequest, InvoiceCalculationRequest, PayslipCalculationRequest, StatementRequest,
};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
