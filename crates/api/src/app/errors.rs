//! Consistent JSON error responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use sambaza_core::LedgerError;

pub fn ledger_error_to_response(err: LedgerError) -> axum::response::Response {
    let message = err.to_string();
    match err {
        LedgerError::InvalidAmount(_)
        | LedgerError::MissingEntry(_)
        | LedgerError::MissingAccount(_) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", message)
        }
        LedgerError::UnbalancedTransaction { .. }
        | LedgerError::UnsupportedHeaderCategory(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", message)
        }
        LedgerError::InsufficientFunds { .. } => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "insufficient_funds", message)
        }
        LedgerError::AccountNotFound(_) => {
            json_error(StatusCode::NOT_FOUND, "not_found", message)
        }
        LedgerError::Persistence(_) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", message)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
