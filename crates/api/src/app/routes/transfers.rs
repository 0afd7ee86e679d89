use std::sync::Arc;

use axum::{
    Json, Router,
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};

use sambaza_core::AccountId;
use sambaza_ledger::TransferInput;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/transfers", post(transfer))
}

pub async fn transfer(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::TransferRequest>,
) -> axum::response::Response {
    let source_id: AccountId = match body.source_account_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::ledger_error_to_response(e),
    };
    let destination_id: AccountId = match body.destination_account_id.parse() {
        Ok(v) => v,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    // Resolve both sides up front so unknown ids surface as not-found
    // rather than as a failed transfer.
    let source = match services.engine.account(source_id).await {
        Ok(a) => a,
        Err(e) => return errors::ledger_error_to_response(e),
    };
    let destination = match services.engine.account(destination_id).await {
        Ok(a) => a,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    match services
        .engine
        .transfer(TransferInput {
            source_account: Some(source),
            destination_account: Some(destination),
            amount: body.amount,
            description: None,
        })
        .await
    {
        Ok(transaction) => (
            StatusCode::OK,
            Json(serde_json::json!({ "transaction": transaction })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
