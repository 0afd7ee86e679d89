use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use sambaza_core::AccountId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/account", post(create_account))
        .route("/account/:id", get(get_account))
}

pub async fn create_account(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateAccountRequest>,
) -> axum::response::Response {
    match services.engine.create_customer_account(body.into_input()).await {
        Ok(account) => (
            StatusCode::OK,
            Json(serde_json::json!({ "account": account })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}

pub async fn get_account(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let account_id: AccountId = match id.parse() {
        Ok(v) => v,
        Err(e) => return errors::ledger_error_to_response(e),
    };

    match services.engine.account(account_id).await {
        Ok(account) => (
            StatusCode::OK,
            Json(serde_json::json!({ "account": account })),
        )
            .into_response(),
        Err(e) => errors::ledger_error_to_response(e),
    }
}
