use axum::Router;

pub mod accounts;
pub mod system;
pub mod transfers;

/// Protected route tree mounted under `/api/v1`.
pub fn router() -> Router {
    Router::new().nest(
        "/api/v1",
        Router::new()
            .merge(accounts::router())
            .merge(transfers::router()),
    )
}
