//! Bearer-token authentication middleware.
//!
//! Validates HS256 JWTs minted by the external token issuer; token issuance
//! and exchange are not this service's concern — inbound requests are
//! expected to arrive already authorized.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Claims expected in an inbound bearer token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Authenticated caller identity, injected into request extensions.
#[derive(Debug, Clone)]
pub struct CallerContext {
    pub subject: String,
}

#[derive(Clone)]
pub struct AuthState {
    decoding_key: Arc<DecodingKey>,
}

impl AuthState {
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self {
            decoding_key: Arc::new(DecodingKey::from_secret(jwt_secret)),
        }
    }
}

pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = extract_bearer(req.headers())?;

    let data = jsonwebtoken::decode::<Claims>(
        token,
        &state.decoding_key,
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|_e| StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(CallerContext {
        subject: data.claims.sub,
    });

    Ok(next.run(req).await)
}

fn extract_bearer(headers: &HeaderMap) -> Result<&str, StatusCode> {
    let header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let header = header.to_str().map_err(|_| StatusCode::UNAUTHORIZED)?;

    let header = header
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = header.trim();
    if token.is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    Ok(token)
}
