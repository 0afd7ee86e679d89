use std::sync::Arc;

use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

use sambaza_api::middleware::Claims;
use sambaza_infra::InMemoryLedgerStore;

const JWT_SECRET: &str = "test-secret";

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, but an in-memory store and an ephemeral port.
        let store = Arc::new(InMemoryLedgerStore::new());
        let services = sambaza_api::app::services::build_services_with_store(store)
            .await
            .expect("wiring services");
        let app = sambaza_api::app::build_app(JWT_SECRET, Arc::new(services));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn mint_jwt() -> String {
    let claims = Claims {
        sub: "black-box-tests".to_string(),
        exp: (Utc::now() + ChronoDuration::minutes(10)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("failed to encode jwt")
}

async fn create_account(
    client: &reqwest::Client,
    server: &TestServer,
    token: &str,
    customer_name: &str,
    amount: i64,
) -> serde_json::Value {
    let resp = client
        .post(format!("{}/api/v1/account", server.base_url))
        .bearer_auth(token)
        .json(&json!({
            "customer_name": customer_name,
            "amount": amount,
            "currency": "KSH",
            "header": "DEPOSIT",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    resp.json().await.unwrap()
}

fn balance_of(account: &serde_json::Value) -> Decimal {
    account["balance"]
        .as_str()
        .expect("balance should serialize as a string")
        .parse()
        .unwrap()
}

#[tokio::test]
async fn health_is_open() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/health", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn requests_without_a_token_are_rejected() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(format!("{}/api/v1/account", server.base_url))
        .json(&json!({
            "customer_name": "John Doe",
            "amount": 100,
            "currency": "KSH",
            "header": "DEPOSIT",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = client
        .post(format!("{}/api/v1/account", server.base_url))
        .bearer_auth("not-a-token")
        .json(&json!({
            "customer_name": "John Doe",
            "amount": 100,
            "currency": "KSH",
            "header": "DEPOSIT",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_lookup_and_transfer_round_trip() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_jwt();

    let body = create_account(&client, &server, &token, "John Doe", 100).await;
    let john = &body["account"];
    assert_eq!(balance_of(john), dec!(100));
    assert_eq!(john["balance_type"], "CR");
    assert_eq!(john["header"], "DEPOSIT");
    assert!(john["number"].as_str().unwrap().starts_with("AC-"));
    let john_id = john["id"].as_str().unwrap().to_string();

    let body = create_account(&client, &server, &token, "Jane Doe", 50).await;
    let jane_id = body["account"]["id"].as_str().unwrap().to_string();

    let resp = client
        .post(format!("{}/api/v1/transfers", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "source_account_id": john_id,
            "destination_account_id": jane_id,
            "amount": 80,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(
        body["transaction"]["description"]
            .as_str()
            .unwrap()
            .starts_with("Deposit of 80")
    );

    let resp = client
        .get(format!("{}/api/v1/account/{john_id}", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(balance_of(&body["account"]), dec!(20));

    let resp = client
        .get(format!("{}/api/v1/account/{jane_id}", server.base_url))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(balance_of(&body["account"]), dec!(130));
}

#[tokio::test]
async fn transfer_beyond_balance_is_unprocessable() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_jwt();

    let body = create_account(&client, &server, &token, "John Doe", 100).await;
    let john_id = body["account"]["id"].as_str().unwrap().to_string();
    let body = create_account(&client, &server, &token, "Jane Doe", 50).await;
    let jane_id = body["account"]["id"].as_str().unwrap().to_string();

    let resp = client
        .post(format!("{}/api/v1/transfers", server.base_url))
        .bearer_auth(&token)
        .json(&json!({
            "source_account_id": john_id,
            "destination_account_id": jane_id,
            "amount": 800,
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "insufficient_funds");
    assert!(body["message"].as_str().unwrap().contains("800"));
}

#[tokio::test]
async fn account_creation_rejects_a_missing_or_non_positive_deposit() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_jwt();

    for amount in [json!(null), json!(0), json!(-100)] {
        let resp = client
            .post(format!("{}/api/v1/account", server.base_url))
            .bearer_auth(&token)
            .json(&json!({
                "customer_name": "John Doe",
                "amount": amount,
                "currency": "KSH",
                "header": "DEPOSIT",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["error"], "validation_error");
    }
}

#[tokio::test]
async fn unknown_account_is_not_found() {
    let server = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let token = mint_jwt();

    let resp = client
        .get(format!(
            "{}/api/v1/account/00000000-0000-0000-0000-000000000000",
            server.base_url
        ))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}
