//! Service wiring: store selection, startup migration/seeding, engine.

use std::sync::Arc;

use sambaza_infra::{InMemoryLedgerStore, PostgresLedgerStore};
use sambaza_ledger::{LedgerEngine, LedgerStore};

/// Everything the HTTP handlers need.
pub struct AppServices {
    pub engine: LedgerEngine,
}

/// Select a store from the environment and wire the engine.
///
/// With `DATABASE_URL` set, connects to Postgres and runs the schema
/// migration; otherwise falls back to the in-memory store (dev only).
/// Either way the system control accounts are seeded before the first
/// request is served — a failure here must abort startup.
pub async fn build_services() -> anyhow::Result<AppServices> {
    let store: Arc<dyn LedgerStore> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            tracing::info!("using postgres ledger store");
            Arc::new(PostgresLedgerStore::connect(&url).await?)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory ledger store");
            Arc::new(InMemoryLedgerStore::new())
        }
    };

    build_services_with_store(store).await
}

/// Wire the engine over an explicit store (tests inject in-memory here).
pub async fn build_services_with_store(
    store: Arc<dyn LedgerStore>,
) -> anyhow::Result<AppServices> {
    store.seed_system_accounts().await?;

    Ok(AppServices {
        engine: LedgerEngine::new(store),
    })
}
