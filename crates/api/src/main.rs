use std::sync::Arc;

use sambaza_api::app;
use sambaza_api::config::ApiConfig;

#[tokio::main]
async fn main() {
    sambaza_api::observability::init();

    let config = ApiConfig::from_env();

    // The system control account must exist before any customer account
    // creation is served; a seeding failure aborts the process.
    let services = match app::services::build_services().await {
        Ok(services) => Arc::new(services),
        Err(e) => {
            tracing::error!(error = %e, "unable to initialize ledger services");
            std::process::exit(1);
        }
    };

    let app = app::build_app(&config.jwt_secret, services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {e}", config.bind_addr));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
