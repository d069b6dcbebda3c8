use std::sync::Arc;

use pmcompanion_api::{build_router, config::Config, repo, AppState};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pmcompanion_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());
    if !config.runtime_mode.is_production() {
        tracing::warn!("Development mode: requests without identity headers act as the dev user");
    }

    // Chosen once; the process never switches stores.
    let repo = repo::open(&config)
        .await
        .expect("Failed to open storage backend");
    tracing::info!(mode = %repo.mode(), "Storage backend ready");

    let state = AppState {
        repo,
        config: config.clone(),
    };

    let app = build_router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
