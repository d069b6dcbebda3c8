use std::sync::Arc;

use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod db;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repo;

use auth::identity::{LOOSE_HEADER, STRUCTURED_HEADER};
use config::Config;
use repo::Repository;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn Repository>,
    pub config: Arc<Config>,
}

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/today", get(handlers::today::get_today))
        // Tasks
        .route("/tasks", post(handlers::tasks::create_task))
        .route("/tasks/:id", delete(handlers::tasks::delete_task))
        .route("/tasks/:id/toggle", post(handlers::tasks::toggle_task))
        // Ideas
        .route("/ideas", get(handlers::ideas::list_ideas))
        .route("/ideas", post(handlers::ideas::create_idea))
        .route("/ideas/:id", delete(handlers::ideas::delete_idea))
        // Mood & reflection
        .route("/mood", post(handlers::journal::set_mood))
        .route("/reflection", post(handlers::journal::set_reflection))
        .route("/history", get(handlers::history::get_history))
        .fallback(handlers::spa::api_not_found)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::attach_identity,
        ));

    let mut app = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .nest("/api", api_routes)
        .fallback_service(handlers::spa::spa_service(&state.config.static_dir));

    if let Some(cors) = cors_layer(&state.config) {
        app = app.layer(cors);
    }

    app.layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &Config) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|o| match o.parse::<HeaderValue>() {
            Ok(hv) => Some(hv),
            Err(_) => {
                tracing::warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    if origins.is_empty() {
        return None;
    }

    Some(
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([
                header::CONTENT_TYPE,
                header::ACCEPT,
                HeaderName::from_static(STRUCTURED_HEADER),
                HeaderName::from_static(LOOSE_HEADER),
            ])
            .allow_credentials(true),
    )
}
