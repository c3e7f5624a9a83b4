pub mod health;
pub mod recalculate;

use crate::config::Config;
use crate::notify::ChangeNotifier;
use crate::recalc::Recalculator;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub recalculator: Arc<Recalculator>,
    pub config: Config,
    pub notifier: Arc<dyn ChangeNotifier>,
}

impl AppState {
    pub fn new(
        recalculator: Arc<Recalculator>,
        config: Config,
        notifier: Arc<dyn ChangeNotifier>,
    ) -> Self {
        Self {
            recalculator,
            config,
            notifier,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/v1/admin/recalculate",
            post(recalculate::post_recalculate),
        )
        .layer(cors)
        .with_state(state)
}
