pub mod dto;
pub mod errors;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;

use crate::{clock::Clock, db::ReadingStore};
use handlers::ApiDoc;

/// Collaborators shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ReadingStore>,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<dyn ReadingStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }
}

pub fn router(state: AppState) -> Router {
    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .route("/api/chart-data", get(handlers::get_chart_data))
        .route("/api/manual-log", post(handlers::manual_log))
        .with_state(state)
        .split_for_parts();

    router
        .route("/health", get(handlers::health))
        .route(
            "/api-docs/openapi.json",
            get(move || async move { axum::Json(api) }),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
