use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use super::handlers;
use super::state::ApiState;

/// `/health`, plus `/api/{resource}` and `/api/{resource}/auth`, each also under a `/{lang}` prefix.
#[must_use]
pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/{resource}",
            get(handlers::read)
                .post(handlers::create)
                .put(handlers::update)
                .delete(handlers::delete),
        )
        .route("/api/{resource}/auth", post(handlers::authenticate))
        .route(
            "/{lang}/api/{resource}",
            get(handlers::read)
                .post(handlers::create)
                .put(handlers::update)
                .delete(handlers::delete),
        )
        .route("/{lang}/api/{resource}/auth", post(handlers::authenticate))
        .layer(Extension(state))
}
