use axum::{Router, middleware as axum_middleware, routing::get};
use std::sync::Arc;

use crate::db::store::TagLinkStore;
use crate::web::routes::*;
use crate::web::validation::Validator;

pub use crate::web::error::AppError;

pub mod error;
pub mod middleware;
pub mod routes;
pub mod validation;

/// Shared handler context. The store and the validator are injected here and
/// reached by handlers only through `State`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TagLinkStore>,
    pub validator: Arc<dyn Validator>,
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(
    store: Arc<dyn TagLinkStore>,
    validator: Arc<dyn Validator>,
) -> Router {
    let app_state = Arc::new(AppState {
        store,
        validator,
    });

    Router::new()
        .route("/health", get(health_check_handler))
        .merge(user_routes::create_user_router())
        .merge(tag_link_routes::create_tag_link_router())
        .merge(tag_link_routes::create_active_slot_router())
        .merge(slot_routes::create_slot_router())
        .layer(axum_middleware::from_fn(middleware::log_requests))
        .with_state(app_state)
}
