// routes.rs
use std::sync::Arc;

use axum::{middleware, routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::{
    handler::{
        admin::admin_handler, auth::auth_handler, booking::booking_handler,
        feedback::feedback_handler, users::users_handler,
    },
    middleware::auth,
    utils::upload::PROOF_URL_PREFIX,
    AppState,
};

async fn greeting() -> &'static str {
    "Welcome to FixIt"
}

async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>) -> Router {
    let protected_routes = Router::new()
        .merge(admin_handler())
        .merge(users_handler())
        .merge(booking_handler())
        .merge(feedback_handler())
        .route_layer(middleware::from_fn(auth));

    let proofs = ServeDir::new(&app_state.env.upload_dir);

    Router::new()
        .route("/", get(greeting))
        .route("/health", get(health_check))
        .merge(auth_handler())
        .merge(protected_routes)
        .nest_service(&format!("/{}", PROOF_URL_PREFIX), proofs)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state))
}
