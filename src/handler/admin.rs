use std::sync::Arc;

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};

use crate::{
    dtos::{admindtos::WorkerIdDto, userdtos::{ApiResponse, NotifiedResponse}},
    error::HttpError,
    middleware::role_check,
    models::usermodel::UserType,
    AppState,
};

pub fn admin_handler() -> Router {
    Router::new()
        .route("/admin-page-details", get(admin_page_details))
        .route("/verify-the-worker", post(verify_the_worker))
        .route("/reject-the-worker", post(reject_the_worker))
        .route_layer(middleware::from_fn(|state, req, next| {
            role_check(state, req, next, vec![UserType::Admin])
        }))
}

pub async fn admin_page_details(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let overview = app_state.vetting_service.overview().await?;

    Ok(Json(ApiResponse::success("Admin overview", overview)))
}

pub async fn verify_the_worker(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<WorkerIdDto>,
) -> Result<impl IntoResponse, HttpError> {
    let committed = app_state.vetting_service.verify_worker(body.id).await?;

    Ok(Json(NotifiedResponse::success(
        "Worker verified",
        committed.notification,
        committed.value,
    )))
}

pub async fn reject_the_worker(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<WorkerIdDto>,
) -> Result<impl IntoResponse, HttpError> {
    let committed = app_state.vetting_service.reject_worker(body.id).await?;

    Ok(Json(NotifiedResponse::success(
        "Worker rejected",
        committed.notification,
        committed.value,
    )))
}
