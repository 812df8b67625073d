use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    middleware,
    response::IntoResponse,
    routing::{get, put},
    Extension, Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dtos::{
        userdtos::{ApiResponse, Response, UpdateProfileDto, UserDataResponseDto},
        workerdtos::{WorkerDataResponseDto, WorkerSearchQueryDto},
    },
    error::HttpError,
    middleware::{role_check, JWTAuthMiddeware},
    models::usermodel::UserType,
    AppState,
};

pub fn users_handler() -> Router {
    Router::new()
        .route(
            "/get-user-data",
            get(get_user_data).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserType::User])
            })),
        )
        .route(
            "/get-worker-data",
            get(get_worker_data).layer(middleware::from_fn(|state, req, next| {
                role_check(state, req, next, vec![UserType::Worker])
            })),
        )
        .route("/user-worker-options", get(user_worker_options))
        .route("/worker-profile-details/:id", get(worker_profile_details))
        .route("/update-profile", put(update_profile))
}

pub async fn get_user_data(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(caller): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let user_data = app_state
        .profile_service
        .get_user_profile(caller.principal)
        .await?;

    Ok(Json(UserDataResponseDto {
        status: "success".to_string(),
        user_data,
    }))
}

pub async fn get_worker_data(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(caller): Extension<JWTAuthMiddeware>,
) -> Result<impl IntoResponse, HttpError> {
    let worker_data = app_state
        .profile_service
        .get_worker_profile(caller.principal)
        .await?;

    Ok(Json(WorkerDataResponseDto {
        status: "success".to_string(),
        worker_data,
    }))
}

pub async fn user_worker_options(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(caller): Extension<JWTAuthMiddeware>,
    Query(query): Query<WorkerSearchQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let workers = app_state
        .profile_service
        .search_workers(caller.principal, query.req_type.as_deref())
        .await?;

    Ok(Json(ApiResponse::success("Matching workers", workers)))
}

pub async fn worker_profile_details(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(worker_id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let worker = app_state
        .profile_service
        .get_worker_public_profile(worker_id)
        .await?;

    Ok(Json(ApiResponse::success("Worker profile", worker)))
}

pub async fn update_profile(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(caller): Extension<JWTAuthMiddeware>,
    Json(body): Json<UpdateProfileDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    app_state
        .profile_service
        .update_profile(caller.principal, body)
        .await?;

    Ok(Json(Response::success("Profile updated successfully")))
}
