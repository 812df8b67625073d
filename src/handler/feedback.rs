use std::sync::Arc;

use axum::{http::StatusCode, response::IntoResponse, routing::post, Extension, Json, Router};
use validator::Validate;

use crate::{
    dtos::{feedbackdtos::FeedbackDto, userdtos::ApiResponse},
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

pub fn feedback_handler() -> Router {
    Router::new().route("/feedback", post(submit_feedback))
}

pub async fn submit_feedback(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(caller): Extension<JWTAuthMiddeware>,
    Json(body): Json<FeedbackDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let feedback = app_state
        .feedback_service
        .submit(caller.principal, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Successfully submitted the feedback", feedback)),
    ))
}
