use std::sync::Arc;

use axum::{
    extract::Query,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    dtos::{
        bookingdtos::{BookingIdDto, BookingQueryDto, CreateBookingDto, GenerateBillDto},
        userdtos::{ApiResponse, NotifiedResponse},
    },
    error::HttpError,
    middleware::JWTAuthMiddeware,
    AppState,
};

/// Role rules live in the booking service; every route here only needs a token.
pub fn booking_handler() -> Router {
    Router::new()
        .route("/booking-worker", post(booking_worker))
        .route("/booking-details", get(booking_details))
        .route("/cancel-booking", put(cancel_booking))
        .route("/generate-bill", post(generate_bill))
        .route("/complete-booking", put(complete_booking))
}

pub async fn booking_worker(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(caller): Extension<JWTAuthMiddeware>,
    Json(body): Json<CreateBookingDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let committed = app_state
        .booking_service
        .create_booking(caller.principal, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(NotifiedResponse::success(
            "Successfully Booked",
            committed.notification,
            committed.value,
        )),
    ))
}

pub async fn booking_details(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(caller): Extension<JWTAuthMiddeware>,
    Query(query): Query<BookingQueryDto>,
) -> Result<impl IntoResponse, HttpError> {
    let bookings = app_state
        .booking_service
        .get_bookings(caller.principal, query.booking_id)
        .await?;

    Ok(Json(ApiResponse::success("Booking details", bookings)))
}

pub async fn cancel_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(caller): Extension<JWTAuthMiddeware>,
    Json(body): Json<BookingIdDto>,
) -> Result<impl IntoResponse, HttpError> {
    let committed = app_state
        .booking_service
        .cancel_booking(caller.principal, body.booking_id)
        .await?;

    Ok(Json(NotifiedResponse::success(
        "Booking cancelled successfully",
        committed.notification,
        committed.value,
    )))
}

pub async fn generate_bill(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(caller): Extension<JWTAuthMiddeware>,
    Json(body): Json<GenerateBillDto>,
) -> Result<impl IntoResponse, HttpError> {
    let committed = app_state
        .booking_service
        .generate_bill(caller.principal, body)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(NotifiedResponse::success(
            "Bill generated successfully",
            committed.notification,
            committed.value,
        )),
    ))
}

pub async fn complete_booking(
    Extension(app_state): Extension<Arc<AppState>>,
    Extension(caller): Extension<JWTAuthMiddeware>,
    Json(body): Json<BookingIdDto>,
) -> Result<impl IntoResponse, HttpError> {
    let committed = app_state
        .booking_service
        .complete_booking(caller.principal, body.booking_id)
        .await?;

    Ok(Json(NotifiedResponse::success(
        "Booking completed successfully",
        committed.notification,
        committed.value,
    )))
}
