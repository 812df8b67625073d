use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{DefaultBodyLimit, Multipart},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Extension, Json, Router,
};
use axum_extra::extract::cookie::Cookie;
use chrono::NaiveDate;
use validator::Validate;

use crate::{
    dtos::{
        userdtos::{
            ApiResponse, FilterUserDto, ForgotPasswordDto, LoginUserDto, NotifiedResponse,
            ResetPasswordDto, Response, SendOtpDto, SignupUserDto, UserLoginResponseDto,
            VerifyOtpDto,
        },
        workerdtos::{FilterWorkerDto, WorkerApplicationDto},
    },
    error::HttpError,
    service::identity_service::LoginOutcome,
    utils::upload::{ProofUpload, UploadError, MAX_PROOF_BYTES},
    AppState,
};

const PENDING_VERIFICATION: &str =
    "Still your application is under verification...thank you for your patience";

pub fn auth_handler() -> Router {
    Router::new()
        .route("/send-otp", post(send_otp))
        .route("/verify-otp", post(verify_otp))
        .route("/user-signup", post(user_signup))
        .route(
            "/worker-application",
            // room for the text fields on top of the largest proof
            post(worker_application).layer(DefaultBodyLimit::max(MAX_PROOF_BYTES + 64 * 1024)),
        )
        .route("/login", post(login))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
}

pub async fn send_otp(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<SendOtpDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    app_state.identity_service.request_otp(&body.email).await?;

    Ok(Json(Response::success("OTP sent successfully")))
}

pub async fn verify_otp(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<VerifyOtpDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    app_state
        .identity_service
        .verify_otp(&body.email, body.otp.value())
        .await?;

    Ok(Json(Response::success("OTP verified successfully")))
}

pub async fn user_signup(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<SignupUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let user = app_state.identity_service.signup(body).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "User registered successfully",
            FilterUserDto::filter_user(&user),
        )),
    ))
}

pub async fn worker_application(
    Extension(app_state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HttpError> {
    let mut fields: HashMap<String, String> = HashMap::new();
    let mut proof: Option<ProofUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| HttpError::bad_request(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "file" {
            let original_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| HttpError::bad_request(e.body_text()))?;

            proof = Some(ProofUpload {
                original_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| HttpError::bad_request(e.body_text()))?;
            fields.insert(name, value);
        }
    }

    let proof = proof.ok_or_else(|| HttpError::bad_request(UploadError::MissingFile.to_string()))?;
    let body = application_from_fields(fields)?;
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let application = app_state.identity_service.apply_as_worker(body, proof).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            "Application submitted successfully",
            FilterWorkerDto::filter_worker(&application),
        )),
    ))
}

/// `is_verified` and any other unexpected text field is dropped here.
fn application_from_fields(
    mut fields: HashMap<String, String>,
) -> Result<WorkerApplicationDto, HttpError> {
    let mut take = |key: &str| fields.remove(key).unwrap_or_default();

    let raw_dob = take("dob");
    let dob = NaiveDate::parse_from_str(raw_dob.trim(), "%Y-%m-%d")
        .map_err(|_| HttpError::bad_request("Date of birth must be formatted as YYYY-MM-DD"))?;

    Ok(WorkerApplicationDto {
        name: take("name"),
        dob,
        email: take("email"),
        password: take("password"),
        phone_no: take("phone_no"),
        address: take("address"),
        city: take("city"),
        pincode: take("pincode"),
        types_of_professions: take("types_of_professions"),
    })
}

pub async fn login(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<LoginUserDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let (token, user_type) = match app_state.identity_service.login(body).await? {
        LoginOutcome::Authenticated { token, user_type } => (token, user_type),
        LoginOutcome::PendingVerification => {
            return Ok((StatusCode::ACCEPTED, Json(Response::success(PENDING_VERIFICATION)))
                .into_response());
        }
    };

    let cookie_duration = time::Duration::minutes(app_state.env.jwt_maxage);
    let cookie = Cookie::build(("token", token.clone()))
        .path("/")
        .max_age(cookie_duration)
        .http_only(true)
        .build();

    let mut headers = HeaderMap::new();
    headers.append(
        header::SET_COOKIE,
        cookie
            .to_string()
            .parse()
            .map_err(|_| HttpError::server_error("Failed to build session cookie"))?,
    );

    let mut response = Json(UserLoginResponseDto {
        status: "success".to_string(),
        jwt_token: token,
        user_type,
    })
    .into_response();
    response.headers_mut().extend(headers);

    Ok(response)
}

pub async fn forgot_password(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<ForgotPasswordDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    app_state.identity_service.forgot_password(body).await?;

    Ok(Json(Response::success("OTP sent successfully")))
}

pub async fn reset_password(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<ResetPasswordDto>,
) -> Result<impl IntoResponse, HttpError> {
    body.validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let committed = app_state.identity_service.reset_password(body).await?;

    Ok(Json(NotifiedResponse::success(
        "Password reset successfully",
        committed.notification,
        committed.value,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_fields() -> HashMap<String, String> {
        [
            ("name", "Ravi"),
            ("dob", "1990-01-01"),
            ("email", "ravi@fixit.test"),
            ("password", "password123"),
            ("phone_no", "9000000000"),
            ("address", "4 Hill Street"),
            ("city", "Pune"),
            ("pincode", "411002"),
            ("types_of_professions", "Plumbing,Painting"),
            ("is_verified", "true"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn multipart_fields_become_an_application() {
        let body = application_from_fields(complete_fields()).unwrap();

        assert_eq!(body.email, "ravi@fixit.test");
        assert_eq!(body.dob, NaiveDate::from_ymd_opt(1990, 1, 1).unwrap());
        assert!(body.validate().is_ok());
    }

    #[test]
    fn malformed_dob_is_a_bad_request() {
        let mut fields = complete_fields();
        fields.insert("dob".to_string(), "01/01/1990".to_string());

        let err = application_from_fields(fields).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn missing_fields_fail_validation() {
        let mut fields = complete_fields();
        fields.remove("types_of_professions");

        let body = application_from_fields(fields).unwrap();
        assert!(body.validate().is_err());
    }
}
