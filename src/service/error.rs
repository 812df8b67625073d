use thiserror::Error;

use crate::{
    error::{ErrorMessage, HttpError},
    mail::sendmail::MailError,
    utils::upload::UploadError,
};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidCredentials(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Error sending email: {0}")]
    Delivery(#[from] MailError),

    #[error("{0}")]
    Upload(#[from] UploadError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<ErrorMessage> for ServiceError {
    fn from(message: ErrorMessage) -> Self {
        match message {
            ErrorMessage::EmptyPassword | ErrorMessage::ExceededMaxPasswordLength(_) => {
                ServiceError::Validation(message.to_string())
            }
            ErrorMessage::WrongCredentials => ServiceError::InvalidCredentials(message.to_string()),
            ErrorMessage::InvalidToken
            | ErrorMessage::TokenNotProvided
            | ErrorMessage::UserNotAuthenticated
            | ErrorMessage::UserNoLongerExist => ServiceError::Unauthorized(message.to_string()),
            ErrorMessage::PermissionDenied => ServiceError::Forbidden(message.to_string()),
            ErrorMessage::EmailExist => ServiceError::Conflict(message.to_string()),
            _ => ServiceError::Other(message.to_string()),
        }
    }
}

impl From<ServiceError> for HttpError {
    fn from(error: ServiceError) -> Self {
        match error {
            ServiceError::Validation(_) | ServiceError::InvalidCredentials(_) => {
                HttpError::bad_request(error.to_string())
            }
            ServiceError::Unauthorized(_) => HttpError::unauthorized(error.to_string()),
            ServiceError::Forbidden(_) => HttpError::forbidden(error.to_string()),
            ServiceError::NotFound(_) => HttpError::not_found(error.to_string()),
            ServiceError::Conflict(_) => HttpError::conflict(error.to_string()),
            ServiceError::Delivery(e) => {
                tracing::error!("Mail delivery failed: {}", e);
                HttpError::bad_gateway("Error sending email")
            }
            ServiceError::Upload(UploadError::Io(e)) => {
                tracing::error!("Proof storage failed: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
            ServiceError::Upload(e) => HttpError::bad_request(e.to_string()),
            ServiceError::Database(e) => {
                tracing::error!("Database error: {}", e);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
            ServiceError::Other(message) => {
                tracing::error!("Unexpected failure: {}", message);
                HttpError::server_error(ErrorMessage::ServerError.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::*;

    #[test]
    fn maps_to_http_statuses() {
        let cases = [
            (ServiceError::Validation("bad".into()), StatusCode::BAD_REQUEST),
            (ServiceError::InvalidCredentials("no".into()), StatusCode::BAD_REQUEST),
            (ServiceError::Unauthorized("no".into()), StatusCode::UNAUTHORIZED),
            (ServiceError::Forbidden("no".into()), StatusCode::FORBIDDEN),
            (ServiceError::NotFound("gone".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("dup".into()), StatusCode::CONFLICT),
            (ServiceError::Upload(UploadError::UnsupportedType), StatusCode::BAD_REQUEST),
            (ServiceError::Other("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (error, status) in cases {
            assert_eq!(HttpError::from(error).status, status);
        }
    }

    #[test]
    fn store_errors_are_not_echoed() {
        let http: HttpError = ServiceError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(http.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(http.message, "Internal Server Error");
    }

    #[test]
    fn password_errors_become_validation_failures() {
        let error: ServiceError = ErrorMessage::EmptyPassword.into();
        assert!(matches!(error, ServiceError::Validation(_)));
    }
}
