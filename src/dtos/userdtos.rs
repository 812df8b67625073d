use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    models::usermodel::{User, UserType},
    service::notification::NotificationStatus,
};

#[derive(Serialize, Deserialize)]
pub struct Response {
    pub status: &'static str,
    pub message: String,
}

impl Response {
    pub fn success(message: impl Into<String>) -> Self {
        Response {
            status: "success",
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }
}

/// Body for a committed mutation that was followed by an email.
#[derive(Debug, Serialize, Deserialize)]
pub struct NotifiedResponse<T> {
    pub status: String,
    pub message: String,
    pub notification: NotificationStatus,
    pub data: T,
}

impl<T> NotifiedResponse<T> {
    pub fn success(message: &str, notification: NotificationStatus, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            notification,
            data,
        }
    }
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize)]
pub struct SendOtpDto {
    #[validate(length(min = 1, message = "Email is required"), email(message = "Email is invalid"))]
    pub email: String,
}

/// Accepts the code as a JSON number or a numeric string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OtpCode {
    Number(i64),
    Text(String),
}

impl OtpCode {
    pub fn value(&self) -> Option<i32> {
        match self {
            OtpCode::Number(n) => i32::try_from(*n).ok(),
            OtpCode::Text(s) => s.trim().parse::<i32>().ok(),
        }
    }
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct VerifyOtpDto {
    #[validate(length(min = 1, message = "Email is required"), email(message = "Email is invalid"))]
    pub email: String,
    pub otp: OtpCode,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct SignupUserDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    pub dob: NaiveDate,

    #[validate(length(min = 1, message = "Email is required"), email(message = "Email is invalid"))]
    pub email: String,

    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_no: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,

    #[validate(length(min = 1, message = "Pincode is required"))]
    pub pincode: String,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct LoginUserDto {
    #[validate(length(min = 1, message = "Email is required"), email(message = "Email is invalid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    pub user_type: UserType,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserLoginResponseDto {
    pub status: String,
    pub jwt_token: String,
    pub user_type: UserType,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordDto {
    #[validate(length(min = 1, message = "Email is required"), email(message = "Email is invalid"))]
    pub email: String,
    pub user_type: UserType,
}

#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordDto {
    #[validate(length(min = 1, message = "Email is required"), email(message = "Email is invalid"))]
    pub email: String,

    pub otp: OtpCode,

    #[validate(
        length(min = 1, message = "New password is required."),
        length(min = 6, message = "new password must be at least 6 characters")
    )]
    #[serde(alias = "newPassword")]
    pub new_password: String,

    pub user_type: UserType,
}

#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddressDto {
    #[validate(length(min = 1, message = "Address cannot be empty"))]
    pub address: Option<String>,
    #[validate(length(min = 1, message = "City cannot be empty"))]
    pub city: Option<String>,
    #[validate(length(min = 1, message = "Pincode cannot be empty"))]
    pub pincode: Option<String>,
}

/// Only these fields can change; unknown keys are refused.
#[derive(Validate, Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct UpdateProfileDto {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,

    pub dob: Option<NaiveDate>,

    #[validate(length(min = 1, message = "Phone number cannot be empty"))]
    pub phone_no: Option<String>,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,

    #[serde(rename = "confirmNewPassword")]
    pub confirm_new_password: Option<String>,

    #[validate]
    pub address: Option<AddressDto>,

    pub professions: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterUserDto {
    pub id: String,
    pub name: String,
    pub dob: NaiveDate,
    pub email: String,
    pub phone_no: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub created_at: DateTime<Utc>,
}

impl FilterUserDto {
    pub fn filter_user(user: &User) -> Self {
        FilterUserDto {
            id: user.id.to_string(),
            name: user.name.to_owned(),
            dob: user.dob,
            email: user.email.to_owned(),
            phone_no: user.phone_no.to_owned(),
            address: user.address.to_owned(),
            city: user.city.to_owned(),
            pincode: user.pincode.to_owned(),
            created_at: user.created_at,
        }
    }

    pub fn filter_users(users: &[User]) -> Vec<FilterUserDto> {
        users.iter().map(FilterUserDto::filter_user).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UserDataResponseDto {
    pub status: String,
    pub user_data: FilterUserDto,
}
