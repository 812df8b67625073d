use std::fmt;

use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Principal kinds carried in the session token.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "user_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    User,
    Worker,
    Admin,
}

impl UserType {
    pub fn to_str(&self) -> &str {
        match self {
            UserType::User => "USER",
            UserType::Worker => "WORKER",
            UserType::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

/// The authenticated caller, resolved from a verified token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub user_type: UserType,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub dob: NaiveDate,
    pub email: String,
    pub phone_no: String,
    pub password: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct Administrator {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

/// Personal details shared by customer signups and worker applications.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub dob: NaiveDate,
    pub email: String,
    pub phone_no: String,
    pub password_hash: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
}

/// Allow-listed profile columns. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub dob: Option<NaiveDate>,
    pub phone_no: Option<String>,
    pub password_hash: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub pincode: Option<String>,
    /// Comma separated; only meaningful for worker rows.
    pub professions: Option<String>,
}

impl ProfileChanges {
    pub fn is_empty(&self) -> bool {
        self == &ProfileChanges::default()
    }
}
