use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Single slot per email; a new request overwrites the previous code.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct OtpRecord {
    pub email: String,
    pub otp: i32,
    pub created_at: DateTime<Utc>,
}

impl OtpRecord {
    pub fn is_expired(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        now - self.created_at > ttl
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpPurpose {
    AccountVerification,
    PasswordReset,
}
