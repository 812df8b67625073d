use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored as the legacy string flag: `pending` until an admin verifies the
/// application, then `true`. Rejected applications are deleted.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "worker_verification")]
pub enum VerificationState {
    #[sqlx(rename = "pending")]
    #[serde(rename = "pending")]
    Pending,
    #[sqlx(rename = "true")]
    #[serde(rename = "true")]
    Verified,
}

#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct WorkerApplication {
    pub id: Uuid,
    pub name: String,
    pub dob: NaiveDate,
    pub email: String,
    pub password: String,
    pub phone_no: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub types_of_professions: String,
    pub file_name: String,
    pub file_path: String,
    pub is_verified: VerificationState,
    pub created_at: DateTime<Utc>,
}

impl WorkerApplication {
    pub fn is_verified(&self) -> bool {
        self.is_verified == VerificationState::Verified
    }

    pub fn professions(&self) -> Vec<String> {
        split_professions(&self.types_of_professions)
    }
}

/// Directory entry returned by profession search.
#[derive(Debug, Deserialize, Serialize, sqlx::FromRow, Clone)]
pub struct WorkerSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone_no: String,
    pub city: String,
    pub types_of_professions: String,
}

pub fn split_professions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalises a profession list into the stored comma separated form.
pub fn join_professions<S: AsRef<str>>(professions: &[S]) -> String {
    professions
        .iter()
        .map(|p| p.as_ref().trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(",")
}
