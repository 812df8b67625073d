use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::usermodel::UserType;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, Clone)]
pub struct Feedback {
    pub feedback_id: Uuid,
    pub submitter_id: Uuid,
    pub user_type: UserType,
    pub rating: i32,
    pub comments: String,
    pub created_at: DateTime<Utc>,
}
