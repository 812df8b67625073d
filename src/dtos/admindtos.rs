use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{userdtos::FilterUserDto, workerdtos::FilterWorkerDto};
use crate::models::feedbackmodel::Feedback;

/// Everything the admin dashboard shows, without password hashes.
#[derive(Debug, Serialize, Deserialize)]
pub struct AdminOverviewDto {
    #[serde(rename = "usersData")]
    pub users_data: Vec<FilterUserDto>,
    #[serde(rename = "workerData")]
    pub worker_data: Vec<FilterWorkerDto>,
    pub feedback: Vec<Feedback>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerIdDto {
    pub id: Uuid,
}
