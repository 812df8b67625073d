use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::workermodel::{VerificationState, WorkerApplication};

/// Text fields of the multipart worker application. The proof file travels
/// separately; any `is_verified` field the client sends is never read.
#[derive(Validate, Debug, Clone, Serialize, Deserialize)]
pub struct WorkerApplicationDto {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    pub dob: NaiveDate,

    #[validate(length(min = 1, message = "Email is required"), email(message = "Email is invalid"))]
    pub email: String,

    #[validate(
        length(min = 1, message = "Password is required"),
        length(min = 6, message = "Password must be at least 6 characters")
    )]
    pub password: String,

    #[validate(length(min = 1, message = "Phone number is required"))]
    pub phone_no: String,

    #[validate(length(min = 1, message = "Address is required"))]
    pub address: String,

    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,

    #[validate(length(min = 1, message = "Pincode is required"))]
    pub pincode: String,

    #[validate(length(min = 1, message = "Professions are required"))]
    pub types_of_professions: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkerSearchQueryDto {
    pub req_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterWorkerDto {
    pub id: String,
    pub name: String,
    pub dob: NaiveDate,
    pub email: String,
    pub phone_no: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub types_of_professions: String,
    pub professions: Vec<String>,
    pub file_name: String,
    pub file_path: String,
    pub is_verified: VerificationState,
    pub created_at: DateTime<Utc>,
}

impl FilterWorkerDto {
    pub fn filter_worker(worker: &WorkerApplication) -> Self {
        FilterWorkerDto {
            id: worker.id.to_string(),
            name: worker.name.to_owned(),
            dob: worker.dob,
            email: worker.email.to_owned(),
            phone_no: worker.phone_no.to_owned(),
            address: worker.address.to_owned(),
            city: worker.city.to_owned(),
            pincode: worker.pincode.to_owned(),
            types_of_professions: worker.types_of_professions.to_owned(),
            professions: worker.professions(),
            file_name: worker.file_name.to_owned(),
            file_path: worker.file_path.to_owned(),
            is_verified: worker.is_verified,
            created_at: worker.created_at,
        }
    }

    pub fn filter_workers(workers: &[WorkerApplication]) -> Vec<FilterWorkerDto> {
        workers.iter().map(FilterWorkerDto::filter_worker).collect()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WorkerDataResponseDto {
    pub status: String,
    pub worker_data: FilterWorkerDto,
}
