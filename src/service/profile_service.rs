// service/profile_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::Store,
    dtos::{userdtos::{FilterUserDto, UpdateProfileDto}, workerdtos::FilterWorkerDto},
    models::{
        usermodel::{Principal, ProfileChanges, UserType},
        workermodel::{join_professions, WorkerSummary},
    },
    service::error::ServiceError,
    utils::password,
};

#[derive(Clone)]
pub struct ProfileService {
    db_client: Arc<dyn Store>,
}

impl ProfileService {
    pub fn new(db_client: Arc<dyn Store>) -> Self {
        Self { db_client }
    }

    pub async fn get_user_profile(&self, principal: Principal) -> Result<FilterUserDto, ServiceError> {
        let user = self
            .db_client
            .get_user(principal.id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User Data Not Found".to_string()))?;

        Ok(FilterUserDto::filter_user(&user))
    }

    pub async fn get_worker_profile(
        &self,
        principal: Principal,
    ) -> Result<FilterWorkerDto, ServiceError> {
        let worker = self
            .db_client
            .get_worker(principal.id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Worker Data Not Found".to_string()))?;

        Ok(FilterWorkerDto::filter_worker(&worker))
    }

    /// Case-insensitive substring match over verified workers' professions.
    pub async fn search_workers(
        &self,
        principal: Principal,
        req_type: Option<&str>,
    ) -> Result<Vec<WorkerSummary>, ServiceError> {
        if principal.user_type == UserType::Worker {
            return Err(ServiceError::Unauthorized("Unauthorized access".to_string()));
        }

        let query = req_type.map(str::trim).unwrap_or_default();
        if query.is_empty() {
            return Err(ServiceError::Validation("req_type is required".to_string()));
        }

        let workers = self.db_client.search_verified_workers(query).await?;
        if workers.is_empty() {
            return Err(ServiceError::NotFound("No matching workers found".to_string()));
        }

        Ok(workers)
    }

    pub async fn get_worker_public_profile(
        &self,
        worker_id: Uuid,
    ) -> Result<FilterWorkerDto, ServiceError> {
        let worker = self
            .db_client
            .get_verified_worker(worker_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("No matching workers found".to_string()))?;

        Ok(FilterWorkerDto::filter_worker(&worker))
    }

    pub async fn update_profile(
        &self,
        principal: Principal,
        body: UpdateProfileDto,
    ) -> Result<(), ServiceError> {
        let changes = profile_changes(principal.user_type, body)?;

        let updated = match principal.user_type {
            UserType::User => self.db_client.update_user_profile(principal.id, &changes).await?,
            UserType::Worker => {
                self.db_client
                    .update_worker_profile(principal.id, &changes)
                    .await?
            }
            UserType::Admin => {
                return Err(ServiceError::Unauthorized("Unauthorized access".to_string()))
            }
        };

        if updated == 0 {
            let who = if principal.user_type == UserType::User { "User" } else { "Worker" };
            return Err(ServiceError::NotFound(format!("{} not found", who)));
        }

        tracing::info!("{} {} updated their profile", principal.user_type, principal.id);
        Ok(())
    }
}

/// Maps the allow-listed payload onto column changes, hashing any new password.
fn profile_changes(user_type: UserType, body: UpdateProfileDto) -> Result<ProfileChanges, ServiceError> {
    let no_fields = || ServiceError::Validation("No fields provided for update".to_string());

    if body == UpdateProfileDto::default() {
        return Err(no_fields());
    }

    if let (Some(new), Some(confirm)) = (&body.password, &body.confirm_new_password) {
        if new != confirm {
            return Err(ServiceError::Validation("Passwords do not match".to_string()));
        }
    }

    let professions = match body.professions {
        Some(_) if user_type != UserType::Worker => {
            return Err(ServiceError::Validation(
                "Professions can only be set on a worker profile".to_string(),
            ))
        }
        Some(list) => {
            let joined = join_professions(&list);
            if joined.is_empty() {
                return Err(ServiceError::Validation(
                    "At least one profession is required".to_string(),
                ));
            }
            Some(joined)
        }
        None => None,
    };

    let password_hash = match body.password {
        Some(plain) => Some(password::hash(plain)?),
        None => None,
    };

    let address = body.address.unwrap_or_default();
    let changes = ProfileChanges {
        name: body.name,
        dob: body.dob,
        phone_no: body.phone_no,
        password_hash,
        address: address.address,
        city: address.city,
        pincode: address.pincode,
        professions,
    };

    if changes.is_empty() {
        return Err(no_fields());
    }

    Ok(changes)
}
