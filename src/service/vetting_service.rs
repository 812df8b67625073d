// service/vetting_service.rs
use std::sync::Arc;

use uuid::Uuid;

use crate::{
    db::{workerdb::RejectOutcome, Store},
    dtos::{admindtos::AdminOverviewDto, userdtos::FilterUserDto, workerdtos::FilterWorkerDto},
    mail::{mails, sendmail::Mailer},
    service::{
        error::ServiceError,
        notification::{Committed, NotificationStatus},
    },
};

#[derive(Clone)]
pub struct VettingService {
    db_client: Arc<dyn Store>,
    mailer: Arc<dyn Mailer>,
}

impl VettingService {
    pub fn new(db_client: Arc<dyn Store>, mailer: Arc<dyn Mailer>) -> Self {
        Self { db_client, mailer }
    }

    pub async fn overview(&self) -> Result<AdminOverviewDto, ServiceError> {
        let users = self.db_client.get_users().await?;
        let workers = self.db_client.get_worker_applications().await?;
        let feedback = self.db_client.get_feedback().await?;

        Ok(AdminOverviewDto {
            users_data: FilterUserDto::filter_users(&users),
            worker_data: FilterWorkerDto::filter_workers(&workers),
            feedback,
        })
    }

    pub async fn verify_worker(&self, worker_id: Uuid) -> Result<Committed<()>, ServiceError> {
        let worker = self
            .db_client
            .get_worker(worker_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Worker not found".to_string()))?;

        if self.db_client.verify_worker(worker_id).await? == 0 {
            return Err(ServiceError::NotFound("Worker not found".to_string()));
        }

        tracing::info!("Worker application {} verified", worker_id);

        let sent = mails::send_worker_verified_email(self.mailer.as_ref(), &worker.email).await;
        Ok(Committed::new(
            (),
            NotificationStatus::from_result(sent, "worker verification"),
        ))
    }

    /// Ledger insert and application delete commit together or not at all.
    pub async fn reject_worker(&self, worker_id: Uuid) -> Result<Committed<()>, ServiceError> {
        let email = match self.db_client.reject_worker(worker_id).await? {
            RejectOutcome::Rejected(email) => email,
            RejectOutcome::NotFound => {
                return Err(ServiceError::NotFound("Worker not found".to_string()))
            }
            RejectOutcome::HasBookings => {
                return Err(ServiceError::Conflict(
                    "Worker has bookings and cannot be rejected".to_string(),
                ))
            }
        };

        tracing::info!("Worker application {} rejected", worker_id);

        let sent = mails::send_worker_rejected_email(self.mailer.as_ref(), &email).await;
        Ok(Committed::new(
            (),
            NotificationStatus::from_result(sent, "worker rejection"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::{bookingdb::BookingExt, workerdb::WorkerExt},
        test_support::{sample_user, sample_worker, Failure, InMemoryStore, RecordingMailer},
    };

    fn service(store: Arc<InMemoryStore>, mailer: Arc<RecordingMailer>) -> VettingService {
        VettingService::new(store, mailer)
    }

    #[tokio::test]
    async fn overview_leaves_out_password_hashes() {
        let store = Arc::new(InMemoryStore::default());
        store.insert_user(sample_user("asha@fixit.test", "password123"));
        store.insert_worker(sample_worker("ravi@fixit.test", "Plumbing", false));

        let overview = service(store, Arc::new(RecordingMailer::default()))
            .overview()
            .await
            .unwrap();

        assert_eq!(overview.users_data.len(), 1);
        assert_eq!(overview.worker_data.len(), 1);

        let json = serde_json::to_value(&overview).unwrap();
        assert!(json.get("usersData").is_some());
        assert!(json.get("workerData").is_some());
        assert!(!json.to_string().contains("argon2"));
        assert!(!json.to_string().contains("\"password\""));
    }

    #[tokio::test]
    async fn verify_marks_the_worker_and_emails_them() {
        let store = Arc::new(InMemoryStore::default());
        let worker = store.insert_worker(sample_worker("ravi@fixit.test", "Plumbing", false));
        let mailer = Arc::new(RecordingMailer::default());

        let committed = service(store.clone(), mailer.clone())
            .verify_worker(worker.id)
            .await
            .unwrap();

        assert_eq!(committed.notification, NotificationStatus::Sent);
        assert!(store.get_worker(worker.id).await.unwrap().unwrap().is_verified());
        assert_eq!(mailer.sent()[0].to, "ravi@fixit.test");
    }

    #[tokio::test]
    async fn verification_stands_when_the_email_fails() {
        let store = Arc::new(InMemoryStore::default());
        let worker = store.insert_worker(sample_worker("ravi@fixit.test", "Plumbing", false));

        let committed = service(store.clone(), Arc::new(RecordingMailer::failing()))
            .verify_worker(worker.id)
            .await
            .unwrap();

        assert_eq!(committed.notification, NotificationStatus::Failed);
        assert!(store.get_worker(worker.id).await.unwrap().unwrap().is_verified());
    }

    #[tokio::test]
    async fn unknown_worker_is_not_found() {
        let store = Arc::new(InMemoryStore::default());
        let svc = service(store, Arc::new(RecordingMailer::default()));

        assert!(matches!(
            svc.verify_worker(Uuid::new_v4()).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            svc.reject_worker(Uuid::new_v4()).await,
            Err(ServiceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn reject_moves_the_email_to_the_ledger() {
        let store = Arc::new(InMemoryStore::default());
        let worker = store.insert_worker(sample_worker("ravi@fixit.test", "Plumbing", false));

        service(store.clone(), Arc::new(RecordingMailer::default()))
            .reject_worker(worker.id)
            .await
            .unwrap();

        assert!(store.get_worker(worker.id).await.unwrap().is_none());
        assert!(store.is_rejected_worker("ravi@fixit.test").await.unwrap());
    }

    #[tokio::test]
    async fn failed_reject_leaves_no_partial_state() {
        let store = Arc::new(InMemoryStore::default());
        let worker = store.insert_worker(sample_worker("ravi@fixit.test", "Plumbing", false));
        store.fail(Failure::RejectionDelete);

        let err = service(store.clone(), Arc::new(RecordingMailer::default()))
            .reject_worker(worker.id)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Database(_)));
        assert!(store.get_worker(worker.id).await.unwrap().is_some());
        assert!(!store.is_rejected_worker("ravi@fixit.test").await.unwrap());
    }

    #[tokio::test]
    async fn worker_with_bookings_cannot_be_rejected() {
        let store = Arc::new(InMemoryStore::default());
        let user = store.insert_user(sample_user("asha@fixit.test", "password123"));
        let worker = store.insert_worker(sample_worker("ravi@fixit.test", "Plumbing", true));
        let booking = store
            .create_booking(user.id, worker.id, "Plumbing")
            .await
            .unwrap()
            .unwrap();
        let mailer = Arc::new(RecordingMailer::default());

        let err = service(store.clone(), mailer.clone())
            .reject_worker(worker.id)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Conflict(_)));
        assert!(store.get_worker(worker.id).await.unwrap().is_some());
        assert!(store.get_booking(booking.id).await.unwrap().is_some());
        assert!(!store.is_rejected_worker("ravi@fixit.test").await.unwrap());
        assert!(mailer.sent().is_empty());
    }
}
